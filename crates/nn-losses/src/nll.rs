//! Negative log-likelihood loss.
//!
//! Expects log-probabilities (for instance the output of a log-softmax layer).
//! The unreduced loss is:
//! ```text
//! l_n = -x[n, y_n]
//! ```
//! Spatial inputs `[N, C, H]` and `[N, C, H, W]` give one loss per position.

use core::fmt;

use burn::{config::Config, prelude::*};
use loss_ops::{LossPrimitives, TensorPrimitives, CLASS_AXIS};

use crate::{
    canonical::{canonicalize, check_classification, finish},
    error::{ensure_default, LossResult},
    reduction::Reduction,
};

/// Configuration for creating a [Negative log-likelihood loss](NllLoss).
#[derive(Config, Debug)]
pub struct NllLossConfig {
    /// Per-class rescaling weights. Not supported; must stay unset.
    pub weight: Option<Vec<f32>>,
    /// Target value whose positions are skipped. Not supported; must stay unset.
    pub ignore_index: Option<i64>,
    /// Reduction applied to the per-example losses. Unset means no reduction. Default: mean
    #[config(default = "Some(Reduction::Mean)")]
    pub reduction: Option<Reduction>,
}

impl NllLossConfig {
    /// Initialize [Negative log-likelihood loss](NllLoss) on the Burn primitives.
    pub fn init(&self) -> LossResult<NllLoss> {
        self.init_with(TensorPrimitives)
    }

    /// Initialize [Negative log-likelihood loss](NllLoss) on a custom primitive table.
    pub fn init_with<P: LossPrimitives>(&self, primitives: P) -> LossResult<NllLoss<P>> {
        self.assertions()?;

        let reduction = Reduction::from_option(self.reduction);
        tracing::debug!(%reduction, "initialized NllLoss");

        Ok(NllLoss {
            reduction,
            primitives,
        })
    }

    fn assertions(&self) -> LossResult<()> {
        ensure_default("weight", self.weight.is_none())?;
        ensure_default("ignore_index", self.ignore_index.is_none())
    }
}

/// Negative log-likelihood loss for classification with `C` classes.
#[derive(Clone, Debug)]
pub struct NllLoss<P = TensorPrimitives> {
    reduction: Reduction,
    primitives: P,
}

impl Default for NllLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl NllLoss {
    /// Create a new NLL loss with mean reduction.
    pub const fn new() -> Self {
        Self {
            reduction: Reduction::Mean,
            primitives: TensorPrimitives,
        }
    }
}

impl<P> fmt::Display for NllLoss<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NllLoss {{reduction: {}}}", self.reduction)
    }
}

impl<P: LossPrimitives> NllLoss<P> {
    /// Reduction applied by [`forward`](Self::forward).
    pub const fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Compute the criterion with the configured reduction.
    ///
    /// # Shapes
    ///
    /// - log_probs: `[N, C]`, `[N, C, H]` or `[N, C, H, W]`
    /// - target: `[N]`, `[N, H]` or `[N, H, W]` class indices in `0..C`
    /// - output: same shape as target for `none`, all ones (a single element) otherwise
    pub fn forward<B: Backend, const D: usize, const DT: usize>(
        &self,
        log_probs: Tensor<B, D>,
        target: Tensor<B, DT, Int>,
    ) -> LossResult<Tensor<B, DT>> {
        let input_dims = log_probs.dims();
        let loss = self.per_row(log_probs, target)?;
        Ok(finish(self.reduction, &self.primitives, loss, &input_dims))
    }

    /// Compute the criterion without reduction.
    ///
    /// # Shapes
    ///
    /// - log_probs: `[N, C]`, `[N, C, H]` or `[N, C, H, W]`
    /// - target: `[N]`, `[N, H]` or `[N, H, W]`
    /// - output: same shape as target
    pub fn forward_no_reduction<B: Backend, const D: usize, const DT: usize>(
        &self,
        log_probs: Tensor<B, D>,
        target: Tensor<B, DT, Int>,
    ) -> LossResult<Tensor<B, DT>> {
        let input_dims = log_probs.dims();
        let loss = self.per_row(log_probs, target)?;
        Ok(finish(Reduction::None, &self.primitives, loss, &input_dims))
    }

    fn per_row<B: Backend, const D: usize, const DT: usize>(
        &self,
        log_probs: Tensor<B, D>,
        target: Tensor<B, DT, Int>,
    ) -> LossResult<Tensor<B, 1>> {
        check_classification(&log_probs.dims(), &target.dims())?;

        let (rows, labels) = canonicalize(&self.primitives, log_probs.neg(), target);
        Ok(self.nll_1d(rows, labels))
    }

    /// Pick `input[m, target[m]]` for every row `m`.
    fn nll_1d<B: Backend>(&self, input: Tensor<B, 2>, target: Tensor<B, 1, Int>) -> Tensor<B, 1> {
        let [rows] = target.dims();
        let index = target.reshape([rows, 1]);
        self.primitives
            .gather(CLASS_AXIS, input, index)
            .squeeze::<1>(CLASS_AXIS)
    }
}

#[cfg(test)]
mod tests {
    use burn::tensor::{ops::FloatElem, TensorData, Tolerance, Transaction};
    use loss_ops::RecordingPrimitives;

    use super::*;
    use crate::{
        error::LossError,
        tests::{reference_logits, reference_targets, TestAutodiffBackend, TestBackend},
    };

    type FT = FloatElem<TestBackend>;

    fn loss_with(reduction: Reduction) -> NllLoss {
        NllLossConfig::new()
            .with_reduction(Some(reduction))
            .init()
            .expect("valid config")
    }

    #[test]
    fn nll_loss_reference_values_for_every_reduction() {
        let device = Default::default();
        let input = reference_logits::<TestBackend>(&device);
        let targets = reference_targets::<TestBackend>(&device);

        let none = loss_with(Reduction::None)
            .forward(input.clone(), targets.clone())
            .expect("valid shapes");
        let sum = loss_with(Reduction::Sum)
            .forward(input.clone(), targets.clone())
            .expect("valid shapes");
        let mean = loss_with(Reduction::Mean)
            .forward(input, targets)
            .expect("valid shapes");

        let [none_data, sum_data, mean_data] = Transaction::default()
            .register(none)
            .register(sum)
            .register(mean)
            .execute()
            .try_into()
            .expect("Correct amount of tensor data");

        none_data.assert_approx_eq::<FT>(
            &TensorData::from([0.166_407_8, -0.537_374_73, -0.764_540_4]),
            Tolerance::default(),
        );
        sum_data.assert_approx_eq::<FT>(&TensorData::from([-1.135_507_3]), Tolerance::default());
        mean_data
            .assert_approx_eq::<FT>(&TensorData::from([-0.378_502_46]), Tolerance::default());
    }

    #[test]
    fn nll_loss_rank_four_matches_row_layout() {
        let device = Default::default();
        // Position w of [1, C, 1, W] holds row w of the reference input.
        let input = reference_logits::<TestBackend>(&device)
            .swap_dims(0, 1)
            .reshape([1, 3, 1, 3]);
        let targets = reference_targets::<TestBackend>(&device).reshape([1, 1, 3]);

        let result = loss_with(Reduction::None)
            .forward(input, targets)
            .expect("valid shapes");

        assert_eq!(result.dims(), [1, 1, 3]);
        result.into_data().assert_approx_eq::<FT>(
            &TensorData::from([[[0.166_407_8, -0.537_374_73, -0.764_540_4]]]),
            Tolerance::default(),
        );
    }

    #[test]
    fn nll_loss_rank_three_reductions_agree_with_none() {
        let device = Default::default();
        let input = Tensor::<TestBackend, 3>::random(
            [3, 4, 5],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let classes: Vec<i64> = (0..15).map(|i| i % 4).collect();
        let targets =
            Tensor::<TestBackend, 2, Int>::from_data(TensorData::new(classes, [3, 5]), &device);

        let none = loss_with(Reduction::None)
            .forward(input.clone(), targets.clone())
            .expect("valid shapes");
        let sum = loss_with(Reduction::Sum)
            .forward(input.clone(), targets.clone())
            .expect("valid shapes");
        let mean = loss_with(Reduction::Mean)
            .forward(input, targets)
            .expect("valid shapes");
        assert_eq!(none.dims(), [3, 5]);
        assert_eq!(mean.dims(), [1, 1]);

        let [none_sum, sum_data, none_mean, mean_data] = Transaction::default()
            .register(none.clone().sum())
            .register(sum.reshape([1]))
            .register(none.mean())
            .register(mean.reshape([1]))
            .execute()
            .try_into()
            .expect("Correct amount of tensor data");

        none_sum.assert_approx_eq::<FT>(&sum_data, Tolerance::default());
        none_mean.assert_approx_eq::<FT>(&mean_data, Tolerance::default());
    }

    #[test]
    fn nll_loss_rank_three_gradient_reaches_original_layout() {
        let device = Default::default();
        // [N=1, C=3, H=3]; target class at position h is h.
        let input = Tensor::<TestAutodiffBackend, 3>::zeros([1, 3, 3], &device).require_grad();
        let targets =
            Tensor::<TestAutodiffBackend, 2, Int>::from_data(TensorData::from([[0, 1, 2]]), &device);

        let grads = loss_with(Reduction::Sum)
            .forward(input.clone(), targets)
            .expect("valid shapes")
            .backward();
        let grad = input.grad(&grads).expect("input requires grad");

        grad.into_data().assert_approx_eq::<FT>(
            &TensorData::from([[[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]]]),
            Tolerance::default(),
        );
    }

    #[test]
    fn nll_loss_dispatches_transpose_then_gather() {
        let device = Default::default();
        let primitives = RecordingPrimitives::new();
        let loss = NllLossConfig::new()
            .with_reduction(None)
            .init_with(primitives.clone())
            .expect("valid config");

        let _ = loss
            .forward(
                reference_logits::<TestBackend>(&device),
                reference_targets::<TestBackend>(&device),
            )
            .expect("valid shapes");
        assert_eq!(primitives.recorded(), ["gather"]);

        primitives.clear();
        let input = Tensor::<TestBackend, 3>::zeros([2, 3, 4], &device);
        let targets = Tensor::<TestBackend, 2, Int>::zeros([2, 4], &device);
        let _ = loss.forward(input, targets).expect("valid shapes");
        assert_eq!(primitives.recorded(), ["transpose", "gather"]);
    }

    #[test]
    fn nll_loss_rank_five_fails_for_every_reduction_before_any_op() {
        let device = Default::default();

        for reduction in [Reduction::None, Reduction::Sum, Reduction::Mean] {
            let primitives = RecordingPrimitives::new();
            let loss = NllLossConfig::new()
                .with_reduction(Some(reduction))
                .init_with(primitives.clone())
                .expect("valid config");

            let input = Tensor::<TestBackend, 5>::zeros([1, 2, 1, 1, 1], &device);
            let targets = Tensor::<TestBackend, 4, Int>::zeros([1, 1, 1, 1], &device);

            let err = loss
                .forward(input, targets)
                .err()
                .expect("rank 5 is unsupported");
            assert_eq!(err, LossError::UnsupportedRank { rank: 5 });
            assert!(primitives.recorded().is_empty());
        }
    }

    #[test]
    fn nll_loss_target_shape_mismatch_fails() {
        let device = Default::default();
        let loss = NllLoss::new();

        let input = Tensor::<TestBackend, 2>::zeros([3, 4], &device);
        let targets = Tensor::<TestBackend, 1, Int>::zeros([2], &device);

        let err = loss
            .forward(input, targets)
            .err()
            .expect("target must have one index per row");
        assert_eq!(
            err,
            LossError::ShapeMismatch {
                expected: vec![3],
                actual: vec![2],
            }
        );
    }

    #[test]
    fn nll_loss_config_rejects_weight_and_ignore_index() {
        assert_eq!(
            NllLossConfig::new()
                .with_weight(Some(vec![0.5]))
                .init()
                .err(),
            Some(LossError::UnsupportedOption { option: "weight" })
        );
        assert_eq!(
            NllLossConfig::new().with_ignore_index(Some(0)).init().err(),
            Some(LossError::UnsupportedOption {
                option: "ignore_index"
            })
        );
    }

    #[test]
    fn nll_loss_rejected_config_never_touches_primitives() {
        let primitives = RecordingPrimitives::new();
        let result = NllLossConfig::new()
            .with_ignore_index(Some(-100))
            .init_with(primitives.clone());

        assert!(result.is_err());
        assert!(primitives.recorded().is_empty());
    }

    #[test]
    fn nll_loss_display_shows_reduction() {
        let loss = NllLossConfig::new()
            .with_reduction(Some(Reduction::Sum))
            .init()
            .expect("valid config");
        assert_eq!(format!("{loss}"), "NllLoss {reduction: sum}");
    }
}
