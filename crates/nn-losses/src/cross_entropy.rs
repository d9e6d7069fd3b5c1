//! Cross-entropy loss over raw class scores.
//!
//! Combines log-softmax and negative log-likelihood in one criterion. For a row
//! `x` of logits with true class `c`:
//! ```text
//! loss(x, c) = -log(exp(x[c]) / Σ_j exp(x[j])) = -x[c] + log(Σ_j exp(x[j]))
//! ```
//!
//! Inputs of shape `[N, C]`, `[N, C, H]` or `[N, C, H, W]` are accepted; spatial
//! inputs yield one loss per position.

use core::fmt;

use burn::{config::Config, prelude::*};
use loss_ops::{LossPrimitives, TensorPrimitives};

use crate::{
    canonical::{canonicalize, check_classification, finish},
    error::{ensure_default, LossResult},
    reduction::Reduction,
};

/// Configuration for creating a [Cross-entropy loss](CrossEntropyLoss).
#[derive(Config, Debug)]
pub struct CrossEntropyLossConfig {
    /// Per-class rescaling weights. Not supported; must stay unset.
    pub weight: Option<Vec<f32>>,
    /// Target value whose positions are skipped. Not supported; must stay unset.
    pub ignore_index: Option<i64>,
    /// Reduction applied to the per-example losses. Unset means no reduction. Default: mean
    #[config(default = "Some(Reduction::Mean)")]
    pub reduction: Option<Reduction>,
}

impl CrossEntropyLossConfig {
    /// Initialize [Cross-entropy loss](CrossEntropyLoss) on the Burn primitives.
    pub fn init(&self) -> LossResult<CrossEntropyLoss> {
        self.init_with(TensorPrimitives)
    }

    /// Initialize [Cross-entropy loss](CrossEntropyLoss) on a custom primitive table.
    pub fn init_with<P: LossPrimitives>(&self, primitives: P) -> LossResult<CrossEntropyLoss<P>> {
        self.assertions()?;
        let reduction = Reduction::from_option(self.reduction);
        tracing::debug!(%reduction, "initialized CrossEntropyLoss");

        Ok(CrossEntropyLoss {
            reduction,
            primitives,
        })
    }

    fn assertions(&self) -> LossResult<()> {
        ensure_default("weight", self.weight.is_none())?;
        ensure_default("ignore_index", self.ignore_index.is_none())
    }
}

/// Cross-entropy loss for classification with `C` classes.
///
/// Holds only its reduction and primitive table; forward calls share nothing.
#[derive(Clone, Debug)]
pub struct CrossEntropyLoss<P = TensorPrimitives> {
    reduction: Reduction,
    primitives: P,
}

impl Default for CrossEntropyLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossEntropyLoss {
    /// Create a new cross-entropy loss with mean reduction.
    pub const fn new() -> Self {
        Self {
            reduction: Reduction::Mean,
            primitives: TensorPrimitives,
        }
    }
}

impl<P> fmt::Display for CrossEntropyLoss<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CrossEntropyLoss {{reduction: {}}}", self.reduction)
    }
}

impl<P: LossPrimitives> CrossEntropyLoss<P> {
    /// Reduction applied by [`forward`](Self::forward).
    pub const fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Compute the criterion with the configured reduction.
    ///
    /// # Shapes
    ///
    /// - logits: `[N, C]`, `[N, C, H]` or `[N, C, H, W]`
    /// - target: `[N]`, `[N, H]` or `[N, H, W]` class indices in `0..C`
    /// - output: same shape as target for `none`, all ones (a single element) otherwise
    pub fn forward<B: Backend, const D: usize, const DT: usize>(
        &self,
        logits: Tensor<B, D>,
        target: Tensor<B, DT, Int>,
    ) -> LossResult<Tensor<B, DT>> {
        let input_dims = logits.dims();
        let loss = self.per_row(logits, target)?;
        Ok(finish(self.reduction, &self.primitives, loss, &input_dims))
    }

    /// Compute the criterion without reduction.
    ///
    /// # Shapes
    ///
    /// - logits: `[N, C]`, `[N, C, H]` or `[N, C, H, W]`
    /// - target: `[N]`, `[N, H]` or `[N, H, W]`
    /// - output: same shape as target
    pub fn forward_no_reduction<B: Backend, const D: usize, const DT: usize>(
        &self,
        logits: Tensor<B, D>,
        target: Tensor<B, DT, Int>,
    ) -> LossResult<Tensor<B, DT>> {
        let input_dims = logits.dims();
        let loss = self.per_row(logits, target)?;
        Ok(finish(Reduction::None, &self.primitives, loss, &input_dims))
    }

    fn per_row<B: Backend, const D: usize, const DT: usize>(
        &self,
        logits: Tensor<B, D>,
        target: Tensor<B, DT, Int>,
    ) -> LossResult<Tensor<B, 1>> {
        check_classification(&logits.dims(), &target.dims())?;

        let (rows, labels) = canonicalize(&self.primitives, logits, target);
        let [_, depth] = rows.dims();
        let (_prob, loss) = self
            .primitives
            .sparse_softmax_cross_entropy(rows, labels, depth);

        Ok(loss)
    }
}
