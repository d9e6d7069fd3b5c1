//! Margin ranking loss.
//!
//! For inputs `x1`, `x2` and a label `y` (nominally `1` or `-1`):
//! ```text
//! loss(x1, x2, y) = max(0, -y * (x1 - x2) + margin)
//! ```
//! `y = 1` means `x1` should rank higher than `x2`, `y = -1` the opposite. Label
//! values are not checked; any real value goes through the formula. The three
//! tensors broadcast against each other along size-1 dimensions, so a `[N, 1]`
//! label column applies to every score in its row.

use core::fmt;

use burn::{config::Config, prelude::*};
use loss_ops::{LossPrimitives, TensorPrimitives};

use crate::{
    error::{broadcast_shape, LossResult},
    reduction::Reduction,
};

/// Configuration for creating a [Margin ranking loss](MarginRankingLoss).
#[derive(Config, Debug)]
pub struct MarginRankingLossConfig {
    /// Minimum gap required between the two scores. Default: 0.0
    #[config(default = 0.0)]
    pub margin: f64,
    /// Reduction applied to the elementwise losses. Unset means no reduction. Default: mean
    #[config(default = "Some(Reduction::Mean)")]
    pub reduction: Option<Reduction>,
}

impl MarginRankingLossConfig {
    /// Initialize [Margin ranking loss](MarginRankingLoss) on the Burn primitives.
    pub fn init(&self) -> MarginRankingLoss {
        self.init_with(TensorPrimitives)
    }

    /// Initialize [Margin ranking loss](MarginRankingLoss) on a custom primitive table.
    pub fn init_with<P: LossPrimitives>(&self, primitives: P) -> MarginRankingLoss<P> {
        let reduction = Reduction::from_option(self.reduction);
        tracing::debug!(margin = self.margin, %reduction, "initialized MarginRankingLoss");

        MarginRankingLoss {
            margin: self.margin,
            reduction,
            primitives,
        }
    }
}

/// Hinge loss on the difference of two scores.
#[derive(Clone, Debug)]
pub struct MarginRankingLoss<P = TensorPrimitives> {
    margin: f64,
    reduction: Reduction,
    primitives: P,
}

impl Default for MarginRankingLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl MarginRankingLoss {
    /// Create a new margin ranking loss with margin 0 and mean reduction.
    pub const fn new() -> Self {
        Self {
            margin: 0.0,
            reduction: Reduction::Mean,
            primitives: TensorPrimitives,
        }
    }
}

impl<P> fmt::Display for MarginRankingLoss<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MarginRankingLoss {{margin: {}, reduction: {}}}",
            self.margin, self.reduction
        )
    }
}

impl<P: LossPrimitives> MarginRankingLoss<P> {
    /// Margin added to every pair.
    pub const fn margin(&self) -> f64 {
        self.margin
    }

    /// Reduction applied by [`forward`](Self::forward).
    pub const fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Compute the criterion with the configured reduction.
    ///
    /// # Shapes
    ///
    /// - input1, input2, target: `[...dims]` (broadcastable to one shape)
    /// - output: `[...dims]` of the broadcast shape for `none`, all ones (a single element) otherwise
    pub fn forward<B: Backend, const D: usize>(
        &self,
        input1: Tensor<B, D>,
        input2: Tensor<B, D>,
        target: Tensor<B, D>,
    ) -> LossResult<Tensor<B, D>> {
        let loss = self.forward_no_reduction(input1, input2, target)?;
        Ok(self.reduction.apply(&self.primitives, loss))
    }

    /// Compute the elementwise hinge without reduction.
    pub fn forward_no_reduction<B: Backend, const D: usize>(
        &self,
        input1: Tensor<B, D>,
        input2: Tensor<B, D>,
        target: Tensor<B, D>,
    ) -> LossResult<Tensor<B, D>> {
        let dims = broadcast_shape(&input1.dims(), &input2.dims())?;
        broadcast_shape(&dims, &target.dims())?;

        Ok((input1 - input2)
            .neg()
            .mul(target)
            .add_scalar(self.margin)
            .clamp_min(0.0))
    }
}
