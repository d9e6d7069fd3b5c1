//! Mean squared error (squared L2) loss.
//!
//! The unreduced loss is `L = {l_1, ..., l_N}` with `l_n = (x_n - y_n)^2`, over
//! tensors of any shape. The target may broadcast against the input along size-1
//! dimensions. `mean` divides by the number of elements in the broadcast result,
//! not by the batch size.

use core::fmt;

use burn::{config::Config, prelude::*};
use loss_ops::{LossPrimitives, TensorPrimitives};

use crate::{
    error::{broadcast_shape, ensure_default, LossResult},
    reduction::Reduction,
};

/// Configuration for creating a [Mean squared error loss](MseLoss).
#[derive(Config, Debug)]
pub struct MseLossConfig {
    /// Reduction applied to the elementwise losses. Unset means no reduction. Default: mean
    #[config(default = "Some(Reduction::Mean)")]
    pub reduction: Option<Reduction>,
    /// Deprecated alias of `reduction`. Only `true` is accepted. Default: true
    #[config(default = true)]
    pub size_average: bool,
    /// Deprecated alias of `reduction`. Only `true` is accepted. Default: true
    #[config(default = true)]
    pub reduce: bool,
}

impl MseLossConfig {
    /// Initialize [Mean squared error loss](MseLoss) on the Burn primitives.
    pub fn init(&self) -> LossResult<MseLoss> {
        self.init_with(TensorPrimitives)
    }

    /// Initialize [Mean squared error loss](MseLoss) on a custom primitive table.
    ///
    /// The deprecated flags are only validated here and never kept.
    pub fn init_with<P: LossPrimitives>(&self, primitives: P) -> LossResult<MseLoss<P>> {
        self.assertions()?;

        let reduction = Reduction::from_option(self.reduction);
        tracing::debug!(%reduction, "initialized MseLoss");

        Ok(MseLoss {
            reduction,
            primitives,
        })
    }

    fn assertions(&self) -> LossResult<()> {
        ensure_default("size_average", self.size_average)?;
        ensure_default("reduce", self.reduce)
    }
}

/// Mean squared error between each element of the input and the target.
#[derive(Clone, Debug)]
pub struct MseLoss<P = TensorPrimitives> {
    reduction: Reduction,
    primitives: P,
}

impl Default for MseLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl MseLoss {
    /// Create a new MSE loss with mean reduction.
    pub const fn new() -> Self {
        Self {
            reduction: Reduction::Mean,
            primitives: TensorPrimitives,
        }
    }
}

impl<P> fmt::Display for MseLoss<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MseLoss {{reduction: {}}}", self.reduction)
    }
}

impl<P: LossPrimitives> MseLoss<P> {
    /// Reduction applied by [`forward`](Self::forward).
    pub const fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Compute the criterion with the configured reduction.
    ///
    /// # Shapes
    ///
    /// - input: `[...dims]` (any shape)
    /// - target: `[...dims]` (broadcastable to input)
    /// - output: `[...dims]` of the broadcast shape for `none`, all ones (a single element) otherwise
    pub fn forward<B: Backend, const D: usize>(
        &self,
        input: Tensor<B, D>,
        target: Tensor<B, D>,
    ) -> LossResult<Tensor<B, D>> {
        let loss = self.forward_no_reduction(input, target)?;
        Ok(self.reduction.apply(&self.primitives, loss))
    }

    /// Compute the elementwise squared difference.
    pub fn forward_no_reduction<B: Backend, const D: usize>(
        &self,
        input: Tensor<B, D>,
        target: Tensor<B, D>,
    ) -> LossResult<Tensor<B, D>> {
        broadcast_shape(&input.dims(), &target.dims())?;

        let diff = input - target;
        Ok(diff.clone() * diff)
    }
}
