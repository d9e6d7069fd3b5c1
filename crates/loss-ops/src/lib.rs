//! Primitive operations for loss criteria on the Burn deep learning framework
//!
//! Loss modules never call kernels directly. They go through a [`LossPrimitives`]
//! table, so every op a criterion dispatches can be observed or substituted
//! (see [`RecordingPrimitives`]). [`TensorPrimitives`] is the Burn-backed table
//! used by default.

use burn::prelude::*;

mod permute;
mod primitives;
mod recording;
mod softmax_cross_entropy;

pub use permute::{ClassLast, CLASS_AXIS};
pub use primitives::TensorPrimitives;
pub use recording::RecordingPrimitives;
pub use softmax_cross_entropy::sparse_softmax_cross_entropy;

/// The fixed set of differentiable primitives a loss criterion may dispatch.
///
/// Every method must be built from ops the autodiff engine records, so that
/// gradients flow from the reduced loss back to the caller's input layout.
pub trait LossPrimitives: Clone + core::fmt::Debug + Send + Sync {
    /// Reorder the axes of `tensor` so that output axis `i` is input axis `axes[i]`.
    fn transpose<B: Backend, const D: usize>(
        &self,
        tensor: Tensor<B, D>,
        axes: [isize; D],
    ) -> Tensor<B, D>;

    /// Pick one value per output position along `dim`, as selected by `index`.
    ///
    /// # Shapes
    ///
    /// - input: `[rows, classes]`
    /// - index: `[rows, k]`
    /// - output: `[rows, k]`
    fn gather<B: Backend>(
        &self,
        dim: usize,
        input: Tensor<B, 2>,
        index: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2>;

    /// Fused softmax + cross-entropy over raw logits and integer labels.
    ///
    /// Returns the softmax probabilities and the per-row loss.
    ///
    /// # Shapes
    ///
    /// - logits: `[rows, depth]`
    /// - labels: `[rows]`
    /// - output: (`[rows, depth]`, `[rows]`)
    fn sparse_softmax_cross_entropy<B: Backend>(
        &self,
        logits: Tensor<B, 2>,
        labels: Tensor<B, 1, Int>,
        depth: usize,
    ) -> (Tensor<B, 2>, Tensor<B, 1>);

    /// Total of every element.
    fn reduce_sum<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, 1>;

    /// Arithmetic mean of every element.
    fn reduce_mean<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, 1>;
}
