//! Burn-backed primitive table.

use burn::prelude::*;

use crate::{softmax_cross_entropy::sparse_softmax_cross_entropy, LossPrimitives};

/// Dispatches every primitive straight to the Burn tensor API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TensorPrimitives;

impl LossPrimitives for TensorPrimitives {
    fn transpose<B: Backend, const D: usize>(
        &self,
        tensor: Tensor<B, D>,
        axes: [isize; D],
    ) -> Tensor<B, D> {
        tracing::trace!(?axes, "transpose");
        tensor.permute(axes)
    }

    fn gather<B: Backend>(
        &self,
        dim: usize,
        input: Tensor<B, 2>,
        index: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        tracing::trace!(dim, "gather");
        input.gather(dim, index)
    }

    fn sparse_softmax_cross_entropy<B: Backend>(
        &self,
        logits: Tensor<B, 2>,
        labels: Tensor<B, 1, Int>,
        depth: usize,
    ) -> (Tensor<B, 2>, Tensor<B, 1>) {
        tracing::trace!(depth, "sparse_softmax_cross_entropy");
        sparse_softmax_cross_entropy(logits, labels, depth)
    }

    fn reduce_sum<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, 1> {
        tracing::trace!("reduce_sum");
        tensor.sum()
    }

    fn reduce_mean<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, 1> {
        tracing::trace!("reduce_mean");
        tensor.mean()
    }
}
