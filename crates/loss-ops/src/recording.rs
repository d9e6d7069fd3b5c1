//! Primitive table that logs the name of every op it dispatches.

use std::sync::{Arc, Mutex, PoisonError};

use burn::prelude::*;

use crate::{LossPrimitives, TensorPrimitives};

/// Wraps [`TensorPrimitives`] and records each dispatched op, in order.
///
/// Clones share the same log, so a criterion built with a clone can be inspected
/// through the original handle.
#[derive(Clone, Debug, Default)]
pub struct RecordingPrimitives {
    inner: TensorPrimitives,
    ops: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingPrimitives {
    /// Create a table with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the ops dispatched so far.
    pub fn recorded(&self) -> Vec<&'static str> {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, op: &'static str) {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
    }
}

impl LossPrimitives for RecordingPrimitives {
    fn transpose<B: Backend, const D: usize>(
        &self,
        tensor: Tensor<B, D>,
        axes: [isize; D],
    ) -> Tensor<B, D> {
        self.record("transpose");
        self.inner.transpose(tensor, axes)
    }

    fn gather<B: Backend>(
        &self,
        dim: usize,
        input: Tensor<B, 2>,
        index: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        self.record("gather");
        self.inner.gather(dim, input, index)
    }

    fn sparse_softmax_cross_entropy<B: Backend>(
        &self,
        logits: Tensor<B, 2>,
        labels: Tensor<B, 1, Int>,
        depth: usize,
    ) -> (Tensor<B, 2>, Tensor<B, 1>) {
        self.record("sparse_softmax_cross_entropy");
        self.inner.sparse_softmax_cross_entropy(logits, labels, depth)
    }

    fn reduce_sum<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, 1> {
        self.record("reduce_sum");
        self.inner.reduce_sum(tensor)
    }

    fn reduce_mean<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, 1> {
        self.record("reduce_mean");
        self.inner.reduce_mean(tensor)
    }
}
