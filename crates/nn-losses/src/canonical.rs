//! Rank canonicalization for classification criteria.
//!
//! A classification input `[N, C, d1, ..., dk]` (k = 0, 1 or 2) is brought to
//! `[N * d1 * ... * dk, C]` by moving the class axis last and flattening the
//! leading axes. The target `[N, d1, ..., dk]` is flattened to match. After the
//! 2-D primitive produced one loss per row, [`restore`] reshapes it back to
//! `[N, d1, ..., dk]`.
//!
//! Only `permute` and `reshape` are used, so the autodiff engine carries the
//! gradient of the flattened rows back to the original layout.

use burn::prelude::*;
use loss_ops::{ClassLast, LossPrimitives, CLASS_AXIS};

use crate::{
    error::{ensure_same_shape, LossError, LossResult},
    reduction::Reduction,
};

/// Highest input rank a classification criterion accepts.
pub(crate) const MAX_RANK: usize = 4;

/// Check ranks and shapes of a classification input and its target.
///
/// Rank must be 2 to 4, the target must have exactly one axis less, and its
/// shape must be the input shape without the class axis.
pub(crate) fn check_classification(input: &[usize], target: &[usize]) -> LossResult<()> {
    let rank = input.len();
    if !(2..=MAX_RANK).contains(&rank) {
        return Err(LossError::UnsupportedRank { rank });
    }
    if target.len() + 1 != rank {
        return Err(LossError::TargetRankMismatch {
            input: rank,
            target: target.len(),
        });
    }

    let expected = without_class_axis(input);
    ensure_same_shape(&expected, target)
}

/// Flatten a checked classification input to `[rows, classes]` and its target to `[rows]`.
pub(crate) fn canonicalize<B: Backend, P: LossPrimitives, const D: usize, const DT: usize>(
    primitives: &P,
    input: Tensor<B, D>,
    target: Tensor<B, DT, Int>,
) -> (Tensor<B, 2>, Tensor<B, 1, Int>) {
    let dims = input.dims();
    let classes = dims[CLASS_AXIS];
    let rows = without_class_axis(&dims).iter().product::<usize>();

    let input = if D > 2 {
        tracing::debug!(?dims, rows, classes, "flattening spatial classification input");
        primitives.transpose(input, ClassLast::<D>::AXES)
    } else {
        input
    };

    (input.reshape([rows, classes]), target.reshape([rows]))
}

/// Reshape per-row losses back to the input layout without its class axis.
pub(crate) fn restore<B: Backend, const DT: usize>(
    loss: Tensor<B, 1>,
    input: &[usize],
) -> Tensor<B, DT> {
    let mut shape = [0usize; DT];
    for (slot, dim) in shape.iter_mut().zip(without_class_axis(input)) {
        *slot = dim;
    }
    loss.reshape(shape)
}

/// Apply `reduction` to per-row losses and shape the result for the caller.
///
/// `none` restores the input layout. `sum` and `mean` reduce the rows directly
/// and return a single element at rank `DT`.
pub(crate) fn finish<B: Backend, P: LossPrimitives, const DT: usize>(
    reduction: Reduction,
    primitives: &P,
    loss: Tensor<B, 1>,
    input: &[usize],
) -> Tensor<B, DT> {
    match reduction {
        Reduction::None => restore(loss, input),
        Reduction::Sum | Reduction::Mean => reduction
            .apply(primitives, loss)
            .reshape([1usize; DT]),
    }
}

fn without_class_axis(dims: &[usize]) -> Vec<usize> {
    dims.iter()
        .enumerate()
        .filter(|&(axis, _)| axis != CLASS_AXIS)
        .map(|(_, &dim)| dim)
        .collect()
}
