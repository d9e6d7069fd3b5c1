use thiserror::Error;

/// Errors raised while configuring a loss criterion or validating its inputs.
///
/// Every variant is returned before any tensor operation is dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LossError {
    /// A configuration option that is accepted only to be rejected was set.
    #[error("Argument {option} is not supported yet")]
    UnsupportedOption {
        /// Name of the offending option.
        option: &'static str,
    },

    /// A reduction name outside `none`, `sum` and `mean`.
    #[error("Invalid reduction '{value}': only 'sum', 'mean', 'none' or unset are supported")]
    InvalidReduction {
        /// The rejected name.
        value: String,
    },

    /// Input rank outside what the criterion can canonicalize.
    #[error("Unsupported input rank {rank}: expected an input of rank 2 to 4")]
    UnsupportedRank {
        /// Rank of the input tensor.
        rank: usize,
    },

    /// The target rank is not one less than the input rank.
    #[error("Target rank ({target}) must be one less than input rank ({input})")]
    TargetRankMismatch {
        /// Rank of the input tensor.
        input: usize,
        /// Rank of the target tensor.
        target: usize,
    },

    /// Tensor shapes that must line up do not.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Shape implied by the input.
        expected: Vec<usize>,
        /// Shape that was supplied.
        actual: Vec<usize>,
    },
}

/// A specialized `Result` type for loss criteria.
pub type LossResult<T> = Result<T, LossError>;

/// Reject an unsupported option that was given a non-default value.
pub(crate) fn ensure_default(option: &'static str, is_default: bool) -> LossResult<()> {
    if is_default {
        Ok(())
    } else {
        Err(LossError::UnsupportedOption { option })
    }
}

/// Require two tensors to have identical shapes.
pub(crate) fn ensure_same_shape(expected: &[usize], actual: &[usize]) -> LossResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(LossError::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        })
    }
}

/// Shape of the elementwise result of two same-rank tensors.
///
/// Each pair of dimensions must be equal or one of them must be 1; the size-1 side
/// is stretched to the other.
pub(crate) fn broadcast_shape(expected: &[usize], actual: &[usize]) -> LossResult<Vec<usize>> {
    let compatible = expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(&lhs, &rhs)| lhs == rhs || lhs == 1 || rhs == 1);

    if !compatible {
        return Err(LossError::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }

    Ok(expected
        .iter()
        .zip(actual)
        .map(|(&lhs, &rhs)| if lhs == 1 { rhs } else { lhs })
        .collect())
}
