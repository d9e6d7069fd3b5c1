//! Reduction applied to per-example losses.

use core::{fmt, str::FromStr};

use burn::prelude::*;
use loss_ops::LossPrimitives;
use serde::{Deserialize, Serialize};

use crate::error::{LossError, LossResult};

/// How per-example losses are combined into the criterion's output.
///
/// Serialized as `"none"`, `"sum"` or `"mean"`. In configs the reduction is an
/// `Option<Reduction>`, where an unset (`null`) value means [`Reduction::None`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Return the per-example losses unchanged.
    None,
    /// Total of all elements.
    Sum,
    /// Arithmetic mean over all elements.
    #[default]
    Mean,
}

impl Reduction {
    /// Resolve a configured reduction, treating an unset value as [`Reduction::None`].
    pub fn from_option(reduction: Option<Self>) -> Self {
        reduction.unwrap_or(Self::None)
    }

    /// Parse a reduction name, treating an unset name as [`Reduction::None`].
    pub fn parse(name: Option<&str>) -> LossResult<Self> {
        name.map_or(Ok(Self::None), str::parse)
    }

    /// Lowercase name of the reduction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sum => "sum",
            Self::Mean => "mean",
        }
    }

    /// Reduce `loss` through `primitives`.
    ///
    /// [`Reduction::None`] returns `loss` as is. `Sum` and `Mean` keep the rank
    /// and return a single element, i.e. a tensor of shape `[1; D]`.
    pub fn apply<B: Backend, P: LossPrimitives, const D: usize>(
        self,
        primitives: &P,
        loss: Tensor<B, D>,
    ) -> Tensor<B, D> {
        match self {
            Self::None => loss,
            Self::Sum => primitives.reduce_sum(loss).reshape([1usize; D]),
            Self::Mean => primitives.reduce_mean(loss).reshape([1usize; D]),
        }
    }
}

impl FromStr for Reduction {
    type Err = LossError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "none" => Ok(Self::None),
            "sum" => Ok(Self::Sum),
            "mean" => Ok(Self::Mean),
            other => Err(LossError::InvalidReduction {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
