//! Classification and regression loss criteria for the Burn deep learning framework.
//!
//! ## Criteria
//!
//! ### Classification
//! - **[`CrossEntropyLoss`]**: log-softmax and negative log-likelihood in one fused step
//! - **[`NllLoss`]**: negative log-likelihood over log-probabilities
//!
//! ### Regression and ranking
//! - **[`MseLoss`]**: elementwise squared difference
//! - **[`MarginRankingLoss`]**: hinge on the difference of two scores
//!
//! ## Shapes
//!
//! Classification criteria take `[N, C]`, `[N, C, H]` or `[N, C, H, W]` inputs with
//! targets of shape `[N]`, `[N, H]` or `[N, H, W]`. Spatial inputs are permuted so the
//! class axis comes last and flattened to `[N * H * W, C]`; with `Reduction::None`
//! the per-row losses are reshaped back to the target's shape. Rank 5 and above is
//! rejected with [`LossError::UnsupportedRank`].
//!
//! Regression criteria work elementwise; their operands must have the same rank
//! and broadcast along size-1 dimensions.
//!
//! ## Inside a model
//!
//! Criteria hold no parameters. A `#[derive(Module)]` struct carries one as
//! `burn::module::Ignored<CrossEntropyLoss>`, which keeps it out of records and
//! parameter counts.
//!
//! ## Reduction
//!
//! Every criterion is configured with a [`Reduction`]: `none` returns the unreduced
//! losses, `sum` and `mean` reduce over all elements and return a single element
//! at the output rank.
//!
//! ## Usage Example
//!
//! ```rust
//! use burn::{backend::NdArray, prelude::*};
//! use nn_losses::{CrossEntropyLossConfig, LossResult, Reduction};
//!
//! fn pixel_losses(device: &<NdArray as Backend>::Device) -> LossResult<Tensor<NdArray, 3>> {
//!     let loss = CrossEntropyLossConfig::new()
//!         .with_reduction(Some(Reduction::None))
//!         .init()?;
//!
//!     let logits = Tensor::<NdArray, 4>::zeros([2, 5, 8, 8], device);
//!     let target = Tensor::<NdArray, 3, Int>::zeros([2, 8, 8], device);
//!     loss.forward(logits, target)
//! }
//! ```

mod canonical;
mod cross_entropy;
mod error;
mod margin_ranking;
mod mse;
mod nll;
mod reduction;

pub use cross_entropy::{CrossEntropyLoss, CrossEntropyLossConfig};
pub use error::{LossError, LossResult};
pub use margin_ranking::{MarginRankingLoss, MarginRankingLossConfig};
pub use mse::{MseLoss, MseLossConfig};
pub use nll::{NllLoss, NllLossConfig};
pub use reduction::Reduction;

// Primitive tables, for callers that inject their own.
pub use loss_ops::{LossPrimitives, RecordingPrimitives, TensorPrimitives};
