//! Fused softmax cross-entropy over sparse (integer) labels.
//!
//! For a row `x` with true class `c`:
//! ```text
//! loss = -x[c] + log(Σ_j exp(x[j]))
//! ```
//! The log-sum-exp goes through Burn's `log_softmax`, which subtracts the row
//! maximum first, so large logits do not overflow.

use burn::{prelude::*, tensor::activation::log_softmax};

use crate::CLASS_AXIS;

/// Compute softmax probabilities and the per-row cross-entropy in one pass.
///
/// `depth` is the number of classes and must equal the width of `logits`.
///
/// # Shapes
///
/// - logits: `[rows, depth]`
/// - labels: `[rows]`
/// - output: (`[rows, depth]`, `[rows]`)
///
/// # Panics
///
/// If the width of `logits` differs from `depth`, or if `labels` does not hold
/// exactly one label per row of `logits`.
pub fn sparse_softmax_cross_entropy<B: Backend>(
    logits: Tensor<B, 2>,
    labels: Tensor<B, 1, Int>,
    depth: usize,
) -> (Tensor<B, 2>, Tensor<B, 1>) {
    let [rows, classes] = logits.dims();
    assert_eq!(
        classes, depth,
        "Logits width ({classes}) must match the class depth ({depth})"
    );
    let [label_rows] = labels.dims();
    assert_eq!(
        label_rows, rows,
        "Label count ({label_rows}) must match logit rows ({rows})"
    );

    let log_probs = log_softmax(logits, CLASS_AXIS);
    let prob = log_probs.clone().exp();

    let index = labels.reshape([rows, 1]);
    let loss = log_probs
        .gather(CLASS_AXIS, index)
        .squeeze::<1>(CLASS_AXIS)
        .neg();

    (prob, loss)
}

#[cfg(test)]
mod tests {
    use burn::{
        backend::{ndarray::NdArray, Autodiff},
        tensor::{ops::FloatElem, TensorData, Tolerance, Transaction},
    };

    use super::*;

    type TestBackend = Autodiff<NdArray<f32>>;
    type FT = FloatElem<TestBackend>;

    #[test]
    fn sparse_xent_returns_probabilities_and_row_losses() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_data(
            TensorData::from([[0.0, 0.0], [2.0, 0.0]]),
            &device,
        );
        let labels = Tensor::<TestBackend, 1, Int>::from_data(TensorData::from([0, 1]), &device);

        let (prob, loss) = sparse_softmax_cross_entropy(logits, labels, 2);

        let [prob_data, loss_data] = Transaction::default()
            .register(prob)
            .register(loss)
            .execute()
            .try_into()
            .expect("Correct amount of tensor data");

        // softmax([2, 0]) = [0.8807971, 0.1192029]
        prob_data.assert_approx_eq::<FT>(
            &TensorData::from([[0.5, 0.5], [0.880_797_1, 0.119_202_9]]),
            Tolerance::default(),
        );
        // -log(0.5) and -log(0.1192029)
        loss_data.assert_approx_eq::<FT>(
            &TensorData::from([0.693_147_2, 2.126_928]),
            Tolerance::default(),
        );
    }

    #[test]
    fn sparse_xent_large_logits_stay_finite() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_data(
            TensorData::from([[1000.0, 0.0, -1000.0]]),
            &device,
        );
        let labels = Tensor::<TestBackend, 1, Int>::from_data(TensorData::from([1]), &device);

        let (_, loss) = sparse_softmax_cross_entropy(logits, labels, 3);

        loss.into_data()
            .assert_approx_eq::<FT>(&TensorData::from([1000.0]), Tolerance::default());
    }

    #[test]
    fn sparse_xent_gradient_is_softmax_minus_one_hot() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_data(
            TensorData::from([[0.0, 0.0], [2.0, 0.0]]),
            &device,
        )
        .require_grad();
        let labels = Tensor::<TestBackend, 1, Int>::from_data(TensorData::from([0, 1]), &device);

        let (_, loss) = sparse_softmax_cross_entropy(logits.clone(), labels, 2);
        let grads = loss.sum().backward();
        let grad = logits.grad(&grads).expect("logits require grad");

        grad.into_data().assert_approx_eq::<FT>(
            &TensorData::from([[-0.5, 0.5], [0.880_797_1, -0.880_797_1]]),
            Tolerance::default(),
        );
    }

    #[test]
    #[should_panic = "Logits width (2) must match the class depth (3)"]
    fn sparse_xent_wrong_depth_panics() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::zeros([1, 2], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_data(TensorData::from([0]), &device);

        let _ = sparse_softmax_cross_entropy(logits, labels, 3);
    }

    #[test]
    #[should_panic = "Label count (1) must match logit rows (2)"]
    fn sparse_xent_missing_labels_panics() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::zeros([2, 3], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_data(TensorData::from([0]), &device);

        let _ = sparse_softmax_cross_entropy(logits, labels, 3);
    }
}
