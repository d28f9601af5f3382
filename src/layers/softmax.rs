use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// Softmax cross-entropy loss over a batch of class scores.
///
/// Scores are shifted by their row maximum before exponentiation for
/// numerical stability.
///
/// # Arguments
/// * `scores` - Class scores, of shape `(n, num_classes)`.
/// * `y` - Ground-truth labels, of shape `(n,)`, values in `[0, num_classes)`.
///
/// # Returns
/// The mean cross-entropy loss and the gradient with respect to `scores`.
pub fn softmax_loss(scores: ArrayView2<f32>, y: ArrayView1<usize>) -> (f32, Array2<f32>) {
    let n = scores.nrows();

    let maxes = scores.fold_axis(Axis(1), f32::NEG_INFINITY, |m, &v| m.max(v));
    let shifted = &scores - &maxes.insert_axis(Axis(1));
    let exp = shifted.mapv(f32::exp);
    let sums = exp.sum_axis(Axis(1));
    let mut probs = &exp / &sums.insert_axis(Axis(1));

    let mut loss = 0.0;
    for (i, &label) in y.iter().enumerate() {
        loss -= probs[[i, label]].ln();
        probs[[i, label]] -= 1.0;
    }

    let dscores = probs / n as f32;

    (loss / n as f32, dscores)
}
