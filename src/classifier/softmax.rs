use ndarray::{Array2, ArrayView1, ArrayView2};

use super::LossStrategy;
use crate::layers::softmax_loss;

/// Softmax cross-entropy loss, vectorized over the minibatch.
#[derive(Default, Clone, Copy)]
pub struct SoftmaxCrossEntropy;

impl SoftmaxCrossEntropy {
    /// Returns a new `SoftmaxCrossEntropy`.
    pub fn new() -> Self {
        Self
    }
}

impl LossStrategy for SoftmaxCrossEntropy {
    fn compute(
        &self,
        w: ArrayView2<f32>,
        x: ArrayView2<f32>,
        y: ArrayView1<usize>,
        reg: f32,
    ) -> (f32, Array2<f32>) {
        let scores = x.dot(&w.t());
        let (data_loss, dscores) = softmax_loss(scores.view(), y);

        let loss = data_loss + 0.5 * reg * w.mapv(|v| v.powi(2)).sum();

        let mut dw = dscores.t().dot(&x);
        dw.scaled_add(reg, &w);

        (loss, dw)
    }
}
