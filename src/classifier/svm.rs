use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::LossStrategy;

/// Multiclass SVM hinge loss, vectorized over the minibatch.
#[derive(Default, Clone, Copy)]
pub struct Svm;

impl Svm {
    /// Returns a new `Svm`.
    pub fn new() -> Self {
        Self
    }
}

impl LossStrategy for Svm {
    fn compute(
        &self,
        w: ArrayView2<f32>,
        x: ArrayView2<f32>,
        y: ArrayView1<usize>,
        reg: f32,
    ) -> (f32, Array2<f32>) {
        let n = x.nrows();

        let scores = x.dot(&w.t());
        let correct = Array1::from_shape_fn(n, |i| scores[[i, y[i]]]);

        // margin 1, zeroed on the correct class
        let mut margins = &scores - &correct.insert_axis(Axis(1)) + 1.0;
        margins.mapv_inplace(|m| m.max(0.0));
        for (i, &label) in y.iter().enumerate() {
            margins[[i, label]] = 0.0;
        }

        let data_loss = margins.sum() / n as f32;
        let loss = data_loss + 0.5 * reg * w.mapv(|v| v.powi(2)).sum();

        // each positive margin contributes x_i to its class row and -x_i to
        // the correct class row
        let mut indicator = margins.mapv(|m| if m > 0.0 { 1.0 } else { 0.0 });
        let row_counts = indicator.sum_axis(Axis(1));
        for (i, &label) in y.iter().enumerate() {
            indicator[[i, label]] = -row_counts[i];
        }

        let mut dw = indicator.t().dot(&x) / n as f32;
        dw.scaled_add(reg, &w);

        (loss, dw)
    }
}
