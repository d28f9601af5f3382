use ndarray::{Array2, ArrayView1, ArrayView2};

/// Abstraction over the loss computed on a minibatch by a linear classifier.
///
/// This trait is the classifier's single policy boundary: the training loop
/// and prediction are identical across variants, and only the loss (and its
/// gradient) differ. Concrete strategies are injected at construction.
pub trait LossStrategy {
    /// Computes the scalar loss and its gradient with respect to the weights.
    ///
    /// # Arguments
    /// * `w` - The weight matrix, of shape `(num_classes, num_features)`.
    /// * `x` - A minibatch, of shape `(batch, num_features)`.
    /// * `y` - The minibatch labels, values in `[0, num_classes)`.
    /// * `reg` - L2 regularization strength.
    ///
    /// # Returns
    /// The loss and a gradient matrix with the same shape as `w`.
    fn compute(
        &self,
        w: ArrayView2<f32>,
        x: ArrayView2<f32>,
        y: ArrayView1<usize>,
        reg: f32,
    ) -> (f32, Array2<f32>);
}
