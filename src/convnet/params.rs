use ndarray::{Array1, Array2, Array4};

/// The named parameter tensors of a three-layer convnet.
///
/// Shapes are fixed at construction:
/// - `w1`: `(num_filters, channels, filter_size, filter_size)`, `b1`: `(num_filters,)`
/// - `w2`: `(num_filters * (h / 2) * (w / 2), hidden_dim)`, `b2`: `(hidden_dim,)`
/// - `w3`: `(hidden_dim, num_classes)`, `b3`: `(num_classes,)`
#[derive(Debug, Clone)]
pub struct ConvNetParams {
    pub w1: Array4<f32>,
    pub b1: Array1<f32>,
    pub w2: Array2<f32>,
    pub b2: Array1<f32>,
    pub w3: Array2<f32>,
    pub b3: Array1<f32>,
}

/// Gradients of the loss with respect to every parameter tensor; fields
/// mirror [`ConvNetParams`] in name and shape.
#[derive(Debug, Clone)]
pub struct ConvNetGrads {
    pub w1: Array4<f32>,
    pub b1: Array1<f32>,
    pub w2: Array2<f32>,
    pub b2: Array1<f32>,
    pub w3: Array2<f32>,
    pub b3: Array1<f32>,
}
