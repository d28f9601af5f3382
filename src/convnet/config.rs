/// Construction parameters of a [`ThreeLayerConvNet`](super::ThreeLayerConvNet).
#[derive(Debug, Clone, Copy)]
pub struct ConvNetConfig {
    /// Input image shape as `(channels, height, width)`.
    pub input_dim: (usize, usize, usize),
    /// Number of filters in the convolutional layer.
    pub num_filters: usize,
    /// Spatial size (height and width) of each filter; must be odd so that
    /// the fixed padding preserves the spatial dimensions.
    pub filter_size: usize,
    /// Width of the fully-connected hidden layer.
    pub hidden_dim: usize,
    /// Number of output classes.
    pub num_classes: usize,
    /// Standard deviation of the Gaussian weight initialization.
    pub weight_scale: f32,
    /// L2 regularization strength.
    pub reg: f32,
}

impl Default for ConvNetConfig {
    fn default() -> Self {
        Self {
            input_dim: (3, 32, 32),
            num_filters: 32,
            filter_size: 7,
            hidden_dim: 100,
            num_classes: 10,
            weight_scale: 1e-3,
            reg: 0.0,
        }
    }
}
