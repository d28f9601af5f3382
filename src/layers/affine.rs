use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Forward metadata of an affine layer, consumed by [`affine_backward`].
pub struct AffineCache {
    x: Array2<f32>,
    w: Array2<f32>,
}

/// Computes `x · w + b` for a batch of row vectors.
///
/// # Arguments
/// * `x` - The input batch, of shape `(n, d_in)`.
/// * `w` - The weights, of shape `(d_in, d_out)`.
/// * `b` - The biases, of shape `(d_out,)`.
///
/// # Returns
/// The layer output of shape `(n, d_out)` and the cache for the backward pass.
pub fn affine_forward(
    x: ArrayView2<f32>,
    w: ArrayView2<f32>,
    b: ArrayView1<f32>,
) -> (Array2<f32>, AffineCache) {
    let out = x.dot(&w) + &b;
    let cache = AffineCache {
        x: x.to_owned(),
        w: w.to_owned(),
    };

    (out, cache)
}

/// Computes the gradients of an affine layer.
///
/// # Arguments
/// * `dout` - The upstream gradient, of shape `(n, d_out)`.
/// * `cache` - The cache produced by the matching forward call.
///
/// # Returns
/// A tuple `(dx, dw, db)` with the same shapes as the forward inputs.
pub fn affine_backward(
    dout: ArrayView2<f32>,
    cache: &AffineCache,
) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
    let dx = dout.dot(&cache.w.t());
    let dw = cache.x.t().dot(&dout);
    let db = dout.sum_axis(Axis(0));

    (dx, dw, db)
}
