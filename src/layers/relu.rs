use ndarray::{Array, ArrayView, Dimension};

/// Forward metadata of a relu layer, consumed by [`relu_backward`].
pub struct ReluCache<D: Dimension> {
    x: Array<f32, D>,
}

/// Elementwise `max(0, x)`, for inputs of any dimensionality.
pub fn relu_forward<D: Dimension>(x: ArrayView<f32, D>) -> (Array<f32, D>, ReluCache<D>) {
    let out = x.mapv(|v| v.max(0.0));
    let cache = ReluCache { x: x.to_owned() };

    (out, cache)
}

/// Masks the upstream gradient wherever the cached input was non-positive.
pub fn relu_backward<D: Dimension>(dout: ArrayView<f32, D>, cache: &ReluCache<D>) -> Array<f32, D> {
    let mut dx = dout.to_owned();
    dx.zip_mut_with(&cache.x, |d, &x| {
        if x <= 0.0 {
            *d = 0.0;
        }
    });

    dx
}
