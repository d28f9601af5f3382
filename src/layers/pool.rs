use ndarray::{Array4, ArrayView4, s};

/// Window geometry of a max-pooling layer.
#[derive(Debug, Clone, Copy)]
pub struct PoolParam {
    pub height: usize,
    pub width: usize,
    pub stride: usize,
}

/// Forward metadata of a max-pooling layer, consumed by [`max_pool_backward`].
pub struct PoolCache {
    x: Array4<f32>,
    param: PoolParam,
}

/// Max-pools each channel of a batch of images.
///
/// # Arguments
/// * `x` - The input batch, of shape `(n, c, h, w)`.
/// * `param` - Pooling window geometry.
///
/// # Returns
/// The pooled output of shape `(n, c, 1 + (h - height) / stride, 1 + (w - width) / stride)`
/// and the cache for the backward pass.
pub fn max_pool_forward(x: ArrayView4<f32>, param: PoolParam) -> (Array4<f32>, PoolCache) {
    let (n, c, h, w) = x.dim();
    let PoolParam {
        height,
        width,
        stride,
    } = param;

    let h_out = 1 + (h - height) / stride;
    let w_out = 1 + (w - width) / stride;
    let mut out = Array4::<f32>::zeros((n, c, h_out, w_out));

    for i_n in 0..n {
        for i_c in 0..c {
            for i in 0..h_out {
                for j in 0..w_out {
                    let (hs, ws) = (i * stride, j * stride);
                    let window = x.slice(s![i_n, i_c, hs..hs + height, ws..ws + width]);
                    out[[i_n, i_c, i, j]] =
                        window.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                }
            }
        }
    }

    let cache = PoolCache {
        x: x.to_owned(),
        param,
    };

    (out, cache)
}

/// Routes each upstream gradient value to the argmax position of its window.
pub fn max_pool_backward(dout: ArrayView4<f32>, cache: &PoolCache) -> Array4<f32> {
    let (n, c, h_out, w_out) = dout.dim();
    let PoolParam {
        height,
        width,
        stride,
    } = cache.param;

    let mut dx = Array4::<f32>::zeros(cache.x.raw_dim());

    for i_n in 0..n {
        for i_c in 0..c {
            for i in 0..h_out {
                for j in 0..w_out {
                    let (hs, ws) = (i * stride, j * stride);
                    let window = cache.x.slice(s![i_n, i_c, hs..hs + height, ws..ws + width]);

                    // first occurrence wins on ties, like the cached forward max
                    let mut best = (0, 0);
                    let mut best_val = f32::NEG_INFINITY;
                    for a in 0..height {
                        for b in 0..width {
                            if window[[a, b]] > best_val {
                                best_val = window[[a, b]];
                                best = (a, b);
                            }
                        }
                    }

                    dx[[i_n, i_c, hs + best.0, ws + best.1]] += dout[[i_n, i_c, i, j]];
                }
            }
        }
    }

    dx
}
