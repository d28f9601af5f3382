use ndarray::{Array1, Array4, ArrayView1, ArrayView4, Axis, s};

/// Spatial parameters of a convolution.
#[derive(Debug, Clone, Copy)]
pub struct ConvParam {
    pub stride: usize,
    pub pad: usize,
}

/// Forward metadata of a convolution layer, consumed by [`conv_backward`].
pub struct ConvCache {
    x_pad: Array4<f32>,
    w: Array4<f32>,
    param: ConvParam,
    in_spatial: (usize, usize),
}

/// Convolves a batch of images with a filter bank.
///
/// # Arguments
/// * `x` - The input batch, of shape `(n, c, h, w)`.
/// * `w` - The filters, of shape `(f, c, fh, fw)`.
/// * `b` - One bias per filter, of shape `(f,)`.
/// * `param` - Stride and zero-padding.
///
/// # Returns
/// The output of shape `(n, f, 1 + (h + 2*pad - fh) / stride, 1 + (w + 2*pad - fw) / stride)`
/// and the cache for the backward pass.
pub fn conv_forward(
    x: ArrayView4<f32>,
    w: ArrayView4<f32>,
    b: ArrayView1<f32>,
    param: ConvParam,
) -> (Array4<f32>, ConvCache) {
    let (n, c, h, wd) = x.dim();
    let (f, _, fh, fw) = w.dim();
    let ConvParam { stride, pad } = param;

    let mut x_pad = Array4::<f32>::zeros((n, c, h + 2 * pad, wd + 2 * pad));
    x_pad
        .slice_mut(s![.., .., pad..pad + h, pad..pad + wd])
        .assign(&x);

    let h_out = 1 + (h + 2 * pad - fh) / stride;
    let w_out = 1 + (wd + 2 * pad - fw) / stride;
    let mut out = Array4::<f32>::zeros((n, f, h_out, w_out));

    for i_n in 0..n {
        for i_f in 0..f {
            let filter = w.slice(s![i_f, .., .., ..]);
            for i in 0..h_out {
                for j in 0..w_out {
                    let (hs, ws) = (i * stride, j * stride);
                    let window = x_pad.slice(s![i_n, .., hs..hs + fh, ws..ws + fw]);
                    out[[i_n, i_f, i, j]] = (&window * &filter).sum() + b[i_f];
                }
            }
        }
    }

    let cache = ConvCache {
        x_pad,
        w: w.to_owned(),
        param,
        in_spatial: (h, wd),
    };

    (out, cache)
}

/// Computes the gradients of a convolution layer.
///
/// # Arguments
/// * `dout` - The upstream gradient, of shape `(n, f, h_out, w_out)`.
/// * `cache` - The cache produced by the matching forward call.
///
/// # Returns
/// A tuple `(dx, dw, db)` with the same shapes as the forward inputs.
pub fn conv_backward(
    dout: ArrayView4<f32>,
    cache: &ConvCache,
) -> (Array4<f32>, Array4<f32>, Array1<f32>) {
    let (n, f, h_out, w_out) = dout.dim();
    let (_, _, fh, fw) = cache.w.dim();
    let ConvParam { stride, pad } = cache.param;

    let mut dx_pad = Array4::<f32>::zeros(cache.x_pad.raw_dim());
    let mut dw = Array4::<f32>::zeros(cache.w.raw_dim());
    let db = dout
        .sum_axis(Axis(3))
        .sum_axis(Axis(2))
        .sum_axis(Axis(0));

    for i_n in 0..n {
        for i_f in 0..f {
            for i in 0..h_out {
                for j in 0..w_out {
                    let v = dout[[i_n, i_f, i, j]];
                    let (hs, ws) = (i * stride, j * stride);

                    let window = cache.x_pad.slice(s![i_n, .., hs..hs + fh, ws..ws + fw]);
                    dw.slice_mut(s![i_f, .., .., ..]).scaled_add(v, &window);

                    dx_pad
                        .slice_mut(s![i_n, .., hs..hs + fh, ws..ws + fw])
                        .scaled_add(v, &cache.w.slice(s![i_f, .., .., ..]));
                }
            }
        }
    }

    let (h, wd) = cache.in_spatial;
    let dx = dx_pad.slice(s![.., .., pad..pad + h, pad..pad + wd]).to_owned();

    (dx, dw, db)
}
