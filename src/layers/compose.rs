//! Composite layers used by the convnet: affine + relu, and
//! conv + relu + 2x2 max pool.

use ndarray::{Array1, Array2, Array4, ArrayView1, ArrayView2, ArrayView4, Ix2, Ix4};

use super::{
    AffineCache, ConvCache, ConvParam, PoolCache, PoolParam, ReluCache, affine_backward,
    affine_forward, conv_backward, conv_forward, max_pool_backward, max_pool_forward,
    relu_backward, relu_forward,
};

pub struct AffineReluCache {
    affine: AffineCache,
    relu: ReluCache<Ix2>,
}

pub struct ConvReluPoolCache {
    conv: ConvCache,
    relu: ReluCache<Ix4>,
    pool: PoolCache,
}

/// An affine transform followed by a relu.
pub fn affine_relu_forward(
    x: ArrayView2<f32>,
    w: ArrayView2<f32>,
    b: ArrayView1<f32>,
) -> (Array2<f32>, AffineReluCache) {
    let (a, affine) = affine_forward(x, w, b);
    let (out, relu) = relu_forward(a.view());

    (out, AffineReluCache { affine, relu })
}

/// Backward pass for [`affine_relu_forward`]; returns `(dx, dw, db)`.
pub fn affine_relu_backward(
    dout: ArrayView2<f32>,
    cache: &AffineReluCache,
) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
    let da = relu_backward(dout, &cache.relu);
    affine_backward(da.view(), &cache.affine)
}

/// A convolution followed by a relu and a max pool.
pub fn conv_relu_pool_forward(
    x: ArrayView4<f32>,
    w: ArrayView4<f32>,
    b: ArrayView1<f32>,
    conv_param: ConvParam,
    pool_param: PoolParam,
) -> (Array4<f32>, ConvReluPoolCache) {
    let (a, conv) = conv_forward(x, w, b, conv_param);
    let (r, relu) = relu_forward(a.view());
    let (out, pool) = max_pool_forward(r.view(), pool_param);

    (out, ConvReluPoolCache { conv, relu, pool })
}

/// Backward pass for [`conv_relu_pool_forward`]; returns `(dx, dw, db)`.
pub fn conv_relu_pool_backward(
    dout: ArrayView4<f32>,
    cache: &ConvReluPoolCache,
) -> (Array4<f32>, Array4<f32>, Array1<f32>) {
    let dr = max_pool_backward(dout, &cache.pool);
    let da = relu_backward(dr.view(), &cache.relu);
    conv_backward(da.view(), &cache.conv)
}
