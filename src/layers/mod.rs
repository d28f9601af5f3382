//! Layer kernels: each forward produces `(output, cache)`, each backward
//! consumes the upstream gradient plus the matching cache.

mod affine;
mod compose;
mod conv;
mod pool;
mod relu;
mod softmax;

pub use affine::{AffineCache, affine_backward, affine_forward};
pub use compose::{
    AffineReluCache, ConvReluPoolCache, affine_relu_backward, affine_relu_forward,
    conv_relu_pool_backward, conv_relu_pool_forward,
};
pub use conv::{ConvCache, ConvParam, conv_backward, conv_forward};
pub use pool::{PoolCache, PoolParam, max_pool_backward, max_pool_forward};
pub use relu::{ReluCache, relu_backward, relu_forward};
pub use softmax::softmax_loss;
