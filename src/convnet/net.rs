use ndarray::{Array1, Array2, Array4, ArrayView1, ArrayView4};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Normal;

use super::{ConvNetConfig, ConvNetGrads, ConvNetParams};
use crate::{
    MlErr, Result,
    layers::{
        AffineCache, AffineReluCache, ConvParam, ConvReluPoolCache, PoolParam, affine_backward,
        affine_forward, affine_relu_backward, affine_relu_forward, conv_relu_pool_backward,
        conv_relu_pool_forward, softmax_loss,
    },
};

/// A three-layer convolutional network:
///
/// `conv - relu - 2x2 max pool - affine - relu - affine - softmax`
///
/// Convolution stride is 1 with padding `(filter_size - 1) / 2`, so the
/// spatial dimensions are preserved; pooling halves them.
///
/// The network only evaluates: [`scores`](Self::scores) runs the forward
/// pass, [`loss`](Self::loss) additionally backpropagates and returns one
/// gradient per parameter tensor. Applying updates is the caller's job,
/// through [`params_mut`](Self::params_mut).
#[derive(Debug, Clone)]
pub struct ThreeLayerConvNet {
    params: ConvNetParams,
    input_dim: (usize, usize, usize),
    reg: f32,
}

struct ForwardCache {
    crp: ConvReluPoolCache,
    pool_dim: (usize, usize, usize, usize),
    hidden: AffineReluCache,
    out: AffineCache,
}

impl ThreeLayerConvNet {
    /// Allocates and initializes a new network.
    ///
    /// Weights are drawn from `N(0, weight_scale)`, biases start at zero.
    ///
    /// # Arguments
    /// * `cfg` - The network configuration.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// The initialized network, or an error if the configuration is
    /// degenerate (zero-sized dimension, even filter size, spatial dims the
    /// 2x2 pool cannot halve).
    pub fn new<R: Rng>(cfg: ConvNetConfig, rng: &mut R) -> Result<Self> {
        let (c, h, w) = cfg.input_dim;
        if c == 0 || h == 0 || w == 0 {
            return Err(MlErr::InvalidInput("input_dim has a zero dimension"));
        }
        if cfg.num_filters == 0 || cfg.hidden_dim == 0 || cfg.num_classes == 0 {
            return Err(MlErr::InvalidInput("layer widths must be positive"));
        }
        if cfg.filter_size == 0 || cfg.filter_size % 2 == 0 {
            return Err(MlErr::InvalidInput(
                "filter_size must be odd so padding preserves the spatial dims",
            ));
        }
        if h % 2 != 0 || w % 2 != 0 {
            return Err(MlErr::InvalidInput("2x2 pooling needs even spatial dims"));
        }

        let noise = Normal::new(0.0_f32, cfg.weight_scale)
            .map_err(|_| MlErr::InvalidInput("weight_scale must be finite and non-negative"))?;

        let fs = cfg.filter_size;
        let pooled = cfg.num_filters * (h / 2) * (w / 2);
        let params = ConvNetParams {
            w1: Array4::random_using((cfg.num_filters, c, fs, fs), noise, rng),
            b1: Array1::zeros(cfg.num_filters),
            w2: Array2::random_using((pooled, cfg.hidden_dim), noise, rng),
            b2: Array1::zeros(cfg.hidden_dim),
            w3: Array2::random_using((cfg.hidden_dim, cfg.num_classes), noise, rng),
            b3: Array1::zeros(cfg.num_classes),
        };

        Ok(Self {
            params,
            input_dim: cfg.input_dim,
            reg: cfg.reg,
        })
    }

    /// Computes class scores for a batch of images (inference mode).
    ///
    /// # Arguments
    /// * `x` - The input batch, of shape `(n, channels, height, width)`.
    ///
    /// # Returns
    /// The class scores, of shape `(n, num_classes)`.
    pub fn scores(&self, x: ArrayView4<f32>) -> Result<Array2<f32>> {
        self.check_input(x)?;
        let (scores, _) = self.forward(x);

        Ok(scores)
    }

    /// Computes the softmax cross-entropy loss plus the L2 penalty of every
    /// weight tensor, and backpropagates through the layer sequence in
    /// reverse to produce one gradient per parameter.
    ///
    /// # Arguments
    /// * `x` - The input batch, of shape `(n, channels, height, width)`.
    /// * `y` - Ground-truth labels, of shape `(n,)`.
    ///
    /// # Returns
    /// The scalar loss and the gradients, shaped like the parameters.
    pub fn loss(&self, x: ArrayView4<f32>, y: ArrayView1<usize>) -> Result<(f32, ConvNetGrads)> {
        self.check_input(x)?;
        let n = x.dim().0;
        if y.len() != n {
            return Err(MlErr::ShapeMismatch {
                what: "labels",
                got: y.len(),
                expected: n,
            });
        }

        let p = &self.params;
        let (scores, cache) = self.forward(x);

        let (mut loss, dscores) = softmax_loss(scores.view(), y);
        loss += 0.5
            * self.reg
            * (p.w1.mapv(|v| v.powi(2)).sum()
                + p.w2.mapv(|v| v.powi(2)).sum()
                + p.w3.mapv(|v| v.powi(2)).sum());

        let (dhidden, mut dw3, db3) = affine_backward(dscores.view(), &cache.out);
        dw3.scaled_add(self.reg, &p.w3);

        let (dflat, mut dw2, db2) = affine_relu_backward(dhidden.view(), &cache.hidden);
        dw2.scaled_add(self.reg, &p.w2);

        let dpool = dflat.into_shape_with_order(cache.pool_dim).unwrap();
        let (_dx, mut dw1, db1) = conv_relu_pool_backward(dpool.view(), &cache.crp);
        dw1.scaled_add(self.reg, &p.w1);

        let grads = ConvNetGrads {
            w1: dw1,
            b1: db1,
            w2: dw2,
            b2: db2,
            w3: dw3,
            b3: db3,
        };

        Ok((loss, grads))
    }

    /// The parameter tensors.
    pub fn params(&self) -> &ConvNetParams {
        &self.params
    }

    /// Mutable access to the parameter tensors, for external optimizers.
    pub fn params_mut(&mut self) -> &mut ConvNetParams {
        &mut self.params
    }

    fn forward(&self, x: ArrayView4<f32>) -> (Array2<f32>, ForwardCache) {
        let p = &self.params;
        let filter_size = p.w1.dim().2;
        let conv_param = ConvParam {
            stride: 1,
            pad: (filter_size - 1) / 2,
        };
        let pool_param = PoolParam {
            height: 2,
            width: 2,
            stride: 2,
        };

        let (pooled, crp) =
            conv_relu_pool_forward(x, p.w1.view(), p.b1.view(), conv_param, pool_param);
        let pool_dim = pooled.dim();
        let flat_len = pool_dim.1 * pool_dim.2 * pool_dim.3;
        let flat = pooled.into_shape_with_order((pool_dim.0, flat_len)).unwrap();

        let (hidden_out, hidden) = affine_relu_forward(flat.view(), p.w2.view(), p.b2.view());
        let (scores, out) = affine_forward(hidden_out.view(), p.w3.view(), p.b3.view());

        (scores, ForwardCache {
            crp,
            pool_dim,
            hidden,
            out,
        })
    }

    fn check_input(&self, x: ArrayView4<f32>) -> Result<()> {
        let (_, c, h, w) = x.dim();
        let (ec, eh, ew) = self.input_dim;
        if c != ec {
            return Err(MlErr::ShapeMismatch {
                what: "channels",
                got: c,
                expected: ec,
            });
        }
        if h != eh || w != ew {
            return Err(MlErr::ShapeMismatch {
                what: "spatial dims",
                got: h * w,
                expected: eh * ew,
            });
        }

        Ok(())
    }
}
