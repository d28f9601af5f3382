use log::info;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Normal;

use super::{LossStrategy, SoftmaxCrossEntropy, Svm};
use crate::{MlErr, Result};

/// Hyperparameters of a minibatch SGD run.
#[derive(Debug, Clone, Copy)]
pub struct SgdConfig {
    pub learning_rate: f32,
    pub reg: f32,
    pub num_iters: usize,
    pub batch_size: usize,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            reg: 1e-5,
            num_iters: 100,
            batch_size: 200,
        }
    }
}

/// A linear classifier trained by minibatch stochastic gradient descent.
///
/// The loss strategy is injected at construction; training and prediction
/// are otherwise identical across variants.
pub struct LinearClassifier<S: LossStrategy> {
    weights: Option<Array2<f32>>,
    strategy: S,
}

/// Linear classifier with the multiclass SVM hinge loss.
pub type LinearSvm = LinearClassifier<Svm>;

/// Linear classifier with the softmax cross-entropy loss.
pub type SoftmaxClassifier = LinearClassifier<SoftmaxCrossEntropy>;

impl LinearClassifier<Svm> {
    /// Returns a classifier using the multiclass SVM hinge loss.
    pub fn svm() -> Self {
        Self::new(Svm::new())
    }
}

impl LinearClassifier<SoftmaxCrossEntropy> {
    /// Returns a classifier using the softmax cross-entropy loss.
    pub fn softmax() -> Self {
        Self::new(SoftmaxCrossEntropy::new())
    }
}

impl<S: LossStrategy> LinearClassifier<S> {
    /// Returns a new `LinearClassifier` with the given loss strategy and no
    /// weights; the weight matrix is allocated on the first `train` call.
    pub fn new(strategy: S) -> Self {
        Self {
            weights: None,
            strategy,
        }
    }

    /// Trains the classifier with minibatch stochastic gradient descent.
    ///
    /// On the first call the weight matrix is initialized to small Gaussian
    /// noise, with the class count inferred as `max(y) + 1`. Each iteration
    /// samples `batch_size` rows **with replacement**, computes the loss and
    /// gradient through the strategy and takes one descent step. Progress is
    /// logged every 100 iterations at info level.
    ///
    /// # Arguments
    /// * `x` - Training data, of shape `(n, num_features)`.
    /// * `y` - Training labels, of shape `(n,)`, values in `[0, num_classes)`.
    /// * `cfg` - The SGD hyperparameters.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// The loss history, one entry per iteration.
    pub fn train<R: Rng>(
        &mut self,
        x: ArrayView2<f32>,
        y: ArrayView1<usize>,
        cfg: &SgdConfig,
        rng: &mut R,
    ) -> Result<Vec<f32>> {
        let (n, dim) = x.dim();
        if n == 0 {
            return Err(MlErr::InvalidInput("training set is empty"));
        }
        if y.len() != n {
            return Err(MlErr::ShapeMismatch {
                what: "labels",
                got: y.len(),
                expected: n,
            });
        }
        if cfg.batch_size == 0 {
            return Err(MlErr::InvalidInput("batch_size must be positive"));
        }

        if self.weights.is_none() {
            // labels are assumed to be 0..=max
            let num_classes = y.iter().copied().max().unwrap_or(0) + 1;
            self.weights = Some(init_weights(num_classes, dim, rng)?);
        }

        let w = self.weights.as_mut().unwrap();
        if w.ncols() != dim {
            return Err(MlErr::ShapeMismatch {
                what: "features",
                got: dim,
                expected: w.ncols(),
            });
        }

        let mut history = Vec::with_capacity(cfg.num_iters);
        for it in 0..cfg.num_iters {
            let idx: Vec<usize> = (0..cfg.batch_size).map(|_| rng.random_range(0..n)).collect();
            let x_batch = x.select(Axis(0), &idx);
            let y_batch = y.select(Axis(0), &idx);

            let (loss, grad) =
                self.strategy
                    .compute(w.view(), x_batch.view(), y_batch.view(), cfg.reg);

            w.scaled_add(-cfg.learning_rate, &grad);
            history.push(loss);

            if it % 100 == 0 {
                info!("iteration {it} / {}: loss {loss}", cfg.num_iters);
            }
        }

        Ok(history)
    }

    /// Predicts a class label for every row of `x`.
    ///
    /// # Returns
    /// The argmax class index per row, or `MlErr::NotTrained` if `train` has
    /// never been called.
    pub fn predict(&self, x: ArrayView2<f32>) -> Result<Array1<usize>> {
        let w = self.weights.as_ref().ok_or(MlErr::NotTrained)?;
        if x.ncols() != w.ncols() {
            return Err(MlErr::ShapeMismatch {
                what: "features",
                got: x.ncols(),
                expected: w.ncols(),
            });
        }

        let scores = x.dot(&w.t());
        let labels: Vec<usize> = scores.rows().into_iter().map(argmax).collect();

        Ok(Array1::from_vec(labels))
    }

    /// The weight matrix, if training has initialized it.
    pub fn weights(&self) -> Option<&Array2<f32>> {
        self.weights.as_ref()
    }
}

fn init_weights<R: Rng>(num_classes: usize, dim: usize, rng: &mut R) -> Result<Array2<f32>> {
    let noise = Normal::new(0.0_f32, 1.0)
        .map_err(|_| MlErr::InvalidInput("degenerate weight distribution"))?;

    Ok(Array2::random_using((num_classes, dim), noise, rng) * 0.001)
}

fn argmax(row: ArrayView1<f32>) -> usize {
    let mut best = 0;
    let mut best_val = f32::NEG_INFINITY;
    for (i, &v) in row.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best = i;
        }
    }

    best
}
