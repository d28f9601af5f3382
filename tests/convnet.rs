mod common;

use common::{assert_grads_close, numeric_grad};
use ml_classifiers::MlErr;
use ml_classifiers::convnet::{ConvNetConfig, ThreeLayerConvNet};
use ndarray::{Array1, Array4};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_batch(n: usize, dim: (usize, usize, usize), rng: &mut StdRng) -> Array4<f32> {
    Array4::from_shape_fn((n, dim.0, dim.1, dim.2), |_| {
        (rng.random::<f32>() - 0.5) * 2.0
    })
}

#[test]
fn scores_have_batch_by_classes_shape() {
    let cfg = ConvNetConfig {
        input_dim: (3, 16, 16),
        num_filters: 4,
        filter_size: 3,
        hidden_dim: 8,
        num_classes: 5,
        weight_scale: 1e-2,
        reg: 0.0,
    };
    let mut rng = StdRng::seed_from_u64(3);
    let net = ThreeLayerConvNet::new(cfg, &mut rng).unwrap();

    let x = random_batch(2, cfg.input_dim, &mut rng);
    let scores = net.scores(x.view()).unwrap();

    assert_eq!(scores.dim(), (2, 5));
}

#[test]
fn gradients_mirror_parameter_shapes() {
    let cfg = ConvNetConfig {
        input_dim: (3, 16, 16),
        num_filters: 4,
        filter_size: 3,
        hidden_dim: 8,
        num_classes: 5,
        weight_scale: 1e-2,
        reg: 0.0,
    };
    let mut rng = StdRng::seed_from_u64(5);
    let net = ThreeLayerConvNet::new(cfg, &mut rng).unwrap();

    // w2 maps the flattened pooled conv output: 4 filters * 8 * 8
    assert_eq!(net.params().w2.dim(), (256, 8));

    let x = random_batch(2, cfg.input_dim, &mut rng);
    let y = Array1::from_vec(vec![0_usize, 3]);
    let (loss, grads) = net.loss(x.view(), y.view()).unwrap();

    assert!(loss.is_finite());
    assert!(loss >= 0.0);

    let p = net.params();
    assert_eq!(grads.w1.dim(), p.w1.dim());
    assert_eq!(grads.b1.dim(), p.b1.dim());
    assert_eq!(grads.w2.dim(), p.w2.dim());
    assert_eq!(grads.b2.dim(), p.b2.dim());
    assert_eq!(grads.w3.dim(), p.w3.dim());
    assert_eq!(grads.b3.dim(), p.b3.dim());
}

fn tiny_net(reg: f32, seed: u64) -> (ThreeLayerConvNet, Array4<f32>, Array1<usize>) {
    let cfg = ConvNetConfig {
        input_dim: (3, 4, 4),
        num_filters: 2,
        filter_size: 3,
        hidden_dim: 4,
        num_classes: 3,
        weight_scale: 0.1,
        reg,
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let mut net = ThreeLayerConvNet::new(cfg, &mut rng).unwrap();

    // shift the relu pre-activations away from zero so the finite-difference
    // checks are well conditioned in f32
    net.params_mut().b1.fill(1.0);
    net.params_mut().b2.fill(1.0);

    let x = random_batch(2, cfg.input_dim, &mut rng);
    let y = Array1::from_vec(vec![0_usize, 2]);

    (net, x, y)
}

#[test]
fn every_parameter_gradient_matches_finite_differences() {
    let (net, x, y) = tiny_net(0.0, 13);
    let (_, grads) = net.loss(x.view(), y.view()).unwrap();
    let eps = 1e-3;
    let loss_with = |m: &ThreeLayerConvNet| m.loss(x.view(), y.view()).unwrap().0;

    let num_w1 = numeric_grad(&net.params().w1, |p| {
        let mut m = net.clone();
        m.params_mut().w1 = p.clone();
        loss_with(&m)
    }, eps);
    assert_grads_close(&grads.w1, &num_w1, 1e-3, 5e-2);

    let num_b1 = numeric_grad(&net.params().b1, |p| {
        let mut m = net.clone();
        m.params_mut().b1 = p.clone();
        loss_with(&m)
    }, eps);
    assert_grads_close(&grads.b1, &num_b1, 1e-3, 5e-2);

    let num_w2 = numeric_grad(&net.params().w2, |p| {
        let mut m = net.clone();
        m.params_mut().w2 = p.clone();
        loss_with(&m)
    }, eps);
    assert_grads_close(&grads.w2, &num_w2, 1e-3, 5e-2);

    let num_b2 = numeric_grad(&net.params().b2, |p| {
        let mut m = net.clone();
        m.params_mut().b2 = p.clone();
        loss_with(&m)
    }, eps);
    assert_grads_close(&grads.b2, &num_b2, 1e-3, 5e-2);

    let num_w3 = numeric_grad(&net.params().w3, |p| {
        let mut m = net.clone();
        m.params_mut().w3 = p.clone();
        loss_with(&m)
    }, eps);
    assert_grads_close(&grads.w3, &num_w3, 1e-3, 5e-2);

    let num_b3 = numeric_grad(&net.params().b3, |p| {
        let mut m = net.clone();
        m.params_mut().b3 = p.clone();
        loss_with(&m)
    }, eps);
    assert_grads_close(&grads.b3, &num_b3, 1e-3, 5e-2);
}

#[test]
fn regularized_weight_gradient_includes_penalty_term() {
    let (net, x, y) = tiny_net(0.7, 17);
    let (_, grads) = net.loss(x.view(), y.view()).unwrap();

    let num_w2 = numeric_grad(
        &net.params().w2,
        |p| {
            let mut m = net.clone();
            m.params_mut().w2 = p.clone();
            m.loss(x.view(), y.view()).unwrap().0
        },
        1e-3,
    );

    assert_grads_close(&grads.w2, &num_w2, 1e-3, 5e-2);
}

#[test]
fn larger_reg_strictly_increases_loss() {
    // same seed twice, so the sampled weights are identical
    let (low_net, x, y) = tiny_net(0.1, 23);
    let (high_net, _, _) = tiny_net(1.0, 23);

    let (low, _) = low_net.loss(x.view(), y.view()).unwrap();
    let (high, _) = high_net.loss(x.view(), y.view()).unwrap();

    assert!(high > low);
}

#[test]
fn mismatched_input_shape_is_rejected() {
    let (net, _, _) = tiny_net(0.0, 29);
    let mut rng = StdRng::seed_from_u64(31);
    let wrong = random_batch(1, (2, 4, 4), &mut rng);

    assert!(matches!(
        net.loss(wrong.view(), Array1::from_vec(vec![0_usize]).view()),
        Err(MlErr::ShapeMismatch { what: "channels", .. })
    ));
}

#[test]
fn degenerate_configs_are_rejected() {
    let mut rng = StdRng::seed_from_u64(37);

    let even_filter = ConvNetConfig {
        filter_size: 4,
        ..ConvNetConfig::default()
    };
    assert!(ThreeLayerConvNet::new(even_filter, &mut rng).is_err());

    let odd_spatial = ConvNetConfig {
        input_dim: (3, 15, 16),
        ..ConvNetConfig::default()
    };
    assert!(ThreeLayerConvNet::new(odd_spatial, &mut rng).is_err());

    let no_classes = ConvNetConfig {
        num_classes: 0,
        ..ConvNetConfig::default()
    };
    assert!(ThreeLayerConvNet::new(no_classes, &mut rng).is_err());
}
