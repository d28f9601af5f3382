use ndarray::{Array, Dimension};

/// Centered finite-difference gradient of `f` with respect to `param`.
pub fn numeric_grad<D, F>(param: &Array<f32, D>, mut f: F, eps: f32) -> Array<f32, D>
where
    D: Dimension,
    F: FnMut(&Array<f32, D>) -> f32,
{
    let mut p = param.clone();
    let dim = p.raw_dim();
    let len = p.len();
    let mut g = Vec::with_capacity(len);

    for i in 0..len {
        let orig = p.as_slice().unwrap()[i];

        p.as_slice_mut().unwrap()[i] = orig + eps;
        let plus = f(&p);
        p.as_slice_mut().unwrap()[i] = orig - eps;
        let minus = f(&p);
        p.as_slice_mut().unwrap()[i] = orig;

        g.push((plus - minus) / (2.0 * eps));
    }

    Array::from_shape_vec(dim, g).unwrap()
}

/// Asserts every analytic gradient entry matches its numeric estimate within
/// `abs + rel * scale`.
pub fn assert_grads_close<D: Dimension>(
    analytic: &Array<f32, D>,
    numeric: &Array<f32, D>,
    abs: f32,
    rel: f32,
) {
    assert_eq!(analytic.raw_dim(), numeric.raw_dim());
    for (a, n) in analytic.iter().zip(numeric.iter()) {
        let diff = (a - n).abs();
        let scale = a.abs().max(n.abs());
        assert!(
            diff <= abs + rel * scale,
            "analytic {a} vs numeric {n} (diff {diff})"
        );
    }
}
