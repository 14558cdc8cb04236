use super::*;

fn assert_close(a: f64, b: f64, rel: f64) {
    let tol = rel * a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
}

#[test]
fn logistic_is_centered_and_bounded() {
    assert_eq!(logistic(0.0, 1.0), 0.5);
    assert!(logistic(10.0, 1.0) > 0.9999);
    assert!(logistic(-10.0, 1.0) < 0.0001);
    assert_eq!(logistic_deriv(0.0, 3.0), 0.25);
}

#[test]
fn linspace_handles_degenerate_counts() {
    assert!(linspace(0.0, 1.0, 0).is_empty());
    assert_eq!(linspace(2.0, 7.0, 1), vec![2.0]);
    assert_eq!(linspace(0.0, 10.0, 3), vec![0.0, 5.0, 10.0]);
    let v = linspace(-5.0, 5.0, 7);
    assert_eq!(v[0], -5.0);
    assert_eq!(v[6], 5.0);
}

#[test]
fn sigmoid_increments_are_bell_shaped() {
    for n in 3..40 {
        for k in [0.5, 1.0, 2.5] {
            let inc = sigmoid_increments(n, k);
            assert_eq!(inc.len(), n);
            assert!(inc.iter().all(|v| *v > 0.0));
            for i in 0..n {
                assert_close(inc[i], inc[n - 1 - i], 1e-12);
            }
            for i in 0..(n - 1) / 2 {
                assert!(inc[i] < inc[i + 1], "n={n} k={k} i={i}");
            }
            for i in n / 2..n - 1 {
                assert!(inc[i] > inc[i + 1], "n={n} k={k} i={i}");
            }
        }
    }
}

#[test]
fn sum_curve_reaches_total() {
    for total in [360.0, -90.0, 0.75, 1e6, 1e-3] {
        for n in [2usize, 3, 10, 40, 333] {
            for k in [0.3, 1.0, 4.0] {
                let v = sigmoid_norm_sum(total, n, k);
                assert_eq!(v.len(), n);
                assert_close(v.iter().sum::<f64>(), total, 1e-9);
            }
        }
    }
}

#[test]
fn steep_kernels_still_reach_totals() {
    for k in [200.0, 500.0, 1000.0] {
        for n in [2usize, 4, 9] {
            let v = sigmoid_norm_sum(90.0, n, k);
            assert!(v.iter().all(|x| x.is_finite() && *x >= 0.0), "n={n} k={k}");
            assert_close(v.iter().sum::<f64>(), 90.0, 1e-9);

            let f = sigmoid_norm_prod(2.0, n, k).unwrap();
            assert!(f.iter().all(|x| *x >= 1.0), "n={n} k={k}");
            assert_close(f.iter().product::<f64>(), 2.0, 1e-9);
        }
    }
    assert_eq!(sigmoid_norm_sum(90.0, 2, 200.0), vec![45.0, 45.0]);
}

#[test]
fn weights_peak_at_one_and_keep_the_bell() {
    let w = sigmoid_weights(11, 1.0);
    assert_close(w[5], 1.0, 1e-12);
    let inc = sigmoid_increments(11, 1.0);
    for i in 0..11 {
        assert_close(w[i], inc[i] / inc[5], 1e-9);
    }
    let steep = sigmoid_weights(4, 1000.0);
    assert_eq!(steep[0], 0.0);
    assert_close(steep[1], 1.0, 1e-12);
    assert_eq!(sigmoid_weights(3, f64::INFINITY), vec![1.0; 3]);
}

#[test]
fn sum_curve_zero_total_is_all_zero() {
    let v = sigmoid_norm_sum(0.0, 12, 1.0);
    assert!(v.iter().all(|x| *x == 0.0));
}

#[test]
fn product_curve_reaches_total() {
    for total in [2.0, 0.5, 1.0, 10.0, 0.01] {
        for n in [2usize, 3, 20, 100] {
            for k in [0.5, 1.0, 3.0] {
                let v = sigmoid_norm_prod(total, n, k).unwrap();
                assert_eq!(v.len(), n);
                assert_close(v.iter().product::<f64>(), total, 1e-9);
            }
        }
    }
}

#[test]
fn product_curve_direction_follows_total() {
    assert!(sigmoid_norm_prod(3.0, 10, 1.0).unwrap().iter().all(|f| *f > 1.0));
    assert!(sigmoid_norm_prod(0.3, 10, 1.0).unwrap().iter().all(|f| *f < 1.0));
}

#[test]
fn product_curve_rejects_non_positive_total() {
    assert!(sigmoid_norm_prod(0.0, 10, 1.0).is_err());
    assert!(sigmoid_norm_prod(-2.0, 10, 1.0).is_err());
    assert!(sigmoid_norm_prod(f64::NAN, 10, 1.0).is_err());
}

#[test]
fn degenerate_counts_do_not_fail() {
    assert!(sigmoid_norm_sum(10.0, 0, 1.0).is_empty());
    let one = sigmoid_norm_sum(10.0, 1, 1.0);
    assert_eq!(one.len(), 1);
    assert_close(one[0], 10.0, 1e-12);
    assert!(sigmoid_norm_prod(2.0, 0, 1.0).unwrap().is_empty());
    assert_close(sigmoid_norm_prod(2.0, 1, 1.0).unwrap()[0], 2.0, 1e-12);
    assert!(sigmoid_norm_sum_linear_mid(5.0, 0, 1.0, 0.4).is_empty());
    let one = sigmoid_norm_sum_linear_mid(5.0, 1, 1.0, 0.4);
    assert_eq!(one.len(), 1);
    assert_close(one[0], 5.0, 1e-12);
}

#[test]
fn linear_mid_has_three_phases() {
    let n = 100;
    let v = sigmoid_norm_sum_linear_mid(720.0, n, 1.0, 0.4);
    assert_eq!(v.len(), n);
    assert_close(v.iter().sum::<f64>(), 720.0, 1e-9);

    // 30 ramp points per side, 40 constant points in the middle.
    let mid = v[50];
    for x in &v[30..70] {
        assert_close(*x, mid, 1e-12);
    }
    for i in 0..29 {
        assert!(v[i] < v[i + 1]);
        assert_close(v[i], v[n - 1 - i], 1e-12);
    }
    assert!(v[29] <= mid);
}

#[test]
fn linear_mid_full_fraction_is_uniform() {
    let v = sigmoid_norm_sum_linear_mid(10.0, 5, 1.0, 1.0);
    for x in v {
        assert_close(x, 2.0, 1e-12);
    }
}

#[test]
fn log_space_linear_mid_reaches_product() {
    let v = sigmoid_norm_prod_linear_mid(4.0, 37, 1.0, DEFAULT_LINEAR_FRACTION).unwrap();
    assert_close(v.iter().product::<f64>(), 4.0, 1e-9);
}

#[test]
fn uniform_variants_reach_totals() {
    assert_eq!(uniform_sum(90.0, 3), vec![30.0; 3]);
    let f = uniform_prod(8.0, 3).unwrap();
    assert_close(f.iter().product::<f64>(), 8.0, 1e-12);
    assert!(uniform_prod(-1.0, 3).is_err());
}

#[test]
fn cumulative_ends_at_start_plus_total() {
    let steps = sigmoid_norm_sum(-1.0, 15, 1.0);
    let values = cumulative(1.0, &steps);
    assert_eq!(values.len(), 15);
    assert_close(*values.last().unwrap(), 0.0, 1e-9);
    assert!(values.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn overlay_envelope_fades_in_and_out() {
    let e = overlay_envelope(20, true);
    assert_eq!(e.len(), 20);
    assert!(e[0] < 0.01);
    assert!(e[19] < 0.01);
    assert!(e[4..16].iter().all(|x| *x == 1.0));
    assert_eq!(overlay_envelope(7, false), vec![1.0; 7]);
    assert_eq!(overlay_envelope(3, true), vec![1.0; 3]);
}
