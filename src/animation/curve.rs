//! Pure numeric curve synthesis.
//!
//! Every animated quantity in a compiled movie is a per-frame sequence built here. Additive
//! quantities (angles, opacity deltas) use the `*_sum` family and multiplicative ones (zoom
//! factors) the `*_prod` family; both are rescaled so that naively summing (multiplying) the
//! returned values reproduces the requested total.
//!
//! The shape of all smooth curves is the logistic derivative sampled over [`SIGMOID_DOMAIN`],
//! which is a bell: small steps at both ends and the largest step in the middle.

use crate::foundation::error::{ReelError, ReelResult};

/// Domain over which the logistic derivative is sampled.
pub const SIGMOID_DOMAIN: (f64, f64) = (-5.0, 5.0);

/// Share of points moving at constant speed in [`sigmoid_norm_sum_linear_mid`] by default.
pub const DEFAULT_LINEAR_FRACTION: f64 = 0.4;

/// Share of an overlay's frames spent fading in (and again fading out).
pub const OVERLAY_FADE_FRACTION: f64 = 0.2;

pub fn logistic(x: f64, k: f64) -> f64 {
    1.0 / (1.0 + (-k * x).exp())
}

pub fn logistic_deriv(x: f64, k: f64) -> f64 {
    let l = logistic(x, k);
    l * (1.0 - l)
}

/// `n` evenly spaced points from `start` to `stop` inclusive; a single point is `start`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// Running sum of `increments` offset by `start`.
pub fn cumulative(start: f64, increments: &[f64]) -> Vec<f64> {
    let mut acc = start;
    increments
        .iter()
        .map(|d| {
            acc += d;
            acc
        })
        .collect()
}

/// Bell-shaped positive increments: the logistic derivative at `n` points over
/// [`SIGMOID_DOMAIN`].
pub fn sigmoid_increments(n: usize, k: f64) -> Vec<f64> {
    let (lo, hi) = SIGMOID_DOMAIN;
    linspace(lo, hi, n)
        .into_iter()
        .map(|x| logistic_deriv(x, k))
        .collect()
}

/// [`sigmoid_increments`] divided by its largest value, evaluated in log space.
///
/// The shape is the same but the peak is exactly 1, so steep kernels whose raw values all
/// underflow to zero still keep a usable shape. A kernel with no finite point is flat.
pub fn sigmoid_weights(n: usize, k: f64) -> Vec<f64> {
    let (lo, hi) = SIGMOID_DOMAIN;
    let logs: Vec<f64> = linspace(lo, hi, n)
        .into_iter()
        .map(|x| ln_logistic_deriv(x, k))
        .collect();
    let peak = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !peak.is_finite() {
        return vec![1.0; n];
    }
    logs.into_iter().map(|l| (l - peak).exp()).collect()
}

/// `ln(logistic_deriv(x, k))` without forming the underflowing exponential.
fn ln_logistic_deriv(x: f64, k: f64) -> f64 {
    let a = -k * x.abs();
    a - 2.0 * a.exp().ln_1p()
}

/// Bell-shaped increments rescaled to sum to `total`.
pub fn sigmoid_norm_sum(total: f64, n: usize, k: f64) -> Vec<f64> {
    normalize_sum(total, sigmoid_weights(n, k))
}

/// Bell-shaped factors (`1 + increment`) raised to a common power so that their product is
/// `total`. Fails unless `total` is finite and positive.
///
/// Works on `ln(1 + increment)`; when every increment is too small to register, the
/// relative weights stand in for the logarithms, which they equal to first order.
pub fn sigmoid_norm_prod(total: f64, n: usize, k: f64) -> ReelResult<Vec<f64>> {
    check_product_total(total)?;
    let logs: Vec<f64> = sigmoid_increments(n, k)
        .into_iter()
        .map(f64::ln_1p)
        .collect();
    let ln_prod: f64 = logs.iter().sum();
    let logs = if ln_prod.is_normal() {
        logs
    } else {
        sigmoid_weights(n, k)
    };
    Ok(normalize_sum(total.ln(), logs)
        .into_iter()
        .map(f64::exp)
        .collect())
}

/// Smooth ramp-up, constant-speed middle, mirrored ramp-down; sums to `total`.
///
/// The ramps each cover `(1 - linear_fraction) / 2` of the points and sample the rising half of
/// the logistic derivative, so they end at the bell's peak value, which is also the constant
/// step of the middle phase.
pub fn sigmoid_norm_sum_linear_mid(
    total: f64,
    n: usize,
    k: f64,
    linear_fraction: f64,
) -> Vec<f64> {
    let linear_fraction = linear_fraction.clamp(0.0, 1.0);
    let ramp = ((n as f64) * (1.0 - linear_fraction) / 2.0).floor() as usize;
    let (lo, _) = SIGMOID_DOMAIN;
    let rise: Vec<f64> = linspace(lo, 0.0, ramp)
        .into_iter()
        .map(|x| logistic_deriv(x, k))
        .collect();
    let peak = logistic_deriv(0.0, k);

    let mut raw = Vec::with_capacity(n);
    raw.extend_from_slice(&rise);
    raw.extend(std::iter::repeat_n(peak, n - 2 * ramp));
    raw.extend(rise.iter().rev());
    normalize_sum(total, raw)
}

/// Log-space variant of [`sigmoid_norm_sum_linear_mid`]: factors whose product is `total`.
pub fn sigmoid_norm_prod_linear_mid(
    total: f64,
    n: usize,
    k: f64,
    linear_fraction: f64,
) -> ReelResult<Vec<f64>> {
    check_product_total(total)?;
    Ok(
        sigmoid_norm_sum_linear_mid(total.ln(), n, k, linear_fraction)
            .into_iter()
            .map(f64::exp)
            .collect(),
    )
}

/// `n` equal increments summing to `total`.
pub fn uniform_sum(total: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![total / n as f64; n]
}

/// `n` equal factors whose product is `total`.
pub fn uniform_prod(total: f64, n: usize) -> ReelResult<Vec<f64>> {
    check_product_total(total)?;
    if n == 0 {
        return Ok(Vec::new());
    }
    Ok(vec![total.powf(1.0 / n as f64); n])
}

/// Overlay opacity: logistic fade-in over the first fifth of the frames, full opacity, then the
/// mirrored fade-out. Without `smooth` every frame is fully opaque.
pub fn overlay_envelope(n: usize, smooth: bool) -> Vec<f64> {
    if !smooth {
        return vec![1.0; n];
    }
    let fade = ((n as f64) * OVERLAY_FADE_FRACTION).floor() as usize;
    let (lo, hi) = SIGMOID_DOMAIN;
    let rise: Vec<f64> = linspace(lo, hi, fade)
        .into_iter()
        .map(|x| logistic(x, 1.0))
        .collect();
    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&rise);
    out.extend(std::iter::repeat_n(1.0, n - 2 * fade));
    out.extend(rise.iter().rev());
    out
}

fn normalize_sum(total: f64, raw: Vec<f64>) -> Vec<f64> {
    let sum: f64 = raw.iter().sum();
    if !sum.is_normal() {
        return uniform_sum(total, raw.len());
    }
    raw.into_iter().map(|v| total * v / sum).collect()
}

fn check_product_total(total: f64) -> ReelResult<()> {
    if !total.is_finite() || total <= 0.0 {
        return Err(ReelError::animation(format!(
            "multiplicative curve total must be finite and > 0, got {total}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
