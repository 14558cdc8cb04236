use crate::animation::curve::{
    DEFAULT_LINEAR_FRACTION, sigmoid_norm_prod, sigmoid_norm_prod_linear_mid, sigmoid_norm_sum,
    sigmoid_norm_sum_linear_mid, uniform_prod, uniform_sum,
};
use crate::foundation::error::ReelResult;

/// Curve family of a finite-duration action, chosen by its `sigmoid` and `abruptness`
/// parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum Ease {
    /// Equal steps (`sigmoid=f`).
    Linear,
    /// Logistic ease-in/ease-out (`sigmoid=t`).
    Sigmoid { abruptness: f64 },
    /// Smooth start, constant-speed middle, smooth stop (`sigmoid=sls`).
    SmoothLinearSmooth { abruptness: f64 },
}

impl Ease {
    /// Map a `sigmoid` parameter value onto a curve family. `None` when the value is neither
    /// boolean-like nor `sls`.
    pub fn from_param(value: &str, abruptness: f64) -> Option<Self> {
        let v = value.trim().to_ascii_lowercase();
        if v == "sls" {
            return Some(Self::SmoothLinearSmooth { abruptness });
        }
        parse_flag(&v).map(|smooth| {
            if smooth {
                Self::Sigmoid { abruptness }
            } else {
                Self::Linear
            }
        })
    }

    /// Per-frame increments summing to `total`.
    pub fn sum_steps(self, total: f64, n: usize) -> Vec<f64> {
        match self {
            Self::Linear => uniform_sum(total, n),
            Self::Sigmoid { abruptness } => sigmoid_norm_sum(total, n, abruptness),
            Self::SmoothLinearSmooth { abruptness } => {
                sigmoid_norm_sum_linear_mid(total, n, abruptness, DEFAULT_LINEAR_FRACTION)
            }
        }
    }

    /// Per-frame factors whose product is `total`.
    pub fn prod_steps(self, total: f64, n: usize) -> ReelResult<Vec<f64>> {
        match self {
            Self::Linear => uniform_prod(total, n),
            Self::Sigmoid { abruptness } => sigmoid_norm_prod(total, n, abruptness),
            Self::SmoothLinearSmooth { abruptness } => {
                sigmoid_norm_prod_linear_mid(total, n, abruptness, DEFAULT_LINEAR_FRACTION)
            }
        }
    }
}

/// Boolean-like script values, case-insensitive.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "t" | "yes" | "true" => Some(true),
        "n" | "f" | "no" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
