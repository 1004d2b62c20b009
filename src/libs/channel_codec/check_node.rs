use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// How check nodes combine their incoming variable-to-check messages.
#[derive(Serialize, Deserialize, Debug, PartialEq, Copy, Clone)]
pub enum Algorithm {
    // 2 atanh(prod tanh(m / 2)): exact belief propagation in the log domain.
    SumProduct,
    // sign product times the smallest magnitude, scaled.
    MinSum,
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::SumProduct => write!(f, "SumProduct"),
            Algorithm::MinSum => write!(f, "MinSum"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sumproduct" | "sum-product" | "sp" => Ok(Algorithm::SumProduct),
            "minsum" | "min-sum" | "ms" => Ok(Algorithm::MinSum),
            _ => Err(format!("Unknown decoding algorithm '{}', expecting SumProduct or MinSum", s)),
        }
    }
}

// Saturates an LLR to [-llr_clamp, llr_clamp]. NaN carries no information, so it becomes 0.
pub fn clamp_llr(llr: f64, llr_clamp: f64) -> f64 {
    if llr.is_nan() {
        return 0.0;
    }
    llr.max(-llr_clamp).min(llr_clamp)
}

/// Sum-product check update. `outgoing[i]` receives the combination of every `incoming[j]` with
/// `j != i`, built from forward and backward partial products of tanh(m / 2) so that no division
/// is needed and a zero message never poisons the others.
pub fn sum_product_update(incoming: &[f64], outgoing: &mut [f64], llr_clamp: f64) {
    let degree = incoming.len();
    // outgoing holds the forward products: outgoing[i] = prod_{j < i} tanh(incoming[j] / 2)
    let mut forward = 1.0;
    for i in 0..degree {
        outgoing[i] = forward;
        forward *= (incoming[i] / 2.0).tanh();
    }
    let mut backward = 1.0;
    for i in (0..degree).rev() {
        let extrinsic = outgoing[i] * backward;
        outgoing[i] = clamp_llr(2.0 * extrinsic.atanh(), llr_clamp);
        backward *= (incoming[i] / 2.0).tanh();
    }
}

/// Normalised min-sum check update: for each edge, the product of the other edges' signs times the
/// smallest of their magnitudes, scaled by `scale`.
pub fn min_sum_update(incoming: &[f64], outgoing: &mut [f64], scale: f64, llr_clamp: f64) {
    let mut negative = false;
    let mut smallest = f64::INFINITY;
    let mut second_smallest = f64::INFINITY;
    let mut smallest_at = 0;
    for (i, &message) in incoming.iter().enumerate() {
        negative ^= message < 0.0;
        let magnitude = message.abs();
        if magnitude < smallest {
            second_smallest = smallest;
            smallest = magnitude;
            smallest_at = i;
        } else if magnitude < second_smallest {
            second_smallest = magnitude;
        }
    }
    for (i, &message) in incoming.iter().enumerate() {
        let magnitude = if i == smallest_at { second_smallest } else { smallest };
        // Remove this edge's own sign from the product.
        let sign = if negative ^ (message < 0.0) { -1.0 } else { 1.0 };
        outgoing[i] = clamp_llr(sign * scale * magnitude, llr_clamp);
    }
}

#[cfg(test)]
#[path = "./check_node_spec.rs"]
mod check_node_spec;
