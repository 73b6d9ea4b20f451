//! Feedforward controller for birds
//!
//! Observation (3 inputs) -> hidden (tanh) -> single jump output (tanh).

use flapsim_core::{Controller, Observation};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of observation features fed into the network
pub const INPUT_DIM: usize = 3;

/// Small two-layer network with biases
///
/// Weights are laid out as `[input->hidden (+bias)][hidden->output (+bias)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedforwardController {
    weights: Vec<f32>,
    input_dim: usize,
    hidden_dim: usize,
    /// Observations are in pixels; this brings them to roughly [-1, 1]
    input_scale: f32,
}

impl FeedforwardController {
    /// Random weights in [-1, 1)
    pub fn random<R: Rng + ?Sized>(rng: &mut R, hidden_dim: usize, input_scale: f32) -> Self {
        let total = Self::weight_count(INPUT_DIM, hidden_dim);
        let weights = (0..total).map(|_| rng.random_range(-1.0..1.0)).collect();

        Self {
            weights,
            input_dim: INPUT_DIM,
            hidden_dim,
            input_scale,
        }
    }

    /// Build from explicit weights, padding with zeros or truncating to fit
    pub fn from_weights(mut weights: Vec<f32>, hidden_dim: usize, input_scale: f32) -> Self {
        weights.resize(Self::weight_count(INPUT_DIM, hidden_dim), 0.0);
        Self {
            weights,
            input_dim: INPUT_DIM,
            hidden_dim,
            input_scale,
        }
    }

    /// Weights for `input_dim -> hidden_dim -> 1`, biases included
    pub fn weight_count(input_dim: usize, hidden_dim: usize) -> usize {
        (input_dim + 1) * hidden_dim + hidden_dim + 1
    }

    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Forward pass on already-scaled inputs
    pub fn forward(&self, input: &[f32]) -> f32 {
        let stride = self.input_dim + 1;
        let (hidden_weights, output_weights) = self.weights.split_at(stride * self.hidden_dim);

        let hidden = hidden_weights.chunks_exact(stride).map(|row| {
            let (bias, w) = row.split_last().map(|(b, w)| (*b, w)).unwrap_or((0.0, row));
            let sum: f32 = w.iter().zip(input).map(|(w, x)| w * x).sum();
            (sum + bias).tanh()
        });

        let output_bias = output_weights.last().copied().unwrap_or(0.0);
        let sum: f32 = hidden.zip(output_weights).map(|(h, w)| h * w).sum();
        (sum + output_bias).tanh()
    }
}

impl Controller for FeedforwardController {
    fn decide(&mut self, observation: &Observation) -> f32 {
        let input = observation.to_array().map(|v| v * self.input_scale);
        self.forward(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_weight_count() {
        // (3 + 1) * 6 + 6 + 1
        assert_eq!(FeedforwardController::weight_count(3, 6), 31);

        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let controller = FeedforwardController::random(&mut rng, 6, 1.0);
        assert_eq!(controller.weights().len(), 31);
        assert_eq!(controller.hidden_dim(), 6);
    }

    #[test]
    fn test_output_in_tanh_range() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let mut controller = FeedforwardController::random(&mut rng, 8, 1.0 / 800.0);

        for y in [-50.0, 0.0, 350.0, 729.0] {
            let out = controller.decide(&Observation::new(y, 200.0, 400.0));
            assert!(out.is_finite());
            assert!((-1.0..=1.0).contains(&out));
        }
    }

    #[test]
    fn test_same_seed_same_network() {
        let a = FeedforwardController::random(&mut Xoshiro256StarStar::seed_from_u64(3), 4, 1.0);
        let b = FeedforwardController::random(&mut Xoshiro256StarStar::seed_from_u64(3), 4, 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hand_set_weights() {
        // One hidden unit copying the first input, output copying that unit
        let weights = vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let controller = FeedforwardController::from_weights(weights, 1, 1.0);

        let expected = 0.5f32.tanh().tanh();
        assert!((controller.forward(&[0.5, 9.0, 9.0]) - expected).abs() < 1e-6);
        assert!(controller.forward(&[0.0, 9.0, 9.0]).abs() < 1e-6);
    }

    #[test]
    fn test_from_weights_pads_short_vectors() {
        let controller = FeedforwardController::from_weights(vec![0.3], 2, 1.0);
        assert_eq!(controller.weights().len(), FeedforwardController::weight_count(3, 2));
        // All-zero except one input weight
        assert_eq!(controller.forward(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_serializes_round_trip() {
        let controller =
            FeedforwardController::random(&mut Xoshiro256StarStar::seed_from_u64(2), 3, 0.5);
        let json = serde_json::to_string(&controller).unwrap();
        let back: FeedforwardController = serde_json::from_str(&json).unwrap();
        assert_eq!(back, controller);
    }
}
