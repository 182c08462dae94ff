//! Scalar noise sources that drive terrain regeneration.

use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A deterministic integer field over grid coordinates.
pub trait TerrainNoise: Sync {
    fn sample(&self, x: i32, y: i32) -> i32;
}

impl<F> TerrainNoise for F
where
    F: Fn(i32, i32) -> i32 + Sync,
{
    fn sample(&self, x: i32, y: i32) -> i32 {
        self(x, y)
    }
}

/// Parameters of the layered Perlin field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Weight divisor per octave; each octave is weighted by `1 / alpha^i`
    pub alpha: f64,
    /// Frequency multiplier per octave
    pub beta: f64,
    /// Number of octaves summed
    pub octaves: u32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 0.1,
            octaves: 3,
        }
    }
}

/// Sum of Perlin octaves, truncated to an integer.
///
/// With the default parameters the coarse octaves dominate (weights 1, 10,
/// 100), giving broad bands of values around zero.
pub struct LayeredPerlin {
    perlin: Perlin,
    params: NoiseParams,
}

impl LayeredPerlin {
    pub fn new(params: NoiseParams, seed: u64) -> Self {
        // Perlin only takes a u32 seed; spread the u64 through ChaCha first
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self {
            perlin: Perlin::new(rng.gen::<u32>()),
            params,
        }
    }

    pub fn value(&self, x: f64, y: f64) -> f64 {
        let mut scale = 1.0;
        let mut sum = 0.0;
        let (mut px, mut py) = (x, y);

        for _ in 0..self.params.octaves {
            sum += self.perlin.get([px, py]) / scale;
            scale *= self.params.alpha;
            px *= self.params.beta;
            py *= self.params.beta;
        }

        sum
    }
}

impl TerrainNoise for LayeredPerlin {
    fn sample(&self, x: i32, y: i32) -> i32 {
        let v = self.value(x as f64, y as f64);
        if v.is_finite() {
            v as i32
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let a = LayeredPerlin::new(NoiseParams::default(), 7);
        let b = LayeredPerlin::new(NoiseParams::default(), 7);
        for (x, y) in [(0, 0), (13, 200), (255, 255), (-4, 9)] {
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_default_field_is_not_flat() {
        let field = LayeredPerlin::new(NoiseParams::default(), 99);
        let mut values: Vec<i32> = (0..64)
            .flat_map(|y| (0..64).map(move |x| (x * 4, y * 4)))
            .map(|(x, y)| field.sample(x, y))
            .collect();
        values.sort_unstable();
        values.dedup();
        assert!(values.len() > 4, "expected varied terrain, got {:?}", values);
    }

    #[test]
    fn test_closures_are_noise() {
        let diagonal = |x: i32, y: i32| x + y;
        assert_eq!(diagonal.sample(3, 4), 7);
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let params: NoiseParams = serde_json::from_str(r#"{ "octaves": 5 }"#).unwrap();
        assert_eq!(params.octaves, 5);
        assert_eq!(params.alpha, 0.1);
    }
}
