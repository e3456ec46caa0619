//! Scalar noise fields and the threshold that turns them into solid and air.

use grotto_config::{NoiseConfig, NoiseKind};
use grotto_tiles::TileClass;
use noise::{NoiseFn, Perlin, Worley};
use rand::Rng;

use crate::error::ConfigurationError;
use crate::seed::stream_rng;

/// A deterministic 2D scalar function of `(seed, x, y)`.
/// Not `Send`: cellular fields hold an `Rc` distance function.
pub trait NoiseSource {
    /// Value at `(x, y)`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// The noise functions a biome can use. Every variant produces values in
/// `[0, 1]` before `scale` is applied.
pub enum NoiseField {
    /// Independent pseudo-random value per coordinate.
    White {
        /// Stream seed.
        seed: u64,
        /// Output multiplier.
        scale: f64,
    },
    /// One octave of Perlin noise.
    Perlin {
        /// Generator.
        perlin: Perlin,
        /// Coordinate multiplier.
        frequency: f64,
        /// Output multiplier.
        scale: f64,
    },
    /// Normalized sum of Perlin octaves.
    Fbm {
        /// Generator shared by every octave.
        perlin: Perlin,
        /// Frequency of the first octave.
        frequency: f64,
        /// Octave count.
        octaves: u32,
        /// Frequency multiplier per octave.
        lacunarity: f64,
        /// Amplitude multiplier per octave.
        persistence: f64,
        /// Output multiplier.
        scale: f64,
    },
    /// Worley noise.
    Cellular {
        /// Generator.
        worley: Worley,
        /// Coordinate multiplier.
        frequency: f64,
        /// Output multiplier.
        scale: f64,
    },
}

impl NoiseField {
    /// Builds the field described by `config`, seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Rejects a frequency that is not finite and positive, zero octaves and a
    /// non-finite scale.
    pub fn from_config(config: &NoiseConfig, seed: u64) -> Result<Self, ConfigurationError> {
        if !config.frequency.is_finite() || config.frequency <= 0.0 {
            return Err(ConfigurationError::InvalidFrequency(config.frequency));
        }
        if config.octaves == 0 {
            return Err(ConfigurationError::ZeroOctaves);
        }
        if !config.scale.is_finite() {
            return Err(ConfigurationError::InvalidScale(config.scale));
        }

        // The noise crate takes 32-bit seeds; fold the high half in.
        let seed32 = (seed ^ (seed >> 32)) as u32;
        let field = match config.kind {
            NoiseKind::White => NoiseField::White {
                seed,
                scale: config.scale,
            },
            NoiseKind::Perlin => NoiseField::Perlin {
                perlin: Perlin::new(seed32),
                frequency: config.frequency,
                scale: config.scale,
            },
            NoiseKind::Fbm => NoiseField::Fbm {
                perlin: Perlin::new(seed32),
                frequency: config.frequency,
                octaves: config.octaves,
                lacunarity: config.lacunarity,
                persistence: config.persistence,
                scale: config.scale,
            },
            NoiseKind::Cellular => NoiseField::Cellular {
                worley: Worley::new(seed32),
                frequency: config.frequency,
                scale: config.scale,
            },
        };
        Ok(field)
    }
}

/// Maps `[-1, 1]` onto `[0, 1]`.
#[inline]
fn unit(value: f64) -> f64 {
    ((value + 1.0) * 0.5).clamp(0.0, 1.0)
}

impl NoiseSource for NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        match self {
            NoiseField::White { seed, scale } => {
                let mut rng = stream_rng(*seed, "white", (x.to_bits(), y.to_bits()));
                rng.random::<f64>() * scale
            }
            NoiseField::Perlin {
                perlin,
                frequency,
                scale,
            } => unit(perlin.get([x * frequency, y * frequency])) * scale,
            NoiseField::Fbm {
                perlin,
                frequency,
                octaves,
                lacunarity,
                persistence,
                scale,
            } => {
                let mut total = 0.0;
                let mut freq = *frequency;
                let mut amplitude = 1.0;
                let mut max_amplitude = 0.0;
                for _ in 0..*octaves {
                    total += perlin.get([x * freq, y * freq]) * amplitude;
                    max_amplitude += amplitude;
                    freq *= lacunarity;
                    amplitude *= persistence;
                }
                if max_amplitude == 0.0 {
                    return 0.0;
                }
                unit(total / max_amplitude) * scale
            }
            NoiseField::Cellular {
                worley,
                frequency,
                scale,
            } => unit(worley.get([x * frequency, y * frequency])) * scale,
        }
    }
}

/// A noise field split in two by a threshold.
pub struct ThresholdField {
    field: NoiseField,
    threshold: f64,
}

impl ThresholdField {
    /// Wraps `field`.
    ///
    /// # Errors
    ///
    /// Fails if `threshold` lies outside `[0, 1]`.
    pub fn new(field: NoiseField, threshold: f64) -> Result<Self, ConfigurationError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigurationError::ThresholdOutOfRange(threshold));
        }
        Ok(Self { field, threshold })
    }

    /// Builds the field and threshold described by `config`.
    pub fn from_config(config: &NoiseConfig, seed: u64) -> Result<Self, ConfigurationError> {
        Self::new(NoiseField::from_config(config, seed)?, config.threshold)
    }

    /// Air where the sample reaches the threshold, solid below it.
    pub fn classify(&self, x: i32, y: i32) -> TileClass {
        if self.field.sample(x as f64, y as f64) >= self.threshold {
            TileClass::Air
        } else {
            TileClass::Solid
        }
    }

    /// Returns `true` where the sample stays below the threshold.
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        self.field.sample(x as f64, y as f64) < self.threshold
    }
}

impl NoiseSource for ThresholdField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.field.sample(x, y)
    }
}
