use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for the demand generator and the mock accuracy figures
pub trait NoiseSource {
    /// Returns a sample in the range [0, 1)
    fn unit(&mut self) -> f64;

    /// Returns a sample uniformly distributed in [-amplitude, amplitude)
    ///
    /// # Arguments
    ///
    /// * 'amplitude' - half width of the range
    fn symmetric(&mut self, amplitude: f64) -> f64 {
        (self.unit() - 0.5) * 2.0 * amplitude
    }
}

const STREAM_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Uniform noise from a seedable generator
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    /// Returns a new noise source, seeded from entropy if no seed is given
    ///
    /// # Arguments
    ///
    /// * 'seed' - optional seed for reproducible runs
    pub fn new(seed: Option<u64>) -> SeededNoise {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        SeededNoise { rng }
    }

    /// Returns a noise source for a separate stream of draws. With a seed the stream
    /// is reproducible but independent of the stream seeded directly with it.
    ///
    /// # Arguments
    ///
    /// * 'seed' - optional base seed
    /// * 'stream' - stream number, 0 gives the same draws as `new`
    pub fn for_stream(seed: Option<u64>, stream: u64) -> SeededNoise {
        SeededNoise::new(seed.map(|s| s ^ stream.wrapping_mul(STREAM_SPREAD)))
    }
}

impl NoiseSource for SeededNoise {
    fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Noise source that always returns the same sample
pub struct FixedNoise {
    unit: f64,
}

impl FixedNoise {
    /// # Arguments
    ///
    /// * 'unit' - the sample to return, clamped to [0, 1]
    pub fn new(unit: f64) -> FixedNoise {
        FixedNoise { unit: unit.clamp(0.0, 1.0) }
    }

    /// Noise source whose symmetric samples are always zero
    pub fn silent() -> FixedNoise {
        FixedNoise { unit: 0.5 }
    }
}

impl NoiseSource for FixedNoise {
    fn unit(&mut self) -> f64 {
        self.unit
    }
}
