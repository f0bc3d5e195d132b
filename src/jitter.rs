use glam::DVec2;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of uniform samples in `[0, 1)` used to scatter markers
pub trait JitterSource {
    fn sample(&mut self) -> f64;

    /// Independent offset per axis, each in `[0, range)`
    fn offset(&mut self, range: f64) -> DVec2 {
        let x = self.sample() * range;
        let y = self.sample() * range;
        DVec2::new(x, y)
    }
}

/// Splitmix64 stream
pub struct SplitMix {
    state: u64,
}

impl SplitMix {
    pub fn seeded(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeded from the clock, so every run scatters markers differently
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::seeded(nanos ^ u64::from(std::process::id()).rotate_left(32))
    }
}

impl JitterSource for SplitMix {
    #[inline(always)]
    fn sample(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut x = self.state;
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58476d1ce4e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d049bb133111eb);
        x ^= x >> 31;
        (x >> 11) as f64 / 9007199254740992.0 // 2^53 for full f64 mantissa precision
    }
}

/// Replays a fixed list of samples in a loop
pub struct ScriptedJitter {
    samples: Vec<f64>,
    next: usize,
}

impl ScriptedJitter {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples, next: 0 }
    }

    /// Every sample is zero: markers sit exactly on their projected point
    pub fn none() -> Self {
        Self::new(vec![0.0])
    }
}

impl JitterSource for ScriptedJitter {
    fn sample(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let value = self.samples[self.next % self.samples.len()];
        self.next += 1;
        value
    }
}
