/// Mulberry32 pseudo-random generator keyed by a string seed.
///
/// Not suitable for anything security related; it exists so previews and
/// tests get the same rows for the same seed without persisting anything.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        Self { state: hash_seed(seed) }
    }

    pub const fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform integer in the inclusive range `[min, max]`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        min + (self.next_f64() * span) as i64
    }

    /// Uniform count in the inclusive range `[min, max]`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn count(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        min + (self.next_f64() * span) as usize
    }

    /// Uniform amount in `[min, max)`, rounded to cents.
    pub fn amount(&mut self, min: f64, max: f64) -> f64 {
        round_cents(self.next_f64().mul_add(max - min, min))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let index = (self.next_f64() * items.len() as f64) as usize;
        &items[index.min(items.len() - 1)]
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// FNV-1a over the seed bytes, then the murmur3 finalizer so short seeds
// that differ in one character still land far apart.
fn hash_seed(seed: &str) -> u32 {
    let mut h: u32 = 0x811C_9DC5;
    for byte in seed.bytes() {
        h ^= u32::from(byte);
        h = h.wrapping_mul(0x0100_0193);
    }
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 16)
}
