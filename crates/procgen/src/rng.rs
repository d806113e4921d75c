//! Tile seeding and the reproducible per-tile random stream.

/// Seed constants for the coordinate dot-product hash. Chosen so that nearby
/// coordinates land on uncorrelated seeds.
pub const SEED_K1: f64 = 123.456;
pub const SEED_K2: f64 = 9876.543;

/// Deterministic seed for a city-block coordinate.
///
/// Pure function: the same `(col, row)` always yields the same seed,
/// independent of generation order or prior calls. Total over the full
/// integer range (the final cast saturates at the extremes).
#[inline]
pub fn tile_seed(col: i64, row: i64) -> i64 {
    (100.0 * (col as f64 * SEED_K1 + row as f64 * SEED_K2)).round() as i64
}

const MULTIPLIER: u64 = 0x5DEE_CE66D;
const INCREMENT: u64 = 0xB;
const STATE_MASK: u64 = (1u64 << 48) - 1;
const SEED_SUFFIX: u64 = 0x330E;

/// 48-bit linear congruential generator (the classic `drand48` parameters).
///
/// The operating-system generator is not guaranteed to produce the same
/// sequence on every platform, which would break tile regeneration, so the
/// stream is this fixed LCG instead: `reseed` + N calls to `next_f64` yields
/// the same N values everywhere.
#[derive(Debug, Clone)]
pub struct Rand48 {
    state: u64,
}

impl Rand48 {
    pub fn new(seed: i64) -> Self {
        let mut rng = Self { state: 0 };
        rng.reseed(seed);
        rng
    }

    /// Reset the stream. Called exactly once per tile, before any geometry
    /// for that tile is drawn.
    pub fn reseed(&mut self, seed: i64) {
        self.state = (((seed as u64) & 0xFFFF_FFFF) << 16) | SEED_SUFFIX;
    }

    /// Next uniform value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & STATE_MASK;
        self.state as f64 / (1u64 << 48) as f64
    }

    /// Next uniform value in [0, 1), narrowed for geometry math.
    pub fn next_f32(&mut self) -> f32 {
        self.next_f64() as f32
    }

    /// Fair coin flip; decides lit windows and the upper-mass branch.
    pub fn coin_flip(&mut self) -> bool {
        self.next_f64() > 0.5
    }
}
