// prng.rs - Lehmer / Park-Miller pseudo-random generator
//
// Every function is pure: it takes the current seed and returns the advanced
// seed alongside the drawn value, so callers thread the state explicitly.

use rand::Rng;

use crate::types::Seed;

/// Park-Miller multiplier
const MULTIPLIER: u64 = 16_807;
/// 2^31 - 1
pub const MODULUS: u64 = 2_147_483_647;

/// Advance the generator one step.
#[inline]
pub fn prng(seed: Seed) -> Seed {
    ((seed as u64 * MULTIPLIER) % MODULUS) as Seed
}

/// Next value as a raw integer.
#[inline]
pub fn prng_int(seed: Seed) -> (Seed, u32) {
    let next = prng(seed);
    (next, next)
}

/// Next value masked to 31 bits.
#[inline]
pub fn prng_unsigned_int(seed: Seed) -> (Seed, u32) {
    let (next, value) = prng_int(seed);
    (next, value & 0x7fff_ffff)
}

/// Next value as a float in (0, 1).
#[inline]
pub fn prng_double(seed: Seed) -> (Seed, f64) {
    let next = prng(seed);
    (next, next as f64 / MODULUS as f64)
}

#[inline]
pub fn prng_boolean(seed: Seed) -> (Seed, bool) {
    let next = prng(seed);
    (next, next % 2 == 0)
}

/// Integer in `[min, max]`, rounded half-up.
pub fn prng_int_range(seed: Seed, min: i64, max: i64) -> (Seed, i64) {
    let (next, double) = prng_double(seed);
    let value = min as f64 + (max - min) as f64 * double;
    (next, round_half_up(value) as i64)
}

/// Float in `[min, max)`.
pub fn prng_double_range(seed: Seed, min: f64, max: f64) -> (Seed, f64) {
    let (next, double) = prng_double(seed);
    (next, min + (max - min) * double)
}

/// Fisher-Yates shuffle into a new vector; the input is left untouched.
pub fn prng_shuffle<T: Clone>(mut seed: Seed, items: &[T]) -> (Seed, Vec<T>) {
    let mut result = items.to_vec();
    for i in (1..result.len()).rev() {
        let (next, j) = prng_int_range(seed, 0, i as i64);
        seed = next;
        result.swap(i, j as usize);
    }
    (seed, result)
}

/// Fresh seed for a brand new dungeon. Never zero, which would stall the generator.
pub fn random_seed() -> Seed {
    rand::thread_rng().gen_range(1..=1_000_000)
}

#[inline]
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
