//! Entropy bootstrap.
//!
//! The original firmware seeds the libc PRNG from 32 bits of LoRa radio
//! noise sampled at `init()` time (`randomSeed(LoRa.random())`-style). We
//! follow the same approach rather than reaching for `OsRng`: this crate
//! targets hosts that may not have one, and the radio's noise floor is the
//! only entropy source the spec assumes is available.
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::radio::Radio;

/// Draw 32 bits from the radio and seed a [`StdRng`] with them.
pub fn seed_from_radio(radio: &mut impl Radio) -> StdRng {
    let mut seed: u64 = 0;
    for _ in 0..32 {
        seed = (seed << 1) | radio.random_bit() as u64;
    }
    StdRng::seed_from_u64(seed)
}
