use getrandom::getrandom;
use oorandom::Rand64;

pub fn preseeded_rng64() -> Rand64 {
    Rand64::new(os_random_seed())
}

pub fn rng64(seed: u128) -> Rand64 {
    Rand64::new(seed)
}

pub fn os_random_seed() -> u128 {
    let mut buf = [0; 16];
    let _res = getrandom(&mut buf);
    u128::from_le_bytes(buf)
}

/// Uniform index into a collection of `len` elements. `len` must be positive.
pub fn choose_index(rng: &mut Rand64, len: usize) -> usize {
    rng.rand_range(0..len as u64) as usize
}

/// Fair coin.
pub fn coin_flip(rng: &mut Rand64) -> bool {
    rng.rand_u64() & 1 == 1
}
