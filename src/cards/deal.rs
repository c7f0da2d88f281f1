//! Dealing pair keys onto a board.

use crate::core::{GameRng, PairKey};

/// Build the pair-key multiset `0..pair_count`, each key twice, and shuffle
/// it uniformly.
///
/// The result is in slot order: slot `i` receives `keys[i]`.
///
/// ```
/// use concentration::cards::deal_pair_keys;
/// use concentration::core::{GameRng, PairKey};
///
/// let mut rng = GameRng::new(1);
/// let mut keys = deal_pair_keys(3, &mut rng);
/// keys.sort();
/// assert_eq!(keys, [0, 0, 1, 1, 2, 2].map(PairKey::new));
/// ```
#[must_use]
pub fn deal_pair_keys(pair_count: usize, rng: &mut GameRng) -> Vec<PairKey> {
    let mut keys: Vec<PairKey> = (0..pair_count as u32)
        .flat_map(|k| [PairKey::new(k), PairKey::new(k)])
        .collect();
    rng.shuffle(&mut keys);
    keys
}
