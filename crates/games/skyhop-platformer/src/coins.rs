use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;

/// Coin pickup size in px.
pub const COIN_SIZE: f32 = 20.0;

/// A collectible coin. Stays in the world list after collection so indices
/// remain stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub rect: Rect,
    pub collected: bool,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, COIN_SIZE, COIN_SIZE),
            collected: false,
        }
    }
}

/// Mark every uncollected coin overlapping `player` as collected.
///
/// Returns the indices collected this call; a coin is reported at most once
/// over its lifetime.
pub fn collect_coins(coins: &mut [Coin], player: &Rect) -> Vec<usize> {
    let mut taken = Vec::new();
    for (i, coin) in coins.iter_mut().enumerate() {
        if coin.collected {
            continue;
        }
        if coin.rect.intersects(player) {
            coin.collected = true;
            taken.push(i);
        }
    }
    taken
}

/// Number of collected coins.
pub fn collected_count(coins: &[Coin]) -> u32 {
    coins.iter().filter(|c| c.collected).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Rect {
        Rect::new(x, y, 32.0, 32.0)
    }

    #[test]
    fn overlapping_coin_is_collected() {
        let mut coins = vec![Coin::new(100.0, 100.0), Coin::new(400.0, 100.0)];
        let taken = collect_coins(&mut coins, &player_at(90.0, 90.0));
        assert_eq!(taken, vec![0]);
        assert!(coins[0].collected);
        assert!(!coins[1].collected);
    }

    #[test]
    fn collection_is_idempotent() {
        let mut coins = vec![Coin::new(100.0, 100.0)];
        let p = player_at(95.0, 95.0);
        assert_eq!(collect_coins(&mut coins, &p), vec![0]);
        assert!(collect_coins(&mut coins, &p).is_empty());
        assert!(collect_coins(&mut coins, &p).is_empty());
        assert_eq!(collected_count(&coins), 1);
    }

    #[test]
    fn touching_edge_does_not_collect() {
        let mut coins = vec![Coin::new(100.0, 100.0)];
        // Player's right edge sits exactly on the coin's left edge.
        assert!(collect_coins(&mut coins, &player_at(68.0, 100.0)).is_empty());
    }

    #[test]
    fn several_coins_in_one_call() {
        let mut coins = vec![
            Coin::new(100.0, 100.0),
            Coin::new(110.0, 100.0),
            Coin::new(500.0, 500.0),
        ];
        let taken = collect_coins(&mut coins, &player_at(100.0, 100.0));
        assert_eq!(taken, vec![0, 1]);
        assert_eq!(collected_count(&coins), 2);
    }

    #[test]
    fn empty_list_is_fine() {
        assert!(collect_coins(&mut [], &player_at(0.0, 0.0)).is_empty());
        assert_eq!(collected_count(&[]), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tally_matches_flags_after_any_path(
                coin_xs in prop::collection::vec(0.0f32..1000.0, 0..12),
                path in prop::collection::vec((0.0f32..1000.0, 0.0f32..200.0), 0..40),
            ) {
                let mut coins: Vec<Coin> =
                    coin_xs.iter().map(|&x| Coin::new(x, 100.0)).collect();
                let mut tally = 0u32;
                for (x, y) in path {
                    tally += collect_coins(&mut coins, &player_at(x, y)).len() as u32;
                    prop_assert_eq!(tally, collected_count(&coins));
                }
                prop_assert!(tally as usize <= coins.len());
            }
        }
    }
}
