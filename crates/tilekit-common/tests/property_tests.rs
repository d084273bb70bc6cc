//! Property-based tests for `tilekit-common`.
//!
//! Verifies configuration validation and vocabulary parsing:
//! - every addressable tile size and bank size validates and survives TOML
//! - anything outside those sets is rejected with a validation error

use proptest::prelude::*;
use tilekit_common::{
    ChipArchitecture, ConfigError, DestAccumulation, DestSync, TileKitConfig,
};

// ── Strategies ──────────────────────────────────────────────────────────────

fn arb_valid_config() -> impl Strategy<Value = TileKitConfig> {
    (
        proptest::sample::select(ChipArchitecture::ALL.to_vec()),
        proptest::sample::select(vec![1usize, 2, 4, 8, 16, 32]),
        proptest::sample::select(vec![16usize, 32]),
        proptest::sample::select(DestSync::ALL.to_vec()),
        proptest::sample::select(DestAccumulation::ALL.to_vec()),
        proptest::sample::select(vec![4usize, 8, 16]),
    )
        .prop_map(|(arch, tile_rows, tile_cols, dest_sync, dest_acc, dest_tiles_per_bank)| {
            TileKitConfig { arch, tile_rows, tile_cols, dest_sync, dest_acc, dest_tiles_per_bank }
        })
}

// ── Property tests ───────────────────────────────────────────────────────────

proptest! {
    /// Valid configs validate and round-trip through TOML unchanged.
    #[test]
    fn valid_config_round_trips(cfg in arb_valid_config()) {
        prop_assert!(cfg.validate().is_ok());
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: TileKitConfig = toml::from_str(&text).unwrap();
        prop_assert_eq!(back, cfg);
    }

    /// Tile rows outside the addressable set are rejected.
    #[test]
    fn odd_tile_rows_rejected(cfg in arb_valid_config(), rows in 0usize..=64) {
        prop_assume!(![1, 2, 4, 8, 16, 32].contains(&rows));
        let cfg = TileKitConfig { tile_rows: rows, ..cfg };
        let is_validation = matches!(cfg.validate(), Err(ConfigError::Validation(_)));
        prop_assert!(is_validation);
    }

    /// Bank sizes that are not powers of two in [4, 16] are rejected.
    #[test]
    fn bank_size_bounds(cfg in arb_valid_config(), tiles in 0usize..=64) {
        let cfg = TileKitConfig { dest_tiles_per_bank: tiles, ..cfg };
        let expected = tiles.is_power_of_two() && (4..=16).contains(&tiles);
        prop_assert_eq!(cfg.validate().is_ok(), expected);
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────

#[test]
fn default_toml_mentions_every_field() {
    let text = TileKitConfig::default_toml();
    for key in ["arch", "tile_rows", "tile_cols", "dest_sync", "dest_acc", "dest_tiles_per_bank"] {
        assert!(text.contains(key), "missing {key} in:\n{text}");
    }
}
