//! Dest register capacity rules.

use serde::{Deserialize, Serialize};
use tilekit_common::{DatumWidth, DestSync, Result, TileError, TileKitConfig};
use tracing::debug;

/// Tiles of 16-bit datums per bank in full sync mode on current silicon.
pub const DEFAULT_TILES_PER_BANK: usize = 8;

/// Smallest bank that still holds one tile after halving for 32-bit datums
/// and again for half sync.
pub const MIN_TILES_PER_BANK: usize = 4;

/// Capacity of the dest register, expressed as the 16-bit full-sync bank size.
///
/// Every other figure is derived from that one number: 32-bit datums take two
/// 16-bit slots, and half sync reserves half the bank for the block being
/// drained by the packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestRegister {
    tiles_per_bank: usize,
}

impl Default for DestRegister {
    fn default() -> Self {
        Self { tiles_per_bank: DEFAULT_TILES_PER_BANK }
    }
}

impl DestRegister {
    /// Fails with [`TileError::ZeroCapacity`] when some width and sync
    /// combination would leave no room for a single tile.
    pub fn new(tiles_per_bank: usize) -> Result<Self> {
        if tiles_per_bank < MIN_TILES_PER_BANK {
            return Err(TileError::ZeroCapacity);
        }
        Ok(Self { tiles_per_bank })
    }

    pub fn from_config(config: &TileKitConfig) -> Result<Self> {
        Self::new(config.dest_tiles_per_bank)
    }

    /// Base bank size: 16-bit datums, full sync.
    pub fn tiles_per_bank(&self) -> usize {
        self.tiles_per_bank
    }

    /// Tiles one block may hold for the given datum width and sync mode.
    pub fn max_tiles_per_bank(&self, width: DatumWidth, sync: DestSync) -> usize {
        let mut tiles = self.tiles_per_bank;
        if width == DatumWidth::Bits32 {
            tiles /= 2;
        }
        if sync == DestSync::Half {
            tiles /= 2;
        }
        debug!(%width, %sync, tiles, "dest bank capacity");
        tiles
    }

    /// Tiles addressable by a single dest index sweep: both banks of the
    /// register, halved by the same width and sync rules.
    pub fn addressable_tiles(&self, width: DatumWidth, sync: DestSync) -> usize {
        2 * self.max_tiles_per_bank(width, sync)
    }
}

/// [`DestRegister::max_tiles_per_bank`] for the default register.
pub fn max_tiles_per_bank(width: DatumWidth, sync: DestSync) -> usize {
    DestRegister::default().max_tiles_per_bank(width, sync)
}

/// Starting dest indices at which a block of `tile_count` tiles fits in a
/// register holding `capacity` tiles.
///
/// Returns only the lowest and highest start index unless `all_indices` is
/// set, which keeps exhaustive sweeps small by default.
pub fn valid_dest_indices(
    capacity: usize,
    tile_count: usize,
    all_indices: bool,
) -> Result<Vec<usize>> {
    if capacity == 0 {
        return Err(TileError::ZeroCapacity);
    }
    if tile_count == 0 {
        return Err(TileError::NonPositiveTileCount { count: tile_count });
    }
    if tile_count > capacity {
        return Err(TileError::CapacityExceeded { tiles: tile_count, capacity });
    }
    let last = capacity - tile_count;
    let indices = if all_indices {
        (0..=last).collect()
    } else if last == 0 {
        vec![0]
    } else {
        vec![0, last]
    };
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_capacity_table() {
        assert_eq!(max_tiles_per_bank(DatumWidth::Bits16, DestSync::Full), 8);
        assert_eq!(max_tiles_per_bank(DatumWidth::Bits16, DestSync::Half), 4);
        assert_eq!(max_tiles_per_bank(DatumWidth::Bits32, DestSync::Full), 4);
        assert_eq!(max_tiles_per_bank(DatumWidth::Bits32, DestSync::Half), 2);
    }

    #[test]
    fn addressable_tiles_cover_both_banks() {
        let dest = DestRegister::default();
        assert_eq!(dest.addressable_tiles(DatumWidth::Bits16, DestSync::Full), 16);
        assert_eq!(dest.addressable_tiles(DatumWidth::Bits16, DestSync::Half), 8);
        assert_eq!(dest.addressable_tiles(DatumWidth::Bits32, DestSync::Half), 4);
    }

    #[test]
    fn register_from_config() {
        let cfg = TileKitConfig { dest_tiles_per_bank: 16, ..TileKitConfig::default() };
        let dest = DestRegister::from_config(&cfg).unwrap();
        assert_eq!(dest.max_tiles_per_bank(DatumWidth::Bits32, DestSync::Full), 8);
        assert_eq!(DestRegister::new(0).unwrap_err(), TileError::ZeroCapacity);
    }

    #[test]
    fn banks_too_small_to_halve_twice_are_rejected() {
        for tiles in 1..MIN_TILES_PER_BANK {
            assert_eq!(DestRegister::new(tiles).unwrap_err(), TileError::ZeroCapacity);
        }
        let smallest = DestRegister::new(MIN_TILES_PER_BANK).unwrap();
        assert_eq!(smallest.max_tiles_per_bank(DatumWidth::Bits32, DestSync::Half), 1);
    }

    #[test]
    fn dest_index_extremes() {
        assert_eq!(valid_dest_indices(16, 4, false).unwrap(), vec![0, 12]);
        assert_eq!(valid_dest_indices(8, 8, false).unwrap(), vec![0]);
        assert_eq!(valid_dest_indices(4, 2, true).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn dest_index_errors() {
        assert_eq!(
            valid_dest_indices(8, 9, false).unwrap_err(),
            TileError::CapacityExceeded { tiles: 9, capacity: 8 }
        );
        assert_eq!(
            valid_dest_indices(8, 0, true).unwrap_err(),
            TileError::NonPositiveTileCount { count: 0 }
        );
        assert_eq!(valid_dest_indices(0, 1, true).unwrap_err(), TileError::ZeroCapacity);
    }
}
