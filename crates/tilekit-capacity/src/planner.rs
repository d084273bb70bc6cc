//! Partitioning a tile stream into dest-sized blocks.
//!
//! Plans are plain values computed from explicit inputs; callers recompute
//! them whenever the datum width or sync mode changes.

use serde::{Deserialize, Serialize};
use tilekit_common::{Result, TileError};
use tilekit_layout::{Shape, TileDims};
use tracing::debug;

/// One pass of tiles through the dest register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestBlock {
    pub block_index: usize,
    /// Index of the first tile of this block in the tile stream.
    pub first_tile: usize,
    pub tiles_in_block: usize,
}

/// Ceiling-division partition of `total_tiles` into blocks of `capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPlan {
    pub total_tiles: usize,
    pub capacity: usize,
    pub num_blocks: usize,
    /// Size of the final block: the remainder, or `capacity` when exact.
    pub tiles_in_last_block: usize,
}

impl BlockPlan {
    /// `(num_blocks, tiles_in_last_block)`
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.num_blocks, self.tiles_in_last_block)
    }

    /// Enumerate blocks in stream order. Every block but the last is full.
    pub fn blocks(&self) -> impl Iterator<Item = DestBlock> + '_ {
        (0..self.num_blocks).map(move |block_index| DestBlock {
            block_index,
            first_tile: block_index * self.capacity,
            tiles_in_block: if block_index + 1 == self.num_blocks {
                self.tiles_in_last_block
            } else {
                self.capacity
            },
        })
    }
}

fn check_inputs(total_tiles: usize, capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(TileError::ZeroCapacity);
    }
    if total_tiles == 0 {
        return Err(TileError::NonPositiveTileCount { count: total_tiles });
    }
    Ok(())
}

/// Split `total_tiles` into `ceil(total_tiles / capacity)` blocks.
pub fn plan_blocks(total_tiles: usize, capacity: usize) -> Result<BlockPlan> {
    check_inputs(total_tiles, capacity)?;
    let num_blocks = total_tiles.div_ceil(capacity);
    let rem = total_tiles % capacity;
    let tiles_in_last_block = if rem == 0 { capacity } else { rem };
    debug!(total_tiles, capacity, num_blocks, tiles_in_last_block, "planned dest blocks");
    Ok(BlockPlan { total_tiles, capacity, num_blocks, tiles_in_last_block })
}

/// Partition aligned to tile-row boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowBlockPlan {
    pub tile_rows: usize,
    pub tiles_per_row: usize,
    pub capacity: usize,
    pub blocks_per_row: usize,
    pub num_blocks: usize,
    /// Size of the last block of each row. Equal to `tiles_per_row` when a
    /// whole row fits in one block.
    pub tiles_in_block: usize,
}

impl RowBlockPlan {
    /// `(num_blocks, tiles_in_block)`
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.num_blocks, self.tiles_in_block)
    }

    /// Enumerate blocks row by row. Inside a row every block holds
    /// `min(capacity, remaining tiles in the row)`.
    pub fn blocks(&self) -> impl Iterator<Item = DestBlock> + '_ {
        (0..self.num_blocks).map(move |block_index| {
            let row = block_index / self.blocks_per_row;
            let offset = (block_index % self.blocks_per_row) * self.capacity;
            DestBlock {
                block_index,
                first_tile: row * self.tiles_per_row + offset,
                tiles_in_block: self.capacity.min(self.tiles_per_row - offset),
            }
        })
    }
}

/// Row-oriented partition for stages that consume one row of tiles at a time.
pub fn plan_blocks_row_major(
    shape: Shape,
    tile: TileDims,
    capacity: usize,
) -> Result<RowBlockPlan> {
    let (tile_rows, tiles_per_row) = shape.tile_grid(tile)?;
    check_inputs(tile_rows * tiles_per_row, capacity)?;
    let blocks_per_row = tiles_per_row.div_ceil(capacity);
    let rem = tiles_per_row % capacity;
    let tiles_in_block = if blocks_per_row == 1 {
        tiles_per_row
    } else if rem == 0 {
        capacity
    } else {
        rem
    };
    let plan = RowBlockPlan {
        tile_rows,
        tiles_per_row,
        capacity,
        blocks_per_row,
        num_blocks: tile_rows * blocks_per_row,
        tiles_in_block,
    };
    debug!(
        %shape,
        %tile,
        capacity,
        num_blocks = plan.num_blocks,
        tiles_in_block,
        "planned row-major dest blocks"
    );
    Ok(plan)
}
