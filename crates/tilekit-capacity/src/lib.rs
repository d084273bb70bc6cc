//! Dest register capacity planning.
//!
//! [`register`] resolves how many tiles fit per block for a datum width and
//! sync mode; [`planner`] partitions a tile stream into blocks of that size.

pub mod planner;
pub mod register;

pub use planner::{BlockPlan, DestBlock, RowBlockPlan, plan_blocks, plan_blocks_row_major};
pub use register::{
    DEFAULT_TILES_PER_BANK, DestRegister, MIN_TILES_PER_BANK, max_tiles_per_bank, valid_dest_indices,
};
