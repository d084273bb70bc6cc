//! Tile-of-faces layout substrate for accelerator compute validation.
//!
//! Re-exports the layout, capacity and format crates and adds the scenario
//! planner that chains them together:
//!
//! ```
//! use tilekit::{DataFormat, Scenario, Shape, TileKitConfig};
//!
//! let plan = Scenario::new(
//!     Shape::new(64, 64),
//!     DataFormat::Float16B,
//!     DataFormat::Float16B,
//!     TileKitConfig::default(),
//! )
//! .plan()?;
//! let src: Vec<u16> = (0..64 * 64).collect();
//! let tiled = plan.tilize(&src)?;
//! assert_eq!(plan.untilize(&tiled)?, src);
//! # Ok::<(), tilekit::TileError>(())
//! ```

pub mod scenario;

pub use scenario::{Scenario, ScenarioPlan};

pub use tilekit_capacity::{
    BlockPlan, DestBlock, DestRegister, RowBlockPlan, max_tiles_per_bank, plan_blocks,
    plan_blocks_row_major, valid_dest_indices,
};
pub use tilekit_common::{
    ChipArchitecture, ConfigError, DatumWidth, DestAccumulation, DestSync, Result, TileError,
    TileKitConfig,
};
pub use tilekit_formats::{
    AccumMode, DataFormat, FormatConfig, FormatPair, NumericClass, ReconfigCase, ValidPairs,
    data_formats, dest_datum_width, enumerate_reconfig_cases, enumerate_valid_pairs,
    is_convertible, required_accumulation_mode, valid_dest_accumulation_modes, validate_pair,
};
pub use tilekit_layout::{
    BroadcastType, FaceLayout, Shape, TileDims, broadcast, derive_face_layout, tilize,
    tilize_block, untilize, untilize_block,
};
