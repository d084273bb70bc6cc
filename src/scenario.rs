//! End-to-end planning for one test scenario.
//!
//! A [`Scenario`] names what a test wants (shape, L1 formats, broadcast and the
//! active [`TileKitConfig`]); [`Scenario::plan`] derives everything the compute
//! stage needs to be configured with, in pipeline order.

use serde::Serialize;
use tilekit_capacity::{BlockPlan, DestBlock, DestRegister, plan_blocks, valid_dest_indices};
use tilekit_common::{
    ChipArchitecture, DatumWidth, DestAccumulation, DestSync, Result, TileError, TileKitConfig,
};
use tilekit_formats::{
    DataFormat, FormatConfig, dest_datum_width, stage_formats, valid_dest_accumulation_modes,
};
use tilekit_layout::{
    BroadcastType, FaceLayout, Shape, TileDims, broadcast, derive_face_layout, tilize, untilize,
};
use tracing::debug;

/// What a single test asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub shape: Shape,
    pub input: DataFormat,
    pub output: DataFormat,
    /// `BroadcastType::None` for a plain datacopy of the B operand.
    pub broadcast: BroadcastType,
    pub unpack_to_dest: bool,
    pub config: TileKitConfig,
}

impl Scenario {
    pub fn new(shape: Shape, input: DataFormat, output: DataFormat, config: TileKitConfig) -> Self {
        Self {
            shape,
            input,
            output,
            broadcast: BroadcastType::None,
            unpack_to_dest: false,
            config,
        }
    }

    pub fn with_broadcast(mut self, kind: BroadcastType) -> Self {
        self.broadcast = kind;
        self
    }

    pub fn with_unpack_to_dest(mut self, unpack_to_dest: bool) -> Self {
        self.unpack_to_dest = unpack_to_dest;
        self
    }

    /// Derive layout, formats and dest blocking for this scenario.
    pub fn plan(&self) -> Result<ScenarioPlan> {
        let cfg = &self.config;
        let tile = TileDims::new(cfg.tile_rows, cfg.tile_cols)?;
        let layout = derive_face_layout(self.shape, tile)?;
        let tile_count = self.shape.tile_count(tile)?;

        if !valid_dest_accumulation_modes(self.input, self.output).contains(&cfg.dest_acc) {
            return Err(TileError::IncompatibleFormats {
                src: self.input.to_string(),
                dst: self.output.to_string(),
                reason: format!("pipeline requires dest accumulation, got {}", cfg.dest_acc),
            });
        }
        let formats =
            stage_formats(self.input, self.output, cfg.dest_acc, self.unpack_to_dest, cfg.arch);

        let datum_width = dest_datum_width(self.input, self.output, cfg.dest_acc);
        let dest = DestRegister::from_config(cfg)?;
        let capacity = dest.max_tiles_per_bank(datum_width, cfg.dest_sync);
        let blocks = plan_blocks(tile_count, capacity)?;

        debug!(
            shape = %self.shape,
            %tile,
            input = %self.input,
            output = %self.output,
            tile_count,
            %datum_width,
            capacity,
            num_blocks = blocks.num_blocks,
            "planned scenario"
        );

        Ok(ScenarioPlan {
            arch: cfg.arch,
            shape: self.shape,
            tile,
            layout,
            tile_count,
            formats,
            dest_acc: cfg.dest_acc,
            dest_sync: cfg.dest_sync,
            datum_width,
            addressable_tiles: dest.addressable_tiles(datum_width, cfg.dest_sync),
            blocks,
            broadcast: self.broadcast,
        })
    }
}

/// Everything the compute stage is configured with for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioPlan {
    pub arch: ChipArchitecture,
    pub shape: Shape,
    pub tile: TileDims,
    pub layout: FaceLayout,
    pub tile_count: usize,
    pub formats: FormatConfig,
    pub dest_acc: DestAccumulation,
    pub dest_sync: DestSync,
    pub datum_width: DatumWidth,
    /// Tiles a dest index sweep may address.
    pub addressable_tiles: usize,
    pub blocks: BlockPlan,
    pub broadcast: BroadcastType,
}

impl ScenarioPlan {
    pub fn tilize<T: Copy>(&self, row_major: &[T]) -> Result<Vec<T>> {
        tilize(row_major, self.shape, &self.layout)
    }

    pub fn untilize<T: Copy>(&self, tiled: &[T]) -> Result<Vec<T>> {
        untilize(tiled, self.shape, &self.layout)
    }

    /// Broadcast a single operand tile across every tile of the scenario.
    pub fn broadcast<T: Copy>(&self, operand: &[T]) -> Result<Vec<T>> {
        broadcast(self.broadcast, operand, &self.layout, self.tile_count)
    }

    pub fn dest_blocks(&self) -> impl Iterator<Item = DestBlock> + '_ {
        self.blocks.blocks()
    }

    /// Start indices at which one full block fits in dest.
    pub fn dest_indices(&self, all_indices: bool) -> Result<Vec<usize>> {
        let block = self.blocks.capacity.min(self.tile_count);
        valid_dest_indices(self.addressable_tiles, block, all_indices)
    }

    /// Ordered key/value records for the kernel build configuration.
    pub fn kernel_defines(&self) -> Vec<(&'static str, String)> {
        let flag = |b: bool| String::from(if b { "1" } else { "0" });
        let f = &self.formats;
        vec![
            ("ARCH", self.arch.to_string()),
            ("TILE_CNT", self.tile_count.to_string()),
            ("TILE_R_DIM", self.tile.rows.to_string()),
            ("TILE_C_DIM", self.tile.cols.to_string()),
            ("NUM_FACES", self.layout.num_faces.to_string()),
            ("FACE_R_DIM", self.layout.face_r_dim.to_string()),
            ("PARTIAL_FACE", flag(self.layout.partial_face)),
            ("NARROW_TILE", flag(self.layout.narrow_tile)),
            ("NUM_BLOCKS", self.blocks.num_blocks.to_string()),
            ("NUM_TILES_IN_BLOCK", self.blocks.tiles_in_last_block.to_string()),
            (
                "DEST_SYNC",
                match self.dest_sync {
                    DestSync::Half => "SyncHalf",
                    DestSync::Full => "SyncFull",
                }
                .to_string(),
            ),
            ("DEST_ACC", self.dest_acc.is_enabled().to_string()),
            ("BROADCAST_TYPE", self.broadcast.define_name().to_string()),
            ("UNPACK_A_IN", f.unpack_a_src.to_string()),
            ("UNPACK_A_OUT", f.unpack_a_dst.to_string()),
            ("UNPACK_B_IN", f.unpack_b_src.to_string()),
            ("UNPACK_B_OUT", f.unpack_b_dst.to_string()),
            ("MATH_FORMAT", f.math.to_string()),
            ("PACK_IN", f.pack_src.to_string()),
            ("PACK_OUT", f.pack_dst.to_string()),
        ]
    }
}
