//! Tile and face geometry.
//!
//! A tile is cut into a grid of faces that are at most 16 rows by exactly 16
//! columns. Every derived attribute here is a pure function of the tile
//! dimensions (and, for grid queries, the shape), so callers recompute it on
//! each shape change instead of caching it.

use serde::{Deserialize, Serialize};
use std::fmt;
use tilekit_common::{Result, TileError};
use tracing::debug;

/// Nominal face height in rows.
pub const FACE_ROWS: usize = 16;

/// Face width in columns. Faces are never narrower than this.
pub const FACE_COLS: usize = 16;

/// Tile height and width at or above which neither flag is raised.
const FULL_TILE_DIM: usize = 32;

/// Logical tensor shape in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of elements in a row-major buffer of this shape.
    pub const fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tile grid as `(tile_rows, tiles_per_row)`.
    ///
    /// Fails when the shape is empty or not a whole multiple of `tile`.
    pub fn tile_grid(&self, tile: TileDims) -> Result<(usize, usize)> {
        if self.rows == 0 || self.cols == 0 {
            return Err(TileError::geometry(format!("shape {self} has a zero dimension")));
        }
        if tile.is_empty() {
            return Err(TileError::geometry(format!("tile {tile} has a zero dimension")));
        }
        if !self.rows.is_multiple_of(tile.rows) || !self.cols.is_multiple_of(tile.cols) {
            return Err(TileError::geometry(format!(
                "shape {self} is not a whole multiple of tile {tile}"
            )));
        }
        Ok((self.rows / tile.rows, self.cols / tile.cols))
    }

    /// Total tiles covering the shape.
    pub fn tile_count(&self, tile: TileDims) -> Result<usize> {
        let (grid_rows, grid_cols) = self.tile_grid(tile)?;
        Ok(grid_rows * grid_cols)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.rows, self.cols)
    }
}

/// Rows and columns of one hardware tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileDims {
    pub rows: usize,
    pub cols: usize,
}

impl TileDims {
    pub const DEFAULT: TileDims = TileDims { rows: 32, cols: 32 };

    /// Every tile size the unpacker and packer can address.
    pub const SUPPORTED: &'static [TileDims] = &[
        TileDims { rows: 16, cols: 16 },
        TileDims { rows: 1, cols: 32 },
        TileDims { rows: 2, cols: 32 },
        TileDims { rows: 4, cols: 32 },
        TileDims { rows: 8, cols: 32 },
        TileDims { rows: 16, cols: 32 },
        TileDims { rows: 32, cols: 32 },
        TileDims { rows: 32, cols: 16 },
    ];

    /// Build tile dimensions, rejecting sizes outside [`TileDims::SUPPORTED`].
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let tile = Self { rows, cols };
        if tile.is_supported() {
            Ok(tile)
        } else {
            Err(TileError::geometry(format!("unsupported tile size {tile}")))
        }
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }

    pub const fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TileDims {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TileDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Face decomposition of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceLayout {
    /// Tile the layout was derived from.
    pub tile: TileDims,
    /// Populated rows per face; below 16 for tiles shorter than one face.
    pub face_r_dim: usize,
    /// Faces stacked vertically in the tile.
    pub num_faces_r: usize,
    /// Faces side by side in the tile.
    pub num_faces_c: usize,
    /// Total faces per tile, always 1, 2 or 4.
    pub num_faces: usize,
    /// The tile holds a single row of faces.
    pub partial_face: bool,
    /// The tile is narrower than 32 columns.
    pub narrow_tile: bool,
}

impl FaceLayout {
    /// Elements stored per face.
    pub const fn elements_per_face(&self) -> usize {
        self.face_r_dim * FACE_COLS
    }

    /// Elements stored per tile.
    pub const fn tile_len(&self) -> usize {
        self.num_faces * self.elements_per_face()
    }

    /// Length of a tiled buffer holding `tile_count` tiles.
    pub const fn tiled_len(&self, tile_count: usize) -> usize {
        tile_count * self.tile_len()
    }

    /// Row and column of face `face` inside the tile, in face units.
    pub const fn face_position(&self, face: usize) -> (usize, usize) {
        (face / self.num_faces_c, face % self.num_faces_c)
    }

    /// Check that this layout is the one [`derive_face_layout`] produces for
    /// its tile. Layouts built by hand or deserialized can disagree.
    pub fn validate(&self) -> Result<()> {
        let expected = Self::for_tile(self.tile)?;
        if *self != expected {
            return Err(TileError::geometry(format!(
                "face layout is inconsistent with tile {}",
                self.tile
            )));
        }
        Ok(())
    }

    /// Face grid derived from a tile alone.
    fn for_tile(tile: TileDims) -> Result<Self> {
        if !tile.is_supported() {
            return Err(TileError::geometry(format!("unsupported tile size {tile}")));
        }
        let face_r_dim = tile.rows.min(FACE_ROWS);
        let num_faces_r = tile.rows.div_ceil(FACE_ROWS);
        let num_faces_c = tile.cols / FACE_COLS;
        Ok(Self {
            tile,
            face_r_dim,
            num_faces_r,
            num_faces_c,
            num_faces: num_faces_r * num_faces_c,
            partial_face: tile.rows < FULL_TILE_DIM,
            narrow_tile: tile.cols < FULL_TILE_DIM,
        })
    }
}

/// Derive the face layout for `shape` tiled by `tile`.
///
/// Fails with [`TileError::InvalidGeometry`] when the tile size is not
/// supported or the shape is not a whole, non-empty multiple of it.
pub fn derive_face_layout(shape: Shape, tile: TileDims) -> Result<FaceLayout> {
    let layout = FaceLayout::for_tile(tile)?;
    let (grid_rows, grid_cols) = shape.tile_grid(tile)?;
    debug!(
        %shape,
        %tile,
        grid_rows,
        grid_cols,
        num_faces = layout.num_faces,
        face_r_dim = layout.face_r_dim,
        partial_face = layout.partial_face,
        narrow_tile = layout.narrow_tile,
        "derived face layout"
    );
    Ok(layout)
}
