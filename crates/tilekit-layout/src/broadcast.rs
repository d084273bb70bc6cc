//! Face-local broadcast in tiled coordinates.
//!
//! Row and column broadcasts replicate within each face and never cross a face
//! boundary, matching what the unpacker does in hardware. A row broadcast of a
//! full tile is four independent per-face broadcasts, not one over the
//! untilized 32x32 view.

use crate::geometry::{FACE_COLS, FaceLayout};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tilekit_common::{Result, TileError};
use tracing::debug;

/// Broadcast applied to the B operand by the unpacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastType {
    /// Plain datacopy. Not a broadcast, rejected by [`broadcast`].
    None,
    Row,
    Column,
    Scalar,
}

impl BroadcastType {
    pub const ALL: &'static [BroadcastType] =
        &[BroadcastType::None, BroadcastType::Row, BroadcastType::Column, BroadcastType::Scalar];

    /// Kinds [`broadcast`] accepts.
    pub const BROADCASTS: &'static [BroadcastType] =
        &[BroadcastType::Row, BroadcastType::Column, BroadcastType::Scalar];

    /// Name used in kernel defines.
    pub fn define_name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Row => "ROW",
            Self::Column => "COL",
            Self::Scalar => "SCALAR",
        }
    }
}

impl fmt::Display for BroadcastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
            Self::Scalar => write!(f, "scalar"),
        }
    }
}

impl FromStr for BroadcastType {
    type Err = TileError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "datacopy" => Ok(Self::None),
            "row" => Ok(Self::Row),
            "column" | "col" => Ok(Self::Column),
            "scalar" => Ok(Self::Scalar),
            other => Err(TileError::UnsupportedBroadcastKind { kind: other.to_string() }),
        }
    }
}

/// Broadcast one tiled operand tile across `tile_count` tiles.
///
/// `operand` must hold exactly one tile in face order. The result holds
/// `tile_count` identical broadcast tiles.
pub fn broadcast<T: Copy>(
    kind: BroadcastType,
    operand: &[T],
    layout: &FaceLayout,
    tile_count: usize,
) -> Result<Vec<T>> {
    if tile_count == 0 {
        return Err(TileError::NonPositiveTileCount { count: tile_count });
    }
    layout.validate()?;
    let tile_len = layout.tile_len();
    if operand.len() != tile_len {
        return Err(TileError::ShapeMismatch { expected: tile_len, actual: operand.len() });
    }
    debug!(%kind, tile = %layout.tile, tile_count, "broadcast");

    let face_len = layout.elements_per_face();
    let mut tile = Vec::with_capacity(tile_len);
    match kind {
        BroadcastType::Scalar => tile.resize(tile_len, operand[0]),
        BroadcastType::Row => {
            for face in operand.chunks_exact(face_len) {
                for _ in 0..layout.face_r_dim {
                    tile.extend_from_slice(&face[..FACE_COLS]);
                }
            }
        }
        BroadcastType::Column => {
            for face in operand.chunks_exact(face_len) {
                for row in face.chunks_exact(FACE_COLS) {
                    tile.extend(std::iter::repeat_n(row[0], FACE_COLS));
                }
            }
        }
        BroadcastType::None => {
            return Err(TileError::UnsupportedBroadcastKind { kind: kind.to_string() });
        }
    }

    let mut out = Vec::with_capacity(layout.tiled_len(tile_count));
    for _ in 0..tile_count {
        out.extend_from_slice(&tile);
    }
    Ok(out)
}
