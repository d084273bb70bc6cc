//! Tile-of-faces layout for accelerator compute buffers.
//!
//! - [`geometry`] derives face counts and partial/narrow flags from a tile size.
//! - [`codec`] converts between row-major and tiled buffers.
//! - [`broadcast`] replicates an operand tile face by face.

pub mod broadcast;
pub mod codec;
pub mod geometry;

pub use broadcast::{BroadcastType, broadcast};
pub use codec::{tilize, tilize_block, untilize, untilize_block};
pub use geometry::{FACE_COLS, FACE_ROWS, FaceLayout, Shape, TileDims, derive_face_layout};
