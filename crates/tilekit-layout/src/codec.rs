//! Row-major to tile-of-faces conversion and back.
//!
//! A tiled buffer is ordered tile by tile (row-major over the tile grid), then
//! face by face inside each tile (row-major over the face grid), then element
//! by element inside each face (row-major over `face_r_dim x 16`). Both
//! directions are pure reorderings: no element is ever transformed.

use crate::geometry::{FACE_COLS, FaceLayout, Shape};
use tilekit_common::{Result, TileError};
use tracing::trace;

fn check_len(actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(TileError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Tile grid of `shape`, checked against the tile `layout` was derived for.
fn grid(shape: Shape, layout: &FaceLayout) -> Result<(usize, usize)> {
    layout.validate()?;
    shape.tile_grid(layout.tile)
}

/// Append one tile, read from `src` at tile coordinate (`tile_r`, `tile_c`),
/// to `out` in face order.
fn push_tile<T: Copy>(
    src: &[T],
    cols: usize,
    tile_r: usize,
    tile_c: usize,
    layout: &FaceLayout,
    out: &mut Vec<T>,
) {
    let row0 = tile_r * layout.tile.rows;
    let col0 = tile_c * layout.tile.cols;
    for face in 0..layout.num_faces {
        let (face_r, face_c) = layout.face_position(face);
        let face_col = col0 + face_c * FACE_COLS;
        for r in 0..layout.face_r_dim {
            let start = (row0 + face_r * layout.face_r_dim + r) * cols + face_col;
            out.extend_from_slice(&src[start..start + FACE_COLS]);
        }
    }
}

/// Append row `row` of the row-major view of `tiled` to `out`.
fn push_row<T: Copy>(
    tiled: &[T],
    row: usize,
    tiles_per_row: usize,
    layout: &FaceLayout,
    out: &mut Vec<T>,
) {
    let tile_r = row / layout.tile.rows;
    let in_tile = row % layout.tile.rows;
    let face_r = in_tile / layout.face_r_dim;
    let face_row = in_tile % layout.face_r_dim;
    let tile_len = layout.tile_len();
    let face_len = layout.elements_per_face();
    for tile_c in 0..tiles_per_row {
        let tile_base = (tile_r * tiles_per_row + tile_c) * tile_len;
        for face_c in 0..layout.num_faces_c {
            let face = face_r * layout.num_faces_c + face_c;
            let start = tile_base + face * face_len + face_row * FACE_COLS;
            out.extend_from_slice(&tiled[start..start + FACE_COLS]);
        }
    }
}

/// Convert a row-major buffer into tile-of-faces order.
///
/// Shapes spanning more than one tile go through [`tilize_block`].
pub fn tilize<T: Copy>(row_major: &[T], shape: Shape, layout: &FaceLayout) -> Result<Vec<T>> {
    let (grid_rows, grid_cols) = grid(shape, layout)?;
    check_len(row_major.len(), shape.len())?;
    if grid_rows * grid_cols > 1 {
        return tilize_block(row_major, shape, layout);
    }
    trace!(%shape, "tilize single tile");
    let mut out = Vec::with_capacity(layout.tile_len());
    push_tile(row_major, shape.cols, 0, 0, layout, &mut out);
    Ok(out)
}

/// Convert a multi-tile row-major region into tile-of-faces order, walking the
/// tile grid row by row.
pub fn tilize_block<T: Copy>(
    row_major: &[T],
    shape: Shape,
    layout: &FaceLayout,
) -> Result<Vec<T>> {
    let (grid_rows, grid_cols) = grid(shape, layout)?;
    check_len(row_major.len(), shape.len())?;
    trace!(%shape, grid_rows, grid_cols, "tilize block");
    let mut out = Vec::with_capacity(layout.tiled_len(grid_rows * grid_cols));
    for tile_r in 0..grid_rows {
        for tile_c in 0..grid_cols {
            push_tile(row_major, shape.cols, tile_r, tile_c, layout, &mut out);
        }
    }
    Ok(out)
}

/// Convert a tile-of-faces buffer back into row-major order.
///
/// Shapes spanning more than one tile go through [`untilize_block`].
pub fn untilize<T: Copy>(tiled: &[T], shape: Shape, layout: &FaceLayout) -> Result<Vec<T>> {
    let (grid_rows, grid_cols) = grid(shape, layout)?;
    check_len(tiled.len(), layout.tiled_len(grid_rows * grid_cols))?;
    if grid_rows * grid_cols > 1 {
        return untilize_block(tiled, shape, layout);
    }
    trace!(%shape, "untilize single tile");
    let mut out = Vec::with_capacity(shape.len());
    for row in 0..shape.rows {
        push_row(tiled, row, 1, layout, &mut out);
    }
    Ok(out)
}

/// Convert a multi-tile tiled buffer back into row-major order.
pub fn untilize_block<T: Copy>(
    tiled: &[T],
    shape: Shape,
    layout: &FaceLayout,
) -> Result<Vec<T>> {
    let (grid_rows, grid_cols) = grid(shape, layout)?;
    check_len(tiled.len(), layout.tiled_len(grid_rows * grid_cols))?;
    trace!(%shape, grid_rows, grid_cols, "untilize block");
    let mut out = Vec::with_capacity(shape.len());
    for row in 0..shape.rows {
        push_row(tiled, row, grid_cols, layout, &mut out);
    }
    Ok(out)
}
