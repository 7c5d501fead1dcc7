//! Expansion of indexed face corners into per-corner attribute arrays.
//!
//! Rendering APIs driven by a single index buffer cannot address positions
//! and normals through separate indices, so each corner's attributes are
//! copied out of the tables into flat arrays, one entry per corner, in face
//! order. Corners that repeat an index pair get their own copies; welding
//! (see [`crate::weld`]) is the non-redundant alternative.

use nalgebra::{Point3, Vector3};

use crate::error::{ImportError, ImportResult};
use crate::wavefront::RawModel;

/// Per-corner attribute arrays in face order.
///
/// `positions[i]` and `normals[i]` belong to the same corner, so the arrays
/// are always the same length and a trivial 0..n index buffer draws the mesh.
#[derive(Debug, Default)]
pub struct ExpandedMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
}

impl ExpandedMesh {
    /// Resolve every corner of `raw` against its attribute tables.
    ///
    /// Fails with [`ImportError::IndexOutOfRange`] on the first corner whose
    /// position or normal index falls outside its table; nothing is clamped
    /// or substituted.
    pub fn from_raw(raw: &RawModel) -> ImportResult<Self> {
        let mut mesh = ExpandedMesh {
            positions: Vec::with_capacity(raw.corner_count()),
            normals: Vec::with_capacity(raw.corner_count()),
        };
        for face in &raw.faces {
            for corner in &face.corners {
                mesh.positions
                    .push(resolve(&raw.positions, corner.position, face.line, "position")?);
                mesh.normals
                    .push(resolve(&raw.normals, corner.normal, face.line, "normal")?);
            }
        }
        Ok(mesh)
    }

    /// Number of corners held.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Look up a 0-based attribute index, rejecting anything outside the table.
///
/// The error reports the index as it was written in the file (1-based), so
/// an index of `0` or a negative index round-trips unchanged.
pub(crate) fn resolve<T: Copy>(
    table: &[T],
    index: i64,
    line: usize,
    attribute: &'static str,
) -> ImportResult<T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .copied()
        .ok_or(ImportError::IndexOutOfRange {
            line,
            attribute,
            index: index.saturating_add(1),
            table_len: table.len(),
        })
}
