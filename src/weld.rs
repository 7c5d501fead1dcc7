//! Welding of face corners into shared vertex slots.
//!
//! Corners that name the same `position//normal` index pair are one vertex
//! as far as a renderer cares, so instead of copying attributes per corner
//! (see [`crate::expand`]), each distinct pair claims one slot in the
//! attribute arrays and the index buffer refers back to it. Corners that
//! share a position but not a normal stay separate, which keeps hard edges
//! hard.

use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::error::ImportResult;
use crate::expand::resolve;
use crate::wavefront::{Corner, RawModel};

/// Deduplicated attribute arrays plus a per-corner index buffer.
///
/// `indices` has one entry per face corner, in face order; slots are
/// numbered by first occurrence, so the first corner of the first face is
/// always slot 0.
#[derive(Debug, Default)]
pub struct WeldedMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
}

impl WeldedMesh {
    /// Weld every corner of `raw`, resolving attributes on first occurrence.
    ///
    /// Index validation is identical to [`crate::expand::ExpandedMesh`]: an
    /// out-of-range corner fails the whole weld with the line it came from.
    pub fn from_raw(raw: &RawModel) -> ImportResult<Self> {
        let mut slots = CornerSlotMap::new();
        let mut indices = Vec::with_capacity(raw.corner_count());
        for face in &raw.faces {
            for corner in &face.corners {
                indices.push(slots.get_slot(raw, *corner, face.line)?);
            }
        }
        Ok(WeldedMesh {
            positions: slots.positions,
            normals: slots.normals,
            indices,
        })
    }

    /// Number of distinct vertex slots.
    pub fn slot_count(&self) -> usize {
        self.positions.len()
    }
}

struct CornerSlotMap {
    map: HashMap<(i64, i64), u32>,
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
}

impl CornerSlotMap {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            positions: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Slot for an index pair, claiming the next one on first sight. The
    /// attribute lookup only happens in the vacant arm; a cached pair was
    /// already validated when it claimed its slot.
    fn get_slot(&mut self, raw: &RawModel, corner: Corner, line: usize) -> ImportResult<u32> {
        match self.map.entry((corner.position, corner.normal)) {
            Occupied(e) => Ok(*e.get()),
            Vacant(e) => {
                let position = resolve(&raw.positions, corner.position, line, "position")?;
                let normal = resolve(&raw.normals, corner.normal, line, "normal")?;
                let slot = self.positions.len() as u32;
                e.insert(slot);
                self.positions.push(position);
                self.normals.push(normal);
                Ok(slot)
            }
        }
    }
}
