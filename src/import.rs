//! Top-level import: parse OBJ text, resolve indices, pack element buffers.

use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::element::{IndexBuffer, PrimitiveType};
use crate::error::{ImportError, ImportResult};
use crate::expand::ExpandedMesh;
use crate::wavefront::RawModel;
use crate::weld::WeldedMesh;

/// Knobs for one import call.
///
/// The defaults produce what most rendering paths want: quads fan-split into
/// triangles and attributes copied per corner under an identity index
/// buffer.
#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    /// Target layout. [`PrimitiveType::Triangles`] fan-splits quads;
    /// [`PrimitiveType::Polygon`] keeps faces at their source arity behind
    /// an arity prefix and never triangulates.
    pub primitive: PrimitiveType,
    /// Share a vertex slot between corners that name the same
    /// `position//normal` index pair instead of copying attributes per
    /// corner.
    pub weld: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            primitive: PrimitiveType::Triangles,
            weld: false,
        }
    }
}

/// The renderer-ready result of one import.
///
/// `positions` and `normals` are parallel arrays; every entry of the element
/// stream's index portion addresses both at once.
#[derive(Debug, Serialize)]
pub struct GeometryBuffers {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub element: IndexBuffer,
}

impl GeometryBuffers {
    /// Number of vertex slots in the attribute arrays.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounding box of the positions, or `None` when the
    /// buffers are empty.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some((min, max))
    }
}

/// Import OBJ text into geometry buffers.
///
/// All state lives in this call; importing the same text twice yields
/// identical buffers, and concurrent calls do not observe each other.
pub fn import_obj_str(text: &str, options: ImportOptions) -> ImportResult<GeometryBuffers> {
    let mut raw = RawModel::parse(text)?;
    if options.primitive == PrimitiveType::Triangles {
        raw = raw.triangulate();
    }
    let arities = raw.face_arities();

    let (positions, normals, indices) = if options.weld {
        let welded = WeldedMesh::from_raw(&raw)?;
        (welded.positions, welded.normals, welded.indices)
    } else {
        let expanded = ExpandedMesh::from_raw(&raw)?;
        let indices = IndexBuffer::identity(expanded.len());
        (expanded.positions, expanded.normals, indices)
    };

    let element = match options.primitive {
        PrimitiveType::Triangles => IndexBuffer::triangle_list(indices),
        PrimitiveType::Polygon => IndexBuffer::polygon_list(&arities, &indices),
    };

    if element.count == 0 {
        warn!("OBJ source has no faces, returning empty buffers");
    }
    debug!(
        "Packed {} vertex slots into {} {:?} primitives",
        positions.len(),
        element.count,
        element.primitive
    );

    Ok(GeometryBuffers {
        positions,
        normals,
        element,
    })
}

/// Import an OBJ file from disk. See [`import_obj_str`].
pub fn import_obj_file(path: &Path, options: ImportOptions) -> ImportResult<GeometryBuffers> {
    info!("Importing OBJ from {:?}", path);
    let text = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let buffers = import_obj_str(&text, options)?;
    if let Some((min, max)) = buffers.bounds() {
        debug!(
            "Bounding box: [{:.1}, {:.1}, {:.1}] to [{:.1}, {:.1}, {:.1}]",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
    info!(
        "Imported {:?}: {} vertex slots, {} {:?} primitives",
        path,
        buffers.vertex_count(),
        buffers.element.count,
        buffers.element.primitive
    );
    Ok(buffers)
}
