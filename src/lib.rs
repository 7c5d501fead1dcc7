//! Wavefront OBJ import for single-index rendering pipelines.
//!
//! This crate reads the position/normal subset of OBJ and turns it into
//! buffers a rendering API can upload as-is:
//!
//! - **Parsing**: `v`, `vn`, and `f` records with `position//normal`
//!   corners; everything else is skipped
//! - **Resolution**: per-corner attribute expansion, or welding so corners
//!   sharing an index pair share a vertex slot
//! - **Packing**: fan-triangulated triangle lists, or arity-prefixed
//!   polygon lists, encoded as 32-bit native-endian index words
//!
//! # Example
//!
//! ```
//! use objscene::{import_obj_str, ImportOptions};
//!
//! let obj = "\
//! v 0 0 0
//! v 1 0 0
//! v 0 1 0
//! vn 0 0 1
//! f 1//1 2//1 3//1
//! ";
//! let buffers = import_obj_str(obj, ImportOptions::default()).unwrap();
//! assert_eq!(buffers.vertex_count(), 3);
//! assert_eq!(buffers.element.count, 1);
//! assert_eq!(buffers.element.to_bytes().len(), 12);
//! ```

mod error;

pub mod element;
pub mod expand;
pub mod import;
pub mod wavefront;
pub mod weld;

// Re-export core types at crate root
pub use element::{IndexBuffer, PrimitiveType, BYTES_PER_INDEX};
pub use error::{ImportError, ImportResult};
pub use import::{import_obj_file, import_obj_str, GeometryBuffers, ImportOptions};
pub use expand::ExpandedMesh;
pub use wavefront::RawModel;
pub use weld::WeldedMesh;
