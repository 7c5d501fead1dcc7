//! Packing of index streams into renderer-ready element buffers.
//!
//! Two layouts are produced. A triangle list is the plain stream of corner
//! indices, three per triangle. A polygon list has two sections: first one
//! corner count per face, then the whole corner index stream, which is the
//! layout expected by APIs that draw variable-arity primitives from a single
//! element buffer. Either layout encodes to bytes the same way: one 32-bit
//! native-endian word per entry.

use serde::Serialize;

/// Bytes occupied by one encoded index.
pub const BYTES_PER_INDEX: usize = 4;

/// How the entries of an [`IndexBuffer`] are to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrimitiveType {
    Triangles,
    Polygon,
}

/// A packed element stream and the primitive count it draws.
///
/// For [`PrimitiveType::Triangles`] the stream holds corner indices only;
/// for [`PrimitiveType::Polygon`] the per-face arities come first and the
/// corner indices after, so the stream is longer than the corner count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexBuffer {
    pub primitive: PrimitiveType,
    pub count: u32,
    pub indices: Vec<u32>,
}

impl IndexBuffer {
    /// The 0..n stream addressing `corner_count` expanded corners in order.
    pub fn identity(corner_count: usize) -> Vec<u32> {
        (0..corner_count as u32).collect()
    }

    /// Pack a triangle list. `indices` holds three entries per triangle.
    pub fn triangle_list(indices: Vec<u32>) -> Self {
        let count = (indices.len() / 3) as u32;
        IndexBuffer {
            primitive: PrimitiveType::Triangles,
            count,
            indices,
        }
    }

    /// Pack a polygon list: the arity section first, one entry per face,
    /// then the flat corner index stream. Callers supply exactly
    /// `arities.iter().sum()` indices.
    pub fn polygon_list(arities: &[u32], indices: &[u32]) -> Self {
        let mut stream = Vec::with_capacity(arities.len() + indices.len());
        stream.extend_from_slice(arities);
        stream.extend_from_slice(indices);
        IndexBuffer {
            primitive: PrimitiveType::Polygon,
            count: arities.len() as u32,
            indices: stream,
        }
    }

    /// Encode the stream for upload, one 4-byte native-endian word per
    /// entry, in stream order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.indices.iter().flat_map(|ix| ix.to_ne_bytes()).collect()
    }

    /// Size of [`Self::to_bytes`] output without encoding.
    pub fn byte_len(&self) -> usize {
        self.indices.len() * BYTES_PER_INDEX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_counts_up_from_zero() {
        assert_eq!(IndexBuffer::identity(4), vec![0, 1, 2, 3]);
        assert!(IndexBuffer::identity(0).is_empty());
    }

    #[test]
    fn triangle_list_counts_triples() {
        let buffer = IndexBuffer::triangle_list(IndexBuffer::identity(6));
        assert_eq!(buffer.primitive, PrimitiveType::Triangles);
        assert_eq!(buffer.count, 2);
        assert_eq!(buffer.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn polygon_list_leads_with_the_arity_section() {
        let buffer = IndexBuffer::polygon_list(&[3, 4], &IndexBuffer::identity(7));
        assert_eq!(buffer.primitive, PrimitiveType::Polygon);
        assert_eq!(buffer.count, 2);
        assert_eq!(buffer.indices, vec![3, 4, 0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn polygon_list_carries_welded_indices_verbatim() {
        let buffer = IndexBuffer::polygon_list(&[3, 3], &[0, 1, 2, 2, 1, 3]);
        assert_eq!(buffer.indices, vec![3, 3, 0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn encodes_four_native_endian_bytes_per_entry() {
        let buffer = IndexBuffer::triangle_list(vec![0, 1, 258]);
        let bytes = buffer.to_bytes();
        assert_eq!(bytes.len(), buffer.byte_len());
        assert_eq!(bytes.len(), 3 * BYTES_PER_INDEX);
        assert_eq!(&bytes[0..4], &0u32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &1u32.to_ne_bytes());
        assert_eq!(&bytes[8..12], &258u32.to_ne_bytes());
    }

    #[test]
    fn empty_streams_encode_to_nothing() {
        let buffer = IndexBuffer::triangle_list(Vec::new());
        assert_eq!(buffer.count, 0);
        assert!(buffer.to_bytes().is_empty());

        let buffer = IndexBuffer::polygon_list(&[], &[]);
        assert_eq!(buffer.count, 0);
        assert!(buffer.indices.is_empty());
    }
}
