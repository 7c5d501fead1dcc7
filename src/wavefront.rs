//! Parsing for the position/normal/face subset of Wavefront OBJ.
//!
//! Only `v`, `vn` and `f` records are consumed; comments, texture
//! coordinates, object/group/material directives and blank lines are skipped
//! without error. Faces must spell each corner as `position//normal`, the
//! form OBJ uses when texture coordinates are absent.

use nalgebra::{Point3, Vector3};

use crate::error::{ImportError, ImportResult};

/// One corner of a face: 0-based indices into the attribute tables.
///
/// Indices stay signed until the lookup stage so that any integer the file
/// contains survives long enough to be reported in a range error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: i64,
    pub normal: i64,
}

/// One `f` record with 3 or 4 corners, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceRecord {
    pub corners: Vec<Corner>,
    /// 1-based source line the face was read from.
    pub line: usize,
}

/// The attribute tables and face records of one OBJ file.
///
/// Positions and normals are kept in file order and indexed 0-based; the
/// 1-based indices in face records are converted during parsing. Normals are
/// unit length by construction.
#[derive(Debug, Default)]
pub struct RawModel {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub faces: Vec<FaceRecord>,
}

impl RawModel {
    /// Parse OBJ text into attribute tables and face records.
    pub fn parse(text: &str) -> ImportResult<Self> {
        let records = classify_lines(text);

        let mut model = RawModel {
            positions: Vec::with_capacity(records.positions.len()),
            normals: Vec::with_capacity(records.normals.len()),
            faces: Vec::with_capacity(records.faces.len()),
        };

        for record in &records.positions {
            let [x, y, z] = parse_triple(record)?;
            model.positions.push(Point3::new(x, y, z));
        }

        for record in &records.normals {
            let [x, y, z] = parse_triple(record)?;
            let normal = Vector3::new(x, y, z)
                .try_normalize(0.0)
                .ok_or(ImportError::ZeroLengthNormal { line: record.line })?;
            model.normals.push(normal);
        }

        for record in &records.faces {
            model.faces.push(parse_face(record)?);
        }

        Ok(model)
    }

    /// Fan-split every quad into triangles (0,1,2) and (0,2,3) of its
    /// original corners, each corner keeping its own index pair. Triangles
    /// pass through untouched.
    ///
    /// The fan is only geometrically correct for convex planar quads; no
    /// convexity or planarity check is performed.
    pub fn triangulate(mut self) -> Self {
        let mut triangles = Vec::with_capacity(self.faces.len());
        for face in self.faces {
            if face.corners.len() == 4 {
                let c = &face.corners;
                triangles.push(FaceRecord {
                    corners: vec![c[0], c[1], c[2]],
                    line: face.line,
                });
                triangles.push(FaceRecord {
                    corners: vec![c[0], c[2], c[3]],
                    line: face.line,
                });
            } else {
                triangles.push(face);
            }
        }
        self.faces = triangles;
        self
    }

    /// Total corners across all face records.
    pub fn corner_count(&self) -> usize {
        self.faces.iter().map(|face| face.corners.len()).sum()
    }

    /// Per-face corner counts, in file order.
    pub fn face_arities(&self) -> Vec<u32> {
        self.faces
            .iter()
            .map(|face| face.corners.len() as u32)
            .collect()
    }
}

/// A classified record: 1-based line number, the full source line, and the
/// text after the record prefix.
struct Record<'a> {
    line: usize,
    text: &'a str,
    rest: &'a str,
}

/// The three record streams of one file, each in file order.
#[derive(Default)]
struct Records<'a> {
    positions: Vec<Record<'a>>,
    normals: Vec<Record<'a>>,
    faces: Vec<Record<'a>>,
}

/// Split OBJ text into classified records. `vn ` is checked before `v ` so
/// normal records can never be mistaken for positions; anything that is not
/// a `v`/`vn`/`f` record is skipped. No numeric parsing happens here.
fn classify_lines(text: &str) -> Records<'_> {
    let mut records = Records::default();
    for (number, line) in text.lines().enumerate() {
        let record = |rest| Record {
            line: number + 1,
            text: line,
            rest,
        };
        if let Some(rest) = line.strip_prefix("vn ") {
            records.normals.push(record(rest));
        } else if let Some(rest) = line.strip_prefix("v ") {
            records.positions.push(record(rest));
        } else if let Some(rest) = line.strip_prefix("f ") {
            records.faces.push(record(rest));
        }
    }
    records
}

fn malformed(record: &Record, reason: String) -> ImportError {
    ImportError::Parse {
        line: record.line,
        text: record.text.to_string(),
        reason,
    }
}

/// Parse the first three space-separated fields of a `v`/`vn` remainder.
/// Extra fields (such as a `w` component) are ignored.
fn parse_triple(record: &Record) -> ImportResult<[f32; 3]> {
    let mut fields = record.rest.trim_start_matches(' ').split(' ');
    let mut triple = [0.0_f32; 3];
    for slot in &mut triple {
        let field = fields
            .next()
            .ok_or_else(|| malformed(record, "expected 3 numeric fields".to_string()))?;
        *slot = field
            .parse()
            .map_err(|_| malformed(record, format!("`{field}` is not a number")))?;
    }
    Ok(triple)
}

/// Parse one face remainder into 0-based corners.
fn parse_face(record: &Record) -> ImportResult<FaceRecord> {
    let tokens: Vec<&str> = record.rest.trim_start_matches(' ').split(' ').collect();
    if !(3..=4).contains(&tokens.len()) {
        return Err(ImportError::UnsupportedFaceArity {
            line: record.line,
            arity: tokens.len(),
        });
    }

    let corners = tokens
        .iter()
        .map(|token| parse_corner(record, token))
        .collect::<ImportResult<Vec<_>>>()?;

    Ok(FaceRecord {
        corners,
        line: record.line,
    })
}

/// Parse a `position//normal` corner token. Anything past a second `//` is
/// ignored. Both indices are converted from OBJ's 1-based convention.
fn parse_corner(record: &Record, token: &str) -> ImportResult<Corner> {
    let mut parts = token.split("//");
    let position = parts.next().unwrap_or_default();
    let normal = parts.next().ok_or_else(|| {
        malformed(
            record,
            format!("corner `{token}` is missing its `//normal` part"),
        )
    })?;

    Ok(Corner {
        position: parse_index(record, position)?.saturating_sub(1),
        normal: parse_index(record, normal)?.saturating_sub(1),
    })
}

fn parse_index(record: &Record, part: &str) -> ImportResult<i64> {
    part.parse()
        .map_err(|_| malformed(record, format!("`{part}` is not an index")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use float_cmp::approx_eq;

    #[test]
    fn classifies_records_and_skips_the_rest() {
        let text = "# comment\nv 1 2 3\nvt 0.5 0.5\nvn 0 1 0\ng lump\nf 1//1 1//1 1//1\n\nusemtl none\n";
        let records = classify_lines(text);
        assert_eq!(records.positions.len(), 1);
        assert_eq!(records.normals.len(), 1);
        assert_eq!(records.faces.len(), 1);
        assert_eq!(records.positions[0].line, 2);
        assert_eq!(records.normals[0].line, 4);
        assert_eq!(records.faces[0].line, 6);
        assert_eq!(records.positions[0].rest, "1 2 3");
    }

    #[test]
    fn vn_prefix_wins_over_v() {
        let records = classify_lines("vn 0 0 1\n");
        assert_eq!(records.positions.len(), 0);
        assert_eq!(records.normals.len(), 1);
    }

    #[test]
    fn parses_positions_in_file_order() {
        let model = RawModel::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\n").unwrap();
        assert_eq!(
            model.positions,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn ignores_extra_fields_after_the_triple() {
        let model = RawModel::parse("v 1 2 3 0.5\n").unwrap();
        assert_eq!(model.positions, vec![Point3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn tolerates_leading_spaces_after_the_prefix() {
        let model = RawModel::parse("v  1 2 3\nvn   0 0 1\nf  1//1 1//1 1//1\n").unwrap();
        assert_eq!(model.positions, vec![Point3::new(1.0, 2.0, 3.0)]);
        assert_eq!(model.normals, vec![Vector3::new(0.0, 0.0, 1.0)]);
        assert_eq!(model.faces[0].corners.len(), 3);
    }

    #[test]
    fn rejects_short_position_lines() {
        let err = RawModel::parse("v 1 2\n").unwrap_err();
        assert!(matches!(err, ImportError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let err = RawModel::parse("v 1 2 banana\n").unwrap_err();
        assert!(matches!(err, ImportError::Parse { line: 1, .. }));
    }

    #[test]
    fn normalizes_normals_at_parse_time() {
        let model = RawModel::parse("vn 0 0 5\n").unwrap();
        assert_eq!(model.normals, vec![Vector3::new(0.0, 0.0, 1.0)]);
    }

    #[test]
    fn normalizing_a_unit_normal_is_stable() {
        let model = RawModel::parse("vn 0.26726124 0.5345225 0.8017837\n").unwrap();
        let n = model.normals[0];
        assert!(approx_eq!(f32, n.x, 0.26726124, epsilon = 1e-6));
        assert!(approx_eq!(f32, n.y, 0.5345225, epsilon = 1e-6));
        assert!(approx_eq!(f32, n.z, 0.8017837, epsilon = 1e-6));
    }

    #[test]
    fn rejects_zero_length_normals() {
        let err = RawModel::parse("vn 0 0 0\n").unwrap_err();
        assert!(matches!(err, ImportError::ZeroLengthNormal { line: 1 }));
    }

    #[test]
    fn ignores_extra_slash_groups_in_corner_tokens() {
        let model = RawModel::parse("f 1//1//7 2//1//8 3//2//9\n").unwrap();
        assert_eq!(
            model.faces[0].corners,
            vec![
                Corner {
                    position: 0,
                    normal: 0
                },
                Corner {
                    position: 1,
                    normal: 0
                },
                Corner {
                    position: 2,
                    normal: 1
                },
            ]
        );
    }

    #[test]
    fn converts_face_indices_to_zero_based() {
        let model = RawModel::parse("f 1//1 2//1 3//2\n").unwrap();
        assert_eq!(
            model.faces[0].corners,
            vec![
                Corner {
                    position: 0,
                    normal: 0
                },
                Corner {
                    position: 1,
                    normal: 0
                },
                Corner {
                    position: 2,
                    normal: 1
                },
            ]
        );
        assert_eq!(model.faces[0].line, 1);
    }

    #[test]
    fn rejects_corners_without_a_normal_part() {
        let err = RawModel::parse("f 1 2 3\n").unwrap_err();
        assert!(matches!(err, ImportError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_faces_with_unsupported_arity() {
        let err = RawModel::parse("f 1//1 2//1\n").unwrap_err();
        assert!(matches!(
            err,
            ImportError::UnsupportedFaceArity { line: 1, arity: 2 }
        ));

        let err = RawModel::parse("f 1//1 2//1 3//1 4//1 5//1\n").unwrap_err();
        assert!(matches!(
            err,
            ImportError::UnsupportedFaceArity { line: 1, arity: 5 }
        ));
    }

    #[test]
    fn triangulates_quads_as_a_fan() {
        let model = RawModel::parse("f 1//1 2//2 3//3 4//4\n")
            .unwrap()
            .triangulate();
        assert_eq!(model.faces.len(), 2);

        let first: Vec<i64> = model.faces[0].corners.iter().map(|c| c.position).collect();
        let second: Vec<i64> = model.faces[1].corners.iter().map(|c| c.position).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(second, vec![0, 2, 3]);

        // Both triangles keep the quad's per-corner normal pairing.
        assert_eq!(model.faces[0].corners[0].normal, 0);
        assert_eq!(model.faces[1].corners[1].normal, 2);
        assert_eq!(model.faces[1].corners[2].normal, 3);
    }

    #[test]
    fn triangulation_leaves_triangles_untouched() {
        let model = RawModel::parse("f 1//1 2//1 3//1\n").unwrap().triangulate();
        assert_eq!(model.faces.len(), 1);
        assert_eq!(model.faces[0].corners.len(), 3);
    }

    #[test]
    fn counts_corners_and_arities() {
        let model = RawModel::parse("f 1//1 2//1 3//1\nf 1//1 2//1 3//1 4//1\n").unwrap();
        assert_eq!(model.corner_count(), 7);
        assert_eq!(model.face_arities(), vec![3, 4]);
    }
}
