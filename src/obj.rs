//! OBJ-subset geometry ingestion.
//!
//! Line-oriented parser for the face-based text format exported by the
//! asset pipeline: `v` positions, `vt` texture coordinates, `vn` normals
//! and triangular `f` records with 1-based `p[/t][/n]` references. All
//! other records, including comments, are ignored.
//!
//! Every face corner appends a fresh vertex record — no shared-vertex
//! welding. Artist exports do not guarantee UV/normal consistency across
//! position reuse, so welding would corrupt seams.
//!
//! After all faces are read, a post-pass derives per-vertex tangents for
//! normal mapping: per-triangle tangents from the UV-delta determinant,
//! summed into the corner vertices (intentional smoothing across shared
//! corners), then Gram-Schmidt-orthogonalized against the normal.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::{Vec2, Vec3};
use log::warn;

use crate::errors::{Result, ViewerError};

/// Raw parsed vertex. The tangent field is only valid once
/// [`parse`] has completed its post-pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexIn {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

/// Parse result: unwelded vertices plus a triangle-list index array.
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    pub vertices: Vec<VertexIn>,
    pub indices: Vec<u32>,
}

/// Degenerate-UV guard for the tangent determinant.
const UV_DET_EPSILON: f32 = 1e-8;

/// Opens and parses a geometry file.
///
/// An unreadable file is a hard error; see [`parse`] for the record-level
/// error policy.
pub fn load(path: impl AsRef<Path>, flip_axis_and_winding: bool) -> Result<ObjMesh> {
    let file = File::open(path)?;
    parse(BufReader::new(file), flip_axis_and_winding)
}

/// Parses a geometry text stream into vertices and indices.
///
/// Malformed numeric records are skipped with a warning (legacy permissive
/// behavior). Face references outside the arrays read so far fail the
/// parse with [`ViewerError::ObjParse`] — the legacy parser indexed out of
/// bounds there, which we refuse to reproduce.
///
/// With `flip_axis_and_winding` the 2nd/3rd index of every triangle are
/// swapped and the Z component of position, normal and tangent is negated,
/// converting between coordinate-system handedness conventions.
pub fn parse(reader: impl BufRead, flip_axis_and_winding: bool) -> Result<ObjMesh> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut mesh = ObjMesh::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => match read_vec3(&mut tokens) {
                Some(v) => positions.push(v),
                None => warn!("skipping malformed `v` record at line {line_no}"),
            },
            Some("vt") => match read_vec2(&mut tokens) {
                // Flip V to the top-left-origin image convention.
                Some(uv) => uvs.push(Vec2::new(uv.x, 1.0 - uv.y)),
                None => warn!("skipping malformed `vt` record at line {line_no}"),
            },
            Some("vn") => match read_vec3(&mut tokens) {
                Some(n) => normals.push(n),
                None => warn!("skipping malformed `vn` record at line {line_no}"),
            },
            Some("f") => {
                read_face(
                    &mut tokens,
                    line_no,
                    &positions,
                    &uvs,
                    &normals,
                    flip_axis_and_winding,
                    &mut mesh,
                )?;
            }
            // Comments and unrecognized records.
            _ => {}
        }
    }

    accumulate_tangents(&mut mesh);
    finalize_vertices(&mut mesh, flip_axis_and_winding);

    Ok(mesh)
}

fn read_vec2<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<Vec2> {
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    Some(Vec2::new(x, y))
}

fn read_vec3<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<Vec3> {
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    let z = tokens.next()?.parse().ok()?;
    Some(Vec3::new(x, y, z))
}

/// Consumes the first three corner references of a face record. Extra
/// references on the line are ignored, matching the legacy reader which
/// discarded the rest of the line after three corners.
fn read_face<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
    flip_winding: bool,
    mesh: &mut ObjMesh,
) -> Result<()> {
    let face_start = mesh.vertices.len();
    let mut corner_indices = [0u32; 3];

    for slot in &mut corner_indices {
        let Some(reference) = tokens.next() else {
            warn!("skipping `f` record with fewer than 3 corners at line {line_no}");
            // Drop any corners already appended for this face.
            mesh.vertices.truncate(face_start);
            return Ok(());
        };

        let vertex = resolve_corner(reference, line_no, positions, uvs, normals)?;
        mesh.vertices.push(vertex);
        *slot = mesh.vertices.len() as u32 - 1;
    }

    mesh.indices.push(corner_indices[0]);
    if flip_winding {
        mesh.indices.push(corner_indices[2]);
        mesh.indices.push(corner_indices[1]);
    } else {
        mesh.indices.push(corner_indices[1]);
        mesh.indices.push(corner_indices[2]);
    }

    Ok(())
}

/// Resolves one `p[/t][/n]` corner reference against the arrays read so
/// far. Indices are 1-based.
fn resolve_corner(
    reference: &str,
    line_no: usize,
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
) -> Result<VertexIn> {
    let mut parts = reference.split('/');

    let position = lookup(parts.next(), positions, line_no, "position")?
        .ok_or_else(|| ViewerError::ObjParse {
            line: line_no,
            message: format!("face corner `{reference}` has no position index"),
        })?;

    let uv = lookup(parts.next(), uvs, line_no, "texture coordinate")?;
    let normal = lookup(parts.next(), normals, line_no, "normal")?;

    Ok(VertexIn {
        position,
        uv: uv.unwrap_or_default(),
        normal: normal.unwrap_or_default(),
        tangent: Vec3::ZERO,
    })
}

/// Parses an optional 1-based index segment and fetches the element.
/// Empty segments (as in `p//n`) resolve to `None`; a present index that
/// does not parse or is out of range is an error.
fn lookup<T: Copy>(
    segment: Option<&str>,
    elements: &[T],
    line_no: usize,
    kind: &str,
) -> Result<Option<T>> {
    let Some(segment) = segment else {
        return Ok(None);
    };
    if segment.is_empty() {
        return Ok(None);
    }

    let index: usize = segment.parse().map_err(|_| ViewerError::ObjParse {
        line: line_no,
        message: format!("invalid {kind} index `{segment}`"),
    })?;

    index
        .checked_sub(1)
        .and_then(|i| elements.get(i).copied())
        .map(Some)
        .ok_or_else(|| ViewerError::ObjParse {
            line: line_no,
            message: format!(
                "{kind} index {index} out of range (have {})",
                elements.len()
            ),
        })
}

/// Accumulates per-triangle tangents into the corner vertices.
///
/// Triangles with a degenerate UV mapping (determinant ~ 0) contribute
/// nothing; letting them through would divide by zero and poison the
/// vertex buffer with non-finite values.
fn accumulate_tangents(mesh: &mut ObjMesh) {
    for triangle in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];

        let p0 = mesh.vertices[i0].position;
        let p1 = mesh.vertices[i1].position;
        let p2 = mesh.vertices[i2].position;
        let uv0 = mesh.vertices[i0].uv;
        let uv1 = mesh.vertices[i1].uv;
        let uv2 = mesh.vertices[i2].uv;

        let edge0 = p1 - p0;
        let edge1 = p2 - p0;
        let diff_u = Vec2::new(uv1.x - uv0.x, uv2.x - uv0.x);
        let diff_v = Vec2::new(uv1.y - uv0.y, uv2.y - uv0.y);

        let det = diff_u.x * diff_v.y - diff_u.y * diff_v.x;
        if det.abs() < UV_DET_EPSILON {
            continue;
        }

        let tangent = (edge0 * diff_v.y - edge1 * diff_v.x) / det;
        mesh.vertices[i0].tangent += tangent;
        mesh.vertices[i1].tangent += tangent;
        mesh.vertices[i2].tangent += tangent;
    }
}

/// Orthogonalizes accumulated tangents against their normals and applies
/// the handedness flip.
fn finalize_vertices(mesh: &mut ObjMesh, flip_axis_and_winding: bool) {
    for vertex in &mut mesh.vertices {
        let rejected = vertex.tangent - vertex.normal * vertex.tangent.dot(vertex.normal);
        vertex.tangent = rejected.normalize_or_zero();

        if flip_axis_and_winding {
            vertex.position.z = -vertex.position.z;
            vertex.normal.z = -vertex.normal.z;
            vertex.tangent.z = -vertex.tangent.z;
        }
    }
}
