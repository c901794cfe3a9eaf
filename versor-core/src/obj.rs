/// Wavefront OBJ loader producing unindexed vertex buffers
use std::fs;
use std::path::Path;

use log::info;
use nalgebra::{Vector2, Vector3};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1, multispace0, multispace1, one_of, space0, space1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list1,
    number::complete::float,
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::error::{Result, VersorError};
use crate::geometry::Mesh;

/// One `v/vt/vn` corner of a face, with 1-based or negative indices
#[derive(Debug, Clone, Copy, PartialEq)]
struct Corner {
    position: i64,
    texcoord: Option<i64>,
    normal: Option<i64>,
}

#[derive(Debug, PartialEq)]
enum Statement {
    Position(Vector3<f32>),
    Texcoord(Vector2<f32>),
    Normal(Vector3<f32>),
    Face(Vec<Corner>),
    Ignored,
}

/// Read and parse an OBJ file.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| VersorError::ResourceLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let mesh = parse_obj(&text)?;
    info!(
        "loaded {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text, triangulating polygons as fans.
///
/// Only `v`, `vt`, `vn` and `f` are used; other statements are skipped.
/// Corners without a normal get the face normal and corners without a
/// texture coordinate get `(0, 0)`.
pub fn parse_obj(input: &str) -> Result<Mesh> {
    let mut positions = Vec::new();
    let mut texcoords = Vec::new();
    let mut normals = Vec::new();
    let mut mesh = Mesh::new();

    for (index, raw_line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let statement = match parse_statement(line) {
            Ok((_, statement)) => statement,
            Err(e) => {
                return Err(VersorError::MeshParse {
                    line: line_no,
                    reason: format!("{:?}", e),
                })
            }
        };

        match statement {
            Statement::Position(p) => positions.push(p),
            Statement::Texcoord(t) => texcoords.push(t),
            Statement::Normal(n) => normals.push(n),
            Statement::Face(corners) => {
                if corners.len() < 3 {
                    return Err(VersorError::MeshParse {
                        line: line_no,
                        reason: "face needs at least three corners".to_string(),
                    });
                }
                let mut resolved = Vec::with_capacity(corners.len());
                for corner in &corners {
                    resolved.push(resolve_corner(corner, &positions, &texcoords, &normals, line_no)?);
                }
                for i in 1..resolved.len() - 1 {
                    push_triangle(&mut mesh, [resolved[0], resolved[i], resolved[i + 1]]);
                }
            }
            Statement::Ignored => {}
        }
    }

    Ok(mesh)
}

type ResolvedCorner = (Vector3<f32>, Vector2<f32>, Option<Vector3<f32>>);

fn push_triangle(mesh: &mut Mesh, corners: [ResolvedCorner; 3]) {
    let [a, b, c] = corners;
    let face_normal = (b.0 - a.0)
        .cross(&(c.0 - a.0))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros);
    for (position, texcoord, normal) in [a, b, c] {
        mesh.push_vertex(position, texcoord, normal.unwrap_or(face_normal));
    }
}

fn resolve_corner(
    corner: &Corner,
    positions: &[Vector3<f32>],
    texcoords: &[Vector2<f32>],
    normals: &[Vector3<f32>],
    line: usize,
) -> Result<ResolvedCorner> {
    let position = lookup(positions, corner.position, "position", line)?;
    let texcoord = match corner.texcoord {
        Some(i) => lookup(texcoords, i, "texcoord", line)?,
        None => Vector2::zeros(),
    };
    let normal = match corner.normal {
        Some(i) => Some(lookup(normals, i, "normal", line)?),
        None => None,
    };
    Ok((position, texcoord, normal))
}

/// Resolve a 1-based index, or a negative index counting back from the end.
fn lookup<T: Copy>(items: &[T], index: i64, kind: &str, line: usize) -> Result<T> {
    let resolved = if index > 0 {
        Some(index - 1)
    } else if index < 0 {
        Some(items.len() as i64 + index)
    } else {
        None
    };

    resolved
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| items.get(i).copied())
        .ok_or_else(|| VersorError::MeshParse {
            line,
            reason: format!("{} index {} out of range ({} defined)", kind, index, items.len()),
        })
}

fn parse_statement(input: &str) -> IResult<&str, Statement> {
    let (rest, keyword) = terminated(
        take_till1(|c: char| c.is_whitespace()),
        multispace0,
    )(input)?;

    match keyword {
        "v" => {
            let (rest, (x, y, z)) = parse_vector3(rest)?;
            // An optional w component is accepted and dropped
            let (rest, _) = all_consuming(opt(preceded(space1, float)))(rest.trim_end())?;
            Ok((rest, Statement::Position(Vector3::new(x, y, z))))
        }
        "vt" => {
            let (rest, u) = float(rest)?;
            let (rest, v) = opt(preceded(space1, float))(rest)?;
            let (rest, _) = all_consuming(opt(preceded(space1, float)))(rest.trim_end())?;
            Ok((rest, Statement::Texcoord(Vector2::new(u, v.unwrap_or(0.0)))))
        }
        "vn" => {
            let (rest, (x, y, z)) = all_consuming(terminated(parse_vector3, space0))(rest)?;
            Ok((rest, Statement::Normal(Vector3::new(x, y, z))))
        }
        "f" => {
            let (rest, corners) =
                all_consuming(terminated(separated_list1(space1, parse_corner), space0))(rest)?;
            Ok((rest, Statement::Face(corners)))
        }
        _ => Ok(("", Statement::Ignored)),
    }
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

fn parse_index(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), str::parse::<i64>)(input)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn parse_corner(input: &str) -> IResult<&str, Corner> {
    let (input, position) = parse_index(input)?;
    let (input, rest) = opt(preceded(
        char('/'),
        pair(opt(parse_index), opt(preceded(char('/'), parse_index))),
    ))(input)?;
    let (texcoord, normal) = rest.unwrap_or((None, None));
    Ok((
        input,
        Corner {
            position,
            texcoord,
            normal,
        },
    ))
}
