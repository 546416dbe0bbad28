/// Loader for whitespace-delimited `v` / `f` shape-model records
use nom::{
    bytes::complete::{take_till1, take_while, take_while1},
    character::complete::i64 as integer,
    combinator::{all_consuming, map},
    multi::count,
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{FlybyError, Result};
use crate::geometry::{Face, Mesh, Vertex};

/// One line of a shape-model file
#[derive(Debug, Clone, PartialEq)]
enum Record<'a> {
    Vertex([f32; 3]),
    Face([i64; 3]),
    Other(&'a str),
}

/// Read and parse a shape-model file
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FlybyError::NotFound(path.to_path_buf()),
        _ => FlybyError::Io(e),
    })?;

    let mesh = parse_mesh(&text)?;
    tracing::info!(
        "Loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertices().len(),
        mesh.faces().len()
    );

    let unused = mesh.unreferenced_vertices();
    if unused > 0 {
        tracing::warn!("{} vertices are not referenced by any face", unused);
    }

    Ok(mesh)
}

/// Parse shape-model text.
///
/// Face indices are one-based in the text and zero-based in the result.
/// Indices are bounds-checked once every vertex has been read, so faces may
/// appear before the vertices they reference.
pub fn parse_mesh(input: &str) -> Result<Mesh> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (i, line) in input.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        match parse_record(line) {
            Ok((_, Record::Vertex([x, y, z]))) => {
                if ![x, y, z].iter().all(|c| c.is_finite()) {
                    return Err(FlybyError::parse(
                        line_no,
                        format!("vertex coordinate out of range: {:?}", line.trim()),
                    ));
                }
                vertices.push(Vertex::new(x, y, z));
            }
            Ok((_, Record::Face(raw))) => faces.push((line_no, raw)),
            Ok((_, Record::Other(_))) => {}
            Err(_) => return Err(describe_failure(line_no, line)),
        }
    }

    let vertex_count = vertices.len() as i64;
    let faces = faces
        .into_iter()
        .map(|(line_no, raw)| {
            let mut indices = [0u32; 3];
            for (slot, &index) in indices.iter_mut().zip(&raw) {
                if index < 1 || index > vertex_count {
                    return Err(FlybyError::parse(
                        line_no,
                        format!(
                            "face index {} out of range 1..={}",
                            index, vertex_count
                        ),
                    ));
                }
                *slot = (index - 1) as u32;
            }
            Ok(Face(indices))
        })
        .collect::<Result<Vec<_>>>()?;

    Mesh::new(vertices, faces)
}

/// Serialize a mesh in the same record format `parse_mesh` reads
pub fn write_mesh(mesh: &Mesh) -> String {
    let mut out = String::new();
    for v in mesh.vertices() {
        let p = v.position;
        // `{:?}` keeps enough digits for f32 values to read back exactly
        let _ = writeln!(out, "v {:?} {:?} {:?}", p.x, p.y, p.z);
    }
    for f in mesh.faces() {
        let [a, b, c] = f.0;
        let _ = writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1);
    }
    out
}

fn parse_record(line: &str) -> IResult<&str, Record<'_>> {
    let (rest, tag) = preceded(blank0, take_till1(char::is_whitespace))(line)?;
    match tag {
        "v" => all_consuming(map(fields(float), Record::Vertex))(rest),
        "f" => all_consuming(map(fields(integer), Record::Face))(rest),
        other => Ok(("", Record::Other(other))),
    }
}

/// Exactly three whitespace-separated fields, allowing trailing whitespace
fn fields<'a, O, F>(field: F) -> impl FnMut(&'a str) -> IResult<&'a str, [O; 3]>
where
    F: FnMut(&'a str) -> IResult<&'a str, O> + Copy,
    O: Copy,
{
    move |input| {
        let (rest, values) = terminated(count(preceded(blank1, field), 3), blank0)(input)?;
        Ok((rest, [values[0], values[1], values[2]]))
    }
}

/// Separators follow `char::is_whitespace`, matching how blank lines are
/// detected
fn blank0(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace)(input)
}

fn blank1(input: &str) -> IResult<&str, &str> {
    take_while1(char::is_whitespace)(input)
}

fn describe_failure(line_no: usize, line: &str) -> FlybyError {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let kind = if tokens[0] == "v" { "vertex" } else { "face" };
    let message = if tokens.len() != 4 {
        format!("{} record needs 3 fields, found {}", kind, tokens.len() - 1)
    } else {
        format!("malformed {} record: {:?}", kind, line.trim())
    };
    FlybyError::parse(line_no, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::io::Write;

    const TRIANGLE: &str = "v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nv 0.0 1.0 0.0\nf 1 2 3\n";

    #[test]
    fn test_face_indices_are_zero_based() {
        let mesh = parse_mesh(TRIANGLE).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
        assert_eq!(mesh.vertices()[1].position, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ignores_unknown_records() {
        let input = "# comment\no rock\nvn 0 0 1\n\nv 1 2 3\r\nv 4 5 6\nv\t7 8 9\nvt 0.5 0.5\nf 3 2 1\n";
        let mesh = parse_mesh(input).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces(), &[Face::new(2, 1, 0)]);
    }

    #[test]
    fn test_faces_before_vertices() {
        let input = "f 1 2 3\nv 0 0 0\nv 1 0 0\nv 0 1 0\n";
        let mesh = parse_mesh(input).unwrap();
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_mesh("v 1.0 2.0\n").unwrap_err();
        assert!(matches!(err, FlybyError::Parse { line: 1, .. }));

        let err = parse_mesh("v 0 0 0\nf 1 1 1 1\n").unwrap_err();
        assert!(matches!(err, FlybyError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(matches!(
            parse_mesh("v 1.0 abc 2.0\n"),
            Err(FlybyError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_mesh("v 0 0 0\nf 1 2.5 3\n"),
            Err(FlybyError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_coordinates() {
        for vertex in ["v nan 0 0", "v 0 inf 0", "v 0 0 -infinity", "v 1e39 0 0"] {
            let input = format!("v 0 0 0\n{}\nv 0 1 0\nf 1 2 3\n", vertex);
            match parse_mesh(&input) {
                Err(FlybyError::Parse { line, .. }) => assert_eq!(line, 2),
                other => panic!("expected parse error for {:?}, got {:?}", vertex, other),
            }
        }
    }

    #[test]
    fn test_form_feed_and_vertical_tab_separate_fields() {
        let input = "\x0cv 0 0 0\n\x0bv\x0c1 0 0\nv 0 1 0\x0b\n\x0c# note\nf 1\x0b2 3\n";
        let mesh = parse_mesh(input).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.vertices()[1].position, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_rejects_zero_and_negative_indices() {
        let base = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";
        for face in ["f 0 1 2", "f -1 2 3", "f 1 2 4"] {
            let input = format!("{}{}\n", base, face);
            match parse_mesh(&input) {
                Err(FlybyError::Parse { line, .. }) => assert_eq!(line, 4),
                other => panic!("expected parse error for {:?}, got {:?}", face, other),
            }
        }
    }

    #[test]
    fn test_all_indices_in_range() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 2 4\nf 2 3 4\nf 4 3 1\n";
        let mesh = parse_mesh(input).unwrap();
        let n = mesh.vertices().len();
        assert!(mesh.faces().iter().all(|f| f.indices().iter().all(|&i| i < n)));
    }

    #[test]
    fn test_write_then_parse_is_identical() {
        let input = "v 0.1 -2.5 3.14159\nv 1e-3 7 -0.333333\nv 12.75 0 6\nf 1 2 3\nf 3 2 1\n";
        let mesh = parse_mesh(input).unwrap();
        let reparsed = parse_mesh(&write_mesh(&mesh)).unwrap();
        assert_eq!(mesh, reparsed);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_mesh(dir.path().join("missing.obj")).unwrap_err();
        assert!(matches!(err, FlybyError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TRIANGLE.as_bytes()).unwrap();
        let mesh = load_mesh(file.path()).unwrap();
        assert_eq!(mesh.faces().len(), 1);
    }
}
