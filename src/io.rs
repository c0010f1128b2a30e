//! Readers and writers for the Triangle `.node`/`.ele` file formats.
//!
//! <https://www.cs.cmu.edu/~quake/triangle.node.html>

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};

use crate::data::Point;

/// Contents of a `.node` file: points in file order together with
/// their stable input indices (1-based in the canonical format, but
/// any integers are accepted and carried through to the `.ele`
/// output).
#[derive(Debug, Clone)]
pub struct NodeFile {
  pub indices: Vec<usize>,
  pub points: Vec<Point>,
}

/// Reads a `.node` file: a `N dim attrs markers` header with
/// `dim == 2`, then one `index x y [attrs...]` line per vertex.
/// Lines starting with `#` and blank lines are skipped.
pub fn read_node(path: &Path) -> Result<NodeFile> {
  let text =
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

  let mut expected: Option<usize> = None;
  let mut indices = Vec::new();
  let mut points = Vec::new();

  for (lineno, line) in text.lines().enumerate() {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() || fields[0].starts_with('#') {
      continue;
    }
    let loc = || format!("{}:{}", path.display(), lineno + 1);

    match expected {
      None => {
        ensure!(
          fields.len() == 4,
          "{}: expected header `<vertices> <dimension> <attributes> <markers>`",
          loc()
        );
        let n: usize = fields[0].parse().with_context(|| format!("{}: bad vertex count", loc()))?;
        let dim: usize = fields[1].parse().with_context(|| format!("{}: bad dimension", loc()))?;
        ensure!(dim == 2, "{}: dimension must be 2, found {}", loc(), dim);
        indices.reserve(n);
        points.reserve(n);
        expected = Some(n);
      }
      Some(n) => {
        if points.len() == n {
          tracing::warn!(
            "{}: expected {} vertices; ignoring extra lines",
            path.display(),
            n
          );
          break;
        }
        ensure!(fields.len() >= 3, "{}: expected `<index> <x> <y> [attrs...]`", loc());
        let index: usize = fields[0].parse().with_context(|| format!("{}: bad vertex index", loc()))?;
        let x: f64 = fields[1].parse().with_context(|| format!("{}: bad x coordinate", loc()))?;
        let y: f64 = fields[2].parse().with_context(|| format!("{}: bad y coordinate", loc()))?;
        indices.push(index);
        points.push(Point::new([x, y]));
      }
    }
  }

  let n = match expected {
    Some(n) => n,
    None => bail!("{}: missing header line", path.display()),
  };
  ensure!(
    points.len() == n,
    "{}: expected {} vertices, found {}",
    path.display(),
    n,
    points.len()
  );
  Ok(NodeFile { indices, points })
}

/// Writes a `.ele` file: a `<triangles> 3 0` header, then one
/// `t i1 i2 i3` line per triangle with `t` 1-based and the `i*` the
/// input indices of the corners in CCW order.
pub fn write_ele(path: &Path, triangles: &[[usize; 3]]) -> Result<()> {
  let mut out = String::new();
  writeln!(out, "{}\t3\t0", triangles.len())?;
  for (t, tri) in triangles.iter().enumerate() {
    writeln!(out, "{}\t{}\t{}\t{}", t + 1, tri[0], tri[1], tri[2])?;
  }
  fs::write(path, out).with_context(|| format!("writing {}", path.display()))?;
  Ok(())
}

/// Reads a `.ele` file back into index triples.
pub fn read_ele(path: &Path) -> Result<Vec<[usize; 3]>> {
  let text =
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

  let mut expected: Option<usize> = None;
  let mut triangles = Vec::new();

  for (lineno, line) in text.lines().enumerate() {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() || fields[0].starts_with('#') {
      continue;
    }
    let loc = || format!("{}:{}", path.display(), lineno + 1);

    match expected {
      None => {
        ensure!(
          fields.len() == 3,
          "{}: expected header `<triangles> <corners> <attributes>`",
          loc()
        );
        let n: usize = fields[0].parse().with_context(|| format!("{}: bad triangle count", loc()))?;
        ensure!(fields[1] == "3", "{}: only 3-corner elements are supported", loc());
        triangles.reserve(n);
        expected = Some(n);
      }
      Some(_) => {
        ensure!(fields.len() == 4, "{}: expected `<t> <i1> <i2> <i3>`", loc());
        let mut tri = [0usize; 3];
        for (slot, field) in tri.iter_mut().zip(&fields[1..]) {
          *slot = field.parse().with_context(|| format!("{}: bad vertex index", loc()))?;
        }
        triangles.push(tri);
      }
    }
  }

  let n = expected.with_context(|| format!("{}: missing header line", path.display()))?;
  ensure!(
    triangles.len() == n,
    "{}: expected {} triangles, found {}",
    path.display(),
    n,
    triangles.len()
  );
  Ok(triangles)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn node_round_trip_through_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.node");
    fs::write(
      &path,
      "# a comment\n\
       4 2 0 0\n\
       \n\
       1 0.0 0.0\n\
       2 1.0 0.0\n\
       3 1.0 1.0\n\
       4 0.0 1.0\n",
    )
    .unwrap();
    let node = read_node(&path).unwrap();
    assert_eq!(node.indices, vec![1, 2, 3, 4]);
    assert_eq!(node.points.len(), 4);
    assert_eq!(node.points[2], Point::new([1.0, 1.0]));
  }

  #[test]
  fn node_rejects_wrong_dimension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.node");
    fs::write(&path, "2 3 0 0\n1 0 0 0\n2 1 1 1\n").unwrap();
    assert!(read_node(&path).is_err());
  }

  #[test]
  fn node_rejects_truncated_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.node");
    fs::write(&path, "3 2 0 0\n1 0.0 0.0\n2 1.0 0.0\n").unwrap();
    assert!(read_node(&path).is_err());
  }

  #[test]
  fn ele_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.ele");
    let triangles = vec![[1, 2, 3], [1, 3, 4]];
    write_ele(&path, &triangles).unwrap();
    assert_eq!(read_ele(&path).unwrap(), triangles);
  }

  #[test]
  fn empty_ele() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.ele");
    write_ele(&path, &[]).unwrap();
    assert_eq!(read_ele(&path).unwrap(), Vec::<[usize; 3]>::new());
  }
}
