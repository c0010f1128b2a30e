use claims::debug_assert_ok;

use super::{EdgeId, Point, QuadEdgeArena, VertexId};
use crate::predicates::Predicates;
use crate::Error;

type Result<T> = std::result::Result<T, Error>;

/// A planar subdivision over a fixed point set.
///
/// Owns the (immutable) point array, the arena of live quad-edge
/// groups, and the predicates handle. All mutation goes through the
/// operators below; the point array outlives every edge.
pub struct Subdivision {
  points: Vec<Point>,
  edges: QuadEdgeArena,
  predicates: Predicates,
}

impl Subdivision {
  pub fn new(points: Vec<Point>) -> Subdivision {
    Subdivision {
      points,
      edges: QuadEdgeArena::new(),
      predicates: Predicates::new(),
    }
  }

  pub fn points(&self) -> &[Point] {
    &self.points
  }

  pub fn point(&self, v: VertexId) -> &Point {
    &self.points[v.0]
  }

  pub fn edges(&self) -> &QuadEdgeArena {
    &self.edges
  }

  pub fn predicates(&self) -> &Predicates {
    &self.predicates
  }

  pub fn make_edge(&mut self) -> EdgeId {
    self.edges.make_edge()
  }

  pub fn splice(&mut self, a: EdgeId, b: EdgeId) {
    self.edges.splice(a, b);
  }

  pub fn set_org(&mut self, e: EdgeId, v: VertexId) {
    self.edges.set_org(e, v);
  }

  pub fn set_dest(&mut self, e: EdgeId, v: VertexId) {
    self.edges.set_dest(e, v);
  }

  fn org_of(&self, e: EdgeId) -> Result<VertexId> {
    self.edges.org(e).ok_or(Error::InvariantViolation)
  }

  fn dest_of(&self, e: EdgeId) -> Result<VertexId> {
    self.edges.dest(e).ok_or(Error::InvariantViolation)
  }

  /// Adds a new edge from `dest(a)` to `org(b)`, spliced so that it
  /// lies in the left face of both. Returns the new primal edge.
  /// G&S pg. 103.
  pub fn connect(&mut self, a: EdgeId, b: EdgeId) -> Result<EdgeId> {
    let org = self.dest_of(a)?;
    let dest = self.org_of(b)?;
    let e = self.edges.make_edge();
    self.edges.set_org(e, org);
    self.edges.set_dest(e, dest);
    let lnext = self.edges.lnext(a);
    self.edges.splice(e, lnext);
    self.edges.splice(e.sym(), b);
    debug_assert_ok!(self.validate_edge(e));
    Ok(e)
  }

  /// Detaches `e` from the subdivision and frees its group. After this
  /// no live edge references the group. G&S pg. 103.
  pub fn delete_edge(&mut self, e: EdgeId) {
    let a = self.edges.oprev(e);
    self.edges.splice(e, a);
    let b = self.edges.oprev(e.sym());
    self.edges.splice(e.sym(), b);
    self.edges.remove(e);
  }

  /// Turns `e` into the other diagonal of the quadrilateral formed by
  /// its two adjacent triangles. Unused by the divide-and-conquer path
  /// but part of the subdivision vocabulary. G&S pg. 104.
  pub fn swap(&mut self, e: EdgeId) -> Result<()> {
    let a = self.edges.oprev(e);
    let b = self.edges.oprev(e.sym());

    self.edges.splice(e, a);
    self.edges.splice(e.sym(), b);

    let la = self.edges.lnext(a);
    self.edges.splice(e, la);
    let lb = self.edges.lnext(b);
    self.edges.splice(e.sym(), lb);

    let org = self.dest_of(a)?;
    let dest = self.dest_of(b)?;
    self.edges.set_org(e, org);
    self.edges.set_dest(e, dest);
    debug_assert_ok!(self.validate_edge(e));
    Ok(())
  }

  /// Enumerates the triangles of the subdivision: every closed
  /// `rnext` 3-cycle whose origins are in CCW order, each reported
  /// once. The CCW filter keeps 3-cycles of the unbounded face out.
  pub fn triangles(&self) -> Vec<[VertexId; 3]> {
    let mut seen = vec![false; self.edges.edge_bound()];
    let mut out = Vec::new();
    for e in self.edges.iter_primal() {
      if seen[e.0] {
        continue;
      }
      let e1 = self.edges.rnext(e);
      let e2 = self.edges.rnext(e1);
      if self.edges.rnext(e2) != e {
        continue;
      }
      let tri = match (self.edges.org(e), self.edges.org(e1), self.edges.org(e2)) {
        (Some(a), Some(b), Some(c)) => [a, b, c],
        _ => continue,
      };
      let ccw = self.predicates.ccw(self.point(tri[0]), self.point(tri[1]), self.point(tri[2]));
      if ccw {
        seen[e.0] = true;
        seen[e1.0] = true;
        seen[e2.0] = true;
        out.push(tri);
      }
    }
    out
  }

  // Origin consistency around both endpoints of `e`; cheap enough to
  // run after every connect/swap in debug builds.
  fn validate_edge(&self, e: EdgeId) -> Result<()> {
    for d in [e, e.sym()] {
      let next = self.edges.onext(d);
      if !self.edges.is_alive(next) {
        return Err(Error::InvariantViolation);
      }
      if self.edges.org(next) != self.edges.org(d) {
        return Err(Error::InvariantViolation);
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn quad() -> Vec<Point> {
    vec![
      Point::new([0.0, 0.0]),
      Point::new([1.0, 0.0]),
      Point::new([1.0, 1.0]),
      Point::new([0.0, 1.0]),
    ]
  }

  // Square boundary v0..v3 plus the v2 -> v0 diagonal.
  fn two_triangles() -> (Subdivision, EdgeId) {
    let mut sub = Subdivision::new(quad());
    let a = sub.make_edge();
    sub.set_org(a, VertexId(0));
    sub.set_dest(a, VertexId(1));
    let b = sub.make_edge();
    sub.set_org(b, VertexId(1));
    sub.set_dest(b, VertexId(2));
    sub.splice(a.sym(), b);
    let c = sub.make_edge();
    sub.set_org(c, VertexId(2));
    sub.set_dest(c, VertexId(3));
    sub.splice(b.sym(), c);
    let _outer = sub.connect(c, a).unwrap();
    let diagonal = sub.connect(b, a).unwrap();
    (sub, diagonal)
  }

  #[test]
  fn connect_closes_a_triangle() {
    let mut sub = Subdivision::new(quad());
    let a = sub.make_edge();
    sub.set_org(a, VertexId(0));
    sub.set_dest(a, VertexId(1));
    let b = sub.make_edge();
    sub.set_org(b, VertexId(1));
    sub.set_dest(b, VertexId(2));
    sub.splice(a.sym(), b);
    let c = sub.connect(b, a).unwrap();

    assert_eq!(sub.edges().org(c), Some(VertexId(2)));
    assert_eq!(sub.edges().dest(c), Some(VertexId(0)));
    assert_eq!(sub.edges().lnext(a), b);
    assert_eq!(sub.edges().lnext(b), c);
    assert_eq!(sub.edges().lnext(c), a);
    // The CCW 3-cycle is traversed from the reversed edges.
    assert_eq!(sub.triangles(), vec![[VertexId(1), VertexId(2), VertexId(0)]]);
  }

  #[test]
  fn delete_edge_detaches_the_group() {
    let mut sub = Subdivision::new(quad());
    let a = sub.make_edge();
    sub.set_org(a, VertexId(0));
    sub.set_dest(a, VertexId(1));
    let b = sub.make_edge();
    sub.set_org(b, VertexId(1));
    sub.set_dest(b, VertexId(2));
    sub.splice(a.sym(), b);
    let c = sub.connect(b, a).unwrap();

    sub.delete_edge(c);
    assert_eq!(sub.edges().len(), 2);
    for e in sub.edges().iter_edges() {
      assert_ne!(sub.edges().onext(e).quad(), c.quad());
    }
    assert!(sub.triangles().is_empty());
  }

  #[test]
  fn swap_flips_the_diagonal() {
    let (mut sub, diagonal) = two_triangles();
    let before = sub.triangles();
    assert_eq!(before.len(), 2);
    assert_eq!(sub.edges().org(diagonal), Some(VertexId(2)));
    assert_eq!(sub.edges().dest(diagonal), Some(VertexId(0)));

    sub.swap(diagonal).unwrap();
    assert_eq!(sub.edges().org(diagonal), Some(VertexId(3)));
    assert_eq!(sub.edges().dest(diagonal), Some(VertexId(1)));
    let after = sub.triangles();
    assert_eq!(after.len(), 2);
    assert_ne!(before, after);
  }
}
