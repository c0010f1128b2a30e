//! Divide-and-conquer Delaunay triangulation.
//!
//! Guibas & Stolfi, "Primitives for the Manipulation of General
//! Subdivisions and the Computation of Voronoi Diagrams", ACM TOG 1985,
//! pg. 113-114.

use crate::data::{EdgeId, Point, Subdivision, VertexId};
use crate::Error;

type Result<T> = std::result::Result<T, Error>;

/// Outer handles of a (sub-)triangulation: the CCW-most and CW-most
/// hull edges incident to the piece.
type Handles = (EdgeId, EdgeId);

/// How the divide step splits the point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cuts {
  /// Presort lexicographically, then always split at the midpoint of
  /// the range; every cut is vertical.
  Vertical,
  /// Partition around the median of alternating axes; no presort.
  Alternating,
}

/// Builds the Delaunay triangulation of the subdivision's points.
///
/// Returns the outer handles of the finished hull. The subdivision must
/// be empty and hold at least two points; coincident input points are
/// not supported.
///
/// ```rust
/// use rdelaunay::algorithms::{triangulate, Cuts};
/// use rdelaunay::data::{Point, Subdivision};
///
/// let points = vec![
///   Point::new([0.0, 0.0]),
///   Point::new([1.0, 0.0]),
///   Point::new([0.0, 1.0]),
/// ];
/// let mut sub = Subdivision::new(points);
/// triangulate(&mut sub, Cuts::Alternating)?;
/// assert_eq!(sub.triangles().len(), 1);
/// # Ok::<(), rdelaunay::Error>(())
/// ```
pub fn triangulate(sub: &mut Subdivision, cuts: Cuts) -> Result<Handles> {
  let n = sub.points().len();
  if n < 2 {
    return Err(Error::InsufficientVertices);
  }
  let mut builder = Builder::new(sub);
  match cuts {
    Cuts::Vertical => {
      builder.sort_lex(0, n - 1);
      builder.vertical_cuts(0, n - 1)
    }
    Cuts::Alternating => builder.alternating_cuts(0, n - 1, 1),
  }
}

struct Builder<'a> {
  sub: &'a mut Subdivision,
  // Permutation of the vertices. The recursion sorts and partitions
  // this array in place; the points themselves never move, so vertex
  // ids stay stable for the caller.
  order: Vec<VertexId>,
}

impl<'a> Builder<'a> {
  fn new(sub: &'a mut Subdivision) -> Builder<'a> {
    let order = (0..sub.points().len()).map(VertexId).collect();
    Builder { sub, order }
  }

  fn point(&self, v: VertexId) -> &Point {
    self.sub.point(v)
  }

  fn org(&self, e: EdgeId) -> Result<VertexId> {
    self.sub.edges().org(e).ok_or(Error::InvariantViolation)
  }

  fn dest(&self, e: EdgeId) -> Result<VertexId> {
    self.sub.edges().dest(e).ok_or(Error::InvariantViolation)
  }

  fn onext(&self, e: EdgeId) -> EdgeId {
    self.sub.edges().onext(e)
  }

  fn oprev(&self, e: EdgeId) -> EdgeId {
    self.sub.edges().oprev(e)
  }

  fn lnext(&self, e: EdgeId) -> EdgeId {
    self.sub.edges().lnext(e)
  }

  fn lprev(&self, e: EdgeId) -> EdgeId {
    self.sub.edges().lprev(e)
  }

  fn rnext(&self, e: EdgeId) -> EdgeId {
    self.sub.edges().rnext(e)
  }

  fn rprev(&self, e: EdgeId) -> EdgeId {
    self.sub.edges().rprev(e)
  }

  fn ccw(&self, a: VertexId, b: VertexId, c: VertexId) -> bool {
    self
      .sub
      .predicates()
      .ccw(self.point(a), self.point(b), self.point(c))
  }

  fn in_circle(&self, a: VertexId, b: VertexId, c: VertexId, d: VertexId) -> bool {
    let val = self.sub.predicates().in_circle(
      self.point(a),
      self.point(b),
      self.point(c),
      self.point(d),
    );
    val > 0.0
  }

  // The argument order below is the G&S pg. 113 convention for this
  // algorithm, not the textbook orient2d order.
  fn right_of(&self, x: VertexId, e: EdgeId) -> Result<bool> {
    Ok(self.ccw(x, self.dest(e)?, self.org(e)?))
  }

  fn left_of(&self, x: VertexId, e: EdgeId) -> Result<bool> {
    Ok(self.ccw(x, self.org(e)?, self.dest(e)?))
  }

  // A merge candidate stays in play while its destination lies to the
  // right of the base line.
  fn valid(&self, e: EdgeId, basel: EdgeId) -> Result<bool> {
    self.right_of(self.dest(e)?, basel)
  }

  fn check_range(&self, start: usize, end: usize) -> Result<()> {
    if start > end || end >= self.order.len() || end - start + 1 < 2 {
      return Err(Error::InvariantViolation);
    }
    Ok(())
  }

  fn sort_lex(&mut self, start: usize, end: usize) {
    let sub = &*self.sub;
    self.order[start..=end].sort_unstable_by(|&u, &v| sub.point(u).cmp_lex(sub.point(v)));
  }

  /// Partitions `order[start..=end]` around the median of the `axis`
  /// coordinate (ties broken by the other coordinate) and returns the
  /// median position. Expected linear time.
  fn median(&mut self, start: usize, end: usize, axis: usize) -> usize {
    let mid = start + (end - start) / 2;
    let sub = &*self.sub;
    self.order[start..=end]
      .select_nth_unstable_by(mid - start, |&u, &v| {
        sub.point(u).cmp_along(sub.point(v), axis)
      });
    mid
  }

  /// Two or three points, already in lexicographic order.
  fn base_cases(&mut self, start: usize, end: usize) -> Result<Handles> {
    if end - start + 1 == 2 {
      let a = self.sub.make_edge();
      self.sub.set_org(a, self.order[start]);
      self.sub.set_dest(a, self.order[start + 1]);
      return Ok((a, a.sym()));
    }

    let v1 = self.order[start];
    let v2 = self.order[start + 1];
    let v3 = self.order[start + 2];

    let a = self.sub.make_edge();
    let b = self.sub.make_edge();
    self.sub.splice(a.sym(), b);
    self.sub.set_org(a, v1);
    self.sub.set_dest(a, v2);
    self.sub.set_org(b, v2);
    self.sub.set_dest(b, v3);

    if self.ccw(v1, v2, v3) {
      self.sub.connect(b, a)?;
      Ok((a, b.sym()))
    } else if self.ccw(v1, v3, v2) {
      let c = self.sub.connect(b, a)?;
      Ok((c.sym(), c))
    } else {
      // collinear: leave the chain open
      Ok((a, b.sym()))
    }
  }

  fn vertical_cuts(&mut self, start: usize, end: usize) -> Result<Handles> {
    self.check_range(start, end)?;
    if end - start + 1 <= 3 {
      return self.base_cases(start, end);
    }
    let mid = start + (end - start) / 2;
    let left = self.vertical_cuts(start, mid)?;
    let right = self.vertical_cuts(mid + 1, end)?;
    self.merge(left, right)
  }

  fn alternating_cuts(&mut self, start: usize, end: usize, axis: usize) -> Result<Handles> {
    self.check_range(start, end)?;
    if end - start + 1 <= 3 {
      // constant-size slice, so this sort costs nothing
      self.sort_lex(start, end);
      return self.base_cases(start, end);
    }
    let mid = self.median(start, end, axis);
    let mut first = self.alternating_cuts(start, mid, axis ^ 1)?;
    let mut second = self.alternating_cuts(mid + 1, end, axis ^ 1)?;
    if axis == 1 {
      // Horizontal cut: the pieces are bottom and top, so reposition
      // the handles to the extremes the merge expects.
      first = self.rotate_handles(first)?;
      second = self.rotate_handles(second)?;
    }
    let outer = self.merge(first, second)?;
    if axis == 1 {
      self.unrotate_handles(outer)
    } else {
      Ok(outer)
    }
  }

  /// Walks the first handle down to the bottom of its hull and the
  /// second up to the top, for merging across a horizontal cut.
  fn rotate_handles(&self, handles: Handles) -> Result<Handles> {
    let (mut lh, mut rh) = handles;
    loop {
      let prev = self.rprev(lh);
      if self.point(self.org(prev)?).y_coord() < self.point(self.org(lh)?).y_coord() {
        lh = prev;
      } else {
        break;
      }
    }
    loop {
      let prev = self.lprev(rh);
      if self.point(self.org(rh)?).y_coord() < self.point(self.org(prev)?).y_coord() {
        rh = prev;
      } else {
        break;
      }
    }
    Ok((lh, rh))
  }

  /// Inverse repositioning after a horizontal merge: the bottom handle
  /// walks left, the top handle walks right.
  fn unrotate_handles(&self, handles: Handles) -> Result<Handles> {
    let (mut bh, mut th) = handles;
    loop {
      let next = self.rnext(bh);
      if self.point(self.org(next)?).x_coord() < self.point(self.org(bh)?).x_coord() {
        bh = next;
      } else {
        break;
      }
    }
    loop {
      let next = self.lnext(th);
      if self.point(self.org(next)?).x_coord() > self.point(self.org(th)?).x_coord() {
        th = next;
      } else {
        break;
      }
    }
    Ok((bh, th))
  }

  /// Stitches two Delaunay pieces along their common tangents. `first`
  /// is the (ldo, ldi) pair of the left piece, `second` the (rdi, rdo)
  /// pair of the right piece, with `ldi`/`rdi` facing each other
  /// across the cut. Returns the outer handles of the union.
  fn merge(&mut self, first: Handles, second: Handles) -> Result<Handles> {
    let (mut ldo, mut ldi) = first;
    let (mut rdi, mut rdo) = second;

    // lower common tangent
    loop {
      if self.left_of(self.org(rdi)?, ldi)? {
        ldi = self.lnext(ldi);
      } else if self.right_of(self.org(ldi)?, rdi)? {
        rdi = self.rprev(rdi);
      } else {
        break;
      }
    }

    // first cross edge
    let mut basel = self.sub.connect(rdi.sym(), ldi)?;
    if self.org(ldi)? == self.org(ldo)? {
      ldo = basel.sym();
    }
    if self.org(rdi)? == self.org(rdo)? {
      rdo = basel;
    }

    // Zip upward. Each round either deletes edges that fail the
    // empty-circle test or adds one cross edge; reaching the upper
    // common tangent ends the merge.
    loop {
      let mut lcand = self.onext(basel.sym());
      if self.valid(lcand, basel)? {
        while self.in_circle(
          self.dest(basel)?,
          self.org(basel)?,
          self.dest(lcand)?,
          self.dest(self.onext(lcand))?,
        ) {
          lcand = self.onext(lcand);
          let doomed = self.oprev(lcand);
          self.sub.delete_edge(doomed);
        }
      }

      let mut rcand = self.oprev(basel);
      if self.valid(rcand, basel)? {
        while self.in_circle(
          self.dest(basel)?,
          self.org(basel)?,
          self.dest(rcand)?,
          self.dest(self.oprev(rcand))?,
        ) {
          rcand = self.oprev(rcand);
          let doomed = self.onext(rcand);
          self.sub.delete_edge(doomed);
        }
      }

      let l_valid = self.valid(lcand, basel)?;
      let r_valid = self.valid(rcand, basel)?;
      if !l_valid && !r_valid {
        break;
      }

      // Connect to whichever candidate's circumcircle is empty; ties
      // (snapped incircle zeros) go to the left.
      let pick_right = !l_valid
        || (r_valid
          && self.in_circle(
            self.dest(lcand)?,
            self.org(lcand)?,
            self.org(rcand)?,
            self.dest(rcand)?,
          ));
      basel = if pick_right {
        self.sub.connect(rcand, basel.sym())?
      } else {
        self.sub.connect(basel.sym(), lcand.sym())?
      };
    }

    Ok((ldo, rdo))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sub(coords: &[[f64; 2]]) -> Subdivision {
    Subdivision::new(coords.iter().map(|&c| Point::new(c)).collect())
  }

  #[test]
  fn too_few_points() {
    let mut sub = sub(&[[0.0, 0.0]]);
    assert_eq!(
      triangulate(&mut sub, Cuts::Vertical).err(),
      Some(Error::InsufficientVertices)
    );
  }

  #[test]
  fn two_points_make_one_edge() {
    let mut sub = sub(&[[0.0, 0.0], [1.0, 0.0]]);
    let (le, re) = triangulate(&mut sub, Cuts::Vertical).unwrap();
    assert_eq!(re, le.sym());
    assert_eq!(sub.edges().len(), 1);
    assert!(sub.triangles().is_empty());
  }

  #[test]
  fn ccw_triangle_base_case() {
    let mut sub = sub(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    let (le, _) = triangulate(&mut sub, Cuts::Vertical).unwrap();
    assert_eq!(sub.edges().len(), 3);
    assert_eq!(sub.triangles().len(), 1);
    // the left handle leaves the lexicographically smallest vertex
    assert_eq!(sub.edges().org(le), Some(VertexId(0)));
  }

  #[test]
  fn cw_triangle_base_case() {
    // middle point above the ends: the 3-point case takes the second
    // branch and returns handles on the new closing edge
    let mut sub = sub(&[[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]);
    let (le, re) = triangulate(&mut sub, Cuts::Vertical).unwrap();
    assert_eq!(sub.triangles().len(), 1);
    assert_eq!(sub.edges().org(le), Some(VertexId(0)));
    assert_eq!(sub.edges().org(re), Some(VertexId(2)));
  }

  #[test]
  fn collinear_points_form_a_chain() {
    let mut sub = sub(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]]);
    triangulate(&mut sub, Cuts::Vertical).unwrap();
    assert!(sub.triangles().is_empty());
    assert_eq!(sub.edges().len(), 4);
  }

  #[test]
  fn four_point_merge() {
    // two points on each side of the cut
    let mut sub = sub(&[[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
    triangulate(&mut sub, Cuts::Vertical).unwrap();
    assert_eq!(sub.triangles().len(), 2);
    assert_eq!(sub.edges().len(), 5);
  }

  #[test]
  fn modes_agree_on_a_small_set() {
    let coords = [
      [0.0, 0.0],
      [3.0, 1.0],
      [1.0, 4.0],
      [5.0, 2.0],
      [4.0, 5.0],
      [2.0, 2.0],
      [6.0, 6.0],
    ];
    let mut vertical = sub(&coords);
    triangulate(&mut vertical, Cuts::Vertical).unwrap();
    let mut alternating = sub(&coords);
    triangulate(&mut alternating, Cuts::Alternating).unwrap();

    let normalize = |tris: Vec<[VertexId; 3]>| {
      let mut set: Vec<[usize; 3]> = tris
        .into_iter()
        .map(|t| {
          let mut t = [t[0].0, t[1].0, t[2].0];
          t.sort_unstable();
          t
        })
        .collect();
      set.sort_unstable();
      set
    };
    assert_eq!(normalize(vertical.triangles()), normalize(alternating.triangles()));
  }
}
