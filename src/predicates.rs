use geometry_predicates::{incircle, orient2d};

use crate::data::Point;

/// `incircle` magnitudes below this are rounded to zero, so that
/// nearly cocircular configurations take the deterministic "not
/// inside" branch everywhere.
pub const INCIRCLE_EPS: f64 = 1e-18;

/// Exact-sign geometric predicates over double-precision points.
///
/// The underlying tests are Shewchuk's adaptive-precision predicates:
/// the returned sign is exact for every `f64` input, the magnitude is
/// not. A `Predicates` value is constructed by the subdivision and
/// handed to the builder; nothing here touches global state.
#[derive(Debug, Clone)]
pub struct Predicates {
  incircle_eps: f64,
}

impl Default for Predicates {
  fn default() -> Predicates {
    Predicates::new()
  }
}

impl Predicates {
  pub fn new() -> Predicates {
    Predicates::with_epsilon(INCIRCLE_EPS)
  }

  pub fn with_epsilon(incircle_eps: f64) -> Predicates {
    Predicates { incircle_eps }
  }

  /// Same sign as the signed area of the triangle (a, b, c): positive
  /// iff `c` lies strictly to the left of the directed line a -> b,
  /// zero iff the three points are exactly collinear.
  pub fn orient2d(&self, a: &Point, b: &Point, c: &Point) -> f64 {
    orient2d(a.array, b.array, c.array)
  }

  /// Positive iff `d` lies strictly inside the circle through `a`,
  /// `b`, `c` taken CCW; negative iff strictly outside. Magnitudes
  /// below the configured epsilon are snapped to zero.
  pub fn in_circle(&self, a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    let val = incircle(a.array, b.array, c.array, d.array);
    if val.abs() < self.incircle_eps {
      0.0
    } else {
      val
    }
  }

  pub fn ccw(&self, a: &Point, b: &Point, c: &Point) -> bool {
    self.orient2d(a, b, c) > 0.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn orientation_signs() {
    let predicates = Predicates::new();
    let a = Point::new([0.0, 0.0]);
    let b = Point::new([1.0, 0.0]);
    assert!(predicates.orient2d(&a, &b, &Point::new([0.0, 1.0])) > 0.0);
    assert!(predicates.orient2d(&a, &b, &Point::new([0.0, -1.0])) < 0.0);
    assert_eq!(predicates.orient2d(&a, &b, &Point::new([2.0, 0.0])), 0.0);
    assert!(predicates.ccw(&a, &b, &Point::new([0.5, 0.5])));
  }

  #[test]
  fn in_circle_signs() {
    let predicates = Predicates::new();
    let a = Point::new([0.0, 0.0]);
    let b = Point::new([2.0, 0.0]);
    let c = Point::new([1.0, 1.0]);
    assert!(predicates.in_circle(&a, &b, &c, &Point::new([1.0, 0.5])) > 0.0);
    assert!(predicates.in_circle(&a, &b, &c, &Point::new([5.0, 5.0])) < 0.0);
    // (0,0), (2,0), (1,1) and (1,-1) are exactly cocircular.
    assert_eq!(predicates.in_circle(&a, &b, &c, &Point::new([1.0, -1.0])), 0.0);
  }

  #[test]
  fn near_degenerate_snap() {
    let predicates = Predicates::with_epsilon(1.0);
    let a = Point::new([0.0, 0.0]);
    let b = Point::new([2.0, 0.0]);
    let c = Point::new([1.0, 1.0]);
    // A point barely inside the circumcircle snaps to "cocircular"
    // under a coarse epsilon.
    assert_eq!(predicates.in_circle(&a, &b, &c, &Point::new([1.0, -0.999])), 0.0);
  }
}
