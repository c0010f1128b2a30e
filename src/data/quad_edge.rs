//! The quad-edge structure of Guibas & Stolfi, specialized to
//! orientable subdivisions: each undirected primal edge is one group of
//! four directed edges {e, e.rot, e.sym, e.rot_inv}, and the only
//! stored topology is the CCW-next edge around each origin.

use std::fmt;

/// Position of a point in the subdivision's point array.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

impl fmt::Debug for VertexId {
  fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(fmt, "v{}", self.0)
  }
}

/// A directed edge: four times the quad-edge group index, plus the slot
/// within the group. Slots 0 and 2 are the two directions of the primal
/// edge, slots 1 and 3 the two directions of its dual.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

impl fmt::Debug for EdgeId {
  fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(fmt, "e{}.{}", self.quad(), self.slot())
  }
}

impl EdgeId {
  pub(crate) fn quad(self) -> usize {
    self.0 >> 2
  }

  pub(crate) fn slot(self) -> usize {
    self.0 & 3
  }

  /// The dual edge, rotated 90 degrees counterclockwise.
  pub fn rot(self) -> EdgeId {
    EdgeId((self.0 & !3) | ((self.0 + 1) & 3))
  }

  /// The dual edge, rotated 90 degrees clockwise.
  pub fn rot_inv(self) -> EdgeId {
    EdgeId((self.0 & !3) | ((self.0 + 3) & 3))
  }

  /// The oppositely directed edge.
  pub fn sym(self) -> EdgeId {
    EdgeId(self.0 ^ 2)
  }

  pub fn is_primal(self) -> bool {
    self.slot() & 1 == 0
  }
}

#[derive(Clone, Copy)]
struct QuadEdge {
  next: [EdgeId; 4],
  org: [Option<VertexId>; 4],
}

impl QuadEdge {
  /// A fresh group: the primal edge is an isolated segment (both
  /// directions are loops at their endpoint), and the dual directions
  /// point at each other because the same face surrounds the new edge
  /// on both sides. G&S pg. 96.
  fn isolated(quad: usize) -> QuadEdge {
    let e = |slot| EdgeId(quad * 4 + slot);
    QuadEdge {
      next: [e(0), e(3), e(2), e(1)],
      org: [None; 4],
    }
  }
}

/// Arena owning every quad-edge group of a subdivision. Groups are
/// created by [`make_edge`](QuadEdgeArena::make_edge) and recycled
/// through a free list when removed, so `EdgeId`s of dead groups are
/// reused but never dangle.
pub struct QuadEdgeArena {
  quads: Vec<QuadEdge>,
  alive: Vec<bool>,
  free: Vec<usize>,
}

impl Default for QuadEdgeArena {
  fn default() -> QuadEdgeArena {
    QuadEdgeArena::new()
  }
}

impl QuadEdgeArena {
  pub fn new() -> QuadEdgeArena {
    QuadEdgeArena {
      quads: Vec::new(),
      alive: Vec::new(),
      free: Vec::new(),
    }
  }

  /// Number of live groups, i.e. undirected primal edges.
  pub fn len(&self) -> usize {
    self.quads.len() - self.free.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Exclusive upper bound on `EdgeId` values, dead slots included.
  pub fn edge_bound(&self) -> usize {
    self.quads.len() * 4
  }

  pub fn is_alive(&self, e: EdgeId) -> bool {
    self.alive[e.quad()]
  }

  /// Allocates a fresh, isolated quad-edge group and returns its first
  /// primal edge. No origin is assigned.
  pub fn make_edge(&mut self) -> EdgeId {
    match self.free.pop() {
      Some(quad) => {
        self.quads[quad] = QuadEdge::isolated(quad);
        self.alive[quad] = true;
        EdgeId(quad * 4)
      }
      None => {
        let quad = self.quads.len();
        self.quads.push(QuadEdge::isolated(quad));
        self.alive.push(true);
        EdgeId(quad * 4)
      }
    }
  }

  /// The one topological operator: splices the vertex rings at `a` and
  /// `b` — joining them if the origins are distinct, separating them if
  /// shared — and does the same to the face rings on the dual side.
  /// Purely combinatorial, no geometric preconditions. G&S pg. 98.
  pub fn splice(&mut self, a: EdgeId, b: EdgeId) {
    let alpha = self.onext(a).rot();
    let beta = self.onext(b).rot();
    self.swap_next(a, b);
    self.swap_next(alpha, beta);
  }

  fn swap_next(&mut self, a: EdgeId, b: EdgeId) {
    let next_a = self.onext(a);
    let next_b = self.onext(b);
    self.quads[a.quad()].next[a.slot()] = next_b;
    self.quads[b.quad()].next[b.slot()] = next_a;
  }

  /// CCW next edge around the origin.
  pub fn onext(&self, e: EdgeId) -> EdgeId {
    self.quads[e.quad()].next[e.slot()]
  }

  /// CW next edge around the origin.
  pub fn oprev(&self, e: EdgeId) -> EdgeId {
    self.onext(e.rot()).rot()
  }

  /// CCW next edge around the left face.
  pub fn lnext(&self, e: EdgeId) -> EdgeId {
    self.onext(e.rot_inv()).rot()
  }

  /// CW next edge around the left face.
  pub fn lprev(&self, e: EdgeId) -> EdgeId {
    self.onext(e).sym()
  }

  /// CCW next edge around the right face.
  pub fn rnext(&self, e: EdgeId) -> EdgeId {
    self.onext(e.rot()).rot_inv()
  }

  /// CW next edge around the right face.
  pub fn rprev(&self, e: EdgeId) -> EdgeId {
    self.onext(e.sym())
  }

  /// CCW next edge around the destination.
  pub fn dnext(&self, e: EdgeId) -> EdgeId {
    self.onext(e.sym()).sym()
  }

  /// CW next edge around the destination.
  pub fn dprev(&self, e: EdgeId) -> EdgeId {
    self.onext(e.rot_inv()).rot_inv()
  }

  pub fn org(&self, e: EdgeId) -> Option<VertexId> {
    self.quads[e.quad()].org[e.slot()]
  }

  pub fn dest(&self, e: EdgeId) -> Option<VertexId> {
    self.org(e.sym())
  }

  pub fn set_org(&mut self, e: EdgeId, v: VertexId) {
    self.quads[e.quad()].org[e.slot()] = Some(v);
  }

  pub fn set_dest(&mut self, e: EdgeId, v: VertexId) {
    self.set_org(e.sym(), v);
  }

  /// Frees `e`'s group onto the free list. The caller must already have
  /// spliced the group out of the subdivision; afterwards no live edge
  /// references it.
  pub(crate) fn remove(&mut self, e: EdgeId) {
    let quad = e.quad();
    self.alive[quad] = false;
    self.free.push(quad);
  }

  /// All live directed primal edges, two per group, in group order.
  pub fn iter_primal(&self) -> impl Iterator<Item = EdgeId> + '_ {
    self
      .alive
      .iter()
      .enumerate()
      .filter(|(_, &alive)| alive)
      .flat_map(|(quad, _)| [EdgeId(quad * 4), EdgeId(quad * 4 + 2)])
  }

  /// All four live directed edges of every group, dual ones included.
  pub fn iter_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
    self
      .alive
      .iter()
      .enumerate()
      .filter(|(_, &alive)| alive)
      .flat_map(|(quad, _)| (0..4).map(move |slot| EdgeId(quad * 4 + slot)))
  }
}
