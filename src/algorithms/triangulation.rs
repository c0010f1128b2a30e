pub mod delaunay;
