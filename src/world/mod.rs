mod geometry;
mod viewer;

pub use geometry::{Feature, FeatureKind, Scene, Segment, Shape, ShapeError};

pub use viewer::{MoveKeys, Viewer};
