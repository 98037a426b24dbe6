mod projection;
mod ray;
mod types;
mod visibility;

pub use projection::{Column, correct_fisheye, project_strip};

pub use ray::{CastError, Ray};

pub use types::Screen;

pub use visibility::{
    ANGLE_SORT_EPS, CORNER_PEEK_EPS, RayHit, Strategy, Visibility, compute, in_fov, rel_angle,
};
