//! luxcast — interactive 2-D ray-casting visibility engine.
//!
//! A point viewer casts rays into a scene of segment walls and polygon
//! shapes; the engine resolves each ray to its nearest wall hit and
//! assembles the hits into a visibility polygon plus an ordered
//! distance array for pseudo-3D strip projection.
//!
//! * [`world`] — the scene model: segments, shapes, feature points,
//!   and the viewer.
//! * [`engine`] — the per-frame visibility pass and strip projection.
//! * [`renderer`] — the drawing abstraction consumed by front-ends.

pub mod engine;
pub mod renderer;
pub mod world;
