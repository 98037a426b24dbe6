//! Rendering abstraction layer.
//!
//! *The engine never touches a pixel buffer directly.* It produces
//! [`DrawCall`]s — a closed set of primitive variants — and hands them
//! to a type that implements [`Renderer`]. Back-ends are swappable
//! without touching the geometry code; the software rasterizer in
//! [`software`] is the only one shipped.

use glam::Vec2;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Everything the presentation layer knows how to draw.
#[derive(Clone, Debug)]
pub enum DrawCall {
    /// One ray or wall edge.
    Line { a: Vec2, b: Vec2, colour: Rgba },
    /// Shape outline or the visibility polygon (optionally filled).
    Polygon {
        points: Vec<Vec2>,
        colour: Rgba,
        filled: bool,
    },
    /// One strip slice, centred on the horizon line.
    Column {
        x: f32,
        width: f32,
        height: f32,
        colour: Rgba,
    },
    /// Filled circle (the viewer marker).
    Disc {
        centre: Vec2,
        radius: f32,
        colour: Rgba,
    },
}

/// Solid grey with the given brightness.
#[inline]
pub fn grey(shade: u8) -> Rgba {
    let s = shade as u32;
    (s << 16) | (s << 8) | s
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure,
/// run exactly once per frame; window-backed callers typically forward
/// it to `update_with_buffer`.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and
    /// clear it to `clear`.
    fn begin_frame(&mut self, width: usize, height: usize, clear: Rgba);

    /// Rasterise one primitive into the internal buffer.
    fn draw(&mut self, call: &DrawCall);

    /// Finish the frame and **loan** the buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

pub mod software;
