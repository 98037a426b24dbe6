//! CPU rasterizer writing into a plain `u32` buffer.
//!
//! Pixel coordinates come in as floats and are truncated to integers;
//! everything is clipped against the buffer bounds, never the caller's
//! viewport.

use glam::Vec2;

use super::{DrawCall, Renderer, Rgba};

#[derive(Default)]
pub struct Software {
    buf: Vec<Rgba>,
    w: usize,
    h: usize,
}

impl Software {
    #[inline]
    fn put(&mut self, x: i32, y: i32, colour: Rgba) {
        if (0..self.w as i32).contains(&x) && (0..self.h as i32).contains(&y) {
            self.buf[y as usize * self.w + x as usize] = colour;
        }
    }

    /// Integer Bresenham line-drawing algorithm.
    fn line(&mut self, a: Vec2, b: Vec2, colour: Rgba) {
        let (mut x0, mut y0) = (a.x as i32, a.y as i32);
        let (x1, y1) = (b.x as i32, b.y as i32);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, colour);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                if x0 == x1 {
                    break;
                }
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                if y0 == y1 {
                    break;
                }
                err += dx;
                y0 += sy;
            }
        }
    }

    fn polygon(&mut self, points: &[Vec2], colour: Rgba, filled: bool) {
        if points.len() < 2 {
            return;
        }
        if filled && points.len() >= 3 {
            self.fill_polygon(points, colour);
        }
        for i in 0..points.len() {
            self.line(points[i], points[(i + 1) % points.len()], colour);
        }
    }

    /// Even-odd scan-line fill, sampling at pixel-row centres.
    fn fill_polygon(&mut self, points: &[Vec2], colour: Rgba) {
        let (min_y, max_y) = points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let y0 = min_y.max(0.0) as i32;
        let y1 = max_y.min(self.h as f32 - 1.0) as i32;

        let mut xs: Vec<f32> = Vec::new();
        for y in y0..=y1 {
            let scan = y as f32 + 0.5;
            xs.clear();
            for i in 0..points.len() {
                let p = points[i];
                let q = points[(i + 1) % points.len()];
                if (p.y <= scan) != (q.y <= scan) {
                    xs.push(p.x + (scan - p.y) / (q.y - p.y) * (q.x - p.x));
                }
            }
            xs.sort_by(|a, b| a.total_cmp(b));
            for pair in xs.chunks_exact(2) {
                let xa = (pair[0] as i32).max(0);
                let xb = (pair[1] as i32).min(self.w as i32 - 1);
                for x in xa..=xb {
                    self.put(x, y, colour);
                }
            }
        }
    }

    fn column(&mut self, x: f32, width: f32, height: f32, colour: Rgba) {
        let x0 = (x as i32).max(0);
        let x1 = ((x + width) as i32).min(self.w as i32);
        let mid = self.h as f32 * 0.5;
        let y0 = ((mid - height * 0.5) as i32).max(0);
        let y1 = ((mid + height * 0.5) as i32).min(self.h as i32 - 1);
        for y in y0..=y1 {
            for x in x0..x1 {
                self.put(x, y, colour);
            }
        }
    }

    fn disc(&mut self, centre: Vec2, radius: f32, colour: Rgba) {
        let r = radius.ceil() as i32;
        let (cx, cy) = (centre.x as i32, centre.y as i32);
        let r2 = radius * radius;
        for dy in -r..=r {
            for dx in -r..=r {
                if (dx * dx + dy * dy) as f32 <= r2 {
                    self.put(cx + dx, cy + dy, colour);
                }
            }
        }
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, width: usize, height: usize, clear: Rgba) {
        self.w = width;
        self.h = height;
        self.buf.clear();
        self.buf.resize(width * height, clear);
    }

    fn draw(&mut self, call: &DrawCall) {
        match call {
            DrawCall::Line { a, b, colour } => self.line(*a, *b, *colour),
            DrawCall::Polygon {
                points,
                colour,
                filled,
            } => self.polygon(points, *colour, *filled),
            DrawCall::Column {
                x,
                width,
                height,
                colour,
            } => self.column(*x, *width, *height, *colour),
            DrawCall::Disc {
                centre,
                radius,
                colour,
            } => self.disc(*centre, *radius, *colour),
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.buf, self.w, self.h);
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
