use bitflags::bitflags;
use glam::{Vec2, vec2};
use std::f32::consts::TAU;

bitflags! {
    /// Movement keys held during the current frame.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct MoveKeys: u8 {
        const FORWARD = 0b0001;
        const BACK    = 0b0010;
        const LEFT    = 0b0100;
        const RIGHT   = 0b1000;
    }
}

/// Point light / first-person viewer in world space.
///
/// Holds only position, heading and the horizontal FoV window — the
/// visibility engine derives rays and hit points from scratch every
/// frame, so nothing transient lives here.
///
/// Screen coordinates: +X right, +Y down, yaw 0 = +X, increasing yaw
/// turns clockwise on screen.
#[derive(Clone, Copy, Debug)]
pub struct Viewer {
    pos: Vec2,
    yaw: f32, // radians, kept in [0, 2π)
    fov: f32, // radians, (0, 2π)
}

impl Viewer {
    pub fn new(pos: Vec2, yaw: f32, fov: f32) -> Self {
        debug_assert!(fov > 0.0 && fov < TAU);
        Self {
            pos,
            yaw: yaw.rem_euclid(TAU),
            fov,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Unit vector pointing where the viewer looks.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.yaw)
    }

    /// Unit vector 90° to the left of `forward` in screen coordinates
    /// (+Y points down, so this is `(y, -x)`).
    #[inline]
    pub fn left(&self) -> Vec2 {
        let f = self.forward();
        vec2(f.y, -f.x)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Apply the held movement keys, `speed` world units per frame.
    /// Opposed keys cancel; diagonals are normalized to `speed`.
    pub fn advance(&mut self, keys: MoveKeys, speed: f32) {
        let mut delta = Vec2::ZERO;
        if keys.contains(MoveKeys::FORWARD) {
            delta += self.forward();
        }
        if keys.contains(MoveKeys::BACK) {
            delta -= self.forward();
        }
        if keys.contains(MoveKeys::LEFT) {
            delta += self.left();
        }
        if keys.contains(MoveKeys::RIGHT) {
            delta -= self.left();
        }
        self.pos += delta.normalize_or_zero() * speed;
    }

    /// Turn by `delta_yaw` radians (positive = clockwise on screen).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(TAU);
    }

    /// Face a world-space point (pointer-driven aiming). Looking at the
    /// viewer's own position leaves the heading unchanged.
    pub fn look_at(&mut self, target: Vec2) {
        let d = target - self.pos;
        if d != Vec2::ZERO {
            self.yaw = d.y.atan2(d.x).rem_euclid(TAU);
        }
    }

    /// Keep the viewer at least `margin` units inside the axis-aligned
    /// box `min..max`. This is the demo's boundary clamp; real wall
    /// collision is not modelled.
    pub fn clamp_to(&mut self, min: Vec2, max: Vec2, margin: f32) {
        self.pos = self
            .pos
            .clamp(min + Vec2::splat(margin), max - Vec2::splat(margin));
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
