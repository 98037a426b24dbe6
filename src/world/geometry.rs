use glam::{Vec2, vec2};
use smallvec::SmallVec;

/// Corners of two distinct features closer than this are merged into one.
const FEATURE_MERGE_DIST: f32 = 1e-3;

/*----------------------- simple primitives --------------------------*/

/// One wall piece: an undirected finite line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Segment {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    /// Intersection point of two segments, if any.
    ///
    /// Standard parametric line–line formula; endpoints count
    /// (`t`, `u` both closed in `[0, 1]`). A zero determinant means the
    /// lines are parallel or coincident and reports no intersection;
    /// collinear overlapping segments are deliberately treated as
    /// non-intersecting.
    pub fn intersect(&self, other: &Segment) -> Option<Vec2> {
        let (a1, a2) = (self.p1, self.p2);
        let (b1, b2) = (other.p1, other.p2);

        let den = (b1.x - b2.x) * (a1.y - a2.y) - (b1.y - b2.y) * (a1.x - a2.x);
        if den == 0.0 {
            return None;
        }

        // t runs along `other`, u along `self`.
        let t = ((b1.x - a1.x) * (a1.y - a2.y) - (b1.y - a1.y) * (a1.x - a2.x)) / den;
        let u = -((b1.x - b2.x) * (b1.y - a1.y) - (b1.y - b2.y) * (b1.x - a1.x)) / den;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(b1 + t * (b2 - b1))
        } else {
            None
        }
    }
}

/*--------------------------- shapes ---------------------------------*/

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("shape declared {declared} sides but was given {got} points")]
    SideCount { declared: usize, got: usize },

    #[error("a closed shape needs at least 3 sides, got {0}")]
    TooFewSides(usize),
}

/// Closed polygon: ordered boundary points plus the derived wall
/// segments (consecutive pairs, wrapping last → first).
///
/// Immutable once constructed. Sides must not cross each other; concave
/// outlines are fine, self-intersecting ones are not.
#[derive(Clone, Debug)]
pub struct Shape {
    points: Vec<Vec2>,
    segments: SmallVec<[Segment; 8]>,
}

impl Shape {
    /// Build a shape from exactly `sides` points in boundary order.
    pub fn new(sides: usize, points: Vec<Vec2>) -> Result<Self, ShapeError> {
        if sides < 3 {
            return Err(ShapeError::TooFewSides(sides));
        }
        if points.len() != sides {
            return Err(ShapeError::SideCount {
                declared: sides,
                got: points.len(),
            });
        }
        let segments = (0..sides)
            .map(|i| Segment::new(points[i], points[(i + 1) % sides]))
            .collect();
        Ok(Self { points, segments })
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/*-------------------------- feature points --------------------------*/

/// Why a point is visibility-critical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    /// A wall corner; casting wants to peek just past it.
    Endpoint,
    /// Two walls crossing mid-span.
    Crossing,
}

/// A point the feature-targeted caster aims rays at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Feature {
    pub point: Vec2,
    pub kind: FeatureKind,
}

/*---------------------------- the scene -----------------------------*/

/// One complete wall set, immutable for the duration of a frame.
///
/// "Reset" means building a new `Scene` and swapping it in; nothing is
/// mutated incrementally, so the feature list can never go stale.
#[derive(Clone, Debug)]
pub struct Scene {
    shapes: Vec<Shape>,
    walls: Vec<Segment>,
    features: Vec<Feature>,
}

impl Scene {
    /// Assemble a scene from shapes plus standalone wall segments.
    ///
    /// The caller must include an enclosing boundary (a box shape or
    /// equivalent): every ray cast from inside the scene has to hit
    /// *something*, and the engine treats a miss as a configuration bug.
    pub fn new(shapes: Vec<Shape>, extra_walls: Vec<Segment>) -> Self {
        let mut walls: Vec<Segment> = Vec::new();
        for shape in &shapes {
            walls.extend_from_slice(shape.segments());
        }
        walls.extend(extra_walls);
        let features = collect_features(&walls);
        Self {
            shapes,
            walls,
            features,
        }
    }

    #[inline]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[inline]
    pub fn walls(&self) -> &[Segment] {
        &self.walls
    }

    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The demo layout: boundary box, octagon, L-shaped hexagon and
    /// pentagon. Interior shapes sit at fixed coordinates tuned for a
    /// roughly 640×400 viewport.
    pub fn demo(w: f32, h: f32) -> Self {
        const BORDER: f32 = 2.0;
        let shape = |sides, points| {
            Shape::new(sides, points).expect("demo shape points match side count")
        };
        let shapes = vec![
            shape(
                4,
                vec![
                    vec2(0.0, 0.0),
                    vec2(w - BORDER, 0.0),
                    vec2(w - BORDER, h - BORDER),
                    vec2(0.0, h - BORDER),
                ],
            ),
            shape(
                8,
                vec![
                    vec2(358.0, 108.0),
                    vec2(282.0, 108.0),
                    vec2(228.0, 162.0),
                    vec2(228.0, 238.0),
                    vec2(282.0, 292.0),
                    vec2(358.0, 292.0),
                    vec2(412.0, 238.0),
                    vec2(412.0, 162.0),
                ],
            ),
            shape(
                6,
                vec![
                    vec2(50.0, 50.0),
                    vec2(50.0, 150.0),
                    vec2(85.0, 150.0),
                    vec2(85.0, 100.0),
                    vec2(120.0, 100.0),
                    vec2(120.0, 50.0),
                ],
            ),
            shape(
                5,
                vec![
                    vec2(500.0, 240.0),
                    vec2(443.0, 281.0),
                    vec2(465.0, 349.0),
                    vec2(535.0, 349.0),
                    vec2(557.0, 281.0),
                ],
            ),
        ];
        Self::new(shapes, Vec::new())
    }
}

/// Wall endpoints plus pairwise wall crossings, merged within tolerance.
///
/// Endpoints are gathered first, so a crossing that lands exactly on a
/// corner keeps its `Endpoint` kind and still gets corner-peek rays.
fn collect_features(walls: &[Segment]) -> Vec<Feature> {
    let mut features: Vec<Feature> = Vec::new();
    for wall in walls {
        push_unique(&mut features, wall.p1, FeatureKind::Endpoint);
        push_unique(&mut features, wall.p2, FeatureKind::Endpoint);
    }
    for (i, a) in walls.iter().enumerate() {
        for b in &walls[i + 1..] {
            if let Some(point) = a.intersect(b) {
                push_unique(&mut features, point, FeatureKind::Crossing);
            }
        }
    }
    features
}

fn push_unique(features: &mut Vec<Feature>, point: Vec2, kind: FeatureKind) {
    let merge2 = FEATURE_MERGE_DIST * FEATURE_MERGE_DIST;
    if features
        .iter()
        .all(|f| f.point.distance_squared(point) > merge2)
    {
        features.push(Feature { point, kind });
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
