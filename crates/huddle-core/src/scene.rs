#![forbid(unsafe_code)]

//! Scene data model.
//!
//! A [`Scene`] is an ordered set of labeled [`Point`]s on a normalized 2-D
//! surface plus a [`Category`] tag. The transition engine consumes scenes and
//! publishes [`RenderedPoint`] snapshots (points with a per-frame opacity).
//!
//! Keys and labels are reference-counted strings so a frame snapshot can be
//! rebuilt every display refresh without copying text.
//!
//! # Invariants
//!
//! 1. Keys are unique within one scene. This is a precondition; nothing here
//!    checks it. [`Scene::has_unique_keys`] exists for tests and loaders.
//! 2. Coordinates are nominally in [0, 1]; values outside that range are kept
//!    as-is and left to the renderer.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Category tag carried by every scene.
///
/// The two categories are symmetric: nothing ranks one above the other. The
/// only thing the engine asks of them is equality with the previous scene's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    Offensive,
    Defensive,
}

impl Category {
    /// The other category.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Offensive => Self::Defensive,
            Self::Defensive => Self::Offensive,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offensive => "offensive",
            Self::Defensive => "defensive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SlideDirection
// ---------------------------------------------------------------------------

/// Horizontal screen-space direction for off-screen slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SlideDirection {
    /// Toward negative x.
    Left,
    /// Toward positive x.
    Right,
}

impl SlideDirection {
    /// `-1.0` for [`Left`](Self::Left), `+1.0` for [`Right`](Self::Right).
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for SlideDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A labeled position in a scene.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Stable identifier, unique within the scene.
    pub key: Arc<str>,
    /// Display text.
    pub label: Arc<str>,
    /// Normalized horizontal position.
    pub x: f32,
    /// Normalized vertical position.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub fn new(key: impl Into<Arc<str>>, label: impl Into<Arc<str>>, x: f32, y: f32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            x,
            y,
        }
    }
}

// ---------------------------------------------------------------------------
// RenderedPoint
// ---------------------------------------------------------------------------

/// One point of a published frame: position plus opacity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderedPoint {
    pub key: Arc<str>,
    pub label: Arc<str>,
    pub x: f32,
    pub y: f32,
    /// Opacity in [0, 1].
    pub opacity: f32,
}

impl RenderedPoint {
    /// Render `point` at its own position with the given opacity.
    #[must_use]
    pub fn from_point(point: &Point, opacity: f32) -> Self {
        Self {
            key: Arc::clone(&point.key),
            label: Arc::clone(&point.label),
            x: point.x,
            y: point.y,
            opacity,
        }
    }

    /// Same key and label at a new position and opacity.
    #[must_use]
    pub fn moved(&self, x: f32, y: f32, opacity: f32) -> Self {
        Self {
            key: Arc::clone(&self.key),
            label: Arc::clone(&self.label),
            x,
            y,
            opacity,
        }
    }

    /// Whether this point sits at `point`'s position, fully opaque, with the
    /// same key and label.
    #[must_use]
    pub fn is_settled_at(&self, point: &Point) -> bool {
        self.key == point.key
            && self.label == point.label
            && self.x == point.x
            && self.y == point.y
            && self.opacity == 1.0
    }
}

impl From<&Point> for RenderedPoint {
    fn from(point: &Point) -> Self {
        Self::from_point(point, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A named, categorized collection of points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    /// Stable scene identifier.
    pub id: String,
    /// Human-readable name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub category: Category,
    /// Points in display order.
    pub points: Vec<Point>,
}

impl Scene {
    /// Create an empty scene. The name defaults to the id.
    #[must_use]
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category,
            points: Vec::new(),
        }
    }

    /// Set the display name (builder).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a point (builder).
    #[must_use]
    pub fn with_point(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }

    /// Append a point whose label equals its key (builder).
    #[must_use]
    pub fn with(self, key: &str, x: f32, y: f32) -> Self {
        self.with_point(Point::new(key, key, x, y))
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the scene has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every point fully opaque at its own position, in scene order.
    #[must_use]
    pub fn rendered(&self) -> Vec<RenderedPoint> {
        self.points.iter().map(RenderedPoint::from).collect()
    }

    /// Whether no key appears twice.
    #[must_use]
    pub fn has_unique_keys(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.points.len());
        self.points.iter().all(|p| seen.insert(&*p.key))
    }
}
