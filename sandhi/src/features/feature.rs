//! Feature adapter over host map objects.
//!
//! The host data model stays the owner of its objects. A [`Feature`] holds a
//! shared handle to the host object plus the centroid derived from its
//! bounds, so it can be cloned freely into candidates without copying or
//! mutating host data.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{Bounds, Point2D};
use crate::error::{ConflationError, Result};

/// Key/value tags attached to a feature.
pub type Tags = BTreeMap<String, String>;

/// Opaque, comparable identity of a host feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geometry type of a host feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    /// Single position
    Point,
    /// Open linear geometry
    Line,
    /// Closed polygon
    Area,
    /// Grouping of other geometries (e.g. multipolygon)
    Collection,
}

/// Read access the host editor provides for one of its objects.
pub trait HostFeature: Send + Sync + fmt::Debug {
    /// Stable identity within the host dataset
    fn id(&self) -> FeatureId;

    /// Geometry type
    fn geometry_kind(&self) -> GeometryKind;

    /// Bounding envelope in projected coordinates
    fn bounds(&self) -> Bounds;

    /// Attribute tags
    fn tags(&self) -> &Tags;
}

/// A host object adapted for scoring.
///
/// Equality and hashing use the feature identity only.
#[derive(Clone)]
pub struct Feature {
    host: Arc<dyn HostFeature>,
    bounds: Bounds,
    centroid: Point2D,
}

impl Feature {
    /// Adapt a host object.
    ///
    /// Fails if the host reports empty or non-finite bounds, since no
    /// centroid can be derived.
    pub fn new(host: Arc<dyn HostFeature>) -> Result<Self> {
        let bounds = host.bounds();
        if bounds.is_empty() || !bounds.min.is_finite() || !bounds.max.is_finite() {
            return Err(ConflationError::InvalidFeature(format!(
                "feature {} has no usable bounds",
                host.id()
            )));
        }
        Ok(Self {
            centroid: bounds.center(),
            bounds,
            host,
        })
    }

    /// Feature identity
    #[inline]
    pub fn id(&self) -> FeatureId {
        self.host.id()
    }

    /// Geometry type
    #[inline]
    pub fn kind(&self) -> GeometryKind {
        self.host.geometry_kind()
    }

    /// Center of the bounding envelope
    #[inline]
    pub fn centroid(&self) -> Point2D {
        self.centroid
    }

    /// Bounding envelope
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// All tags
    #[inline]
    pub fn tags(&self) -> &Tags {
        self.host.tags()
    }

    /// Value of one tag
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.host.tags().get(key).map(String::as_str)
    }

    /// The underlying host object
    pub fn host(&self) -> &Arc<dyn HostFeature> {
        &self.host
    }
}

impl PartialEq for Feature {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Feature {}

impl Hash for Feature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("centroid", &self.centroid)
            .finish()
    }
}

/// Plain owned [`HostFeature`], for hosts without their own object model
/// and for tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimpleFeature {
    /// Identity
    pub id: FeatureId,
    /// Geometry type
    pub kind: GeometryKind,
    /// Bounding envelope
    pub bounds: Bounds,
    /// Tags
    #[serde(default)]
    pub tags: Tags,
}

impl SimpleFeature {
    /// Point feature at (x, y).
    pub fn point(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: FeatureId(id),
            kind: GeometryKind::Point,
            bounds: Bounds::from_point(Point2D::new(x, y)),
            tags: Tags::new(),
        }
    }

    /// Area feature covering `bounds`.
    pub fn area(id: u64, bounds: Bounds) -> Self {
        Self {
            id: FeatureId(id),
            kind: GeometryKind::Area,
            bounds,
            tags: Tags::new(),
        }
    }

    /// Builder-style tag setter.
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    /// Adapt into a [`Feature`].
    pub fn into_feature(self) -> Result<Feature> {
        Feature::new(Arc::new(self))
    }
}

impl HostFeature for SimpleFeature {
    fn id(&self) -> FeatureId {
        self.id
    }

    fn geometry_kind(&self) -> GeometryKind {
        self.kind
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }
}
