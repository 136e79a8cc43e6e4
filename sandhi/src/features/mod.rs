//! Feature adapter and feature collections.
//!
//! - [`HostFeature`]: read-only view the host editor provides for its objects
//! - [`Feature`]: scorable wrapper with a cached centroid
//! - [`FeatureCollection`]: features sharing one attribute schema
//! - [`build_collections`]: split reference/subject selections into disjoint collections

mod collection;
mod feature;

pub use collection::{
    build_collections, AttributeType, AttributeValue, FeatureCollection, FeatureSchema,
    GEOMETRY_ATTRIBUTE,
};
pub use feature::{Feature, FeatureId, GeometryKind, HostFeature, SimpleFeature, Tags};
