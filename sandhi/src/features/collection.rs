//! Feature collections with a shared attribute schema.
//!
//! Reference and subject collections of one matching run share a single
//! [`FeatureSchema`]: a geometry attribute plus the union of all tag keys
//! seen across both selections. Any feature can then be queried for any
//! schema attribute, with missing tags reported as [`AttributeValue::Null`].

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use super::feature::{Feature, FeatureId};
use crate::core::Bounds;

/// Name of the geometry attribute present in every schema.
pub const GEOMETRY_ATTRIBUTE: &str = "__GEOMETRY__";

/// Attribute type in a [`FeatureSchema`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeType {
    /// The feature geometry
    Geometry,
    /// A tag value
    String,
}

/// Value of a schema attribute for one feature.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue<'a> {
    /// Geometry attribute
    Geometry(&'a Feature),
    /// Tag present on the feature
    Text(&'a str),
    /// Tag key known to the schema but absent on this feature
    Null,
}

/// Ordered attribute list shared by the collections of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureSchema {
    attributes: Vec<(String, AttributeType)>,
}

impl FeatureSchema {
    /// Schema with the geometry attribute followed by every tag key used by
    /// `features`, in sorted order.
    pub fn from_features<'a, I>(features: I) -> Self
    where
        I: IntoIterator<Item = &'a Feature>,
    {
        let keys: BTreeSet<&str> = features
            .into_iter()
            .flat_map(|f| f.tags().keys().map(String::as_str))
            .collect();

        let mut attributes = Vec::with_capacity(keys.len() + 1);
        attributes.push((GEOMETRY_ATTRIBUTE.to_string(), AttributeType::Geometry));
        attributes.extend(keys.into_iter().map(|k| (k.to_string(), AttributeType::String)));
        Self { attributes }
    }

    /// Number of attributes (including geometry)
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Always false: the geometry attribute is always present
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Type of a named attribute
    pub fn attribute_type(&self, name: &str) -> Option<AttributeType> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    /// Attribute names in schema order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(n, _)| n.as_str())
    }
}

/// Ordered features sharing one schema.
#[derive(Clone, Debug)]
pub struct FeatureCollection {
    schema: Arc<FeatureSchema>,
    features: Vec<Feature>,
}

impl FeatureCollection {
    /// Empty collection over `schema`
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        Self {
            schema,
            features: Vec::new(),
        }
    }

    /// Append a feature
    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Shared schema
    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    /// Number of features
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature at an enumeration index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// All features in enumeration order
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Iterate in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Envelope of all feature bounds (empty for an empty collection)
    pub fn envelope(&self) -> Bounds {
        self.features
            .iter()
            .fold(Bounds::empty(), |acc, f| acc.union(&f.bounds()))
    }

    /// Look up a schema attribute for one feature.
    ///
    /// Returns `None` if `name` is not part of the schema.
    pub fn attribute<'a>(&self, feature: &'a Feature, name: &str) -> Option<AttributeValue<'a>> {
        match self.schema.attribute_type(name)? {
            AttributeType::Geometry => Some(AttributeValue::Geometry(feature)),
            AttributeType::String => Some(
                feature
                    .tag(name)
                    .map(AttributeValue::Text)
                    .unwrap_or(AttributeValue::Null),
            ),
        }
    }
}

/// Build disjoint reference and subject collections over a shared schema.
///
/// Enumeration order follows the input slices. Repeated features within a
/// selection are kept once. A feature selected as both reference and
/// subject is kept as reference only, so no pair ever matches an object
/// with itself.
pub fn build_collections(
    reference: &[Feature],
    subject: &[Feature],
) -> (FeatureCollection, FeatureCollection) {
    let schema = Arc::new(FeatureSchema::from_features(
        reference.iter().chain(subject.iter()),
    ));

    let mut seen: HashSet<FeatureId> = HashSet::with_capacity(reference.len() + subject.len());
    let mut ref_coll = FeatureCollection::new(Arc::clone(&schema));
    for f in reference {
        if seen.insert(f.id()) {
            ref_coll.push(f.clone());
        }
    }

    let reference_ids = seen.clone();
    let mut sub_coll = FeatureCollection::new(schema);
    for f in subject {
        if reference_ids.contains(&f.id()) {
            log::warn!(
                "Feature {} selected as both reference and subject, keeping it as reference",
                f.id()
            );
            continue;
        }
        if seen.insert(f.id()) {
            sub_coll.push(f.clone());
        }
    }

    log::debug!(
        "Built collections: {} reference, {} subject, {} schema attributes",
        ref_coll.len(),
        sub_coll.len(),
        ref_coll.schema().len()
    );

    (ref_coll, sub_coll)
}
