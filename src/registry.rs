//! Variant registry.
//!
//! The set of record variants the platform accepts is owned by the caller's
//! deployment, not by this crate: descriptors are registered
//! programmatically or loaded from a JSON document, and resolved by name at
//! call time. Each variant declares one or more shapes (alternative
//! positional field lists); positional upload picks a shape by field count.

use serde::{Deserialize, Serialize};

use crate::record::FieldType;

/// A single named, typed field of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldDef {
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

/// An ordered field list a variant can be built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub fields: Vec<FieldDef>,
}

impl Shape {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// A named variant and its declared shapes, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    pub name: String,
    pub shapes: Vec<Shape>,
}

impl VariantDescriptor {
    pub fn new(name: &str, shapes: Vec<Shape>) -> Self {
        Self {
            name: name.to_string(),
            shapes,
        }
    }

    /// First declared shape with the requested field count.
    ///
    /// Zero-arity shapes never match. If several shapes share an arity the
    /// first declared wins; there is no further tie-break.
    pub fn shape_for_arity(&self, arity: usize) -> Option<&Shape> {
        self.shapes
            .iter()
            .find(|s| s.arity() > 0 && s.arity() == arity)
    }

    /// The first-declared shape, used for field-name matching in JSON upload.
    pub fn primary_shape(&self) -> Option<&Shape> {
        self.shapes.first()
    }
}

/// Name → descriptor registry, preserving registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantRegistry {
    variants: Vec<VariantDescriptor>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any existing one with the same name.
    pub fn register(&mut self, descriptor: VariantDescriptor) {
        if let Some(existing) = self.variants.iter_mut().find(|v| v.name == descriptor.name) {
            *existing = descriptor;
        } else {
            self.variants.push(descriptor);
        }
    }

    pub fn get(&self, name: &str) -> Option<&VariantDescriptor> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Parse a registry from its JSON document form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
