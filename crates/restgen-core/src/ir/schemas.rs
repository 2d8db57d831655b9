use serde::Serialize;

use super::types::IrType;

/// A generated data shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    /// PascalCase type name.
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<ModelField>,
    pub kind: ModelKind,
}

/// A field on a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelField {
    /// PascalCase member name.
    pub name: String,
    /// Property key as it appears on the wire.
    pub wire_name: String,
    pub field_type: IrType,
    pub required: bool,
    pub nullable: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ModelKind {
    /// A plain object (including merged `allOf`).
    Object,
    /// A `oneOf`/`anyOf` union. The model's own fields are the union of the
    /// variants' fields, all optional.
    Polymorphic(Polymorphism),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polymorphism {
    pub composition: Composition,
    /// Wire name of the discriminator property, when one is declared.
    pub discriminator: Option<String>,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Composition {
    OneOf,
    AnyOf,
}

/// A concrete subtype of a polymorphic model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    /// Discriminator value selecting this variant.
    pub tag: String,
    pub model: Model,
}

impl Model {
    pub fn object(name: impl Into<String>, fields: Vec<ModelField>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
            kind: ModelKind::Object,
        }
    }

    pub fn is_polymorphic(&self) -> bool {
        matches!(self.kind, ModelKind::Polymorphic(_))
    }

    pub fn discriminator(&self) -> Option<&str> {
        match &self.kind {
            ModelKind::Polymorphic(poly) => poly.discriminator.as_deref(),
            ModelKind::Object => None,
        }
    }

    /// Concrete subtypes; empty unless polymorphic.
    pub fn subtypes(&self) -> impl Iterator<Item = &Model> {
        let variants: &[Variant] = match &self.kind {
            ModelKind::Polymorphic(poly) => &poly.variants,
            ModelKind::Object => &[],
        };
        variants.iter().map(|v| &v.model)
    }

    pub fn field(&self, wire_name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }
}
