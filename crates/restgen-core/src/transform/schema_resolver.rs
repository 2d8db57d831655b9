use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::ir::{
    Composition, IrType, Model, ModelField, ModelKind, Polymorphism, TypeAlias, Variant,
};
use crate::parse::ref_resolve::{RefLookup, ref_name};
use crate::parse::schema::{Schema, SchemaOrRef, SchemaType};
use crate::parse::spec::Document;

use super::name_normalizer::to_pascal_case;

/// Map a schema (or reference) to a type.
///
/// References map to the PascalCased name of their target whether or not
/// the target exists, so this never fails and never follows cycles.
pub fn map_type(schema_or_ref: &SchemaOrRef) -> IrType {
    match schema_or_ref {
        SchemaOrRef::Ref { ref_path } => IrType::Ref(to_pascal_case(&ref_name(ref_path))),
        SchemaOrRef::Schema(schema) => schema_type(schema),
    }
}

/// Map an inline schema to a type.
pub fn schema_type(schema: &Schema) -> IrType {
    if let Some(only) = single_composite_child(schema) {
        return map_type(only);
    }

    let format = schema.format.as_deref().unwrap_or("");
    match schema.primary_type() {
        Some(SchemaType::String) => match format {
            "date" | "date-time" => IrType::DateTime,
            "uuid" => IrType::Uuid,
            _ => IrType::String,
        },
        Some(SchemaType::Integer) => match format {
            "int64" => IrType::Int64,
            _ => IrType::Int32,
        },
        Some(SchemaType::Number) => match format {
            "float" => IrType::Float,
            "double" => IrType::Double,
            _ => IrType::Decimal,
        },
        Some(SchemaType::Boolean) => IrType::Boolean,
        Some(SchemaType::Array) => array_of(schema),
        None if schema.items.is_some() => array_of(schema),
        _ => IrType::Any,
    }
}

fn array_of(schema: &Schema) -> IrType {
    IrType::list_of(schema.items.as_deref().map_or(IrType::Any, map_type))
}

/// A composite with exactly one child and nothing else of its own is just
/// that child (the usual `allOf: [$ref]` nullable wrapper). An inline
/// object child is not unwrapped: it still needs a model of its own.
fn single_composite_child(schema: &Schema) -> Option<&SchemaOrRef> {
    if !schema.properties.is_empty() {
        return None;
    }
    let mut children = schema
        .all_of
        .iter()
        .chain(&schema.one_of)
        .chain(&schema.any_of);
    let only = match (children.next(), children.next()) {
        (Some(only), None) => only,
        _ => return None,
    };
    match only {
        SchemaOrRef::Ref { .. } => Some(only),
        SchemaOrRef::Schema(inline)
            if inline.is_object_with_properties() || inline.is_composite() =>
        {
            None
        }
        SchemaOrRef::Schema(_) => Some(only),
    }
}

/// Result of converting one named schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Model(Model),
    Alias(IrType),
}

/// Converts reusable schemas into models and aliases.
///
/// `$ref`s followed while building a model are tracked on a resolution
/// stack. A reference back to a schema already on the stack contributes
/// nothing further, so cyclic documents still convert.
pub struct SchemaConverter<'a> {
    doc: &'a Document,
    lookup: RefLookup<'a>,
    stack: Vec<String>,
}

impl<'a> SchemaConverter<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            lookup: RefLookup::new(doc),
            stack: Vec::new(),
        }
    }

    /// Convert every reusable schema, in document order.
    pub fn convert_all(&mut self) -> (Vec<Model>, Vec<TypeAlias>) {
        let mut models = Vec::new();
        let mut aliases = Vec::new();
        let doc = self.doc;
        for (name, schema_or_ref) in doc.schemas() {
            let pascal = to_pascal_case(name);
            let description = schema_or_ref
                .as_schema()
                .and_then(|s| s.description.clone());
            match self.convert_named(name, schema_or_ref) {
                Converted::Model(model) => models.push(model),
                Converted::Alias(target) => aliases.push(TypeAlias {
                    name: pascal,
                    target,
                    description,
                }),
            }
        }
        (models, aliases)
    }

    /// Convert one named schema. `name` is the raw schema key.
    pub fn convert_named(&mut self, name: &str, schema_or_ref: &SchemaOrRef) -> Converted {
        match schema_or_ref {
            SchemaOrRef::Ref { .. } => Converted::Alias(map_type(schema_or_ref)),
            SchemaOrRef::Schema(schema) => {
                self.stack.push(name.to_string());
                let converted = self.convert_schema(&to_pascal_case(name), schema);
                self.stack.pop();
                converted
            }
        }
    }

    fn convert_schema(&mut self, name: &str, schema: &Schema) -> Converted {
        if single_composite_child(schema).is_some() {
            return Converted::Alias(schema_type(schema));
        }
        if !schema.one_of.is_empty() {
            return self.polymorphic(name, schema, Composition::OneOf, &schema.one_of);
        }
        if !schema.any_of.is_empty() {
            return self.polymorphic(name, schema, Composition::AnyOf, &schema.any_of);
        }
        if !schema.all_of.is_empty() {
            let mut fields = IndexMap::new();
            self.merge_all_of(schema, &mut fields);
            return Converted::Model(Model {
                name: name.to_string(),
                description: schema.description.clone(),
                fields: fields.into_values().collect(),
                kind: ModelKind::Object,
            });
        }
        if schema.is_object_with_properties() {
            return Converted::Model(Model {
                name: name.to_string(),
                description: schema.description.clone(),
                fields: build_fields(schema),
                kind: ModelKind::Object,
            });
        }
        Converted::Alias(schema_type(schema))
    }

    /// Merge every `allOf` member (following references and nested `allOf`)
    /// and then the schema's own properties. A later declaration of a field
    /// replaces an earlier one but keeps the earlier position.
    fn merge_all_of(&mut self, schema: &Schema, fields: &mut IndexMap<String, ModelField>) {
        for child in &schema.all_of {
            match child {
                SchemaOrRef::Ref { ref_path } => {
                    if let Some((child_name, child_schema)) = self.enter(ref_path) {
                        self.merge_all_of(child_schema, fields);
                        self.leave(&child_name);
                    }
                }
                SchemaOrRef::Schema(inline) => self.merge_all_of(inline, fields),
            }
        }
        for field in build_fields(schema) {
            fields.insert(field.wire_name.clone(), field);
        }
    }

    fn polymorphic(
        &mut self,
        name: &str,
        schema: &Schema,
        composition: Composition,
        children: &[SchemaOrRef],
    ) -> Converted {
        let mapping = schema
            .discriminator
            .as_ref()
            .map(|d| &d.mapping)
            .filter(|m| !m.is_empty());
        let mut discriminator = schema
            .discriminator
            .as_ref()
            .map(|d| d.property_name.clone());

        let mut union: IndexMap<String, ModelField> = IndexMap::new();
        for field in build_fields(schema) {
            union.insert(field.wire_name.clone(), optional(field));
        }

        let mut variants = Vec::new();
        for (idx, child) in children.iter().enumerate() {
            let (raw_name, child_schema) = match child {
                SchemaOrRef::Ref { ref_path } => match self.enter(ref_path) {
                    Some((child_name, child_schema)) => (child_name, child_schema),
                    None => continue,
                },
                SchemaOrRef::Schema(inline) => {
                    let inline_name = format!("{name}Option{}", idx + 1);
                    if !(inline.is_object_with_properties() || inline.is_composite()) {
                        log::debug!(
                            "{name}: inline {inline_name} is not an object, leaving it out of the union"
                        );
                        continue;
                    }
                    self.stack.push(inline_name.clone());
                    (inline_name, &**inline)
                }
            };

            if discriminator.is_none() {
                discriminator = child_schema
                    .discriminator
                    .as_ref()
                    .map(|d| d.property_name.clone());
            }

            let variant_name = to_pascal_case(&raw_name);
            let converted = self.convert_schema(&variant_name, child_schema);
            self.leave(&raw_name);

            let model = match converted {
                Converted::Model(model) => model,
                Converted::Alias(_) => {
                    log::debug!("{name}: variant {variant_name} has no properties, skipping");
                    continue;
                }
            };

            for field in &model.fields {
                if !union.contains_key(&field.wire_name) {
                    union.insert(field.wire_name.clone(), optional(field.clone()));
                }
            }

            let tag = mapping
                .and_then(|m| {
                    m.iter()
                        .find(|(_, target)| ref_name(target) == raw_name)
                        .map(|(key, _)| key.clone())
                })
                .unwrap_or_else(|| raw_name.clone());
            variants.push(Variant { tag, model });
        }

        if variants.is_empty() && union.is_empty() {
            log::debug!("{name}: no object variants, treating as an untyped value");
            return Converted::Alias(IrType::Any);
        }

        Converted::Model(Model {
            name: name.to_string(),
            description: schema.description.clone(),
            fields: union.into_values().collect(),
            kind: ModelKind::Polymorphic(Polymorphism {
                composition,
                discriminator,
                variants,
            }),
        })
    }

    /// Resolve a schema reference and push it on the resolution stack.
    /// Returns `None` (after logging) for cycles and unresolvable targets.
    fn enter(&mut self, ref_path: &str) -> Option<(String, &'a Schema)> {
        match self.lookup.schema(ref_path) {
            Ok((name, schema)) => {
                if self.stack.contains(&name) {
                    log::warn!(
                        "{}",
                        ResolveError::CircularRef(format!(
                            "{} -> {name}",
                            self.stack.join(" -> ")
                        ))
                    );
                    return None;
                }
                self.stack.push(name.clone());
                Some((name, schema))
            }
            Err(e) => {
                log::warn!("skipping {ref_path}: {e}");
                None
            }
        }
    }

    fn leave(&mut self, name: &str) {
        if self.stack.last().is_some_and(|top| top == name) {
            self.stack.pop();
        }
    }
}

fn optional(mut field: ModelField) -> ModelField {
    field.required = false;
    field
}

/// Build the fields declared directly on `schema`.
pub fn build_fields(schema: &Schema) -> Vec<ModelField> {
    schema
        .properties
        .iter()
        .map(|(key, prop)| {
            let inline = prop.as_schema();
            ModelField {
                name: to_pascal_case(key),
                wire_name: key.clone(),
                field_type: map_type(prop),
                required: schema.required.contains(key),
                nullable: inline.is_some_and(Schema::is_nullable),
                description: inline.and_then(field_description),
            }
        })
        .collect()
}

fn field_description(schema: &Schema) -> Option<String> {
    let allowed: Vec<String> = schema
        .enum_values
        .iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    match (&schema.description, allowed.is_empty()) {
        (Some(desc), true) => Some(desc.clone()),
        (Some(desc), false) => Some(format!("{desc} (allowed values: {})", allowed.join(", "))),
        (None, false) => Some(format!("Allowed values: {}", allowed.join(", "))),
        (None, true) => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema(value: serde_json::Value) -> SchemaOrRef {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_map_primitives() {
        assert_eq!(map_type(&schema(json!({"type": "string"}))), IrType::String);
        assert_eq!(
            map_type(&schema(json!({"type": "string", "format": "date"}))),
            IrType::DateTime
        );
        assert_eq!(
            map_type(&schema(json!({"type": "string", "format": "date-time"}))),
            IrType::DateTime
        );
        assert_eq!(
            map_type(&schema(json!({"type": "string", "format": "uuid"}))),
            IrType::Uuid
        );
        assert_eq!(
            map_type(&schema(json!({"type": "string", "format": "email"}))),
            IrType::String
        );
        assert_eq!(map_type(&schema(json!({"type": "integer"}))), IrType::Int32);
        assert_eq!(
            map_type(&schema(json!({"type": "integer", "format": "int64"}))),
            IrType::Int64
        );
        assert_eq!(
            map_type(&schema(json!({"type": "number", "format": "float"}))),
            IrType::Float
        );
        assert_eq!(
            map_type(&schema(json!({"type": "number", "format": "double"}))),
            IrType::Double
        );
        assert_eq!(map_type(&schema(json!({"type": "number"}))), IrType::Decimal);
        assert_eq!(map_type(&schema(json!({"type": "boolean"}))), IrType::Boolean);
    }

    #[test]
    fn test_map_unresolved_is_any() {
        assert_eq!(map_type(&schema(json!({"type": "object"}))), IrType::Any);
        assert_eq!(map_type(&schema(json!({}))), IrType::Any);
        assert_eq!(map_type(&schema(json!({"type": "file"}))), IrType::Any);
    }

    #[test]
    fn test_map_array_of_ref() {
        let ty = map_type(&schema(json!({
            "type": "array",
            "items": {"$ref": "#/components/schemas/Pet"}
        })));
        assert_eq!(ty, IrType::list_of(IrType::Ref("Pet".into())));
    }

    #[test]
    fn test_map_ref_pascal_cases() {
        assert_eq!(
            map_type(&schema(json!({"$ref": "#/definitions/pet_owner"}))),
            IrType::Ref("PetOwner".into())
        );
    }

    #[test]
    fn test_map_nullable_ref_wrapper() {
        let ty = map_type(&schema(json!({
            "allOf": [{"$ref": "#/components/schemas/Category"}],
            "nullable": true
        })));
        assert_eq!(ty, IrType::Ref("Category".into()));
    }

    #[test]
    fn test_map_type_array_with_null() {
        assert_eq!(
            map_type(&schema(json!({"type": ["null", "integer"]}))),
            IrType::Int32
        );
    }

    #[test]
    fn test_field_description_lists_enum_values() {
        let SchemaOrRef::Schema(s) = schema(json!({
            "type": "string",
            "description": "Pet status",
            "enum": ["available", "sold"]
        })) else {
            panic!("expected inline schema");
        };
        assert_eq!(
            field_description(&s).as_deref(),
            Some("Pet status (allowed values: available, sold)")
        );
    }
}
