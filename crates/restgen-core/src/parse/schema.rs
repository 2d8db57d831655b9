use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    #[serde(other)]
    Unknown,
}

/// `type` as written: one keyword, or a 3.1 list such as `["string", "null"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    fn as_slice(&self) -> &[SchemaType] {
        match self {
            TypeSet::Single(ty) => std::slice::from_ref(ty),
            TypeSet::Multiple(types) => types,
        }
    }

    pub fn primary(&self) -> Option<SchemaType> {
        self.as_slice()
            .iter()
            .copied()
            .find(|ty| *ty != SchemaType::Null)
    }

    pub fn allows_null(&self) -> bool {
        self.as_slice().contains(&SchemaType::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

impl SchemaOrRef {
    pub fn as_schema(&self) -> Option<&Schema> {
        if let SchemaOrRef::Schema(schema) = self {
            Some(schema)
        } else {
            None
        }
    }

    pub fn ref_path(&self) -> Option<&str> {
        if let SchemaOrRef::Ref { ref_path } = self {
            Some(ref_path)
        } else {
            None
        }
    }
}

impl From<Schema> for SchemaOrRef {
    fn from(schema: Schema) -> Self {
        SchemaOrRef::Schema(Box::new(schema))
    }
}

/// Names the property whose value selects a subtype.
///
/// Swagger 2.0 writes a bare property name, OpenAPI 3 an object that may
/// also map tag values to schema references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,
    pub mapping: IndexMap<String, String>,
}

impl TryFrom<Value> for Discriminator {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(property_name) => Ok(Discriminator {
                property_name,
                mapping: IndexMap::new(),
            }),
            Value::Object(mut fields) => {
                let property_name = match fields.remove("propertyName") {
                    Some(Value::String(name)) => name,
                    _ => return Err("discriminator needs a string 'propertyName'".to_string()),
                };
                let mapping = match fields.remove("mapping") {
                    Some(Value::Object(entries)) => entries
                        .into_iter()
                        .filter_map(|(tag, target)| match target {
                            Value::String(target) => Some((tag, target)),
                            _ => None,
                        })
                        .collect(),
                    _ => IndexMap::new(),
                };
                Ok(Discriminator {
                    property_name,
                    mapping,
                })
            }
            other => Err(format!("unexpected discriminator value: {other}")),
        }
    }
}

/// The JSON Schema keywords the converter reads, 2.0 and 3.x alike.
/// Anything else in a schema object is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<TypeSet>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub nullable: Option<bool>,
    #[serde(default)]
    pub properties: IndexMap<String, SchemaOrRef>,
    #[serde(default)]
    pub required: Vec<String>,
    pub items: Option<Box<SchemaOrRef>>,
    #[serde(default)]
    pub all_of: Vec<SchemaOrRef>,
    #[serde(default)]
    pub one_of: Vec<SchemaOrRef>,
    #[serde(default)]
    pub any_of: Vec<SchemaOrRef>,
    pub discriminator: Option<Discriminator>,
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,
}

impl Schema {
    /// The declared type with `null` skipped.
    pub fn primary_type(&self) -> Option<SchemaType> {
        self.schema_type.as_ref().and_then(TypeSet::primary)
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable == Some(true) || self.schema_type.as_ref().is_some_and(TypeSet::allows_null)
    }

    /// Untyped or `object`, with at least one property.
    pub fn is_object_with_properties(&self) -> bool {
        !self.properties.is_empty()
            && matches!(self.primary_type(), None | Some(SchemaType::Object))
    }

    pub fn is_composite(&self) -> bool {
        [&self.all_of, &self.one_of, &self.any_of]
            .iter()
            .any(|list| !list.is_empty())
    }
}
