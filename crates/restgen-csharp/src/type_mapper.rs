use std::collections::HashMap;

use restgen_core::ir::{CodeModel, IrType, ModelKind};

use crate::identifiers::{NameScope, RESERVED_TYPE_NAMES, type_identifier};

/// Resolves IR types to C# type names for one code model.
///
/// Every model gets a unique C# name up front: plain objects and union
/// variants become classes, polymorphic models become `I{Name}` interfaces.
#[derive(Debug, Default)]
pub struct TypeMapper {
    classes: HashMap<String, String>,
    interfaces: HashMap<String, String>,
    aliases: HashMap<String, IrType>,
}

impl TypeMapper {
    /// `reserved` holds names already taken in the output, such as the
    /// client class and its interface.
    pub fn new(model: &CodeModel, reserved: &[&str]) -> Self {
        let mut scope = NameScope::with_reserved(reserved.iter().copied());
        let mut mapper = Self::default();

        for m in &model.models {
            if mapper.classes.contains_key(&m.name) || mapper.interfaces.contains_key(&m.name) {
                continue;
            }
            match m.kind {
                ModelKind::Object => {
                    let name = claim_type(&mut scope, &type_identifier(&m.name, "Model"));
                    mapper.classes.insert(m.name.clone(), name);
                }
                ModelKind::Polymorphic(_) => {
                    let base = format!("I{}", type_identifier(&m.name, "Model"));
                    let name = claim_type(&mut scope, &base);
                    mapper.interfaces.insert(m.name.clone(), name);
                }
            }
        }

        // Variants that are not top-level objects (inline variants, nested unions).
        for m in &model.models {
            for variant in m.subtypes() {
                if !mapper.classes.contains_key(&variant.name) {
                    let name = claim_type(&mut scope, &type_identifier(&variant.name, "Model"));
                    mapper.classes.insert(variant.name.clone(), name);
                }
            }
        }

        mapper.aliases = model
            .aliases
            .iter()
            .map(|a| (a.name.clone(), a.target.clone()))
            .collect();
        mapper
    }

    /// C# class name for a model, by IR name.
    pub fn class_name(&self, ir_name: &str) -> String {
        self.classes
            .get(ir_name)
            .cloned()
            .unwrap_or_else(|| type_identifier(ir_name, "Model"))
    }

    /// C# interface name for a polymorphic model, by IR name.
    pub fn interface_name(&self, ir_name: &str) -> String {
        self.interfaces
            .get(ir_name)
            .cloned()
            .unwrap_or_else(|| format!("I{}", type_identifier(ir_name, "Model")))
    }

    /// Render an IR type as a C# type, without a nullability marker.
    pub fn render(&self, ty: &IrType) -> String {
        self.render_guarded(ty, &mut Vec::new())
    }

    /// Render an IR type as a nullable C# type.
    pub fn render_nullable(&self, ty: &IrType) -> String {
        format!("{}?", self.render(ty))
    }

    fn render_guarded(&self, ty: &IrType, seen: &mut Vec<String>) -> String {
        match ty {
            IrType::String => "string".to_string(),
            IrType::DateTime => "DateTime".to_string(),
            IrType::Uuid => "Guid".to_string(),
            IrType::Int32 => "int".to_string(),
            IrType::Int64 => "long".to_string(),
            IrType::Float => "float".to_string(),
            IrType::Double => "double".to_string(),
            IrType::Decimal => "decimal".to_string(),
            IrType::Boolean => "bool".to_string(),
            IrType::Any => "object".to_string(),
            IrType::List(inner) => format!("List<{}>", self.render_guarded(inner, seen)),
            IrType::Ref(name) => {
                if let Some(interface) = self.interfaces.get(name) {
                    return interface.clone();
                }
                if let Some(class) = self.classes.get(name) {
                    return class.clone();
                }
                match self.aliases.get(name) {
                    Some(_) if seen.contains(name) => {
                        log::warn!("alias '{name}' refers to itself; rendering as object");
                        "object".to_string()
                    }
                    Some(target) => {
                        seen.push(name.clone());
                        let rendered = self.render_guarded(target, seen);
                        seen.pop();
                        rendered
                    }
                    None => {
                        log::debug!("unknown type reference '{name}'; rendering as object");
                        "object".to_string()
                    }
                }
            }
        }
    }
}

/// Claim a type name, moving framework names out of the way with a `Model`
/// suffix first.
fn claim_type(scope: &mut NameScope, base: &str) -> String {
    if RESERVED_TYPE_NAMES.contains(&base) {
        scope.claim(&format!("{base}Model"))
    } else {
        scope.claim(base)
    }
}
