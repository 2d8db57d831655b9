use std::collections::{HashMap, HashSet};

use minijinja::{Value, context};
use restgen_core::GeneratorError;
use restgen_core::ir::{CodeModel, Model, ModelField, ModelKind};

use crate::identifiers::{NameScope, pascal_identifier, string_literal};
use crate::type_mapper::TypeMapper;

use super::{Names, doc_lines, render};

enum Declaration<'a> {
    Interface(&'a Model),
    Class(&'a Model),
}

/// A property of a generated class or interface.
struct Member<'a> {
    field: &'a ModelField,
    name: String,
    ty: String,
    optional: bool,
}

/// Emit `Models.cs`: a class per object model and union variant, an
/// interface per polymorphic model.
pub fn emit_models(
    model: &CodeModel,
    names: &Names,
    types: &TypeMapper,
) -> Result<String, GeneratorError> {
    let owners = union_owners(model);
    let declarations: Vec<Value> = plan(model)
        .into_iter()
        .map(|decl| match decl {
            Declaration::Interface(m) => interface_ctx(m, types),
            Declaration::Class(m) => {
                let implemented = owners.get(m.name.as_str()).map(Vec::as_slice);
                class_ctx(m, implemented.unwrap_or_default(), types)
            }
        })
        .collect();

    render(
        "models.cs.j2",
        include_str!("../../templates/models.cs.j2"),
        context! {
            namespace => names.namespace.clone(),
            declarations => declarations,
        },
    )
}

/// Declaration order: models in document order, each union followed by the
/// variant classes that have no top-level declaration of their own. Every
/// class is declared once.
fn plan(model: &CodeModel) -> Vec<Declaration<'_>> {
    let top_objects: HashSet<&str> = model
        .models
        .iter()
        .filter(|m| !m.is_polymorphic())
        .map(|m| m.name.as_str())
        .collect();

    let mut top_seen = HashSet::new();
    let mut classes = HashSet::new();
    let mut decls = Vec::new();
    for m in &model.models {
        if !top_seen.insert(m.name.as_str()) {
            log::warn!("model '{}' is declared twice; keeping the first", m.name);
            continue;
        }
        match m.kind {
            ModelKind::Object => {
                if classes.insert(m.name.as_str()) {
                    decls.push(Declaration::Class(m));
                }
            }
            ModelKind::Polymorphic(_) => {
                decls.push(Declaration::Interface(m));
                for variant in m.subtypes() {
                    if !top_objects.contains(variant.name.as_str())
                        && classes.insert(variant.name.as_str())
                    {
                        decls.push(Declaration::Class(variant));
                    }
                }
            }
        }
    }
    decls
}

/// Variant model name → the polymorphic models it belongs to.
fn union_owners(model: &CodeModel) -> HashMap<&str, Vec<&Model>> {
    let mut owners: HashMap<&str, Vec<&Model>> = HashMap::new();
    for union in model.models.iter().filter(|m| m.is_polymorphic()) {
        for variant in union.subtypes() {
            let list = owners.entry(variant.name.as_str()).or_default();
            if !list.iter().any(|o| o.name == union.name) {
                list.push(union);
            }
        }
    }
    owners
}

fn members<'a>(
    model: &'a Model,
    owner: &str,
    types: &TypeMapper,
    all_optional: bool,
) -> Vec<Member<'a>> {
    let mut scope = NameScope::new();
    model
        .fields
        .iter()
        .map(|field| {
            let base = pascal_identifier(&field.name, "Property");
            let base = if base == owner {
                format!("{base}Value")
            } else {
                base
            };
            Member {
                field,
                name: scope.claim(&base),
                ty: types.render(&field.field_type),
                optional: all_optional || !field.required || field.nullable,
            }
        })
        .collect()
}

fn interface_ctx(model: &Model, types: &TypeMapper) -> Value {
    let name = types.interface_name(&model.name);
    let discriminator = model.discriminator().map(string_literal);

    let mut derived = Vec::new();
    if let (Some(_), ModelKind::Polymorphic(poly)) = (&discriminator, &model.kind) {
        let mut tags = HashSet::new();
        let mut classes = HashSet::new();
        for variant in &poly.variants {
            let class = types.class_name(&variant.model.name);
            if tags.insert(variant.tag.as_str()) && classes.insert(class.clone()) {
                derived.push(context! {
                    class => class,
                    tag => string_literal(&variant.tag),
                });
            }
        }
    }

    let members: Vec<Value> = members(model, &name, types, true)
        .iter()
        .map(|m| {
            context! {
                doc => doc_lines(m.field.description.as_deref()),
                ignore => model.discriminator() == Some(m.field.wire_name.as_str()),
                declaration => format!("{}? {} {{ get; set; }}", m.ty, m.name),
            }
        })
        .collect();

    context! {
        kind => "interface",
        name => name,
        doc => doc_lines(model.description.as_deref()),
        discriminator => discriminator,
        derived => derived,
        members => members,
    }
}

fn class_ctx(model: &Model, owners: &[&Model], types: &TypeMapper) -> Value {
    let name = types.class_name(&model.name);
    let own = members(model, &name, types, false);

    // Discriminators are written by the serializer from the interface
    // annotations, so the variant must not map the same key again.
    let discriminators: HashSet<&str> = owners.iter().filter_map(|o| o.discriminator()).collect();

    let properties: Vec<Value> = own
        .iter()
        .map(|m| {
            let declaration = if m.optional {
                format!("public {}? {} {{ get; set; }}", m.ty, m.name)
            } else {
                format!("public {} {} {{ get; set; }} = default!;", m.ty, m.name)
            };
            context! {
                doc => doc_lines(m.field.description.as_deref()),
                json_name => string_literal(&m.field.wire_name),
                ignore => discriminators.contains(m.field.wire_name.as_str()),
                declaration => declaration,
            }
        })
        .collect();

    let interfaces: Vec<String> = owners
        .iter()
        .map(|o| types.interface_name(&o.name))
        .collect();
    let header = if interfaces.is_empty() {
        format!("public class {name}")
    } else {
        format!("public class {name} : {}", interfaces.join(", "))
    };

    let adapters: Vec<String> = owners
        .iter()
        .flat_map(|owner| adapters(owner, &own, types))
        .collect();

    context! {
        kind => "class",
        name => name,
        header => header,
        doc => doc_lines(model.description.as_deref()),
        properties => properties,
        adapters => adapters,
    }
}

/// Explicit implementations for the interface members a class does not
/// implement implicitly: the class lacks the property, names it
/// differently, or declares it with another type or nullability.
fn adapters(owner: &Model, own: &[Member<'_>], types: &TypeMapper) -> Vec<String> {
    let interface = types.interface_name(&owner.name);
    members(owner, &interface, types, true)
        .iter()
        .filter_map(|wanted| {
            let ty = &wanted.ty;
            let target = format!("{interface}.{}", wanted.name);
            let existing = own
                .iter()
                .find(|m| m.field.wire_name == wanted.field.wire_name);
            match existing {
                Some(m) if m.ty == *ty && m.optional && m.name == wanted.name => None,
                Some(m) if m.ty == *ty && m.optional => Some(format!(
                    "{ty}? {target} {{ get => {0}; set => {0} = value; }}",
                    m.name
                )),
                Some(m) if m.ty == *ty => Some(format!(
                    "{ty}? {target} {{ get => {0}; set {{ if (value is {{ }} v) {0} = v; }} }}",
                    m.name
                )),
                _ => Some(format!("{ty}? {target} {{ get => default; set {{ }} }}")),
            }
        })
        .collect()
}
