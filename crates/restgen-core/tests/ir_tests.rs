use indexmap::IndexMap;
use restgen_core::config::{AuthKind, AuthLocation, AuthenticationConfig, GeneratorConfig};
use restgen_core::error::ConfigError;
use restgen_core::ir::{
    Composition, HttpMethod, IrType, ModelKind, ParameterLocation,
};
use restgen_core::parse::{self, spec::Document};
use restgen_core::transform;

const PETSTORE: &str = include_str!("fixtures/petstore.json");
const SWAGGER2: &str = include_str!("fixtures/swagger2.json");
const POLYMORPHIC: &str = include_str!("fixtures/polymorphic.json");

fn convert(input: &str) -> restgen_core::ir::CodeModel {
    let _ = env_logger::builder().is_test(true).try_init();
    let doc = parse::parse(input.as_bytes()).expect("fixture should parse");
    transform::convert(&doc, &GeneratorConfig::new("Acme.Pets", "PetClient"))
        .expect("conversion should succeed")
}

fn doc_from(value: serde_json::Value) -> Document {
    serde_json::from_value(value).expect("should deserialize document")
}

#[test]
fn transform_petstore() {
    let model = convert(PETSTORE);

    assert_eq!(model.namespace, "Acme.Pets");
    assert_eq!(model.client_name, "PetClient");
    assert_eq!(model.base_url, "https://api.petstore.example.com/v1");
    assert_eq!(model.methods.len(), 3);
    assert_eq!(model.models.len(), 3);

    let names: Vec<&str> = model.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Pet", "Category", "CreatePetRequest"]);

    let list = model.method("ListPets").expect("should have ListPets");
    assert_eq!(list.http_method, HttpMethod::Get);
    assert_eq!(list.summary.as_deref(), Some("List all pets"));
    assert_eq!(list.response_type, IrType::list_of(IrType::Ref("Pet".into())));
    assert_eq!(list.parameters.len(), 3);
    assert!(list.parameters.iter().all(|p| !p.required));
    let header = &list.parameters[2];
    assert_eq!(header.location, ParameterLocation::Header);
    assert_eq!(header.name.original, "X-Request-Id");
    assert_eq!(header.param_type, IrType::Uuid);

    let create = model.method("CreatePets").expect("should synthesize CreatePets");
    assert_eq!(create.http_method, HttpMethod::Post);
    let body = create.request_body.as_ref().expect("should have a body");
    assert_eq!(body.name.original, "request");
    assert_eq!(body.location, ParameterLocation::Body);
    assert_eq!(body.param_type, IrType::Ref("CreatePetRequest".into()));
    assert!(body.required);
    assert_eq!(create.response_type, IrType::Ref("Pet".into()));

    let get = model.method("GetPetById").expect("should have GetPetById");
    assert_eq!(get.summary.as_deref(), Some("Get a pet by ID"));
    assert_eq!(get.parameters.len(), 1);
    let pet_id = &get.parameters[0];
    assert_eq!(pet_id.location, ParameterLocation::Path);
    assert!(pet_id.required, "path parameters are always required");
    assert_eq!(pet_id.param_type, IrType::Int64);
}

#[test]
fn petstore_fields() {
    let model = convert(PETSTORE);
    let pet = model.model("Pet").unwrap();
    assert_eq!(pet.kind, ModelKind::Object);
    assert_eq!(pet.description.as_deref(), Some("A pet in the store"));

    let field_names: Vec<&str> = pet.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(field_names, ["Id", "Name", "Tag", "BirthDate", "Category"]);

    let id = pet.field("id").unwrap();
    assert_eq!(id.field_type, IrType::Int64);
    assert!(id.required);
    let tag = pet.field("tag").unwrap();
    assert!(!tag.required);
    assert!(tag.nullable);
    assert_eq!(pet.field("birthDate").unwrap().field_type, IrType::DateTime);
    assert_eq!(
        pet.field("category").unwrap().field_type,
        IrType::Ref("Category".into())
    );
}

#[test]
fn transform_swagger2() {
    let model = convert(SWAGGER2);
    assert_eq!(model.base_url, "http://inventory.example.com/api");

    let names: Vec<&str> = model.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Item", "Supplier"]);
    assert_eq!(model.aliases.len(), 1);
    assert_eq!(model.aliases[0].name, "ItemCode");
    assert_eq!(model.aliases[0].target, IrType::String);

    let get = model.method("getItem").expect("operation id is used verbatim");
    assert_eq!(get.response_type, IrType::Ref("Item".into()));
    assert_eq!(get.parameters.len(), 2);
    assert_eq!(get.parameters[0].param_type, IrType::Uuid);
    let expand = &get.parameters[1];
    assert_eq!(expand.name.original, "expand");
    assert_eq!(expand.location, ParameterLocation::Query);
    assert_eq!(expand.param_type, IrType::Boolean);

    let put = model.method("UpdateItems").expect("should synthesize UpdateItems");
    let body = put.request_body.as_ref().expect("body parameter becomes the body");
    assert_eq!(body.name.original, "item");
    assert!(body.required);
    assert_eq!(body.param_type, IrType::Ref("Item".into()));
    assert_eq!(put.parameters.len(), 1, "formData parameters are skipped");
    assert_eq!(put.response_type, IrType::Ref("Item".into()));

    let list = model.method("GetItems").unwrap();
    assert_eq!(list.parameters[0].param_type, IrType::list_of(IrType::String));
    assert_eq!(list.response_type, IrType::list_of(IrType::Ref("Item".into())));
}

#[test]
fn transform_polymorphic() {
    let model = convert(POLYMORPHIC);

    let animal = model.model("Animal").expect("should have Animal");
    let ModelKind::Polymorphic(poly) = &animal.kind else {
        panic!("Animal should be polymorphic");
    };
    assert_eq!(poly.composition, Composition::OneOf);
    assert_eq!(poly.discriminator.as_deref(), Some("kind"));
    let tags: Vec<&str> = poly.variants.iter().map(|v| v.tag.as_str()).collect();
    assert_eq!(tags, ["cat", "dog"]);
    let subtypes: Vec<&str> = animal.subtypes().map(|m| m.name.as_str()).collect();
    assert_eq!(subtypes, ["Cat", "Dog"]);

    let union: Vec<&str> = animal.fields.iter().map(|f| f.wire_name.as_str()).collect();
    assert_eq!(union, ["kind", "name", "lives", "barkVolume"]);
    assert!(animal.fields.iter().all(|f| !f.required));

    let cat = &poly.variants[0].model;
    assert!(cat.field("lives").unwrap().required);
    assert!(cat.field("name").unwrap().required);

    let dog = &poly.variants[1].model;
    let bark = dog.field("barkVolume").unwrap();
    assert_eq!(bark.field_type, IrType::Double);
    assert!(bark.nullable);
}

#[test]
fn inline_variants_are_named_after_the_parent() {
    let model = convert(POLYMORPHIC);
    let shape = model.model("Shape").unwrap();
    let ModelKind::Polymorphic(poly) = &shape.kind else {
        panic!("Shape should be polymorphic");
    };
    assert_eq!(poly.composition, Composition::AnyOf);
    assert_eq!(poly.discriminator, None);
    let names: Vec<&str> = shape.subtypes().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["ShapeOption1", "ShapeOption2"]);
    assert_eq!(shape.fields.len(), 3);
}

#[test]
fn cycles_and_aliases() {
    let model = convert(POLYMORPHIC);

    let node = model.model("Node").unwrap();
    assert_eq!(
        node.field("children").unwrap().field_type,
        IrType::list_of(IrType::Ref("Node".into()))
    );

    let looped = model.model("Loop").expect("cyclic allOf still converts");
    assert_eq!(looped.fields.len(), 1);
    assert_eq!(looped.fields[0].wire_name, "id");

    assert_eq!(
        model.alias("Tags").unwrap().target,
        IrType::list_of(IrType::String)
    );
    assert_eq!(
        model.alias("MaybeCat").unwrap().target,
        IrType::Ref("Cat".into())
    );
}

#[test]
fn polymorphic_operations() {
    let model = convert(POLYMORPHIC);
    let get = model.method("GetAnimals").unwrap();
    assert_eq!(get.response_type, IrType::list_of(IrType::Ref("Animal".into())));

    let add = model.method("AddAnimal").unwrap();
    assert_eq!(add.response_type, IrType::Any, "204 without body falls back");
    let body = add.request_body.as_ref().unwrap();
    assert!(!body.required);
}

#[test]
fn empty_document_converts_to_empty_model() {
    let doc = Document::default();
    let model = transform::convert(&doc, &GeneratorConfig::default()).unwrap();
    assert!(model.methods.is_empty());
    assert!(model.models.is_empty());
    assert!(model.aliases.is_empty());
    assert_eq!(model.client_name, "ApiClient");
}

#[test]
fn array_of_ref_and_undefined_ref() {
    let doc = doc_from(serde_json::json!({
        "openapi": "3.0.0",
        "info": {"title": "T"},
        "paths": {},
        "components": {"schemas": {
            "Owner": {
                "type": "object",
                "properties": {
                    "pets": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}},
                    "ghost": {"$ref": "#/components/schemas/missing_thing"}
                }
            }
        }}
    }));
    let model = transform::convert(&doc, &GeneratorConfig::default()).unwrap();
    let owner = model.model("Owner").unwrap();
    assert_eq!(
        owner.field("pets").unwrap().field_type,
        IrType::list_of(IrType::Ref("Pet".into()))
    );
    assert_eq!(
        owner.field("ghost").unwrap().field_type,
        IrType::Ref("MissingThing".into())
    );
}

#[test]
fn all_of_later_declaration_wins() {
    let doc = doc_from(serde_json::json!({
        "openapi": "3.0.0",
        "info": {"title": "T"},
        "paths": {},
        "components": {"schemas": {
            "Both": {"allOf": [
                {"type": "object", "required": ["x"], "properties": {"x": {"type": "string"}, "y": {"type": "string"}}},
                {"type": "object", "required": [], "properties": {"x": {"type": "integer"}}}
            ]},
            "OnlyFirst": {"allOf": [
                {"type": "object", "required": ["x"], "properties": {"x": {"type": "string"}}},
                {"type": "object", "properties": {"z": {"type": "string"}}}
            ]}
        }}
    }));
    let model = transform::convert(&doc, &GeneratorConfig::default()).unwrap();

    let both = model.model("Both").unwrap();
    let order: Vec<&str> = both.fields.iter().map(|f| f.wire_name.as_str()).collect();
    assert_eq!(order, ["x", "y"], "merged field keeps its first position");
    let x = both.field("x").unwrap();
    assert!(!x.required);
    assert_eq!(x.field_type, IrType::Int32);

    let only_first = model.model("OnlyFirst").unwrap();
    assert!(only_first.field("x").unwrap().required);
}

#[test]
fn path_parameters_are_overridden_by_operation() {
    let doc = doc_from(serde_json::json!({
        "openapi": "3.0.0",
        "info": {"title": "T"},
        "paths": {"/things/{id}": {
            "parameters": [
                {"name": "id", "in": "path", "schema": {"type": "string"}},
                {"name": "trace", "in": "header", "schema": {"type": "string"}}
            ],
            "delete": {
                "parameters": [
                    {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}},
                    {"name": "session", "in": "cookie", "schema": {"type": "string"}}
                ],
                "responses": {"204": {"description": "gone"}}
            }
        }}
    }));
    let model = transform::convert(&doc, &GeneratorConfig::default()).unwrap();
    let delete = model.method("DeleteThings").unwrap();
    let names: Vec<&str> = delete.parameters.iter().map(|p| p.name.original.as_str()).collect();
    assert_eq!(names, ["id", "trace"]);
    assert_eq!(delete.parameters[0].param_type, IrType::Int32);
}

#[test]
fn response_prefers_first_2xx_with_schema() {
    let doc = doc_from(serde_json::json!({
        "openapi": "3.0.0",
        "info": {"title": "T"},
        "paths": {"/r": {"get": {
            "responses": {
                "default": {"description": "x", "content": {"application/json": {"schema": {"type": "boolean"}}}},
                "202": {"description": "accepted"},
                "200": {"description": "ok", "content": {
                    "text/plain": {"schema": {"type": "string"}},
                    "application/json": {"schema": {"type": "integer", "format": "int64"}}
                }}
            }
        }}}
    }));
    let model = transform::convert(&doc, &GeneratorConfig::default()).unwrap();
    assert_eq!(model.methods[0].response_type, IrType::Int64);
}

#[test]
fn invalid_configuration_is_rejected_before_conversion() {
    let doc = parse::parse(PETSTORE.as_bytes()).unwrap();
    let config = GeneratorConfig::default().with_authentication(AuthenticationConfig {
        kind: AuthKind::ApiKey,
        location: AuthLocation::None,
        name: String::new(),
    });
    match transform::convert(&doc, &config) {
        Err(ConfigError::Invalid(rules)) => assert_eq!(rules.len(), 2),
        other => panic!("expected invalid config, got {other:?}"),
    }
}

#[test]
fn authentication_is_carried_through() {
    let doc = parse::parse(PETSTORE.as_bytes()).unwrap();
    let config = GeneratorConfig::new("  Acme  ", "PetClient").with_authentication(
        AuthenticationConfig::api_key(AuthLocation::Header, " X-Api-Key "),
    );
    let model = transform::convert(&doc, &config).unwrap();
    assert_eq!(model.namespace, "Acme");
    assert_eq!(model.authentication.kind, AuthKind::ApiKey);
    assert_eq!(model.authentication.location, AuthLocation::Header);
    assert_eq!(model.authentication.name, "X-Api-Key");
}

#[test]
fn code_model_serializes() {
    let model = convert(PETSTORE);
    let value = serde_json::to_value(&model).expect("code model should serialize");
    let methods: IndexMap<String, serde_json::Value> = value["methods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| (m["name"].as_str().unwrap().to_string(), m.clone()))
        .collect();
    assert_eq!(methods.len(), 3);
    assert_eq!(methods["ListPets"]["http_method"], "Get");
}

#[test]
fn document_order_is_kept_through_parsing() {
    let input = r#"{
        "openapi": "3.0.0",
        "info": {"title": "Ordered"},
        "paths": {
            "/z": {"get": {"responses": {
                "201": {"description": "created", "content": {"application/json": {"schema": {"type": "boolean"}}}},
                "200": {"description": "ok", "content": {"application/json": {"schema": {"type": "string"}}}}
            }}},
            "/a": {"get": {"responses": {"200": {"description": "ok"}}}}
        },
        "components": {"schemas": {
            "Zebra": {"type": "object", "properties": {"stripes": {"type": "integer"}, "age": {"type": "integer"}}},
            "Ant": {"type": "object", "properties": {"legs": {"type": "integer"}}}
        }}
    }"#;
    let model = convert(input);

    let methods: Vec<&str> = model.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, ["GetZ", "GetA"]);
    assert_eq!(model.methods[0].response_type, IrType::Boolean);

    let models: Vec<&str> = model.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(models, ["Zebra", "Ant"]);
    let fields: Vec<&str> = model.models[0]
        .fields
        .iter()
        .map(|f| f.wire_name.as_str())
        .collect();
    assert_eq!(fields, ["stripes", "age"]);
}

#[test]
fn single_inline_composite_child_keeps_its_model() {
    let doc = doc_from(serde_json::json!({
        "openapi": "3.0.0",
        "info": {"title": "T"},
        "paths": {},
        "components": {"schemas": {
            "Pet": {"type": "object", "properties": {"id": {"type": "integer"}}},
            "Wrapped": {"allOf": [{"properties": {"a": {"type": "string"}}}]},
            "Single": {"oneOf": [{"properties": {"b": {"type": "boolean"}}}]},
            "PetRef": {"allOf": [{"$ref": "#/components/schemas/Pet"}]}
        }}
    }));
    let model = transform::convert(&doc, &GeneratorConfig::default()).unwrap();

    let wrapped = model.model("Wrapped").expect("allOf with one inline object is a model");
    assert_eq!(wrapped.kind, ModelKind::Object);
    assert_eq!(wrapped.field("a").unwrap().field_type, IrType::String);

    let single = model.model("Single").expect("oneOf with one inline object is a model");
    let ModelKind::Polymorphic(poly) = &single.kind else {
        panic!("expected Single to be polymorphic");
    };
    assert_eq!(poly.composition, Composition::OneOf);
    assert_eq!(poly.variants.len(), 1);
    assert_eq!(poly.variants[0].model.name, "SingleOption1");
    assert!(single.field("b").is_some_and(|f| !f.required));

    let alias = model.alias("PetRef").expect("a lone $ref stays an alias");
    assert_eq!(alias.target, IrType::Ref("Pet".into()));
}

#[test]
fn composite_keywords_resolve_in_fixed_order() {
    let doc = doc_from(serde_json::json!({
        "openapi": "3.0.0",
        "info": {"title": "T"},
        "paths": {},
        "components": {"schemas": {
            "Cat": {"type": "object", "properties": {"purrs": {"type": "boolean"}}},
            "Dog": {"type": "object", "properties": {"barks": {"type": "boolean"}}},
            "Base": {"type": "object", "properties": {"id": {"type": "integer"}}},
            "OneAndAll": {
                "allOf": [{"$ref": "#/components/schemas/Base"}],
                "oneOf": [{"$ref": "#/components/schemas/Cat"}, {"$ref": "#/components/schemas/Dog"}]
            },
            "AnyAndAll": {
                "allOf": [{"$ref": "#/components/schemas/Base"}],
                "anyOf": [{"$ref": "#/components/schemas/Cat"}, {"$ref": "#/components/schemas/Dog"}]
            },
            "OneAndAny": {
                "anyOf": [{"$ref": "#/components/schemas/Dog"}],
                "oneOf": [{"$ref": "#/components/schemas/Cat"}]
            }
        }}
    }));
    let model = transform::convert(&doc, &GeneratorConfig::default()).unwrap();

    let composition = |name: &str| match &model.model(name).unwrap().kind {
        ModelKind::Polymorphic(poly) => poly.composition,
        ModelKind::Object => panic!("{name} should be polymorphic"),
    };
    assert_eq!(composition("OneAndAll"), Composition::OneOf);
    assert_eq!(composition("AnyAndAll"), Composition::AnyOf);
    assert_eq!(composition("OneAndAny"), Composition::OneOf);

    let variants: Vec<&str> = model
        .model("OneAndAny")
        .unwrap()
        .subtypes()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(variants, ["Cat"]);
}
