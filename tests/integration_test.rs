use openapi_from_comments::{
    config::GeneratorOptions,
    document::{Info, Schema, SpecificationDocument, TagEntry},
    error::{CompileError, Error},
    fragment::yaml_to_json,
    generator::{compile, generate},
    serializer::{serialize_json, serialize_yaml},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn patterns(list: &[&str]) -> Vec<String> {
    list.iter().map(|p| p.to_string()).collect()
}

/// Initial document metadata as a caller would pass it
fn platform_definition() -> SpecificationDocument {
    serde_json::from_value(json!({
        "info": {"description": "API documentation", "title": "Platform", "version": "1.0.0"},
        "host": "localhost",
        "basePath": "/",
        "produces": ["application/json"],
        "schemes": ["http", "https"],
        "securityDefinitions": {
            "SessionIdAuth": {"type": "apiKey", "in": "header", "name": "x-session-id"}
        }
    }))
    .expect("valid swagger definition")
}

fn full_project() -> TempDir {
    create_test_project(vec![
        ("app/hello_app.js", include_str!("fixtures/hello_app.js")),
        ("app/models.js", include_str!("fixtures/models.js")),
        ("app/routes/pets.ts", include_str!("fixtures/pets.ts")),
        ("docs/api.yaml", include_str!("fixtures/api.yaml")),
        ("node_modules/dep/index.js", "/**\n * @route GET /never\n */"),
    ])
}

#[test]
fn test_hello_route_end_to_end() {
    let temp_dir = full_project();
    let doc = compile(
        temp_dir.path(),
        &patterns(&["app/*.js"]),
        platform_definition(),
    )
    .expect("Failed to compile project");

    // Caller metadata survives and the version is forced
    assert_eq!(doc.swagger, "2.0");
    assert_eq!(doc.host.as_deref(), Some("localhost"));
    assert_eq!(doc.produces, vec!["application/json"]);
    assert!(doc.security_definitions.contains_key("SessionIdAuth"));

    let operation = doc.operation("/hello/", "post").expect("POST /hello/ documented");
    assert_eq!(operation.tags, vec!["hello"]);
    assert_eq!(
        operation.description.as_deref(),
        Some("This route will respond greetings to name in json request body.")
    );
    assert_eq!(operation.produces, Some(vec!["application/json".to_string()]));
    assert_eq!(operation.consumes, Some(vec!["application/json".to_string()]));

    let body = &operation.params()[0];
    assert_eq!(body.name, "name");
    assert_eq!(body.location, "body");
    assert!(body.is_required());
    assert_eq!(body.schema, Some(Schema::definition("ReqNameJSON")));

    assert_eq!(operation.responses.keys().collect::<Vec<_>>(), vec!["200", "default"]);
    let ok = &operation.responses["200"];
    assert_eq!(ok.description.as_deref(), Some("An object with the key 'msg'"));
    let headers = ok.headers.as_ref().expect("headers attached to 200");
    assert_eq!(headers["X-Rate-Limit"].header_type, "integer");
    assert_eq!(
        headers["X-Expires-After"].description.as_deref(),
        Some("date in UTC when token expires")
    );
    assert_eq!(operation.responses["default"].headers, None);

    assert_eq!(doc.tags, vec![TagEntry::new("hello", "Test Demo")]);
    assert!(doc.operation("/", "get").is_none());
}

#[test]
fn test_typedefs_end_to_end() {
    let temp_dir = full_project();
    let doc = compile(temp_dir.path(), &patterns(&["app/models.js"]), platform_definition())
        .expect("Failed to compile models");

    assert_eq!(
        doc.definitions.keys().collect::<Vec<_>>(),
        vec!["Product", "Point", "Color", "Pet"]
    );

    let product = &doc.definitions["Product"];
    assert_eq!(product.required, Some(vec!["name".to_string()]));
    let product_properties = product.properties.as_ref().expect("properties always present");
    assert_eq!(
        serde_json::to_value(&product_properties["Point"]).unwrap(),
        json!({"type": "array", "items": {"$ref": "#/definitions/Point"}})
    );

    let point = serde_json::to_value(&doc.definitions["Point"]).unwrap();
    assert_eq!(point["required"], json!(["x", "y"]));
    assert_eq!(point["properties"]["y"]["example"], json!(1234));
    assert_eq!(point["properties"]["y"]["description"], "Some description for point ");

    let pet = serde_json::to_value(&doc.definitions["Pet"]).unwrap();
    assert_eq!(pet["properties"]["id"]["readOnly"], json!(true));
    assert_eq!(
        pet["properties"]["status"],
        json!({
            "type": "string",
            "description": "Pet status in the store ",
            "enum": ["available", "pending", "sold"]
        })
    );
    assert_eq!(pet["properties"]["vaccinated"]["example"], json!(true));
    assert!(pet.get("required").is_none());

    let color = serde_json::to_value(&doc.definitions["Color"]).unwrap();
    assert_eq!(color["properties"]["blue"]["type"], "string");
}

#[test]
fn test_multiple_routes_per_block() {
    let temp_dir = full_project();
    let doc = compile(temp_dir.path(), &patterns(&["app/**/*.ts"]), SpecificationDocument::default())
        .expect("Failed to compile routes");

    let list = doc.operation("/pets", "get").unwrap();
    assert_eq!(list.operation_id.as_deref(), Some("listPets"));
    assert_eq!(list.summary.as_deref(), Some("List all pets"));
    assert_eq!(list.security, Some(json!([{"JWT": []}])));
    assert_eq!(list.params()[0].param_type.as_deref(), Some("string"));
    assert_eq!(list.params()[0].enum_values, Some(vec![json!("available")]));
    assert_eq!(list.params()[1].location, "query");

    let show = doc.operation("/pets/{petId}", "get").unwrap();
    let delete = doc.operation("/pets/{petId}", "delete").unwrap();

    // Both routes share parameters and responses; metadata binds to the latest route
    assert_eq!(show.parameters, delete.parameters);
    assert_eq!(show.responses, delete.responses);
    assert_eq!(show.responses["404"].description.as_deref(), Some("Pet not found"));
    assert_eq!(show.responses["200"].schema, Some(Schema::definition("Pet")));
    assert!(!show.deprecated);
    assert!(delete.deprecated);
    assert_eq!(show.security, None);
    assert_eq!(delete.security, Some(json!([{"ApiKey": []}])));

    assert_eq!(
        doc.tags,
        vec![TagEntry::new("pets", "Everything about your pets")]
    );
}

#[test]
fn test_generate_with_fragment_files() {
    let temp_dir = full_project();
    let options = GeneratorOptions {
        basedir: Some(temp_dir.path().to_path_buf()),
        files: Some(patterns(&["app/**/*.{js,ts}", "**/*.js"])),
        fragments: patterns(&["docs/*.yaml"]),
        swagger_definition: Some(platform_definition()),
    }
    .validate()
    .unwrap();

    let doc = generate(options).expect("Failed to generate");

    // Comment sources and fragment paths coexist
    assert!(doc.operation("/hello/", "post").is_some());
    assert!(doc.operation("/pets", "get").is_some());
    assert_eq!(
        doc.operation("/store/inventory", "get").unwrap().summary.as_deref(),
        Some("Returns pet inventories by status")
    );
    assert!(doc.operation("/never", "get").is_none());

    // Tags from comments win over the fragment file
    let tags: Vec<_> = doc
        .tags
        .iter()
        .map(|t| (t.name.as_str(), t.description.as_deref()))
        .collect();
    assert_eq!(
        tags,
        vec![
            ("hello", Some("Test Demo")),
            ("pets", Some("Everything about your pets")),
            ("store", Some("Access to Petstore orders")),
        ]
    );

    assert_eq!(doc.responses["404"], json!({"description": "Not found"}));
    assert!(doc.security_definitions.contains_key("SessionIdAuth"));
    assert!(doc.security_definitions.contains_key("JWT"));
    assert!(doc.definitions.contains_key("Order"));
    assert!(doc.definitions.contains_key("Product"));
}

#[test]
fn test_fragment_subtrees_are_merged_unchanged() {
    let temp_dir = full_project();
    let options = GeneratorOptions {
        basedir: Some(temp_dir.path().to_path_buf()),
        files: Some(patterns(&["app/models.js"])),
        fragments: patterns(&["docs/api.yaml"]),
        swagger_definition: Some(SpecificationDocument::default()),
    }
    .validate()
    .unwrap();
    let doc = generate(options).expect("Failed to generate");

    let fixture: serde_yaml::Value =
        serde_yaml::from_str(include_str!("fixtures/api.yaml")).unwrap();
    let fixture = yaml_to_json(fixture);
    let merged = serde_json::to_value(&doc).unwrap();

    // Integer enums, nested properties, `$ref` siblings and vendor keys
    assert_eq!(merged["definitions"]["Order"], fixture["definitions"]["Order"]);
    // Shared path parameters, a `$ref` parameter and a `$ref` response
    assert_eq!(
        merged["paths"]["/store/order/{orderId}"],
        fixture["paths"]["/store/order/{orderId}"]
    );
    // A query parameter with `items`
    assert_eq!(
        merged["paths"]["/store/inventory"],
        fixture["paths"]["/store/inventory"]
    );
    assert_eq!(merged["parameters"]["tenant"], fixture["parameters"]["tenant"]);
    assert_eq!(merged["tags"][1], fixture["tag"][1]);
    assert_eq!(doc.tags[1].extensions["externalDocs"]["url"], "https://example.com/store");

    let inventory = doc.operation("/store/inventory", "get").unwrap();
    assert_eq!(
        inventory.params()[0].items.as_ref().and_then(|i| i.enum_values.clone()),
        Some(vec![json!(1), json!(2), json!(3)])
    );
    let order = &doc.paths["/store/order/{orderId}"];
    assert_eq!(order.extensions["x-rate-limited"], json!(true));
    assert_eq!(
        order.parameters.as_ref().unwrap()[0].reference.as_deref(),
        Some("#/parameters/tenant")
    );
}

#[test]
fn test_compile_error_aborts_run() {
    let temp_dir = create_test_project(vec![
        ("ok.js", "/**\n * @route GET /ok\n */"),
        ("broken.js", "/**\n * A model without a name\n * @typedef\n */"),
    ]);

    let err = compile(temp_dir.path(), &patterns(&["*.js"]), SpecificationDocument::default())
        .unwrap_err();

    match err {
        Error::Compile {
            file,
            comment,
            source,
        } => {
            assert!(file.ends_with("broken.js"));
            assert_eq!(comment, "A model without a name");
            assert_eq!(source, CompileError::MissingTypedefName);
        }
        other => panic!("expected compile error, got {other:?}"),
    }
}

#[test]
fn test_later_file_merges_into_operation() {
    let temp_dir = create_test_project(vec![
        ("a.js", "/**\n * @route GET /a\n * @operationId listA\n * @summary first\n */"),
        ("b.js", "/**\n * @route GET /a\n * @summary second\n * @route POST /a\n */"),
    ]);

    let doc = compile(temp_dir.path(), &patterns(&["*.js"]), SpecificationDocument::default())
        .unwrap();

    assert_eq!(doc.paths.len(), 1);
    assert_eq!(doc.paths["/a"].operations.keys().collect::<Vec<_>>(), vec!["get", "post"]);
    let get = doc.operation("/a", "get").unwrap();
    assert_eq!(get.summary.as_deref(), Some("second"));
    assert_eq!(get.operation_id.as_deref(), Some("listA"));
}

#[test]
fn test_serialized_outputs() {
    let temp_dir = full_project();
    let doc = compile(
        temp_dir.path(),
        &patterns(&["app/hello_app.js"]),
        SpecificationDocument::new(Info::new("Platform", "1.0.0")),
    )
    .unwrap();

    let json: serde_json::Value = serde_json::from_str(&serialize_json(&doc).unwrap()).unwrap();
    assert_eq!(json["swagger"], "2.0");
    assert_eq!(
        json["paths"]["/hello/"]["post"]["parameters"][0],
        json!({
            "name": "name",
            "in": "body",
            "description": "username or email",
            "required": true,
            "schema": {"$ref": "#/definitions/ReqNameJSON"}
        })
    );
    assert_eq!(
        json["definitions"]["ReqNameJSON"]["properties"]["name"],
        json!({
            "type": "string",
            "description": "name of person making request ",
            "example": "John Doe"
        })
    );

    let yaml = serialize_yaml(&doc).unwrap();
    let reparsed: SpecificationDocument = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(reparsed, doc);
}
