//! End-to-end document compilation tests.
//!
//! These drive the public builder API and inspect the final document, both
//! through the typed model and through its JSON rendering.

use apidoc::{typed, ApiDocument, Info, Method, ResponseOptions, Schema, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

fn my_api() -> ApiDocument {
    ApiDocument::new(
        "3.0.0",
        Info::new("My API", "1.0.0", "My API description"),
    )
}

#[test]
fn info_and_version_are_set() {
    let doc = my_api().document().unwrap();

    assert_eq!(doc.openapi, "3.0.0");
    assert_eq!(
        serde_json::to_value(&doc.info).unwrap(),
        json!({
            "title": "My API",
            "version": "1.0.0",
            "description": "My API description"
        })
    );
    assert!(doc.paths.is_empty());
    assert!(doc.components.is_none());
}

#[test]
fn get_with_query_response_and_tags() {
    let mut api = my_api();
    api.get("/test")
        .query(Schema::object([("id", Schema::string())]))
        .responds(StatusCode::CREATED, Schema::object([("amount", Schema::number())]))
        .with_tags(["test"]);

    let doc = api.document().unwrap();
    let op = doc.operation("/test", Method::Get).expect("GET /test");

    assert_eq!(op.tags, Some(vec!["test".to_string()]));
    assert_eq!(
        serde_json::to_value(&op.parameters).unwrap(),
        json!([{
            "in": "query",
            "name": "id",
            "required": true,
            "schema": { "type": "string" }
        }])
    );
    assert_eq!(op.responses["201"].description, "");
}

#[test]
fn second_response_code_is_independent() {
    let mut api = my_api();
    api.get("/test")
        .query(Schema::object([("id", Schema::string())]))
        .responds(StatusCode::CREATED, Schema::object([("amount", Schema::number())]))
        .responds(StatusCode::BAD_REQUEST, Schema::object([("error", Schema::string())]))
        .with_tags(["test"]);

    let doc = api.document().unwrap();
    let json = doc.to_json().unwrap();
    let responses = &json["paths"]["/test"]["get"]["responses"];

    assert_eq!(
        responses["201"],
        json!({
            "description": "",
            "content": {
                "application/json": {
                    "schema": {
                        "type": "object",
                        "properties": { "amount": { "type": "number" } },
                        "required": ["amount"]
                    }
                }
            }
        })
    );
    assert_eq!(
        responses["400"],
        json!({
            "description": "",
            "content": {
                "application/json": {
                    "schema": {
                        "type": "object",
                        "properties": { "error": { "type": "string" } },
                        "required": ["error"]
                    }
                }
            }
        })
    );
}

#[test]
fn shared_schema_is_emitted_once_and_referenced() {
    let test200 = Schema::object([("amount", Schema::number())]).shared("Test200");

    let mut api = my_api();
    api.get("/test").responds(StatusCode::OK, test200.clone());
    api.get("/test2").responds(StatusCode::OK, test200);

    let json = api.document().unwrap().to_json().unwrap();
    let reference = json!({ "$ref": "#/components/schemas/Test200" });

    assert_eq!(
        json["paths"]["/test"]["get"]["responses"]["200"]["content"]["application/json"]["schema"],
        reference
    );
    assert_eq!(
        json["paths"]["/test2"]["get"]["responses"]["200"]["content"]["application/json"]["schema"],
        reference
    );
    assert_eq!(
        json["components"]["schemas"],
        json!({
            "Test200": {
                "type": "object",
                "properties": { "amount": { "type": "number" } },
                "required": ["amount"]
            }
        })
    );
}

#[test]
fn unregistered_routes_are_absent() {
    let mut api = my_api();
    api.get("/only-get");

    let doc = api.document().unwrap();
    assert!(doc.paths.get("/missing").is_none());
    for method in Method::ALL.into_iter().filter(|m| *m != Method::Get) {
        assert!(doc.operation("/only-get", method).is_none(), "{method} leaked");
    }
}

#[test]
fn operation_without_responses_has_empty_responses() {
    let mut api = my_api();
    api.delete("/thing");

    let json = api.document().unwrap().to_json().unwrap();
    assert_eq!(json["paths"]["/thing"]["delete"], json!({ "responses": {} }));
}

#[test]
fn methods_on_same_path_share_one_entry() {
    let mut api = my_api();
    api.get("/pets")
        .responds(StatusCode::OK, Schema::array(Schema::string()));
    api.post("/pets")
        .body(Schema::object([("name", Schema::string())]))
        .responds_with(
            StatusCode::CREATED,
            Schema::string(),
            ResponseOptions::with_description("Created"),
        );

    let json = api.document().unwrap().to_json().unwrap();
    let item = json["paths"]["/pets"].as_object().unwrap();
    let methods: Vec<_> = item.keys().cloned().collect();
    assert_eq!(methods, ["get", "post"]);
    assert_eq!(item["post"]["responses"]["201"]["description"], "Created");
    assert!(item["get"].get("requestBody").is_none());
    assert!(item["post"].get("requestBody").is_some());
}

#[test]
fn empty_tags_are_omitted() {
    let mut api = my_api();
    api.get("/untagged").with_tags(Vec::<String>::new());
    api.get("/tagged").with_tags(["a"]);

    let json = api.document().unwrap().to_json().unwrap();
    assert!(json["paths"]["/untagged"]["get"].get("tags").is_none());
    assert_eq!(json["paths"]["/tagged"]["get"]["tags"], json!(["a"]));
}

#[test]
fn responds_without_options_keeps_earlier_description() {
    let mut api = my_api();
    api.get("/retained")
        .responds_with(
            StatusCode::OK,
            Schema::string(),
            ResponseOptions::with_description("original"),
        )
        .responds(StatusCode::OK, Schema::number());

    let doc = api.document().unwrap();
    let response = &doc.operation("/retained", Method::Get).unwrap().responses["200"];
    assert_eq!(response.description, "original");
    let content = response.content.as_ref().unwrap();
    assert_eq!(content["application/json"].schema, json!({ "type": "number" }));
}

#[test]
fn document_is_recompiled_from_current_state() {
    let mut api = my_api();
    api.get("/first");
    let before = api.document().unwrap();

    api.put("/first");
    api.get("/second");
    let after = api.document().unwrap();

    assert_eq!(before.paths.len(), 1);
    assert!(before.operation("/first", Method::Put).is_none());
    assert_eq!(after.paths.len(), 2);
    assert!(after.operation("/first", Method::Put).is_some());

    // Compiling twice without changes gives the same document.
    assert_eq!(api.document().unwrap(), after);
}

#[test]
fn openapi_31_uses_type_arrays_for_nullable() {
    let mut api = ApiDocument::new("3.1.0", Info::new("t", "1", "d"));
    api.get("/n")
        .responds(StatusCode::OK, Schema::object([("note", Schema::string().nullable())]));

    let json = api.document().unwrap().to_json().unwrap();
    assert_eq!(
        json["paths"]["/n"]["get"]["responses"]["200"]["content"]["application/json"]["schema"]
            ["properties"]["note"],
        json!({ "type": ["string", "null"] })
    );
}

#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
struct Pet {
    name: String,
    tag: Option<String>,
}

#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
struct PetFilter {
    species: String,
    age: Option<i32>,
    breed: Option<String>,
}

#[test]
fn derived_optional_fields_are_nullable_in_30_documents() {
    let mut api = my_api();
    api.get("/pet").responds(StatusCode::OK, typed::<Pet>());

    let doc = api.document().unwrap();
    let tag = &doc.component_schema("Pet").expect("Pet component")["properties"]["tag"];
    assert_eq!(tag["type"], "string");
    assert_eq!(tag["nullable"], true);

    let rendered = doc.to_json_pretty().unwrap();
    assert!(!rendered.contains("\"null\""), "3.0 document contains a null type:\n{rendered}");
}

#[test]
fn derived_parameters_follow_field_order() {
    let mut api = my_api();
    api.get("/pets").query(typed::<PetFilter>());

    let doc = api.document().unwrap();
    let params = doc.operation("/pets", Method::Get).unwrap().parameters.clone().unwrap();
    let summary: Vec<_> = params
        .iter()
        .map(|p| (p.name.as_str(), p.required))
        .collect();
    assert_eq!(summary, [("species", true), ("age", false), ("breed", false)]);
}

#[test]
fn responses_list_numeric_codes_before_families() {
    let mut api = my_api();
    api.get("/codes")
        .responds(StatusCode::try_from("4XX").unwrap(), Schema::string())
        .responds(StatusCode::INTERNAL_SERVER_ERROR, Schema::string())
        .responds(StatusCode::OK, Schema::string());

    let doc = api.document().unwrap();
    let codes: Vec<_> = doc.operation("/codes", Method::Get).unwrap().responses.keys().cloned().collect();
    assert_eq!(codes, ["200", "500", "4XX"]);
}

#[test]
fn yaml_rendering_contains_paths() {
    let mut api = my_api();
    api.get("/yaml").with_tags(["y"]);

    let yaml = api.document().unwrap().to_yaml().unwrap();
    assert!(yaml.starts_with("openapi:"));
    assert!(yaml.contains("3.0.0"));
    assert!(yaml.contains("/yaml"));
    assert!(yaml.contains("responses:"));
}
