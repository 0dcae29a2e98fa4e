//! Sample API rendered by the binary.

use apidoc::{typed, ApiDocument, BuilderOptions, ResponseOptions, Schema, StatusCode};
use runtime::DocumentConfig;
use serde_json::json;

/// A pet in the store.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub tag: Option<String>,
}

/// One page of pets.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct PetPage {
    pub pets: Vec<Pet>,
    pub next: Option<String>,
}

fn error_schema() -> Schema {
    Schema::object([
        ("code", Schema::integer().format("int32")),
        ("message", Schema::string()),
    ])
    .shared("Error")
}

fn new_pet_schema() -> Schema {
    Schema::object([
        ("name", Schema::string().example("Rex")),
        ("tag", Schema::string().optional().nullable()),
    ])
    .shared("NewPet")
}

fn pet_id_params() -> Schema {
    Schema::object([("petId", Schema::integer().format("int64"))])
}

/// Declare the pet-store routes on a fresh document.
pub fn declare(doc: &DocumentConfig, options: BuilderOptions) -> ApiDocument {
    let mut api = ApiDocument::with_options(&doc.openapi, doc.info(), options);

    api.get("/pets")
        .summary("List all pets")
        .operation_id("listPets")
        .query(Schema::object([
            (
                "limit",
                Schema::integer()
                    .optional()
                    .description("How many items to return at one time (max 100)"),
            ),
            ("cursor", Schema::string().optional()),
        ]))
        .responds_with(
            StatusCode::OK,
            typed::<PetPage>(),
            ResponseOptions::with_description("A paged array of pets"),
        )
        .responds_with(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_schema(),
            ResponseOptions::with_description("unexpected error"),
        )
        .with_tags(["pets"]);

    api.post("/pets")
        .summary("Create a pet")
        .operation_id("createPet")
        .headers(Schema::object([(
            "x-request-id",
            Schema::string().format("uuid").optional(),
        )]))
        .body(new_pet_schema())
        .responds_with(
            StatusCode::CREATED,
            typed::<Pet>(),
            ResponseOptions::with_description("Created"),
        )
        .responds_with(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_schema(),
            ResponseOptions::with_description("Invalid pet"),
        )
        .with_tags(["pets"]);

    api.get("/pets/{petId}")
        .summary("Info for a specific pet")
        .operation_id("showPetById")
        .path_params(pet_id_params())
        .responds_with(
            StatusCode::OK,
            typed::<Pet>(),
            ResponseOptions::with_description("Expected response to a valid request"),
        )
        .responds_with(
            StatusCode::NOT_FOUND,
            error_schema(),
            ResponseOptions::with_description("Pet not found"),
        )
        .with_tags(["pets"]);

    api.delete("/pets/{petId}")
        .summary("Remove a pet")
        .operation_id("deletePet")
        .path_params(pet_id_params())
        .cookies(Schema::object([("session", Schema::string())]))
        .responds_with(
            StatusCode::NO_CONTENT,
            Schema::any(),
            ResponseOptions::with_description("Removed"),
        )
        .with_tags(["pets"]);

    api.get("/health")
        .summary("Liveness probe")
        .responds(
            StatusCode::OK,
            json!({
                "type": "object",
                "properties": { "status": { "type": "string", "enum": ["ok"] } },
                "required": ["status"]
            }),
        )
        .deprecated();

    api
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidoc::Method;

    #[test]
    fn sample_api_compiles() {
        let api = declare(&DocumentConfig::default(), BuilderOptions::default());
        let doc = api.document().unwrap();

        assert_eq!(doc.paths.len(), 3);
        assert!(doc.operation("/pets", Method::Get).is_some());
        assert!(doc.operation("/pets", Method::Post).is_some());
        assert!(doc.operation("/pets/{petId}", Method::Delete).is_some());
        for name in ["Error", "NewPet", "Pet", "PetPage"] {
            assert!(doc.component_schema(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn path_parameter_is_required() {
        let api = declare(&DocumentConfig::default(), BuilderOptions::default());
        let doc = api.document().unwrap();

        let op = doc.operation("/pets/{petId}", Method::Get).unwrap();
        let params = op.parameters.as_ref().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "petId");
        assert!(params[0].required);
    }
}
