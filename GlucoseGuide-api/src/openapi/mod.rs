use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Glucose record endpoints
        crate::api::handlers::glucose::add_glucose_record,
        crate::api::handlers::glucose::get_glucose_records,
        crate::api::handlers::glucose::update_glucose_record,
        crate::api::handlers::glucose::delete_glucose_record,
    ),
    components(
        schemas(
            // Observation documents
            glucose_guide_domain::entities::observation::ObservationDocument,
            glucose_guide_domain::entities::observation::CodeableConcept,
            glucose_guide_domain::entities::observation::Coding,
            glucose_guide_domain::entities::observation::Reference,
            glucose_guide_domain::entities::observation::Quantity,
            glucose_guide_domain::entities::observation::Annotation,

            // Entities
            crate::entities::common::CreatedResponse,
            crate::entities::common::MessageResponse,
            crate::entities::common::ErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "glucose_records", description = "Glucose record endpoints using observation documents")
    ),
    info(
        title = "GlucoseGuide API",
        version = "0.1.0",
        description = "API for recording and retrieving glucose observations",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "GlucoseGuide API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "health"));
        assert!(tags.iter().any(|tag| tag.name == "glucose_records"));

        for path in [
            "/health",
            "/add_glucose_record",
            "/get_glucose_records",
            "/update_glucose_record/{id}",
            "/delete_glucose_record/{id}",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing path {}", path);
        }

        let schemas = &openapi.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("ObservationDocument"));
        assert!(schemas.contains_key("CreatedResponse"));
    }

    #[test]
    fn test_list_limit_is_documented_as_integer() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let parameters = doc["paths"]["/get_glucose_records"]["get"]["parameters"]
            .as_array()
            .unwrap();

        let limit = parameters.iter().find(|p| p["name"] == "limit").unwrap();
        assert_eq!(limit["in"], "query");
        assert_eq!(limit["schema"]["type"], "integer");
    }
}
