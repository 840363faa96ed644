//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{health_handler, user_handler};
use crate::errors::ApiErrorBody;
use crate::types::GenericResponse;

/// OpenAPI documentation for the signup API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Signup API",
        version = "0.1.0",
        description = "User registration with field validation and hashed credentials",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        user_handler::create_user,
        health_handler::health_check,
    ),
    components(
        schemas(
            user_handler::SignupRequest,
            GenericResponse,
            ApiErrorBody,
        )
    ),
    tags(
        (name = "Users", description = "User registration"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
