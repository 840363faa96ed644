use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimal acknowledgment body with no request-specific content.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenericResponse {
    #[schema(example = "User saved")]
    pub message: String,
}

impl GenericResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
