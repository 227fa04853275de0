use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

#[derive(Debug, Clone)]
pub enum LeadsError {
    DatabaseConnection,
    MissingLeadId,
    InvalidLeadId(String),
    EmptyNote,
    StoreFailed(String),
    DecodeFailed(String),
}

impl std::fmt::Display for LeadsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseConnection => write!(f, "Database connection failed"),
            Self::MissingLeadId => write!(f, "Lead ID is required"),
            Self::InvalidLeadId(id) => write!(f, "Invalid lead ID: {id}"),
            Self::EmptyNote => write!(f, "Note text is required"),
            Self::StoreFailed(msg) => write!(f, "{msg}"),
            Self::DecodeFailed(msg) => write!(f, "Malformed record from store: {msg}"),
        }
    }
}

impl std::error::Error for LeadsError {}

impl IntoResponse for LeadsError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            Self::MissingLeadId | Self::InvalidLeadId(_) | Self::EmptyNote => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Error responses always carry an empty data array so callers can
        // treat the body shape uniformly.
        let body = Json(json!({ "error": self.to_string(), "data": [] }));
        (status, body).into_response()
    }
}
