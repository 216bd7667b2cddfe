use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::Envelope;

pub const MISSING_FIELDS: &str = "Faltan campos clave (imdbID, Title, Year)";
pub const MISSING_KEY: &str = "Falta parámetro 'imdbID' en QueryString";
pub const NOT_FOUND: &str = "Registro no encontrado";
pub const STORE_ERROR_HIDDEN: &str = "Error al procesar la solicitud en la base de datos";

/// Every failure a handler can produce. Each one renders as an [`Envelope`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", MISSING_FIELDS)]
    MissingFields,

    #[error("{}", MISSING_KEY)]
    MissingKey,

    #[error("{0}")]
    InvalidBody(String),

    #[error("{}", NOT_FOUND)]
    NotFound,

    /// A store or connection failure, already reduced to what the client may see.
    #[error("{message}")]
    Store { status: StatusCode, message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::MissingKey | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            },
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store { status, .. } => *status,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        Envelope::respond(self.status(), self.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
