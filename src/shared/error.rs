// src/shared/error.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use super::shared_structs::GenericResponse;

pub type Resultado<T> = std::result::Result<T, ErrorApp>;

/// Errores que pueden devolver los manejadores y los almacenes.
#[derive(Error, Debug)]
pub enum ErrorApp {
    #[error("{0}")]
    Validacion(String),

    #[error("{0}")]
    NoAutorizado(String),

    #[error("{0}")]
    Prohibido(String),

    #[error("{0}")]
    NoEncontrado(String),

    #[error("{0}")]
    Conflicto(String),

    #[error("Error de base de datos: {0}")]
    BaseDatos(#[from] sqlx::Error),

    #[error("Error de migración: {0}")]
    Migracion(#[from] sqlx::migrate::MigrateError),

    #[error("Error de archivo: {0}")]
    Archivo(#[from] std::io::Error),

    #[error("Error de CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error al firmar el token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Error de hash de contraseña: {0}")]
    Clave(#[from] bcrypt::BcryptError),

    #[error("Error de almacén: {0}")]
    Almacen(String),

    #[error("Error de exportación: {0}")]
    Exportacion(String),
}

impl ErrorApp {
    pub fn no_encontrada(id: i64) -> Self {
        ErrorApp::NoEncontrado(format!("Venta con ID {} no encontrada.", id))
    }
}

impl ResponseError for ErrorApp {
    fn status_code(&self) -> StatusCode {
        match self {
            ErrorApp::Validacion(_) => StatusCode::BAD_REQUEST,
            ErrorApp::NoAutorizado(_) => StatusCode::UNAUTHORIZED,
            ErrorApp::Prohibido(_) => StatusCode::FORBIDDEN,
            ErrorApp::NoEncontrado(_) => StatusCode::NOT_FOUND,
            ErrorApp::Conflicto(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Los errores internos se registran completos pero no se exponen al cliente
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "error interno");
            "Error interno del servidor.".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(GenericResponse::error(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapea_codigos_http() {
        assert_eq!(ErrorApp::Validacion("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorApp::no_encontrada(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorApp::Almacen("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn fallas_de_token_y_de_hash_son_internas() {
        let token: ErrorApp =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat)
                .into();
        assert!(matches!(token, ErrorApp::Token(_)));
        assert_eq!(token.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(token.to_string().starts_with("Error al firmar el token"));

        let clave: ErrorApp = bcrypt::verify("x", "no-es-un-hash").unwrap_err().into();
        assert!(matches!(clave, ErrorApp::Clave(_)));
        assert_eq!(clave.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn mensaje_de_no_encontrada_incluye_id() {
        assert_eq!(ErrorApp::no_encontrada(7).to_string(), "Venta con ID 7 no encontrada.");
    }
}
