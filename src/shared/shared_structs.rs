// src/shared/shared_structs.rs

use serde::Serialize;

/// Estructura genérica para estandarizar las respuestas de la API.
/// 'T' es el tipo del cuerpo de la respuesta, que puede omitirse.
#[derive(Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // No serializa 'body' si es None
    pub body: Option<T>,
}

impl<T> GenericResponse<T> {
    pub fn exito(message: impl Into<String>, body: T) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
        }
    }
}

impl GenericResponse<()> {
    /// Respuesta exitosa sin cuerpo (p. ej. "no hay ventas para cerrar").
    pub fn aviso(message: impl Into<String>) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        GenericResponse {
            status: "error".to_string(),
            message: message.into(),
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omite_body_cuando_no_hay_cuerpo() {
        let json = serde_json::to_value(GenericResponse::error("falló")).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json.get("body").is_none());
    }
}
