// src/usuarios/auth_middleware.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::usuario_structs::{Claims, Rol, Usuario};
use crate::shared::error::ErrorApp;
use crate::AppState;

/// Operador autenticado de la petición actual, extraído del JWT.
/// Reemplaza cualquier "sesión global": cada manejador lo recibe explícitamente.
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado {
    pub user_id: i64,
    pub user_name: String,
    pub rol: Rol,
}

impl UsuarioAutenticado {
    pub fn es_admin(&self) -> bool {
        self.rol == Rol::Administrador
    }

    pub fn exigir_admin(&self) -> Result<(), ErrorApp> {
        if self.es_admin() {
            Ok(())
        } else {
            Err(ErrorApp::Prohibido(
                "Esta acción requiere rol de administrador.".to_string(),
            ))
        }
    }

    /// `None` para administradores (ven todo); el propio nombre para vendedores.
    pub fn filtro_ventas(&self) -> Option<&str> {
        if self.es_admin() {
            None
        } else {
            Some(self.user_name.as_str())
        }
    }
}

pub fn emitir_token(usuario: &Usuario, secreto: &str, horas: i64) -> Result<String, ErrorApp> {
    let claims = Claims {
        sub: usuario.id,
        name: usuario.nombre.clone(),
        rol: usuario.rol,
        exp: (Utc::now() + Duration::hours(horas)).timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secreto.as_ref()),
    )?;
    Ok(token)
}

pub fn validar_token(token: &str, secreto: &str) -> Result<UsuarioAutenticado, ErrorApp> {
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secreto.as_ref()), &validation)
        .map_err(|e| {
            tracing::debug!(error = ?e, "JWT rechazado");
            let mensaje = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                jsonwebtoken::errors::ErrorKind::InvalidSignature => "Firma del token inválida.",
                jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                _ => "Token de autenticación inválido.",
            };
            ErrorApp::NoAutorizado(mensaje.to_string())
        })?;

    Ok(UsuarioAutenticado {
        user_id: token_data.claims.sub,
        user_name: token_data.claims.name,
        rol: token_data.claims.rol,
    })
}

impl FromRequest for UsuarioAutenticado {
    type Error = ErrorApp;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extraer(req))
    }
}

fn extraer(req: &HttpRequest) -> Result<UsuarioAutenticado, ErrorApp> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState no disponible en el extractor de autenticación");
        ErrorApp::Almacen("Error de configuración del servidor.".to_string())
    })?;

    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| ErrorApp::NoAutorizado("Token de autenticación ausente.".to_string()))?
        .to_str()
        .map_err(|_| ErrorApp::NoAutorizado("Token de autenticación inválido.".to_string()))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        ErrorApp::NoAutorizado("Formato de token inválido. Se esperaba 'Bearer <token>'.".to_string())
    })?;

    validar_token(token, &state.config.jwt_secret)
}
