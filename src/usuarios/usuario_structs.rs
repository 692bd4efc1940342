// src/usuarios/usuario_structs.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::error::ErrorApp;

/// Rol del operador. El administrador ve todas las ventas, cierra caja y
/// registra usuarios; el vendedor solo trabaja con sus propias ventas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Administrador,
    Vendedor,
}

impl Rol {
    pub fn as_str(self) -> &'static str {
        match self {
            Rol::Administrador => "administrador",
            Rol::Vendedor => "vendedor",
        }
    }
}

impl FromStr for Rol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrador" => Ok(Rol::Administrador),
            "vendedor" => Ok(Rol::Vendedor),
            otro => Err(format!("Rol desconocido: {}", otro)),
        }
    }
}

/// Usuario con la contraseña guardada como hash bcrypt.
#[derive(Debug, Clone, Serialize)]
pub struct Usuario {
    pub id: i64,
    pub nombre: String,
    #[serde(skip_serializing)]
    pub clave_hash: String,
    pub rol: Rol,
}

/// Fila de la tabla `usuarios`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UsuarioFila {
    pub id: i64,
    pub nombre: String,
    pub clave_hash: String,
    pub rol: String,
}

impl From<&Usuario> for UsuarioFila {
    fn from(u: &Usuario) -> Self {
        UsuarioFila {
            id: u.id,
            nombre: u.nombre.clone(),
            clave_hash: u.clave_hash.clone(),
            rol: u.rol.as_str().to_string(),
        }
    }
}

impl TryFrom<UsuarioFila> for Usuario {
    type Error = ErrorApp;

    fn try_from(f: UsuarioFila) -> Result<Self, Self::Error> {
        Ok(Usuario {
            id: f.id,
            nombre: f.nombre,
            clave_hash: f.clave_hash,
            rol: f.rol.parse().map_err(ErrorApp::Almacen)?,
        })
    }
}

/// Usuario todavía sin id, con la contraseña ya hasheada.
#[derive(Debug, Clone)]
pub struct UsuarioNuevo {
    pub nombre: String,
    pub clave_hash: String,
    pub rol: Rol,
}

/// Datos para registrar un usuario desde la API.
#[derive(Deserialize)]
pub struct NuevoUsuario {
    pub nombre: String,
    pub clave: String, // Contraseña en texto plano (se hashea antes de guardar)
    pub rol: Rol,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub nombre: String,
    pub clave: String,
}

/// Payload del JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,     // id del usuario
    pub name: String, // nombre de usuario
    pub rol: Rol,
    pub exp: i64, // expiración (timestamp Unix)
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub user_id: i64,
    pub user_name: String,
    pub rol: Rol,
    pub token: String,
}
