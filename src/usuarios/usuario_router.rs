// src/usuarios/usuario_router.rs

use actix_web::{post, web, HttpResponse};
use bcrypt::{hash, verify};

use super::auth_middleware::{emitir_token, UsuarioAutenticado};
use super::usuario_structs::{AuthResponse, LoginRequest, NuevoUsuario, UsuarioNuevo};
use crate::shared::error::{ErrorApp, Resultado};
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

fn credenciales_invalidas() -> ErrorApp {
    ErrorApp::NoAutorizado("Credenciales inválidas.".to_string())
}

/// Rota para registrar un nuevo usuario. Solo administradores.
#[post("/usuarios/registro")]
pub async fn registrar_usuario(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    nuevo_usuario: web::Json<NuevoUsuario>,
) -> Resultado<HttpResponse> {
    usuario.exigir_admin()?;
    let nuevo_usuario = nuevo_usuario.into_inner();

    let nombre = nuevo_usuario.nombre.trim().to_string();
    if nombre.is_empty() || nuevo_usuario.clave.is_empty() {
        return Err(ErrorApp::Validacion(
            "El nombre y la contraseña son obligatorios.".to_string(),
        ));
    }

    // 1. Hash de la contraseña
    let clave_hash = hash(&nuevo_usuario.clave, data.config.bcrypt_costo)?;

    // 2. Guardar (el almacén rechaza nombres repetidos)
    let creado = data
        .almacen
        .crear_usuario(UsuarioNuevo {
            nombre,
            clave_hash,
            rol: nuevo_usuario.rol,
        })
        .await?;

    tracing::info!(usuario = %creado.nombre, rol = creado.rol.as_str(), "usuario registrado");

    Ok(HttpResponse::Ok().json(GenericResponse::exito(
        format!("Usuario registrado con éxito. ID: {}", creado.id),
        serde_json::json!({ "id": creado.id }),
    )))
}

/// Rota para login. Devuelve el JWT que identifica al operador en las demás rutas.
#[post("/usuarios/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login_request: web::Json<LoginRequest>,
) -> Resultado<HttpResponse> {
    // 1. Buscar el usuario por nombre
    let usuario = match data.almacen.buscar_usuario(&login_request.nombre).await? {
        Some(u) => u,
        None => {
            tracing::warn!(usuario = %login_request.nombre, "login rechazado: usuario desconocido");
            return Err(credenciales_invalidas());
        }
    };

    // 2. Verificar la contraseña
    let coincide = verify(&login_request.clave, &usuario.clave_hash)?;
    if !coincide {
        tracing::warn!(usuario = %usuario.nombre, "login rechazado: contraseña incorrecta");
        return Err(credenciales_invalidas());
    }

    // 3. Firmar el token
    let token = emitir_token(&usuario, &data.config.jwt_secret, data.config.jwt_horas)?;
    tracing::info!(usuario = %usuario.nombre, rol = usuario.rol.as_str(), "login correcto");

    Ok(HttpResponse::Ok().json(AuthResponse {
        status: "success".to_string(),
        message: "Login correcto.".to_string(),
        user_id: usuario.id,
        user_name: usuario.nombre,
        rol: usuario.rol,
        token,
    }))
}
