// src/cierres/cierres_router.rs

use actix_web::{get, post, web, HttpResponse};
use chrono::{Local, Utc};

use crate::shared::error::Resultado;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::AppState;

/// Cierra la caja: archiva las ventas entregadas y pagadas que sigan abiertas.
/// Si no hay ninguna, responde con un aviso y no crea el cierre.
#[post("/cierres")]
pub async fn cerrar_caja(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> Resultado<HttpResponse> {
    usuario.exigir_admin()?;

    let fecha = Local::now().date_naive();
    match data
        .almacen
        .cerrar_caja(&usuario.user_name, fecha, Utc::now())
        .await?
    {
        Some(cierre) => {
            tracing::info!(
                cierre_id = cierre.id,
                ventas = cierre.cantidad_ventas,
                total = %cierre.total_general,
                usuario = %usuario.user_name,
                "cierre de caja registrado"
            );
            Ok(HttpResponse::Ok().json(GenericResponse::exito(
                format!("Cierre de caja registrado. ID: {}", cierre.id),
                cierre,
            )))
        }
        None => {
            tracing::info!("cierre solicitado sin ventas pendientes");
            Ok(HttpResponse::Ok().json(GenericResponse::aviso("No hay ventas para cerrar.")))
        }
    }
}

/// Muestra lo que entraría en el próximo cierre sin registrarlo.
#[get("/cierres/pendientes")]
pub async fn vista_previa(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> Resultado<HttpResponse> {
    usuario.exigir_admin()?;

    match data.almacen.vista_previa_cierre().await? {
        Some(resumen) => Ok(HttpResponse::Ok().json(GenericResponse::exito(
            format!("{} ventas listas para cerrar.", resumen.ventas_ids.len()),
            resumen,
        ))),
        None => Ok(HttpResponse::Ok().json(GenericResponse::aviso("No hay ventas para cerrar."))),
    }
}

#[get("/cierres")]
pub async fn listar_cierres(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> Resultado<HttpResponse> {
    usuario.exigir_admin()?;

    let cierres = data.almacen.listar_cierres().await?;
    let mensaje = if cierres.is_empty() {
        "No hay cierres registrados.".to_string()
    } else {
        format!("{} cierres encontrados.", cierres.len())
    };
    Ok(HttpResponse::Ok().json(GenericResponse::exito(mensaje, cierres)))
}
