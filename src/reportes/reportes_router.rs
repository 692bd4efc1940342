// src/reportes/reportes_router.rs

use actix_web::{get, web, HttpResponse};
use chrono::Local;

use super::reportes_structs::{rango_del_dia, reporte_diario, ReporteQuery};
use crate::shared::error::Resultado;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::AppState;

/// Totales del día por método de pago. Sin `fecha` se usa el día de hoy.
#[get("/reportes/diario")]
pub async fn reporte_del_dia(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    consulta: web::Query<ReporteQuery>,
) -> Resultado<HttpResponse> {
    usuario.exigir_admin()?;

    let fecha = consulta.fecha.unwrap_or_else(|| Local::now().date_naive());
    let (desde, hasta) = rango_del_dia(fecha)?;
    let ventas = data.almacen.ventas_entre(desde, hasta).await?;
    let pagos = data.almacen.pagos_entre(desde, hasta).await?;

    Ok(HttpResponse::Ok().json(GenericResponse::exito(
        format!("Reporte del {}", fecha),
        reporte_diario(fecha, &ventas, &pagos),
    )))
}
