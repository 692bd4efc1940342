// src/exportar/exportar_router.rs

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, web, HttpResponse};
use chrono::Local;

use super::excel::generar_excel;
use super::pdf::generar_pdf;
use super::resumen::totalizar;
use crate::shared::error::Resultado;
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::ventas::ventas_structs::{Pago, Venta};
use crate::AppState;

fn adjunto(nombre: String) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(nombre)],
    }
}

/// Ventas visibles para el usuario junto con sus pagos.
async fn ventas_y_pagos(data: &AppState, usuario: &UsuarioAutenticado) -> Resultado<(Vec<Venta>, Vec<Pago>)> {
    let ventas = data.almacen.listar_ventas(usuario.filtro_ventas()).await?;
    let mut pagos = Vec::new();
    for venta in &ventas {
        pagos.extend(data.almacen.listar_pagos(venta.id).await?);
    }
    Ok((ventas, pagos))
}

#[get("/exportar/excel")]
pub async fn exportar_excel(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> Resultado<HttpResponse> {
    let ventas = data.almacen.listar_ventas(usuario.filtro_ventas()).await?;
    let bytes = generar_excel(&ventas)?;

    tracing::info!(usuario = %usuario.user_name, ventas = ventas.len(), "ventas exportadas a Excel");
    let nombre = format!("ventas_{}.csv", Local::now().format("%Y%m%d_%H%M"));
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(adjunto(nombre))
        .body(bytes))
}

#[get("/exportar/pdf")]
pub async fn exportar_pdf(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> Resultado<HttpResponse> {
    let (ventas, pagos) = ventas_y_pagos(&data, &usuario).await?;
    let totales = totalizar(&ventas, &pagos);
    let ahora = Local::now();
    let bytes = generar_pdf(&data.config, &ventas, &totales, ahora.naive_local())?;

    tracing::info!(usuario = %usuario.user_name, ventas = ventas.len(), "reporte PDF generado");
    let nombre = format!("reporte_ventas_{}.pdf", ahora.format("%Y%m%d_%H%M"));
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(adjunto(nombre))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nombre_de_adjunto() {
        let cabecera = adjunto("ventas.csv".to_string());
        assert_eq!(cabecera.get_filename(), Some("ventas.csv"));
        assert!(cabecera.is_attachment());
    }
}
