// src/ventas/ventas_router.rs

use actix_web::{delete, get, post, web, HttpResponse};
use chrono::Utc;

use super::ventas_structs::{AbonoRequest, CompletarPagoRequest, NuevaVenta, Venta};
use crate::precios::calculo::formatear_soles;
use crate::shared::error::{ErrorApp, Resultado};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::AppState;

/// Busca una venta visible para el usuario. Un vendedor no ve ventas ajenas:
/// para él, una venta de otro simplemente no existe.
async fn venta_visible(data: &AppState, id: i64, usuario: &UsuarioAutenticado) -> Resultado<Venta> {
    let venta = data
        .almacen
        .obtener_venta(id)
        .await?
        .ok_or_else(|| ErrorApp::no_encontrada(id))?;

    match usuario.filtro_ventas() {
        Some(nombre) if venta.usuario != nombre => Err(ErrorApp::no_encontrada(id)),
        _ => Ok(venta),
    }
}

/// Registra una venta: cotiza, aplica el adelanto y la guarda.
#[post("/ventas")]
pub async fn registrar_venta(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    datos: web::Json<NuevaVenta>,
) -> Resultado<HttpResponse> {
    let (venta, adelanto) = Venta::nueva(&datos, &usuario.user_name, Utc::now())?;
    let venta = data.almacen.insertar_venta(venta, adelanto).await?;

    tracing::info!(
        venta_id = venta.id,
        usuario = %usuario.user_name,
        total = %venta.cuenta.total(),
        "venta registrada"
    );

    Ok(HttpResponse::Ok().json(GenericResponse::exito(
        format!("Venta registrada con éxito. ID: {}", venta.id),
        venta,
    )))
}

/// Lista las ventas: todas para el administrador, las propias para el vendedor.
#[get("/ventas")]
pub async fn listar_ventas(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> Resultado<HttpResponse> {
    let ventas = data.almacen.listar_ventas(usuario.filtro_ventas()).await?;

    let mensaje = if ventas.is_empty() {
        "No hay ventas registradas.".to_string()
    } else {
        format!("{} ventas encontradas.", ventas.len())
    };
    Ok(HttpResponse::Ok().json(GenericResponse::exito(mensaje, ventas)))
}

#[get("/ventas/{id}")]
pub async fn obtener_venta(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i64>,
) -> Resultado<HttpResponse> {
    let id = path.into_inner();
    let venta = venta_visible(&data, id, &usuario).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::exito(
        format!("Venta con ID {} encontrada.", id),
        venta,
    )))
}

#[get("/ventas/{id}/pagos")]
pub async fn listar_pagos(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i64>,
) -> Resultado<HttpResponse> {
    let id = path.into_inner();
    venta_visible(&data, id, &usuario).await?;
    let pagos = data.almacen.listar_pagos(id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::exito(
        format!("{} pagos de la venta {}.", pagos.len(), id),
        pagos,
    )))
}

/// Pago parcial contra el saldo de la venta.
#[post("/ventas/{id}/abonos")]
pub async fn abonar(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i64>,
    abono: web::Json<AbonoRequest>,
) -> Resultado<HttpResponse> {
    let id = path.into_inner();
    let mut leida = venta_visible(&data, id, &usuario).await?;
    let abono = abono.into_inner();

    let pago = leida.abonar(abono.monto, abono.metodo, &usuario.user_name, Utc::now())?;
    let (venta, pago) = data.almacen.registrar_pago(id, pago).await?;

    tracing::info!(venta_id = id, monto = %pago.monto, metodo = pago.metodo.as_str(), "abono registrado");

    Ok(HttpResponse::Ok().json(GenericResponse::exito(
        format!(
            "Abono registrado. Saldo pendiente: {}",
            formatear_soles(venta.cuenta.saldo())
        ),
        venta,
    )))
}

/// Cobra el saldo restante: pagado = total, saldo = 0.
#[post("/ventas/{id}/completar-pago")]
pub async fn completar_pago(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i64>,
    datos: Option<web::Json<CompletarPagoRequest>>,
) -> Resultado<HttpResponse> {
    let id = path.into_inner();
    let mut venta = venta_visible(&data, id, &usuario).await?;
    let metodo = datos.and_then(|d| d.into_inner().metodo);

    match venta.completar_pago(metodo, &usuario.user_name, Utc::now())? {
        Some(pago) => {
            let (venta, pago) = data.almacen.registrar_pago(id, pago).await?;
            tracing::info!(venta_id = id, monto = %pago.monto, "pago completado");
            Ok(HttpResponse::Ok().json(GenericResponse::exito("Pago completado.", venta)))
        }
        None => Ok(HttpResponse::Ok().json(GenericResponse::exito(
            "La venta ya estaba pagada.",
            venta,
        ))),
    }
}

#[post("/ventas/{id}/entregar")]
pub async fn marcar_entregada(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i64>,
) -> Resultado<HttpResponse> {
    let id = path.into_inner();
    venta_visible(&data, id, &usuario).await?;
    let venta = data.almacen.marcar_entregada(id).await?;

    tracing::info!(venta_id = id, "venta entregada");
    Ok(HttpResponse::Ok().json(GenericResponse::exito("Venta marcada como entregada.", venta)))
}

/// Borra una venta que todavía no entró a un cierre. Solo administradores.
#[delete("/ventas/{id}")]
pub async fn eliminar_venta(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i64>,
) -> Resultado<HttpResponse> {
    usuario.exigir_admin()?;
    let id = path.into_inner();
    data.almacen.eliminar_venta(id).await?;

    tracing::info!(venta_id = id, usuario = %usuario.user_name, "venta eliminada");
    Ok(HttpResponse::Ok().json(GenericResponse::aviso(format!(
        "Venta con ID {} eliminada con éxito.",
        id
    ))))
}
