// src/precios/precios_router.rs

use actix_web::{get, post, web, HttpResponse};

use super::calculo::{catalogo, cotizar};
use super::precios_structs::EntradaCotizacion;
use crate::shared::error::Resultado;
use crate::shared::shared_structs::GenericResponse;

/// Opciones del formulario: anchos de rollo, tarifas por diseño y modificadores.
#[get("/precios/catalogo")]
pub async fn ver_catalogo() -> HttpResponse {
    HttpResponse::Ok().json(GenericResponse::exito("Catálogo de precios", catalogo()))
}

/// Cotiza un pedido sin registrarlo.
#[post("/precios/cotizar")]
pub async fn cotizar_pedido(entrada: web::Json<EntradaCotizacion>) -> Resultado<HttpResponse> {
    let cotizacion = cotizar(&entrada)?;
    Ok(HttpResponse::Ok().json(GenericResponse::exito("Cotización calculada", cotizacion)))
}
