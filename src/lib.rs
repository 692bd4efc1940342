// src/lib.rs

use std::sync::Arc;

use actix_web::web;

pub mod almacen;
pub mod cierres;
pub mod config;
pub mod exportar;
pub mod precios;
pub mod reportes;
pub mod shared;
pub mod usuarios;
pub mod ventas;

use almacen::Almacen;
use config::Configuracion;
use shared::error::ErrorApp;

// Estado compartido: el almacén configurado y la configuración cargada al inicio.
pub struct AppState {
    pub almacen: Arc<dyn Almacen>,
    pub config: Configuracion,
}

/// Registra todas las rutas. La usan `main` y los tests de integración.
pub fn configurar_rutas(cfg: &mut web::ServiceConfig) {
    // Cuerpos y consultas mal formados responden con el mismo sobre JSON que el resto
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ErrorApp::Validacion(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ErrorApp::Validacion(err.to_string()).into()),
    );

    cfg
        // Módulo de Usuarios
        .service(usuarios::usuario_router::login_usuario)
        .service(usuarios::usuario_router::registrar_usuario)
        // Módulo de Precios
        .service(precios::precios_router::ver_catalogo)
        .service(precios::precios_router::cotizar_pedido)
        // Módulo de Ventas
        .service(ventas::ventas_router::registrar_venta)
        .service(ventas::ventas_router::listar_ventas)
        .service(ventas::ventas_router::obtener_venta)
        .service(ventas::ventas_router::listar_pagos)
        .service(ventas::ventas_router::abonar)
        .service(ventas::ventas_router::completar_pago)
        .service(ventas::ventas_router::marcar_entregada)
        .service(ventas::ventas_router::eliminar_venta)
        // Módulo de Cierres
        .service(cierres::cierres_router::listar_cierres)
        .service(cierres::cierres_router::vista_previa)
        .service(cierres::cierres_router::cerrar_caja)
        // Reportes y exportaciones
        .service(reportes::reportes_router::reporte_del_dia)
        .service(exportar::exportar_router::exportar_excel)
        .service(exportar::exportar_router::exportar_pdf);
}
