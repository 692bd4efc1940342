// src/main.rs

use actix_web::{middleware, web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use banners::config::Configuracion;
use banners::{almacen, configurar_rutas, AppState};

fn error_de_arranque(mensaje: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, mensaje.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // RUST_LOG tiene prioridad sobre el filtro por defecto
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,banners=debug")),
        )
        .init();

    let config = Configuracion::cargar().map_err(error_de_arranque)?;
    let almacen = almacen::abrir(&config).await.map_err(error_de_arranque)?;
    almacen::sembrar_usuarios(almacen.as_ref(), &config)
        .await
        .map_err(error_de_arranque)?;

    let bind = config.bind.clone();
    tracing::info!(bind = %bind, negocio = %config.nombre_negocio, "iniciando servidor");

    let app_state = web::Data::new(AppState { almacen, config });

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .configure(configurar_rutas)
    })
    .bind(bind)?
    .run()
    .await
}
