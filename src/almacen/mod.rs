// src/almacen/mod.rs

//! Persistencia de ventas, pagos, cierres y usuarios.
//!
//! Hay tres backends intercambiables (memoria, archivo CSV y PostgreSQL);
//! se elige uno al arrancar según la configuración.

pub mod archivo;
pub mod memoria;
pub mod postgres;
pub mod tablas;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::cierres::cierres_structs::{CierreCaja, ResumenCierre};
use crate::config::{Configuracion, TipoAlmacen};
use crate::shared::error::{ErrorApp, Resultado};
use crate::usuarios::usuario_structs::{Usuario, UsuarioNuevo};
use crate::ventas::ventas_structs::{Pago, PagoNuevo, Venta};

#[async_trait]
pub trait Almacen: Send + Sync {
    /// Guarda una venta nueva (y el pago del adelanto) y la devuelve con su id.
    async fn insertar_venta(&self, venta: Venta, adelanto: Option<PagoNuevo>) -> Resultado<Venta>;

    /// Todas las ventas, o solo las del usuario indicado.
    async fn listar_ventas(&self, usuario: Option<&str>) -> Resultado<Vec<Venta>>;

    async fn obtener_venta(&self, id: i64) -> Resultado<Option<Venta>>;

    /// Marca como entregada una venta abierta. Solo toca el estado de entrega.
    async fn marcar_entregada(&self, id: i64) -> Resultado<Venta>;

    /// Aplica el pago sobre la cuenta guardada (no sobre una copia leída antes)
    /// y lo registra. Devuelve la venta actualizada y el pago con su id.
    async fn registrar_pago(&self, venta_id: i64, pago: PagoNuevo) -> Resultado<(Venta, Pago)>;

    /// Borra una venta abierta y sus pagos.
    async fn eliminar_venta(&self, id: i64) -> Resultado<()>;

    async fn listar_pagos(&self, venta_id: i64) -> Resultado<Vec<Pago>>;

    /// Pagos recibidos en `[desde, hasta)`.
    async fn pagos_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Resultado<Vec<Pago>>;

    /// Ventas registradas en `[desde, hasta)`.
    async fn ventas_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Resultado<Vec<Venta>>;

    /// Lo que se cerraría ahora, sin guardar nada.
    async fn vista_previa_cierre(&self) -> Resultado<Option<ResumenCierre>>;

    /// Selecciona, agrega, archiva y marca las ventas cerrables en una sola
    /// unidad de trabajo serializada. `None` si no había nada que cerrar.
    async fn cerrar_caja(
        &self,
        usuario: &str,
        fecha: NaiveDate,
        ahora: DateTime<Utc>,
    ) -> Resultado<Option<CierreCaja>>;

    async fn listar_cierres(&self) -> Resultado<Vec<CierreCaja>>;

    async fn buscar_usuario(&self, nombre: &str) -> Resultado<Option<Usuario>>;

    async fn crear_usuario(&self, nuevo: UsuarioNuevo) -> Resultado<Usuario>;
}

/// Abre el backend configurado.
pub async fn abrir(config: &Configuracion) -> Resultado<Arc<dyn Almacen>> {
    let almacen: Arc<dyn Almacen> = match config.almacen {
        TipoAlmacen::Memoria => Arc::new(memoria::AlmacenMemoria::default()),
        TipoAlmacen::Archivo => Arc::new(archivo::AlmacenArchivo::abrir(&config.directorio_datos)?),
        TipoAlmacen::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                ErrorApp::Almacen("Falta DATABASE_URL para el almacén postgres.".to_string())
            })?;
            Arc::new(postgres::AlmacenPostgres::conectar(url).await?)
        }
    };
    tracing::info!(almacen = ?config.almacen, "almacén abierto");
    Ok(almacen)
}

/// Registra las credenciales estáticas de la configuración que aún no existan.
pub async fn sembrar_usuarios(almacen: &dyn Almacen, config: &Configuracion) -> Resultado<()> {
    for credencial in &config.usuarios {
        if almacen.buscar_usuario(&credencial.nombre).await?.is_some() {
            continue;
        }
        let clave_hash = bcrypt::hash(&credencial.clave, config.bcrypt_costo)?;
        almacen
            .crear_usuario(UsuarioNuevo {
                nombre: credencial.nombre.clone(),
                clave_hash,
                rol: credencial.rol,
            })
            .await?;
        tracing::info!(usuario = %credencial.nombre, "usuario estático registrado");
    }
    Ok(())
}
