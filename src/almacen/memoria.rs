// src/almacen/memoria.rs

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::tablas::Tablas;
use super::Almacen;
use crate::cierres::cierres_structs::{CierreCaja, ResumenCierre};
use crate::shared::error::{ErrorApp, Resultado};
use crate::usuarios::usuario_structs::{Usuario, UsuarioNuevo};
use crate::ventas::ventas_structs::{Pago, PagoNuevo, Venta};

/// Almacén en memoria: se pierde al reiniciar.
/// RwLock permite varios lectores o un único escritor; el cierre de caja
/// toma el lock de escritura completo, así queda serializado.
#[derive(Default)]
pub struct AlmacenMemoria {
    tablas: RwLock<Tablas>,
}

impl AlmacenMemoria {
    fn leer(&self) -> Resultado<RwLockReadGuard<'_, Tablas>> {
        self.tablas
            .read()
            .map_err(|_| ErrorApp::Almacen("Lock del almacén envenenado.".to_string()))
    }

    fn escribir(&self) -> Resultado<RwLockWriteGuard<'_, Tablas>> {
        self.tablas
            .write()
            .map_err(|_| ErrorApp::Almacen("Lock del almacén envenenado.".to_string()))
    }
}

#[async_trait]
impl Almacen for AlmacenMemoria {
    async fn insertar_venta(&self, venta: Venta, adelanto: Option<PagoNuevo>) -> Resultado<Venta> {
        Ok(self.escribir()?.insertar_venta(venta, adelanto))
    }

    async fn listar_ventas(&self, usuario: Option<&str>) -> Resultado<Vec<Venta>> {
        Ok(self.leer()?.listar_ventas(usuario))
    }

    async fn obtener_venta(&self, id: i64) -> Resultado<Option<Venta>> {
        Ok(self.leer()?.obtener_venta(id))
    }

    async fn marcar_entregada(&self, id: i64) -> Resultado<Venta> {
        self.escribir()?.marcar_entregada(id)
    }

    async fn registrar_pago(&self, venta_id: i64, pago: PagoNuevo) -> Resultado<(Venta, Pago)> {
        self.escribir()?.registrar_pago(venta_id, pago)
    }

    async fn eliminar_venta(&self, id: i64) -> Resultado<()> {
        self.escribir()?.eliminar_venta(id)
    }

    async fn listar_pagos(&self, venta_id: i64) -> Resultado<Vec<Pago>> {
        Ok(self.leer()?.listar_pagos(venta_id))
    }

    async fn pagos_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Resultado<Vec<Pago>> {
        Ok(self.leer()?.pagos_entre(desde, hasta))
    }

    async fn ventas_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Resultado<Vec<Venta>> {
        Ok(self.leer()?.ventas_entre(desde, hasta))
    }

    async fn vista_previa_cierre(&self) -> Resultado<Option<ResumenCierre>> {
        Ok(self.leer()?.vista_previa_cierre())
    }

    async fn cerrar_caja(
        &self,
        usuario: &str,
        fecha: NaiveDate,
        ahora: DateTime<Utc>,
    ) -> Resultado<Option<CierreCaja>> {
        Ok(self.escribir()?.cerrar_caja(usuario, fecha, ahora))
    }

    async fn listar_cierres(&self) -> Resultado<Vec<CierreCaja>> {
        Ok(self.leer()?.cierres.clone())
    }

    async fn buscar_usuario(&self, nombre: &str) -> Resultado<Option<Usuario>> {
        Ok(self.leer()?.buscar_usuario(nombre))
    }

    async fn crear_usuario(&self, nuevo: UsuarioNuevo) -> Resultado<Usuario> {
        self.escribir()?.crear_usuario(nuevo)
    }
}
