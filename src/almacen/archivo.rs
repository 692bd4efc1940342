// src/almacen/archivo.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::tablas::Tablas;
use super::Almacen;
use crate::cierres::cierres_structs::{asignar_ventas, CierreCaja, CierreFila, ResumenCierre};
use crate::shared::error::{ErrorApp, Resultado};
use crate::usuarios::usuario_structs::{Usuario, UsuarioFila, UsuarioNuevo};
use crate::ventas::ventas_structs::{Pago, PagoFila, PagoNuevo, Venta, VentaFila};

const VENTAS: &str = "ventas.csv";
const PAGOS: &str = "pagos.csv";
const CIERRES: &str = "cierres.csv";
const USUARIOS: &str = "usuarios.csv";

/// Almacén en archivos CSV planos: una fila por registro, con cabecera.
///
/// Las tablas se mantienen también en memoria. Cada modificación trabaja
/// sobre una copia, la escribe a disco y solo entonces la publica; el mutex
/// serializa los ciclos de lectura-modificación-escritura.
pub struct AlmacenArchivo {
    directorio: PathBuf,
    tablas: Mutex<Tablas>,
}

impl AlmacenArchivo {
    pub fn abrir(directorio: &Path) -> Resultado<Self> {
        fs::create_dir_all(directorio)?;

        let mut tablas = Tablas {
            ventas: leer_tabla::<VentaFila, Venta>(&directorio.join(VENTAS))?,
            pagos: leer_tabla::<PagoFila, Pago>(&directorio.join(PAGOS))?,
            cierres: leer_tabla::<CierreFila, CierreCaja>(&directorio.join(CIERRES))?,
            usuarios: leer_tabla::<UsuarioFila, Usuario>(&directorio.join(USUARIOS))?,
        };
        let pares: Vec<(i64, i64)> = tablas
            .ventas
            .iter()
            .filter_map(|v| v.cierre_id.map(|c| (v.id, c)))
            .collect();
        asignar_ventas(&mut tablas.cierres, pares);
        tracing::debug!(
            directorio = %directorio.display(),
            ventas = tablas.ventas.len(),
            pagos = tablas.pagos.len(),
            "tablas CSV cargadas"
        );

        Ok(AlmacenArchivo {
            directorio: directorio.to_path_buf(),
            tablas: Mutex::new(tablas),
        })
    }

    fn bloquear(&self) -> Resultado<MutexGuard<'_, Tablas>> {
        self.tablas
            .lock()
            .map_err(|_| ErrorApp::Almacen("Lock del almacén envenenado.".to_string()))
    }

    fn modificar<T>(&self, operacion: impl FnOnce(&mut Tablas) -> Resultado<T>) -> Resultado<T> {
        let mut tablas = self.bloquear()?;
        let mut copia = tablas.clone();
        let resultado = operacion(&mut copia)?;
        self.guardar(&copia)?;
        *tablas = copia;
        Ok(resultado)
    }

    fn guardar(&self, tablas: &Tablas) -> Resultado<()> {
        escribir_tabla(&self.directorio.join(VENTAS), tablas.ventas.iter().map(VentaFila::from))?;
        escribir_tabla(&self.directorio.join(PAGOS), tablas.pagos.iter().map(PagoFila::from))?;
        escribir_tabla(&self.directorio.join(CIERRES), tablas.cierres.iter().map(CierreFila::from))?;
        escribir_tabla(&self.directorio.join(USUARIOS), tablas.usuarios.iter().map(UsuarioFila::from))?;
        Ok(())
    }
}

fn leer_tabla<F, T>(ruta: &Path) -> Resultado<Vec<T>>
where
    F: DeserializeOwned,
    T: TryFrom<F, Error = ErrorApp>,
{
    if !ruta.exists() {
        return Ok(Vec::new());
    }
    let mut lector = csv::Reader::from_path(ruta)?;
    let mut registros = Vec::new();
    for fila in lector.deserialize::<F>() {
        registros.push(T::try_from(fila?)?);
    }
    Ok(registros)
}

/// Escribe a un archivo temporal y lo renombra, para no dejar la tabla a medias.
fn escribir_tabla<F: Serialize>(ruta: &Path, filas: impl Iterator<Item = F>) -> Resultado<()> {
    let temporal = ruta.with_extension("csv.tmp");
    {
        let mut escritor = csv::Writer::from_path(&temporal)?;
        for fila in filas {
            escritor.serialize(fila)?;
        }
        escritor.flush()?;
    }
    fs::rename(&temporal, ruta)?;
    Ok(())
}

#[async_trait]
impl Almacen for AlmacenArchivo {
    async fn insertar_venta(&self, venta: Venta, adelanto: Option<PagoNuevo>) -> Resultado<Venta> {
        self.modificar(|t| Ok(t.insertar_venta(venta, adelanto)))
    }

    async fn listar_ventas(&self, usuario: Option<&str>) -> Resultado<Vec<Venta>> {
        Ok(self.bloquear()?.listar_ventas(usuario))
    }

    async fn obtener_venta(&self, id: i64) -> Resultado<Option<Venta>> {
        Ok(self.bloquear()?.obtener_venta(id))
    }

    async fn marcar_entregada(&self, id: i64) -> Resultado<Venta> {
        self.modificar(|t| t.marcar_entregada(id))
    }

    async fn registrar_pago(&self, venta_id: i64, pago: PagoNuevo) -> Resultado<(Venta, Pago)> {
        self.modificar(|t| t.registrar_pago(venta_id, pago))
    }

    async fn eliminar_venta(&self, id: i64) -> Resultado<()> {
        self.modificar(|t| t.eliminar_venta(id))
    }

    async fn listar_pagos(&self, venta_id: i64) -> Resultado<Vec<Pago>> {
        Ok(self.bloquear()?.listar_pagos(venta_id))
    }

    async fn pagos_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Resultado<Vec<Pago>> {
        Ok(self.bloquear()?.pagos_entre(desde, hasta))
    }

    async fn ventas_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Resultado<Vec<Venta>> {
        Ok(self.bloquear()?.ventas_entre(desde, hasta))
    }

    async fn vista_previa_cierre(&self) -> Resultado<Option<ResumenCierre>> {
        Ok(self.bloquear()?.vista_previa_cierre())
    }

    async fn cerrar_caja(
        &self,
        usuario: &str,
        fecha: NaiveDate,
        ahora: DateTime<Utc>,
    ) -> Resultado<Option<CierreCaja>> {
        self.modificar(|t| Ok(t.cerrar_caja(usuario, fecha, ahora)))
    }

    async fn listar_cierres(&self) -> Resultado<Vec<CierreCaja>> {
        Ok(self.bloquear()?.cierres.clone())
    }

    async fn buscar_usuario(&self, nombre: &str) -> Resultado<Option<Usuario>> {
        Ok(self.bloquear()?.buscar_usuario(nombre))
    }

    async fn crear_usuario(&self, nuevo: UsuarioNuevo) -> Resultado<Usuario> {
        self.modificar(|t| t.crear_usuario(nuevo))
    }
}
