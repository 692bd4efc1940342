// src/almacen/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{query, query_as, query_scalar, PgConnection, Pool, Postgres, Row};

use super::Almacen;
use crate::cierres::calculo::resumir;
use crate::cierres::cierres_structs::{asignar_ventas, CierreCaja, CierreFila, ResumenCierre};
use crate::shared::error::{ErrorApp, Resultado};
use crate::usuarios::usuario_structs::{Usuario, UsuarioFila, UsuarioNuevo};
use crate::ventas::ventas_structs::{EstadoEntrega, Pago, PagoFila, PagoNuevo, Venta, VentaFila};

/// Clave del advisory lock que serializa los cierres de caja.
const LOCK_CIERRE: i64 = 0x4349_4552_5245;

const COLUMNAS_VENTA: &str = "id, cliente, material, acabado, detalle, ancho, alto, area, diseno, \
     precio_m2, total, pagado, saldo, metodo_pago, estado_pago, estado_entrega, cerrado, \
     cierre_id, usuario, creado_en";

const COLUMNAS_PAGO: &str = "id, venta_id, monto, metodo, usuario, creado_en";

const COLUMNAS_CIERRE: &str = "id, fecha, total_general, total_efectivo, total_yape, total_plin, \
     total_transferencia, total_tarjeta, cantidad_ventas, usuario, creado_en";

/// Almacén sobre las tablas `ventas`, `pagos`, `cierres_caja` y `usuarios`.
pub struct AlmacenPostgres {
    pool: Pool<Postgres>,
}

fn convertir<F, T>(filas: Vec<F>) -> Resultado<Vec<T>>
where
    T: TryFrom<F, Error = ErrorApp>,
{
    filas.into_iter().map(T::try_from).collect()
}

impl AlmacenPostgres {
    /// Conecta y aplica las migraciones embebidas.
    pub async fn conectar(url: &str) -> Resultado<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(AlmacenPostgres { pool })
    }

    /// Distingue "no existe" de "ya está cerrada" cuando un UPDATE/DELETE no tocó filas.
    async fn error_venta_no_modificable(conn: &mut PgConnection, id: i64) -> ErrorApp {
        let cerrado = query_scalar::<_, bool>("SELECT cerrado FROM ventas WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await;
        match cerrado {
            Ok(Some(true)) => ErrorApp::Conflicto(format!(
                "La venta {} ya fue incluida en un cierre de caja.",
                id
            )),
            Ok(_) => ErrorApp::no_encontrada(id),
            Err(e) => e.into(),
        }
    }

    async fn ids_cerrables(conn: &mut PgConnection, bloquear: bool) -> Resultado<Vec<i64>> {
        let sql = if bloquear {
            "SELECT id FROM ventas \
             WHERE cerrado = FALSE AND estado_entrega = 'entregado' AND saldo = 0 \
             ORDER BY id FOR UPDATE"
        } else {
            "SELECT id FROM ventas \
             WHERE cerrado = FALSE AND estado_entrega = 'entregado' AND saldo = 0 \
             ORDER BY id"
        };
        Ok(query_scalar::<_, i64>(sql).fetch_all(conn).await?)
    }

    async fn pagos_de(conn: &mut PgConnection, ventas_ids: &[i64]) -> Resultado<Vec<Pago>> {
        let filas = query_as::<_, PagoFila>(&format!(
            "SELECT {} FROM pagos WHERE venta_id = ANY($1) ORDER BY id",
            COLUMNAS_PAGO
        ))
        .bind(ventas_ids)
        .fetch_all(conn)
        .await?;
        convertir(filas)
    }
}

#[async_trait]
impl Almacen for AlmacenPostgres {
    async fn insertar_venta(&self, venta: Venta, adelanto: Option<PagoNuevo>) -> Resultado<Venta> {
        let fila = VentaFila::from(&venta);
        let mut transaction = self.pool.begin().await?;

        let row = query(
            "INSERT INTO ventas (cliente, material, acabado, detalle, ancho, alto, area, diseno, \
             precio_m2, total, pagado, saldo, metodo_pago, estado_pago, estado_entrega, cerrado, \
             cierre_id, usuario, creado_en) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
             RETURNING id",
        )
        .bind(&fila.cliente)
        .bind(&fila.material)
        .bind(&fila.acabado)
        .bind(&fila.detalle)
        .bind(&fila.ancho)
        .bind(&fila.alto)
        .bind(&fila.area)
        .bind(&fila.diseno)
        .bind(&fila.precio_m2)
        .bind(&fila.total)
        .bind(&fila.pagado)
        .bind(&fila.saldo)
        .bind(&fila.metodo_pago)
        .bind(&fila.estado_pago)
        .bind(&fila.estado_entrega)
        .bind(fila.cerrado)
        .bind(fila.cierre_id)
        .bind(&fila.usuario)
        .bind(fila.creado_en)
        .fetch_one(&mut *transaction)
        .await?;
        let id: i64 = row.try_get("id")?;

        if let Some(pago) = adelanto {
            query(
                "INSERT INTO pagos (venta_id, monto, metodo, usuario, creado_en) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(&pago.monto)
            .bind(pago.metodo.as_str())
            .bind(&pago.usuario)
            .bind(pago.creado_en)
            .execute(&mut *transaction)
            .await?;
        }

        transaction.commit().await?;

        Ok(Venta { id, ..venta })
    }

    async fn listar_ventas(&self, usuario: Option<&str>) -> Resultado<Vec<Venta>> {
        let filas = query_as::<_, VentaFila>(&format!(
            "SELECT {} FROM ventas WHERE ($1::TEXT IS NULL OR usuario = $1) ORDER BY id",
            COLUMNAS_VENTA
        ))
        .bind(usuario)
        .fetch_all(&self.pool)
        .await?;
        convertir(filas)
    }

    async fn obtener_venta(&self, id: i64) -> Resultado<Option<Venta>> {
        let fila = query_as::<_, VentaFila>(&format!(
            "SELECT {} FROM ventas WHERE id = $1",
            COLUMNAS_VENTA
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        fila.map(Venta::try_from).transpose()
    }

    async fn marcar_entregada(&self, id: i64) -> Resultado<Venta> {
        let mut conn = self.pool.acquire().await?;

        let fila = query_as::<_, VentaFila>(&format!(
            "UPDATE ventas SET estado_entrega = $1 WHERE id = $2 AND cerrado = FALSE RETURNING {}",
            COLUMNAS_VENTA
        ))
        .bind(EstadoEntrega::Entregado.as_str())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        match fila {
            Some(fila) => Venta::try_from(fila),
            None => Err(Self::error_venta_no_modificable(&mut conn, id).await),
        }
    }

    async fn registrar_pago(&self, venta_id: i64, mut pago: PagoNuevo) -> Resultado<(Venta, Pago)> {
        let mut transaction = self.pool.begin().await?;

        // La fila queda bloqueada hasta el commit: el abono se valida contra el saldo vigente
        let fila = query_as::<_, VentaFila>(&format!(
            "SELECT {} FROM ventas WHERE id = $1 FOR UPDATE",
            COLUMNAS_VENTA
        ))
        .bind(venta_id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or_else(|| ErrorApp::no_encontrada(venta_id))?;
        let mut venta = Venta::try_from(fila)?;
        if venta.cerrado {
            return Err(ErrorApp::Conflicto(format!(
                "La venta {} ya fue incluida en un cierre de caja.",
                venta_id
            )));
        }
        pago.monto = venta.cuenta.abonar(&pago.monto)?;

        query("UPDATE ventas SET pagado = $1, saldo = $2, estado_pago = $3 WHERE id = $4")
            .bind(venta.cuenta.pagado())
            .bind(venta.cuenta.saldo())
            .bind(venta.cuenta.estado().as_str())
            .bind(venta_id)
            .execute(&mut *transaction)
            .await?;

        let id = query_scalar::<_, i64>(
            "INSERT INTO pagos (venta_id, monto, metodo, usuario, creado_en) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(venta_id)
        .bind(&pago.monto)
        .bind(pago.metodo.as_str())
        .bind(&pago.usuario)
        .bind(pago.creado_en)
        .fetch_one(&mut *transaction)
        .await?;

        transaction.commit().await?;
        Ok((venta, Pago::desde_nuevo(id, venta_id, pago)))
    }

    async fn eliminar_venta(&self, id: i64) -> Resultado<()> {
        let mut conn = self.pool.acquire().await?;
        // Los pagos se borran en cascada
        let resultado = query("DELETE FROM ventas WHERE id = $1 AND cerrado = FALSE")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        if resultado.rows_affected() == 0 {
            return Err(Self::error_venta_no_modificable(&mut conn, id).await);
        }
        Ok(())
    }

    async fn listar_pagos(&self, venta_id: i64) -> Resultado<Vec<Pago>> {
        let filas = query_as::<_, PagoFila>(&format!(
            "SELECT {} FROM pagos WHERE venta_id = $1 ORDER BY id",
            COLUMNAS_PAGO
        ))
        .bind(venta_id)
        .fetch_all(&self.pool)
        .await?;
        convertir(filas)
    }

    async fn pagos_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Resultado<Vec<Pago>> {
        let filas = query_as::<_, PagoFila>(&format!(
            "SELECT {} FROM pagos WHERE creado_en >= $1 AND creado_en < $2 ORDER BY id",
            COLUMNAS_PAGO
        ))
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;
        convertir(filas)
    }

    async fn ventas_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Resultado<Vec<Venta>> {
        let filas = query_as::<_, VentaFila>(&format!(
            "SELECT {} FROM ventas WHERE creado_en >= $1 AND creado_en < $2 ORDER BY id",
            COLUMNAS_VENTA
        ))
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;
        convertir(filas)
    }

    async fn vista_previa_cierre(&self) -> Resultado<Option<ResumenCierre>> {
        let mut conn = self.pool.acquire().await?;
        let ids = Self::ids_cerrables(&mut conn, false).await?;
        let pagos = Self::pagos_de(&mut conn, &ids).await?;
        Ok(resumir(ids, &pagos))
    }

    async fn cerrar_caja(
        &self,
        usuario: &str,
        fecha: NaiveDate,
        ahora: DateTime<Utc>,
    ) -> Resultado<Option<CierreCaja>> {
        let mut transaction = self.pool.begin().await?;

        // Un solo cierre a la vez; el lock se libera con el commit/rollback
        query("SELECT pg_advisory_xact_lock($1)")
            .bind(LOCK_CIERRE)
            .execute(&mut *transaction)
            .await?;

        let ids = Self::ids_cerrables(&mut transaction, true).await?;
        let pagos = Self::pagos_de(&mut transaction, &ids).await?;

        let resumen = match resumir(ids, &pagos) {
            Some(resumen) => resumen,
            None => {
                transaction.rollback().await?;
                return Ok(None);
            }
        };

        let mut cierre = CierreCaja {
            id: 0,
            fecha,
            ventas_ids: resumen.ventas_ids.clone(),
            total_general: resumen.total_general,
            subtotales: resumen.subtotales,
            cantidad_ventas: resumen.ventas_ids.len() as i64,
            usuario: usuario.to_string(),
            creado_en: ahora,
        };
        let fila = CierreFila::from(&cierre);

        cierre.id = query_scalar::<_, i64>(
            "INSERT INTO cierres_caja (fecha, total_general, total_efectivo, total_yape, total_plin, \
             total_transferencia, total_tarjeta, cantidad_ventas, usuario, creado_en) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
        )
        .bind(fila.fecha)
        .bind(&fila.total_general)
        .bind(&fila.total_efectivo)
        .bind(&fila.total_yape)
        .bind(&fila.total_plin)
        .bind(&fila.total_transferencia)
        .bind(&fila.total_tarjeta)
        .bind(fila.cantidad_ventas)
        .bind(&fila.usuario)
        .bind(fila.creado_en)
        .fetch_one(&mut *transaction)
        .await?;

        query("UPDATE ventas SET cerrado = TRUE, cierre_id = $1 WHERE id = ANY($2)")
            .bind(cierre.id)
            .bind(&cierre.ventas_ids)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;
        Ok(Some(cierre))
    }

    async fn listar_cierres(&self) -> Resultado<Vec<CierreCaja>> {
        let filas = query_as::<_, CierreFila>(&format!(
            "SELECT {} FROM cierres_caja ORDER BY id",
            COLUMNAS_CIERRE
        ))
        .fetch_all(&self.pool)
        .await?;
        let mut cierres: Vec<CierreCaja> = convertir(filas)?;

        let pares = query_as::<_, (i64, i64)>(
            "SELECT id, cierre_id FROM ventas WHERE cierre_id IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;
        asignar_ventas(&mut cierres, pares);
        Ok(cierres)
    }

    async fn buscar_usuario(&self, nombre: &str) -> Resultado<Option<Usuario>> {
        let fila = query_as::<_, UsuarioFila>(
            "SELECT id, nombre, clave_hash, rol FROM usuarios WHERE nombre = $1",
        )
        .bind(nombre)
        .fetch_optional(&self.pool)
        .await?;
        fila.map(Usuario::try_from).transpose()
    }

    async fn crear_usuario(&self, nuevo: UsuarioNuevo) -> Resultado<Usuario> {
        let id = query_scalar::<_, i64>(
            "INSERT INTO usuarios (nombre, clave_hash, rol) VALUES ($1, $2, $3) \
             ON CONFLICT (nombre) DO NOTHING RETURNING id",
        )
        .bind(&nuevo.nombre)
        .bind(&nuevo.clave_hash)
        .bind(nuevo.rol.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ErrorApp::Conflicto(format!("El usuario {} ya existe.", nuevo.nombre)))?;

        Ok(Usuario {
            id,
            nombre: nuevo.nombre,
            clave_hash: nuevo.clave_hash,
            rol: nuevo.rol,
        })
    }
}
