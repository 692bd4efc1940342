// src/cierres/cierres_structs.rs

use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::decimal_texto;
use crate::shared::error::{ErrorApp, Resultado};
use crate::ventas::ventas_structs::MetodoPago;

/// Subtotales por método de pago. Siempre contiene los cinco métodos.
pub type Subtotales = BTreeMap<MetodoPago, BigDecimal>;

pub fn subtotales_en_cero() -> Subtotales {
    MetodoPago::TODOS
        .into_iter()
        .map(|m| (m, BigDecimal::zero()))
        .collect()
}

/// Agregación de las ventas que entrarían (o entraron) en un cierre.
#[derive(Debug, Clone, Serialize)]
pub struct ResumenCierre {
    pub ventas_ids: Vec<i64>,
    pub total_general: BigDecimal,
    pub subtotales: Subtotales,
}

/// Cierre de caja archivado.
#[derive(Debug, Clone, Serialize)]
pub struct CierreCaja {
    pub id: i64,
    pub fecha: NaiveDate,
    /// Ventas liquidadas en este cierre. No es columna: sale de `ventas.cierre_id`.
    pub ventas_ids: Vec<i64>,
    pub total_general: BigDecimal,
    pub subtotales: Subtotales,
    pub cantidad_ventas: i64,
    pub usuario: String,
    pub creado_en: DateTime<Utc>,
}

/// Fila de `cierres_caja`: un subtotal por columna.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CierreFila {
    pub id: i64,
    pub fecha: NaiveDate,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub total_general: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub total_efectivo: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub total_yape: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub total_plin: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub total_transferencia: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub total_tarjeta: BigDecimal,
    pub cantidad_ventas: i64,
    pub usuario: String,
    pub creado_en: DateTime<Utc>,
}

impl From<&CierreCaja> for CierreFila {
    fn from(c: &CierreCaja) -> Self {
        let sub = |m: MetodoPago| c.subtotales.get(&m).cloned().unwrap_or_else(BigDecimal::zero);
        CierreFila {
            id: c.id,
            fecha: c.fecha,
            total_general: c.total_general.clone(),
            total_efectivo: sub(MetodoPago::Efectivo),
            total_yape: sub(MetodoPago::Yape),
            total_plin: sub(MetodoPago::Plin),
            total_transferencia: sub(MetodoPago::Transferencia),
            total_tarjeta: sub(MetodoPago::Tarjeta),
            cantidad_ventas: c.cantidad_ventas,
            usuario: c.usuario.clone(),
            creado_en: c.creado_en,
        }
    }
}

impl TryFrom<CierreFila> for CierreCaja {
    type Error = ErrorApp;

    fn try_from(f: CierreFila) -> Resultado<Self> {
        let subtotales: Subtotales = [
            (MetodoPago::Efectivo, f.total_efectivo),
            (MetodoPago::Yape, f.total_yape),
            (MetodoPago::Plin, f.total_plin),
            (MetodoPago::Transferencia, f.total_transferencia),
            (MetodoPago::Tarjeta, f.total_tarjeta),
        ]
        .into_iter()
        .collect();

        let suma = subtotales.values().fold(BigDecimal::zero(), |acc, v| acc + v);
        if suma != f.total_general {
            return Err(ErrorApp::Almacen(format!(
                "Cierre {} inconsistente: subtotales {} != total {}",
                f.id, suma, f.total_general
            )));
        }

        Ok(CierreCaja {
            id: f.id,
            fecha: f.fecha,
            ventas_ids: Vec::new(),
            total_general: f.total_general,
            subtotales,
            cantidad_ventas: f.cantidad_ventas,
            usuario: f.usuario,
            creado_en: f.creado_en,
        })
    }
}

/// Completa `ventas_ids` de cada cierre a partir de pares `(venta_id, cierre_id)`.
pub fn asignar_ventas(cierres: &mut [CierreCaja], pares: impl IntoIterator<Item = (i64, i64)>) {
    let mut por_cierre: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for (venta_id, cierre_id) in pares {
        por_cierre.entry(cierre_id).or_default().push(venta_id);
    }
    for cierre in cierres {
        let mut ids = por_cierre.remove(&cierre.id).unwrap_or_default();
        ids.sort_unstable();
        cierre.ventas_ids = ids;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cierre(id: i64) -> CierreCaja {
        CierreCaja {
            id,
            fecha: Utc::now().date_naive(),
            ventas_ids: Vec::new(),
            total_general: BigDecimal::zero(),
            subtotales: subtotales_en_cero(),
            cantidad_ventas: 0,
            usuario: "admin".to_string(),
            creado_en: Utc::now(),
        }
    }

    #[test]
    fn asigna_las_ventas_de_cada_cierre_en_orden() {
        let mut cierres = vec![cierre(1), cierre(2), cierre(3)];
        asignar_ventas(&mut cierres, vec![(7, 2), (3, 1), (5, 2), (4, 1)]);
        assert_eq!(cierres[0].ventas_ids, vec![3, 4]);
        assert_eq!(cierres[1].ventas_ids, vec![5, 7]);
        assert!(cierres[2].ventas_ids.is_empty());
    }

    #[test]
    fn fila_no_guarda_ventas_pero_si_los_subtotales() {
        let mut original = cierre(9);
        original.ventas_ids = vec![1, 2];
        original.total_general = BigDecimal::from(15);
        original.subtotales.insert(MetodoPago::Yape, BigDecimal::from(15));
        let leido = CierreCaja::try_from(CierreFila::from(&original)).unwrap();
        assert!(leido.ventas_ids.is_empty());
        assert_eq!(leido.subtotales[&MetodoPago::Yape], BigDecimal::from(15));
    }
}
