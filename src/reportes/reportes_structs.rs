// src/reportes/reportes_structs.rs

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::cierres::cierres_structs::{subtotales_en_cero, Subtotales};
use crate::shared::error::{ErrorApp, Resultado};
use crate::ventas::ventas_structs::{Pago, Venta};

/// Movimiento de un día: lo vendido y lo efectivamente cobrado por método.
/// Se basa en los pagos, no en la foto de cada venta.
#[derive(Debug, Serialize)]
pub struct ReporteDiario {
    pub fecha: NaiveDate,
    pub cantidad_ventas: usize,
    pub total_vendido: BigDecimal,
    pub total_cobrado: BigDecimal,
    pub por_metodo: Subtotales,
}

#[derive(Debug, Deserialize)]
pub struct ReporteQuery {
    pub fecha: Option<NaiveDate>,
}

/// Inicio y fin (exclusivo) del día local, en UTC.
pub fn rango_del_dia(fecha: NaiveDate) -> Resultado<(DateTime<Utc>, DateTime<Utc>)> {
    let inicio_de = |dia: NaiveDate| {
        dia.and_hms_opt(0, 0, 0)
            .and_then(|medianoche| Local.from_local_datetime(&medianoche).earliest())
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| ErrorApp::Validacion(format!("Fecha fuera de rango: {}", dia)))
    };
    let siguiente = fecha
        .succ_opt()
        .ok_or_else(|| ErrorApp::Validacion(format!("Fecha fuera de rango: {}", fecha)))?;
    Ok((inicio_de(fecha)?, inicio_de(siguiente)?))
}

pub fn reporte_diario(fecha: NaiveDate, ventas: &[Venta], pagos: &[Pago]) -> ReporteDiario {
    let mut por_metodo = subtotales_en_cero();
    let mut total_cobrado = BigDecimal::zero();
    for pago in pagos {
        let subtotal = por_metodo.entry(pago.metodo).or_insert_with(BigDecimal::zero);
        *subtotal = &*subtotal + &pago.monto;
        total_cobrado = &total_cobrado + &pago.monto;
    }

    ReporteDiario {
        fecha,
        cantidad_ventas: ventas.len(),
        total_vendido: ventas
            .iter()
            .fold(BigDecimal::zero(), |acc, v| acc + v.cuenta.total()),
        total_cobrado,
        por_metodo,
    }
}
