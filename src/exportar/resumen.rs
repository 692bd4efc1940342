// src/exportar/resumen.rs

use bigdecimal::{BigDecimal, Zero};

use crate::cierres::cierres_structs::{subtotales_en_cero, Subtotales};
use crate::ventas::ventas_structs::{Pago, Venta};

/// Totales que encabezan los reportes exportados.
#[derive(Debug)]
pub struct TotalesVentas {
    pub cantidad: usize,
    pub total: BigDecimal,
    pub pagado: BigDecimal,
    pub saldo: BigDecimal,
    /// Cobrado por método, según los pagos de las ventas exportadas.
    pub por_metodo: Subtotales,
}

pub fn totalizar(ventas: &[Venta], pagos: &[Pago]) -> TotalesVentas {
    let mut totales = TotalesVentas {
        cantidad: ventas.len(),
        total: BigDecimal::zero(),
        pagado: BigDecimal::zero(),
        saldo: BigDecimal::zero(),
        por_metodo: subtotales_en_cero(),
    };

    for venta in ventas {
        totales.total = &totales.total + venta.cuenta.total();
        totales.pagado = &totales.pagado + venta.cuenta.pagado();
        totales.saldo = &totales.saldo + venta.cuenta.saldo();
    }
    for pago in pagos {
        let subtotal = totales
            .por_metodo
            .entry(pago.metodo)
            .or_insert_with(BigDecimal::zero);
        *subtotal = &*subtotal + &pago.monto;
    }
    totales
}
