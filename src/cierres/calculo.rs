// src/cierres/calculo.rs

use std::collections::HashSet;

use bigdecimal::{BigDecimal, Zero};

use super::cierres_structs::{subtotales_en_cero, ResumenCierre};
use crate::ventas::ventas_structs::{Pago, Venta};

/// Ids de las ventas que pueden entrar en un cierre, en orden de id.
pub fn ventas_cerrables(ventas: &[Venta]) -> Vec<i64> {
    let mut ids: Vec<i64> = ventas.iter().filter(|v| v.es_cerrable()).map(|v| v.id).collect();
    ids.sort_unstable();
    ids
}

/// Suma los pagos de las ventas indicadas agrupados por método.
/// Devuelve `None` si no hay ventas: "nada que cerrar" no es un error.
pub fn resumir(ventas_ids: Vec<i64>, pagos: &[Pago]) -> Option<ResumenCierre> {
    if ventas_ids.is_empty() {
        return None;
    }

    let incluidas: HashSet<i64> = ventas_ids.iter().copied().collect();
    let mut subtotales = subtotales_en_cero();
    let mut total_general = BigDecimal::zero();

    for pago in pagos.iter().filter(|p| incluidas.contains(&p.venta_id)) {
        let subtotal = subtotales.entry(pago.metodo).or_insert_with(BigDecimal::zero);
        *subtotal = &*subtotal + &pago.monto;
        total_general = &total_general + &pago.monto;
    }

    Some(ResumenCierre {
        ventas_ids,
        total_general,
        subtotales,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use chrono::Utc;

    use crate::precios::precios_structs::{Acabado, Diseno, Material};
    use crate::ventas::ventas_structs::{MetodoPago, NuevaVenta};

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn venta(id: i64, entregada: bool, pagada: bool) -> Venta {
        let datos = NuevaVenta {
            cliente: format!("Cliente {}", id),
            ancho: dec("1"),
            alto: dec("1"),
            diseno: Diseno::ConDiseno,
            material: Material::Lona8oz,
            acabado: Acabado::SinAcabado,
            detalle: None,
            adelanto: None,
            metodo_pago: MetodoPago::Efectivo,
            entregado: entregada,
        };
        let (mut v, _) = Venta::nueva(&datos, "caja", Utc::now()).unwrap();
        v.id = id;
        if pagada {
            v.completar_pago(None, "caja", Utc::now()).unwrap();
        }
        v
    }

    fn pago(id: i64, venta_id: i64, monto: &str, metodo: MetodoPago) -> Pago {
        Pago {
            id,
            venta_id,
            monto: dec(monto),
            metodo,
            usuario: "caja".to_string(),
            creado_en: Utc::now(),
        }
    }

    #[test]
    fn selecciona_solo_entregadas_pagadas_y_abiertas() {
        let mut cerrada = venta(4, true, true);
        cerrada.cerrado = true;
        let ventas = vec![
            venta(3, true, true),
            venta(1, true, true),
            venta(2, false, true),
            cerrada,
            venta(5, true, false),
        ];
        assert_eq!(ventas_cerrables(&ventas), vec![1, 3]);
    }

    #[test]
    fn sin_ventas_no_hay_cierre() {
        assert!(resumir(vec![], &[pago(1, 1, "10", MetodoPago::Yape)]).is_none());
    }

    #[test]
    fn agrupa_pagos_por_metodo() {
        let pagos = vec![
            pago(1, 1, "30", MetodoPago::Efectivo),
            pago(2, 1, "70", MetodoPago::Yape),
            pago(3, 2, "41.60", MetodoPago::Yape),
            // venta fuera del cierre
            pago(4, 9, "500", MetodoPago::Tarjeta),
        ];
        let resumen = resumir(vec![1, 2], &pagos).unwrap();

        assert_eq!(resumen.total_general, dec("141.60"));
        assert_eq!(resumen.subtotales[&MetodoPago::Efectivo], dec("30"));
        assert_eq!(resumen.subtotales[&MetodoPago::Yape], dec("111.60"));
        assert!(resumen.subtotales[&MetodoPago::Tarjeta].is_zero());
        assert_eq!(resumen.subtotales.len(), MetodoPago::TODOS.len());

        let suma = resumen
            .subtotales
            .values()
            .fold(BigDecimal::zero(), |acc, v| acc + v);
        assert_eq!(suma, resumen.total_general);
    }
}
