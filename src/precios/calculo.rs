// src/precios/calculo.rs

use std::str::FromStr;

use bigdecimal::{BigDecimal, Signed};

use super::precios_structs::{
    Acabado, Catalogo, Cotizacion, Diseno, EntradaCotizacion, Material, OpcionCatalogo,
    ANCHOS_ESTANDAR,
};
use crate::shared::error::{ErrorApp, Resultado};

/// Calcula el precio de un pedido:
/// `total = ancho × alto × precio_m2 × material × acabado`.
///
/// No se redondea aquí; el redondeo a dos decimales es solo de presentación.
pub fn cotizar(entrada: &EntradaCotizacion) -> Resultado<Cotizacion> {
    if !entrada.ancho.is_positive() {
        return Err(ErrorApp::Validacion("El ancho debe ser mayor que cero.".to_string()));
    }
    if !entrada.alto.is_positive() {
        return Err(ErrorApp::Validacion("El alto debe ser mayor que cero.".to_string()));
    }

    let area = &entrada.ancho * &entrada.alto;
    let precio_m2 = entrada.diseno.precio_m2();
    let multiplicador = entrada.material.multiplicador() * entrada.acabado.multiplicador();
    let total = &area * &precio_m2 * &multiplicador;

    Ok(Cotizacion {
        area,
        precio_m2,
        multiplicador,
        total,
    })
}

/// Redondea a céntimos para mostrar o exportar.
pub fn redondear(valor: &BigDecimal) -> BigDecimal {
    valor.round(2).with_scale(2)
}

/// "41.60" a partir de 41.6
pub fn formatear_monto(valor: &BigDecimal) -> String {
    redondear(valor).to_string()
}

pub fn formatear_soles(valor: &BigDecimal) -> String {
    format!("S/. {}", formatear_monto(valor))
}

pub fn catalogo() -> Catalogo {
    Catalogo {
        anchos: ANCHOS_ESTANDAR
            .iter()
            .filter_map(|a| BigDecimal::from_str(a).ok())
            .collect(),
        disenos: Diseno::TODOS
            .into_iter()
            .map(|d| OpcionCatalogo {
                codigo: d.as_str(),
                etiqueta: d.etiqueta(),
                valor: d.precio_m2(),
            })
            .collect(),
        materiales: Material::TODOS
            .into_iter()
            .map(|m| OpcionCatalogo {
                codigo: m.as_str(),
                etiqueta: m.etiqueta(),
                valor: m.multiplicador(),
            })
            .collect(),
        acabados: Acabado::TODOS
            .into_iter()
            .map(|a| OpcionCatalogo {
                codigo: a.as_str(),
                etiqueta: a.etiqueta(),
                valor: a.multiplicador(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn entrada(ancho: &str, alto: &str, diseno: Diseno) -> EntradaCotizacion {
        EntradaCotizacion {
            ancho: dec(ancho),
            alto: dec(alto),
            diseno,
            material: Material::Lona8oz,
            acabado: Acabado::SinAcabado,
        }
    }

    #[test]
    fn banner_sin_diseno_de_1_60_por_2() {
        let c = cotizar(&entrada("1.60", "2.00", Diseno::SinDiseno)).unwrap();
        assert_eq!(c.area, dec("3.20"));
        assert_eq!(c.precio_m2, dec("13"));
        assert_eq!(c.total, dec("41.60"));
        assert_eq!(formatear_monto(&c.area), "3.20");
        assert_eq!(formatear_soles(&c.total), "S/. 41.60");
    }

    #[test]
    fn con_diseno_cuesta_diez_por_m2() {
        let c = cotizar(&entrada("1.10", "1.00", Diseno::ConDiseno)).unwrap();
        assert_eq!(c.total, dec("11.00"));
    }

    #[test]
    fn aplica_modificadores_de_material_y_acabado() {
        let mut e = entrada("2.00", "1.00", Diseno::ConDiseno);
        e.material = Material::Microperforado;
        e.acabado = Acabado::Laminado;
        let c = cotizar(&e).unwrap();
        // 2 × 10 × 1.25 × 1.25
        assert_eq!(c.multiplicador, dec("1.5625"));
        assert_eq!(c.total, dec("31.25"));
    }

    #[test]
    fn rechaza_medidas_no_positivas() {
        assert!(matches!(
            cotizar(&entrada("0", "2", Diseno::SinDiseno)),
            Err(ErrorApp::Validacion(_))
        ));
        assert!(matches!(
            cotizar(&entrada("1.6", "-1", Diseno::SinDiseno)),
            Err(ErrorApp::Validacion(_))
        ));
    }

    #[test]
    fn redondea_solo_al_formatear() {
        let c = cotizar(&entrada("1.10", "0.33", Diseno::SinDiseno)).unwrap();
        assert_eq!(c.total, dec("4.719"));
        assert_eq!(formatear_monto(&c.total), "4.72");
    }

    #[test]
    fn catalogo_lista_todas_las_opciones() {
        let cat = catalogo();
        assert_eq!(cat.anchos.len(), 4);
        assert_eq!(cat.disenos.len(), 2);
        assert_eq!(cat.materiales.len(), 4);
        assert!(cat
            .materiales
            .iter()
            .chain(cat.acabados.iter())
            .all(|o| o.valor >= dec("1") && o.valor <= dec("1.25")));
    }

    proptest! {
        #[test]
        fn total_es_producto_de_factores(ancho in 1u32..500, alto in 1u32..500, con in any::<bool>()) {
            let diseno = if con { Diseno::ConDiseno } else { Diseno::SinDiseno };
            let e = EntradaCotizacion {
                ancho: BigDecimal::new(ancho.into(), 2),
                alto: BigDecimal::new(alto.into(), 2),
                diseno,
                material: Material::Vinil,
                acabado: Acabado::Ojales,
            };
            let c = cotizar(&e).unwrap();
            let esperado = &e.ancho * &e.alto * diseno.precio_m2() * dec("1.20") * dec("1.05");
            prop_assert_eq!(c.total, esperado);
        }
    }
}
