// src/exportar/pdf.rs

use chrono::NaiveDateTime;
use genpdf::elements::{Break, FrameCellDecorator, Image, PaddedElement, Paragraph, StyledElement, TableLayout};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element, Margins, SimplePageDecorator};

use super::resumen::TotalesVentas;
use crate::config::Configuracion;
use crate::precios::calculo::{formatear_monto, formatear_soles};
use crate::shared::error::{ErrorApp, Resultado};
use crate::ventas::ventas_structs::{MetodoPago, Venta};

const FAMILIA_FUENTE: &str = "LiberationSans";

fn celda(texto: &str, estilo: Style) -> PaddedElement<StyledElement<Paragraph>> {
    Paragraph::new(texto).styled(estilo).padded(Margins::trbl(1, 1, 1, 2))
}

fn celda_derecha(texto: &str, estilo: Style) -> impl Element {
    Paragraph::new(texto)
        .aligned(Alignment::Right)
        .styled(estilo)
        .padded(Margins::trbl(1, 2, 1, 1))
}

fn error_tabla(e: genpdf::error::Error) -> ErrorApp {
    ErrorApp::Exportacion(format!("Error armando tabla del PDF: {}", e))
}

/// Reporte PDF de ventas: encabezado con el negocio, totales, desglose por
/// método de pago y el detalle de cada venta.
///
/// Las fuentes `LiberationSans-*.ttf` deben estar en `directorio_fuentes`.
pub fn generar_pdf(
    config: &Configuracion,
    ventas: &[Venta],
    totales: &TotalesVentas,
    generado_en: NaiveDateTime,
) -> Resultado<Vec<u8>> {
    let fuentes = genpdf::fonts::from_files(&config.directorio_fuentes, FAMILIA_FUENTE, None)
        .map_err(|e| {
            ErrorApp::Exportacion(format!(
                "Error cargando fuentes desde {}: {}",
                config.directorio_fuentes.display(),
                e
            ))
        })?;

    let mut doc = Document::new(fuentes);
    doc.set_title(format!("Reporte de ventas - {}", config.nombre_negocio));
    let mut decorador = SimplePageDecorator::new();
    decorador.set_margins(Margins::trbl(15, 15, 15, 15));
    doc.set_page_decorator(decorador);

    let s_titulo = Style::new().with_font_size(16).bold();
    let s_normal = Style::new().with_font_size(9);
    let s_negrita = Style::new().with_font_size(9).bold();
    let s_chica = Style::new().with_font_size(7);
    let s_chica_negrita = Style::new().with_font_size(7).bold();

    // Encabezado
    if let Some(ruta) = &config.logo {
        match Image::from_path(ruta) {
            Ok(logo) => {
                doc.push(logo.with_alignment(Alignment::Center));
                doc.push(Break::new(0.5));
            }
            // Sin logo el reporte sigue siendo válido
            Err(e) => tracing::warn!(logo = %ruta.display(), error = %e, "no se pudo cargar el logo"),
        }
    }
    doc.push(
        Paragraph::new(config.nombre_negocio.as_str())
            .aligned(Alignment::Center)
            .styled(s_titulo),
    );
    doc.push(
        Paragraph::new(format!(
            "Reporte de ventas - generado el {}",
            generado_en.format("%d/%m/%Y %H:%M")
        ))
        .aligned(Alignment::Center)
        .styled(s_normal),
    );
    doc.push(Break::new(1.0));

    // Totales
    let mut tabla_totales = TableLayout::new(vec![1, 1, 1, 1]);
    tabla_totales.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    tabla_totales
        .row()
        .element(celda("Ventas", s_negrita))
        .element(celda_derecha("Total vendido", s_negrita))
        .element(celda_derecha("Cobrado", s_negrita))
        .element(celda_derecha("Por cobrar", s_negrita))
        .push()
        .map_err(error_tabla)?;
    tabla_totales
        .row()
        .element(celda(&totales.cantidad.to_string(), s_normal))
        .element(celda_derecha(&formatear_soles(&totales.total), s_normal))
        .element(celda_derecha(&formatear_soles(&totales.pagado), s_normal))
        .element(celda_derecha(&formatear_soles(&totales.saldo), s_normal))
        .push()
        .map_err(error_tabla)?;
    doc.push(tabla_totales);
    doc.push(Break::new(1.0));

    // Por método de pago
    doc.push(Paragraph::new("Cobros por método de pago").styled(s_negrita));
    doc.push(Break::new(0.3));
    let mut tabla_metodos = TableLayout::new(vec![2, 1]);
    tabla_metodos.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    for metodo in MetodoPago::TODOS {
        let monto = totales.por_metodo.get(&metodo).cloned().unwrap_or_default();
        tabla_metodos
            .row()
            .element(celda(metodo.etiqueta(), s_normal))
            .element(celda_derecha(&formatear_soles(&monto), s_normal))
            .push()
            .map_err(error_tabla)?;
    }
    doc.push(tabla_metodos);
    doc.push(Break::new(1.0));

    // Detalle
    doc.push(Paragraph::new("Detalle de ventas").styled(s_negrita));
    doc.push(Break::new(0.3));
    let mut tabla = TableLayout::new(vec![1, 3, 5, 3, 3, 2, 2, 2, 2]);
    tabla.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    tabla
        .row()
        .element(celda("ID", s_chica_negrita))
        .element(celda("Fecha", s_chica_negrita))
        .element(celda("Cliente", s_chica_negrita))
        .element(celda("Material", s_chica_negrita))
        .element(celda("Medidas", s_chica_negrita))
        .element(celda_derecha("Total", s_chica_negrita))
        .element(celda_derecha("Pagado", s_chica_negrita))
        .element(celda_derecha("Saldo", s_chica_negrita))
        .element(celda("Pago", s_chica_negrita))
        .push()
        .map_err(error_tabla)?;
    for venta in ventas {
        tabla
            .row()
            .element(celda(&venta.id.to_string(), s_chica))
            .element(celda(&venta.creado_en.format("%d/%m/%Y").to_string(), s_chica))
            .element(celda(&venta.cliente, s_chica))
            .element(celda(venta.material.etiqueta(), s_chica))
            .element(celda(
                &format!("{} x {}", formatear_monto(&venta.ancho), formatear_monto(&venta.alto)),
                s_chica,
            ))
            .element(celda_derecha(&formatear_monto(venta.cuenta.total()), s_chica))
            .element(celda_derecha(&formatear_monto(venta.cuenta.pagado()), s_chica))
            .element(celda_derecha(&formatear_monto(venta.cuenta.saldo()), s_chica))
            .element(celda(venta.cuenta.estado().etiqueta(), s_chica))
            .push()
            .map_err(error_tabla)?;
    }
    doc.push(tabla);

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| ErrorApp::Exportacion(format!("Error generando PDF: {}", e)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::{Local, Utc};

    use crate::exportar::resumen::totalizar;
    use crate::precios::precios_structs::{Acabado, Diseno, Material};
    use crate::ventas::ventas_structs::{NuevaVenta, Pago};

    /// Directorio con `LiberationSans-*.ttf`: `BANNERS_FUENTES`, `./fuentes`
    /// o las rutas habituales de Debian y Fedora.
    fn directorio_con_fuentes() -> Option<PathBuf> {
        let mut candidatos: Vec<PathBuf> = std::env::var_os("BANNERS_FUENTES")
            .map(PathBuf::from)
            .into_iter()
            .collect();
        candidatos.extend(
            [
                "fuentes",
                "/usr/share/fonts/truetype/liberation",
                "/usr/share/fonts/truetype/liberation2",
                "/usr/share/fonts/liberation-sans",
                "/usr/share/fonts/liberation",
            ]
            .iter()
            .map(PathBuf::from),
        );
        candidatos.into_iter().find(|dir| {
            ["Regular", "Bold", "Italic", "BoldItalic"]
                .iter()
                .all(|estilo| dir.join(format!("{}-{}.ttf", FAMILIA_FUENTE, estilo)).is_file())
        })
    }

    fn config_con_fuentes(dir: &Path) -> Configuracion {
        Configuracion {
            directorio_fuentes: dir.to_path_buf(),
            ..Configuracion::default()
        }
    }

    fn ventas_con_pagos() -> (Vec<Venta>, Vec<Pago>) {
        let mut ventas = Vec::new();
        let mut pagos = Vec::new();
        for (id, (cliente, metodo)) in [("Pollería El Rey", MetodoPago::Yape), ("Colegio Andino", MetodoPago::Efectivo)]
            .into_iter()
            .enumerate()
        {
            let datos = NuevaVenta {
                cliente: cliente.to_string(),
                ancho: BigDecimal::from_str("1.60").unwrap(),
                alto: BigDecimal::from_str("2").unwrap(),
                diseno: Diseno::ConDiseno,
                material: Material::Lona12oz,
                acabado: Acabado::Ojales,
                detalle: None,
                adelanto: Some(BigDecimal::from(10)),
                metodo_pago: metodo,
                entregado: false,
            };
            let (mut venta, adelanto) = Venta::nueva(&datos, "maria", Utc::now()).unwrap();
            venta.id = id as i64 + 1;
            pagos.push(Pago::desde_nuevo(id as i64 + 1, venta.id, adelanto.unwrap()));
            ventas.push(venta);
        }
        (ventas, pagos)
    }

    #[test]
    fn sin_fuentes_devuelve_error_de_exportacion() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuracion {
            directorio_fuentes: dir.path().join("no_existe"),
            ..Configuracion::default()
        };
        let totales = totalizar(&[], &[]);
        let resultado = generar_pdf(&config, &[], &totales, Local::now().naive_local());
        assert!(matches!(resultado, Err(ErrorApp::Exportacion(_))));
    }

    #[test]
    fn genera_un_pdf_con_dos_ventas() {
        let Some(fuentes) = directorio_con_fuentes() else {
            eprintln!("LiberationSans no disponible, se omite");
            return;
        };
        let (ventas, pagos) = ventas_con_pagos();
        let totales = totalizar(&ventas, &pagos);
        assert_eq!(totales.cantidad, 2);
        assert_eq!(totales.por_metodo[&MetodoPago::Yape], BigDecimal::from(10));

        let bytes = generar_pdf(&config_con_fuentes(&fuentes), &ventas, &totales, Local::now().naive_local())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn logo_ilegible_no_impide_el_pdf() {
        let Some(fuentes) = directorio_con_fuentes() else {
            eprintln!("LiberationSans no disponible, se omite");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        std::fs::write(&logo, b"esto no es una imagen").unwrap();

        let config = Configuracion {
            logo: Some(logo),
            ..config_con_fuentes(&fuentes)
        };
        let (ventas, pagos) = ventas_con_pagos();
        let totales = totalizar(&ventas, &pagos);
        let bytes = generar_pdf(&config, &ventas, &totales, Local::now().naive_local()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
