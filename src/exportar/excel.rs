// src/exportar/excel.rs

use std::io::Write;

use crate::precios::calculo::formatear_monto;
use crate::shared::error::{ErrorApp, Resultado};
use crate::ventas::ventas_structs::Venta;

/// BOM UTF-8 para que Excel abra bien las tildes
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Mismas columnas que la vista de ventas.
pub const COLUMNAS: [&str; 19] = [
    "ID", "Fecha", "Cliente", "Material", "Acabado", "Detalle", "Ancho (m)", "Alto (m)",
    "Área (m²)", "Diseño", "Precio m²", "Total", "Pagado", "Saldo", "Método de pago",
    "Estado de pago", "Entrega", "Cerrado", "Usuario",
];

fn fila(venta: &Venta) -> Vec<String> {
    vec![
        venta.id.to_string(),
        venta.creado_en.format("%Y-%m-%d %H:%M").to_string(),
        venta.cliente.clone(),
        venta.material.etiqueta().to_string(),
        venta.acabado.etiqueta().to_string(),
        venta.detalle.clone().unwrap_or_default(),
        formatear_monto(&venta.ancho),
        formatear_monto(&venta.alto),
        formatear_monto(&venta.area),
        venta.diseno.etiqueta().to_string(),
        formatear_monto(&venta.precio_m2),
        formatear_monto(venta.cuenta.total()),
        formatear_monto(venta.cuenta.pagado()),
        formatear_monto(venta.cuenta.saldo()),
        venta.metodo_pago.etiqueta().to_string(),
        venta.cuenta.estado().etiqueta().to_string(),
        venta.estado_entrega.etiqueta().to_string(),
        if venta.cerrado { "Sí" } else { "No" }.to_string(),
        venta.usuario.clone(),
    ]
}

/// Hoja de cálculo (CSV separado por punto y coma) con una fila por venta.
pub fn generar_excel(ventas: &[Venta]) -> Resultado<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.write_all(BOM)?;

    let mut escritor = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(buffer);
    escritor.write_record(COLUMNAS)?;
    for venta in ventas {
        escritor.write_record(fila(venta))?;
    }

    escritor
        .into_inner()
        .map_err(|e| ErrorApp::Exportacion(format!("No se pudo cerrar la hoja: {}", e)))
}
