// src/ventas/ventas_structs.rs

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Signed, Zero};
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

use crate::precios::calculo::{cotizar, formatear_monto, redondear};
use crate::precios::precios_structs::{Acabado, Diseno, EntradaCotizacion, Material};
use crate::shared::decimal_texto;
use crate::shared::error::{ErrorApp, Resultado};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetodoPago {
    Efectivo,
    Yape,
    Plin,
    Transferencia,
    Tarjeta,
}

impl MetodoPago {
    pub const TODOS: [MetodoPago; 5] = [
        MetodoPago::Efectivo,
        MetodoPago::Yape,
        MetodoPago::Plin,
        MetodoPago::Transferencia,
        MetodoPago::Tarjeta,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetodoPago::Efectivo => "efectivo",
            MetodoPago::Yape => "yape",
            MetodoPago::Plin => "plin",
            MetodoPago::Transferencia => "transferencia",
            MetodoPago::Tarjeta => "tarjeta",
        }
    }

    pub fn etiqueta(self) -> &'static str {
        match self {
            MetodoPago::Efectivo => "Efectivo",
            MetodoPago::Yape => "Yape",
            MetodoPago::Plin => "Plin",
            MetodoPago::Transferencia => "Transferencia",
            MetodoPago::Tarjeta => "Tarjeta",
        }
    }
}

impl FromStr for MetodoPago {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetodoPago::TODOS
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Método de pago desconocido: {}", s))
    }
}

impl fmt::Display for MetodoPago {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.etiqueta())
    }
}

/// Derivado del saldo: `Pagado` si no queda nada por cobrar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstadoPago {
    Pagado,
    Pendiente,
}

impl EstadoPago {
    pub fn as_str(self) -> &'static str {
        match self {
            EstadoPago::Pagado => "pagado",
            EstadoPago::Pendiente => "pendiente",
        }
    }

    pub fn etiqueta(self) -> &'static str {
        match self {
            EstadoPago::Pagado => "Pagado",
            EstadoPago::Pendiente => "Pendiente",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstadoEntrega {
    Pendiente,
    Entregado,
}

impl EstadoEntrega {
    pub fn as_str(self) -> &'static str {
        match self {
            EstadoEntrega::Pendiente => "pendiente",
            EstadoEntrega::Entregado => "entregado",
        }
    }

    pub fn etiqueta(self) -> &'static str {
        match self {
            EstadoEntrega::Pendiente => "Pendiente",
            EstadoEntrega::Entregado => "Entregado",
        }
    }
}

impl FromStr for EstadoEntrega {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(EstadoEntrega::Pendiente),
            "entregado" => Ok(EstadoEntrega::Entregado),
            otro => Err(format!("Estado de entrega desconocido: {}", otro)),
        }
    }
}

/// Estado de cobro de una venta. Los campos son privados para que
/// `pagado + saldo == total` se cumpla después de cada operación.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuenta {
    total: BigDecimal,
    pagado: BigDecimal,
    saldo: BigDecimal,
}

impl Cuenta {
    /// Abre la cuenta de una venta nueva con un adelanto opcional.
    pub fn nueva(total: BigDecimal, adelanto: BigDecimal) -> Resultado<Self> {
        if total.is_negative() {
            return Err(ErrorApp::Validacion("El total no puede ser negativo.".to_string()));
        }
        if adelanto.is_negative() {
            return Err(ErrorApp::Validacion("El adelanto no puede ser negativo.".to_string()));
        }
        if adelanto > total {
            return Err(ErrorApp::Validacion(
                "El adelanto no puede superar el total.".to_string(),
            ));
        }
        let saldo = &total - &adelanto;
        Ok(Cuenta {
            total,
            pagado: adelanto,
            saldo,
        })
    }

    /// Reconstruye una cuenta leída del almacén, verificando el invariante.
    pub fn restaurar(total: BigDecimal, pagado: BigDecimal, saldo: BigDecimal) -> Resultado<Self> {
        if pagado.is_negative() || saldo.is_negative() || &pagado + &saldo != total {
            return Err(ErrorApp::Almacen(format!(
                "Cuenta inconsistente: pagado {} + saldo {} != total {}",
                pagado, saldo, total
            )));
        }
        Ok(Cuenta {
            total,
            pagado,
            saldo,
        })
    }

    /// Aplica un abono y devuelve el monto efectivamente cobrado.
    ///
    /// El saldo se muestra redondeado a céntimos; un monto que coincide con
    /// ese saldo redondeado cancela el saldo exacto.
    pub fn abonar(&mut self, monto: &BigDecimal) -> Resultado<BigDecimal> {
        if !monto.is_positive() {
            return Err(ErrorApp::Validacion("El monto debe ser mayor que cero.".to_string()));
        }
        if self.saldo.is_zero() {
            return Err(ErrorApp::Validacion("La venta no tiene saldo pendiente.".to_string()));
        }
        if redondear(monto) == redondear(&self.saldo) {
            return Ok(self.liquidar());
        }
        if monto > &self.saldo {
            return Err(ErrorApp::Validacion(format!(
                "El monto {} supera el saldo pendiente {}.",
                formatear_monto(monto),
                formatear_monto(&self.saldo)
            )));
        }
        self.pagado = &self.pagado + monto;
        self.saldo = &self.saldo - monto;
        Ok(monto.clone())
    }

    /// Cancela el saldo completo y devuelve lo que faltaba cobrar.
    pub fn liquidar(&mut self) -> BigDecimal {
        let restante = std::mem::replace(&mut self.saldo, BigDecimal::zero());
        self.pagado = self.total.clone();
        restante
    }

    pub fn total(&self) -> &BigDecimal {
        &self.total
    }

    pub fn pagado(&self) -> &BigDecimal {
        &self.pagado
    }

    pub fn saldo(&self) -> &BigDecimal {
        &self.saldo
    }

    pub fn estado(&self) -> EstadoPago {
        if self.saldo.is_zero() {
            EstadoPago::Pagado
        } else {
            EstadoPago::Pendiente
        }
    }
}

impl Serialize for Cuenta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Cuenta", 4)?;
        s.serialize_field("total", &self.total)?;
        s.serialize_field("pagado", &self.pagado)?;
        s.serialize_field("saldo", &self.saldo)?;
        s.serialize_field("estado_pago", &self.estado())?;
        s.end()
    }
}

/// Una venta registrada en el mostrador.
#[derive(Debug, Clone, Serialize)]
pub struct Venta {
    pub id: i64,
    pub cliente: String,
    pub material: Material,
    pub acabado: Acabado,
    pub detalle: Option<String>,
    pub ancho: BigDecimal,
    pub alto: BigDecimal,
    pub area: BigDecimal,
    pub diseno: Diseno,
    pub precio_m2: BigDecimal,
    #[serde(flatten)]
    pub cuenta: Cuenta,
    pub metodo_pago: MetodoPago,
    pub estado_entrega: EstadoEntrega,
    pub cerrado: bool,
    pub cierre_id: Option<i64>,
    pub usuario: String,
    pub creado_en: DateTime<Utc>,
}

impl Venta {
    /// Cotiza y arma una venta a partir del formulario. El id lo asigna el almacén.
    /// Devuelve también el pago del adelanto, si lo hubo.
    pub fn nueva(
        datos: &NuevaVenta,
        usuario: &str,
        ahora: DateTime<Utc>,
    ) -> Resultado<(Venta, Option<PagoNuevo>)> {
        let cliente = datos.cliente.trim();
        if cliente.is_empty() {
            return Err(ErrorApp::Validacion("El nombre del cliente es obligatorio.".to_string()));
        }

        let cotizacion = cotizar(&EntradaCotizacion {
            ancho: datos.ancho.clone(),
            alto: datos.alto.clone(),
            diseno: datos.diseno,
            material: datos.material,
            acabado: datos.acabado,
        })?;

        let adelanto = datos.adelanto.clone().unwrap_or_else(BigDecimal::zero);
        let cuenta = Cuenta::nueva(cotizacion.total, adelanto.clone())?;

        let venta = Venta {
            id: 0,
            cliente: cliente.to_string(),
            material: datos.material,
            acabado: datos.acabado,
            detalle: datos
                .detalle
                .as_ref()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            ancho: datos.ancho.clone(),
            alto: datos.alto.clone(),
            area: cotizacion.area,
            diseno: datos.diseno,
            precio_m2: cotizacion.precio_m2,
            cuenta,
            metodo_pago: datos.metodo_pago,
            estado_entrega: if datos.entregado {
                EstadoEntrega::Entregado
            } else {
                EstadoEntrega::Pendiente
            },
            cerrado: false,
            cierre_id: None,
            usuario: usuario.to_string(),
            creado_en: ahora,
        };

        let pago = if adelanto.is_positive() {
            Some(PagoNuevo {
                monto: adelanto,
                metodo: datos.metodo_pago,
                usuario: usuario.to_string(),
                creado_en: ahora,
            })
        } else {
            None
        };

        Ok((venta, pago))
    }

    fn exigir_abierta(&self) -> Resultado<()> {
        if self.cerrado {
            return Err(ErrorApp::Conflicto(format!(
                "La venta {} ya fue incluida en un cierre de caja.",
                self.id
            )));
        }
        Ok(())
    }

    /// Pago parcial contra el saldo.
    pub fn abonar(
        &mut self,
        monto: BigDecimal,
        metodo: MetodoPago,
        usuario: &str,
        ahora: DateTime<Utc>,
    ) -> Resultado<PagoNuevo> {
        self.exigir_abierta()?;
        let monto = self.cuenta.abonar(&monto)?;
        Ok(PagoNuevo {
            monto,
            metodo,
            usuario: usuario.to_string(),
            creado_en: ahora,
        })
    }

    /// Cobra lo que falte. Si la venta ya estaba pagada no genera pago.
    pub fn completar_pago(
        &mut self,
        metodo: Option<MetodoPago>,
        usuario: &str,
        ahora: DateTime<Utc>,
    ) -> Resultado<Option<PagoNuevo>> {
        self.exigir_abierta()?;
        let restante = self.cuenta.liquidar();
        if restante.is_zero() {
            return Ok(None);
        }
        Ok(Some(PagoNuevo {
            monto: restante,
            metodo: metodo.unwrap_or(self.metodo_pago),
            usuario: usuario.to_string(),
            creado_en: ahora,
        }))
    }

    pub fn marcar_entregada(&mut self) -> Resultado<()> {
        self.exigir_abierta()?;
        self.estado_entrega = EstadoEntrega::Entregado;
        Ok(())
    }

    /// Entregada, sin saldo y todavía fuera de un cierre.
    pub fn es_cerrable(&self) -> bool {
        !self.cerrado
            && self.estado_entrega == EstadoEntrega::Entregado
            && self.cuenta.saldo().is_zero()
    }
}

/// Fila plana de la tabla `ventas` (PostgreSQL y archivo CSV).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VentaFila {
    pub id: i64,
    pub cliente: String,
    pub material: String,
    pub acabado: String,
    pub detalle: Option<String>,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub ancho: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub alto: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub area: BigDecimal,
    pub diseno: String,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub precio_m2: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub total: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub pagado: BigDecimal,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub saldo: BigDecimal,
    pub metodo_pago: String,
    pub estado_pago: String,
    pub estado_entrega: String,
    pub cerrado: bool,
    pub cierre_id: Option<i64>,
    pub usuario: String,
    pub creado_en: DateTime<Utc>,
}

impl From<&Venta> for VentaFila {
    fn from(v: &Venta) -> Self {
        VentaFila {
            id: v.id,
            cliente: v.cliente.clone(),
            material: v.material.as_str().to_string(),
            acabado: v.acabado.as_str().to_string(),
            detalle: v.detalle.clone(),
            ancho: v.ancho.clone(),
            alto: v.alto.clone(),
            area: v.area.clone(),
            diseno: v.diseno.as_str().to_string(),
            precio_m2: v.precio_m2.clone(),
            total: v.cuenta.total().clone(),
            pagado: v.cuenta.pagado().clone(),
            saldo: v.cuenta.saldo().clone(),
            metodo_pago: v.metodo_pago.as_str().to_string(),
            estado_pago: v.cuenta.estado().as_str().to_string(),
            estado_entrega: v.estado_entrega.as_str().to_string(),
            cerrado: v.cerrado,
            cierre_id: v.cierre_id,
            usuario: v.usuario.clone(),
            creado_en: v.creado_en,
        }
    }
}

impl TryFrom<VentaFila> for Venta {
    type Error = ErrorApp;

    fn try_from(f: VentaFila) -> Result<Self, Self::Error> {
        Ok(Venta {
            id: f.id,
            cliente: f.cliente,
            material: f.material.parse().map_err(ErrorApp::Almacen)?,
            acabado: f.acabado.parse().map_err(ErrorApp::Almacen)?,
            detalle: f.detalle,
            ancho: f.ancho,
            alto: f.alto,
            area: f.area,
            diseno: f.diseno.parse().map_err(ErrorApp::Almacen)?,
            precio_m2: f.precio_m2,
            cuenta: Cuenta::restaurar(f.total, f.pagado, f.saldo)?,
            metodo_pago: f.metodo_pago.parse().map_err(ErrorApp::Almacen)?,
            estado_entrega: f.estado_entrega.parse().map_err(ErrorApp::Almacen)?,
            cerrado: f.cerrado,
            cierre_id: f.cierre_id,
            usuario: f.usuario,
            creado_en: f.creado_en,
        })
    }
}

/// Pago aún no guardado; el almacén le asigna id y venta.
#[derive(Debug, Clone, PartialEq)]
pub struct PagoNuevo {
    pub monto: BigDecimal,
    pub metodo: MetodoPago,
    pub usuario: String,
    pub creado_en: DateTime<Utc>,
}

/// Un cobro (adelanto, abono o cancelación) aplicado a una venta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pago {
    pub id: i64,
    pub venta_id: i64,
    pub monto: BigDecimal,
    pub metodo: MetodoPago,
    pub usuario: String,
    pub creado_en: DateTime<Utc>,
}

impl Pago {
    pub fn desde_nuevo(id: i64, venta_id: i64, nuevo: PagoNuevo) -> Self {
        Pago {
            id,
            venta_id,
            monto: nuevo.monto,
            metodo: nuevo.metodo,
            usuario: nuevo.usuario,
            creado_en: nuevo.creado_en,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PagoFila {
    pub id: i64,
    pub venta_id: i64,
    #[serde(deserialize_with = "decimal_texto::deserialize")]
    pub monto: BigDecimal,
    pub metodo: String,
    pub usuario: String,
    pub creado_en: DateTime<Utc>,
}

impl From<&Pago> for PagoFila {
    fn from(p: &Pago) -> Self {
        PagoFila {
            id: p.id,
            venta_id: p.venta_id,
            monto: p.monto.clone(),
            metodo: p.metodo.as_str().to_string(),
            usuario: p.usuario.clone(),
            creado_en: p.creado_en,
        }
    }
}

impl TryFrom<PagoFila> for Pago {
    type Error = ErrorApp;

    fn try_from(f: PagoFila) -> Result<Self, Self::Error> {
        Ok(Pago {
            id: f.id,
            venta_id: f.venta_id,
            monto: f.monto,
            metodo: f.metodo.parse().map_err(ErrorApp::Almacen)?,
            usuario: f.usuario,
            creado_en: f.creado_en,
        })
    }
}

/// Datos del formulario de registro de venta.
#[derive(Debug, Clone, Deserialize)]
pub struct NuevaVenta {
    pub cliente: String,
    pub ancho: BigDecimal,
    pub alto: BigDecimal,
    pub diseno: Diseno,
    #[serde(default = "material_por_defecto")]
    pub material: Material,
    #[serde(default = "acabado_por_defecto")]
    pub acabado: Acabado,
    pub detalle: Option<String>,
    pub adelanto: Option<BigDecimal>,
    pub metodo_pago: MetodoPago,
    #[serde(default)]
    pub entregado: bool,
}

fn material_por_defecto() -> Material {
    Material::Lona8oz
}

fn acabado_por_defecto() -> Acabado {
    Acabado::SinAcabado
}

#[derive(Debug, Deserialize)]
pub struct AbonoRequest {
    pub monto: BigDecimal,
    pub metodo: MetodoPago,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompletarPagoRequest {
    pub metodo: Option<MetodoPago>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn formulario(adelanto: Option<&str>) -> NuevaVenta {
        NuevaVenta {
            cliente: "Ferretería Lucho".to_string(),
            ancho: dec("1.60"),
            alto: dec("2.00"),
            diseno: Diseno::SinDiseno,
            material: Material::Lona8oz,
            acabado: Acabado::SinAcabado,
            detalle: Some("  ".to_string()),
            adelanto: adelanto.map(dec),
            metodo_pago: MetodoPago::Yape,
            entregado: false,
        }
    }

    #[test]
    fn adelanto_deja_saldo_pendiente() {
        let mut cuenta = Cuenta::nueva(dec("100"), dec("30")).unwrap();
        assert_eq!(cuenta.pagado(), &dec("30"));
        assert_eq!(cuenta.saldo(), &dec("70"));
        assert_eq!(cuenta.estado(), EstadoPago::Pendiente);

        let restante = cuenta.liquidar();
        assert_eq!(restante, dec("70"));
        assert_eq!(cuenta.pagado(), &dec("100"));
        assert!(cuenta.saldo().is_zero());
        assert_eq!(cuenta.estado(), EstadoPago::Pagado);
    }

    #[test]
    fn adelanto_mayor_al_total_es_invalido() {
        assert!(matches!(
            Cuenta::nueva(dec("100"), dec("100.01")),
            Err(ErrorApp::Validacion(_))
        ));
        assert!(Cuenta::nueva(dec("100"), dec("-1")).is_err());
    }

    #[test]
    fn abono_no_puede_superar_el_saldo() {
        let mut cuenta = Cuenta::nueva(dec("50"), dec("0")).unwrap();
        assert!(cuenta.abonar(&dec("60")).is_err());
        assert!(cuenta.abonar(&dec("0")).is_err());
        assert_eq!(cuenta.abonar(&dec("20")).unwrap(), dec("20"));
        assert_eq!(cuenta.saldo(), &dec("30"));
    }

    #[test]
    fn abono_del_saldo_mostrado_cancela_el_saldo_exacto() {
        // 1.10 × 0.33 × 13 = 4.719, mostrado como 4.72
        let mut cuenta = Cuenta::nueva(dec("4.719"), dec("0")).unwrap();
        assert_eq!(cuenta.abonar(&dec("4.72")).unwrap(), dec("4.719"));
        assert!(cuenta.saldo().is_zero());
        assert_eq!(cuenta.pagado(), &dec("4.719"));
        assert_eq!(cuenta.estado(), EstadoPago::Pagado);
    }

    #[test]
    fn abono_por_encima_del_saldo_redondeado_sigue_siendo_invalido() {
        let mut cuenta = Cuenta::nueva(dec("4.719"), dec("0")).unwrap();
        assert!(matches!(cuenta.abonar(&dec("4.73")), Err(ErrorApp::Validacion(_))));
        assert_eq!(cuenta.saldo(), &dec("4.719"));
    }

    #[test]
    fn restaurar_rechaza_cuentas_descuadradas() {
        assert!(Cuenta::restaurar(dec("10"), dec("4"), dec("6")).is_ok());
        assert!(Cuenta::restaurar(dec("10"), dec("4"), dec("5")).is_err());
    }

    #[test]
    fn venta_nueva_calcula_total_y_pago_de_adelanto() {
        let ahora = Utc::now();
        let (venta, pago) = Venta::nueva(&formulario(Some("10")), "maria", ahora).unwrap();
        assert_eq!(venta.area, dec("3.20"));
        assert_eq!(venta.cuenta.total(), &dec("41.60"));
        assert_eq!(venta.cuenta.saldo(), &dec("31.60"));
        assert_eq!(venta.detalle, None);
        assert_eq!(venta.usuario, "maria");
        let pago = pago.unwrap();
        assert_eq!(pago.monto, dec("10"));
        assert_eq!(pago.metodo, MetodoPago::Yape);
    }

    #[test]
    fn venta_sin_adelanto_no_genera_pago() {
        let (_, pago) = Venta::nueva(&formulario(None), "maria", Utc::now()).unwrap();
        assert!(pago.is_none());
    }

    #[test]
    fn cliente_vacio_es_invalido() {
        let mut datos = formulario(None);
        datos.cliente = "   ".to_string();
        assert!(matches!(
            Venta::nueva(&datos, "maria", Utc::now()),
            Err(ErrorApp::Validacion(_))
        ));
    }

    #[test]
    fn completar_pago_usa_el_metodo_indicado_o_el_de_la_venta() {
        let (mut venta, _) = Venta::nueva(&formulario(Some("1.60")), "maria", Utc::now()).unwrap();
        let pago = venta
            .completar_pago(None, "maria", Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(pago.monto, dec("40"));
        assert_eq!(pago.metodo, MetodoPago::Yape);
        // Ya no queda nada por cobrar
        assert!(venta.completar_pago(Some(MetodoPago::Efectivo), "maria", Utc::now()).unwrap().is_none());
    }

    #[test]
    fn solo_es_cerrable_entregada_y_pagada() {
        let (mut venta, _) = Venta::nueva(&formulario(None), "maria", Utc::now()).unwrap();
        assert!(!venta.es_cerrable());
        venta.marcar_entregada().unwrap();
        assert!(!venta.es_cerrable());
        venta.completar_pago(None, "maria", Utc::now()).unwrap();
        assert!(venta.es_cerrable());
        venta.cerrado = true;
        assert!(!venta.es_cerrable());
    }

    #[test]
    fn venta_cerrada_no_acepta_cambios() {
        let (mut venta, _) = Venta::nueva(&formulario(None), "maria", Utc::now()).unwrap();
        venta.cerrado = true;
        assert!(matches!(venta.marcar_entregada(), Err(ErrorApp::Conflicto(_))));
        assert!(venta.abonar(dec("1"), MetodoPago::Efectivo, "maria", Utc::now()).is_err());
    }

    #[test]
    fn fila_conserva_la_venta() {
        let (venta, _) = Venta::nueva(&formulario(Some("5")), "maria", Utc::now()).unwrap();
        let fila = VentaFila::from(&venta);
        assert_eq!(fila.estado_pago, "pendiente");
        assert_eq!(fila.material, "lona8oz");
        let de_vuelta = Venta::try_from(fila).unwrap();
        assert_eq!(de_vuelta.cuenta, venta.cuenta);
        assert_eq!(de_vuelta.metodo_pago, MetodoPago::Yape);
    }

    #[test]
    fn json_de_venta_incluye_estado_de_pago() {
        let (venta, _) = Venta::nueva(&formulario(None), "maria", Utc::now()).unwrap();
        let json = serde_json::to_value(&venta).unwrap();
        assert_eq!(json["estado_pago"], "pendiente");
        assert_eq!(json["metodo_pago"], "yape");
        assert_eq!(json["estado_entrega"], "pendiente");
    }

    proptest! {
        #[test]
        fn pagado_mas_saldo_es_total(total in 1u32..100_000, adelanto_pct in 0u32..=100, abonos in proptest::collection::vec(1u32..5_000, 0..6)) {
            let total = BigDecimal::new(total.into(), 2);
            let adelanto = (&total * BigDecimal::from(adelanto_pct)) / BigDecimal::from(100);
            let mut cuenta = Cuenta::nueva(total.clone(), adelanto).unwrap();
            prop_assert_eq!(cuenta.pagado() + cuenta.saldo(), total.clone());
            for abono in abonos {
                let _ = cuenta.abonar(&BigDecimal::new(abono.into(), 2));
                prop_assert_eq!(cuenta.pagado() + cuenta.saldo(), total.clone());
            }
            cuenta.liquidar();
            prop_assert_eq!(cuenta.pagado(), &total);
            prop_assert!(cuenta.saldo().is_zero());
        }
    }
}
