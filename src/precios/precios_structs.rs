// src/precios/precios_structs.rs

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Anchos de rollo disponibles en el taller (metros).
pub const ANCHOS_ESTANDAR: [&str; 4] = ["1.10", "1.60", "2.20", "3.20"];

/// Si el cliente trae su diseño o hay que hacerlo. Define el precio por m².
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diseno {
    ConDiseno,
    SinDiseno,
}

impl Diseno {
    pub const TODOS: [Diseno; 2] = [Diseno::ConDiseno, Diseno::SinDiseno];

    /// Precio por m² en soles.
    pub fn precio_m2(self) -> BigDecimal {
        match self {
            Diseno::ConDiseno => BigDecimal::from(10),
            Diseno::SinDiseno => BigDecimal::from(13),
        }
    }

    pub fn etiqueta(self) -> &'static str {
        match self {
            Diseno::ConDiseno => "Sí tiene diseño",
            Diseno::SinDiseno => "No tiene diseño",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Diseno::ConDiseno => "con_diseno",
            Diseno::SinDiseno => "sin_diseno",
        }
    }
}

impl FromStr for Diseno {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Diseno::TODOS
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("Opción de diseño desconocida: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Lona8oz,
    Lona12oz,
    Vinil,
    Microperforado,
}

impl Material {
    pub const TODOS: [Material; 4] = [
        Material::Lona8oz,
        Material::Lona12oz,
        Material::Vinil,
        Material::Microperforado,
    ];

    pub fn multiplicador(self) -> BigDecimal {
        match self {
            Material::Lona8oz => BigDecimal::from(1),
            Material::Lona12oz => BigDecimal::new(115.into(), 2),
            Material::Vinil => BigDecimal::new(120.into(), 2),
            Material::Microperforado => BigDecimal::new(125.into(), 2),
        }
    }

    pub fn etiqueta(self) -> &'static str {
        match self {
            Material::Lona8oz => "Lona 8 onzas (Económico)",
            Material::Lona12oz => "Lona 12 onzas (Premium)",
            Material::Vinil => "Vinil adhesivo",
            Material::Microperforado => "Vinil microperforado",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Material::Lona8oz => "lona8oz",
            Material::Lona12oz => "lona12oz",
            Material::Vinil => "vinil",
            Material::Microperforado => "microperforado",
        }
    }
}

impl FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Material::TODOS
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Material desconocido: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acabado {
    SinAcabado,
    Ojales,
    Tubos,
    Laminado,
}

impl Acabado {
    pub const TODOS: [Acabado; 4] = [
        Acabado::SinAcabado,
        Acabado::Ojales,
        Acabado::Tubos,
        Acabado::Laminado,
    ];

    pub fn multiplicador(self) -> BigDecimal {
        match self {
            Acabado::SinAcabado => BigDecimal::from(1),
            Acabado::Ojales => BigDecimal::new(105.into(), 2),
            Acabado::Tubos => BigDecimal::new(110.into(), 2),
            Acabado::Laminado => BigDecimal::new(125.into(), 2),
        }
    }

    pub fn etiqueta(self) -> &'static str {
        match self {
            Acabado::SinAcabado => "Sin acabado",
            Acabado::Ojales => "Ojales",
            Acabado::Tubos => "Tubos",
            Acabado::Laminado => "Laminado",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Acabado::SinAcabado => "sin_acabado",
            Acabado::Ojales => "ojales",
            Acabado::Tubos => "tubos",
            Acabado::Laminado => "laminado",
        }
    }
}

impl FromStr for Acabado {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Acabado::TODOS
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("Acabado desconocido: {}", s))
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.etiqueta())
    }
}

impl fmt::Display for Acabado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.etiqueta())
    }
}

/// Datos del formulario necesarios para cotizar.
#[derive(Debug, Clone, Deserialize)]
pub struct EntradaCotizacion {
    pub ancho: BigDecimal,
    pub alto: BigDecimal,
    pub diseno: Diseno,
    #[serde(default = "material_por_defecto")]
    pub material: Material,
    #[serde(default = "acabado_por_defecto")]
    pub acabado: Acabado,
}

fn material_por_defecto() -> Material {
    Material::Lona8oz
}

fn acabado_por_defecto() -> Acabado {
    Acabado::SinAcabado
}

/// Resultado del cálculo de precio. Los montos van sin redondear.
#[derive(Debug, Clone, Serialize)]
pub struct Cotizacion {
    pub area: BigDecimal,
    pub precio_m2: BigDecimal,
    pub multiplicador: BigDecimal,
    pub total: BigDecimal,
}

/// Una opción seleccionable del formulario.
#[derive(Debug, Serialize)]
pub struct OpcionCatalogo {
    pub codigo: &'static str,
    pub etiqueta: &'static str,
    pub valor: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct Catalogo {
    pub anchos: Vec<BigDecimal>,
    pub disenos: Vec<OpcionCatalogo>,
    pub materiales: Vec<OpcionCatalogo>,
    pub acabados: Vec<OpcionCatalogo>,
}
