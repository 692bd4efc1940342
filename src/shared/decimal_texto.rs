// src/shared/decimal_texto.rs

//! Lectura exacta de montos guardados como texto (archivos CSV).

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{de, Deserialize, Deserializer};

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let texto = String::deserialize(deserializer)?;
    BigDecimal::from_str(texto.trim()).map_err(de::Error::custom)
}
