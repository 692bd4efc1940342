// src/precios/mod.rs

pub mod calculo;
pub mod precios_router;
pub mod precios_structs;
