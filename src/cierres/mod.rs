// src/cierres/mod.rs

pub mod calculo;
pub mod cierres_router;
pub mod cierres_structs;
