// src/reportes/mod.rs

pub mod reportes_router;
pub mod reportes_structs;
