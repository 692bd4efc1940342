// src/exportar/mod.rs

pub mod excel;
pub mod exportar_router;
pub mod pdf;
pub mod resumen;
