// src/shared/mod.rs

pub mod decimal_texto;
pub mod error;
pub mod shared_structs;
