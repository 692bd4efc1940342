// src/usuarios/mod.rs

pub mod auth_middleware;
pub mod usuario_router;
pub mod usuario_structs;
