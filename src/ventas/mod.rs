// src/ventas/mod.rs

// Tipos de venta y pago con sus invariantes
pub mod ventas_structs;
// Rutas de registro, cobro y entrega
pub mod ventas_router;
