pub mod cuadrillas;
pub mod mensajes;
pub mod registros;
pub mod roles;
pub mod shared;
pub mod tipos;
