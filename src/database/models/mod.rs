pub mod asignacion;
pub mod cuadrilla;
pub mod macros;
pub mod mensaje;
pub mod registro_reclamo;
pub mod rol;

// Re-export all models for easy importing
pub use asignacion::*;
pub use cuadrilla::*;
pub use mensaje::*;
pub use registro_reclamo::*;
pub use rol::*;
