pub mod cuadrilla;
pub mod mensaje;
pub mod registro_reclamo;
pub mod rol;

// Re-export all repositories for easy importing
pub use cuadrilla::CuadrillaRepository;
pub use mensaje::MensajeRepository;
pub use registro_reclamo::RegistroReclamoRepository;
pub use rol::RolRepository;
