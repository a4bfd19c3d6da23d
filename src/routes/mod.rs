use actix_web::web;

pub mod cuadrillas;
pub mod registros;
pub mod roles;
pub mod tipos;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(cuadrillas::configure)
            .configure(registros::configure)
            .configure(tipos::configure)
            .configure(roles::configure),
    );
}
