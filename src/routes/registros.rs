use actix_web::web;

use crate::handlers::registros;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/registros-reclamo")
            .route("/{id}/estado", web::put().to(registros::update_estado)),
    );
}
