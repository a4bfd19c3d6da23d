use actix_web::web;

use crate::handlers::{cuadrillas, mensajes};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cuadrillas")
            .route("", web::get().to(cuadrillas::list_cuadrillas))
            .route("", web::post().to(cuadrillas::create_cuadrilla))
            // Must precede "/{id}" so it is not parsed as an id
            .route(
                "/asignar-reclamo",
                web::post().to(cuadrillas::asignar_reclamo),
            )
            .route("/{id}", web::get().to(cuadrillas::get_cuadrilla))
            .route("/{id}", web::put().to(cuadrillas::update_cuadrilla))
            .route("/{id}", web::delete().to(cuadrillas::delete_cuadrilla))
            .route("/{id}/reclamos", web::get().to(cuadrillas::list_reclamos))
            .route("/{id}/mensajes", web::get().to(mensajes::list_mensajes))
            .route("/{id}/mensajes", web::post().to(mensajes::create_mensaje)),
    );
}
