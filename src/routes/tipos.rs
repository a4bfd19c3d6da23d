use actix_web::web;

use crate::handlers::tipos;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tipos-cuadrilla")
            .route("", web::get().to(tipos::list_tipos))
            .route("", web::post().to(tipos::create_tipo)),
    );
}
