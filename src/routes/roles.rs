use actix_web::web;

use crate::handlers::roles;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/menu", web::get().to(roles::get_menu)).service(
        web::scope("/roles")
            .route("/{rol}/permisos", web::get().to(roles::get_permisos))
            .route("/{rol}/permisos", web::put().to(roles::update_permisos)),
    );
}
