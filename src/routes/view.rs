use actix_web::web;

use crate::handlers::view;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/session", web::get().to(view::get_session))
        .route("/screens/{menu}", web::get().to(view::get_screen));
}
