use actix_web::web;

use crate::handlers::{dashboard, reports};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(dashboard::get_dashboard))
        .route("/reports", web::get().to(reports::get_reports));
}
