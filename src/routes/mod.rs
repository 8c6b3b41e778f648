use actix_web::web;

use crate::handlers;

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod payroll;
pub mod view;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::index)
        .service(handlers::health)
        .service(
            web::scope("/api/v1")
                .configure(auth::configure)
                .configure(view::configure)
                .configure(dashboard::configure)
                .configure(employees::configure)
                .configure(attendance::configure)
                .configure(payroll::configure),
        );
}
