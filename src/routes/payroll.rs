use actix_web::web;

use crate::handlers::payroll;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payroll")
            .route("/periods", web::get().to(payroll::get_periods))
            .route("/periods", web::post().to(payroll::create_period))
            .route(
                "/periods/{id}/calculate",
                web::post().to(payroll::calculate_period),
            ),
    );
}
