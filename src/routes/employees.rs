use actix_web::web;

use crate::handlers::employees;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            .route("", web::get().to(employees::get_employees))
            .route("", web::post().to(employees::create_employee))
            .route("/form/open", web::post().to(employees::open_add_form))
            .route("/form/cancel", web::post().to(employees::cancel_add_form))
            .route("/{id}", web::get().to(employees::get_employee))
            .route("/{id}", web::put().to(employees::update_employee))
            .route("/{id}/edit", web::post().to(employees::toggle_edit))
            .route("/{id}/salary", web::post().to(employees::toggle_salary))
            .route("/{id}/delete", web::post().to(employees::delete_employee)),
    );
}
