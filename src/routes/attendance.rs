use actix_web::web;

use crate::handlers::attendance;

/// Largest spreadsheet accepted by the upload endpoint.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .route("", web::get().to(attendance::get_attendance))
            .route("/export", web::get().to(attendance::export_attendance))
            .route("/upload", web::post().to(attendance::upload_attendance))
            .route("/upload/save", web::post().to(attendance::save_upload)),
    );
}
