use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Result;

use payroll_hrd::database::init_database;
use payroll_hrd::{AppState, Config, routes};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("Starting Payroll HRD server");

    // Missing connection settings are fatal
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Configuration loaded (environment: {})", config.environment);

    let pool = init_database(&config).await?;

    let server_address = config.server_address();
    let client_base_url = config.client_base_url.clone();
    let app_state = web::Data::new(AppState::postgres(config, pool));

    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
                    .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
                    .expose_headers(vec!["Content-Disposition"])
                    .max_age(3600),
            )
            .wrap(Logger::new(r#"%a "%r" %s %b "%{User-Agent}i" %T"#))
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
