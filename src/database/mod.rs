use std::str::FromStr;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::Config;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod utils;

/// Connects to the remote database. The access key from the configuration is
/// applied as the connection password, overriding any password in the URL.
pub async fn init_database(config: &Config) -> anyhow::Result<PgPool> {
    let options = PgConnectOptions::from_str(&config.database_url)?
        .password(&config.database_access_key);

    log::info!("Connecting to remote database");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;
    log::info!("Database connection pool ready");

    Ok(pool)
}
