use color_eyre::eyre::{Result, WrapErr};
use devdesk_api::config::ApiConfig;
use devdesk_db::{create_pool, schema::initialize_database};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // `.env` is optional
    dotenv().ok();

    let config = ApiConfig::from_env().wrap_err("Invalid DevDesk configuration")?;

    let db_pool = create_pool(&config.database_url)
        .await
        .wrap_err("Could not connect to the DevDesk database")?;

    // Tables and indexes are created idempotently on every boot
    initialize_database(&db_pool)
        .await
        .wrap_err("Could not prepare the DevDesk schema")?;

    devdesk_api::start_server(config, db_pool).await
}
