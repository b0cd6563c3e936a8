use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use unitime_api::config::ApiConfig;
use unitime_core::{engine::TimetableEngine, store::TimetableStore};
use unitime_db::{create_pool, schema::initialize_database, store::PgTimetableStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.database_max_connections).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Wire the engine to Postgres
    let store: Arc<dyn TimetableStore> = Arc::new(PgTimetableStore::new(db_pool));
    let engine = TimetableEngine::new(store).with_options(config.engine_options());

    // Start API server
    unitime_api::start_server(config, engine).await?;

    Ok(())
}
