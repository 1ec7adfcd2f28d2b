use std::error::Error;
use std::sync::{Arc, Mutex};

use tracing::info;

use tabledash::infrastructure::config::ServerConfig;
use tabledash::infrastructure::table_store::TableStore;
use tabledash::interfaces::http;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let config = ServerConfig::load()?;
    let store = Arc::new(TableStore::new());
    let logs: Arc<Mutex<Vec<http::LogEntry>>> = Arc::new(Mutex::new(Vec::new()));

    info!(host = %config.host, port = config.port, "Starting tabledash");

    let server = http::start_server(&config, store, logs.clone())?;
    http::add_log(
        &logs,
        "INFO",
        "System",
        &format!("HTTP server started on {}:{}", config.host, config.port),
    );

    server.await?;
    Ok(())
}
