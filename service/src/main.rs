use presage_core::table::store::TableStore;
use presage_service::feed::{AnnouncementFeed, LogFeed};
use presage_service::state::ServiceState;
use presage_service::{commands, health, readline, runtime};
use presage_types::ServiceConfig;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: ServiceConfig = confy::load("presage", None).unwrap_or_default();
    let config = config.with_env_overrides();

    let store = if config.table_path.is_empty() {
        TableStore::new(TableStore::default_path())
    } else {
        TableStore::new(config.table_path.clone())
    };

    let mut service = ServiceState::new(config, store);
    match service.store.load() {
        Ok(table) => service.cache.table = table,
        Err(e) => tracing::error!("table load failed, starting empty: {e}"),
    }
    let health_port = service.config.health_port;
    let state = service.shared();

    let feed: Arc<dyn AnnouncementFeed> = Arc::new(LogFeed::new());

    let health_task = tokio::spawn(health::serve(Arc::clone(&state), health_port));
    let resume_task = runtime::spawn_auto_resume(Arc::clone(&state), Arc::clone(&feed));

    tracing::info!("presage console ready, `help` lists commands");
    loop {
        let line = match readline() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("console read failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match commands::respond(&line, Arc::clone(&state), Arc::clone(&feed)).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => println!("{e}"),
        }
    }

    resume_task.abort();
    health_task.abort();
    tracing::info!("shutting down");
}
