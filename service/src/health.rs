//! Read-only liveness endpoint.
//!
//! One plain-text line summarizing the service: pause state, last source
//! number, in-flight prediction, table size. No mutation capability.

use crate::state::SharedState;
use axum::{Router, extract::State, routing::get};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(state: SharedState, port: u16) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("health endpoint listening on port {port}");
    axum::serve(listener, app).await
}

async fn health_handler(State(state): State<SharedState>) -> String {
    let s = state.read().await;
    let status = if s.cache.pause.is_paused {
        "STOPPED"
    } else {
        "RUNNING"
    };
    let prediction = s
        .cache
        .record()
        .map(|r| format!("#{}", r.number))
        .unwrap_or_else(|| "free".to_string());
    format!(
        "Presage {status} | Source: #{} | Prediction: {prediction} | Table: {} entries",
        s.cache.last_source_number,
        s.cache.table.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ServiceState;
    use presage_core::Suit;
    use presage_core::table::store::TableStore;
    use presage_types::ServiceConfig;

    fn test_state() -> SharedState {
        let store = TableStore::new(
            std::env::temp_dir().join(format!("presage-health-{}.json", std::process::id())),
        );
        ServiceState::new(ServiceConfig::default(), store).shared()
    }

    #[tokio::test]
    async fn summary_reflects_cache_state() {
        let state = test_state();
        {
            let mut s = state.write().await;
            s.cache.last_source_number = 41;
            s.cache.table.insert(44, Suit::Spades);
        }

        let body = health_handler(State(std::sync::Arc::clone(&state))).await;
        assert!(body.contains("RUNNING"));
        assert!(body.contains("Source: #41"));
        assert!(body.contains("Prediction: free"));
        assert!(body.contains("Table: 1 entries"));

        state.write().await.cache.pause.is_paused = true;
        let body = health_handler(State(std::sync::Arc::clone(&state))).await;
        assert!(body.contains("STOPPED"));
    }
}
