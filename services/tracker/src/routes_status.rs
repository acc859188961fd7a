use axum::{extract::State, Json};

pub async fn get_status(State(state): State<crate::state::SharedState>) -> Json<serde_json::Value> {
    let last_cycle = state.last_cycle.read().await.clone();
    let running = state.cycle_guard.try_lock().is_err();

    Json(serde_json::json!({
        "provider": state.provider.info(),
        "datasets": state.config.datasets,
        "refresh_secs": state.config.refresh_interval.as_secs(),
        "cycle_running": running,
        "last_cycle": last_cycle,
    }))
}
