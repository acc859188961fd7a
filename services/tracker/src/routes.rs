use axum::extract::State;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes_data::LEGACY_PATHS;
use crate::state::SharedState;

pub fn router(state: SharedState) -> Router {
    let mut app = Router::new()
        .route("/datasets", get(crate::routes_data::get_datasets))
        .route("/data/:dataset", get(crate::routes_data::get_document))
        .route(
            "/dataChange",
            get(crate::routes_admin::get_form).post(crate::routes_admin::post_change),
        )
        .route("/status", get(crate::routes_status::get_status));

    for (path, dataset) in LEGACY_PATHS {
        app = app.route(
            path,
            get(move |State(state): State<SharedState>| {
                crate::routes_data::serve_document(state, dataset.to_string())
            }),
        );
    }

    app.layer(CorsLayer::permissive()).with_state(state)
}
