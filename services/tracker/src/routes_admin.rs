use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use tracing::{error, info, warn};

use roster::RosterError;

use crate::error::ServiceError;
use crate::merge::SolvedCount;
use crate::state::SharedState;
use crate::update::UpdateOutcome;

const ADMIN_FORM: &str = include_str!("../assets/admin.html");

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeForm {
    pub roll_number: String,
    pub leetcode_url: String,
    pub password: String,
}

pub async fn get_form() -> Html<&'static str> {
    Html(ADMIN_FORM)
}

pub async fn post_change(
    State(state): State<SharedState>,
    Form(form): Form<ChangeForm>,
) -> (StatusCode, String) {
    if form.password != state.config.admin_password {
        warn!(roll = %form.roll_number, "dataChange: rejected bad password");
        return (StatusCode::UNAUTHORIZED, "Wrong password".to_string());
    }

    let roll = form.roll_number.trim();
    let url = form.leetcode_url.as_str();
    info!(roll = %roll, url = %url, "dataChange: requested");

    match state.update.update_profile(roll, url).await {
        Ok(UpdateOutcome::Applied(applied)) => {
            let msg = match applied.solved {
                SolvedCount::Fetched(n) => {
                    format!("URL changed for {} with new Problems solved = {n}", applied.name)
                }
                SolvedCount::FetchFailed => format!(
                    "URL changed for {} but LeetCode stats could not be fetched; showing 0 until the next refresh",
                    applied.name
                ),
                SolvedCount::NoProfile => format!(
                    "URL changed for {} but it is not a LeetCode profile URL; no stats available",
                    applied.name
                ),
            };
            (StatusCode::OK, msg)
        }
        Ok(UpdateOutcome::NotFound) => (StatusCode::NOT_FOUND, "Wrong Roll".to_string()),
        Err(ServiceError::Roster(RosterError::InvalidValue { reason, .. })) => {
            (StatusCode::BAD_REQUEST, format!("Invalid URL: {reason}"))
        }
        Err(e) => {
            error!(roll = %roll, "dataChange failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Update failed: {e}"))
        }
    }
}
