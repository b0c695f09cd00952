use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET    /    -> get_me
/// PATCH  /    -> update_me
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(profile::get_me).patch(profile::update_me))
}
