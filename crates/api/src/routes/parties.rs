//! Route definitions for the `/parties` resource.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::parties;
use crate::state::AppState;

/// Routes mounted at `/parties`.
///
/// ```text
/// GET    /                           -> list_parties
/// POST   /                           -> create_party
/// PATCH  /{id}                       -> update_party   (creator)
/// DELETE /{id}                       -> delete_party   (creator)
/// POST   /{id}/members               -> add_member
/// DELETE /{id}/members/{user_id}     -> remove_member
/// POST   /{id}/leave                 -> leave_party
/// GET    /{id}/stats                 -> party_stats
/// GET    /{id}/statuses              -> party_statuses
/// GET    /{id}/daily                 -> party_daily    (?days=N)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parties::list_parties).post(parties::create_party))
        .route(
            "/{id}",
            patch(parties::update_party).delete(parties::delete_party),
        )
        .route("/{id}/members", post(parties::add_member))
        .route("/{id}/members/{user_id}", delete(parties::remove_member))
        .route("/{id}/leave", post(parties::leave_party))
        .route("/{id}/stats", get(parties::party_stats))
        .route("/{id}/statuses", get(parties::party_statuses))
        .route("/{id}/daily", get(parties::party_daily))
}
