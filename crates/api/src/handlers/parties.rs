//! Handlers for study parties: membership management and the shared
//! leaderboard, live status, and daily chart views.
//!
//! Every route under `/parties/{id}` first resolves the party through
//! [`member_party`], so non-members always see 404 rather than 403.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use slate_core::analytics::{
    day_range, member_daily_series, member_totals, validate_days, window_start, WEEK_DAYS,
};
use slate_core::error::CoreError;
use slate_core::party::{
    ensure_can_remove, ensure_capacity, ensure_creator, member_label, party_full, MemberLookup,
    MAX_PARTY_MEMBERS,
};
use slate_core::types::{DbId, Day};
use slate_core::validation::{validate_text, PARTY_NAME_MAX};
use slate_db::models::party::{AddMember, CreateParty, Party, PartyMember, PartyWithMembers, UpdateParty};
use slate_db::models::user_status::StatusView;
use slate_db::repositories::{
    FocusSessionRepo, MemberInsert, PartyRepo, UserRepo, UserStatusRepo,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DaysParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a party the caller belongs to, or 404.
async fn member_party(pool: &PgPool, party_id: DbId, user_id: DbId) -> AppResult<Party> {
    PartyRepo::find_for_member(pool, party_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Party",
            id: party_id,
        }))
}

fn label_of(member: &PartyMember) -> String {
    member_label(member.username.as_deref(), member.email.as_deref())
}

/// The party's members keyed for label lookup, plus their ids in join order.
async fn roster(pool: &PgPool, party_id: DbId) -> AppResult<(Vec<DbId>, HashMap<DbId, String>)> {
    let members = PartyRepo::members_of(pool, &[party_id]).await?;
    let ids = members.iter().map(|m| m.user_id).collect();
    let labels = members.iter().map(|m| (m.user_id, label_of(m))).collect();
    Ok((ids, labels))
}

fn label_for(labels: &HashMap<DbId, String>, user_id: DbId) -> String {
    labels
        .get(&user_id)
        .cloned()
        .unwrap_or_else(|| member_label(None, None))
}

// ---------------------------------------------------------------------------
// Party CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/parties
pub async fn list_parties(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let parties = PartyRepo::list_with_members(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: parties }))
}

/// POST /api/v1/parties
pub async fn create_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateParty>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim();
    validate_text(name, "name", PARTY_NAME_MAX)?;

    let party = PartyRepo::create(&state.pool, auth.user_id, name).await?;
    let members = PartyRepo::members_of(&state.pool, &[party.id]).await?;

    tracing::info!(party_id = party.id, user_id = auth.user_id, "Party created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PartyWithMembers { party, members },
        }),
    ))
}

/// PATCH /api/v1/parties/{id}
pub async fn update_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateParty>,
) -> AppResult<impl IntoResponse> {
    let party = member_party(&state.pool, id, auth.user_id).await?;
    ensure_creator(auth.user_id, party.created_by)?;

    let name = input.name.trim();
    validate_text(name, "name", PARTY_NAME_MAX)?;

    let party = PartyRepo::rename(&state.pool, id, name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Party", id }))?;

    tracing::info!(party_id = id, user_id = auth.user_id, "Party renamed");
    Ok(Json(DataResponse { data: party }))
}

/// DELETE /api/v1/parties/{id}
pub async fn delete_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let party = member_party(&state.pool, id, auth.user_id).await?;
    ensure_creator(auth.user_id, party.created_by)?;

    PartyRepo::delete(&state.pool, id).await?;
    tracing::info!(party_id = id, user_id = auth.user_id, "Party deleted");
    Ok(Json(DataResponse::deleted()))
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// POST /api/v1/parties/{id}/members
///
/// Invites by email or username. The member count is checked up front for a
/// fast rejection and again under the party row lock.
pub async fn add_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMember>,
) -> AppResult<impl IntoResponse> {
    member_party(&state.pool, id, auth.user_id).await?;

    let user = match MemberLookup::parse(&input.identifier)? {
        MemberLookup::Email(email) => UserRepo::find_by_email(&state.pool, &email).await?,
        MemberLookup::Username(username) => {
            UserRepo::find_by_username(&state.pool, &username).await?
        }
    }
    .ok_or_else(|| AppError::NotFound("User not found. They need to sign up first.".into()))?;

    ensure_capacity(PartyRepo::member_count(&state.pool, id).await?)?;

    match PartyRepo::add_member(&state.pool, id, user.id, MAX_PARTY_MEMBERS).await? {
        MemberInsert::Added(member) => {
            tracing::info!(
                party_id = id,
                user_id = auth.user_id,
                member_id = member.user_id,
                "Party member added"
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
        }
        MemberInsert::AlreadyMember => Err(AppError::Core(CoreError::Conflict(
            "This user is already in the party".into(),
        ))),
        MemberInsert::Full => Err(AppError::Core(party_full())),
    }
}

/// DELETE /api/v1/parties/{id}/members/{user_id}
pub async fn remove_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let party = member_party(&state.pool, id, auth.user_id).await?;
    ensure_can_remove(auth.user_id, party.created_by, member_id)?;

    if !PartyRepo::remove_member(&state.pool, id, member_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "PartyMember",
            id: member_id,
        }));
    }

    tracing::info!(party_id = id, user_id = auth.user_id, member_id, "Party member removed");
    Ok(Json(DataResponse::deleted()))
}

/// POST /api/v1/parties/{id}/leave
///
/// When the creator leaves, the whole party goes with them.
pub async fn leave_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let party = member_party(&state.pool, id, auth.user_id).await?;

    let party_deleted = party.created_by == auth.user_id;
    if party_deleted {
        PartyRepo::delete(&state.pool, id).await?;
    } else {
        PartyRepo::remove_member(&state.pool, id, auth.user_id).await?;
    }

    tracing::info!(party_id = id, user_id = auth.user_id, party_deleted, "Left party");
    Ok(Json(DataResponse {
        data: json!({ "left": true, "party_deleted": party_deleted }),
    }))
}

// ---------------------------------------------------------------------------
// Shared views
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MemberTotal {
    pub user_id: DbId,
    pub label: String,
    pub minutes: i64,
}

/// GET /api/v1/parties/{id}/stats
///
/// Seven-day leaderboard, most minutes first.
pub async fn party_stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    member_party(&state.pool, id, auth.user_id).await?;
    let (ids, labels) = roster(&state.pool, id).await?;

    let today = auth.today();
    let sessions = FocusSessionRepo::daily_totals_for_users(
        &state.pool,
        &ids,
        window_start(today, WEEK_DAYS),
        today,
    )
    .await?;

    let data: Vec<MemberTotal> = member_totals(&ids, &sessions)
        .into_iter()
        .map(|(user_id, minutes)| MemberTotal {
            user_id,
            label: label_for(&labels, user_id),
            minutes,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

#[derive(Debug, Serialize)]
pub struct MemberStatus {
    pub label: String,
    #[serde(flatten)]
    pub status: StatusView,
}

/// GET /api/v1/parties/{id}/statuses
///
/// Members who never touched their timer are reported idle.
pub async fn party_statuses(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    member_party(&state.pool, id, auth.user_id).await?;
    let (ids, labels) = roster(&state.pool, id).await?;

    let now = Utc::now();
    let mut rows: HashMap<DbId, StatusView> = UserStatusRepo::list_for_users(&state.pool, &ids)
        .await?
        .into_iter()
        .map(|s| (s.user_id, s.view(now)))
        .collect();

    let data: Vec<MemberStatus> = ids
        .iter()
        .map(|&user_id| MemberStatus {
            label: label_for(&labels, user_id),
            status: rows
                .remove(&user_id)
                .unwrap_or_else(|| StatusView::idle(user_id, now)),
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

#[derive(Debug, Serialize)]
pub struct MemberSeries {
    pub user_id: DbId,
    pub label: String,
    pub data: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct PartyDaily {
    pub labels: Vec<Day>,
    pub series: Vec<MemberSeries>,
}

/// GET /api/v1/parties/{id}/daily?days=N
pub async fn party_daily(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DaysParams>,
) -> AppResult<impl IntoResponse> {
    let days = params.days_or(WEEK_DAYS);
    validate_days(days)?;

    member_party(&state.pool, id, auth.user_id).await?;
    let (ids, labels) = roster(&state.pool, id).await?;

    let today = auth.today();
    let start = window_start(today, days);
    let sessions =
        FocusSessionRepo::daily_totals_for_users(&state.pool, &ids, start, today).await?;

    let day_labels = day_range(start, today);
    let series = member_daily_series(&ids, &sessions, &day_labels)
        .into_iter()
        .map(|(user_id, data)| MemberSeries {
            user_id,
            label: label_for(&labels, user_id),
            data,
        })
        .collect();

    Ok(Json(DataResponse {
        data: PartyDaily {
            labels: day_labels,
            series,
        },
    }))
}
