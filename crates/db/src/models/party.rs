//! Study parties and their membership.

use serde::{Deserialize, Serialize};
use slate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `parties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Party {
    pub id: DbId,
    pub name: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A member joined with the identifying columns of their user row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartyMember {
    #[serde(skip)]
    pub party_id: DbId,
    pub user_id: DbId,
    pub email: Option<String>,
    pub username: Option<String>,
    pub joined_at: Timestamp,
}

/// A party with its member list, as returned by `GET /parties`.
#[derive(Debug, Clone, Serialize)]
pub struct PartyWithMembers {
    #[serde(flatten)]
    pub party: Party,
    pub members: Vec<PartyMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateParty {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateParty {
    pub name: String,
}

/// Body of `POST /parties/{id}/members`: an email or a username.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMember {
    pub identifier: String,
}
