//! Study-party membership rules.

use crate::error::CoreError;
use crate::types::DbId;

/// A party never grows past this many members.
pub const MAX_PARTY_MEMBERS: i64 = 10;

/// How an invite identifier should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberLookup {
    Email(String),
    Username(String),
}

impl MemberLookup {
    /// Anything containing `@` is an email; everything else is a username.
    /// Both are trimmed and lowercased.
    pub fn parse(identifier: &str) -> Result<Self, CoreError> {
        let normalized = identifier.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(CoreError::Validation("identifier must not be empty".into()));
        }
        if normalized.contains('@') {
            Ok(Self::Email(normalized))
        } else {
            Ok(Self::Username(normalized))
        }
    }
}

/// The error returned when an invite would exceed [`MAX_PARTY_MEMBERS`].
pub fn party_full() -> CoreError {
    CoreError::Conflict(format!(
        "Party is full. Maximum {MAX_PARTY_MEMBERS} members allowed."
    ))
}

/// Reject an invite when the party is already full.
pub fn ensure_capacity(current_members: i64) -> Result<(), CoreError> {
    if current_members >= MAX_PARTY_MEMBERS {
        return Err(party_full());
    }
    Ok(())
}

/// Who may remove `target` from a party created by `creator`.
///
/// Members may always remove themselves (the creator does so by leaving,
/// which deletes the party). The creator may remove anyone else.
pub fn ensure_can_remove(actor: DbId, creator: DbId, target: DbId) -> Result<(), CoreError> {
    if target == creator && actor == creator {
        return Err(CoreError::Validation(
            "The party creator cannot be removed; delete the party or leave it instead".into(),
        ));
    }
    if actor == target || actor == creator {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the party creator can remove other members".into(),
        ))
    }
}

/// Only the creator may rename or delete a party.
pub fn ensure_creator(actor: DbId, creator: DbId) -> Result<(), CoreError> {
    if actor != creator {
        return Err(CoreError::Forbidden(
            "Only the party creator can modify this party".into(),
        ));
    }
    Ok(())
}

/// Display label for leaderboards: username, else email, else a placeholder.
pub fn member_label(username: Option<&str>, email: Option<&str>) -> String {
    username
        .filter(|u| !u.is_empty())
        .or(email.filter(|e| !e.is_empty()))
        .unwrap_or("unknown")
        .to_string()
}
