//! Repository for `parties` and `party_members`.

use std::collections::HashMap;

use sqlx::PgPool;
use slate_core::types::DbId;

use crate::models::party::{Party, PartyMember, PartyWithMembers};

const COLUMNS: &str = "id, name, created_by, created_at, updated_at";

/// Member columns joined from `users`.
const MEMBER_COLUMNS: &str = "pm.party_id, pm.user_id, u.email, u.username, pm.joined_at";

/// Outcome of [`PartyRepo::add_member`].
#[derive(Debug)]
pub enum MemberInsert {
    Added(PartyMember),
    AlreadyMember,
    Full,
}

pub struct PartyRepo;

impl PartyRepo {
    /// Create a party with its creator as the first member.
    pub async fn create(pool: &PgPool, creator: DbId, name: &str) -> Result<Party, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO parties (name, created_by) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let party = sqlx::query_as::<_, Party>(&query)
            .bind(name)
            .bind(creator)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO party_members (party_id, user_id) VALUES ($1, $2)")
            .bind(party.id)
            .bind(creator)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(party)
    }

    /// The party, only if `user_id` is a member of it.
    pub async fn find_for_member(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Party>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parties p
             WHERE p.id = $1
               AND EXISTS (SELECT 1 FROM party_members pm
                           WHERE pm.party_id = p.id AND pm.user_id = $2)"
        );
        sqlx::query_as::<_, Party>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Parties the user belongs to, newest first, with their members.
    pub async fn list_with_members(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PartyWithMembers>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parties p
             WHERE EXISTS (SELECT 1 FROM party_members pm
                           WHERE pm.party_id = p.id AND pm.user_id = $1)
             ORDER BY p.created_at DESC, p.id DESC"
        );
        let parties = sqlx::query_as::<_, Party>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = parties.iter().map(|p| p.id).collect();
        let mut by_party: HashMap<DbId, Vec<PartyMember>> = HashMap::new();
        for member in Self::members_of(pool, &ids).await? {
            by_party.entry(member.party_id).or_default().push(member);
        }

        Ok(parties
            .into_iter()
            .map(|party| PartyWithMembers {
                members: by_party.remove(&party.id).unwrap_or_default(),
                party,
            })
            .collect())
    }

    /// Members of any of `party_ids`, in join order.
    pub async fn members_of(
        pool: &PgPool,
        party_ids: &[DbId],
    ) -> Result<Vec<PartyMember>, sqlx::Error> {
        if party_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {MEMBER_COLUMNS}
             FROM party_members pm
             JOIN users u ON u.id = pm.user_id
             WHERE pm.party_id = ANY($1)
             ORDER BY pm.joined_at ASC, pm.id ASC"
        );
        sqlx::query_as::<_, PartyMember>(&query)
            .bind(party_ids)
            .fetch_all(pool)
            .await
    }

    /// Everyone who shares at least one party with `user_id`, excluding the
    /// user themself.
    pub async fn co_member_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT other.user_id
             FROM party_members mine
             JOIN party_members other ON other.party_id = mine.party_id
             WHERE mine.user_id = $1 AND other.user_id <> $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn member_count(pool: &PgPool, party_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM party_members WHERE party_id = $1")
            .bind(party_id)
            .fetch_one(pool)
            .await
    }

    /// Add a member unless the party already holds `capacity` members.
    ///
    /// The party row is locked for the duration so two concurrent invites
    /// cannot both take the last seat.
    pub async fn add_member(
        pool: &PgPool,
        party_id: DbId,
        user_id: DbId,
        capacity: i64,
    ) -> Result<MemberInsert, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM parties WHERE id = $1 FOR UPDATE")
            .bind(party_id)
            .fetch_one(&mut *tx)
            .await?;

        let already: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM party_members WHERE party_id = $1 AND user_id = $2)",
        )
        .bind(party_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        if already {
            return Ok(MemberInsert::AlreadyMember);
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM party_members WHERE party_id = $1")
            .bind(party_id)
            .fetch_one(&mut *tx)
            .await?;
        if count >= capacity {
            return Ok(MemberInsert::Full);
        }

        sqlx::query("INSERT INTO party_members (party_id, user_id) VALUES ($1, $2)")
            .bind(party_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {MEMBER_COLUMNS}
             FROM party_members pm
             JOIN users u ON u.id = pm.user_id
             WHERE pm.party_id = $1 AND pm.user_id = $2"
        );
        let member = sqlx::query_as::<_, PartyMember>(&query)
            .bind(party_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(MemberInsert::Added(member))
    }

    /// Returns `true` if a membership row was removed.
    pub async fn remove_member(
        pool: &PgPool,
        party_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM party_members WHERE party_id = $1 AND user_id = $2")
            .bind(party_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Party>, sqlx::Error> {
        let query = format!("UPDATE parties SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Party>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a party and, by cascade, its memberships.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM parties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
