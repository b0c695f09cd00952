use assert_matches::assert_matches;
use sqlx::PgPool;
use slate_core::party::MAX_PARTY_MEMBERS;
use slate_db::repositories::{MemberInsert, PartyRepo, UserRepo};

async fn user(pool: &PgPool, sub: &str) -> i64 {
    UserRepo::upsert_by_external_id(pool, sub, None).await.unwrap().id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_creator_is_first_member(pool: PgPool) {
    let creator = user(&pool, "creator").await;
    let party = PartyRepo::create(&pool, creator, "Night owls").await.unwrap();

    let listed = PartyRepo::list_with_members(&pool, creator).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].party.id, party.id);
    assert_eq!(listed[0].members.len(), 1);
    assert_eq!(listed[0].members[0].user_id, creator);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_member_rejects_duplicates_and_overflow(pool: PgPool) {
    let creator = user(&pool, "creator").await;
    let party = PartyRepo::create(&pool, creator, "Full house").await.unwrap();

    assert_matches!(
        PartyRepo::add_member(&pool, party.id, creator, MAX_PARTY_MEMBERS).await.unwrap(),
        MemberInsert::AlreadyMember
    );

    for i in 1..MAX_PARTY_MEMBERS {
        let uid = user(&pool, &format!("member-{i}")).await;
        assert_matches!(
            PartyRepo::add_member(&pool, party.id, uid, MAX_PARTY_MEMBERS).await.unwrap(),
            MemberInsert::Added(_)
        );
    }
    assert_eq!(PartyRepo::member_count(&pool, party.id).await.unwrap(), MAX_PARTY_MEMBERS);

    let eleventh = user(&pool, "eleventh").await;
    assert_matches!(
        PartyRepo::add_member(&pool, party.id, eleventh, MAX_PARTY_MEMBERS).await.unwrap(),
        MemberInsert::Full
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_member_cannot_see_party(pool: PgPool) {
    let creator = user(&pool, "creator").await;
    let outsider = user(&pool, "outsider").await;
    let party = PartyRepo::create(&pool, creator, "Private").await.unwrap();

    assert!(PartyRepo::find_for_member(&pool, party.id, outsider).await.unwrap().is_none());
    assert!(PartyRepo::list_with_members(&pool, outsider).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_party_cascades_members(pool: PgPool) {
    let creator = user(&pool, "creator").await;
    let friend = user(&pool, "friend").await;
    let party = PartyRepo::create(&pool, creator, "Temp").await.unwrap();
    PartyRepo::add_member(&pool, party.id, friend, MAX_PARTY_MEMBERS).await.unwrap();

    assert!(PartyRepo::delete(&pool, party.id).await.unwrap());
    assert!(PartyRepo::members_of(&pool, &[party.id]).await.unwrap().is_empty());
}
