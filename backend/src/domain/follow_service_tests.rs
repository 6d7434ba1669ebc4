//! Tests for the follow graph service.

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockFollowRepository, MockUserRepository};
use crate::domain::{Avatar, EmailAddress, ErrorCode};

fn sample_user(name: &str) -> User {
    User::new(
        UserId::random(),
        Username::parse(name).expect("username"),
        EmailAddress::parse(&format!("{name}@example.com")).expect("email"),
    )
}

fn users_returning(user: Option<User>) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(move |_| Ok(user.clone()));
    users
}

fn make_service(
    users: MockUserRepository,
    follows: MockFollowRepository,
) -> FollowGraphService<MockUserRepository, MockFollowRepository> {
    FollowGraphService::new(Arc::new(users), Arc::new(follows))
}

#[tokio::test]
async fn follow_inserts_edge_for_existing_target() {
    let actor = UserId::random();
    let target = sample_user("grace");
    let target_id = target.id();
    let mut follows = MockFollowRepository::new();
    follows.expect_exists().return_once(|_| Ok(false));
    follows
        .expect_insert()
        .withf(move |edge: &FollowEdge| edge.follower == actor && edge.following == target_id)
        .times(1)
        .return_once(|_| Ok(()));

    make_service(users_returning(Some(target)), follows)
        .follow(actor, "grace")
        .await
        .expect("follow succeeds");
}

#[tokio::test]
async fn follow_matches_target_username_exactly() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().times(0);
    let mut follows = MockFollowRepository::new();
    follows.expect_insert().times(0);

    let error = make_service(users, follows)
        .follow(UserId::random(), "Grace")
        .await
        .expect_err("unknown target");

    assert_eq!(error.errors(), ["You cannot follow a user that does not exist."]);
}

#[tokio::test]
async fn follow_twice_reports_already_following() {
    let mut follows = MockFollowRepository::new();
    follows.expect_exists().return_once(|_| Ok(true));
    follows.expect_insert().times(0);

    let error = make_service(users_returning(Some(sample_user("grace"))), follows)
        .follow(UserId::random(), "grace")
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.errors(), ["You already follow this user."]);
}

#[tokio::test]
async fn follow_race_lost_at_insert_reports_already_following() {
    let mut follows = MockFollowRepository::new();
    follows.expect_exists().return_once(|_| Ok(false));
    follows
        .expect_insert()
        .return_once(|_| Err(FollowRepositoryError::duplicate()));

    let error = make_service(users_returning(Some(sample_user("grace"))), follows)
        .follow(UserId::random(), "grace")
        .await
        .expect_err("duplicate");

    assert_eq!(error.errors(), ["You already follow this user."]);
}

#[tokio::test]
async fn follow_self_is_rejected() {
    let me = sample_user("ada");
    let my_id = me.id();
    let mut follows = MockFollowRepository::new();
    follows.expect_exists().return_once(|_| Ok(false));
    follows.expect_insert().times(0);

    let error = make_service(users_returning(Some(me)), follows)
        .follow(my_id, "ada")
        .await
        .expect_err("self follow");

    assert_eq!(error.errors(), ["You cannot follow yourself."]);
}

#[rstest]
#[case("ghost")]
#[case("not valid!")]
#[tokio::test]
async fn missing_target_skips_edge_lookup(#[case] target: &str) {
    let mut follows = MockFollowRepository::new();
    follows.expect_exists().times(0);

    let error = make_service(users_returning(None), follows)
        .follow(UserId::random(), target)
        .await
        .expect_err("missing target");

    assert_eq!(
        error.errors(),
        ["You cannot follow a user that does not exist."]
    );
}

#[tokio::test]
async fn unfollow_without_edge_reports_not_following() {
    let mut follows = MockFollowRepository::new();
    follows.expect_exists().return_once(|_| Ok(false));
    follows.expect_delete().times(0);

    let error = make_service(users_returning(Some(sample_user("grace"))), follows)
        .unfollow(UserId::random(), "grace")
        .await
        .expect_err("not following");

    assert_eq!(
        error.errors(),
        ["You cannot stop following a user that you do not already follow."]
    );
}

#[rstest]
#[case(true, true)]
#[case(false, false)]
#[tokio::test]
async fn unfollow_deletes_existing_edge(#[case] removed: bool, #[case] succeeds: bool) {
    let mut follows = MockFollowRepository::new();
    follows.expect_exists().return_once(|_| Ok(true));
    follows
        .expect_delete()
        .times(1)
        .return_once(move |_| Ok(removed));

    let result = make_service(users_returning(Some(sample_user("grace"))), follows)
        .unfollow(UserId::random(), "grace")
        .await;
    assert_eq!(result.is_ok(), succeeds);
}

#[tokio::test]
async fn anonymous_actor_follows_nobody() {
    let mut follows = MockFollowRepository::new();
    follows.expect_exists().times(0);

    let following = make_service(MockUserRepository::new(), follows)
        .is_following(UserId::random(), Actor::Anonymous)
        .await
        .expect("lookup");
    assert!(!following);
}

#[tokio::test]
async fn followers_are_enriched_with_avatars() {
    let followers = vec![sample_user("ada"), sample_user("grace")];
    let mut follows = MockFollowRepository::new();
    follows
        .expect_followers_of()
        .return_once(move |_| Ok(followers));

    let summaries = make_service(MockUserRepository::new(), follows)
        .followers(UserId::random())
        .await
        .expect("followers");

    let names: Vec<_> = summaries.iter().map(|s| s.username.as_str()).collect();
    assert_eq!(names, ["ada", "grace"]);
    assert_eq!(summaries[1].avatar, Avatar::for_email("grace@example.com"));
}

#[tokio::test]
async fn counts_surface_store_outages() {
    let mut follows = MockFollowRepository::new();
    follows
        .expect_following_count()
        .return_once(|_| Err(FollowRepositoryError::connection("refused")));
    follows.expect_follower_count().return_once(|_| Ok(4));
    let service = make_service(MockUserRepository::new(), follows);

    assert_eq!(service.follower_count(UserId::random()).await.expect("count"), 4);
    let error = service
        .following_count(UserId::random())
        .await
        .expect_err("outage");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
