//! Behaviour tests for following and unfollowing users.
//!
//! Scenarios run against the in-memory store so they exercise the real
//! follow graph service without a database.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::Utc;
use postapp::domain::ports::{FollowGraph, UserDirectory};
use postapp::domain::{Error, Registration, UserId};
use postapp::test_support::InMemoryServices;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::{Builder, Runtime};

struct FollowWorld {
    runtime: Runtime,
    services: InMemoryServices,
    users: RefCell<HashMap<String, UserId>>,
    outcome: RefCell<Option<Result<(), Error>>>,
}

impl FollowWorld {
    fn new() -> Self {
        Self {
            runtime: Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("test runtime"),
            services: InMemoryServices::new(Utc::now()),
            users: RefCell::new(HashMap::new()),
            outcome: RefCell::new(None),
        }
    }

    fn id_of(&self, name: &str) -> UserId {
        *self.users.borrow().get(name).expect("user registered in scenario")
    }

    fn register(&self, name: &str) {
        let registration = Registration::normalize(
            name,
            &format!("{name}@example.com"),
            "correct horse battery",
        );
        let user = self
            .runtime
            .block_on(self.services.users.register(registration))
            .expect("registration succeeds");
        self.users.borrow_mut().insert(name.to_owned(), user.id());
    }

    fn follow(&self, actor: &str, target: &str) -> Result<(), Error> {
        self.runtime
            .block_on(self.services.follows.follow(self.id_of(actor), target))
    }

    fn unfollow(&self, actor: &str, target: &str) -> Result<(), Error> {
        self.runtime
            .block_on(self.services.follows.unfollow(self.id_of(actor), target))
    }

    fn record(&self, outcome: Result<(), Error>) {
        *self.outcome.borrow_mut() = Some(outcome);
    }

    fn with_outcome<F>(&self, f: F)
    where
        F: FnOnce(&Result<(), Error>),
    {
        let outcome = self.outcome.borrow();
        f(outcome.as_ref().expect("an action was performed"));
    }
}

#[fixture]
fn world() -> FollowWorld {
    FollowWorld::new()
}

#[given("a registered user named {name}")]
fn a_registered_user_named(world: &FollowWorld, name: String) {
    world.register(&name);
}

#[given("an existing follow from {actor} to {target}")]
fn an_existing_follow(world: &FollowWorld, actor: String, target: String) {
    world.follow(&actor, &target).expect("setup follow succeeds");
}

#[when("{actor} follows {target}")]
fn actor_follows(world: &FollowWorld, actor: String, target: String) {
    world.record(world.follow(&actor, &target));
}

#[when("{actor} unfollows {target}")]
fn actor_unfollows(world: &FollowWorld, actor: String, target: String) {
    world.record(world.unfollow(&actor, &target));
}

#[then("the request succeeds")]
fn the_request_succeeds(world: &FollowWorld) {
    world.with_outcome(|outcome| assert!(outcome.is_ok(), "unexpected failure: {outcome:?}"));
}

#[then("the request fails with \"{message}\"")]
fn the_request_fails_with(world: &FollowWorld, message: String) {
    world.with_outcome(|outcome| match outcome {
        Ok(()) => panic!("expected failure with {message}"),
        Err(error) => assert_eq!(error.errors(), [message.as_str()]),
    });
}

#[then("{name} has {count} followers")]
fn user_has_followers(world: &FollowWorld, name: String, count: u64) {
    let followers = world
        .runtime
        .block_on(world.services.follows.follower_count(world.id_of(&name)))
        .expect("count");
    assert_eq!(followers, count);
}

#[scenario(path = "tests/features/follow_graph.feature", name = "Following another user")]
fn following_another_user(world: FollowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/follow_graph.feature",
    name = "Following the same user twice"
)]
fn following_the_same_user_twice(world: FollowWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/follow_graph.feature", name = "Following yourself")]
fn following_yourself(world: FollowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/follow_graph.feature",
    name = "Following a user that does not exist"
)]
fn following_a_missing_user(world: FollowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/follow_graph.feature",
    name = "Unfollowing a user that is not followed"
)]
fn unfollowing_without_an_edge(world: FollowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/follow_graph.feature",
    name = "Unfollowing removes the edge"
)]
fn unfollowing_removes_the_edge(world: FollowWorld) {
    let _ = world;
}
