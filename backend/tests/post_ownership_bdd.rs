//! Behaviour tests for post ownership checks on edit and delete.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::Utc;
use postapp::domain::ports::{PostStore, UserDirectory};
use postapp::domain::{
    Actor, Error, ErrorCode, NOT_ALLOWED_MESSAGE, PostId, Registration, UpdateOutcome, UserId,
};
use postapp::test_support::InMemoryServices;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::{Builder, Runtime};

enum Action {
    Edited(Result<UpdateOutcome, Error>),
    Deleted(Result<(), Error>),
}

struct PostWorld {
    runtime: Runtime,
    services: InMemoryServices,
    users: RefCell<HashMap<String, UserId>>,
    post: RefCell<Option<PostId>>,
    action: RefCell<Option<Action>>,
}

impl PostWorld {
    fn new() -> Self {
        Self {
            runtime: Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("test runtime"),
            services: InMemoryServices::new(Utc::now()),
            users: RefCell::new(HashMap::new()),
            post: RefCell::new(None),
            action: RefCell::new(None),
        }
    }

    fn id_of(&self, name: &str) -> UserId {
        *self.users.borrow().get(name).expect("user registered in scenario")
    }

    fn post_id(&self) -> String {
        self.post
            .borrow()
            .expect("a post was published")
            .to_string()
    }

    fn failure(&self) -> Option<Error> {
        match self.action.borrow().as_ref().expect("an action was performed") {
            Action::Edited(Err(error)) | Action::Deleted(Err(error)) => Some(error.clone()),
            _ => None,
        }
    }
}

#[fixture]
fn world() -> PostWorld {
    PostWorld::new()
}

#[given("a registered user named {name}")]
fn a_registered_user_named(world: &PostWorld, name: String) {
    let registration = Registration::normalize(
        &name,
        &format!("{name}@example.com"),
        "correct horse battery",
    );
    let user = world
        .runtime
        .block_on(world.services.users.register(registration))
        .expect("registration succeeds");
    world.users.borrow_mut().insert(name, user.id());
}

#[given("{author} has published a post titled \"{title}\"")]
fn author_has_published(world: &PostWorld, author: String, title: String) {
    let id = world
        .runtime
        .block_on(
            world
                .services
                .posts
                .create(world.id_of(&author), &title, "Post body"),
        )
        .expect("post created");
    *world.post.borrow_mut() = Some(id);
}

#[when("{actor} edits the post to read \"{title}\"")]
fn actor_edits(world: &PostWorld, actor: String, title: String) {
    let post_id = world.post_id();
    let outcome = world.runtime.block_on(world.services.posts.update(
        world.id_of(&actor),
        &post_id,
        &title,
        "Edited body",
    ));
    *world.action.borrow_mut() = Some(Action::Edited(outcome));
}

#[when("{actor} deletes the post")]
fn actor_deletes(world: &PostWorld, actor: String) {
    let post_id = world.post_id();
    let outcome = world
        .runtime
        .block_on(world.services.posts.delete(world.id_of(&actor), &post_id));
    *world.action.borrow_mut() = Some(Action::Deleted(outcome));
}

#[then("the edit succeeds")]
fn the_edit_succeeds(world: &PostWorld) {
    match world.action.borrow().as_ref() {
        Some(Action::Edited(Ok(outcome))) => assert_eq!(*outcome, UpdateOutcome::Success),
        _ => panic!("expected a successful edit"),
    }
}

#[then("the action is not allowed")]
fn the_action_is_not_allowed(world: &PostWorld) {
    let error = world.failure().expect("action should fail");
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), NOT_ALLOWED_MESSAGE);
}

#[then("the post is titled \"{title}\"")]
fn the_post_is_titled(world: &PostWorld, title: String) {
    let view = world
        .runtime
        .block_on(
            world
                .services
                .posts
                .find_by_id(&world.post_id(), Actor::Anonymous),
        )
        .expect("post readable");
    assert_eq!(view.title, title);
}

#[then("the post can no longer be found")]
fn the_post_is_gone(world: &PostWorld) {
    assert!(world.failure().is_none(), "delete should succeed");
    let error = world
        .runtime
        .block_on(
            world
                .services
                .posts
                .find_by_id(&world.post_id(), Actor::Anonymous),
        )
        .expect_err("deleted");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[scenario(
    path = "tests/features/post_ownership.feature",
    name = "The author edits their post"
)]
fn the_author_edits_their_post(world: PostWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/post_ownership.feature",
    name = "A stranger cannot edit the post"
)]
fn a_stranger_cannot_edit(world: PostWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/post_ownership.feature",
    name = "A stranger cannot delete the post"
)]
fn a_stranger_cannot_delete(world: PostWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/post_ownership.feature",
    name = "The author deletes their post"
)]
fn the_author_deletes_their_post(world: PostWorld) {
    let _ = world;
}
