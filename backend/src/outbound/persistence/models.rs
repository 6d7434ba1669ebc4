//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; repositories convert them into
//! domain types with the helpers below. Stored usernames, emails, titles and
//! bodies were validated and normalised before insertion, so conversion
//! trusts them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types;
use uuid::Uuid;

use crate::domain::{
    AuthoredPost, EmailAddress, Post, PostContent, PostId, User, UserAccount, UserId, Username,
};

use super::schema::{follows, posts, users};

/// Convert a `COUNT(*)` result, which PostgreSQL never returns negative.
pub(crate) fn row_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Public columns of a `users` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> User {
        User::new(
            UserId::from_uuid(self.id),
            Username::from_trusted(self.username),
            EmailAddress::from_trusted(self.email),
        )
    }
}

/// A `users` row including the password hash, read only for login.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

impl AccountRow {
    pub(crate) fn into_account(self) -> UserAccount {
        UserAccount {
            user: self.user.into_user(),
            password_hash: self.password_hash,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// A `posts` row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub created_date: DateTime<Utc>,
    pub author_id: Uuid,
}

impl PostRow {
    pub(crate) fn from_post(post: &Post) -> Self {
        Self {
            id: *post.id.as_uuid(),
            title: post.content.title().to_owned(),
            body: post.content.body().to_owned(),
            created_date: post.created_date,
            author_id: *post.author.as_uuid(),
        }
    }

    pub(crate) fn with_author(self, author: UserRow) -> AuthoredPost {
        AuthoredPost {
            post: Post {
                id: PostId::from_uuid(self.id),
                content: PostContent::from_trusted(self.title, self.body),
                created_date: self.created_date,
                author: UserId::from_uuid(self.author_id),
            },
            author: author.into_user(),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub(crate) struct PostContentUpdate<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub follower_id: Uuid,
    pub following_id: Uuid,
}

/// A ranked full-text search hit joined with its author.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct SearchHitRow {
    #[diesel(sql_type = sql_types::Uuid)]
    pub id: Uuid,
    #[diesel(sql_type = sql_types::Text)]
    pub title: String,
    #[diesel(sql_type = sql_types::Text)]
    pub body: String,
    #[diesel(sql_type = sql_types::Timestamptz)]
    pub created_date: DateTime<Utc>,
    #[diesel(sql_type = sql_types::Uuid)]
    pub author_id: Uuid,
    #[diesel(sql_type = sql_types::Varchar)]
    pub author_username: String,
    #[diesel(sql_type = sql_types::Varchar)]
    pub author_email: String,
}

impl SearchHitRow {
    pub(crate) fn into_authored(self) -> AuthoredPost {
        let author = UserRow {
            id: self.author_id,
            username: self.author_username,
            email: self.author_email,
        };
        PostRow {
            id: self.id,
            title: self.title,
            body: self.body,
            created_date: self.created_date,
            author_id: self.author_id,
        }
        .with_author(author)
    }
}
