//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. The generated
//! `posts.search_document` column is omitted: Diesel has no `tsvector` type
//! and the column is only read by the raw full-text search query.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Lowercase, unique (`users_username_key`).
        username -> Varchar,
        /// Lowercase, unique (`users_email_key`).
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts. Title and body are stored already sanitised.
    posts (id) {
        id -> Uuid,
        title -> Text,
        body -> Text,
        created_date -> Timestamptz,
        author_id -> Uuid,
    }
}

diesel::table! {
    /// Directed follow edges; the primary key `follows_pkey` forbids
    /// duplicate pairs.
    follows (follower_id, following_id) {
        follower_id -> Uuid,
        following_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(follows, posts, users);
