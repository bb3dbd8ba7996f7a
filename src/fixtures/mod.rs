//! Schema document fixtures for command tests.
//!
//! Loaded at compile time with `include_str!`.
//!
//! ## Available Fixtures
//!
//! - [`POST`] - free text, enum, unique slug, a reference and a join table
//! - [`USER`] - format checks, numeric range and an eager one-to-many
//! - [`STORE`] - document dialect, geo-point, structured data and a named index

/// Blog post with `author -> User` (lazy) and `tags` many-to-many via
/// `post_tags`. Version 3, relational default dialect.
pub const POST: &str = include_str!("post.json");

/// Account with an eager `posts` collection keyed by `author_id`.
pub const USER: &str = include_str!("user.json");

/// Retail store declared for the `mongodb` dialect (database `retail`).
pub const STORE: &str = include_str!("store.json");
