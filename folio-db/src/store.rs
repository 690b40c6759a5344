use async_trait::async_trait;
use folio_common::model::{
    Id, ModelValidationError,
    post::{NewPost, Post, PostMarker, PostUpdate},
    query::{ListOptions, PostFilter},
};
use std::fmt::Debug;
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("Running migrations failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// The document store posts live in.
///
/// Every method is a single store round trip. Ids and both timestamps are assigned
/// by the store, and sorting and filtering happen inside it.
#[async_trait]
pub trait PostStore: Debug + Send + Sync {
    async fn insert_post(&self, post: NewPost) -> Result<Post>;

    /// All posts matching `filter`, ordered by `options`. Ties are broken by id.
    async fn find_posts(&self, filter: PostFilter, options: ListOptions) -> Result<Vec<Post>>;

    async fn find_post(&self, id: Id<PostMarker>) -> Result<Option<Post>>;

    /// Returns the post after the update, or `None` if there is no post with `id`.
    async fn update_post(&self, id: Id<PostMarker>, update: PostUpdate) -> Result<Option<Post>>;

    /// Returns the number of removed posts.
    async fn delete_post(&self, id: Id<PostMarker>) -> Result<u64>;
}
