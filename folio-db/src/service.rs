//! Intention-revealing operations over a [`PostStore`].
//!
//! Each operation validates its input where needed and then issues exactly one
//! store call. Absence is reported as `Ok(None)`, never as an error.

use crate::store::{DbError, PostStore};
use folio_common::model::{
    Id, ModelValidationError,
    post::{DeleteResult, NewPost, Post, PostFields, PostMarker, PostUpdate},
    query::{ListOptions, PostFilter},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Post validation failed: {0}")]
    Validation(#[from] ModelValidationError),
    #[error(transparent)]
    Store(#[from] DbError),
}

#[derive(Clone, Debug)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    #[must_use]
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn create_post(&self, fields: PostFields) -> Result<Post> {
        let post = NewPost::try_from(fields)?;
        let post = self.store.insert_post(post).await?;

        debug!(id = %post.id, "Created post");
        Ok(post)
    }

    pub async fn list_all_posts(&self, options: ListOptions) -> Result<Vec<Post>> {
        self.list_posts(PostFilter::All, options).await
    }

    pub async fn list_posts_by_author(
        &self,
        author: String,
        options: ListOptions,
    ) -> Result<Vec<Post>> {
        self.list_posts(PostFilter::Author(author), options).await
    }

    pub async fn list_posts_by_tag(&self, tag: String, options: ListOptions) -> Result<Vec<Post>> {
        self.list_posts(PostFilter::Tag(tag), options).await
    }

    async fn list_posts(&self, filter: PostFilter, options: ListOptions) -> Result<Vec<Post>> {
        debug!(?filter, ?options, "Listing posts");

        let posts = self.store.find_posts(filter, options).await?;
        Ok(posts)
    }

    pub async fn get_post_by_id(&self, id: Id<PostMarker>) -> Result<Option<Post>> {
        let post = self.store.find_post(id).await?;
        Ok(post)
    }

    pub async fn update_post(
        &self,
        id: Id<PostMarker>,
        fields: PostFields,
    ) -> Result<Option<Post>> {
        let update = PostUpdate::try_from(fields)?;
        let post = self.store.update_post(id, update).await?;

        debug!(%id, found = post.is_some(), "Updated post");
        Ok(post)
    }

    pub async fn delete_post(&self, id: Id<PostMarker>) -> Result<DeleteResult> {
        let deleted_count = self.store.delete_post(id).await?;

        debug!(%id, deleted_count, "Deleted post");
        Ok(DeleteResult { deleted_count })
    }
}
