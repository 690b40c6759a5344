//! In-process [`PostStore`], used by tests and for running without a database.

use crate::store::{PostStore, Result};
use async_trait::async_trait;
use folio_common::model::{
    Id,
    post::{NewPost, Post, PostMarker, PostUpdate},
    query::{ListOptions, PostFilter, SortField, SortOrder},
};
use std::{cmp::Ordering, collections::HashMap};
use time::OffsetDateTime;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: Mutex<HashMap<Id<PostMarker>, Post>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let now = OffsetDateTime::now_utc();
        let post = Post {
            id: Id::generate(),
            title: post.title,
            author: post.author,
            contents: post.contents,
            tags: post.tags,
            created_at: now,
            updated_at: now,
        };

        self.posts.lock().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_posts(&self, filter: PostFilter, options: ListOptions) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .await
            .values()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect();

        posts.sort_by(|a, b| compare_posts(options, a, b));
        Ok(posts)
    }

    async fn find_post(&self, id: Id<PostMarker>) -> Result<Option<Post>> {
        Ok(self.posts.lock().await.get(&id).cloned())
    }

    async fn update_post(&self, id: Id<PostMarker>, update: PostUpdate) -> Result<Option<Post>> {
        let mut posts = self.posts.lock().await;
        let Some(post) = posts.get_mut(&id) else {
            return Ok(None);
        };

        update.apply_to(post);
        post.updated_at = post.updated_at.max(OffsetDateTime::now_utc());

        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Id<PostMarker>) -> Result<u64> {
        let removed = self.posts.lock().await.remove(&id);
        Ok(removed.map_or(0, |_| 1))
    }
}

fn compare_posts(options: ListOptions, a: &Post, b: &Post) -> Ordering {
    let ordering = match options.sort_by {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Author => a.author.cmp(&b.author),
        SortField::Contents => a.contents.cmp(&b.contents),
        SortField::Id => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id));

    match options.sort_order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}
