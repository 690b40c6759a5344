use crate::model::{Id, ModelValidationError};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// A persisted post, as returned by the store.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id<PostMarker>,
    pub title: PostTitle,
    pub author: Option<String>,
    pub contents: Option<String>,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Unvalidated post fields as they arrive from a client.
///
/// Used both for creation, where `title` is required, and for partial updates.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct PostFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub contents: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A validated post that has not been persisted yet.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct NewPost {
    pub title: PostTitle,
    pub author: Option<String>,
    pub contents: Option<String>,
    pub tags: Vec<String>,
}

/// A validated partial update. `None` leaves the stored value untouched.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct PostUpdate {
    pub title: Option<PostTitle>,
    pub author: Option<String>,
    pub contents: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Outcome of a delete. `deleted_count` is 0 when no post had the id.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct PostTitle(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("`title` must not be empty")]
pub struct InvalidPostTitleError(String);

impl PostTitle {
    pub fn new(title: String) -> Result<Self, InvalidPostTitleError> {
        if title.trim().is_empty() {
            Err(InvalidPostTitleError(title))
        } else {
            Ok(PostTitle(title))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for PostTitle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        PostTitle::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"a non-empty title"))
    }
}

impl TryFrom<PostFields> for NewPost {
    type Error = ModelValidationError;

    fn try_from(value: PostFields) -> Result<Self, Self::Error> {
        let title = value
            .title
            .ok_or(ModelValidationError::MissingField("title"))?;

        Ok(Self {
            title: PostTitle::new(title)?,
            author: value.author,
            contents: value.contents,
            tags: value.tags.unwrap_or_default(),
        })
    }
}

impl TryFrom<PostFields> for PostUpdate {
    type Error = ModelValidationError;

    fn try_from(value: PostFields) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title.map(PostTitle::new).transpose()?,
            author: value.author,
            contents: value.contents,
            tags: value.tags,
        })
    }
}

impl PostUpdate {
    /// Applies the present fields to `post`. Timestamps are left to the caller.
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(author) = self.author {
            post.author = Some(author);
        }
        if let Some(contents) = self.contents {
            post.contents = Some(contents);
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
    }
}
