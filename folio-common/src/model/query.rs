use crate::model::post::Post;
use serde::{Deserialize, Serialize};

/// Post attribute a listing can be ordered by.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Author,
    Contents,
    Id,
}

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "asc")]
    Ascending,
    #[default]
    #[serde(alias = "desc")]
    Descending,
}

/// Ordering of a listing. Defaults to newest first.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "camelCase", default)]
pub struct ListOptions {
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

/// Which posts a listing selects.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub enum PostFilter {
    #[default]
    All,
    /// Exact, case-sensitive author match.
    Author(String),
    /// Posts whose tags contain the value.
    Tag(String),
}

impl PostFilter {
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Author(author) => post.author.as_deref() == Some(author.as_str()),
            PostFilter::Tag(tag) => post.tags.iter().any(|post_tag| post_tag == tag),
        }
    }
}
