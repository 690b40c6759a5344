use folio_common::model::{
    ModelValidationError,
    post::{Post, PostTitle},
};
use sqlx::FromRow;
use time::PrimitiveDateTime;
use uuid::Uuid;

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct PostRecord {
    pub post_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub contents: Option<String>,
    pub tags: Vec<String>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.post_id.into(),
            title: PostTitle::new(value.title)?,
            author: value.author,
            contents: value.contents,
            tags: value.tags,
            created_at: value.created_at.assume_utc(),
            updated_at: value.updated_at.assume_utc(),
        })
    }
}
