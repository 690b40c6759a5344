pub mod post;
pub mod query;

use crate::model::post::InvalidPostTitleError;
use derive_where::derive_where;
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error("`{0}` is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Title(#[from] InvalidPostTitleError),
}

/// Store-assigned identifier, typed by the entity it belongs to.
///
/// Ids are version 7 UUIDs, so ids generated by one process sort in creation order.
#[derive_where(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<Marker>(Uuid, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid, PhantomData)
    }

    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }

    #[must_use]
    pub fn uuid(self) -> Uuid {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<Uuid> for Id<Marker> {
    fn from(value: Uuid) -> Self {
        Self::new(value)
    }
}
