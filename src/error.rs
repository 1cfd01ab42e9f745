use thiserror::Error;

use crate::core::CollectionEvent;

pub type BindResult<T> = Result<T, BindError>;

#[derive(Debug, Error)]
pub enum BindError {
    #[error("collection lacks the observable capability set; cannot emit {missing:?}")]
    InvalidCollaborator { missing: Vec<CollectionEvent> },
}
