//! Repository error taxonomy.

use crate::db::DbError;
use crate::model::car::CarId;
use crate::model::engine::EngineId;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Record a lookup or write expected but did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRecord {
    Car(CarId),
    Engine(EngineId),
}

/// Coarse failure class, used by outer layers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

/// Error returned by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    NotFound(MissingRecord),
    Db(DbError),
    /// A persisted row could not be decoded into the domain model.
    InvalidData(String),
    /// Connection schema is not at the version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Db(_) | Self::InvalidData(_) | Self::UninitializedConnection { .. } => {
                ErrorKind::Storage
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(MissingRecord::Car(id)) => write!(f, "car not found: {id}"),
            Self::NotFound(MissingRecord::Engine(id)) => write!(f, "engine not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "car store requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, MissingRecord, RepoError};
    use crate::db::DbError;
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            RepoError::from(ValidationError::PriceNotPositive).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            RepoError::NotFound(MissingRecord::Car(Uuid::nil())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(RepoError::from(DbError::Cancelled).kind(), ErrorKind::Storage);
        assert_eq!(
            RepoError::InvalidData("bad".to_string()).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn not_found_messages_name_the_entity() {
        let id = Uuid::nil();
        assert_eq!(
            RepoError::NotFound(MissingRecord::Car(id)).to_string(),
            format!("car not found: {id}")
        );
        assert_eq!(
            RepoError::NotFound(MissingRecord::Engine(id)).to_string(),
            format!("engine not found: {id}")
        );
    }
}
