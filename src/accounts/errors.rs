use thiserror::Error;

/// Field guarded by a live-row unique index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Username => f.write_str("username"),
            UniqueField::Email => f.write_str("email"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {0}")]
    Conflict(UniqueField),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures returned by the account use-cases.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("email already exists")]
    EmailTaken,

    #[error("account not found")]
    NotFound,

    #[error("invalid credential")]
    InvalidCredential,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(UniqueField::Username) => AccountError::UsernameTaken,
            StoreError::Conflict(UniqueField::Email) => AccountError::EmailTaken,
            StoreError::Database(e) => AccountError::Internal(e.into()),
        }
    }
}
