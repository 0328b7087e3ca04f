#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Invalid(String),

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! invalid {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        return Err($crate::Error::Invalid(format!($fmt $(, $arg)*)))
    };
}
