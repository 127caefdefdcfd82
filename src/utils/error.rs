use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    InvalidId(String),
    InvalidRequest(String),
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::InvalidId(id) => write!(f, "Invalid identifier: {}", id),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}
