use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("not child name: {name} can not be inserted below {parent}")]
    NotChild {
        parent: String,
        name: String,
    },

    #[error("name is not subdomain of {origin}: {name}")]
    NotInDomain {
        origin: String,
        name: String,
    },

    #[error("can not remove itself: {0}")]
    RemoveItself(String),

    #[error("name not found: {0}")]
    NotFound(String),

    #[error("invalid domain name {name}: {reason}")]
    InvalidName {
        name: String,
        reason: String,
    },

    #[error("configuration error: {message}")]
    Config {
        message: String,
    },
}

pub type TreeResult<T> = Result<T, TreeError>;
