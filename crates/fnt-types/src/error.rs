use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown {ty} discriminant: {value}")]
    UnknownDiscriminant { ty: &'static str, value: u8 },

    #[error("unknown {ty} name: {name:?}")]
    UnknownName { ty: &'static str, name: String },

    #[error("invalid resource id: {0}")]
    InvalidId(String),

    #[error("{0} is not a media kind")]
    NotMedia(&'static str),
}
