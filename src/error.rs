#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown node: {name}")]
    UnknownNode { name: String },
    #[error("edge {from} -> {to} targets an unknown node")]
    UnknownTarget { from: String, to: String },
    #[error("syntax error in dag: {message}")]
    Syntax { message: String },
    #[error("graph JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
