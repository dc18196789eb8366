use chaintrace_serialization::{ReadError, WriteError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("serialization error: {0}")]
    SerializationError(String),
    #[error("transaction error: {0}")]
    TransactionError(String),
    #[error("block error: {0}")]
    BlockError(String),
    #[error("store error: {0}")]
    StoreError(String),
    #[error("decode deadline exceeded while decoding '{0}'")]
    DecodeTimeout(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<ReadError> for ChainError {
    fn from(err: ReadError) -> Self {
        ChainError::SerializationError(err.to_string())
    }
}

impl From<WriteError> for ChainError {
    fn from(err: WriteError) -> Self {
        ChainError::SerializationError(err.to_string())
    }
}
