use core::fmt;

use crate::chain::error::ChainError;
use crate::trace::BlockTraceV0;

/// Durable sink for assembled traces. Implementations own retry and
/// backoff policy; the extractor never retries.
pub trait TraceStore {
    /// Durably store one assembled block trace.
    fn append(&self, trace: BlockTraceV0) -> Result<(), ChainError>;

    /// Durably record the last-irreversible-block watermark.
    fn append_lib(&self, block_num: u32) -> Result<(), ChainError>;
}

/// Context attached to a failure before it is handed to the exception
/// handler: which operation failed, for which block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionContext {
    pub operation: &'static str,
    pub block_num: Option<u32>,
    pub error: ChainError,
}

impl fmt::Display for ExceptionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block_num {
            Some(num) => write!(f, "{} failed for block {}: {}", self.operation, num, self.error),
            None => write!(f, "{} failed: {}", self.operation, self.error),
        }
    }
}

/// Decides what to do with a failure: log, alert, or halt. Policy belongs
/// to the host, never to the extractor.
pub type ExceptionHandler = Box<dyn Fn(ExceptionContext)>;
