mod abi_data_handler;
pub use abi_data_handler::{AbiDataHandler, AbiResolver, process_data};

mod extraction;
pub use extraction::ChainExtractor;

mod store;
pub use store::{ExceptionContext, ExceptionHandler, TraceStore};

mod trace;
pub use trace::{ActionTraceV0, AuthorizationTraceV0, BlockTraceV0, TransactionTraceV0};
