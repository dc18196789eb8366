pub mod abi;
pub mod chain;
pub mod trace;
