mod block;
pub use block::{BlockHeader, BlockState, SignedBlock, SignedBlockHeader};
