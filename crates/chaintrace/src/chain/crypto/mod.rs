mod bytes;
pub use bytes::Bytes;

mod digest;
pub use digest::Digest;

mod signature;
pub use signature::Signature;
