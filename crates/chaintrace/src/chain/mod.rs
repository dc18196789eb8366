pub const SYSTEM_NAME: Name = Name::named("chain");
pub const ACTIVE_NAME: Name = Name::named("active");
pub const ONBLOCK_NAME: Name = Name::named("onblock");

pub mod error;

mod authority;
pub use authority::PermissionLevel;

mod block;
pub use block::*;

mod crypto;
pub use crypto::*;

mod id;
pub use id::Id;

mod name;
pub use name::{Name, ParseNameError};

mod time;
pub use time::*;

mod transaction;
pub use transaction::*;
