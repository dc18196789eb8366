use chaintrace_serialization::{NumBytes, Read, ReadError, Write, WriteError};
use serde::{Deserialize, Serialize};

use crate::chain::Name;

/// One actor@permission pair authorizing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PermissionLevel {
    actor: Name,
    permission: Name,
}

impl PermissionLevel {
    pub fn new(actor: Name, permission: Name) -> Self {
        PermissionLevel { actor, permission }
    }

    pub fn actor(&self) -> &Name {
        &self.actor
    }

    pub fn permission(&self) -> &Name {
        &self.permission
    }
}

impl NumBytes for PermissionLevel {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        self.actor.num_bytes() + self.permission.num_bytes()
    }
}

impl Read for PermissionLevel {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let actor = Name::read(bytes, pos)?;
        let permission = Name::read(bytes, pos)?;
        Ok(PermissionLevel { actor, permission })
    }
}

impl Write for PermissionLevel {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.actor.write(bytes, pos)?;
        self.permission.write(bytes, pos)
    }
}
