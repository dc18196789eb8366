use core::fmt;

use chaintrace_serialization::{NumBytes, Read, ReadError, Write, WriteError};
use serde::Serialize;

use crate::chain::{Bytes, Name, PermissionLevel};

/// One contract invocation: which account's contract, which action, under
/// which authorizations, with an opaque data payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Action {
    account: Name,
    name: Name,
    authorization: Vec<PermissionLevel>,
    data: Bytes,
}

impl Action {
    pub fn new(
        account: Name,
        name: Name,
        authorization: Vec<PermissionLevel>,
        data: Vec<u8>,
    ) -> Self {
        Action {
            account,
            name,
            authorization,
            data: Bytes(data),
        }
    }

    pub fn account(&self) -> Name {
        self.account
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn authorization(&self) -> &[PermissionLevel] {
        &self.authorization
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "action {{ account: {}, name: {}, authorization: {:?}, data: {} }}",
            self.account, self.name, self.authorization, self.data
        )
    }
}

impl NumBytes for Action {
    fn num_bytes(&self) -> usize {
        self.account.num_bytes()
            + self.name.num_bytes()
            + self.authorization.num_bytes()
            + self.data.num_bytes()
    }
}

impl Read for Action {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let account = Name::read(bytes, pos)?;
        let name = Name::read(bytes, pos)?;
        let authorization = Vec::<PermissionLevel>::read(bytes, pos)?;
        let data = Bytes::read(bytes, pos)?;
        Ok(Action {
            account,
            name,
            authorization,
            data,
        })
    }
}

impl Write for Action {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.account.write(bytes, pos)?;
        self.name.write(bytes, pos)?;
        self.authorization.write(bytes, pos)?;
        self.data.write(bytes, pos)
    }
}
