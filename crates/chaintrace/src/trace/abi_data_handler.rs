use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::abi::AbiDefinition;
use crate::chain::{Action, Name};

/// Lookup seam for decoding schemas. Resolved at decode time, not
/// snapshotted, so a trace decoded later sees the account's current ABI.
pub trait AbiResolver {
    fn abi_for(&self, account: Name) -> Option<&AbiDefinition>;
}

/// Process-lifetime registry of decoding schemas, one per account.
#[derive(Debug, Clone, Default)]
pub struct AbiDataHandler {
    abis: HashMap<Name, AbiDefinition>,
}

impl AbiDataHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs or replaces the schema for an account. There is no
    /// unregister; schemas live until replaced.
    pub fn add_abi(&mut self, account: Name, abi: AbiDefinition) {
        self.abis.insert(account, abi);
    }
}

impl AbiResolver for AbiDataHandler {
    fn abi_for(&self, account: Name) -> Option<&AbiDefinition> {
        self.abis.get(&account)
    }
}

/// Decodes an action's data payload through the resolver. Missing schema,
/// unknown action type, decode failure, and an exhausted time budget all
/// degrade to the raw payload as a hex string.
pub fn process_data<R: AbiResolver + ?Sized>(
    resolver: &R,
    action: &Action,
    max_decode_time: Duration,
) -> Value {
    let raw = Value::String(hex::encode(action.data()));

    let Some(abi) = resolver.abi_for(action.account()) else {
        return raw;
    };
    let Some(type_name) = abi.action_type(action.name()) else {
        return raw;
    };

    let deadline = Instant::now() + max_decode_time;
    match abi.binary_to_variant(type_name, action.data(), deadline) {
        Ok(value) => value,
        Err(_) => raw,
    }
}
