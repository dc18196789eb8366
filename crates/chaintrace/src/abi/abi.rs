use std::time::Instant;

use chaintrace_serialization::{Read, VarUint32};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chain::{Id, Name, TimePointSec, error::ChainError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbiTypeDefinition {
    pub new_type_name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbiFieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbiStructDefinition {
    pub name: String,
    pub base: String,
    pub fields: Vec<AbiFieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbiActionDefinition {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_name: String,
    pub ricardian_contract: String,
}

/// Description of a contract's binary action-data layout, used to decode
/// raw payloads into structured values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AbiDefinition {
    pub version: String,
    pub types: Vec<AbiTypeDefinition>,
    pub structs: Vec<AbiStructDefinition>,
    pub actions: Vec<AbiActionDefinition>,
}

impl AbiDefinition {
    /// Resolves an action name to the struct type describing its data.
    pub fn action_type(&self, action: Name) -> Option<&str> {
        self.actions
            .iter()
            .find(|a| a.name == action)
            .map(|a| self.resolve_type(&a.type_name))
    }

    /// Follows typedef aliases to the underlying type name.
    fn resolve_type<'a>(&'a self, type_name: &'a str) -> &'a str {
        let mut current = type_name;
        // Alias chains are short; the hop limit guards against cycles.
        for _ in 0..self.types.len() + 1 {
            match self.types.iter().find(|t| t.new_type_name == current) {
                Some(def) => current = &def.type_name,
                None => break,
            }
        }
        current
    }

    fn struct_def(&self, name: &str) -> Option<&AbiStructDefinition> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Decodes `data` as one value of `variant_name`, which may be a struct,
    /// a built-in type, an array (`T[]`), or an optional (`T?`). The
    /// deadline bounds total decode time; exceeding it is an error so the
    /// caller can fall back to the raw payload.
    pub fn binary_to_variant(
        &self,
        variant_name: &str,
        data: &[u8],
        deadline: Instant,
    ) -> Result<Value, ChainError> {
        let mut pos = 0;
        let value = self.parse_type(variant_name, data, &mut pos, deadline)?;
        Ok(value)
    }

    fn parse_struct(
        &self,
        struct_def: &AbiStructDefinition,
        data: &[u8],
        pos: &mut usize,
        deadline: Instant,
        variant: &mut Map<String, Value>,
    ) -> Result<(), ChainError> {
        if !struct_def.base.is_empty() {
            let base_name = self.resolve_type(&struct_def.base);
            let base = self.struct_def(base_name).ok_or_else(|| {
                ChainError::ParseError(format!("base '{}' not found in ABI", struct_def.base))
            })?;
            self.parse_struct(base, data, pos, deadline, variant)?;
        }
        for field in &struct_def.fields {
            variant.insert(
                field.name.clone(),
                self.parse_type(&field.type_name, data, pos, deadline)?,
            );
        }
        Ok(())
    }

    fn parse_type(
        &self,
        type_name: &str,
        data: &[u8],
        pos: &mut usize,
        deadline: Instant,
    ) -> Result<Value, ChainError> {
        if Instant::now() > deadline {
            return Err(ChainError::DecodeTimeout(type_name.to_string()));
        }

        let type_name = self.resolve_type(type_name);

        if let Some(elem) = type_name.strip_suffix("[]") {
            let len = VarUint32::read(data, pos)?.0 as usize;
            let mut items = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                items.push(self.parse_type(elem, data, pos, deadline)?);
            }
            return Ok(Value::Array(items));
        }

        if let Some(inner) = type_name.strip_suffix('?') {
            return match u8::read(data, pos)? {
                0 => Ok(Value::Null),
                _ => self.parse_type(inner, data, pos, deadline),
            };
        }

        match type_name {
            "int8" => Ok(Value::Number(i8::read(data, pos)?.into())),
            "uint8" => Ok(Value::Number(u8::read(data, pos)?.into())),
            "int16" => Ok(Value::Number(i16::read(data, pos)?.into())),
            "uint16" => Ok(Value::Number(u16::read(data, pos)?.into())),
            "int32" => Ok(Value::Number(i32::read(data, pos)?.into())),
            "uint32" => Ok(Value::Number(u32::read(data, pos)?.into())),
            "int64" => Ok(Value::Number(i64::read(data, pos)?.into())),
            "uint64" => Ok(Value::Number(u64::read(data, pos)?.into())),
            "varuint32" => Ok(Value::Number(VarUint32::read(data, pos)?.0.into())),
            "bool" => Ok(Value::Bool(bool::read(data, pos)?)),
            "name" => Ok(Value::String(Name::read(data, pos)?.to_string())),
            "string" => Ok(Value::String(String::read(data, pos)?)),
            "bytes" => {
                let bytes = crate::chain::Bytes::read(data, pos)?;
                Ok(Value::String(bytes.to_string()))
            }
            "checksum256" => Ok(Value::String(Id::read(data, pos)?.to_string())),
            "time_point_sec" => {
                let tps = TimePointSec::read(data, pos)?;
                serde_json::to_value(tps)
                    .map_err(|e| ChainError::SerializationError(e.to_string()))
            }
            other => {
                if let Some(struct_def) = self.struct_def(other) {
                    let mut variant = Map::new();
                    self.parse_struct(struct_def, data, pos, deadline, &mut variant)?;
                    Ok(Value::Object(variant))
                } else {
                    Err(ChainError::ParseError(format!(
                        "type '{}' is an invalid type name",
                        other
                    )))
                }
            }
        }
    }
}
