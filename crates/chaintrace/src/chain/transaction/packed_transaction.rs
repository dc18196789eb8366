use std::io::Read as IoRead;

use chaintrace_serialization::{NumBytes, Read, ReadError, Write, WriteError};
use flate2::read::ZlibDecoder;
use serde::Serialize;

use crate::chain::{Bytes, Id, Signature, SignedTransaction, Transaction, error::ChainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCompression {
    #[default]
    None,
    Zlib,
}

impl NumBytes for TransactionCompression {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        1
    }
}

impl Read for TransactionCompression {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        match u8::read(bytes, pos)? {
            0 => Ok(TransactionCompression::None),
            1 => Ok(TransactionCompression::Zlib),
            _ => Err(ReadError::ParseError),
        }
    }
}

impl Write for TransactionCompression {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        match self {
            TransactionCompression::None => 0_u8.write(bytes, pos),
            TransactionCompression::Zlib => 1_u8.write(bytes, pos),
        }
    }
}

/// A transaction as carried inside a block: signatures plus the packed,
/// possibly compressed transaction bytes. Unpacked eagerly on construction
/// so the derived id is always available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedTransaction {
    signatures: Vec<Signature>,
    compression: TransactionCompression,
    packed_context_free_data: Bytes,
    packed_trx: Bytes,

    // Following fields are not serialized
    unpacked_trx: SignedTransaction,
    trx_id: Id,
}

impl PackedTransaction {
    pub fn new(
        signatures: Vec<Signature>,
        compression: TransactionCompression,
        packed_context_free_data: Bytes,
        packed_trx: Bytes,
    ) -> Result<Self, ChainError> {
        let trx_bytes = maybe_decompress(compression, packed_trx.as_slice())?;
        let cfd_bytes = maybe_decompress(compression, packed_context_free_data.as_slice())?;
        let unpacked_trx = Transaction::unpack(&trx_bytes).map_err(|e| {
            ChainError::SerializationError(format!("failed to unpack transaction: {}", e))
        })?;
        let unpacked_context_free_data = if cfd_bytes.is_empty() {
            Vec::new()
        } else {
            Vec::<Bytes>::unpack(&cfd_bytes).map_err(|e| {
                ChainError::SerializationError(format!("failed to unpack context free data: {}", e))
            })?
        };
        let trx_id = unpacked_trx.id()?;

        Ok(Self {
            signatures: signatures.clone(),
            compression,
            packed_context_free_data,
            packed_trx,

            unpacked_trx: SignedTransaction::new(
                unpacked_trx,
                signatures,
                unpacked_context_free_data,
            ),
            trx_id,
        })
    }

    pub fn from_signed_transaction(trx: SignedTransaction) -> Result<Self, ChainError> {
        let trx_id = trx.transaction().id()?;

        Ok(Self {
            signatures: trx.signatures().to_vec(),
            compression: TransactionCompression::None,
            packed_context_free_data: Bytes::default(),
            packed_trx: trx
                .transaction()
                .pack()
                .map_err(|e| {
                    ChainError::SerializationError(format!("failed to pack transaction: {}", e))
                })?
                .into(),

            unpacked_trx: trx,
            trx_id,
        })
    }

    pub fn get_signed_transaction(&self) -> &SignedTransaction {
        &self.unpacked_trx
    }

    pub fn id(&self) -> &Id {
        &self.trx_id
    }
}

impl Serialize for PackedTransaction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("PackedTransaction", 5)?;
        state.serialize_field("id", &self.trx_id)?;
        state.serialize_field("signatures", &self.signatures)?;
        state.serialize_field("compression", &self.compression)?;
        state.serialize_field("packed_trx", &self.packed_trx)?;
        state.serialize_field("transaction", self.unpacked_trx.transaction())?;
        state.end()
    }
}

impl NumBytes for PackedTransaction {
    fn num_bytes(&self) -> usize {
        self.signatures.num_bytes()
            + self.compression.num_bytes()
            + self.packed_context_free_data.num_bytes()
            + self.packed_trx.num_bytes()
    }
}

impl Read for PackedTransaction {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let signatures = Vec::<Signature>::read(bytes, pos)?;
        let compression = TransactionCompression::read(bytes, pos)?;
        let packed_context_free_data = Bytes::read(bytes, pos)?;
        let packed_trx = Bytes::read(bytes, pos)?;
        PackedTransaction::new(
            signatures,
            compression,
            packed_context_free_data,
            packed_trx,
        )
        .map_err(|_| ReadError::ParseError)
    }
}

impl Write for PackedTransaction {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.signatures.write(bytes, pos)?;
        self.compression.write(bytes, pos)?;
        self.packed_context_free_data.write(bytes, pos)?;
        self.packed_trx.write(bytes, pos)
    }
}

fn maybe_decompress(
    compression: TransactionCompression,
    data: &[u8],
) -> Result<Vec<u8>, ChainError> {
    match compression {
        TransactionCompression::None => Ok(data.to_vec()),
        TransactionCompression::Zlib => {
            if data.is_empty() {
                return Ok(Vec::new());
            }
            let mut decoder = ZlibDecoder::new(data);
            let mut out = Vec::new();
            decoder.read_to_end(&mut out).map_err(|e| {
                ChainError::SerializationError(format!("zlib decompress failed: {e}"))
            })?;
            Ok(out)
        }
    }
}
