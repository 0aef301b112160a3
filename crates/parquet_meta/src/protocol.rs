//! Encoding and decoding of wire structures, optionally through a cipher.

use std::any::type_name;

use parquet_meta_error::{ErrorKind, MetaError, Result, ResultExt};
use thrift::protocol::{
    field_id,
    TCompactInputProtocol,
    TCompactOutputProtocol,
    TInputProtocol,
    TType,
};
use tracing::trace;

use crate::counters::MetadataCounters;
use crate::crypto::{DecryptionContext, EncryptionContext};
use crate::thrift_ext::{read_list, TSerializable};
use crate::thrift_gen::{EncryptionAlgorithm, KeyValue, RowGroup, SchemaElement};

/// Short name of a wire struct for error messages.
fn struct_name<S>() -> &'static str {
    let name = type_name::<S>();
    name.rsplit("::").next().unwrap_or(name)
}

fn corrupt_decode<S>(err: thrift::Error) -> MetaError {
    MetaError::with_kind_and_source(
        ErrorKind::CorruptMetadata,
        format!("failed to read {}", struct_name::<S>()),
        Box::new(err),
    )
}

/// Serializes and deserializes wire structures using the thrift compact
/// protocol.
///
/// When given an encryption or decryption context the serialized bytes go
/// through the cipher as a single unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec<'a> {
    counters: Option<&'a MetadataCounters>,
}

impl<'a> WireCodec<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record decrypted byte counts in `counters`.
    pub fn with_counters(counters: Option<&'a MetadataCounters>) -> Self {
        WireCodec { counters }
    }

    /// Serialize `value`, appending to `out`.
    pub fn encode<S: TSerializable>(
        &self,
        value: &S,
        out: &mut Vec<u8>,
        encryption: Option<EncryptionContext>,
    ) -> Result<()> {
        match encryption {
            None => serialize(value, out),
            Some(ctx) => {
                let mut plaintext = Vec::new();
                serialize(value, &mut plaintext)?;
                let ciphertext = ctx.encryptor.encrypt(&plaintext, ctx.aad).map_err(|e| {
                    e.wrap(
                        ErrorKind::Cipher,
                        format!("failed to encrypt {}", struct_name::<S>()),
                    )
                })?;
                out.extend_from_slice(&ciphertext);
                Ok(())
            }
        }
    }

    /// Deserialize a value that spans exactly `bytes`.
    ///
    /// Trailing bytes after the struct are ignored.
    pub fn decode<S: TSerializable>(
        &self,
        bytes: &[u8],
        decryption: Option<DecryptionContext>,
    ) -> Result<S> {
        match decryption {
            None => deserialize_prefix(bytes).map(|(v, _)| v),
            Some(ctx) => {
                let plaintext = self.decrypt::<S>(bytes, ctx)?;
                deserialize_prefix(&plaintext).map(|(v, _)| v)
            }
        }
    }

    /// Deserialize a value from the start of `bytes`, returning the value and
    /// the number of input bytes it occupied.
    pub fn decode_prefix<S: TSerializable>(
        &self,
        bytes: &[u8],
        decryption: Option<DecryptionContext>,
    ) -> Result<(S, usize)> {
        match decryption {
            None => deserialize_prefix(bytes),
            Some(ctx) => {
                let len = ctx.decryptor.ciphertext_len(bytes)?;
                let ciphertext = bytes.get(..len).ok_or_else(|| {
                    MetaError::cipher(format!(
                        "ciphertext length {len} for {} exceeds available {} bytes",
                        struct_name::<S>(),
                        bytes.len()
                    ))
                })?;
                let plaintext = self.decrypt::<S>(ciphertext, ctx)?;
                let (value, _) = deserialize_prefix(&plaintext)?;
                Ok((value, len))
            }
        }
    }

    /// Decode a serialized `FileMetaData`, handing each field to the
    /// matching handler as it's read.
    ///
    /// Fields without a handler are skipped without being materialized. Row
    /// groups are skipped as well when `skip_row_groups` is set.
    pub fn decode_file_metadata_streaming(
        &self,
        bytes: &[u8],
        decryption: Option<DecryptionContext>,
        skip_row_groups: bool,
        handlers: &mut FileMetadataHandlers,
    ) -> Result<()> {
        let plaintext;
        let bytes = match decryption {
            None => bytes,
            Some(ctx) => {
                plaintext = self.decrypt::<crate::thrift_gen::FileMetaData>(bytes, ctx)?;
                plaintext.as_slice()
            }
        };

        let mut i_prot = TCompactInputProtocol::new(bytes);
        stream_file_metadata(&mut i_prot, skip_row_groups, handlers)
    }

    fn decrypt<S>(&self, ciphertext: &[u8], ctx: DecryptionContext) -> Result<Vec<u8>> {
        let plaintext = ctx.decryptor.decrypt(ciphertext, ctx.aad).map_err(|e| {
            e.wrap(
                ErrorKind::Cipher,
                format!("failed to decrypt {}", struct_name::<S>()),
            )
        })?;
        if let Some(counters) = self.counters {
            counters.add_decrypted_bytes(plaintext.len());
        }
        trace!(
            ciphertext_len = ciphertext.len(),
            plaintext_len = plaintext.len(),
            name = struct_name::<S>(),
            "decrypted struct"
        );
        Ok(plaintext)
    }
}

fn serialize<S: TSerializable>(value: &S, out: &mut Vec<u8>) -> Result<()> {
    let mut o_prot = TCompactOutputProtocol::new(out);
    value
        .write_to_out_protocol(&mut o_prot)
        .context_fn(|| format!("failed to write {}", struct_name::<S>()))
}

fn deserialize_prefix<S: TSerializable>(bytes: &[u8]) -> Result<(S, usize)> {
    let mut remaining = bytes;
    let value = {
        let mut i_prot = TCompactInputProtocol::new(&mut remaining);
        S::read_from_in_protocol(&mut i_prot).map_err(corrupt_decode::<S>)?
    };
    Ok((value, bytes.len() - remaining.len()))
}

type Handler<'a, T> = Option<Box<dyn FnMut(T) -> Result<()> + 'a>>;

/// Callbacks for streaming decode of `FileMetaData`.
///
/// Handlers are invoked in wire field order. `on_row_group` and
/// `on_key_value` are called once per list element.
#[derive(Default)]
pub struct FileMetadataHandlers<'a> {
    pub on_version: Handler<'a, i32>,
    pub on_schema: Handler<'a, Vec<SchemaElement>>,
    pub on_num_rows: Handler<'a, i64>,
    pub on_row_group: Handler<'a, RowGroup>,
    pub on_key_value: Handler<'a, KeyValue>,
    pub on_created_by: Handler<'a, String>,
    pub on_encryption_algorithm: Handler<'a, EncryptionAlgorithm>,
    pub on_footer_signing_key: Handler<'a, Vec<u8>>,
}

impl std::fmt::Debug for FileMetadataHandlers<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileMetadataHandlers")
            .field("on_version", &self.on_version.is_some())
            .field("on_schema", &self.on_schema.is_some())
            .field("on_num_rows", &self.on_num_rows.is_some())
            .field("on_row_group", &self.on_row_group.is_some())
            .field("on_key_value", &self.on_key_value.is_some())
            .field("on_created_by", &self.on_created_by.is_some())
            .field(
                "on_encryption_algorithm",
                &self.on_encryption_algorithm.is_some(),
            )
            .field("on_footer_signing_key", &self.on_footer_signing_key.is_some())
            .finish()
    }
}

/// Read a single value and hand it to the handler, or skip it.
fn read_or_skip<T, P, F>(
    i_prot: &mut P,
    field_type: TType,
    handler: &mut Handler<'_, T>,
    read: F,
) -> Result<()>
where
    P: TInputProtocol,
    F: FnOnce(&mut P) -> thrift::Result<T>,
{
    match handler {
        Some(handler) => {
            let val = read(i_prot).map_err(corrupt_decode::<crate::thrift_gen::FileMetaData>)?;
            handler(val)
        }
        None => i_prot
            .skip(field_type)
            .map_err(corrupt_decode::<crate::thrift_gen::FileMetaData>),
    }
}

/// Read a list element by element, handing each to the handler, or skip the
/// whole list.
fn read_list_or_skip<T, P>(
    i_prot: &mut P,
    field_type: TType,
    handler: &mut Handler<'_, T>,
) -> Result<()>
where
    T: TSerializable,
    P: TInputProtocol,
{
    let handler = match handler {
        Some(handler) => handler,
        None => {
            return i_prot
                .skip(field_type)
                .map_err(corrupt_decode::<crate::thrift_gen::FileMetaData>)
        }
    };

    let list_ident = i_prot
        .read_list_begin()
        .map_err(corrupt_decode::<crate::thrift_gen::FileMetaData>)?;
    if list_ident.size < 0 {
        return Err(MetaError::corrupt(format!(
            "negative list size: {}",
            list_ident.size
        )));
    }
    for _ in 0..list_ident.size {
        let val = T::read_from_in_protocol(i_prot).map_err(corrupt_decode::<T>)?;
        handler(val)?;
    }
    i_prot
        .read_list_end()
        .map_err(corrupt_decode::<crate::thrift_gen::FileMetaData>)
}

fn stream_file_metadata<P: TInputProtocol>(
    i_prot: &mut P,
    skip_row_groups: bool,
    handlers: &mut FileMetadataHandlers,
) -> Result<()> {
    let map_err = corrupt_decode::<crate::thrift_gen::FileMetaData>;

    let mut seen_version = false;
    let mut seen_schema = false;
    let mut seen_num_rows = false;
    let mut seen_row_groups = false;

    i_prot.read_struct_begin().map_err(map_err)?;
    loop {
        let field_ident = i_prot.read_field_begin().map_err(map_err)?;
        if field_ident.field_type == TType::Stop {
            break;
        }
        let field_type = field_ident.field_type;
        match field_id(&field_ident).map_err(map_err)? {
            1 => {
                seen_version = true;
                read_or_skip(i_prot, field_type, &mut handlers.on_version, |p| {
                    p.read_i32()
                })?;
            }
            2 => {
                seen_schema = true;
                read_or_skip(i_prot, field_type, &mut handlers.on_schema, |p| {
                    read_list(p)
                })?;
            }
            3 => {
                seen_num_rows = true;
                read_or_skip(i_prot, field_type, &mut handlers.on_num_rows, |p| {
                    p.read_i64()
                })?;
            }
            4 => {
                seen_row_groups = true;
                if skip_row_groups {
                    i_prot.skip(field_type).map_err(map_err)?;
                } else {
                    read_list_or_skip(i_prot, field_type, &mut handlers.on_row_group)?;
                }
            }
            5 => read_list_or_skip(i_prot, field_type, &mut handlers.on_key_value)?,
            6 => read_or_skip(i_prot, field_type, &mut handlers.on_created_by, |p| {
                p.read_string()
            })?,
            8 => read_or_skip(
                i_prot,
                field_type,
                &mut handlers.on_encryption_algorithm,
                EncryptionAlgorithm::read_from_in_protocol,
            )?,
            9 => read_or_skip(
                i_prot,
                field_type,
                &mut handlers.on_footer_signing_key,
                |p| p.read_bytes(),
            )?,
            _ => i_prot.skip(field_type).map_err(map_err)?,
        }
        i_prot.read_field_end().map_err(map_err)?;
    }
    i_prot.read_struct_end().map_err(map_err)?;

    for (seen, name) in [
        (seen_version, "version"),
        (seen_schema, "schema"),
        (seen_num_rows, "num_rows"),
        (seen_row_groups, "row_groups"),
    ] {
        if !seen {
            return Err(MetaError::corrupt(format!(
                "missing required field FileMetaData.{name}"
            )));
        }
    }

    Ok(())
}
