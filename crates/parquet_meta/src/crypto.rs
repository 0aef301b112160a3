//! Hooks for parquet modular encryption.
//!
//! Ciphers themselves live outside this crate. Metadata structures are
//! encrypted whole, with the additional authenticated data (AAD) chosen by
//! the caller per structure.

use std::fmt::Debug;

use parquet_meta_error::{MetaError, Result};

/// Length of the little-endian length prefix framing each ciphertext.
pub const CIPHERTEXT_LENGTH_PREFIX: usize = 4;

pub trait Encryptor: Debug + Sync + Send {
    /// Encrypt a serialized structure, returning the full ciphertext as it
    /// should appear in the file.
    fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>>;
}

pub trait Decryptor: Debug + Sync + Send {
    /// Decrypt a complete ciphertext as produced by the matching encryptor.
    fn decrypt(&self, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>>;

    /// Number of bytes at the start of `input` making up one ciphertext.
    ///
    /// Used when a ciphertext is followed by other data, like page headers
    /// followed by page payloads. Defaults to modular encryption framing, a
    /// 4 byte little-endian length followed by that many bytes.
    fn ciphertext_len(&self, input: &[u8]) -> Result<usize> {
        let prefix: [u8; CIPHERTEXT_LENGTH_PREFIX] = input
            .get(..CIPHERTEXT_LENGTH_PREFIX)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| MetaError::cipher("ciphertext too short for length prefix"))?;

        let len = u32::from_le_bytes(prefix) as usize + CIPHERTEXT_LENGTH_PREFIX;
        if len > input.len() {
            return Err(MetaError::cipher(format!(
                "ciphertext length {len} exceeds available {} bytes",
                input.len()
            )));
        }

        Ok(len)
    }
}

/// Decryption for column metadata encrypted with a column key, stored in the
/// chunk's `encrypted_column_metadata` rather than alongside the footer.
pub trait ColumnMetadataDecryptor: Debug + Sync + Send {
    /// Decryptor and AAD for the metadata of column `column_ordinal` in row
    /// group `row_group_ordinal`.
    ///
    /// `None` if the reader doesn't hold the key for that column.
    fn column_decryption(
        &self,
        row_group_ordinal: usize,
        column_ordinal: usize,
    ) -> Option<(&dyn Decryptor, Vec<u8>)>;
}

/// An encryptor paired with the AAD for the structure being written.
#[derive(Debug, Clone, Copy)]
pub struct EncryptionContext<'a> {
    pub encryptor: &'a dyn Encryptor,
    pub aad: &'a [u8],
}

impl<'a> EncryptionContext<'a> {
    pub fn new(encryptor: &'a dyn Encryptor, aad: &'a [u8]) -> Self {
        EncryptionContext { encryptor, aad }
    }
}

/// A decryptor paired with the AAD for the structure being read.
#[derive(Debug, Clone, Copy)]
pub struct DecryptionContext<'a> {
    pub decryptor: &'a dyn Decryptor,
    pub aad: &'a [u8],
}

impl<'a> DecryptionContext<'a> {
    pub fn new(decryptor: &'a dyn Decryptor, aad: &'a [u8]) -> Self {
        DecryptionContext { decryptor, aad }
    }

    /// Same decryptor, different AAD.
    pub fn with_aad(&self, aad: &'a [u8]) -> Self {
        DecryptionContext {
            decryptor: self.decryptor,
            aad,
        }
    }
}

/// Decryption for the page headers of one column chunk.
///
/// Each header is bound to its position in the chunk through its AAD, given
/// by `aad` for the header's ordinal. Ordinals start at 0 and count every
/// header in the chunk, the dictionary page's included.
pub struct PageHeaderDecryption<'a> {
    decryptor: &'a dyn Decryptor,
    aad: Box<dyn FnMut(usize) -> Vec<u8> + 'a>,
}

impl<'a> PageHeaderDecryption<'a> {
    pub fn new(
        decryptor: &'a dyn Decryptor,
        aad: impl FnMut(usize) -> Vec<u8> + 'a,
    ) -> Self {
        PageHeaderDecryption {
            decryptor,
            aad: Box::new(aad),
        }
    }

    pub fn decryptor(&self) -> &'a dyn Decryptor {
        self.decryptor
    }

    /// AAD of the header at `ordinal`.
    pub fn aad(&mut self, ordinal: usize) -> Vec<u8> {
        (self.aad)(ordinal)
    }
}

impl Debug for PageHeaderDecryption<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHeaderDecryption")
            .field("decryptor", &self.decryptor)
            .finish_non_exhaustive()
    }
}
