use std::fmt;

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256, Block};
use log::debug;
use uuid::Uuid;

use crate::config::check_key_length;
use crate::{Config, ConfigError};

/// Error returned for decode errors.
#[derive(Debug, PartialEq)]
pub enum Error {
    InvalidPrefix { expected: String },
    InvalidLength { received: usize, expected: usize },
    InvalidEncoding,
    NonCanonical,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidPrefix { expected } => {
                write!(f, "Invalid prefix, expected {}", expected)
            }
            Error::InvalidLength { received, expected } => {
                write!(f, "Payload length was {}, expected {}", received, expected)
            }
            Error::InvalidEncoding => {
                write!(f, "Payload is not valid hex")
            }
            Error::NonCanonical => {
                write!(f, "Padding bytes of the decrypted block are not zero")
            }
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(_: hex::FromHexError) -> Error {
        Error::InvalidEncoding
    }
}

impl std::error::Error for Error {}

// AES block size; one block holds the whole identifier.
const BLOCK_SIZE: usize = 16;

// Length of the hex payload following the prefix.
const PAYLOAD_LENGTH: usize = BLOCK_SIZE * 2;

// The identifier occupies the first half of the plaintext block, the rest is zero.
const ID_LENGTH: usize = 8;

#[derive(Clone)]
enum BlockCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl BlockCipher {
    fn new(key: &[u8]) -> Result<Self, ConfigError> {
        check_key_length(key)?;
        let cipher = match key.len() {
            16 => Aes128::new_from_slice(key).map(BlockCipher::Aes128),
            24 => Aes192::new_from_slice(key).map(BlockCipher::Aes192),
            _ => Aes256::new_from_slice(key).map(BlockCipher::Aes256),
        };
        cipher.map_err(|_| ConfigError::InvalidKeyLength(key.len()))
    }

    fn key_bits(&self) -> usize {
        match self {
            BlockCipher::Aes128(_) => 128,
            BlockCipher::Aes192(_) => 192,
            BlockCipher::Aes256(_) => 256,
        }
    }

    fn encrypt(&self, bytes: &mut [u8; BLOCK_SIZE]) {
        let block = Block::from_mut_slice(bytes);
        match self {
            BlockCipher::Aes128(c) => c.encrypt_block(block),
            BlockCipher::Aes192(c) => c.encrypt_block(block),
            BlockCipher::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt(&self, bytes: &mut [u8; BLOCK_SIZE]) {
        let block = Block::from_mut_slice(bytes);
        match self {
            BlockCipher::Aes128(c) => c.decrypt_block(block),
            BlockCipher::Aes192(c) => c.decrypt_block(block),
            BlockCipher::Aes256(c) => c.decrypt_block(block),
        }
    }
}

/// Core encoder/decoder.
///
/// A `Codec` is immutable once built and can be shared freely between threads.
#[derive(Clone)]
pub struct Codec {
    cipher: BlockCipher,
    prefix: String,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Codec")
            .field("prefix", &self.prefix)
            .field("key_bits", &self.cipher.key_bits())
            .finish_non_exhaustive()
    }
}

impl Codec {
    /// Creates a new `Codec` instance with the given tag and key.
    ///
    /// The `tag` is used as a prefix (followed by `_`) in the encoded output.  The `key`
    /// is used directly as the AES key and must be 16, 24 or 32 bytes long.
    ///
    /// **Security note:** In order to be secure, you must provide a secure random `key`
    /// and manage it appropriately.  Use a distinct key per tag if identifiers of
    /// different types must not be linkable to each other.
    ///
    /// # Examples
    ///
    /// ```
    /// use extid_rs::{Codec, ConfigError};
    ///
    /// let key: Vec<u8> = (0..16).collect();
    /// assert!(Codec::new("user", &key).is_ok());
    /// assert_eq!(Codec::new("user", b"short").err(), Some(ConfigError::InvalidKeyLength(5)));
    /// ```
    pub fn new(tag: &str, key: &[u8]) -> Result<Codec, ConfigError> {
        let cipher = BlockCipher::new(key)?;
        debug!("built codec for tag {:?} with AES-{}", tag, cipher.key_bits());
        Ok(Codec {
            cipher,
            prefix: format!("{}_", tag),
        })
    }

    /// Creates a new `Codec` from an already validated `Config`.
    pub fn from_config(tag: &str, config: &Config) -> Codec {
        Codec::new(tag, config.key).expect("Config keys are validated on construction")
    }

    /// The `tag_` prefix every encoded identifier starts with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Encodes a numeric ID into its external string representation.
    ///
    /// The output is always the prefix followed by 32 lowercase hex characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use extid_rs::Codec;
    ///
    /// let key: Vec<u8> = (0..16).collect();
    /// let codec = Codec::new("user", &key).unwrap();
    ///
    /// assert_eq!(codec.encode(1), "user_13189a6ae4ab07ae70a3aabd30be99de");
    /// ```
    pub fn encode(&self, id: i64) -> String {
        let ciphertext = self.encrypt_id(id);
        let mut encoded = String::with_capacity(self.prefix.len() + PAYLOAD_LENGTH);
        encoded.push_str(&self.prefix);
        encoded.push_str(&hex::encode(ciphertext));
        encoded
    }

    /// Encrypts `id` into an UUID.  The UUID bytes are the same ciphertext as the hex
    /// payload of `encode`.
    pub fn encode_uuid(&self, id: i64) -> Uuid {
        Uuid::from_bytes(self.encrypt_id(id))
    }

    /// Decodes a previously encoded string back into its original numeric value.
    ///
    /// The input must start with this codec's prefix and carry exactly 32 hex characters.
    /// There is no integrity check: any well-formed payload decrypts to *some* number,
    /// even if it was never produced by `encode`.  Use `decode_strict` to reject
    /// payloads whose zero padding did not survive decryption.
    ///
    /// # Examples
    ///
    /// ```
    /// use extid_rs::{Codec, Error};
    ///
    /// let key: Vec<u8> = (0..16).collect();
    /// let codec = Codec::new("user", &key).unwrap();
    ///
    /// assert_eq!(codec.decode("user_13189a6ae4ab07ae70a3aabd30be99de"), Ok(1));
    /// assert_eq!(codec.decode("user_13189a"), Err(Error::InvalidLength { received: 6, expected: 32 }));
    /// ```
    pub fn decode(&self, encoded: &str) -> Result<i64, Error> {
        let plaintext = self.decrypt_payload(encoded)?;
        Ok(id_from_block(&plaintext))
    }

    /// Like `decode`, but fails with `Error::NonCanonical` when the decrypted block's
    /// padding is not all zeroes, i.e. the payload was not produced by `encode` with this key.
    pub fn decode_strict(&self, encoded: &str) -> Result<i64, Error> {
        let plaintext = self.decrypt_payload(encoded)?;
        canonical_id_from_block(&plaintext)
    }

    /// Decrypts an UUID produced by `encode_uuid`.
    pub fn decode_uuid(&self, uuid: &Uuid) -> i64 {
        let mut block = *uuid.as_bytes();
        self.cipher.decrypt(&mut block);
        id_from_block(&block)
    }

    /// Like `decode_uuid`, but fails with `Error::NonCanonical` when the decrypted
    /// block's padding is not all zeroes.
    pub fn decode_uuid_strict(&self, uuid: &Uuid) -> Result<i64, Error> {
        let mut block = *uuid.as_bytes();
        self.cipher.decrypt(&mut block);
        canonical_id_from_block(&block)
    }

    fn encrypt_id(&self, id: i64) -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        block[..ID_LENGTH].copy_from_slice(&id.to_be_bytes());
        self.cipher.encrypt(&mut block);
        block
    }

    fn decrypt_payload(&self, encoded: &str) -> Result<[u8; BLOCK_SIZE], Error> {
        // Match the whole prefix rather than splitting on '_', tags may contain it.
        let payload = encoded
            .strip_prefix(self.prefix.as_str())
            .ok_or_else(|| Error::InvalidPrefix {
                expected: self.prefix.clone(),
            })?;

        if payload.len() != PAYLOAD_LENGTH {
            return Err(Error::InvalidLength {
                received: payload.len(),
                expected: PAYLOAD_LENGTH,
            });
        }

        let mut block = [0u8; BLOCK_SIZE];
        hex::decode_to_slice(payload, &mut block)?;
        self.cipher.decrypt(&mut block);
        Ok(block)
    }
}

fn id_from_block(block: &[u8; BLOCK_SIZE]) -> i64 {
    let mut id = [0u8; ID_LENGTH];
    id.copy_from_slice(&block[..ID_LENGTH]);
    i64::from_be_bytes(id)
}

fn canonical_id_from_block(block: &[u8; BLOCK_SIZE]) -> Result<i64, Error> {
    if block[ID_LENGTH..].iter().any(|&b| b != 0) {
        return Err(Error::NonCanonical);
    }
    Ok(id_from_block(block))
}
