//! `extid` converts internal sequential integer IDs into opaque, fixed-length external
//! identifiers and back, with a generic field type to manage the process with Serde and Diesel.
//!
//! Exposing raw database IDs lets outsiders estimate row counts and scan for neighbouring
//! objects.  `extid` encrypts each `i64` ID into an identifier such as
//! `user_13189a6ae4ab07ae70a3aabd30be99de`, so you can keep using monotonically increasing
//! integers as database keys without revealing them.
//!
//! The identifier is the tag, an underscore and 32 lowercase hex characters.  The hex
//! payload is a single AES block: the big-endian ID followed by eight zero bytes, encrypted
//! with the raw key (16, 24 or 32 bytes).  There is no MAC, so any well-formed payload
//! decodes to *some* number; `Codec::decode_strict` additionally rejects payloads whose
//! zero padding does not survive decryption.
//!
//! Please note that leaking the key means you lose all the security benefits.  You also
//! cannot change the key, unless it's OK that all exposed object identifiers change.
//!
//! # Usage
//!
//! ##  Generic `Field` API
//!
//! ```
//! use extid_rs;
//! use serde_json;
//!
//! // The type marker defines the string prefix.
//! #[derive(Debug)]
//! pub struct UserIdMarker;
//! impl extid_rs::TypeMarker for UserIdMarker {
//!     fn name() -> &'static str { "user" }
//! }
//!
//! type UserId = extid_rs::Field<UserIdMarker>;
//!
//! #[derive(serde::Serialize)]
//! struct User {
//!     pub id: UserId,
//! }
//!
//! static KEY: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
//! extid_rs::Config::set_global(extid_rs::Config::new(&KEY).unwrap());
//! let obj = User { id: UserId::new(0) };
//! let obj_str = serde_json::to_string(&obj).unwrap();
//! assert_eq!(obj_str, "{\"id\":\"user_c6a13b37878f5b826f4f8162a1c8d879\"}");
//! ```
//!
//! ## Low level API
//!
//! `Codec` provides a simple API to encode and decode integers.
//!
//! ```
//! use extid_rs::Codec;
//!
//! let key: Vec<u8> = (0..16).collect();
//! let codec = Codec::new("user", &key).unwrap();
//! let encoded = codec.encode(i64::MAX);
//! assert_eq!(encoded, "user_edc17bee21fb24e211e6419412e1c32e");
//! assert_eq!(codec.decode(&encoded).unwrap(), i64::MAX);
//! ```

mod codec;
mod config;
mod field;

pub use codec::{Codec, Error};
pub use config::{Config, ConfigError};
pub use field::{Field, FieldError, TypeMarker};
