use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use diesel::deserialize::{self, FromSql, Queryable};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::{Codec, Config, ConfigError, Error};

thread_local! {
    // Codecs by tag, together with the global config generation they were built under.
    static CODEC_CACHE: RefCell<(u64, HashMap<String, Arc<Codec>>)> =
        RefCell::new((0, HashMap::new()));
}

fn get_or_create_codec(name: &str) -> Result<Arc<Codec>, ConfigError> {
    CODEC_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        let (generation, codecs) = &mut *cache;
        let current = Config::generation();
        if *generation != current {
            codecs.clear();
            *generation = current;
        }
        if let Some(codec) = codecs.get(name) {
            return Ok(codec.clone());
        }
        let config = Config::global().ok_or(ConfigError::GlobalNotSet)?;
        let codec = Arc::new(Codec::from_config(name, &config));
        codecs.insert(name.to_string(), codec.clone());
        Ok(codec)
    })
}

pub trait TypeMarker: std::fmt::Debug {
    fn name() -> &'static str;
}

/// Error returned by the `Field` encode/decode helpers.
#[derive(Debug, PartialEq)]
pub enum FieldError {
    Config(ConfigError),
    Decode(Error),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldError::Config(e) => write!(f, "{}", e),
            FieldError::Decode(e) => write!(f, "{}", e),
        }
    }
}

impl From<ConfigError> for FieldError {
    fn from(e: ConfigError) -> FieldError {
        FieldError::Config(e)
    }
}

impl From<Error> for FieldError {
    fn from(e: Error) -> FieldError {
        FieldError::Decode(e)
    }
}

impl std::error::Error for FieldError {}

/// A generic type-safe object ID field (a wrapped i64).
///
/// When serialized with Serde, the number is automatically encrypted and encoded
/// into a prefixed hex string.  Deserialization decodes and decrypts the string back
/// to an integer.  The prefix is the type marker's `fn name()`, and the key comes from
/// the global `Config`.
///
/// Traits are also provided for Diesel compatibility with Postgres BigInt fields.
///
/// # Examples
///
/// ```
/// use extid_rs;
/// use serde_json;
///
/// #[derive(Clone, Copy, Debug)]
/// pub struct UserIdMarker;
/// impl extid_rs::TypeMarker for UserIdMarker {
///     fn name() -> &'static str { "user" }
/// }
///
/// type UserId = extid_rs::Field<UserIdMarker>;
///
/// #[derive(serde::Serialize)]
/// struct User {
///     pub id: UserId,
/// }
///
/// static KEY: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
/// extid_rs::Config::set_global(extid_rs::Config::new(&KEY).unwrap());
/// let obj = User { id: UserId::new(1) };
/// let obj_str = serde_json::to_string(&obj).unwrap();
/// assert_eq!(obj_str, "{\"id\":\"user_13189a6ae4ab07ae70a3aabd30be99de\"}");
/// ```
#[derive(AsExpression, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[diesel(sql_type = BigInt)]
pub struct Field<T: TypeMarker> {
    id: i64,
    _marker: std::marker::PhantomData<T>,
}

impl<T: TypeMarker> From<i64> for Field<T> {
    fn from(id: i64) -> Self {
        Field::new(id)
    }
}

impl<T: TypeMarker> From<Field<T>> for i64 {
    /// Returns the raw `i64` value.
    fn from(field: Field<T>) -> Self {
        field.id
    }
}

impl<T: TypeMarker> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Field {{ id: {}, marker: {} }}", self.id, T::name())
    }
}

impl<T: TypeMarker> Field<T> {
    /// Wraps a raw `i64` ID.
    pub fn new(id: i64) -> Self {
        Field {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the raw `i64` value.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Encodes the ID with the codec for `T::name()`.
    pub fn encode(&self) -> Result<String, FieldError> {
        let codec = get_or_create_codec(T::name())?;
        Ok(codec.encode(self.id))
    }

    /// Decodes an external identifier carrying the `T::name()` prefix.
    pub fn decode(encoded: &str) -> Result<Self, FieldError> {
        let codec = get_or_create_codec(T::name())?;
        Ok(Field::new(codec.decode(encoded)?))
    }

    /// Encrypts the ID into a `Uuid` value.
    pub fn encode_uuid(&self) -> Result<Uuid, FieldError> {
        let codec = get_or_create_codec(T::name())?;
        Ok(codec.encode_uuid(self.id))
    }
}

impl<T: TypeMarker> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de, T: TypeMarker> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        Field::decode(&encoded).map_err(serde::de::Error::custom)
    }
}

impl<T: TypeMarker> ToSql<BigInt, Pg> for Field<T> {
    fn to_sql(&self, out: &mut Output<'_, '_, Pg>) -> serialize::Result {
        <i64 as ToSql<BigInt, Pg>>::to_sql(&self.id, &mut out.reborrow())
    }
}

impl<T: TypeMarker> FromSql<BigInt, Pg> for Field<T> {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let id = <i64 as FromSql<BigInt, Pg>>::from_sql(bytes)?;
        Ok(Field::new(id))
    }
}

impl<T> Queryable<BigInt, Pg> for Field<T>
where
    T: TypeMarker,
{
    type Row = <i64 as Queryable<BigInt, Pg>>::Row;

    fn build(row: Self::Row) -> deserialize::Result<Self> {
        let id = i64::build(row)?;
        Ok(Field::new(id))
    }
}
