//! Serializer Module
//!
//! Converts typed values to the text stored in the cache and back.

mod json;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::SerializerError;

pub use json::JsonSerializer;

// == Public Constants ==
/// Type tag reserved for the logical-null sentinel.
pub const NULL_TAG: &str = "null";

// == Cache Type ==
/// A value that can be stored in the cache.
///
/// The type tag is written alongside the encoded value so that a read for a
/// different type fails instead of silently reinterpreting the payload.
/// Container tags embed their element tag (`list<u8>`, `map<string>`).
/// `Default` is the "miss" value returned when nothing usable is cached.
pub trait CacheType: Serialize + DeserializeOwned + Default + PartialEq + Send + Sync {
    fn type_tag() -> Cow<'static, str>;

    /// Whether this value is the logical null, encoded as the sentinel.
    fn is_null(&self) -> bool {
        false
    }
}

impl<T: CacheType> CacheType for Option<T> {
    fn type_tag() -> Cow<'static, str> {
        T::type_tag()
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T: CacheType> CacheType for Vec<T> {
    fn type_tag() -> Cow<'static, str> {
        Cow::Owned(format!("list<{}>", T::type_tag()))
    }
}

impl<T: CacheType> CacheType for HashMap<String, T> {
    fn type_tag() -> Cow<'static, str> {
        Cow::Owned(format!("map<{}>", T::type_tag()))
    }
}

impl<T: CacheType> CacheType for BTreeMap<String, T> {
    fn type_tag() -> Cow<'static, str> {
        Cow::Owned(format!("map<{}>", T::type_tag()))
    }
}

impl CacheType for serde_json::Value {
    fn type_tag() -> Cow<'static, str> {
        Cow::Borrowed("json")
    }

    fn is_null(&self) -> bool {
        serde_json::Value::is_null(self)
    }
}

/// Implements [`CacheType`] for a type with the given tag.
///
/// ```ignore
/// #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
/// struct Profile { name: String }
///
/// impl_cache_type!(Profile => "profile");
/// ```
#[macro_export]
macro_rules! impl_cache_type {
    ($($ty:ty => $tag:expr),+ $(,)?) => {
        $(
            impl $crate::serializer::CacheType for $ty {
                fn type_tag() -> ::std::borrow::Cow<'static, str> {
                    ::std::borrow::Cow::Borrowed($tag)
                }
            }
        )+
    };
}

impl_cache_type!(
    String => "string",
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    f32 => "f32",
    f64 => "f64",
);

// == Serializer Trait ==
/// Encodes values to text and decodes them back.
///
/// Implementations must round-trip any value they encoded for the same type and
/// must encode the logical null (see [`CacheType::is_null`]) as a sentinel that
/// decodes back to the type's default.
pub trait Serializer: Send + Sync {
    fn serialize<T: CacheType>(&self, value: &T) -> Result<String, SerializerError>;

    fn deserialize<T: CacheType>(&self, data: &str) -> Result<T, SerializerError>;
}
