//! Accessors that treat empty and placeholder metadata values as absent.
//!
//! Index metadata is full of fields that are present but meaningless: empty
//! strings, `0`, empty lists, and the placeholder strings `"UNKNOWN"` and
//! `"None"`. Popping such a field yields the caller's default instead.

use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Placeholder strings that stand for a missing value.
pub const PLACEHOLDERS: [&str; 2] = ["UNKNOWN", "None"];

/// Values that may be empty or a placeholder.
pub trait Blank {
    /// Returns `true` when the value should be treated as absent.
    fn is_blank(&self) -> bool;
}

impl Blank for str {
    fn is_blank(&self) -> bool {
        self.is_empty() || PLACEHOLDERS.contains(&self)
    }
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl<T: Blank + ?Sized> Blank for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T: Blank> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_none_or(Blank::is_blank)
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> Blank for HashMap<K, V, S> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Blank for BTreeMap<K, V> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for bool {
    fn is_blank(&self) -> bool {
        !*self
    }
}

macro_rules! impl_blank_for_numbers {
    ($zero:literal => $($ty:ty),+) => {
        $(
            impl Blank for $ty {
                fn is_blank(&self) -> bool {
                    *self == $zero
                }
            }
        )+
    };
}

impl_blank_for_numbers!(0 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_blank_for_numbers!(0.0 => f32, f64);

impl Blank for Value {
    fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => b.is_blank(),
            Self::Number(n) => n.as_f64() == Some(0.0),
            Self::String(s) => s.is_blank(),
            Self::Array(items) => items.is_empty(),
            Self::Object(map) => map.is_empty(),
        }
    }
}

/// Removes `key` from `map`, returning `default` for missing or blank values.
///
/// # Examples
///
/// ```
/// use conveyor_core::pop_normalized;
/// use std::collections::HashMap;
///
/// let mut map = HashMap::from([("license", "UNKNOWN"), ("summary", "HTTP for humans")]);
/// assert_eq!(pop_normalized(&mut map, "license", "n/a"), "n/a");
/// assert_eq!(pop_normalized(&mut map, "summary", "n/a"), "HTTP for humans");
/// assert_eq!(pop_normalized(&mut map, "summary", "n/a"), "n/a");
/// assert!(map.is_empty());
/// ```
pub fn pop_normalized<K, Q, V, S>(map: &mut HashMap<K, V, S>, key: &Q, default: V) -> V
where
    K: Borrow<Q> + Hash + Eq,
    Q: Hash + Eq + ?Sized,
    V: Blank,
    S: std::hash::BuildHasher,
{
    match map.remove(key) {
        Some(value) if !value.is_blank() => value,
        _ => default,
    }
}

/// [`pop_normalized`] for JSON objects.
pub fn pop_normalized_json(map: &mut Map<String, Value>, key: &str, default: Value) -> Value {
    match map.remove(key) {
        Some(value) if !value.is_blank() => value,
        _ => default,
    }
}
