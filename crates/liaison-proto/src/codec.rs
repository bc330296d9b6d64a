//! CBOR encoding for dictionaries.
//!
//! CBOR is self-describing: every item starts with a major-type tag, so
//! booleans, integers of any width, half/single/double floats, text, byte
//! strings and definite- or indefinite-length arrays and maps all decode
//! without a schema. We accept exactly the subset that maps onto [`Value`]
//! and reject the rest (semantic tags, `null`, non-text map keys, duplicate
//! keys, trailing bytes).
//!
//! Encoding is deterministic: dictionary keys are emitted in sorted order and
//! integers use the shortest form.

use ciborium::value::{Integer, Value as Cbor};

use crate::{
    dictionary::Dictionary,
    errors::{ProtocolError, Result},
    value::Value,
};

/// Default limit for a single encoded dictionary (64 KiB).
///
/// Introduction messages are a few hundred bytes; anything near this size is
/// hostile or corrupt.
pub const DEFAULT_MAX_ENCODED_SIZE: usize = 64 * 1024;

/// Encode a dictionary as a CBOR map.
pub fn encode_dictionary(dict: &Dictionary) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(&dictionary_to_cbor(dict), &mut out)
        .map_err(|e| ProtocolError::Encode(e.to_string()))?;
    Ok(out)
}

/// Decode a CBOR map into a dictionary.
///
/// # Errors
///
/// - [`ProtocolError::TooLarge`] if `bytes` is longer than `max_size`
/// - [`ProtocolError::Decode`] for malformed CBOR, unsupported items, a
///   top-level item that is not a map, or trailing bytes
pub fn decode_dictionary(bytes: &[u8], max_size: usize) -> Result<Dictionary> {
    if bytes.len() > max_size {
        return Err(ProtocolError::TooLarge { size: bytes.len(), max: max_size });
    }

    let mut reader = bytes;
    let cbor: Cbor = ciborium::de::from_reader(&mut reader)
        .map_err(|e| ProtocolError::Decode(e.to_string()))?;

    if !reader.is_empty() {
        return Err(ProtocolError::Decode(format!("{} trailing bytes", reader.len())));
    }

    match cbor {
        Cbor::Map(entries) => map_to_dictionary(entries),
        other => Err(ProtocolError::Decode(format!("expected map, found {}", cbor_kind(&other)))),
    }
}

fn dictionary_to_cbor(dict: &Dictionary) -> Cbor {
    Cbor::Map(dict.iter().map(|(k, v)| (Cbor::Text(k.clone()), value_to_cbor(v))).collect())
}

fn value_to_cbor(value: &Value) -> Cbor {
    match value {
        Value::Bool(v) => Cbor::Bool(*v),
        Value::Int(v) => Cbor::Integer(Integer::from(*v)),
        Value::Float(v) => Cbor::Float(*v),
        Value::String(v) => Cbor::Text(v.clone()),
        Value::Raw(v) => Cbor::Bytes(v.clone()),
        Value::List(items) => Cbor::Array(items.iter().map(value_to_cbor).collect()),
        Value::Dictionary(d) => dictionary_to_cbor(d),
    }
}

fn map_to_dictionary(entries: Vec<(Cbor, Cbor)>) -> Result<Dictionary> {
    let mut dict = Dictionary::new();
    for (key, value) in entries {
        let Cbor::Text(key) = key else {
            return Err(ProtocolError::Decode(format!("map key is {}", cbor_kind(&key))));
        };
        let value = cbor_to_value(value)?;
        if dict.put(key.clone(), value).is_some() {
            return Err(ProtocolError::Decode(format!("duplicate key '{key}'")));
        }
    }
    Ok(dict)
}

fn cbor_to_value(cbor: Cbor) -> Result<Value> {
    match cbor {
        Cbor::Bool(v) => Ok(Value::Bool(v)),
        Cbor::Integer(v) => {
            let wide = i128::from(v);
            i64::try_from(wide)
                .map(Value::Int)
                .map_err(|_| ProtocolError::Decode(format!("integer {wide} exceeds 64 bits")))
        },
        Cbor::Float(v) => Ok(Value::Float(v)),
        Cbor::Text(v) => Ok(Value::String(v)),
        Cbor::Bytes(v) => Ok(Value::Raw(v)),
        Cbor::Array(items) => items.into_iter().map(cbor_to_value).collect::<Result<Vec<_>>>().map(Value::List),
        Cbor::Map(entries) => map_to_dictionary(entries).map(Value::Dictionary),
        other => Err(ProtocolError::Decode(format!("unsupported item: {}", cbor_kind(&other)))),
    }
}

fn cbor_kind(cbor: &Cbor) -> &'static str {
    match cbor {
        Cbor::Integer(_) => "integer",
        Cbor::Bytes(_) => "bytes",
        Cbor::Float(_) => "float",
        Cbor::Text(_) => "text",
        Cbor::Bool(_) => "bool",
        Cbor::Null => "null",
        Cbor::Tag(..) => "tag",
        Cbor::Array(_) => "array",
        Cbor::Map(_) => "map",
        _ => "unknown",
    }
}
