//! Single-line value codec.
//!
//! `encode` turns a value into the text stored after `key: ` in the
//! registry. `decode` reverses it, trying a literal parse first, then
//! JSON, then falling back to the raw text. Decoding never fails.

mod literal;

use tracing::trace;

use crate::core::value::{Mapping, SecretValue};

/// Encode a value as a single line of text.
///
/// Text is written verbatim; containers use the literal form
/// (`{'host': 'localhost', 'port': 5432}`).
pub fn encode(value: &SecretValue) -> String {
    match value {
        SecretValue::Text(s) => s.clone(),
        SecretValue::Integer(i) => i.to_string(),
        SecretValue::Float(f) => float_repr(*f),
        SecretValue::Bool(true) => "True".to_string(),
        SecretValue::Bool(false) => "False".to_string(),
        SecretValue::Null => "None".to_string(),
        SecretValue::List(_) | SecretValue::Mapping(_) => {
            let mut out = String::new();
            literal::write_repr(&mut out, value);
            out
        }
    }
}

/// Decode a single line back into a value.
///
/// Only mapping results count as structured; anything else (numbers,
/// lists, quoted strings) comes back as `Text` holding the input.
/// Text values inside a decoded mapping are decoded again, so a mapping
/// whose leaves hold encoded mappings expands fully.
pub fn decode(text: &str) -> SecretValue {
    match literal::parse(text) {
        Ok(SecretValue::Mapping(mapping)) => return SecretValue::Mapping(expand(mapping)),
        Ok(_) => trace!("literal is not a mapping"),
        Err(e) => trace!(offset = e.offset, reason = e.reason, "not a literal"),
    }

    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(object)) => {
            let mapping = object
                .into_iter()
                .map(|(k, v)| (k, SecretValue::from(v)))
                .collect();
            return SecretValue::Mapping(expand(mapping));
        }
        Ok(_) => trace!("json is not an object"),
        Err(e) => trace!(error = %e, "not json"),
    }

    SecretValue::Text(text.to_string())
}

fn expand(mapping: Mapping) -> Mapping {
    mapping
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                SecretValue::Text(s) => decode(&s),
                SecretValue::Mapping(inner) => SecretValue::Mapping(expand(inner)),
                other => other,
            };
            (key, value)
        })
        .collect()
}

/// Float text that always reads back as a float (`5.0`, not `5`).
pub(crate) fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = f.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}
