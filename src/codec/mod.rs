//! Message codec
//!
//! Converts parsed command arguments into wire messages for a request schema,
//! and raw response payloads back into readable text for a response schema.

pub mod value;
pub mod wire;

pub use value::{DynamicMessage, Value};

use crate::abi::{FieldDescriptor, FieldKind, MessageDescriptor, SchemaFile};
use crate::{Result, WalletError};
use base64::{engine::general_purpose, Engine};
use std::collections::HashMap;
use tracing::debug;

/// Build a request message from string arguments keyed by field name
pub fn build_message(
    args: &HashMap<String, String>,
    descriptor: &MessageDescriptor,
    schema: &SchemaFile,
) -> Result<DynamicMessage> {
    let mut msg = DynamicMessage::new(descriptor.clone());
    let mut chosen: HashMap<u32, &str> = HashMap::new();

    for field in &descriptor.fields {
        let raw = args
            .get(&field.name)
            .ok_or_else(|| WalletError::MissingParam(field.name.clone()))?;

        // An empty argument leaves a oneof member unset
        if let Some(group) = field.oneof {
            if raw.is_empty() {
                continue;
            }
            if let Some(other) = chosen.insert(group, &field.name) {
                return Err(WalletError::InvalidAbi(format!(
                    "fields {} and {} are alternatives; give only one of them",
                    other, field.name
                )));
            }
        }

        msg.set(&field.name, coerce(field, raw, schema)?)?;
    }

    Ok(msg)
}

/// Encode string arguments against a request schema into wire bytes
pub fn encode(
    args: &HashMap<String, String>,
    descriptor: &MessageDescriptor,
    schema: &SchemaFile,
) -> Result<Vec<u8>> {
    let msg = build_message(args, descriptor, schema)?;
    let bytes = wire::encode_message(&msg)?;
    debug!(
        message = descriptor.full_name.as_str(),
        bytes = bytes.len(),
        "Encoded request"
    );
    Ok(bytes)
}

/// Decode wire bytes against a response schema
pub fn decode(
    bytes: &[u8],
    descriptor: &MessageDescriptor,
    schema: &SchemaFile,
) -> Result<DynamicMessage> {
    wire::decode_message(bytes, descriptor, schema)
}

/// Decode wire bytes and render them as text
pub fn render(bytes: &[u8], descriptor: &MessageDescriptor, schema: &SchemaFile) -> Result<String> {
    Ok(decode(bytes, descriptor, schema)?.to_string())
}

/// Convert one raw argument to the native kind of `field`
///
/// Repeated fields take a comma separated list.
pub fn coerce(field: &FieldDescriptor, raw: &str, schema: &SchemaFile) -> Result<Value> {
    if field.repeated {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Value::List(Vec::new()));
        }
        let items = raw
            .split(',')
            .map(|item| coerce_single(field, item.trim(), schema))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Value::List(items));
    }

    coerce_single(field, raw, schema)
}

fn coerce_single(field: &FieldDescriptor, raw: &str, schema: &SchemaFile) -> Result<Value> {
    let invalid = |detail: String| {
        WalletError::InvalidAbi(format!(
            "field {}: invalid {} value '{}': {}",
            field.name,
            field.kind.type_name(),
            raw,
            detail
        ))
    };

    let value = match &field.kind {
        FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => {
            Value::I32(raw.parse().map_err(|e| invalid(format!("{}", e)))?)
        }
        FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => {
            Value::I64(raw.parse().map_err(|e| invalid(format!("{}", e)))?)
        }
        FieldKind::Uint32 | FieldKind::Fixed32 => {
            Value::U32(raw.parse().map_err(|e| invalid(format!("{}", e)))?)
        }
        FieldKind::Uint64 | FieldKind::Fixed64 => {
            Value::U64(raw.parse().map_err(|e| invalid(format!("{}", e)))?)
        }
        FieldKind::Float => Value::F32(raw.parse().map_err(|e| invalid(format!("{}", e)))?),
        FieldKind::Double => Value::F64(raw.parse().map_err(|e| invalid(format!("{}", e)))?),
        FieldKind::Bool => Value::Bool(raw.parse().map_err(|e| invalid(format!("{}", e)))?),
        FieldKind::String => Value::String(raw.to_string()),
        FieldKind::Bytes => Value::Bytes(parse_bytes(raw).map_err(invalid)?),
        FieldKind::Enum(desc) => {
            let number = desc
                .number_of(raw)
                .or_else(|| raw.parse::<i32>().ok())
                .ok_or_else(|| invalid(format!("not a value of {}", desc.full_name)))?;
            Value::EnumNumber(number)
        }
        FieldKind::Message(full_name) => {
            // Nested messages are passed pre-serialized, as hex or base64
            let nested = schema
                .message(full_name)
                .ok_or_else(|| invalid(format!("unknown message type {}", full_name)))?;
            let bytes = parse_bytes(raw).map_err(invalid)?;
            let msg = wire::decode_message(&bytes, nested, schema)
                .map_err(|e| invalid(e.to_string()))?;
            Value::Message(msg)
        }
    };

    Ok(value)
}

/// Decode a byte string written as hex (optionally `0x` prefixed) or as
/// `base64:`-prefixed base64
pub fn parse_bytes(raw: &str) -> std::result::Result<Vec<u8>, String> {
    let raw = raw.trim();
    if let Some(b64_part) = raw.strip_prefix("base64:") {
        return general_purpose::STANDARD
            .decode(b64_part)
            .map_err(|e| format!("invalid base64 string: {}", e));
    }

    let hex_part = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    hex::decode(hex_part).map_err(|e| format!("invalid hex string: {}", e))
}
