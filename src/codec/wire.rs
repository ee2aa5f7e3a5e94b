//! Protobuf binary encoding for dynamic messages
//!
//! Keys and varints go through `prost::encoding`; everything else is a
//! dispatch on [`FieldKind`].

use super::value::{DynamicMessage, Value};
use crate::abi::{FieldDescriptor, FieldKind, MessageDescriptor, SchemaFile};
use crate::{Result, WalletError};
use prost::encoding::{decode_key, decode_varint, encode_key, encode_varint, WireType};

const MAX_DEPTH: usize = 64;

/// Wire type a single value of `kind` is written with
pub fn wire_type(kind: &FieldKind) -> WireType {
    match kind {
        FieldKind::Int32
        | FieldKind::Int64
        | FieldKind::Uint32
        | FieldKind::Uint64
        | FieldKind::Sint32
        | FieldKind::Sint64
        | FieldKind::Bool
        | FieldKind::Enum(_) => WireType::Varint,
        FieldKind::Fixed64 | FieldKind::Sfixed64 | FieldKind::Double => WireType::SixtyFourBit,
        FieldKind::Fixed32 | FieldKind::Sfixed32 | FieldKind::Float => WireType::ThirtyTwoBit,
        FieldKind::String | FieldKind::Bytes | FieldKind::Message(_) => WireType::LengthDelimited,
    }
}

/// Serialize a message to protobuf binary
pub fn encode_message(msg: &DynamicMessage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_message(msg, &mut buf)?;
    Ok(buf)
}

fn write_message(msg: &DynamicMessage, buf: &mut Vec<u8>) -> Result<()> {
    for (field, value) in msg.fields() {
        match value {
            Value::List(items) if field.packed => {
                if items.is_empty() {
                    continue;
                }
                let mut packed = Vec::new();
                for item in items {
                    write_payload(field, item, &mut packed)?;
                }
                encode_key(field.number, WireType::LengthDelimited, buf);
                encode_varint(packed.len() as u64, buf);
                buf.extend_from_slice(&packed);
            }
            Value::List(items) => {
                for item in items {
                    encode_key(field.number, wire_type(&field.kind), buf);
                    write_payload(field, item, buf)?;
                }
            }
            single => {
                if field.implicit_presence && single.is_default() {
                    continue;
                }
                encode_key(field.number, wire_type(&field.kind), buf);
                write_payload(field, single, buf)?;
            }
        }
    }
    Ok(())
}

fn zigzag32(n: i32) -> u64 {
    u64::from(((n << 1) ^ (n >> 31)) as u32)
}

fn zigzag64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

fn write_payload(field: &FieldDescriptor, value: &Value, buf: &mut Vec<u8>) -> Result<()> {
    match (&field.kind, value) {
        (FieldKind::Int32, Value::I32(n)) => encode_varint(*n as i64 as u64, buf),
        (FieldKind::Enum(_), Value::EnumNumber(n)) => encode_varint(*n as i64 as u64, buf),
        (FieldKind::Int64, Value::I64(n)) => encode_varint(*n as u64, buf),
        (FieldKind::Uint32, Value::U32(n)) => encode_varint(u64::from(*n), buf),
        (FieldKind::Uint64, Value::U64(n)) => encode_varint(*n, buf),
        (FieldKind::Sint32, Value::I32(n)) => encode_varint(zigzag32(*n), buf),
        (FieldKind::Sint64, Value::I64(n)) => encode_varint(zigzag64(*n), buf),
        (FieldKind::Bool, Value::Bool(b)) => encode_varint(u64::from(*b), buf),
        (FieldKind::Fixed32, Value::U32(n)) => buf.extend_from_slice(&n.to_le_bytes()),
        (FieldKind::Sfixed32, Value::I32(n)) => buf.extend_from_slice(&n.to_le_bytes()),
        (FieldKind::Float, Value::F32(n)) => buf.extend_from_slice(&n.to_le_bytes()),
        (FieldKind::Fixed64, Value::U64(n)) => buf.extend_from_slice(&n.to_le_bytes()),
        (FieldKind::Sfixed64, Value::I64(n)) => buf.extend_from_slice(&n.to_le_bytes()),
        (FieldKind::Double, Value::F64(n)) => buf.extend_from_slice(&n.to_le_bytes()),
        (FieldKind::String, Value::String(s)) => {
            encode_varint(s.len() as u64, buf);
            buf.extend_from_slice(s.as_bytes());
        }
        (FieldKind::Bytes, Value::Bytes(b)) => {
            encode_varint(b.len() as u64, buf);
            buf.extend_from_slice(b);
        }
        (FieldKind::Message(_), Value::Message(nested)) => {
            let inner = encode_message(nested)?;
            encode_varint(inner.len() as u64, buf);
            buf.extend_from_slice(&inner);
        }
        (kind, other) => {
            return Err(WalletError::InvalidAbi(format!(
                "field {}: value {:?} does not match type {}",
                field.name,
                other,
                kind.type_name()
            )))
        }
    }
    Ok(())
}

fn decode_error(msg: impl std::fmt::Display) -> WalletError {
    WalletError::Decode(msg.to_string())
}

fn take<'a>(buf: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
    if buf.len() < len {
        return Err(decode_error(format!(
            "buffer underflow: need {} bytes, have {}",
            len,
            buf.len()
        )));
    }
    let (head, tail) = buf.split_at(len);
    *buf = tail;
    Ok(head)
}

fn take_array<const N: usize>(buf: &mut &[u8]) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(take(buf, N)?);
    Ok(out)
}

fn take_delimited<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8]> {
    let len = decode_varint(buf).map_err(decode_error)?;
    let len = usize::try_from(len).map_err(decode_error)?;
    take(buf, len)
}

fn skip_field(wire: WireType, buf: &mut &[u8]) -> Result<()> {
    match wire {
        WireType::Varint => {
            decode_varint(buf).map_err(decode_error)?;
        }
        WireType::SixtyFourBit => {
            take(buf, 8)?;
        }
        WireType::ThirtyTwoBit => {
            take(buf, 4)?;
        }
        WireType::LengthDelimited => {
            take_delimited(buf)?;
        }
        WireType::StartGroup | WireType::EndGroup => {
            return Err(decode_error("group encoding is not supported"))
        }
    }
    Ok(())
}

/// Parse protobuf binary against a descriptor
pub fn decode_message(
    bytes: &[u8],
    descriptor: &MessageDescriptor,
    schema: &SchemaFile,
) -> Result<DynamicMessage> {
    read_message(bytes, descriptor, schema, 0)
}

fn read_message(
    mut buf: &[u8],
    descriptor: &MessageDescriptor,
    schema: &SchemaFile,
    depth: usize,
) -> Result<DynamicMessage> {
    if depth > MAX_DEPTH {
        return Err(decode_error("message nesting too deep"));
    }

    let mut msg = DynamicMessage::new(descriptor.clone());
    while !buf.is_empty() {
        let (number, wire) = decode_key(&mut buf).map_err(decode_error)?;

        let Some(field) = descriptor.field_by_number(number) else {
            skip_field(wire, &mut buf)?;
            continue;
        };

        let expected = wire_type(&field.kind);
        if field.repeated && field.kind.is_packable() && wire == WireType::LengthDelimited {
            let mut packed = take_delimited(&mut buf)?;
            while !packed.is_empty() {
                let value = read_payload(field, &mut packed, schema, depth)?;
                msg.push_by_number(number, value);
            }
        } else if wire != expected {
            return Err(decode_error(format!(
                "field {}: wire type {:?} does not match type {}",
                field.name,
                wire,
                field.kind.type_name()
            )));
        } else {
            let value = read_payload(field, &mut buf, schema, depth)?;
            if field.repeated {
                msg.push_by_number(number, value);
            } else {
                msg.set_by_number(number, value);
                if let Some(group) = field.oneof {
                    msg.clear_oneof(group, number);
                }
            }
        }
    }

    Ok(msg)
}

fn read_payload(
    field: &FieldDescriptor,
    buf: &mut &[u8],
    schema: &SchemaFile,
    depth: usize,
) -> Result<Value> {
    let varint = |buf: &mut &[u8]| decode_varint(buf).map_err(decode_error);

    let value = match &field.kind {
        FieldKind::Int32 => Value::I32(varint(buf)? as i32),
        FieldKind::Int64 => Value::I64(varint(buf)? as i64),
        FieldKind::Uint32 => Value::U32(varint(buf)? as u32),
        FieldKind::Uint64 => Value::U64(varint(buf)?),
        FieldKind::Sint32 => {
            let n = varint(buf)? as u32;
            Value::I32(((n >> 1) as i32) ^ -((n & 1) as i32))
        }
        FieldKind::Sint64 => {
            let n = varint(buf)?;
            Value::I64(((n >> 1) as i64) ^ -((n & 1) as i64))
        }
        FieldKind::Bool => Value::Bool(varint(buf)? != 0),
        FieldKind::Enum(_) => Value::EnumNumber(varint(buf)? as i32),
        FieldKind::Fixed32 => Value::U32(u32::from_le_bytes(take_array(buf)?)),
        FieldKind::Sfixed32 => Value::I32(i32::from_le_bytes(take_array(buf)?)),
        FieldKind::Float => Value::F32(f32::from_le_bytes(take_array(buf)?)),
        FieldKind::Fixed64 => Value::U64(u64::from_le_bytes(take_array(buf)?)),
        FieldKind::Sfixed64 => Value::I64(i64::from_le_bytes(take_array(buf)?)),
        FieldKind::Double => Value::F64(f64::from_le_bytes(take_array(buf)?)),
        FieldKind::String => {
            let raw = take_delimited(buf)?;
            let text = std::str::from_utf8(raw)
                .map_err(|e| decode_error(format!("field {}: {}", field.name, e)))?;
            Value::String(text.to_string())
        }
        FieldKind::Bytes => Value::Bytes(take_delimited(buf)?.to_vec()),
        FieldKind::Message(full_name) => {
            let nested = schema
                .message(full_name)
                .ok_or_else(|| decode_error(format!("unknown message type {}", full_name)))?;
            let raw = take_delimited(buf)?;
            Value::Message(read_message(raw, nested, schema, depth + 1)?)
        }
    };
    Ok(value)
}
