//! Dynamic message values
//!
//! A [`DynamicMessage`] is a message whose shape is only known through its
//! [`MessageDescriptor`]. Values are keyed by field number; repeated fields
//! hold a [`Value::List`].

use crate::abi::{FieldDescriptor, FieldKind, MessageDescriptor};
use crate::{Result, WalletError};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    EnumNumber(i32),
    Message(DynamicMessage),
    List(Vec<Value>),
}

impl Value {
    /// Value a singular scalar field takes when absent on the wire
    pub fn default_for(kind: &FieldKind) -> Option<Value> {
        let value = match kind {
            FieldKind::Double => Value::F64(0.0),
            FieldKind::Float => Value::F32(0.0),
            FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => Value::I32(0),
            FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => Value::I64(0),
            FieldKind::Uint32 | FieldKind::Fixed32 => Value::U32(0),
            FieldKind::Uint64 | FieldKind::Fixed64 => Value::U64(0),
            FieldKind::Bool => Value::Bool(false),
            FieldKind::String => Value::String(String::new()),
            FieldKind::Bytes => Value::Bytes(Vec::new()),
            FieldKind::Enum(desc) => Value::EnumNumber(desc.default_number()),
            FieldKind::Message(_) => return None,
        };
        Some(value)
    }

    /// Whether an implicit-presence field holding this value is omitted from the wire
    pub fn is_default(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::I32(n) | Value::EnumNumber(n) => *n == 0,
            Value::I64(n) => *n == 0,
            Value::U32(n) => *n == 0,
            Value::U64(n) => *n == 0,
            Value::F32(n) => *n == 0.0,
            Value::F64(n) => *n == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Message(_) | Value::List(_) => false,
        }
    }
}

/// A message instance built against a runtime descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    descriptor: MessageDescriptor,
    values: BTreeMap<u32, Value>,
}

impl DynamicMessage {
    pub fn new(descriptor: MessageDescriptor) -> Self {
        Self {
            descriptor,
            values: BTreeMap::new(),
        }
    }

    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    /// Value of a field by name, if present
    pub fn get(&self, name: &str) -> Option<&Value> {
        let field = self.descriptor.field_by_name(name)?;
        self.values.get(&field.number)
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let number = self
            .descriptor
            .field_by_name(name)
            .map(|f| f.number)
            .ok_or_else(|| {
                WalletError::InvalidAbi(format!(
                    "{} has no field {}",
                    self.descriptor.full_name, name
                ))
            })?;
        self.values.insert(number, value);
        Ok(())
    }

    pub(crate) fn set_by_number(&mut self, number: u32, value: Value) {
        self.values.insert(number, value);
    }

    /// Drop every member of `group` except `keep`
    pub(crate) fn clear_oneof(&mut self, group: u32, keep: u32) {
        let descriptor = &self.descriptor;
        self.values.retain(|number, _| {
            *number == keep
                || descriptor
                    .field_by_number(*number)
                    .map_or(true, |f| f.oneof != Some(group))
        });
    }

    /// Append to a repeated field
    pub(crate) fn push_by_number(&mut self, number: u32, value: Value) {
        match self.values.entry(number).or_insert_with(|| Value::List(Vec::new())) {
            Value::List(items) => items.push(value),
            other => *other = Value::List(vec![value]),
        }
    }

    /// Present fields paired with their descriptors, in field number order
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> {
        self.values.iter().filter_map(move |(number, value)| {
            self.descriptor
                .field_by_number(*number)
                .map(|field| (field, value))
        })
    }

    fn render_into(&self, indent: usize, lines: &mut Vec<String>) {
        let pad = " ".repeat(indent);
        for field in &self.descriptor.fields {
            match self.values.get(&field.number) {
                Some(Value::List(items)) => {
                    for item in items {
                        render_field(field, item, indent, lines);
                    }
                }
                Some(value) => render_field(field, value, indent, lines),
                None if !field.repeated && field.oneof.is_none() => {
                    if let Some(default) = Value::default_for(&field.kind) {
                        lines.push(format!("{}{}: {}", pad, field.name, scalar_text(field, &default)));
                    }
                }
                None => {}
            }
        }
    }
}

fn render_field(field: &FieldDescriptor, value: &Value, indent: usize, lines: &mut Vec<String>) {
    let pad = " ".repeat(indent);
    match value {
        Value::Message(nested) => {
            lines.push(format!("{}{} {{", pad, field.name));
            nested.render_into(indent + 2, lines);
            lines.push(format!("{}}}", pad));
        }
        scalar => lines.push(format!("{}{}: {}", pad, field.name, scalar_text(field, scalar))),
    }
}

fn scalar_text(field: &FieldDescriptor, value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::I32(n) => n.to_string(),
        Value::I64(n) => n.to_string(),
        Value::U32(n) => n.to_string(),
        Value::U64(n) => n.to_string(),
        Value::F32(n) => n.to_string(),
        Value::F64(n) => n.to_string(),
        Value::String(s) => format!("{:?}", s),
        Value::Bytes(b) => format!("0x{}", hex::encode(b)),
        Value::EnumNumber(n) => match &field.kind {
            FieldKind::Enum(desc) => desc
                .name_of(*n)
                .map(str::to_string)
                .unwrap_or_else(|| n.to_string()),
            _ => n.to_string(),
        },
        Value::Message(_) | Value::List(_) => String::new(),
    }
}

/// Text rendering: one `name: value` line per field in declaration order,
/// nested messages as indented `name { ... }` blocks.
impl fmt::Display for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        self.render_into(0, &mut lines);
        write!(f, "{}", lines.join("\n"))
    }
}
