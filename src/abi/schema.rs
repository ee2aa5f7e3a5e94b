//! Runtime schema store
//!
//! Loads a serialized protobuf `FileDescriptorSet` and exposes the message
//! types it declares as descriptor handles. Every type reference inside the
//! file is resolved once at load time, so the codec never has to look a name
//! up twice and never meets a dangling reference.

use crate::{Result, WalletError};
use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorSet};
use std::collections::HashMap;
use tracing::debug;

/// Native kind of a message field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    /// Fully qualified name of the referenced message
    Message(String),
    Enum(EnumDescriptor),
}

impl FieldKind {
    /// Short name used in help output
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Double => "double",
            FieldKind::Float => "float",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Uint32 => "uint32",
            FieldKind::Uint64 => "uint64",
            FieldKind::Sint32 => "sint32",
            FieldKind::Sint64 => "sint64",
            FieldKind::Fixed32 => "fixed32",
            FieldKind::Fixed64 => "fixed64",
            FieldKind::Sfixed32 => "sfixed32",
            FieldKind::Sfixed64 => "sfixed64",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Message(name) => name,
            FieldKind::Enum(desc) => &desc.full_name,
        }
    }

    /// Whether repeated values of this kind may use the packed encoding
    pub fn is_packable(&self) -> bool {
        !matches!(
            self,
            FieldKind::String | FieldKind::Bytes | FieldKind::Message(_)
        )
    }
}

/// Enum type with its named values
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub full_name: String,
    pub values: Vec<(String, i32)>,
}

impl EnumDescriptor {
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, n)| *n == number)
            .map(|(name, _)| name.as_str())
    }

    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, number)| *number)
    }

    /// Value a field of this enum takes when absent on the wire
    pub fn default_number(&self) -> i32 {
        self.values.first().map(|(_, n)| *n).unwrap_or(0)
    }
}

/// One field of a message type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub number: u32,
    pub kind: FieldKind,
    pub repeated: bool,
    pub packed: bool,
    /// proto3 singular scalar without explicit presence: the default value is
    /// never written to the wire
    pub implicit_presence: bool,
    /// Index of the declared `oneof` group this field belongs to
    pub oneof: Option<u32>,
}

/// Reflective handle on a message type
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDescriptor {
    pub name: String,
    pub full_name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }
}

/// The single schema file of a contract ABI
#[derive(Debug, Clone)]
pub struct SchemaFile {
    name: String,
    package: String,
    messages: Vec<MessageDescriptor>,
    index: HashMap<String, usize>,
    top_level: Vec<usize>,
}

impl SchemaFile {
    /// Decode a serialized `FileDescriptorSet` holding exactly one file
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let set = FileDescriptorSet::decode(bytes)
            .map_err(|e| WalletError::InvalidSchema(format!("undecodable descriptor set: {}", e)))?;

        if set.file.len() != 1 {
            return Err(WalletError::InvalidSchema(format!(
                "expected 1 descriptor, got {}",
                set.file.len()
            )));
        }

        let file = &set.file[0];
        let package = file.package().to_string();
        let proto3 = file.syntax() == "proto3";

        // First pass: every message and enum name reachable in the file
        let mut message_protos: Vec<(String, &DescriptorProto)> = Vec::new();
        let mut enums: HashMap<String, EnumDescriptor> = HashMap::new();
        let mut top_level = Vec::new();

        for proto in &file.enum_type {
            collect_enum(&package, proto, &mut enums);
        }
        for proto in &file.message_type {
            top_level.push(message_protos.len());
            collect_message(&package, proto, &mut message_protos, &mut enums);
        }

        let mut index = HashMap::new();
        for (i, (full_name, _)) in message_protos.iter().enumerate() {
            if index.insert(full_name.clone(), i).is_some() {
                return Err(WalletError::InvalidSchema(format!(
                    "duplicate message type {}",
                    full_name
                )));
            }
        }

        // Second pass: fields, with references resolved against the first
        let mut messages = Vec::with_capacity(message_protos.len());
        for (full_name, proto) in &message_protos {
            let mut fields = Vec::with_capacity(proto.field.len());
            for field in &proto.field {
                fields.push(build_field(field, full_name, proto3, &index, &enums)?);
            }
            messages.push(MessageDescriptor {
                name: proto.name().to_string(),
                full_name: full_name.clone(),
                fields,
            });
        }

        debug!(
            file = file.name(),
            messages = messages.len(),
            "Schema file loaded"
        );

        Ok(SchemaFile {
            name: file.name().to_string(),
            package,
            messages,
            index,
            top_level,
        })
    }

    /// Look up a message type by its short name or its fully qualified name
    pub fn resolve(&self, name: &str) -> Result<&MessageDescriptor> {
        let name = name.trim_start_matches('.');

        if let Some(found) = self
            .top_level
            .iter()
            .map(|&i| &self.messages[i])
            .find(|m| m.name == name)
        {
            return Ok(found);
        }

        self.message(name)
            .or_else(|| self.message(&qualify(&self.package, name)))
            .ok_or_else(|| WalletError::TypeNotFound(name.to_string()))
    }

    /// Look up a message type by fully qualified name
    pub fn message(&self, full_name: &str) -> Option<&MessageDescriptor> {
        self.index
            .get(full_name.trim_start_matches('.'))
            .map(|&i| &self.messages[i])
    }

    pub fn messages(&self) -> impl Iterator<Item = &MessageDescriptor> {
        self.messages.iter()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

fn collect_enum(scope: &str, proto: &EnumDescriptorProto, out: &mut HashMap<String, EnumDescriptor>) {
    let full_name = qualify(scope, proto.name());
    let values = proto
        .value
        .iter()
        .map(|v| (v.name().to_string(), v.number()))
        .collect();
    out.insert(full_name.clone(), EnumDescriptor { full_name, values });
}

fn collect_message<'a>(
    scope: &str,
    proto: &'a DescriptorProto,
    messages: &mut Vec<(String, &'a DescriptorProto)>,
    enums: &mut HashMap<String, EnumDescriptor>,
) {
    let full_name = qualify(scope, proto.name());
    messages.push((full_name.clone(), proto));
    for nested in &proto.enum_type {
        collect_enum(&full_name, nested, enums);
    }
    for nested in &proto.nested_type {
        collect_message(&full_name, nested, messages, enums);
    }
}

/// Resolve a type reference the way protoc scopes names: fully qualified
/// names start with a dot, anything else is searched from the innermost
/// enclosing scope outwards.
fn resolve_reference(
    type_name: &str,
    scope: &str,
    known: impl Fn(&str) -> bool,
) -> Option<String> {
    if let Some(absolute) = type_name.strip_prefix('.') {
        return known(absolute).then(|| absolute.to_string());
    }

    let mut current = scope;
    loop {
        let candidate = qualify(current, type_name);
        if known(&candidate) {
            return Some(candidate);
        }
        if current.is_empty() {
            return None;
        }
        current = current.rsplit_once('.').map(|(parent, _)| parent).unwrap_or("");
    }
}

fn build_field(
    field: &FieldDescriptorProto,
    scope: &str,
    proto3: bool,
    messages: &HashMap<String, usize>,
    enums: &HashMap<String, EnumDescriptor>,
) -> Result<FieldDescriptor> {
    let name = field.name().to_string();
    let number = u32::try_from(field.number())
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            WalletError::InvalidSchema(format!("field {}.{} has invalid number", scope, name))
        })?;

    let unresolved = || {
        WalletError::InvalidSchema(format!(
            "field {}.{} references unknown type {}",
            scope,
            name,
            field.type_name()
        ))
    };

    let kind = match field.r#type() {
        Type::Double => FieldKind::Double,
        Type::Float => FieldKind::Float,
        Type::Int32 => FieldKind::Int32,
        Type::Int64 => FieldKind::Int64,
        Type::Uint32 => FieldKind::Uint32,
        Type::Uint64 => FieldKind::Uint64,
        Type::Sint32 => FieldKind::Sint32,
        Type::Sint64 => FieldKind::Sint64,
        Type::Fixed32 => FieldKind::Fixed32,
        Type::Fixed64 => FieldKind::Fixed64,
        Type::Sfixed32 => FieldKind::Sfixed32,
        Type::Sfixed64 => FieldKind::Sfixed64,
        Type::Bool => FieldKind::Bool,
        Type::String => FieldKind::String,
        Type::Bytes => FieldKind::Bytes,
        Type::Message => {
            let resolved = resolve_reference(field.type_name(), scope, |n| messages.contains_key(n))
                .ok_or_else(unresolved)?;
            FieldKind::Message(resolved)
        }
        Type::Enum => {
            let resolved = resolve_reference(field.type_name(), scope, |n| enums.contains_key(n))
                .ok_or_else(unresolved)?;
            FieldKind::Enum(enums[&resolved].clone())
        }
        Type::Group => {
            return Err(WalletError::InvalidSchema(format!(
                "field {}.{} uses unsupported group encoding",
                scope, name
            )))
        }
    };

    let repeated = field.label() == Label::Repeated;
    let packed = repeated
        && kind.is_packable()
        && field
            .options
            .as_ref()
            .and_then(|o| o.packed)
            .unwrap_or(proto3);
    // proto3 `optional` is modeled as a synthetic oneof of one field
    let oneof = field
        .oneof_index
        .filter(|_| !field.proto3_optional())
        .and_then(|i| u32::try_from(i).ok());
    let implicit_presence = proto3
        && !repeated
        && !field.proto3_optional()
        && oneof.is_none()
        && !matches!(kind, FieldKind::Message(_));

    Ok(FieldDescriptor {
        name,
        number,
        kind,
        repeated,
        packed,
        implicit_presence,
        oneof,
    })
}
