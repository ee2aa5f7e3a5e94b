use base64::{engine::general_purpose, Engine};
use prost::Message;
use prost_types::field_descriptor_proto::Label;
pub use prost_types::field_descriptor_proto::Type as FieldType;
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Builds ABI documents around a single proto3 schema file
#[derive(Default, Clone)]
pub struct AbiBuilder {
    package: Option<String>,
    messages: Vec<DescriptorProto>,
    methods: Vec<Value>,
}

impl AbiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(mut self, package: &str) -> Self {
        self.package = Some(package.to_string());
        self
    }

    /// Add a message whose fields are numbered from 1 in the given order
    pub fn message(mut self, name: &str, fields: &[(&str, FieldType)]) -> Self {
        let field = fields
            .iter()
            .zip(1..)
            .map(|((field_name, ty), number)| FieldDescriptorProto {
                name: Some(field_name.to_string()),
                number: Some(number),
                label: Some(Label::Optional as i32),
                r#type: Some(*ty as i32),
                ..Default::default()
            })
            .collect();
        self.messages.push(DescriptorProto {
            name: Some(name.to_string()),
            field,
            ..Default::default()
        });
        self
    }

    pub fn method(
        mut self,
        name: &str,
        entry_point: &str,
        argument: &str,
        return_type: &str,
        read_only: bool,
    ) -> Self {
        self.methods.push(json!({
            "name": name,
            "description": format!("{} method", name),
            "entry_point": entry_point,
            "argument": argument,
            "return": return_type,
            "read_only": read_only,
        }));
        self
    }

    pub fn descriptor_set(&self) -> FileDescriptorSet {
        FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("contract.proto".to_string()),
                package: self.package.clone(),
                syntax: Some("proto3".to_string()),
                message_type: self.messages.clone(),
                ..Default::default()
            }],
        }
    }

    pub fn to_json(&self) -> String {
        json!({
            "methods": self.methods,
            "types": general_purpose::STANDARD.encode(self.descriptor_set().encode_to_vec()),
        })
        .to_string()
    }

    /// Write the document to `dir/file_name`
    pub fn write_to(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        fs::write(&path, self.to_json()).expect("failed to write ABI fixture");
        path
    }
}

/// A token contract with read-only `balance_of` at `0x10` and a `transfer` write
pub fn token_abi() -> AbiBuilder {
    AbiBuilder::new()
        .message("balance_of_arguments", &[("owner", FieldType::Bytes)])
        .message("balance_of_result", &[("value", FieldType::Uint64)])
        .message(
            "transfer_arguments",
            &[
                ("from", FieldType::Bytes),
                ("to", FieldType::Bytes),
                ("value", FieldType::Uint64),
            ],
        )
        .message("transfer_result", &[])
        .method(
            "balance_of",
            "0x10",
            "balance_of_arguments",
            "balance_of_result",
            true,
        )
        .method(
            "transfer",
            "0x27f576ca",
            "transfer_arguments",
            "transfer_result",
            false,
        )
}

/// Encode a message with a single uint64 field 1, such as `balance_of_result`
pub fn uint64_result(value: u64) -> Vec<u8> {
    #[derive(Clone, PartialEq, Message)]
    struct Uint64Result {
        #[prost(uint64, tag = "1")]
        value: u64,
    }
    Uint64Result { value }.encode_to_vec()
}
