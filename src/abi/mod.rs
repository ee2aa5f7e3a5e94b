//! Contract ABI model
//!
//! An ABI document is JSON:
//!
//! ```json
//! {
//!   "methods": [
//!     {
//!       "name": "balance_of",
//!       "description": "Check the balance of an account",
//!       "entry_point": "0x10",
//!       "argument": "balance_of_arguments",
//!       "return": "balance_of_result",
//!       "read_only": true
//!     }
//!   ],
//!   "types": "<base64 serialized FileDescriptorSet>"
//! }
//! ```
//!
//! Parsing validates the embedded schema and every type a method names, so a
//! successfully parsed [`Abi`] can always be compiled into commands.

pub mod schema;

pub use schema::{EnumDescriptor, FieldDescriptor, FieldKind, MessageDescriptor, SchemaFile};

use crate::{Result, WalletError};
use base64::{engine::general_purpose, Engine};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

/// A callable contract method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiMethod {
    pub name: String,
    pub description: String,
    pub entry_point: u32,
    pub argument: String,
    pub return_type: String,
    pub read_only: bool,
}

/// Parsed contract ABI
#[derive(Debug, Clone)]
pub struct Abi {
    pub methods: Vec<AbiMethod>,
    /// Raw serialized schema set the methods refer to
    pub types: Vec<u8>,
}

#[derive(Deserialize)]
struct AbiDocument {
    methods: Vec<MethodDocument>,
    types: String,
}

#[derive(Deserialize)]
struct MethodDocument {
    name: Option<String>,
    #[serde(default)]
    description: String,
    entry_point: Option<EntryPointRepr>,
    argument: Option<String>,
    #[serde(rename = "return")]
    return_type: Option<String>,
    #[serde(default)]
    read_only: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryPointRepr {
    Number(u64),
    Text(String),
}

impl Abi {
    /// Parse an ABI document and load the schema it embeds
    pub fn parse(document: &[u8]) -> Result<(Self, SchemaFile)> {
        let deserializer = &mut serde_json::Deserializer::from_slice(document);
        let doc: AbiDocument = serde_path_to_error::deserialize(deserializer)
            .map_err(|e| WalletError::InvalidAbi(e.to_string()))?;

        let types = general_purpose::STANDARD
            .decode(doc.types.trim())
            .map_err(|e| WalletError::InvalidAbi(format!("types: invalid base64: {}", e)))?;

        let schema = SchemaFile::load(&types).map_err(|e| WalletError::InvalidAbi(e.to_string()))?;

        let mut seen = HashSet::new();
        let mut methods = Vec::with_capacity(doc.methods.len());
        for (i, raw) in doc.methods.into_iter().enumerate() {
            let method = raw.into_method(i)?;

            if !seen.insert(method.name.clone()) {
                return Err(WalletError::InvalidAbi(format!(
                    "duplicate method {}",
                    method.name
                )));
            }
            for type_name in [&method.argument, &method.return_type] {
                schema.resolve(type_name).map_err(|_| {
                    WalletError::InvalidAbi(format!(
                        "could not find type {} for method {}",
                        type_name, method.name
                    ))
                })?;
            }

            methods.push(method);
        }

        debug!(methods = methods.len(), "ABI parsed");

        Ok((Abi { methods, types }, schema))
    }

    pub fn method(&self, name: &str) -> Option<&AbiMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl MethodDocument {
    fn into_method(self, index: usize) -> Result<AbiMethod> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| WalletError::InvalidAbi(format!("methods[{}]: missing name", index)))?;
        // Command names are `<contract>.<method>` and split on the last `.`
        if name.contains('.') || name.chars().any(char::is_whitespace) {
            return Err(WalletError::InvalidAbi(format!(
                "method name '{}' must not contain '.' or whitespace",
                name
            )));
        }

        let missing = |what: &str| WalletError::InvalidAbi(format!("method {}: missing {}", name, what));

        let entry_point = match self.entry_point {
            Some(EntryPointRepr::Text(text)) => parse_entry_point(&text)
                .map_err(|e| WalletError::InvalidAbi(format!("method {}: {}", name, e)))?,
            Some(EntryPointRepr::Number(n)) => u32::try_from(n).map_err(|_| {
                WalletError::InvalidAbi(format!("method {}: entry point {} out of range", name, n))
            })?,
            None => return Err(missing("entry_point")),
        };
        let argument = self.argument.ok_or_else(|| missing("argument"))?;
        let return_type = self.return_type.ok_or_else(|| missing("return"))?;

        Ok(AbiMethod {
            name,
            description: self.description,
            entry_point,
            argument,
            return_type,
            read_only: self.read_only,
        })
    }
}

/// Parse an entry point written as `0x`-prefixed hex or plain decimal
pub fn parse_entry_point(text: &str) -> Result<u32> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex_digits) => u32::from_str_radix(hex_digits, 16),
        None => text.parse::<u32>(),
    };

    parsed.map_err(|_| WalletError::InvalidAbi(format!("invalid entry point '{}'", text)))
}
