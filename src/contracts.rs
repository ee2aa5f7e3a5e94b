//! Registry of contracts registered in this session
use crate::abi::{Abi, AbiMethod, MessageDescriptor, SchemaFile};
use crate::{Result, WalletError};
use std::collections::BTreeMap;

/// A registered contract
#[derive(Debug, Clone)]
pub struct Contract {
    pub name: String,
    /// Hex encoded contract id, as entered at registration
    pub address: String,
    pub abi: Abi,
    pub schema: SchemaFile,
}

impl Contract {
    /// Raw contract id bytes
    pub fn id(&self) -> Result<Vec<u8>> {
        crate::codec::parse_bytes(&self.address).map_err(|e| {
            WalletError::InvalidAbi(format!("contract {} address: {}", self.name, e))
        })
    }
}

/// Contracts keyed by their unique name
#[derive(Debug, Default)]
pub struct ContractRegistry {
    contracts: BTreeMap<String, Contract>,
}

/// Split `<contract>.<method>` on its last separator
pub fn split_method_name(qualified: &str) -> Result<(&str, &str)> {
    qualified
        .rsplit_once('.')
        .filter(|(contract, method)| !contract.is_empty() && !method.is_empty())
        .ok_or_else(|| WalletError::MethodNotFound(qualified.to_string()))
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contracts.contains_key(name)
    }

    pub fn add(&mut self, name: &str, address: &str, abi: Abi, schema: SchemaFile) -> Result<()> {
        if self.contains(name) {
            return Err(WalletError::ContractExists(name.to_string()));
        }

        self.contracts.insert(
            name.to_string(),
            Contract {
                name: name.to_string(),
                address: address.to_string(),
                abi,
                schema,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Contract> {
        self.contracts
            .get(name)
            .ok_or_else(|| WalletError::ContractNotFound(name.to_string()))
    }

    /// The contract owning a qualified command name
    pub fn get_from_method_name(&self, qualified: &str) -> Result<&Contract> {
        let (contract, _) = split_method_name(qualified)?;
        self.get(contract)
    }

    pub fn get_method(&self, qualified: &str) -> Result<&AbiMethod> {
        let (contract, method) = split_method_name(qualified)?;
        self.get(contract)?
            .abi
            .method(method)
            .ok_or_else(|| WalletError::MethodNotFound(qualified.to_string()))
    }

    pub fn get_method_argument_schema(&self, qualified: &str) -> Result<&MessageDescriptor> {
        let contract = self.get_from_method_name(qualified)?;
        let method = self.get_method(qualified)?;
        contract
            .schema
            .resolve(&method.argument)
            .map_err(|e| WalletError::InvalidAbi(e.to_string()))
    }

    pub fn get_method_return_schema(&self, qualified: &str) -> Result<&MessageDescriptor> {
        let contract = self.get_from_method_name(qualified)?;
        let method = self.get_method(qualified)?;
        contract
            .schema
            .resolve(&method.return_type)
            .map_err(|e| WalletError::InvalidAbi(e.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.values()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
