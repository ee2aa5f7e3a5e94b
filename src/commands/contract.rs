//! Contract registration and the commands synthesized from an ABI
use super::{Command, CommandArg, CommandArgType, CommandDeclaration, Instantiation, ParseResult};
use crate::abi::{Abi, SchemaFile};
use crate::codec::{self, parse_bytes};
use crate::environment::{ExecutionEnvironment, ExecutionResult};
use crate::logging;
use crate::rpc::RpcTransport;
use crate::{Result, WalletError};
use std::fs;

/// Turn every ABI method into a `<contract>.<method>` command declaration
///
/// Arguments follow the request message's field declaration order.
pub fn compile(contract_name: &str, abi: &Abi, schema: &SchemaFile) -> Result<Vec<CommandDeclaration>> {
    let mut decls = Vec::with_capacity(abi.methods.len());

    for method in &abi.methods {
        let argument = schema.resolve(&method.argument).map_err(|_| {
            WalletError::InvalidAbi(format!(
                "could not find type {} for method {}",
                method.argument, method.name
            ))
        })?;

        let args = argument
            .fields
            .iter()
            .map(|field| CommandArg::new(field.name.clone(), CommandArgType::String))
            .collect();

        let instantiation: Instantiation = if method.read_only {
            ReadContractCommand::instantiate
        } else {
            WriteContractCommand::instantiate
        };

        decls.push(CommandDeclaration::new(
            format!("{}.{}", contract_name, method.name),
            method.description.clone(),
            false,
            instantiation,
            args,
        ));
    }

    Ok(decls)
}

/// `register <name> <address> <abi-filename>`
#[derive(Debug)]
pub struct RegisterCommand {
    name: String,
    address: String,
    abi_filename: String,
}

impl RegisterCommand {
    pub fn instantiate(mut parsed: ParseResult) -> Command {
        Command::Register(Self {
            name: parsed.take("name"),
            address: parsed.take("address"),
            abi_filename: parsed.take("abi-filename"),
        })
    }

    pub fn execute<T: RpcTransport>(self, ee: &mut ExecutionEnvironment<T>) -> Result<ExecutionResult> {
        if ee.contracts.contains(&self.name) {
            return Err(WalletError::ContractExists(self.name));
        }
        if self.name.is_empty() || self.name.contains(char::is_whitespace) {
            return Err(WalletError::InvalidAbi(format!(
                "invalid contract name '{}'",
                self.name
            )));
        }

        let id = parse_bytes(&self.address)
            .map_err(|e| WalletError::InvalidAddress(format!("{}: {}", self.address, e)))?;
        if id.is_empty() {
            return Err(WalletError::InvalidAddress(self.address));
        }

        logging::log_loading_abi(&self.name, &self.abi_filename);
        let document = fs::read(&self.abi_filename).map_err(|e| {
            WalletError::InvalidAbi(format!("could not read {}: {}", self.abi_filename, e))
        })?;
        let (abi, schema) = Abi::parse(&document)?;
        logging::log_abi_loaded(&self.name, abi.methods.len(), abi.types.len());

        let decls = compile(&self.name, &abi, &schema)?;
        ee.install_contract(&self.name, &self.address, abi, schema, decls)?;

        let mut result = ExecutionResult::new();
        result.add_message(format!(
            "Contract '{}' at address {} registered.",
            self.name, self.address
        ));
        Ok(result)
    }
}

/// Invoke a read-only contract method and render its response
#[derive(Debug)]
pub struct ReadContractCommand {
    parsed: ParseResult,
}

impl ReadContractCommand {
    pub fn instantiate(parsed: ParseResult) -> Command {
        Command::ReadContract(Self { parsed })
    }

    pub async fn execute<T: RpcTransport>(
        self,
        ee: &mut ExecutionEnvironment<T>,
    ) -> Result<ExecutionResult> {
        let name = self.parsed.command_name.as_str();
        let contract = ee.contracts.get_from_method_name(name)?;
        let method = ee.contracts.get_method(name)?;
        let argument = ee.contracts.get_method_argument_schema(name)?;
        let response = ee.contracts.get_method_return_schema(name)?;

        let args = codec::encode(&self.parsed.args, argument, &contract.schema)?;
        let contract_id = contract.id()?;
        logging::log_contract_read(name, method.entry_point, args.len());

        let bytes = ee
            .rpc
            .read_contract(&args, &contract_id, method.entry_point)
            .await?;
        logging::log_contract_result(name, bytes.len());

        let text = codec::render(&bytes, response, &contract.schema)?;
        let mut result = ExecutionResult::new();
        result.add_message(text);
        Ok(result)
    }
}

/// Sign and submit a call to a state-changing contract method
#[derive(Debug)]
pub struct WriteContractCommand {
    parsed: ParseResult,
}

impl WriteContractCommand {
    pub fn instantiate(parsed: ParseResult) -> Command {
        Command::WriteContract(Self { parsed })
    }

    pub async fn execute<T: RpcTransport>(
        self,
        ee: &mut ExecutionEnvironment<T>,
    ) -> Result<ExecutionResult> {
        let name = self.parsed.command_name.as_str();
        let key = ee.require_key(&format!("call {}", name))?;

        let contract = ee.contracts.get_from_method_name(name)?;
        let method = ee.contracts.get_method(name)?;
        let argument = ee.contracts.get_method_argument_schema(name)?;

        let args = codec::encode(&self.parsed.args, argument, &contract.schema)?;
        let contract_id = contract.id()?;
        logging::log_contract_write(name, method.entry_point, args.len());

        let receipt = ee
            .rpc
            .submit_contract_call(&args, key, &contract_id, method.entry_point)
            .await?;

        let mut result = ExecutionResult::new();
        result.add_message(format!(
            "Transaction submitted to contract '{}' at address {} .",
            contract.name, contract.address
        ));
        result.add_message(format!("Transaction id: {}", receipt.id));
        Ok(result)
    }
}
