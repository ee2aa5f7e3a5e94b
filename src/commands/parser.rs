//! Command line parsing
//!
//! Splits an input line into tokens and binds them positionally to the
//! arguments of the selected command declaration.
use super::{CommandSet, ParseResult};
use crate::{Result, WalletError};
use tracing::debug;

/// Split a line on whitespace; a quoted substring is a single token
///
/// `"` and `'` quote until the matching character. Quotes may sit inside a
/// word (`a"b c"` is `ab c`), and `""` yields an empty token. Backslashes
/// and `#` have no special meaning.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(WalletError::InvalidString(line.trim().to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

pub fn parse(commands: &CommandSet, line: &str) -> Result<ParseResult> {
    let tokens = tokenize(line)?;
    let mut tokens = tokens.into_iter();

    let name = match tokens.next() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(WalletError::EmptyCommandName),
    };

    let decl = commands
        .get(&name)
        .ok_or_else(|| WalletError::UnknownCommand(name.clone()))?;

    let rest: Vec<String> = tokens.collect();
    if rest.len() < decl.args.len() {
        return Err(WalletError::NotEnoughArguments {
            command: name,
            expected: decl.args.len(),
            got: rest.len(),
        });
    }

    if rest.len() > decl.args.len() {
        debug!(
            command = name.as_str(),
            ignored = rest.len() - decl.args.len(),
            "Ignoring trailing arguments"
        );
    }

    let mut result = ParseResult::new(name);
    for (arg, value) in decl.args.iter().zip(rest) {
        result.args.insert(arg.name.clone(), value);
    }

    Ok(result)
}
