//! Tab completion of command names

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Completes the first word of a line against the known command names
#[derive(Debug, Default)]
pub struct CommandCompleter {
    names: Vec<String>,
}

impl CommandCompleter {
    pub fn new(names: Vec<String>) -> Self {
        let mut completer = Self::default();
        completer.set_names(names);
        completer
    }

    pub fn set_names(&mut self, mut names: Vec<String>) {
        names.sort();
        self.names = names;
    }

    /// Start offset and matching names for the word ending at `pos`
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let prefix = line.get(..pos).unwrap_or(line);
        let start = prefix.len() - prefix.trim_start().len();
        let word = &prefix[start..];

        // Only the command name is completed
        if word.contains(char::is_whitespace) {
            return (pos, Vec::new());
        }

        let matches = self
            .names
            .iter()
            .filter(|name| name.starts_with(word))
            .cloned()
            .collect();
        (start, matches)
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, names) = self.candidates(line, pos);
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn completer() -> CommandCompleter {
        CommandCompleter::new(vec![
            "open".to_string(),
            "info".to_string(),
            "koin.transfer".to_string(),
            "koin.balance_of".to_string(),
        ])
    }

    #[test]
    fn test_completes_prefix() {
        let (start, names) = completer().candidates("koin.", 5);
        assert_eq!(start, 0);
        assert_eq!(names, vec!["koin.balance_of", "koin.transfer"]);
    }

    #[test]
    fn test_skips_leading_whitespace() {
        let (start, names) = completer().candidates("  op", 4);
        assert_eq!(start, 2);
        assert_eq!(names, vec!["open"]);
    }

    #[test]
    fn test_arguments_not_completed() {
        let (_, names) = completer().candidates("open in", 7);
        assert!(names.is_empty());
    }
}
