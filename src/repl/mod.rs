//! Interactive wallet shell
//!
//! A line-editing loop around the execution environment, with persistent
//! history and completion of command names.

pub mod completer;
pub mod session;

pub use completer::CommandCompleter;
pub use session::ReplSession;
