//! Interactive shell for CodePlans.
//!
//! # Responsibility
//! - Parse process options.
//! - Drive the menu-based text protocol on top of `codeplans_core`.

pub mod options;
pub mod shell;

pub use options::{parse, Args, Parsed};
pub use shell::{Shell, ShellConfig, MAX_PROMPT_ATTEMPTS};
