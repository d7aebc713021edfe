//! # CLI Module
//!
//! Command-line front end of the `brrtcrud-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Synthesize every resource of a catalog and write the output:
//!
//! ```bash
//! brrtcrud-gen generate --spec resources.yaml --output src/generated
//! ```
//!
//! Options:
//! - `--spec <FILE>` - Resource catalog (required)
//! - `--output <DIR>` - Output directory (default: `generated/{title}`)
//! - `--format <rust|json|yaml>` - Overrides the `exporter` setting
//! - `--config <FILE>` - Settings file (default: `brrtcrud.toml` next to the catalog)
//! - `--force` - Overwrite existing files
//! - `--dry-run` - Report what would be written
//! - `--verbose` - Log every synthesized operation
//! - `--no-format` - Skip rustfmt on generated sources
//!
//! ### `inspect`
//!
//! Print the operation table (verbs, path, status, required roles):
//!
//! ```bash
//! brrtcrud-gen inspect --spec resources.yaml --resource GeneratedOrderModelController
//! ```
//!
//! ### `lint`
//!
//! ```bash
//! brrtcrud-gen lint --spec resources.yaml --fail-on-error
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
