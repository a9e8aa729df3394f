//! # CLI Module
//!
//! Command-line front end of the generator, available as the
//! `restprovider-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! ```bash
//! restprovider-gen generate \
//!     --open-api openapi.yaml \
//!     --provider-spec provider.yaml \
//!     --output-directory terraform-provider-petstore
//! ```
//!
//! Options:
//! - `--template-dir <DIR>` - Replace built-in templates with files from `DIR`
//! - `--dry-run` - Render everything, print a digest per file, write nothing
//!
//! ### `validate`
//!
//! Loads both inputs, checks the configuration and resolves the attributes of
//! every entity without writing anything.
//!
//! ### `plan`
//!
//! Prints the artifact paths in the order they would be written.
//!
//! Errors are printed to stderr and the process exits with status 1.

mod commands;


pub use commands::{run, run_cli, Cli, Commands, InputArgs};
