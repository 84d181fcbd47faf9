//! This crate generates the Go sources of a Terraform provider built on the Terraform Plugin
//! Framework, from declarative descriptions of its data sources and resources.
//!
//! ## Quick Start
//!
//! Entities are described in JSON. Each one lists its attributes and how it binds to the
//! generated API client. The following declares a data source reading a single user:
//!
//! ```json
//! [
//!   {
//!     "name": "user",
//!     "description": "Retrieves a user.",
//!     "api": {
//!       "strategy": "simple",
//!       "model": "User",
//!       "read_method": "RetrieveUser",
//!       "read_request_attributes": ["id"]
//!     },
//!     "attributes": [
//!       { "name": "id", "type": "string", "requiredness": "required", "description": "The ID." },
//!       { "name": "email", "type": "string", "requiredness": "computed", "description": "The email." }
//!     ]
//!   }
//! ]
//! ```
//!
//! The crate ships a built-in catalog under `catalog/`. The `providergen` binary generates
//! one `data_source_<name>.go` or `resource_<name>.go` file per entity into
//! `internal/provider`, then runs `go fmt` and `goimports` on every file:
//!
//! ```bash
//! cargo run --bin providergen -- --filter users
//! ```
//!
//! Logging is controlled with `PROVIDERGEN_LOG`, e.g. `PROVIDERGEN_LOG=providergen=debug`.
//!
//! The same pipeline is available as a library:
//!
//! ```no_run
//! use providergen::{config::CodeGeneratorConfig, descriptor::Catalog, format::CommandFormatter};
//!
//! fn main() -> providergen::error::Result<()> {
//!     let catalog = Catalog::builtin()?;
//!     let config = CodeGeneratorConfig::default();
//!     providergen::output::generate_provider(
//!         &catalog,
//!         &config,
//!         Some("projects"),
//!         &CommandFormatter::new(&config),
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! Generation is all-or-nothing: every selected entity is rendered in memory before the first
//! file is written.

// descriptor model and built-in catalog
pub mod descriptor;

// attribute translators
pub mod translate;

// Go record types
pub mod model;

// per-entity code generation
pub mod entity;

// Go writer
pub mod emit;

// pagination semantics of the generated read loop
pub mod pagination;

// post-processing of written files
pub mod format;

// generation run
pub mod output;

// configuration support for code generation
pub mod config;

pub mod error;

/// Utility functions to help testing code generators.
#[doc(hidden)]
pub mod test_utils;
