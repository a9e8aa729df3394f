//! # restprovider
//!
//! **restprovider** generates the source tree of a Terraform provider (Go,
//! plugin framework) from an [OpenAPI 3.x](https://spec.openapis.org/oas/v3.1.0)
//! description and a small YAML configuration that names the API entities
//! to expose.
//!
//! ## Architecture
//!
//! - **[`config`]** - Provider configuration loading and validation
//! - **[`openapi`]** - API description loading and body schema lookups
//! - **[`resolve`]** - Operation paths and methods, type mapping, and merging
//!   of request/response bodies into one attribute set per entity
//! - **[`generator`]** - Artifact planning, template rendering and writing
//! - **[`cli`]** - The `restprovider-gen` command line
//! - **[`logging`]** - Tracing subscriber setup
//! - **[`error`]** - Error types shared by all of the above
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(restprovider-gen)
//!     participant Config as config::load_provider_config
//!     participant Api as openapi::ApiDescription
//!     participant Planner as generator::ArtifactPlanner
//!     participant Resolve as resolve::resolve_properties
//!     participant Render as generator::TemplateRenderer
//!     participant FS as File System
//!
//!     CLI->>Config: provider.yaml
//!     Config->>Config: JSON Schema + semantic checks
//!     CLI->>Api: openapi.yaml
//!     CLI->>Planner: plan(entities, defaults)
//!     Planner-->>CLI: GenerationPlan
//!     loop every artifact
//!         CLI->>Resolve: properties (entity artifacts, once)
//!         CLI->>Render: render(template, ctx)
//!         CLI->>FS: write
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run --bin restprovider-gen -- generate \
//!   --open-api demos/petstore/openapi.yaml \
//!   --provider-spec demos/petstore/provider.yaml \
//!   --output-directory /tmp/terraform-provider-petstore
//! ```
//!
//! ```rust,ignore
//! use restprovider::generator::{generate_provider, GenerateOptions};
//!
//! let report = generate_provider(&GenerateOptions {
//!     open_api: "openapi.yaml".into(),
//!     provider_spec: "provider.yaml".into(),
//!     output_directory: "out".into(),
//!     ..GenerateOptions::default()
//! })?;
//! println!("{} files", report.artifacts.len());
//! ```
//!
//! ## Generated Tree
//!
//! Six fixed files (`Makefile`, `main.go`, `go.mod`, shared HTTP helpers, a
//! copy of the API description, the provider aggregator) and, per entity, a
//! `resource_<name>.go` and a `data_source_<name>.go` unless disabled.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod openapi;
pub mod resolve;

pub use config::{load_provider_config, parse_provider_config, EntityDescriptor, ProviderConfiguration};
pub use error::GenError;
pub use generator::{generate_provider, GenerateOptions, GenerationReport};
pub use openapi::ApiDescription;
