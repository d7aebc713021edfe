//! # brrtcrud
//!
//! **brrtcrud** synthesizes the CRUD and relation API surface of data resources from a
//! declarative resource catalog.
//!
//! ## Overview
//!
//! A catalog declares types, the markers attached to them, their fields and their methods.
//! Every `CrudResource` marker names an entity; brrtcrud resolves it into a
//! [`ResourceConfiguration`](resource::ResourceConfiguration) (identity, DTO shapes,
//! relations, hand-written routes, security) and folds an ordered list of synthesizers over
//! it. Each synthesizer contributes at most one [`OperationSpec`](synth::OperationSpec)
//! and declines when the route it would claim is already hand-written.
//!
//! ## Architecture
//!
//! - **[`resource`]** - Catalog loading, type introspection and configuration resolution
//! - **[`synth`]** - The synthesizer pipeline and the operation model
//! - **[`security`]** - Role pattern expansion into `hasRole(...)` expressions
//! - **[`settings`]** - Layered settings: defaults, `brrtcrud.toml`, catalog, environment
//! - **[`export`]** - Rust controller, JSON and YAML emission
//! - **[`linter`]** - Catalog diagnostics
//! - **[`generate`]** - The load → synthesize → export driver
//! - **[`cli`]** - The `brrtcrud-gen` command line
//! - **[`logging`]** - `tracing` subscriber setup for the binary
//!
//! ### Synthesis Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(brrtcrud-gen)
//!     participant Load as resource::load_catalog
//!     participant Resolve as resource::assemble
//!     participant Synth as synth::synthesize
//!     participant Export as export::Exporter
//!     participant FS as File System
//!
//!     User->>CLI: brrtcrud-gen generate --spec resources.yaml
//!     CLI->>Load: load_catalog("resources.yaml")
//!     Load-->>CLI: Catalog (types + settings)
//!     loop every CrudResource marker
//!         CLI->>Resolve: assemble(types, declaration, settings)
//!         Resolve-->>CLI: ResourceConfiguration
//!         CLI->>Synth: synthesize(config)
//!         Synth-->>CLI: OperationSet
//!     end
//!     CLI->>Export: render(resources)
//!     Export-->>CLI: Vec<RenderedFile>
//!     CLI->>FS: write_files (honors --force / --dry-run)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtcrud::resource::{discover_resources, parse_catalog, DeclaredTypes};
//! use brrtcrud::settings::Settings;
//! use brrtcrud::synth::{ResourceSynthesis, SynthesisOptions};
//!
//! let catalog = parse_catalog(r#"
//! types:
//!   - id: shop.Orders
//!     markers:
//!       - { name: CrudResource, values: { value: /orders, entity: shop.Order } }
//!   - id: shop.Order
//!     fields:
//!       - { name: id, type: i64, markers: [{ name: Id }] }
//! "#, true)?;
//! let types = DeclaredTypes::new(catalog.types);
//! let declaration = &discover_resources(&types)[0];
//!
//! let mut synthesis = ResourceSynthesis::new();
//! synthesis.configure(&types, declaration, &Settings::default())?;
//! let operations = synthesis.synthesize(&SynthesisOptions::default())?;
//! assert_eq!(operations.names(), ["create", "get", "update", "set", "delete", "all", "search_all"]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Generated Code
//!
//! The Rust exporter emits one controller module per resource. Each controller holds
//! its collaborators (data accessor, mapper, merger, search filter builder, reference
//! resolver) and exposes a `ROUTES` table plus one method per operation. Regenerate
//! rather than edit: hand-written routes belong on the declaring type, where they
//! suppress the matching generated operation.

pub mod cli;
pub mod error;
pub mod export;
pub mod generate;
pub mod linter;
pub mod logging;
pub mod naming;
pub mod resource;
pub mod security;
pub mod settings;
pub mod synth;

pub use error::{ConfigurationError, SynthesisError};
pub use resource::{load_catalog, ResourceConfiguration};
pub use settings::Settings;
pub use synth::{synthesize, synthesize_catalog, OperationSet, OperationSpec};
