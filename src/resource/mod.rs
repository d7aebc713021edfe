//! # Resource Module
//!
//! Turns a declarative resource catalog into one [`ResourceConfiguration`] per
//! declared resource.
//!
//! ## Overview
//!
//! Data flows strictly downward:
//!
//! ```text
//! catalog (YAML/JSON)
//!   └─ DeclaredTypes            (ResourceIntrospector)
//!        ├─ resolve_metadata    identity, id, base path, DTO shapes, wrapper, collaborators
//!        ├─ ExistingRoutes      mapping markers on hand-written methods
//!        ├─ build_relations     one RelationDescriptor per relation field
//!        └─ security policy     CrudSecurity marker or settings default
//!             └─ ResourceConfiguration
//! ```
//!
//! ## Markers
//!
//! | Marker | On | Meaning |
//! |---|---|---|
//! | `CrudResource` | type | declares a resource (repeatable) |
//! | `CrudSecurity` | type | attaches a role pattern and inclusivity rule |
//! | `Relation` | field | explicit relation with optional overrides |
//! | `OneToMany`, `ManyToMany`, `ManyToOne` | field | persistence hints implying a relation |
//! | `RelationAccessor` | method | binds a method to accessor slots of a relation |
//! | `Id` / `IdAccessor` | field / method | identifier and its accessor |
//! | `GetMapping` … `RequestMapping` | method | hand-written route |
//!
//! ## Example
//!
//! ```rust,no_run
//! use brrtcrud::resource::{assemble, discover_resources, load_catalog, DeclaredTypes};
//! use brrtcrud::settings::Settings;
//! use std::path::Path;
//!
//! let catalog = load_catalog(Path::new("resources.yaml"))?;
//! let types = DeclaredTypes::new(catalog.types);
//! for declaration in discover_resources(&types) {
//!     let assembled = assemble(&types, &declaration, &Settings::default())?;
//!     println!("{}", assembled.configuration.controller_name);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

mod config;
mod introspect;
mod load;
mod metadata;
mod relations;
mod routes;
mod types;

pub use config::*;
pub use introspect::*;
pub use load::*;
pub use metadata::*;
pub use relations::*;
pub use routes::*;
pub use types::*;
