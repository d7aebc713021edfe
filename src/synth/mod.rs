//! # Synthesis Module
//!
//! Folds an ordered list of synthesizer functions over one
//! [`ResourceConfiguration`](crate::resource::ResourceConfiguration) and
//! collects the [`OperationSpec`]s they contribute.
//!
//! ## Pipeline Order
//!
//! ```text
//! create → read → update-partial → replace → delete → list → search
//!   then per relation, in discovery order:
//!     SINGLE:   get → set → delete
//!     MULTIPLE: get-all → add → add-by-id → remove → remove-by-id
//! ```
//!
//! Every synthesizer is a pure function that declines when any of its verbs is
//! already routed at its path, so hand-written methods override generated ones
//! by declaring the same route.
//!
//! ## Routes
//!
//! | Operation | Verbs | Path | Name |
//! |---|---|---|---|
//! | create | POST | `{base}` | `create` |
//! | read | GET | `{base}/{id}` | `get` |
//! | update-partial | PATCH | `{base}/{id}` | `update` |
//! | replace | PUT | `{base}/{id}` | `set` |
//! | delete | DELETE | `{base}/{id}` | `delete` |
//! | list | GET | `{base}` | `all` |
//! | search | GET | `{base}/search` | `search_all` |
//! | relation get / get-all | GET | `{base}/{id}/{rel}` | `get_<rel>` |
//! | relation set / add | POST, PUT, PATCH | `{base}/{id}/{rel}` | `set_<rel>` / `add_<one>` |
//! | relation delete / remove | DELETE | `{base}/{id}/{rel}` | `remove_<rel>` / `remove_<one>` |
//! | add-by-id | POST, PUT, PATCH | `{base}/{id}/{rel}/{relationId}` | `add_<one>_by_id` |
//! | remove-by-id | DELETE | `{base}/{id}/{rel}/{relationId}` | `remove_<one>_by_id` |
//!
//! ## Example
//!
//! ```rust
//! use brrtcrud::resource::ResourceConfiguration;
//! use brrtcrud::synth::{synthesize, SynthesisOptions};
//!
//! let config = ResourceConfiguration::new("shop.Order", "/orders");
//! let set = synthesize(&config, &SynthesisOptions::default());
//! assert_eq!(set.names()[0], "create");
//! assert_eq!(set.len(), 7);
//! ```

mod collection;
mod crud;
mod pipeline;
mod relation;
mod support;
mod types;
mod wrap;

pub use pipeline::*;
pub use types::*;
pub use wrap::{contract_for, respond_no_content, respond_with};
