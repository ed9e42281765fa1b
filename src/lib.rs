//! Resolve a GitHub Project (v2) to its opaque id and custom field ids.
//!
//! Two GraphQL calls are made in order: the project lookup by organization and
//! number, then the first page of field definitions for the resolved id.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod output;
pub mod resolver;
pub mod types;

pub use config::Config;
pub use error::{ErrorKind, ResolveError, ResolveResult};
pub use resolver::{resolve, ProjectFieldResolver};
pub use types::{FieldCollection, FieldDescriptor, FieldKind, ProjectIdentity, ResolvedProject};
