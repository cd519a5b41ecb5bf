//! Build-rule assembly for rulegen
//!
//! A [`TargetBuilder`] collects the sources, dependencies and attributes of one
//! generated rule and finalizes them into an immutable [`RuleDescriptor`].
//! Dependencies are split in two:
//! - module dependencies, which the resolver still has to turn into labels
//! - resolved dependencies, which are already labels and are passed through
//!
//! The builder also applies the sibling-shadowing rule: an import whose name
//! matches a source file in the same package is satisfied locally and is not
//! declared as a dependency.

pub mod builder;
pub mod config;
pub mod error;
pub mod path;
pub mod rule;

pub use builder::{DEFAULT_SOURCE_EXTENSION, TargetBuilder};
pub use config::{ConfigError, GenerateConfig};
pub use error::{Result, TargetError};
pub use rule::{ResolverInput, RuleDescriptor};

pub use rg_proto::{Module, OrderedSet};
