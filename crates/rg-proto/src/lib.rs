//! Shared data types for rulegen
//!
//! These types cross the boundary between the stages of rule generation:
//! - the import analyzer produces [`Module`] records
//! - the target builder assembles them into rule descriptors
//! - the resolver and the rule writer read [`Attr`]s and the private sets
//!
//! Everything here is plain data. Ordering is total and stable so that
//! generated rules are byte-identical across runs.

use facet::Facet;

mod ordered_set;

pub use ordered_set::OrderedSet;

/// Public attribute holding the rule's source files.
pub const SRCS_ATTR: &str = "srcs";

/// Public attribute holding the rule's visibility labels.
pub const VISIBILITY_ATTR: &str = "visibility";

/// Public attribute naming the entry-point file.
pub const MAIN_ATTR: &str = "main";

/// Public attribute holding the import-path roots for the rule.
pub const IMPORTS_ATTR: &str = "imports";

/// Public attribute flagging test-only rules.
pub const TESTONLY_ATTR: &str = "testonly";

/// Private attribute: opaque identity used by same-package references.
pub const UUID_KEY: &str = "_rulegen_uuid";

/// Private attribute: module dependencies awaiting resolution.
pub const IMPORTS_KEY: &str = "_rulegen_imports";

/// Private attribute: dependencies that skip resolution.
pub const RESOLVED_DEPS_KEY: &str = "_rulegen_resolved_deps";

/// A dependency discovered in a source file.
///
/// Field order matters: the derived ordering compares `name` first, then
/// `filepath`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Facet)]
pub struct Module {
    /// Logical name the source file imports (e.g. `foo.bar`)
    pub name: String,
    /// Path of the file the import was found in
    pub filepath: String,
}

impl Module {
    pub fn new(name: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filepath: filepath.into(),
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (from {})", self.name, self.filepath)
    }
}

/// Value of a public rule attribute
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum AttrValue {
    Str(String),
    List(Vec<String>),
    Bool(bool),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// A named public attribute, as handed to the rule writer
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Attr {
    pub key: String,
    pub value: AttrValue,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: AttrValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_orders_by_name_then_filepath() {
        let mut modules = vec![
            Module::new("foo", "z.py"),
            Module::new("bar", "y.py"),
            Module::new("foo", "a.py"),
        ];
        modules.sort();

        assert_eq!(
            modules,
            vec![
                Module::new("bar", "y.py"),
                Module::new("foo", "a.py"),
                Module::new("foo", "z.py"),
            ]
        );
    }

    #[test]
    fn test_module_identity_uses_both_fields() {
        assert_eq!(Module::new("foo", "a.py"), Module::new("foo", "a.py"));
        assert_ne!(Module::new("foo", "a.py"), Module::new("foo", "b.py"));
    }

    #[test]
    fn test_attr_value_accessors() {
        let list = AttrValue::List(vec!["a.py".to_string()]);
        assert_eq!(list.as_list(), Some(&["a.py".to_string()][..]));
        assert_eq!(list.as_str(), None);

        assert_eq!(AttrValue::Str("main.py".into()).as_str(), Some("main.py"));
        assert_eq!(AttrValue::Bool(true).as_bool(), Some(true));
    }
}
