//! Finalized rule descriptors

use rg_proto::{
    Attr, AttrValue, IMPORTS_KEY, Module, OrderedSet, RESOLVED_DEPS_KEY, UUID_KEY,
};

/// An immutable, generated build rule.
///
/// Public attributes are what the rule writer renders. They are stored in
/// emission order (`srcs`, `visibility`, `main`, `imports`, `testonly`) and an
/// attribute that is empty or default is absent rather than empty.
///
/// Private attributes are read by the resolver and never rendered:
/// - the identity token, if one was set
/// - module dependencies still needing resolution, if there are any
/// - dependencies that are already resolved, always present (possibly empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescriptor {
    kind: String,
    name: String,
    attrs: Vec<Attr>,
    uuid: Option<String>,
    module_deps: Option<OrderedSet<Module>>,
    resolved_deps: OrderedSet<String>,
}

/// The private half of a rule, handed to the resolver by value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverInput {
    pub uuid: Option<String>,
    /// Module dependencies to turn into labels
    pub module_deps: OrderedSet<Module>,
    /// Labels to merge as-is with whatever `module_deps` resolves to
    pub resolved_deps: OrderedSet<String>,
}

impl RuleDescriptor {
    pub(crate) fn new(
        kind: String,
        name: String,
        attrs: Vec<Attr>,
        uuid: Option<String>,
        module_deps: Option<OrderedSet<Module>>,
        resolved_deps: OrderedSet<String>,
    ) -> Self {
        Self {
            kind,
            name,
            attrs,
            uuid,
            module_deps,
            resolved_deps,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Public attributes in emission order
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Look up a public attribute by key
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| &attr.value)
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    pub fn module_deps(&self) -> Option<&OrderedSet<Module>> {
        self.module_deps.as_ref()
    }

    pub fn resolved_deps(&self) -> &OrderedSet<String> {
        &self.resolved_deps
    }

    /// Keys of the private attributes that are set, in a fixed order.
    pub fn private_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::with_capacity(3);
        if self.uuid.is_some() {
            keys.push(UUID_KEY);
        }
        if self.module_deps.is_some() {
            keys.push(IMPORTS_KEY);
        }
        keys.push(RESOLVED_DEPS_KEY);
        keys
    }

    /// Split off the private attributes for the resolver.
    pub fn into_parts(self) -> (Vec<Attr>, ResolverInput) {
        let input = ResolverInput {
            uuid: self.uuid,
            module_deps: self.module_deps.unwrap_or_default(),
            resolved_deps: self.resolved_deps,
        };
        (self.attrs, input)
    }
}
