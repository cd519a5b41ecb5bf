//! Target assembly
//!
//! [`TargetBuilder`] is a consuming builder: every step takes the builder by
//! value and hands it back, and [`TargetBuilder::build`] consumes it for good.
//! A finalized builder therefore cannot be mutated again.
//!
//! ```
//! use rg_target::{Module, OrderedSet, TargetBuilder};
//!
//! let siblings: OrderedSet<String> = ["foo.py", "bar.py"].map(String::from).into_iter().collect();
//! let rule = TargetBuilder::new("py_library", "pkg", "", "pkg", &siblings)
//!     .add_src("foo.py")
//!     .add_src("bar.py")
//!     .add_module_dependency(Module::new("foo", "bar.py")) // satisfied by foo.py
//!     .add_module_dependency(Module::new("requests", "foo.py"))
//!     .build();
//!
//! assert_eq!(rule.module_deps().unwrap().len(), 1);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use rg_proto::{
    Attr, AttrValue, IMPORTS_ATTR, MAIN_ATTR, Module, OrderedSet, SRCS_ATTR, TESTONLY_ATTR,
    VISIBILITY_ATTR,
};
use tracing::{debug, trace};

use crate::error::Result;
use crate::path::relative_path;
use crate::rule::RuleDescriptor;

/// Extension that turns a module name into the file name that defines it.
pub const DEFAULT_SOURCE_EXTENSION: &str = ".py";

/// Accumulates the state of one generated rule.
#[derive(Debug, Clone)]
#[must_use = "a target builder does nothing until `build` is called"]
pub struct TargetBuilder<'a> {
    kind: String,
    name: String,
    project_root: Utf8PathBuf,
    package: Utf8PathBuf,
    source_extension: String,
    uuid: Option<String>,
    srcs: OrderedSet<String>,
    sibling_srcs: &'a OrderedSet<String>,
    deps: OrderedSet<Module>,
    resolved_deps: OrderedSet<String>,
    visibility: OrderedSet<String>,
    main: Option<String>,
    imports: Option<Vec<String>>,
    testonly: bool,
}

impl<'a> TargetBuilder<'a> {
    /// Start a rule of `kind` named `name`.
    ///
    /// `project_root` and `package` are only used to derive the `imports`
    /// attribute. `sibling_srcs` holds the file names of every source in the
    /// package directory; it decides which module dependencies are shadowed.
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        project_root: impl Into<Utf8PathBuf>,
        package: impl Into<Utf8PathBuf>,
        sibling_srcs: &'a OrderedSet<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            project_root: project_root.into(),
            package: package.into(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            uuid: None,
            srcs: OrderedSet::new(),
            sibling_srcs,
            deps: OrderedSet::new(),
            resolved_deps: OrderedSet::new(),
            visibility: OrderedSet::new(),
            main: None,
            imports: None,
            testonly: false,
        }
    }

    /// Use a different extension when mapping module names to file names.
    ///
    /// Only reachable through [`GenerateConfig::target_builder`], which
    /// validates the extension first.
    ///
    /// [`GenerateConfig::target_builder`]: crate::GenerateConfig::target_builder
    pub(crate) fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    /// Set an identity for the rule.
    ///
    /// Binaries and tests in the same package can depend on this value before
    /// the rule has a resolvable label; the resolver indexes it.
    pub fn set_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn add_src(mut self, src: impl Into<String>) -> Self {
        self.srcs.insert(src.into());
        self
    }

    pub fn add_srcs<I>(mut self, srcs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.srcs.extend(srcs.into_iter().map(Into::into));
        self
    }

    /// Add a module dependency, unless a sibling source shadows it.
    ///
    /// A dependency on `foo` is dropped when `foo.py` is a sibling source,
    /// because the sibling already provides it. The exception is a record
    /// that was found in `foo.py` itself.
    pub fn add_module_dependency(mut self, dep: Module) -> Self {
        if self.is_shadowed(&dep) {
            debug!(
                "{}: dropping dependency {} shadowed by sibling source",
                self.name, dep
            );
        } else {
            self.deps.insert(dep);
        }
        self
    }

    pub fn add_module_dependencies<I>(self, deps: I) -> Self
    where
        I: IntoIterator<Item = Module>,
    {
        deps.into_iter()
            .fold(self, |builder, dep| builder.add_module_dependency(dep))
    }

    /// Add a dependency that is already a finished label.
    ///
    /// It skips shadowing here and resolution later.
    pub fn add_resolved_dependency(mut self, dep: impl Into<String>) -> Self {
        self.resolved_deps.insert(dep.into());
        self
    }

    pub fn add_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility.insert(visibility.into());
        self
    }

    pub fn set_main(mut self, main: impl Into<String>) -> Self {
        self.main = Some(main.into());
        self
    }

    pub fn set_testonly(mut self) -> Self {
        self.testonly = true;
        self
    }

    /// Derive the `imports` attribute.
    ///
    /// Its single entry is the path from the package back up to the project
    /// root, so imports inside the rule can be written relative to the project
    /// root. A package sitting at the project root needs no entry.
    pub fn generate_imports_attribute(mut self) -> Result<Self> {
        let rel = relative_path(&self.package, &self.project_root)?;
        if rel == "." {
            self.imports = None;
        } else {
            debug!("{}: imports = [{}]", self.name, rel);
            self.imports = Some(vec![rel.into_string()]);
        }
        Ok(self)
    }

    /// Finalize the rule.
    pub fn build(self) -> RuleDescriptor {
        trace!(
            "{} {}: {} srcs, {} module deps, {} resolved deps",
            self.kind,
            self.name,
            self.srcs.len(),
            self.deps.len(),
            self.resolved_deps.len()
        );

        let mut attrs = Vec::new();
        if !self.srcs.is_empty() {
            attrs.push(Attr::new(SRCS_ATTR, AttrValue::List(self.srcs.values())));
        }
        if !self.visibility.is_empty() {
            attrs.push(Attr::new(
                VISIBILITY_ATTR,
                AttrValue::List(self.visibility.values()),
            ));
        }
        if let Some(main) = self.main {
            attrs.push(Attr::new(MAIN_ATTR, AttrValue::Str(main)));
        }
        if let Some(imports) = self.imports {
            attrs.push(Attr::new(IMPORTS_ATTR, AttrValue::List(imports)));
        }
        if self.testonly {
            attrs.push(Attr::new(TESTONLY_ATTR, AttrValue::Bool(true)));
        }

        let module_deps = (!self.deps.is_empty()).then_some(self.deps);

        RuleDescriptor::new(
            self.kind,
            self.name,
            attrs,
            self.uuid,
            module_deps,
            self.resolved_deps,
        )
    }

    fn is_shadowed(&self, dep: &Module) -> bool {
        let file_name = format!("{}{}", dep.name, self.source_extension);
        if !self.sibling_srcs.contains(file_name.as_str()) {
            return false;
        }
        let origin = Utf8Path::new(&dep.filepath).file_name();
        origin != Some(file_name.as_str())
    }
}
