//! rulegen.kdl generator configuration
//!
//! ```kdl
//! sources extension=".py"
//! visibility "//visibility:public"
//! ```
//!
//! Every node is optional; a missing file means [`GenerateConfig::default`].

use camino::{Utf8Path, Utf8PathBuf};
use facet_kdl as kdl;
use rg_proto::OrderedSet;
use thiserror::Error;

use crate::builder::{DEFAULT_SOURCE_EXTENSION, TargetBuilder};

/// Name of the configuration file looked up by [`GenerateConfig::find`].
pub const CONFIG_FILE_NAME: &str = "rulegen.kdl";

/// Errors while loading rulegen.kdl
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rulegen.kdl: {0}")]
    ParseError(String),

    #[error("invalid value for {property}: {reason}")]
    InvalidValue {
        property: &'static str,
        reason: String,
    },
}

/// How source files are named
#[derive(Debug, Clone, facet::Facet)]
#[facet(default)]
pub struct SourcesNode {
    /// Appended to a module name to get the file that defines it
    #[facet(kdl::property)]
    pub extension: String,
}

impl Default for SourcesNode {
    fn default() -> Self {
        Self {
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

/// A visibility label given to every generated rule
#[derive(Debug, Clone, facet::Facet)]
pub struct VisibilityNode {
    #[facet(kdl::argument)]
    pub label: String,
}

/// Top-level rulegen.kdl
#[derive(Debug, Clone, Default, facet::Facet)]
pub struct GenerateConfig {
    #[facet(kdl::child, default)]
    pub sources: SourcesNode,
    #[facet(kdl::children, rename = "visibility", default)]
    pub visibility: Vec<VisibilityNode>,
}

impl GenerateConfig {
    /// Parse rulegen.kdl from a file path
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_owned(),
            source: e,
        })?;

        Self::parse(&contents)
    }

    /// Parse rulegen.kdl from a string and validate it
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            facet_kdl::from_str(source).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Find rulegen.kdl starting from the given directory and searching upward
    pub fn find(start_path: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current = start_path;
        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Some(candidate);
            }

            current = current.parent()?;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ext = &self.sources.extension;
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::InvalidValue {
                property: "sources.extension",
                reason: format!("expected a leading '.' followed by a suffix, got {ext:?}"),
            });
        }

        for vis in &self.visibility {
            if vis.label.is_empty() {
                return Err(ConfigError::InvalidValue {
                    property: "visibility",
                    reason: "label cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Start a target that uses this configuration's extension and default
    /// visibility.
    pub fn target_builder<'a>(
        &self,
        kind: impl Into<String>,
        name: impl Into<String>,
        project_root: impl Into<Utf8PathBuf>,
        package: impl Into<Utf8PathBuf>,
        sibling_srcs: &'a OrderedSet<String>,
    ) -> TargetBuilder<'a> {
        let builder = TargetBuilder::new(kind, name, project_root, package, sibling_srcs)
            .with_source_extension(self.sources.extension.clone());

        self.visibility
            .iter()
            .fold(builder, |builder, vis| builder.add_visibility(vis.label.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rg_proto::{AttrValue, Module, VISIBILITY_ATTR};

    #[test]
    fn test_parse_full_config() {
        let kdl = r#"
            sources extension=".pyi"
            visibility "//visibility:public"
            visibility "//tools:__subpackages__"
        "#;

        let config = GenerateConfig::parse(kdl).unwrap();
        assert_eq!(config.sources.extension, ".pyi");
        assert_eq!(config.visibility.len(), 2);
        assert_eq!(config.visibility[0].label, "//visibility:public");
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = GenerateConfig::parse("").unwrap();
        assert_eq!(config.sources.extension, DEFAULT_SOURCE_EXTENSION);
        assert!(config.visibility.is_empty());
    }

    #[test]
    fn test_parse_visibility_only_config() {
        let kdl = r#"
            visibility "//visibility:public"
        "#;

        let config = GenerateConfig::parse(kdl).unwrap();
        assert_eq!(config.sources.extension, DEFAULT_SOURCE_EXTENSION);
        assert_eq!(config.visibility.len(), 1);
        assert_eq!(config.visibility[0].label, "//visibility:public");
    }

    #[test]
    fn test_reject_bad_extension() {
        let err = GenerateConfig::parse(r#"sources extension="""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = GenerateConfig::parse(r#"sources extension="py""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = GenerateConfig::parse(r#"sources extension=".""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_from_path_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::write(root.join(CONFIG_FILE_NAME), r#"sources extension=".star""#).unwrap();
        let nested = root.join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = GenerateConfig::find(&nested).unwrap();
        assert_eq!(found, root.join(CONFIG_FILE_NAME));

        let config = GenerateConfig::from_path(&found).unwrap();
        assert_eq!(config.sources.extension, ".star");
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();

        let err = GenerateConfig::from_path(&root.join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_target_builder_applies_config() {
        let config = GenerateConfig::parse(
            r#"
            sources extension=".star"
            visibility "//visibility:public"
            "#,
        )
        .unwrap();
        let siblings: OrderedSet<String> =
            ["defs.star".to_string(), "util.py".to_string()].into_iter().collect();

        let rule = config
            .target_builder("star_library", "defs", "", "", &siblings)
            .add_module_dependency(Module::new("defs", "other.star"))
            .add_module_dependency(Module::new("util", "defs.star"))
            .build();

        // `defs` is shadowed by defs.star; `util.py` doesn't count under `.star`
        let deps = rule.module_deps().unwrap();
        assert_eq!(deps.values(), vec![Module::new("util", "defs.star")]);
        assert_eq!(
            rule.attr(VISIBILITY_ATTR),
            Some(&AttrValue::List(vec!["//visibility:public".to_string()]))
        );
    }
}
