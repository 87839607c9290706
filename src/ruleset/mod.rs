//! Ruleset declarations and their TOML representation.
//!
//! A ruleset is a named collection of configured rules that may extend other
//! rulesets by name. Declarations are data only; [`resolver`] turns a
//! declaration graph into the flat, merged form the engine consumes.

pub mod resolver;

pub use resolver::{PropertyValue, ResolvedRuleset, RuleConfig, resolve};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Fatal configuration errors. All of these abort ruleset resolution before
/// any file is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cyclic ruleset inheritance: {0}")]
    CyclicExtends(String),
    #[error("ruleset '{ruleset}' references unknown rule '{code}'")]
    UnknownRule { ruleset: String, code: String },
    #[error("rule '{rule}' has no property '{property}'")]
    InvalidProperty { rule: String, property: String },
    #[error("rule '{rule}' property '{property}' has an unsupported value type")]
    InvalidPropertyValue { rule: String, property: String },
    #[error("invalid exclude pattern '{pattern}' for rule '{rule}': {source}")]
    InvalidGlob {
        rule: String,
        pattern: String,
        source: globset::Error,
    },
    #[error("unknown ruleset '{0}'")]
    UnknownRuleset(String),
    #[error("cannot read ruleset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid ruleset {name}: {message}")]
    Parse { name: String, message: String },
}

/// A ruleset as declared, before inheritance resolution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesetDecl {
    pub name: String,
    /// Other rulesets this one inherits from, applied left to right before
    /// this ruleset's own declarations.
    pub extends: Vec<String>,
    /// Keyed by rule code. BTreeMap keeps declaration merging deterministic
    /// regardless of TOML table order.
    pub rules: BTreeMap<String, RuleDecl>,
}

/// Per-rule settings inside a declaration. Every field is optional; an
/// omitted field inherits whatever an extended ruleset declared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RuleDecl {
    pub severity: Option<u8>,
    pub message: Option<String>,
    /// `exclude = true` removes the rule from the active set entirely,
    /// regardless of inheritance depth.
    pub exclude: Option<bool>,
    /// Glob patterns for file paths this rule must skip.
    pub exclude_patterns: Vec<String>,
    pub properties: BTreeMap<String, toml::Value>,
}

impl RulesetDecl {
    pub fn from_toml_str(name_hint: &str, s: &str) -> Result<Self, ConfigError> {
        let mut decl: RulesetDecl = toml::from_str(s).map_err(|e| ConfigError::Parse {
            name: name_hint.to_string(),
            message: e.to_string(),
        })?;
        if decl.name.is_empty() {
            decl.name = name_hint.to_string();
        }
        Ok(decl)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("reading ruleset from: {}", path.display());
        let s = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("ruleset");
        Self::from_toml_str(stem, &s)
    }
}

/// Supplies the declarations named in `extends` references.
pub trait RulesetLoader {
    fn load(&self, name: &str) -> Result<RulesetDecl, ConfigError>;
}

/// Loads `<dir>/<name>.toml` for each extends reference, the way a ruleset
/// file refers to siblings in its own directory.
pub struct DirLoader {
    dir: PathBuf,
}

impl DirLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl RulesetLoader for DirLoader {
    fn load(&self, name: &str) -> Result<RulesetDecl, ConfigError> {
        let path = self.dir.join(format!("{name}.toml"));
        if !path.is_file() {
            return Err(ConfigError::UnknownRuleset(name.to_string()));
        }
        RulesetDecl::from_path(&path)
    }
}

/// In-memory loader for embedded standards and tests.
#[derive(Default)]
pub struct MapLoader {
    decls: BTreeMap<String, RulesetDecl>,
}

impl MapLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, decl: RulesetDecl) -> &mut Self {
        self.decls.insert(decl.name.clone(), decl);
        self
    }
}

impl RulesetLoader for MapLoader {
    fn load(&self, name: &str) -> Result<RulesetDecl, ConfigError> {
        self.decls
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownRuleset(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_declaration() {
        let toml_str = r#"
            name = "house-style"
            extends = ["psr12"]

            [rules."squiz.superfluous-whitespace"]
            severity = 3
            exclude-patterns = ["vendor/**"]

            [rules."generic.lowercase-keywords"]
            exclude = true

            [rules."psr12.nullable-type-spacing".properties]
        "#;
        let decl = RulesetDecl::from_toml_str("fallback", toml_str).unwrap();
        assert_eq!(decl.name, "house-style");
        assert_eq!(decl.extends, vec!["psr12"]);
        let sw = &decl.rules["squiz.superfluous-whitespace"];
        assert_eq!(sw.severity, Some(3));
        assert_eq!(sw.exclude_patterns, vec!["vendor/**"]);
        assert_eq!(
            decl.rules["generic.lowercase-keywords"].exclude,
            Some(true)
        );
    }

    #[test]
    fn name_falls_back_to_hint() {
        let decl = RulesetDecl::from_toml_str("from-file", "").unwrap();
        assert_eq!(decl.name, "from-file");
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = RulesetDecl::from_toml_str("broken", "rules = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn file_loading_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "name = \"base\"\n[rules.\"generic.disallow-tab-indent\"]\nseverity = 4\n",
        )
        .unwrap();

        let loader = DirLoader::new(dir.path());
        let decl = loader.load("base").unwrap();
        assert_eq!(decl.name, "base");
        assert_eq!(
            decl.rules["generic.disallow-tab-indent"].severity,
            Some(4)
        );

        assert!(matches!(
            loader.load("missing"),
            Err(ConfigError::UnknownRuleset(_))
        ));
    }
}
