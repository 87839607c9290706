//! Inheritance resolution and rule-index construction.
//!
//! `extends` references form a directed graph that must be acyclic. The
//! traversal is depth-first with an explicit work stack and in-progress path,
//! so pathological declaration chains cannot blow the call stack, and a cycle
//! fails fast with the offending path spelled out. Merging is last-wins per
//! key: a setting declared later (more specific) overrides one inherited
//! earlier.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::diagnostics::DEFAULT_SEVERITY;
use crate::rules::RuleRegistry;
use crate::ruleset::{ConfigError, RulesetDecl, RulesetLoader};
use crate::tokenizer::TokenType;

/// A typed, merged property value from a ruleset declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
}

impl PropertyValue {
    fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Boolean(b) => Some(Self::Bool(*b)),
            toml::Value::Integer(i) => Some(Self::Int(*i)),
            toml::Value::Float(f) => Some(Self::Float(*f)),
            toml::Value::String(s) => Some(Self::Str(s.clone())),
            toml::Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Fully resolved configuration for one active rule.
#[derive(Debug)]
pub struct RuleConfig {
    pub code: String,
    pub severity: u8,
    pub message_override: Option<String>,
    pub properties: BTreeMap<String, PropertyValue>,
    /// Paths matching any of these globs skip the rule.
    pub exclude: GlobSet,
    /// Position of the rule in the registry this ruleset was resolved
    /// against.
    pub rule_pos: usize,
}

impl RuleConfig {
    pub fn suppressed_for(&self, path: &Path) -> bool {
        self.exclude.is_match(path)
    }
}

/// The active set of configured rules plus the token-type index dispatch
/// uses for O(1) lookup per token.
#[derive(Debug)]
pub struct ResolvedRuleset {
    pub name: String,
    configs: Vec<RuleConfig>,
    index: HashMap<TokenType, Vec<usize>>,
}

impl ResolvedRuleset {
    pub fn rules(&self) -> &[RuleConfig] {
        &self.configs
    }

    /// Indices into [`rules`](Self::rules) of the rules interested in this
    /// token type, in registration order.
    pub fn rules_for(&self, token_type: TokenType) -> &[usize] {
        self.index
            .get(&token_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[derive(Default)]
struct MergedRule {
    severity: Option<u8>,
    message: Option<String>,
    properties: BTreeMap<String, PropertyValue>,
    exclude_patterns: Vec<String>,
    excluded: bool,
}

/// Resolve `root` against `registry`, loading extended rulesets through
/// `loader`.
pub fn resolve(
    root: RulesetDecl,
    loader: &dyn RulesetLoader,
    registry: &RuleRegistry,
) -> Result<ResolvedRuleset, ConfigError> {
    let name = root.name.clone();
    let order = linearize(root, loader)?;
    log::debug!(
        "ruleset '{}' resolves through {} declaration(s)",
        name,
        order.len()
    );

    let mut merged: BTreeMap<String, MergedRule> = BTreeMap::new();
    for decl in &order {
        for (code, rule_decl) in &decl.rules {
            let Some(rule) = registry.get(code) else {
                return Err(ConfigError::UnknownRule {
                    ruleset: decl.name.clone(),
                    code: code.clone(),
                });
            };
            let entry = merged.entry(code.clone()).or_default();
            if rule_decl.exclude == Some(true) {
                entry.excluded = true;
            }
            if let Some(severity) = rule_decl.severity {
                entry.severity = Some(severity);
            }
            if let Some(message) = &rule_decl.message {
                entry.message = Some(message.clone());
            }
            if !rule_decl.exclude_patterns.is_empty() {
                entry.exclude_patterns = rule_decl.exclude_patterns.clone();
            }
            for (property, value) in &rule_decl.properties {
                if !rule.properties().contains(&property.as_str()) {
                    return Err(ConfigError::InvalidProperty {
                        rule: code.clone(),
                        property: property.clone(),
                    });
                }
                let value = PropertyValue::from_toml(value).ok_or_else(|| {
                    ConfigError::InvalidPropertyValue {
                        rule: code.clone(),
                        property: property.clone(),
                    }
                })?;
                entry.properties.insert(property.clone(), value);
            }
        }
    }

    // Configs in registry registration order keeps dispatch deterministic no
    // matter how declarations were spread across the graph.
    let mut configs = Vec::new();
    let mut index: HashMap<TokenType, Vec<usize>> = HashMap::new();
    for (rule_pos, rule) in registry.rules().iter().enumerate() {
        let Some(entry) = merged.get(rule.code()) else {
            continue;
        };
        if entry.excluded {
            log::debug!("rule '{}' excluded by ruleset '{}'", rule.code(), name);
            continue;
        }
        let exclude = build_globset(rule.code(), &entry.exclude_patterns)?;
        let config_pos = configs.len();
        configs.push(RuleConfig {
            code: rule.code().to_string(),
            severity: entry.severity.unwrap_or(DEFAULT_SEVERITY),
            message_override: entry.message.clone(),
            properties: entry.properties.clone(),
            exclude,
            rule_pos,
        });
        for token_type in rule.register() {
            index.entry(*token_type).or_default().push(config_pos);
        }
    }

    Ok(ResolvedRuleset {
        name,
        configs,
        index,
    })
}

/// Post-order of the extends graph: most general declaration first, `root`
/// last. Diamonds are applied once; cycles abort.
fn linearize(
    root: RulesetDecl,
    loader: &dyn RulesetLoader,
) -> Result<Vec<RulesetDecl>, ConfigError> {
    enum Work {
        Visit(RulesetDecl),
        Leave(RulesetDecl),
    }

    let mut order = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut done: BTreeSet<String> = BTreeSet::new();
    let mut stack = vec![Work::Visit(root)];

    while let Some(work) = stack.pop() {
        match work {
            Work::Visit(decl) => {
                if done.contains(&decl.name) {
                    continue;
                }
                if path.contains(&decl.name) {
                    let mut cycle = path.clone();
                    cycle.push(decl.name.clone());
                    return Err(ConfigError::CyclicExtends(cycle.join(" -> ")));
                }
                path.push(decl.name.clone());
                let parents = decl.extends.clone();
                stack.push(Work::Leave(decl));
                for parent in parents.iter().rev() {
                    stack.push(Work::Visit(loader.load(parent)?));
                }
            }
            Work::Leave(decl) => {
                path.pop();
                done.insert(decl.name.clone());
                order.push(decl);
            }
        }
    }

    Ok(order)
}

fn build_globset(rule: &str, patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
            rule: rule.to_string(),
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidGlob {
        rule: rule.to_string(),
        pattern: patterns.join(", "),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::MapLoader;

    fn registry() -> RuleRegistry {
        RuleRegistry::with_builtin_rules()
    }

    fn decl(toml_str: &str) -> RulesetDecl {
        RulesetDecl::from_toml_str("test", toml_str).unwrap()
    }

    #[test]
    fn empty_ruleset_resolves_to_no_rules() {
        let resolved = resolve(decl("name = \"empty\""), &MapLoader::new(), &registry()).unwrap();
        assert!(resolved.is_empty());
        assert!(resolved.rules_for(TokenType::Nullable).is_empty());
    }

    #[test]
    fn later_declaration_wins() {
        let mut loader = MapLoader::new();
        loader.insert(decl(
            r#"
            name = "base"
            [rules."squiz.superfluous-whitespace"]
            severity = 8
            message = "base message"
            "#,
        ));
        let root = decl(
            r#"
            name = "child"
            extends = ["base"]
            [rules."squiz.superfluous-whitespace"]
            severity = 2
            "#,
        );
        let resolved = resolve(root, &loader, &registry()).unwrap();
        let config = &resolved.rules()[0];
        assert_eq!(config.severity, 2);
        // Message was not redeclared, so the inherited one survives.
        assert_eq!(config.message_override.as_deref(), Some("base message"));
    }

    #[test]
    fn exclude_is_sticky_across_inheritance() {
        let mut loader = MapLoader::new();
        loader.insert(decl(
            r#"
            name = "base"
            [rules."generic.lowercase-keywords"]
            exclude = true
            "#,
        ));
        let root = decl(
            r#"
            name = "child"
            extends = ["base"]
            [rules."generic.lowercase-keywords"]
            severity = 9
            "#,
        );
        let resolved = resolve(root, &loader, &registry()).unwrap();
        assert!(
            resolved
                .rules()
                .iter()
                .all(|c| c.code != "generic.lowercase-keywords")
        );
    }

    #[test]
    fn cycle_is_named_in_the_error() {
        let mut loader = MapLoader::new();
        loader.insert(decl("name = \"a\"\nextends = [\"b\"]"));
        loader.insert(decl("name = \"b\"\nextends = [\"a\"]"));
        let err = resolve(
            decl("name = \"a\"\nextends = [\"b\"]"),
            &loader,
            &registry(),
        )
        .unwrap_err();
        match err {
            ConfigError::CyclicExtends(cycle) => {
                assert!(cycle.contains("a -> b -> a"), "got: {cycle}");
            }
            other => panic!("expected cycle error, got: {other}"),
        }
    }

    #[test]
    fn diamond_inheritance_applies_once() {
        let mut loader = MapLoader::new();
        loader.insert(decl(
            r#"
            name = "grand"
            [rules."generic.disallow-tab-indent"]
            severity = 1
            "#,
        ));
        loader.insert(decl("name = \"left\"\nextends = [\"grand\"]"));
        loader.insert(decl("name = \"right\"\nextends = [\"grand\"]"));
        let root = decl("name = \"top\"\nextends = [\"left\", \"right\"]");
        let resolved = resolve(root, &loader, &registry()).unwrap();
        assert_eq!(resolved.rules().len(), 1);
        assert_eq!(resolved.rules()[0].severity, 1);
    }

    #[test]
    fn unknown_rule_fails_resolution() {
        let root = decl(
            r#"
            name = "bad"
            [rules."nope.not-a-rule"]
            severity = 5
            "#,
        );
        let err = resolve(root, &MapLoader::new(), &registry()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule { .. }));
    }

    #[test]
    fn unknown_property_fails_resolution() {
        let root = decl(
            r#"
            name = "bad"
            [rules."squiz.superfluous-whitespace".properties]
            no-such-property = true
            "#,
        );
        let err = resolve(root, &MapLoader::new(), &registry()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProperty { .. }));
    }

    #[test]
    fn known_property_round_trips() {
        let root = decl(
            r#"
            name = "ok"
            [rules."squiz.superfluous-whitespace".properties]
            ignore-blank-lines = true
            "#,
        );
        let resolved = resolve(root, &MapLoader::new(), &registry()).unwrap();
        let config = &resolved.rules()[0];
        assert_eq!(
            config.properties["ignore-blank-lines"],
            PropertyValue::Bool(true)
        );
    }

    #[test]
    fn token_index_points_at_interested_rules() {
        let root = decl(
            r#"
            name = "idx"
            [rules."psr12.nullable-type-spacing"]
            [rules."squiz.superfluous-whitespace"]
            "#,
        );
        let resolved = resolve(root, &MapLoader::new(), &registry()).unwrap();
        let interested = resolved.rules_for(TokenType::Nullable);
        assert_eq!(interested.len(), 1);
        assert_eq!(
            resolved.rules()[interested[0]].code,
            "psr12.nullable-type-spacing"
        );
    }

    #[test]
    fn exclude_patterns_compile_to_globs() {
        let root = decl(
            r#"
            name = "globs"
            [rules."squiz.superfluous-whitespace"]
            exclude-patterns = ["vendor/**", "*.generated.php"]
            "#,
        );
        let resolved = resolve(root, &MapLoader::new(), &registry()).unwrap();
        let config = &resolved.rules()[0];
        assert!(config.suppressed_for(Path::new("vendor/lib/a.php")));
        assert!(config.suppressed_for(Path::new("models.generated.php")));
        assert!(!config.suppressed_for(Path::new("src/app.php")));
    }
}
