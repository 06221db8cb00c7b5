//! Mapping table of module-path rewrite rules.
//!
//! A table is an ordered list of regex-to-literal substitutions. Rules are
//! applied in sequence, so a later rule sees text already rewritten by an
//! earlier one. Literal `old=new` mappings are escaped and anchored with a
//! trailing word boundary, which keeps `crate::app` from matching inside
//! `crate::app_state` or `crate::appendix`.

use crate::error::{Result, RewriteError};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

/// Flat editor module paths and their nested homes, in application order.
pub const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("crate::app", "crate::core::app"),
    ("crate::state", "crate::core::state"),
    ("crate::command_bus", "crate::core::command_bus"),
    ("crate::commands", "crate::core::commands"),
    ("crate::window", "crate::core::window"),
    ("crate::viewport", "crate::core::viewport"),
    ("crate::settings", "crate::core::settings"),
    ("crate::session", "crate::core::session"),
    ("crate::theme", "crate::ui::theme"),
    ("crate::icons", "crate::ui::icons"),
    ("crate::layouts", "crate::ui::layouts"),
    ("crate::components", "crate::ui::components"),
    ("crate::engine_bridge", "crate::services::engine_bridge"),
    ("crate::bevy_bridge", "crate::services::bevy_bridge"),
    ("crate::ai_agent", "crate::services::ai_agent"),
    ("crate::scene_builder", "crate::features::scene_builder"),
    ("crate::logic_graph", "crate::features::logic_graph"),
    ("crate::global_search", "crate::features::global_search"),
    ("crate::director", "crate::features::director"),
    ("crate::asset_vault", "crate::features::asset_vault"),
    ("crate::extension", "crate::features::extension"),
    ("crate::account", "crate::features::account"),
];

/// A single search pattern and the literal text that replaces each match.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    /// Compiles a raw regex rule. `$` in `replacement` is kept literally.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|source| RewriteError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.into(),
        })
    }

    /// Builds a rule matching the literal module path `old` as a whole token.
    ///
    /// The trailing `\b` is only added when `old` ends in an identifier
    /// character; a boundary after `::` would demand the opposite.
    pub fn literal(old: &str, new: impl Into<String>) -> Result<Self> {
        let mut pattern = regex::escape(old);
        if old.chars().last().is_some_and(is_word_char) {
            pattern.push_str(r"\b");
        }
        Self::new(&pattern, new)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn to_spec(&self) -> RuleSpec {
        RuleSpec {
            pattern: self.pattern().to_string(),
            replacement: self.replacement.clone(),
        }
    }

    /// Replaces every non-overlapping match in `input`.
    ///
    /// Returns the rewritten text and the number of matches replaced. The
    /// input is borrowed back untouched when nothing matched.
    pub fn apply<'a>(&self, input: &'a str) -> (Cow<'a, str>, usize) {
        let count = self.pattern.find_iter(input).count();
        if count == 0 {
            return (Cow::Borrowed(input), 0);
        }
        let output = self
            .pattern
            .replace_all(input, NoExpand(&self.replacement));
        (output, count)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// On-disk form of a rule inside a JSON rules file. `--print-rules --json`
/// emits the same shape, so its output can be fed back through `--rules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub replacement: String,
}

/// Ordered, immutable collection of rules.
///
/// Rules are applied in the order they were added; callers relying on one
/// rule's output feeding the next must add them in that order.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    rules: Vec<Rule>,
}

impl MappingTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The built-in table from [`DEFAULT_MAPPINGS`].
    pub fn builtin() -> Result<Self> {
        let rules = DEFAULT_MAPPINGS
            .iter()
            .map(|(old, new)| Rule::literal(old, *new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    /// Builds literal, boundary-anchored rules from `old=new` pairs.
    pub fn from_mappings(mappings: &[(String, String)]) -> Result<Self> {
        let rules = mappings
            .iter()
            .map(|(old, new)| Rule::literal(old, new.as_str()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    /// Loads raw regex rules from a JSON array of `{ pattern, replacement }`.
    pub fn from_rules_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RewriteError::RulesFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let specs: Vec<RuleSpec> =
            serde_json::from_str(&text).map_err(|source| RewriteError::RulesFileParse {
                path: path.to_path_buf(),
                source,
            })?;
        let rules = specs
            .iter()
            .map(|spec| Rule::new(&spec.pattern, spec.replacement.as_str()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    /// Appends `other`'s rules after this table's rules.
    pub fn extend(&mut self, other: MappingTable) {
        self.rules.extend(other.rules);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The table in rules-file form, in application order.
    pub fn specs(&self) -> Vec<RuleSpec> {
        self.rules.iter().map(Rule::to_spec).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parses an `old=new` mapping argument.
pub fn parse_mapping(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((old, new)) if !old.trim().is_empty() && !new.trim().is_empty() => {
            Ok((old.trim().to_string(), new.trim().to_string()))
        }
        _ => Err(RewriteError::InvalidMapping {
            input: s.to_string(),
        }
        .to_string()),
    }
}
