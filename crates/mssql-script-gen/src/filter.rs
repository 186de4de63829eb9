//! Include/exclude name filtering for table scripting.
//!
//! A name is included when the include list is empty or at least one include
//! pattern matches, and no exclude pattern matches. Exclusion always wins.
//! Patterns use `regex` search semantics (`is_match`), case-sensitive unless
//! the pattern itself says otherwise (e.g. `(?i)`).

use regex::Regex;

use crate::error::{Result, ScriptGenError};

/// Raw pattern lists as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilterSpec {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

/// Compiled include/exclude filter.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl NameFilter {
    /// Compile include and exclude patterns.
    ///
    /// Fails on the first pattern that does not compile, naming it.
    pub fn new<'a, I, E>(include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
        E: IntoIterator<Item = &'a str>,
    {
        Ok(Self {
            include: compile_all(include)?,
            exclude: compile_all(exclude)?,
        })
    }

    /// A filter that includes everything.
    pub fn include_all() -> Self {
        Self::default()
    }

    /// Whether a table with this name should be scripted.
    pub fn should_include(&self, name: &str) -> bool {
        if !self.include.is_empty() && !has_match(&self.include, name) {
            return false;
        }
        !has_match(&self.exclude, name)
    }
}

impl TryFrom<&NameFilterSpec> for NameFilter {
    type Error = ScriptGenError;

    fn try_from(spec: &NameFilterSpec) -> Result<Self> {
        NameFilter::new(
            spec.include_patterns.iter().map(String::as_str),
            spec.exclude_patterns.iter().map(String::as_str),
        )
    }
}

fn compile_all<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<Vec<Regex>> {
    patterns
        .into_iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ScriptGenError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}

fn has_match(patterns: &[Regex], name: &str) -> bool {
    patterns.iter().any(|re| re.is_match(name))
}
