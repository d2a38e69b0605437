//! Include/exclude glob rules for changed paths.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::errors::ConfigError;

/// Path selection rules. A leading `!` marks an exclude rule.
///
/// A path is selected when it matches an include rule (or no include rule
/// exists) and matches no exclude rule.
#[derive(Debug, Clone)]
pub struct PathFilter {
    includes: GlobSet,
    excludes: GlobSet,
    has_includes: bool,
    rules: usize,
}

impl PathFilter {
    /// Build from raw rules; blank rules are ignored.
    pub fn new<I, S>(rules: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut includes = GlobSetBuilder::new();
        let mut excludes = GlobSetBuilder::new();
        let mut has_includes = false;
        let mut count = 0usize;

        for rule in rules {
            let rule = rule.as_ref().trim();
            if rule.is_empty() {
                continue;
            }
            count += 1;
            match rule.strip_prefix('!') {
                Some(pattern) => {
                    excludes.add(glob(pattern.trim())?);
                }
                None => {
                    includes.add(glob(rule)?);
                    has_includes = true;
                }
            }
        }

        Ok(Self {
            includes: includes.build()?,
            excludes: excludes.build()?,
            has_includes,
            rules: count,
        })
    }

    /// Parse a comma- or newline-separated rule list.
    pub fn parse(rules: &str) -> Result<Self, ConfigError> {
        Self::new(rules.split([',', '\n']))
    }

    /// A filter that selects everything.
    pub fn allow_all() -> Self {
        Self {
            includes: GlobSet::empty(),
            excludes: GlobSet::empty(),
            has_includes: false,
            rules: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules == 0
    }

    /// `true` if the path should be reviewed.
    pub fn check(&self, path: &str) -> bool {
        if self.rules == 0 {
            return true;
        }
        let included = !self.has_includes || self.includes.is_match(path);
        included && !self.excludes.is_match(path)
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::allow_all()
    }
}

/// `*` stays within one path segment; `**` crosses them.
fn glob(pattern: &str) -> Result<globset::Glob, ConfigError> {
    Ok(GlobBuilder::new(pattern).literal_separator(true).build()?)
}
