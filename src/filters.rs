use std::path::Path;

use regex::{Regex, RegexBuilder};
use tracing::{debug, info, warn};

use crate::error::{Result, VerifierError};
use crate::fmt::describe_filter;
use crate::models::{Filter, Transaction};
use crate::reconciler::within_window;

/// Reads the filter list. A missing file means no filters.
pub fn load_filters(file_path: &Path) -> Result<Vec<Filter>> {
    let content = match std::fs::read_to_string(file_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("no filter file at {}, running unfiltered", file_path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(VerifierError::Read {
                path: file_path.display().to_string(),
                source,
            })
        }
    };

    let filters: Vec<Filter> =
        serde_json::from_str(&content).map_err(|source| VerifierError::Filters {
            path: file_path.display().to_string(),
            source,
        })?;

    info!("found {} filters", filters.len());
    for f in &filters {
        debug!("filter: {}", describe_filter(f));
    }
    Ok(filters)
}

/// A filter paired with its precompiled, case-insensitive pattern.
/// `pattern` is `None` when the regex failed to compile.
struct CompiledFilter {
    filter: Filter,
    pattern: Option<Regex>,
}

impl CompiledFilter {
    fn applies_to(&self, t: &Transaction) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| re.is_match(&t.description))
            && t.amount >= self.filter.min
            && t.amount <= self.filter.max
    }
}

pub struct FilterSet {
    filters: Vec<CompiledFilter>,
    window_days: i64,
}

impl FilterSet {
    pub fn new(filters: Vec<Filter>, window_days: i64) -> Self {
        let filters = filters
            .into_iter()
            .map(|filter| {
                let pattern = match RegexBuilder::new(&filter.regex).case_insensitive(true).build() {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!("filter regex '{}' does not compile, it will never match: {e}", filter.regex);
                        None
                    }
                };
                CompiledFilter { filter, pattern }
            })
            .collect();
        Self {
            filters,
            window_days,
        }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True when some filter excludes `t` from reconciliation.
    ///
    /// Filters are tried in order. An undated filter that matches on pattern
    /// and amount wins outright. A dated one additionally needs the
    /// transaction strictly inside `date ± window`; when it isn't, the search
    /// moves on to the next filter.
    pub fn is_filtered(&self, t: &Transaction) -> bool {
        for compiled in &self.filters {
            if !compiled.applies_to(t) {
                continue;
            }
            let Some(date) = compiled.filter.date else {
                debug!("{} filtered by {}", t.description, describe_filter(&compiled.filter));
                return true;
            };
            if within_window(date, t.date, self.window_days) {
                debug!("{} filtered by {}", t.description, describe_filter(&compiled.filter));
                return true;
            }
        }
        false
    }
}
