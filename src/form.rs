use crate::error::FormError;
use crate::stage::{StageData, StageUrls};

/// One label/url entry row of the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPair {
    pub label: String,
    pub url: String,
}

impl UrlPair {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        UrlPair {
            label: label.into(),
            url: url.into(),
        }
    }

    /// Trimmed `(label, url)`, or `None` when either side is blank.
    pub fn complete(&self) -> Option<(&str, &str)> {
        let label = self.label.trim();
        let url = self.url.trim();
        if label.is_empty() || url.is_empty() {
            None
        } else {
            Some((label, url))
        }
    }
}

/// Raw contents of the create form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageForm {
    pub stage_name: String,
    pub pairs: Vec<UrlPair>,
}

impl StageForm {
    pub fn new(stage_name: impl Into<String>, pairs: Vec<UrlPair>) -> Self {
        StageForm {
            stage_name: stage_name.into(),
            pairs,
        }
    }

    /// Builds the create request body. Incomplete pairs are dropped; a
    /// repeated label keeps its first position and takes the last url.
    pub fn assemble(&self) -> Result<StageData, FormError> {
        let stage_name = self.stage_name.trim();
        if stage_name.is_empty() {
            return Err(FormError::EmptyStageName);
        }
        let mut stages = StageUrls::new();
        for (label, url) in self.pairs.iter().filter_map(UrlPair::complete) {
            stages.insert(label.to_string(), url.to_string());
        }
        Ok(StageData::new(stage_name, stages))
    }
}

/// Parses a CLI `label=url` argument. The url may itself contain `=`.
pub fn parse_url_pair(raw: &str) -> Result<UrlPair, String> {
    match raw.split_once('=') {
        Some((label, url)) => Ok(UrlPair::new(label, url)),
        None => Err(format!("expected <label>=<url>, got '{}'", raw)),
    }
}
