//! Prompt templates for journal pattern analysis.
//!
//! Each variant is a fixed template with two slots, `{entries_json}` and `{day_count}`.
//! Exactly one variant is active per deployment (`template` in [`AuraConfig`](crate::AuraConfig)).

pub mod baseline;
pub mod forecast;
pub mod trauma_informed;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use baseline::BASELINE_TEMPLATE;
pub use forecast::FORECAST_TEMPLATE;
pub use trauma_informed::TRAUMA_INFORMED_TEMPLATE;

use crate::entry::Entry;
use crate::error::{AuraError, AuraResult};

const ENTRIES_SLOT: &str = "{entries_json}";
const DAY_COUNT_SLOT: &str = "{day_count}";

/// Analytical framing of the prompt. Variants differ only in template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTemplate {
    /// Trend and correlation analysis.
    Baseline,
    /// Trend analysis plus a 7-day forecast.
    Forecast,
    /// Gentle, trauma-aware reflection.
    #[default]
    #[serde(alias = "trauma_aware")]
    TraumaInformed,
}

impl PromptTemplate {
    pub const ALL: [PromptTemplate; 3] = [
        PromptTemplate::Baseline,
        PromptTemplate::Forecast,
        PromptTemplate::TraumaInformed,
    ];

    pub fn body(self) -> &'static str {
        match self {
            PromptTemplate::Baseline => BASELINE_TEMPLATE,
            PromptTemplate::Forecast => FORECAST_TEMPLATE,
            PromptTemplate::TraumaInformed => TRAUMA_INFORMED_TEMPLATE,
        }
    }

    /// Value of `analysis_type` in the response. Baseline reports none.
    pub fn analysis_type(self) -> Option<&'static str> {
        match self {
            PromptTemplate::Baseline => None,
            PromptTemplate::Forecast => Some("forecast"),
            PromptTemplate::TraumaInformed => Some("trauma_informed"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PromptTemplate::Baseline => "baseline",
            PromptTemplate::Forecast => "forecast",
            PromptTemplate::TraumaInformed => "trauma_informed",
        }
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Ok(PromptTemplate::Baseline),
            "forecast" => Ok(PromptTemplate::Forecast),
            "trauma_informed" | "trauma_aware" => Ok(PromptTemplate::TraumaInformed),
            other => Err(format!(
                "unknown template '{}' (expected baseline, forecast or trauma_informed)",
                other
            )),
        }
    }
}

/// Renders the active template for a batch of entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder {
    template: PromptTemplate,
}

impl PromptBuilder {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> PromptTemplate {
        self.template
    }

    /// Render the prompt. Callers must reject empty batches first.
    pub fn render(&self, entries: &[Entry], day_count: usize) -> AuraResult<String> {
        if entries.is_empty() {
            return Err(AuraError::Prompt("cannot build a prompt from zero entries".into()));
        }
        let entries_json =
            serde_json::to_string_pretty(entries).map_err(|e| AuraError::Prompt(e.to_string()))?;
        Ok(fill_slots(self.template.body(), &entries_json, day_count))
    }
}

/// Single pass over `template`. Substituted text is never rescanned, so slot tokens
/// inside journal notes come through untouched.
fn fill_slots(template: &str, entries_json: &str, day_count: usize) -> String {
    let mut out = String::with_capacity(template.len() + entries_json.len());
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix(ENTRIES_SLOT) {
            out.push_str(entries_json);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(DAY_COUNT_SLOT) {
            out.push_str(&day_count.to_string());
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
