//! Keyword dispatcher that selects a canned ARGO answer for an utterance.
//!
//! Rules are checked in a fixed priority order and the first rule with a
//! keyword contained in the lowercased input wins. Inputs that match nothing
//! get the clarification answer, so every input produces a non-empty reply.

use std::sync::{Arc, LazyLock};

use crate::types::{Topic, TopicRule};

// =============================================================================
// Built-in answers
// =============================================================================

pub const SALINITY_RESPONSE: &str = "I found 15 ARGO floats with salinity data near the equator in March 2023. The average salinity ranges from 34.5 to 35.2 PSU. The data shows seasonal variations with peak values during the monsoon season.";

pub const TEMPERATURE_RESPONSE: &str = "Temperature profiles at 1000m depth in the Indian Ocean show an average of 8.2°C. The data from 12 ARGO floats indicates a warming trend of 0.1°C per decade.";

pub const BGC_RESPONSE: &str = "BGC parameters in the Arabian Sea show chlorophyll levels ranging from 0.2 to 1.8 mg/m³. Oxygen concentrations vary from 180 to 220 μmol/kg at surface levels.";

pub const LOCATION_RESPONSE: &str = "Found 3 ARGO floats within 100km of your location. Float 2901234 is 45km away with recent temperature and salinity data. Float 2901235 is 78km away with BGC parameters.";

pub const TRAJECTORY_RESPONSE: &str = "ARGO float trajectories in the Arabian Sea show typical cyclonic patterns. Float 2901234 has traveled 1,200km over the past 6 months.";

pub const DEPTH_RESPONSE: &str = "Depth-time plots for the last 6 months show mixed layer depths varying from 20m in winter to 60m in summer. Temperature profiles extend to 2000m depth.";

pub const EXPORT_RESPONSE: &str = "Data export is ready! You can download the results in ASCII format (2.3MB) or NetCDF format (1.8MB). The export includes metadata and quality flags.";

pub const DEFAULT_RESPONSE: &str = "I understand you're asking about ARGO float data. Could you be more specific? I can help with temperature, salinity, BGC parameters, locations, trajectories, or data exports.";

/// The built-in rule table, in priority order.
fn builtin_rules() -> Vec<TopicRule> {
    vec![
        TopicRule::new(Topic::Salinity, &["salinity"], SALINITY_RESPONSE),
        TopicRule::new(Topic::Temperature, &["temperature"], TEMPERATURE_RESPONSE),
        TopicRule::new(Topic::Bgc, &["bgc", "chlorophyll", "oxygen"], BGC_RESPONSE),
        TopicRule::new(Topic::Location, &["location", "near", "float"], LOCATION_RESPONSE),
        TopicRule::new(Topic::Trajectory, &["trajectory", "path"], TRAJECTORY_RESPONSE),
        TopicRule::new(Topic::Depth, &["depth", "profile"], DEPTH_RESPONSE),
        TopicRule::new(Topic::Export, &["export", "download"], EXPORT_RESPONSE),
    ]
}

static BUILTIN: LazyLock<ResponseDispatcher> =
    LazyLock::new(|| ResponseDispatcher::new(builtin_rules(), DEFAULT_RESPONSE));

// =============================================================================
// ResponseDispatcher
// =============================================================================

/// First-match-wins keyword dispatcher.
///
/// Cloning is cheap: the rule table is shared and never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct ResponseDispatcher {
    rules: Arc<[TopicRule]>,
    default_response: Arc<str>,
}

impl Default for ResponseDispatcher {
    /// The built-in ARGO table, built once per process.
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl ResponseDispatcher {
    /// Create a dispatcher over `rules` (checked in the given order).
    ///
    /// Keywords are lowercased here so matching against lowercased input
    /// stays case-insensitive whatever the caller supplied. Replies are never
    /// blank: a blank default becomes [`DEFAULT_RESPONSE`], and a rule with a
    /// blank response answers with the default.
    pub fn new(rules: Vec<TopicRule>, default_response: impl Into<String>) -> Self {
        let mut default_response: String = default_response.into();
        if default_response.trim().is_empty() {
            tracing::warn!("Blank default response replaced with built-in fallback");
            default_response = DEFAULT_RESPONSE.to_string();
        }

        let rules: Vec<TopicRule> = rules
            .into_iter()
            .map(|mut rule| {
                for keyword in &mut rule.keywords {
                    *keyword = keyword.to_lowercase();
                }
                if rule.response.trim().is_empty() {
                    tracing::warn!(topic = %rule.topic, "Blank rule response replaced with default");
                    rule.response = default_response.clone();
                }
                rule
            })
            .collect();

        Self {
            rules: rules.into(),
            default_response: Arc::from(default_response),
        }
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[TopicRule] {
        &self.rules
    }

    /// Answer used when no rule matches.
    pub fn default_response(&self) -> &str {
        &self.default_response
    }

    /// The first rule whose keywords occur in `utterance`, if any.
    pub fn matching_rule(&self, utterance: &str) -> Option<&TopicRule> {
        let normalized = utterance.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&normalized))
    }

    /// Topic of the rule `utterance` would fire, or `None` for the fallback.
    pub fn classify(&self, utterance: &str) -> Option<Topic> {
        self.matching_rule(utterance).map(|rule| rule.topic)
    }

    /// Select the answer for `utterance`. Total and deterministic.
    pub fn respond(&self, utterance: &str) -> &str {
        match self.matching_rule(utterance) {
            Some(rule) => {
                tracing::debug!(topic = %rule.topic, "Utterance matched topic rule");
                rule.response.as_str()
            }
            None => {
                tracing::debug!("No topic rule matched, using fallback answer");
                &*self.default_response
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
