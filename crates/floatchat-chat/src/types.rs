//! Data types shared by the dispatcher, transcript, and session.

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Message
// =============================================================================

/// Identifier of a message within one transcript.
///
/// Assigned from a per-transcript counter, so ids compare in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single entry in a chat transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    /// Creation time. Display only; transcript order is insertion order.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Whether the user wrote this message.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Local wall-clock time of creation, formatted `HH:MM:SS`.
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

// =============================================================================
// Topics and rules
// =============================================================================

/// Subject area a canned answer covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Salinity,
    Temperature,
    Bgc,
    Location,
    Trajectory,
    Depth,
    Export,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::Salinity => "salinity",
            Topic::Temperature => "temperature",
            Topic::Bgc => "bgc",
            Topic::Location => "location",
            Topic::Trajectory => "trajectory",
            Topic::Depth => "depth",
            Topic::Export => "export",
        };
        write!(f, "{}", name)
    }
}

/// A keyword trigger and the answer it selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRule {
    pub topic: Topic,
    /// Lowercase substrings; any one present in the input fires the rule.
    pub keywords: Vec<String>,
    pub response: String,
}

impl TopicRule {
    /// Build a rule, lowercasing every keyword.
    pub fn new(topic: Topic, keywords: &[&str], response: impl Into<String>) -> Self {
        Self {
            topic,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            response: response.into(),
        }
    }

    /// Whether any keyword occurs in the already-lowercased input.
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && normalized.contains(k.as_str()))
    }
}
