//! Interview context, summary, and knowledge draft types.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wcommon::SessionId;

use crate::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpertiseArea {
    Engineering,
    Manufacturing,
    Healthcare,
    Finance,
    Technology,
    Operations,
    Sales,
    Marketing,
    Hr,
    Other,
}

impl ExpertiseArea {
    pub const ALL: [ExpertiseArea; 10] = [
        Self::Engineering,
        Self::Manufacturing,
        Self::Healthcare,
        Self::Finance,
        Self::Technology,
        Self::Operations,
        Self::Sales,
        Self::Marketing,
        Self::Hr,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Engineering => "engineering",
            Self::Manufacturing => "manufacturing",
            Self::Healthcare => "healthcare",
            Self::Finance => "finance",
            Self::Technology => "technology",
            Self::Operations => "operations",
            Self::Sales => "sales",
            Self::Marketing => "marketing",
            Self::Hr => "hr",
            Self::Other => "other",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hr => "Human Resources",
            Self::Engineering => "Engineering",
            Self::Manufacturing => "Manufacturing",
            Self::Healthcare => "Healthcare",
            Self::Finance => "Finance",
            Self::Technology => "Technology",
            Self::Operations => "Operations",
            Self::Sales => "Sales",
            Self::Marketing => "Marketing",
            Self::Other => "Other",
        }
    }
}

impl Display for ExpertiseArea {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpertiseArea {
    type Err = ChatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|area| area.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ChatError::invalid_request(format!("unknown expertise area '{value}'")))
    }
}

/// Sent to the interviewer as `sessionContext`. Unset fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise_area: Option<ExpertiseArea>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank topics are treated as unset.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        self.topic = (!topic.trim().is_empty()).then_some(topic);
        self
    }

    pub fn with_expertise_area(mut self, area: ExpertiseArea) -> Self {
        self.expertise_area = Some(area);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyInsight {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
}

/// Structured result of a `summarize` turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_insights: Vec<KeyInsight>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub suggested_topics: Vec<String>,
}

impl InterviewSummary {
    /// Parses a model reply that holds the summary object, optionally inside a Markdown code
    /// fence or surrounded by prose.
    pub fn from_reply(reply: &str) -> Result<Self, ChatError> {
        let body = strip_code_fence(reply);
        if body.is_empty() {
            return Err(ChatError::summary("summary reply was empty"));
        }

        match serde_json::from_str(body) {
            Ok(summary) => Ok(summary),
            Err(first) => match (body.find('{'), body.rfind('}')) {
                (Some(start), Some(end)) if start < end => {
                    serde_json::from_str(&body[start..=end])
                        .map_err(|error| ChatError::summary(error.to_string()))
                }
                _ => Err(ChatError::summary(first.to_string())),
            },
        }
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeType {
    #[default]
    Explicit,
    Tacit,
}

/// Knowledge item assembled from a finished interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub title: String,
    pub content: String,
    pub category: String,
    pub knowledge_type: KnowledgeType,
    pub tags: Vec<String>,
}

impl KnowledgeDraft {
    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id.as_deref().map(SessionId::from)
    }
}
