use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub identifier: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowState {
    pub id: String,
    pub name: String,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub description_html: Option<String>,
    pub priority: Option<Priority>,
    pub state: Option<String>,
    pub parent: Option<String>,
}

/// Issue creation payload. `state` and `parent` are omitted from the JSON
/// body entirely when unset; the backend applies its own defaults.
#[derive(Debug, Clone, Serialize)]
pub struct NewIssue {
    pub name: String,
    pub description_html: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Issue priority with the backend's canonical lowercase wire form.
///
/// Input casing varies across clients ("High", "URGENT"), so parsing is
/// case-insensitive and the value always serializes lowercase. The empty
/// string parses as `None`, which is also the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
    #[default]
    None,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::None => "none",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid priority '{0}' (expected urgent, high, medium, low or none)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            "none" | "" => Ok(Priority::None),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(DeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parses_any_casing() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("URGENT".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!("  medium ".parse::<Priority>().unwrap(), Priority::Medium);
    }

    #[test]
    fn test_priority_empty_string_is_none() {
        assert_eq!("".parse::<Priority>().unwrap(), Priority::None);
        assert_eq!(Priority::default(), Priority::None);
    }

    #[test]
    fn test_priority_rejects_unknown_values() {
        let err = "blocker".parse::<Priority>().unwrap_err();
        assert_eq!(err, ParsePriorityError("blocker".to_string()));
        assert!(err.to_string().contains("urgent, high, medium, low or none"));
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Priority::None).unwrap(), "\"none\"");
    }

    #[test]
    fn test_priority_deserializes_mixed_case() {
        let priority: Priority = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(priority, Priority::Low);
    }

    #[test]
    fn test_new_issue_omits_unset_state_and_parent() {
        let issue = NewIssue {
            name: "X".to_string(),
            description_html: String::new(),
            priority: Priority::High,
            state: None,
            parent: None,
        };
        assert_eq!(
            serde_json::to_string(&issue).unwrap(),
            r#"{"name":"X","description_html":"","priority":"high"}"#
        );
    }

    #[test]
    fn test_new_issue_includes_state_and_parent_when_set() {
        let issue = NewIssue {
            name: "Child".to_string(),
            description_html: "<p>body</p>".to_string(),
            priority: Priority::None,
            state: Some("s1".to_string()),
            parent: Some("i1".to_string()),
        };
        let value: serde_json::Value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["state"], "s1");
        assert_eq!(value["parent"], "i1");
        assert_eq!(value["priority"], "none");
    }

    #[test]
    fn test_issue_tolerates_missing_optional_fields() {
        let issue: Issue = serde_json::from_str(r#"{"id": "i1", "name": "Task"}"#).unwrap();
        assert_eq!(issue.id, "i1");
        assert!(issue.priority.is_none());
        assert!(issue.parent.is_none());
    }

    #[test]
    fn test_project_tolerates_missing_identifier_and_slug() {
        let project: Project = serde_json::from_str(r#"{"id": "p1", "name": "Eng"}"#).unwrap();
        assert_eq!(project.id, "p1");
        assert!(project.identifier.is_none());
        assert!(project.slug.is_none());
    }
}
