use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the fixed text-transformation modes offered in the editor.
///
/// Labels are matched exactly, including case and spacing, because they are
/// sent verbatim by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "Grammar Checker")]
    GrammarChecker,
    #[serde(rename = "Plagiarism Check")]
    PlagiarismCheck,
    #[serde(rename = "Contextual Replacement")]
    ContextualReplacement,
    #[serde(rename = "Smart Link Updates")]
    SmartLinkUpdates,
    #[serde(rename = "Named Entity Replacement")]
    NamedEntityReplacement,
    #[serde(rename = "Deep Content Management")]
    DeepContentManagement,
    #[serde(rename = "AI Chatbot")]
    AiChatbot,
}

impl Operation {
    /// The allow-list, in the order the editor presents it.
    pub const ALL: [Operation; 7] = [
        Operation::GrammarChecker,
        Operation::PlagiarismCheck,
        Operation::ContextualReplacement,
        Operation::SmartLinkUpdates,
        Operation::NamedEntityReplacement,
        Operation::DeepContentManagement,
        Operation::AiChatbot,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Operation::GrammarChecker => "Grammar Checker",
            Operation::PlagiarismCheck => "Plagiarism Check",
            Operation::ContextualReplacement => "Contextual Replacement",
            Operation::SmartLinkUpdates => "Smart Link Updates",
            Operation::NamedEntityReplacement => "Named Entity Replacement",
            Operation::DeepContentManagement => "Deep Content Management",
            Operation::AiChatbot => "AI Chatbot",
        }
    }

    /// Exact-match lookup of a label against the allow-list.
    pub fn from_label(label: &str) -> Option<Operation> {
        Self::ALL.into_iter().find(|op| op.label() == label)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for labels outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_has_seven_distinct_labels() {
        let mut labels: Vec<&str> = Operation::ALL.iter().map(|op| op.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 7);
    }

    #[test]
    fn from_label_round_trips_every_operation() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_label(op.label()), Some(op));
        }
    }

    #[test]
    fn from_label_is_exact() {
        assert_eq!(Operation::from_label("grammar checker"), None);
        assert_eq!(Operation::from_label(" Grammar Checker"), None);
        assert_eq!(Operation::from_label("Grammar Checker "), None);
        // The editor sidebar uses these names, but they are not operations.
        assert_eq!(Operation::from_label("Plagiarism Checker"), None);
        assert_eq!(Operation::from_label("AI Chat"), None);
    }

    #[test]
    fn from_str_reports_unknown_label() {
        let err = "Summarize".parse::<Operation>().unwrap_err();
        assert_eq!(err, UnknownOperation("Summarize".to_string()));
        assert_eq!(err.to_string(), "unknown operation: Summarize");
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&Operation::AiChatbot).unwrap();
        assert_eq!(json, "\"AI Chatbot\"");
        let op: Operation = serde_json::from_str("\"Smart Link Updates\"").unwrap();
        assert_eq!(op, Operation::SmartLinkUpdates);
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(Operation::NamedEntityReplacement.to_string(), "Named Entity Replacement");
    }
}
