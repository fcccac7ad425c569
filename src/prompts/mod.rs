//! Operation allow-list and the prompt template behind each operation.

mod operation;

pub use operation::{Operation, UnknownOperation};

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::path::Path;

/// Substitution slot replaced by the user's text.
pub const TEXT_SLOT: &str = "{text}";

const GRAMMAR_CHECKER: &str = "Correct grammar, spelling, and clarity. Text: {text}";
const PLAGIARISM_CHECK: &str = "Check if the following text appears plagiarized, and return a similarity estimate and suggestions. Text: {text}";
const CONTEXTUAL_REPLACEMENT: &str = "Perform contextual replacement only. Example: Replace “Gemini 2.5 Pro” with “Claude Sonnet”, not Claude 2.5 Pro. Text: {text}";
const SMART_LINK_UPDATES: &str = "Update links in text. Example: \"Google\" linking to https://google.com → \"Bing\" linking to https://bing.com. Text: {text}";
const NAMED_ENTITY_REPLACEMENT: &str =
    "Replace company names, people, and emails with new provided ones. Text: {text}";
const DEEP_CONTENT_MANAGEMENT: &str = "Scan and edit Rich Text, tables, nested components, links, metadata, and custom fields. Text: {text}";
const AI_CHATBOT: &str = "Answer conversationally, but stay within writing/editing/content management context. Text: {text}";

fn default_template(op: Operation) -> &'static str {
    match op {
        Operation::GrammarChecker => GRAMMAR_CHECKER,
        Operation::PlagiarismCheck => PLAGIARISM_CHECK,
        Operation::ContextualReplacement => CONTEXTUAL_REPLACEMENT,
        Operation::SmartLinkUpdates => SMART_LINK_UPDATES,
        Operation::NamedEntityReplacement => NAMED_ENTITY_REPLACEMENT,
        Operation::DeepContentManagement => DEEP_CONTENT_MANAGEMENT,
        Operation::AiChatbot => AI_CHATBOT,
    }
}

/// Maps every operation to its template. Always complete: starts from the
/// built-in templates and only ever replaces entries.
#[derive(Debug, Clone)]
pub struct PromptTable {
    templates: HashMap<Operation, String>,
}

impl Default for PromptTable {
    fn default() -> Self {
        let templates = Operation::ALL
            .into_iter()
            .map(|op| (op, default_template(op).to_string()))
            .collect();
        Self { templates }
    }
}

impl PromptTable {
    /// Replace the template for one operation.
    pub fn with_template(mut self, op: Operation, template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(TEXT_SLOT) {
            bail!("template for {op} has no {TEXT_SLOT} slot");
        }
        self.templates.insert(op, template);
        Ok(self)
    }

    /// Apply overrides from a JSON object of `{"<operation label>": "<template>"}`.
    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Result<Self> {
        for (label, template) in overrides {
            let op: Operation = label.parse()?;
            self = self.with_template(op, template)?;
        }
        Ok(self)
    }

    /// Load the built-in table with overrides read from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt overrides from {}", path.display()))?;
        let overrides: HashMap<String, String> =
            serde_json::from_str(&raw).context("prompt overrides must be a JSON object of strings")?;
        Self::default().with_overrides(overrides)
    }

    pub fn template(&self, op: Operation) -> &str {
        self.templates
            .get(&op)
            .map(String::as_str)
            .unwrap_or_else(|| default_template(op))
    }

    /// Interpolate the user text into the operation's template.
    pub fn compose(&self, op: Operation, text: &str) -> String {
        self.template(op).replace(TEXT_SLOT, text)
    }
}
