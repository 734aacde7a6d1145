use crate::error::ResponseParseError;
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One suggested shell command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CommandEntry {
    #[serde(rename = "cmd")]
    pub command: String,
    pub comment: String,
}

impl CommandEntry {
    pub fn new(command: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            comment: comment.into(),
        }
    }
}

/// Suggestions in the order the model returned them; that order is the
/// presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CommandSet {
    #[serde(rename = "cmds")]
    pub entries: Vec<CommandEntry>,
}

impl CommandSet {
    pub fn new(entries: Vec<CommandEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CommandEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommandEntry> {
        self.entries.iter()
    }

    /// Parses the model's message content. Either the whole set parses or
    /// nothing is returned. Blank commands are rejected since selecting one
    /// would inject nothing.
    pub fn from_json(content: &str) -> Result<Self, ResponseParseError> {
        let set: Self = serde_json::from_str(content)?;
        if let Some(index) = set
            .entries
            .iter()
            .position(|entry| entry.command.trim().is_empty())
        {
            return Err(ResponseParseError::EmptyCommand { index });
        }
        Ok(set)
    }

    /// JSON schema sent as the structured response format. Subschemas are
    /// inlined because strict mode rejects unresolved references.
    pub fn response_schema() -> Value {
        let generator = SchemaSettings::draft07()
            .with(|settings| {
                settings.inline_subschemas = true;
                settings.meta_schema = None;
            })
            .into_generator();
        let schema = generator.into_root_schema_for::<Self>();
        serde_json::to_value(schema).unwrap_or_else(|_| Value::Object(Default::default()))
    }
}

/// A parsed suggestion set together with what it cost to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResult {
    pub commands: CommandSet,
    pub cost: f64,
}
