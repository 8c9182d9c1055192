//! Prompt templates and request payload construction

use crate::error::PipelineError;
use cleanser_domain::ContactRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Placeholder replaced by the serialized chunk
pub const CONTACTS_PLACEHOLDER: &str = "{contacts}";

/// User turn used when a template only supplies `system`
pub const DEFAULT_HUMAN_TEMPLATE: &str = "Please analyze these contacts: {contacts}";

/// Instruction template loaded once per run
///
/// Literal braces may be written doubled (`{{` / `}}`), as in chat-prompt
/// template files; they are collapsed when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// System instruction
    pub system: String,

    /// User turn carrying the placeholder
    #[serde(default = "default_human")]
    pub human: String,
}

fn default_human() -> String {
    DEFAULT_HUMAN_TEMPLATE.to_string()
}

impl PromptTemplate {
    /// Create a template, checking the placeholder is present
    pub fn new(system: impl Into<String>, human: impl Into<String>) -> Result<Self, PipelineError> {
        let template = Self {
            system: system.into(),
            human: human.into(),
        };
        template.validate()?;
        Ok(template)
    }

    /// Parse a YAML template document
    pub fn from_yaml(yaml: &str) -> Result<Self, PipelineError> {
        let template: Self = serde_yaml::from_str(yaml)
            .map_err(|e| PipelineError::Template(format!("Failed to parse YAML: {}", e)))?;
        template.validate()?;
        Ok(template)
    }

    /// Parse a TOML template document
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        let template: Self = toml::from_str(toml_str)
            .map_err(|e| PipelineError::Template(format!("Failed to parse TOML: {}", e)))?;
        template.validate()?;
        Ok(template)
    }

    /// Load a template file; `.toml` files are read as TOML, anything else as YAML
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        info!("Loading prompt template: {}", path.display());

        let contents = fs::read_to_string(path).map_err(|e| {
            PipelineError::Template(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Serialize the template to a TOML document
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Template(format!("Failed to serialize to TOML: {}", e)))
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.system.trim().is_empty() {
            return Err(PipelineError::Template(
                "template 'system' field is empty".to_string(),
            ));
        }
        if !self.system.contains(CONTACTS_PLACEHOLDER)
            && !self.human.contains(CONTACTS_PLACEHOLDER)
        {
            return Err(PipelineError::Config(format!(
                "prompt template has no {} placeholder",
                CONTACTS_PLACEHOLDER
            )));
        }
        Ok(())
    }

    /// Render the full payload with `contacts` substituted for the placeholder
    pub fn render(&self, contacts: &str) -> String {
        format!(
            "{}\n\n{}",
            substitute(&self.system, contacts),
            substitute(&self.human, contacts)
        )
    }
}

fn substitute(text: &str, contacts: &str) -> String {
    text.split(CONTACTS_PLACEHOLDER)
        .map(|piece| piece.replace("{{", "{").replace("}}", "}"))
        .collect::<Vec<_>>()
        .join(contacts)
}

#[derive(Serialize)]
struct PromptContact<'a> {
    name: &'a str,
    organization: &'a str,
    email: &'a str,
}

/// Builds the model request payload for one chunk
pub struct PromptBuilder<'t> {
    template: &'t PromptTemplate,
}

impl<'t> PromptBuilder<'t> {
    /// Create a new prompt builder
    pub fn new(template: &'t PromptTemplate) -> Self {
        Self { template }
    }

    /// Compact JSON array with one object per record, limited to name/organization/email
    pub fn serialize_records(records: &[ContactRecord]) -> String {
        let contacts: Vec<PromptContact<'_>> = records
            .iter()
            .map(|r| PromptContact {
                name: &r.name,
                organization: &r.organization,
                email: &r.email,
            })
            .collect();
        serde_json::to_string(&contacts).unwrap_or_else(|_| "[]".to_string())
    }

    /// Build the complete request payload
    pub fn build(&self, records: &[ContactRecord]) -> String {
        self.template.render(&Self::serialize_records(records))
    }
}

/// Template written by `cleanser init` when none exists
pub const DEFAULT_TEMPLATE_YAML: &str = r#"system: |
  You are a contact database auditor. Review each contact below and decide
  whether it is a genuine person or a test/dummy entry.

  Signs of a test entry include obviously fake names, placeholder
  organizations, and email patterns such as test@, demo@, example.com or
  keyboard mashing.

  Respond with a JSON array only. Include one object per contact with exactly
  these fields:
  - "email": the contact's email, copied verbatim
  - "is_real": true if the contact looks genuine, false otherwise
  - "confidence_score": a number between 0.0 and 1.0
  - "reason": a short explanation

  Example:
  [
    {{"email": "test@example.com", "is_real": false, "confidence_score": 0.95, "reason": "Test pattern in email"}},
    {{"email": "jane.doe@acme.com", "is_real": true, "confidence_score": 0.9, "reason": ""}}
  ]
human: "Please analyze these contacts: {contacts}"
"#;
