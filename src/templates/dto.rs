use serde::{Deserialize, Serialize};

use crate::templates::repo_types::Template;

/// Body of POST /templates and PUT /templates/:id. Every field is optional on
/// the wire so that missing and malformed values both surface as field errors.
#[derive(Debug, Default, Deserialize)]
pub struct TemplateFields {
    pub name: Option<String>,
    pub style: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub message: &'static str,
    pub template: Template,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub message: &'static str,
    pub templates: Vec<Template>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub website_type: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestions: String,
}
