use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult, FieldError},
    templates::{
        dto::TemplateFields,
        repo_types::{TemplateChanges, TemplateStyle},
    },
};

pub(crate) fn is_hex_color(color: &str) -> bool {
    lazy_static! {
        static ref HEX_RE: Regex = Regex::new(r"^#([0-9A-Fa-f]{3}){1,2}$").unwrap();
    }
    HEX_RE.is_match(color)
}

/// HTML-escapes user supplied text before it is stored.
pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn parse_template_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid Template ID"))
}

fn check_name(name: &str, empty_msg: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new("name", empty_msg));
        return None;
    }
    Some(escape_html(trimmed))
}

fn check_style(style: &str, errors: &mut Vec<FieldError>) -> Option<TemplateStyle> {
    match style.parse() {
        Ok(s) => Some(s),
        Err(()) => {
            errors.push(FieldError::new("style", "Invalid template style"));
            None
        }
    }
}

fn check_color(color: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    if is_hex_color(color) {
        Some(color.to_string())
    } else {
        errors.push(FieldError::new(
            "color",
            "Please provide a valid HEX color code",
        ));
        None
    }
}

/// Validated fields for a new template.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidTemplate {
    pub name: String,
    pub style: TemplateStyle,
    pub color: String,
}

pub fn validate_new_template(fields: &TemplateFields) -> AppResult<ValidTemplate> {
    let mut errors = Vec::new();

    let name = match fields.name.as_deref() {
        Some(n) => check_name(n, "Template name is required", &mut errors),
        None => {
            errors.push(FieldError::new("name", "Template name is required"));
            None
        }
    };
    let style = match fields.style.as_deref() {
        Some(s) if !s.is_empty() => check_style(s, &mut errors),
        _ => {
            errors.push(FieldError::new("style", "Template style is required"));
            None
        }
    };
    let color = match fields.color.as_deref() {
        Some(c) if !c.is_empty() => check_color(c, &mut errors),
        _ => {
            errors.push(FieldError::new("color", "Template color is required"));
            None
        }
    };

    AppError::check(errors)?;
    match (name, style, color) {
        (Some(name), Some(style), Some(color)) => Ok(ValidTemplate { name, style, color }),
        _ => Err(anyhow::anyhow!("template validation lost a field").into()),
    }
}

/// Only the supplied fields are validated and carried into the update.
pub fn validate_changes(fields: &TemplateFields) -> AppResult<TemplateChanges> {
    let mut errors = Vec::new();
    let changes = TemplateChanges {
        name: fields
            .name
            .as_deref()
            .and_then(|n| check_name(n, "Template name cannot be empty", &mut errors)),
        style: fields
            .style
            .as_deref()
            .and_then(|s| check_style(s, &mut errors)),
        color: fields
            .color
            .as_deref()
            .and_then(|c| check_color(c, &mut errors)),
    };
    AppError::check(errors)?;
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: Option<&str>, style: Option<&str>, color: Option<&str>) -> TemplateFields {
        TemplateFields {
            name: name.map(Into::into),
            style: style.map(Into::into),
            color: color.map(Into::into),
        }
    }

    fn error_fields(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errors) => errors.into_iter().map(|e| e.field.into_owned()).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn hex_colors() {
        for ok in ["#FFF", "#fff", "#123456", "#AbCdEf"] {
            assert!(is_hex_color(ok), "{ok}");
        }
        for bad in ["blue", "FFF", "#FFFF", "#12345G", "#1234567", ""] {
            assert!(!is_hex_color(bad), "{bad}");
        }
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<b>Tom & \"Jerry\"</b>"),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;&#x2F;b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn new_template_is_trimmed_and_escaped() {
        let valid =
            validate_new_template(&fields(Some("  Shop <1> "), Some("vibrant"), Some("#0A0")))
                .unwrap();
        assert_eq!(
            valid,
            ValidTemplate {
                name: "Shop &lt;1&gt;".into(),
                style: TemplateStyle::Vibrant,
                color: "#0A0".into(),
            }
        );
    }

    #[test]
    fn new_template_rejects_unknown_style_and_named_color() {
        let err = validate_new_template(&fields(Some("Blog"), Some("funky"), Some("blue")))
            .unwrap_err();
        assert_eq!(error_fields(err), vec!["style", "color"]);
    }

    #[test]
    fn new_template_requires_every_field() {
        let err = validate_new_template(&fields(Some("   "), None, None)).unwrap_err();
        assert_eq!(error_fields(err), vec!["name", "style", "color"]);
    }

    #[test]
    fn changes_carry_only_supplied_fields() {
        let changes = validate_changes(&fields(None, None, Some("#FFF"))).unwrap();
        assert_eq!(
            changes,
            TemplateChanges {
                name: None,
                style: None,
                color: Some("#FFF".into()),
            }
        );
    }

    #[test]
    fn changes_reject_blank_name() {
        let err = validate_changes(&fields(Some(" "), None, None)).unwrap_err();
        assert_eq!(error_fields(err), vec!["name"]);
    }

    #[test]
    fn template_id_must_be_uuid() {
        assert!(parse_template_id("not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_template_id(&id.to_string()).unwrap(), id);
    }
}
