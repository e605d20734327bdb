use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "template_style", rename_all = "lowercase")]
pub enum TemplateStyle {
    Modern,
    Classic,
    Minimalist,
    Vibrant,
    Professional,
}

impl FromStr for TemplateStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modern" => Ok(TemplateStyle::Modern),
            "classic" => Ok(TemplateStyle::Classic),
            "minimalist" => Ok(TemplateStyle::Minimalist),
            "vibrant" => Ok(TemplateStyle::Vibrant),
            "professional" => Ok(TemplateStyle::Professional),
            _ => Err(()),
        }
    }
}

/// Website template, owned by exactly one user.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub style: TemplateStyle,
    pub color: String,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub style: TemplateStyle,
    pub color: String,
    pub created_by: Uuid,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateChanges {
    pub name: Option<String>,
    pub style: Option<TemplateStyle>,
    pub color: Option<String>,
}

impl TemplateChanges {
    #[cfg(test)]
    pub fn apply(&self, t: &mut Template) {
        if let Some(name) = &self.name {
            t.name = name.clone();
        }
        if let Some(style) = self.style {
            t.style = style;
        }
        if let Some(color) = &self.color {
            t.color = color.clone();
        }
    }
}

/// Joint (id, owner) key used by every owned-template read, update and
/// delete. A template owned by someone else is simply not matched, so callers
/// can only ever observe "not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    pub id: Uuid,
    pub owner: Uuid,
}

impl OwnerScope {
    /// SQL predicate; `$1` binds `id`, `$2` binds `owner`.
    pub const SQL: &'static str = "id = $1 AND created_by = $2";

    pub fn new(id: Uuid, owner: Uuid) -> Self {
        Self { id, owner }
    }

    #[cfg(test)]
    pub fn admits(&self, t: &Template) -> bool {
        t.id == self.id && t.created_by == self.owner
    }
}
