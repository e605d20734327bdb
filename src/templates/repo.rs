use async_trait::async_trait;
use sqlx::{postgres::PgArguments, query::QueryAs, PgPool, Postgres};
use uuid::Uuid;

use crate::db::StoreError;
use crate::templates::repo_types::{NewTemplate, OwnerScope, Template, TemplateChanges};

const TEMPLATE_COLUMNS: &str = "id, name, style, color, created_by, created_at, updated_at";

/// Template store. Every single-template operation goes through `OwnerScope`.
#[async_trait]
pub trait TemplateRepo: Send + Sync {
    async fn create(&self, new_template: NewTemplate) -> Result<Template, StoreError>;
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Template>, StoreError>;
    async fn find(&self, scope: OwnerScope) -> Result<Option<Template>, StoreError>;
    async fn update(
        &self,
        scope: OwnerScope,
        changes: &TemplateChanges,
    ) -> Result<Option<Template>, StoreError>;
    /// Returns whether a matching template was removed.
    async fn delete(&self, scope: OwnerScope) -> Result<bool, StoreError>;
    async fn count(&self) -> Result<i64, StoreError>;
}

#[derive(Clone)]
pub struct PgTemplateRepo {
    db: PgPool,
}

impl PgTemplateRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

// Binds `$1`/`$2` of `OwnerScope::SQL`.
fn scoped<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    scope: OwnerScope,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query.bind(scope.id).bind(scope.owner)
}

#[async_trait]
impl TemplateRepo for PgTemplateRepo {
    async fn create(&self, t: NewTemplate) -> Result<Template, StoreError> {
        let template = sqlx::query_as::<_, Template>(&format!(
            r#"
            INSERT INTO templates (id, name, style, color, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&t.name)
        .bind(t.style)
        .bind(&t.color)
        .bind(t.created_by)
        .fetch_one(&self.db)
        .await?;
        Ok(template)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Template>, StoreError> {
        let rows = sqlx::query_as::<_, Template>(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM templates
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, scope: OwnerScope) -> Result<Option<Template>, StoreError> {
        let sql = format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE {}",
            OwnerScope::SQL
        );
        let row = scoped(sqlx::query_as::<_, Template>(&sql), scope)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        scope: OwnerScope,
        changes: &TemplateChanges,
    ) -> Result<Option<Template>, StoreError> {
        let sql = format!(
            r#"
            UPDATE templates
            SET name = COALESCE($3, name),
                style = COALESCE($4, style),
                color = COALESCE($5, color),
                updated_at = now()
            WHERE {}
            RETURNING {TEMPLATE_COLUMNS}
            "#,
            OwnerScope::SQL
        );
        let row = scoped(sqlx::query_as::<_, Template>(&sql), scope)
            .bind(changes.name.as_deref())
            .bind(changes.style)
            .bind(changes.color.as_deref())
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn delete(&self, scope: OwnerScope) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM templates WHERE {} RETURNING id", OwnerScope::SQL);
        let deleted = scoped(sqlx::query_as::<_, (Uuid,)>(&sql), scope)
            .fetch_optional(&self.db)
            .await?;
        Ok(deleted.is_some())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM templates")
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }
}
