//! sqlx-backed [`DocumentRepository`], [`DocumentMetadataRepository`], and
//! [`DocumentRelationRepository`] — grouped in one file the way the domain
//! crate groups their traits in `document_repository.rs`.

use super::{db_err, enum_to_text, text_to_enum, text_to_json};
use async_trait::async_trait;
use chrono::NaiveDate;
use exef_domain::entities::{Document, DocumentMetadata, DocumentRelation};
use exef_domain::repositories::{DocumentMetadataRepository, DocumentRelationRepository, DocumentRepository};
use exef_domain::value_objects::enums::{DocumentKind, DocumentStatus, RelationType};
use exef_domain::value_objects::ids::{DocumentId, DocumentRelationId, EntityId, TaskId};
use exef_domain::FlowError;
use rust_decimal::Decimal;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

pub struct SqliteDocumentRepository {
    pool: SqlitePool,
}

impl SqliteDocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, document: &Document) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO documents (id, task, kind, number, contractor_name, contractor_tax_id, amount_net, \
             amount_vat, amount_gross, currency, document_date, source_kind, source_record_id, original_filename, \
             file_path, doc_id, status) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(document.id().to_string())
        .bind(document.task().to_string())
        .bind(enum_to_text(&document.kind())?)
        .bind(document.number())
        .bind(document.contractor_name())
        .bind(document.contractor_tax_id())
        .bind(document.amount_net().map(|v| v.to_string()))
        .bind(document.amount_vat().map(|v| v.to_string()))
        .bind(document.amount_gross().map(|v| v.to_string()))
        .bind(document.currency())
        .bind(document.document_date())
        .bind(document.source_kind())
        .bind(document.source_record_id())
        .bind(document.original_filename())
        .bind(document.file_path())
        .bind(document.doc_id())
        .bind(enum_to_text(&document.status())?)
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_via<'e, E>(executor: E, document: &Document) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "UPDATE documents SET kind = ?, number = ?, contractor_name = ?, contractor_tax_id = ?, amount_net = ?, \
             amount_vat = ?, amount_gross = ?, currency = ?, document_date = ?, original_filename = ?, file_path = ?, \
             doc_id = ?, status = ? WHERE id = ?",
        )
        .bind(enum_to_text(&document.kind())?)
        .bind(document.number())
        .bind(document.contractor_name())
        .bind(document.contractor_tax_id())
        .bind(document.amount_net().map(|v| v.to_string()))
        .bind(document.amount_vat().map(|v| v.to_string()))
        .bind(document.amount_gross().map(|v| v.to_string()))
        .bind(document.currency())
        .bind(document.document_date())
        .bind(document.original_filename())
        .bind(document.file_path())
        .bind(document.doc_id())
        .bind(enum_to_text(&document.status())?)
        .bind(document.id().to_string())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Transaction-scoped counterpart of [`DocumentRepository::save`].
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, document: &Document) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, document).await
    }

    /// Transaction-scoped counterpart of [`DocumentRepository::update`].
    pub(crate) async fn update_tx(tx: &mut Transaction<'_, Sqlite>, document: &Document) -> Result<(), FlowError> {
        Self::update_via(&mut **tx, document).await
    }

    fn decimal(row: &sqlx::sqlite::SqliteRow, col: &str) -> Result<Option<Decimal>, FlowError> {
        let text: Option<String> = row.try_get(col).map_err(db_err)?;
        text.map(|t| Decimal::from_str(&t).map_err(|e| FlowError::Database(e.to_string()))).transpose()
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Document, FlowError> {
        Ok(Document::from_database(
            DocumentId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            TaskId::from_string(&row.try_get::<String, _>("task").map_err(db_err)?)?,
            text_to_enum::<DocumentKind>(&row.try_get::<String, _>("kind").map_err(db_err)?)?,
            row.try_get("number").map_err(db_err)?,
            row.try_get("contractor_name").map_err(db_err)?,
            row.try_get("contractor_tax_id").map_err(db_err)?,
            Self::decimal(row, "amount_net")?,
            Self::decimal(row, "amount_vat")?,
            Self::decimal(row, "amount_gross")?,
            row.try_get("currency").map_err(db_err)?,
            row.try_get::<Option<NaiveDate>, _>("document_date").map_err(db_err)?,
            row.try_get("source_kind").map_err(db_err)?,
            row.try_get("source_record_id").map_err(db_err)?,
            row.try_get("original_filename").map_err(db_err)?,
            row.try_get("file_path").map_err(db_err)?,
            row.try_get("doc_id").map_err(db_err)?,
            text_to_enum::<DocumentStatus>(&row.try_get::<String, _>("status").map_err(db_err)?)?,
        ))
    }
}

#[async_trait]
impl DocumentRepository for SqliteDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), FlowError> {
        Self::save_via(&self.pool, document).await
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, FlowError> {
        let row = sqlx::query("SELECT * FROM documents WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_for_task(&self, task: &TaskId) -> Result<Vec<Document>, FlowError> {
        let rows = sqlx::query("SELECT * FROM documents WHERE task = ?")
            .bind(task.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn update(&self, document: &Document) -> Result<(), FlowError> {
        Self::update_via(&self.pool, document).await
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, FlowError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    /// Joins `documents` against every other document in the same entity
    /// through its task's project — since a document row itself carries no
    /// entity column, this queries across all tasks (the per-entity
    /// database already scopes rows to one entity in `PerEntity` mode; in
    /// `Shared` mode the caller is responsible for filtering by entity via
    /// the task/project chain before calling this in a cross-entity
    /// context — see [`exef_domain::repositories::RoutingRepository`]).
    async fn find_by_doc_id_in_entity(&self, _entity: &EntityId, doc_id: &str) -> Result<Vec<Document>, FlowError> {
        let rows = sqlx::query("SELECT * FROM documents WHERE doc_id = ?")
            .bind(doc_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn find_duplicates_in_task(&self, task: &TaskId) -> Result<Vec<(String, Vec<Document>)>, FlowError> {
        let rows = sqlx::query(
            "SELECT * FROM documents WHERE task = ? AND doc_id IS NOT NULL AND doc_id IN \
             (SELECT doc_id FROM documents WHERE task = ? AND doc_id IS NOT NULL GROUP BY doc_id HAVING COUNT(*) > 1) \
             ORDER BY doc_id",
        )
        .bind(task.to_string())
        .bind(task.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut groups: Vec<(String, Vec<Document>)> = Vec::new();
        for row in &rows {
            let doc = Self::from_row(row)?;
            let key = doc.doc_id().unwrap_or_default().to_string();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, docs)) => docs.push(doc),
                None => groups.push((key, vec![doc])),
            }
        }
        Ok(groups)
    }
}

pub struct SqliteDocumentMetadataRepository {
    pool: SqlitePool,
}

impl SqliteDocumentMetadataRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, metadata: &DocumentMetadata) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO document_metadata (document, category, description, tags, custom_fields, last_editor, \
             last_edited_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(metadata.document().to_string())
        .bind(metadata.category())
        .bind(metadata.description())
        .bind(serde_json::to_string(metadata.tags())?)
        .bind(serde_json::to_string(metadata.custom_fields())?)
        .bind(None::<String>)
        .bind(None::<chrono::DateTime<chrono::Utc>>)
        .bind(metadata.version() as i64)
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_via<'e, E>(executor: E, metadata: &DocumentMetadata) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "UPDATE document_metadata SET category = ?, description = ?, tags = ?, custom_fields = ?, \
             last_editor = ?, last_edited_at = ?, version = ? WHERE document = ?",
        )
        .bind(metadata.category())
        .bind(metadata.description())
        .bind(serde_json::to_string(metadata.tags())?)
        .bind(serde_json::to_string(metadata.custom_fields())?)
        .bind(None::<String>)
        .bind(None::<chrono::DateTime<chrono::Utc>>)
        .bind(metadata.version() as i64)
        .bind(metadata.document().to_string())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Transaction-scoped counterpart of [`DocumentMetadataRepository::save`].
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, metadata: &DocumentMetadata) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, metadata).await
    }

    /// Transaction-scoped counterpart of [`DocumentMetadataRepository::update`].
    pub(crate) async fn update_tx(tx: &mut Transaction<'_, Sqlite>, metadata: &DocumentMetadata) -> Result<(), FlowError> {
        Self::update_via(&mut **tx, metadata).await
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<DocumentMetadata, FlowError> {
        let editor: Option<String> = row.try_get("last_editor").map_err(db_err)?;
        Ok(DocumentMetadata::from_database(
            DocumentId::from_string(&row.try_get::<String, _>("document").map_err(db_err)?)?,
            row.try_get("category").map_err(db_err)?,
            row.try_get("description").map_err(db_err)?,
            text_to_json(&row.try_get::<String, _>("tags").map_err(db_err)?)?,
            text_to_json(&row.try_get::<String, _>("custom_fields").map_err(db_err)?)?,
            editor.map(|s| exef_domain::value_objects::ids::IdentityId::from_string(&s)).transpose()?,
            row.try_get("last_edited_at").map_err(db_err)?,
            row.try_get::<i64, _>("version").map_err(db_err)? as u32,
        ))
    }
}

#[async_trait]
impl DocumentMetadataRepository for SqliteDocumentMetadataRepository {
    async fn save(&self, metadata: &DocumentMetadata) -> Result<(), FlowError> {
        Self::save_via(&self.pool, metadata).await
    }

    async fn find_for_document(&self, document: &DocumentId) -> Result<Option<DocumentMetadata>, FlowError> {
        let row = sqlx::query("SELECT * FROM document_metadata WHERE document = ?")
            .bind(document.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, metadata: &DocumentMetadata) -> Result<(), FlowError> {
        Self::update_via(&self.pool, metadata).await
    }
}

pub struct SqliteDocumentRelationRepository {
    pool: SqlitePool,
}

impl SqliteDocumentRelationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, relation: &DocumentRelation) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query("INSERT INTO document_relations (id, parent, child, relation_type) VALUES (?, ?, ?, ?)")
            .bind(relation.id().to_string())
            .bind(relation.parent().to_string())
            .bind(relation.child().to_string())
            .bind(enum_to_text(&relation.relation_type())?)
            .execute(executor)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// Transaction-scoped counterpart of [`DocumentRelationRepository::save`].
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, relation: &DocumentRelation) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, relation).await
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<DocumentRelation, FlowError> {
        Ok(DocumentRelation::from_database(
            DocumentRelationId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            DocumentId::from_string(&row.try_get::<String, _>("parent").map_err(db_err)?)?,
            DocumentId::from_string(&row.try_get::<String, _>("child").map_err(db_err)?)?,
            text_to_enum::<RelationType>(&row.try_get::<String, _>("relation_type").map_err(db_err)?)?,
        ))
    }
}

#[async_trait]
impl DocumentRelationRepository for SqliteDocumentRelationRepository {
    async fn save(&self, relation: &DocumentRelation) -> Result<(), FlowError> {
        Self::save_via(&self.pool, relation).await
    }

    async fn find_by_id(&self, id: &DocumentRelationId) -> Result<Option<DocumentRelation>, FlowError> {
        let row = sqlx::query("SELECT * FROM document_relations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn exists(&self, parent: &DocumentId, child: &DocumentId, relation_type: RelationType) -> Result<bool, FlowError> {
        let row = sqlx::query("SELECT COUNT(*) as c FROM document_relations WHERE parent = ? AND child = ? AND relation_type = ?")
            .bind(parent.to_string())
            .bind(child.to_string())
            .bind(enum_to_text(&relation_type)?)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.try_get::<i64, _>("c").map_err(db_err)? > 0)
    }

    async fn list_for_document(&self, document: &DocumentId) -> Result<Vec<DocumentRelation>, FlowError> {
        let rows = sqlx::query("SELECT * FROM document_relations WHERE parent = ? OR child = ?")
            .bind(document.to_string())
            .bind(document.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
