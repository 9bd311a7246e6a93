use anyhow::Result;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{models::*, MetadataStore};

const PDF_FILE_COLUMNS: &str =
    "id, filename, original_name, name, year, type, file_size, file_url, created_at";

#[derive(Debug, Clone)]
pub struct PdfFileRepository {
    pool: SqlitePool,
}

impl PdfFileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: NewPdfFile) -> Result<PdfFile> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO pdf_files (id, filename, original_name, name, year, type, file_size, file_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&req.filename)
        .bind(&req.original_name)
        .bind(&req.name)
        .bind(req.year)
        .bind(&req.doc_type)
        .bind(req.file_size)
        .bind(&req.file_url)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(PdfFile {
            id: RecordId::Text(id),
            filename: req.filename,
            original_name: req.original_name,
            name: req.name,
            year: req.year,
            doc_type: req.doc_type,
            file_size: req.file_size,
            file_url: req.file_url,
            created_at: Some(now),
        })
    }

    pub async fn list(&self, filter: &PdfFileFilter) -> Result<Vec<PdfFile>> {
        let limit = filter.limit.unwrap_or(100).clamp(1, 1000);

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM pdf_files WHERE 1 = 1", PDF_FILE_COLUMNS));
        if let Some(year) = filter.year {
            query.push(" AND year = ").push_bind(year);
        }
        if let Some(doc_type) = &filter.doc_type {
            query.push(" AND type = ").push_bind(doc_type.clone());
        }
        query
            .push(" ORDER BY rowid DESC LIMIT ")
            .push_bind(limit);

        let rows = query.build().fetch_all(&self.pool).await?;

        rows.iter().map(row_to_pdf_file).collect()
    }
}

fn row_to_pdf_file(row: &SqliteRow) -> Result<PdfFile> {
    Ok(PdfFile {
        id: RecordId::Text(row.get("id")),
        filename: row.get("filename"),
        original_name: row.get("original_name"),
        name: row.get("name"),
        year: row.get("year"),
        doc_type: row.get("type"),
        file_size: row.get("file_size"),
        file_url: row.get("file_url"),
        created_at: Some(
            chrono::DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))?
                .with_timezone(&Utc),
        ),
    })
}

impl MetadataStore for PdfFileRepository {
    async fn insert(&self, record: NewPdfFile) -> Result<PdfFile> {
        self.create(record).await
    }

    async fn list(&self, filter: &PdfFileFilter) -> Result<Vec<PdfFile>> {
        PdfFileRepository::list(self, filter).await
    }
}
