//! File repository: the trait and its PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use mediavault_core::error::{AppError, ErrorKind};
use mediavault_core::result::AppResult;
use mediavault_entity::file::{CreateFile, File};

const FOLDER_FKEY: &str = "files_folder_id_fkey";

/// Persistence for uploaded file records.
#[async_trait]
pub trait FileRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<File>>;

    /// Create a file record. The referenced folder must exist.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;
}

/// PostgreSQL-backed file repository.
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let related = data.related.as_ref();
        let file = sqlx::query_as::<_, File>(
            "INSERT INTO files (name, storage_ref, mime_type, size_bytes, folder_id, folder_path, \
             related_id, related_type, related_field) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.storage_ref)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .bind(data.folder_id)
        .bind(&data.folder_path)
        .bind(related.map(|r| r.ref_id.as_str()))
        .bind(related.map(|r| r.ref_type.as_str()))
        .bind(related.map(|r| r.field.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(FOLDER_FKEY) => {
                AppError::not_found(format!("Folder {} not found", data.folder_id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })?;

        info!(
            file_id = file.id,
            folder_id = data.folder_id,
            name = %file.name,
            "File record created"
        );
        Ok(file)
    }
}
