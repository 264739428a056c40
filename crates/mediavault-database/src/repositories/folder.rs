//! Folder repository: the trait and its PostgreSQL implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use mediavault_core::error::{AppError, ErrorKind};
use mediavault_core::result::AppResult;
use mediavault_entity::folder::{
    CreateFolder, Folder, FolderRole, ParentScope, UpdateFolder, compute_path, is_within,
};

/// Unique index over `(COALESCE(parent_id, 0), name)`.
const SCOPE_NAME_KEY: &str = "folders_scope_name_key";
/// Partial unique index over `role`.
const ROLE_KEY: &str = "folders_role_key";
const PARENT_FKEY: &str = "folders_parent_id_fkey";

/// Persistence for folder records.
///
/// Every mutation of folder state goes through this trait. Implementations
/// keep sibling names and roles unique and report a violation as
/// [`ErrorKind::Conflict`].
#[async_trait]
pub trait FolderRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by its numeric id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Folder>>;

    /// Find a folder by its uid.
    async fn find_by_uid(&self, uid: Uuid) -> AppResult<Option<Folder>>;

    /// Find the folder with exactly this name in the given sibling scope.
    async fn find_by_name_and_parent(
        &self,
        name: &str,
        parent_id: Option<i64>,
    ) -> AppResult<Option<Folder>>;

    /// Find the folder currently holding a role.
    async fn find_by_role(&self, role: FolderRole) -> AppResult<Option<Folder>>;

    /// Names in the given sibling scope that start with `prefix`.
    async fn sibling_names(&self, parent_id: Option<i64>, prefix: &str)
    -> AppResult<HashSet<String>>;

    /// List folders. `None` lists every folder; otherwise one sibling scope.
    async fn list(&self, scope: Option<ParentScope>) -> AppResult<Vec<Folder>>;

    /// Create a folder, assigning its uid and path.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Rename and/or move a folder, rewriting paths below it.
    async fn update(&self, id: i64, data: &UpdateFolder) -> AppResult<Folder>;

    /// Delete folders with all their descendants, returning how many went away.
    async fn bulk_delete(&self, ids: &[i64]) -> AppResult<u64>;
}

/// Map a sqlx error from a folder write to the matching [`AppError`].
fn map_write_error(e: sqlx::Error, name: &str, action: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(SCOPE_NAME_KEY) => {
            AppError::conflict(format!("A folder named '{name}' already exists here"))
        }
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(ROLE_KEY) => {
            AppError::conflict("Folder role is already held by another folder")
        }
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(PARENT_FKEY) => {
            AppError::not_found("Parent folder not found")
        }
        _ => AppError::with_source(ErrorKind::Database, format!("Failed to {action} folder"), e),
    }
}

fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

/// PostgreSQL-backed folder repository.
#[derive(Debug, Clone)]
pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lock_folder(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error("Failed to lock folder"))
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find folder"))
    }

    async fn find_by_uid(&self, uid: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE uid = $1")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find folder by uid"))
    }

    async fn find_by_name_and_parent(
        &self,
        name: &str,
        parent_id: Option<i64>,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE name = $1 AND parent_id IS NOT DISTINCT FROM $2",
        )
        .bind(name)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find folder by name"))
    }

    async fn find_by_role(&self, role: FolderRole) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE role = $1")
            .bind(role)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find folder by role"))
    }

    async fn sibling_names(
        &self,
        parent_id: Option<i64>,
        prefix: &str,
    ) -> AppResult<HashSet<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM folders \
             WHERE parent_id IS NOT DISTINCT FROM $1 AND starts_with(name, $2)",
        )
        .bind(parent_id)
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list sibling names"))?;

        Ok(names.into_iter().collect())
    }

    async fn list(&self, scope: Option<ParentScope>) -> AppResult<Vec<Folder>> {
        let query = match scope {
            None => sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY id ASC"),
            Some(ParentScope::Root) => sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE parent_id IS NULL ORDER BY name ASC",
            ),
            Some(ParentScope::Folder(parent_id)) => sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE parent_id = $1 ORDER BY name ASC",
            )
            .bind(parent_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list folders"))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let parent = match data.parent_id {
            Some(parent_id) => Some(
                self.find_by_id(parent_id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Folder {parent_id} not found")))?,
            ),
            None => None,
        };

        let uid = Uuid::new_v4();
        let path = compute_path(parent.as_ref(), uid);

        let folder = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (uid, name, parent_id, path, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(uid)
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(&path)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &data.name, "create"))?;

        info!(
            folder_id = folder.id,
            uid = %folder.uid,
            name = %folder.name,
            path = %folder.path,
            "Folder created"
        );
        Ok(folder)
    }

    async fn update(&self, id: i64, data: &UpdateFolder) -> AppResult<Folder> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let current = Self::lock_folder(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        let (parent_id, path) = match data.parent_id {
            Some(Some(parent_id)) => {
                let parent = Self::lock_folder(&mut tx, parent_id).await?.ok_or_else(|| {
                    AppError::not_found(format!("Folder {parent_id} not found"))
                })?;
                if is_within(&parent.path, &current.path) {
                    return Err(AppError::validation(
                        "A folder cannot be moved into itself or one of its descendants",
                    ));
                }
                (Some(parent_id), compute_path(Some(&parent), current.uid))
            }
            Some(None) => (None, compute_path(None, current.uid)),
            None => (current.parent_id, current.path.clone()),
        };
        let name = data.name.as_deref().unwrap_or(&current.name);

        let updated = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, parent_id = $3, path = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(parent_id)
        .bind(&path)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, name, "update"))?;

        if path != current.path {
            let old_prefix = current.path.as_str();
            sqlx::query(
                "UPDATE folders SET path = $2 || substr(path, length($1) + 1), updated_at = NOW() \
                 WHERE path LIKE $1 || '/%'",
            )
            .bind(old_prefix)
            .bind(&path)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to rewrite descendant paths"))?;

            sqlx::query(
                "UPDATE files SET folder_path = $2 || substr(folder_path, length($1) + 1), \
                 updated_at = NOW() \
                 WHERE folder_path = $1 OR folder_path LIKE $1 || '/%'",
            )
            .bind(old_prefix)
            .bind(&path)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to rewrite file folder paths"))?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit folder update"))?;

        info!(
            folder_id = updated.id,
            name = %updated.name,
            path = %updated.path,
            "Folder updated"
        );
        Ok(updated)
    }

    async fn bulk_delete(&self, ids: &[i64]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let deleted = sqlx::query_scalar::<_, i64>(
            "WITH RECURSIVE doomed AS ( \
                SELECT id FROM folders WHERE id = ANY($1) \
                UNION \
                SELECT f.id FROM folders f INNER JOIN doomed d ON f.parent_id = d.id \
             ) \
             DELETE FROM folders WHERE id IN (SELECT id FROM doomed) RETURNING id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to delete folders"))?;

        let count = deleted.len() as u64;
        info!(requested = ids.len(), deleted = count, "Folders deleted");
        Ok(count)
    }
}
