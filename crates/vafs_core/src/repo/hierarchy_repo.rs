//! Hierarchy store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Perform structural namespace mutations: create folder/file, remove,
//!   rename, content updates.
//! - Maintain the depth bookkeeping invariant on every folder creation.
//!
//! # Invariants
//! - Every mutation runs inside one immediate transaction scope; a failed
//!   mutation leaves the store unchanged.
//! - Each created folder gets exactly one depth link row with
//!   `depth = parent depth + 1`; the row is never updated afterwards.
//! - `files.size` always equals the byte length of `files.content` and both
//!   change in the same statement.

use crate::db::migrations::latest_version;
use crate::db::{with_scope, DbError};
use crate::model::node::{EntityKind, File, Folder, ResolvedNode};
use crate::repo::path::{parse_segments, strip_quotes};
use crate::repo::resolver::{PathResolver, ResolveError};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by hierarchy store operations.
pub type HierarchyRepoResult<T> = Result<T, HierarchyRepoError>;

/// Errors from hierarchy store operations.
#[derive(Debug)]
pub enum HierarchyRepoError {
    /// Path resolution failure.
    Resolve(ResolveError),
    /// The store rejected a duplicate folder name; folder names are unique
    /// across the entire namespace.
    UniquenessViolation { name: String },
    /// Content operation addressed a folder.
    NotAFile { path: String },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Underlying SQLite error.
    Db(DbError),
}

impl Display for HierarchyRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolve(err) => write!(f, "{err}"),
            Self::UniquenessViolation { name } => {
                write!(f, "a folder named `{name}` already exists in the namespace")
            }
            Self::NotAFile { path } => write!(f, "`{path}` is not a file"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "hierarchy store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "hierarchy store requires table `{table}`")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HierarchyRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResolveError> for HierarchyRepoError {
    fn from(value: ResolveError) -> Self {
        Self::Resolve(value)
    }
}

impl From<DbError> for HierarchyRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for HierarchyRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for structural namespace mutations.
pub trait HierarchyRepository {
    /// Creates one folder under the folder addressed by `parent_path`.
    fn create_folder(&self, parent_path: &str, name: &str) -> HierarchyRepoResult<Folder>;
    /// Creates one file under the folder addressed by `parent_path`.
    fn create_file(&self, parent_path: &str, name: &str, content: &str)
        -> HierarchyRepoResult<File>;
    /// Removes the folder or file addressed by `path`.
    fn remove(&self, path: &str) -> HierarchyRepoResult<ResolvedNode>;
    /// Renames the folder or file addressed by `path`.
    fn rename(&self, path: &str, new_name: &str) -> HierarchyRepoResult<ResolvedNode>;
    /// Replaces the content of the file addressed by `path`.
    fn set_content(&self, path: &str, content: &str) -> HierarchyRepoResult<ResolvedNode>;
    /// Applies an optional rename and an optional content update together.
    fn edit(
        &self,
        path: &str,
        new_name: Option<&str>,
        new_content: Option<&str>,
    ) -> HierarchyRepoResult<ResolvedNode>;
    /// Reads the content of the file addressed by `path`.
    fn read_content(&self, path: &str) -> HierarchyRepoResult<String>;
}

/// SQLite-backed hierarchy store.
pub struct SqliteHierarchyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHierarchyRepository<'conn> {
    /// Creates the store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> HierarchyRepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn target_segments(parent_path: &str, name: &str) -> HierarchyRepoResult<Vec<String>> {
        let mut segments = parse_segments(parent_path)
            .ok_or_else(|| ResolveError::MalformedPath(parent_path.to_string()))?;
        segments.push(strip_quotes(name));
        Ok(segments)
    }
}

impl HierarchyRepository for SqliteHierarchyRepository<'_> {
    fn create_folder(&self, parent_path: &str, name: &str) -> HierarchyRepoResult<Folder> {
        let name = strip_quotes(name);
        let segments = Self::target_segments(parent_path, &name)?;

        with_scope(self.conn, |conn| {
            let parent = PathResolver::new(conn).resolve_parent(&segments)?;
            conn.execute("INSERT INTO folders (name) VALUES (?1);", [&name])
                .map_err(|err| map_unique_violation(&name, err))?;
            let folder_id = conn.last_insert_rowid();
            conn.execute(
                "INSERT INTO depth_links (parent_id, child_id, depth) VALUES (?1, ?2, ?3);",
                params![parent.id, folder_id, parent.depth + 1],
            )?;
            Ok(Folder {
                id: folder_id,
                name: name.clone(),
            })
        })
    }

    fn create_file(
        &self,
        parent_path: &str,
        name: &str,
        content: &str,
    ) -> HierarchyRepoResult<File> {
        let name = strip_quotes(name);
        let content = strip_quotes(content);
        let segments = Self::target_segments(parent_path, &name)?;

        with_scope(self.conn, |conn| {
            let parent = PathResolver::new(conn).resolve_parent(&segments)?;
            let size = content.len() as i64;
            conn.execute(
                "INSERT INTO files (folder_id, name, content, size) VALUES (?1, ?2, ?3, ?4);",
                params![parent.id, name, content, size],
            )?;
            Ok(File {
                id: conn.last_insert_rowid(),
                folder_id: parent.id,
                name: name.clone(),
                content: content.clone(),
                size,
            })
        })
    }

    fn remove(&self, path: &str) -> HierarchyRepoResult<ResolvedNode> {
        with_scope(self.conn, |conn| {
            let node = PathResolver::new(conn).resolve(path)?;
            match node.kind {
                // Owned files and depth link rows go with the folder via
                // the store's cascade rules; child folder rows survive.
                EntityKind::Folder => {
                    conn.execute("DELETE FROM folders WHERE id = ?1;", [node.id])?;
                }
                EntityKind::File => {
                    conn.execute("DELETE FROM files WHERE id = ?1;", [node.id])?;
                }
            }
            Ok(node)
        })
    }

    fn rename(&self, path: &str, new_name: &str) -> HierarchyRepoResult<ResolvedNode> {
        self.edit(path, Some(new_name), None)
    }

    fn set_content(&self, path: &str, content: &str) -> HierarchyRepoResult<ResolvedNode> {
        self.edit(path, None, Some(content))
    }

    fn edit(
        &self,
        path: &str,
        new_name: Option<&str>,
        new_content: Option<&str>,
    ) -> HierarchyRepoResult<ResolvedNode> {
        with_scope(self.conn, |conn| {
            let node = PathResolver::new(conn).resolve(path)?;

            if let Some(new_name) = new_name {
                let new_name = strip_quotes(new_name);
                match node.kind {
                    EntityKind::Folder => {
                        conn.execute(
                            "UPDATE folders SET name = ?2 WHERE id = ?1;",
                            params![node.id, new_name],
                        )
                        .map_err(|err| map_unique_violation(&new_name, err))?;
                    }
                    EntityKind::File => {
                        conn.execute(
                            "UPDATE files SET name = ?2 WHERE id = ?1;",
                            params![node.id, new_name],
                        )?;
                    }
                }
            }

            if let Some(new_content) = new_content {
                if node.kind != EntityKind::File {
                    return Err(HierarchyRepoError::NotAFile {
                        path: path.to_string(),
                    });
                }
                let new_content = strip_quotes(new_content);
                conn.execute(
                    "UPDATE files SET content = ?2, size = ?3 WHERE id = ?1;",
                    params![node.id, new_content, new_content.len() as i64],
                )?;
            }

            Ok(node)
        })
    }

    fn read_content(&self, path: &str) -> HierarchyRepoResult<String> {
        let node = PathResolver::new(self.conn).resolve(path)?;
        if node.kind != EntityKind::File {
            return Err(HierarchyRepoError::NotAFile {
                path: path.to_string(),
            });
        }
        let content = self.conn.query_row(
            "SELECT content FROM files WHERE id = ?1;",
            [node.id],
            |row| row.get(0),
        )?;
        Ok(content)
    }
}

fn map_unique_violation(name: &str, err: rusqlite::Error) -> HierarchyRepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return HierarchyRepoError::UniquenessViolation {
                name: name.to_string(),
            };
        }
    }
    HierarchyRepoError::Db(DbError::Sqlite(err))
}

fn ensure_connection_ready(conn: &Connection) -> HierarchyRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(HierarchyRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["folders", "files", "depth_links"] {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(HierarchyRepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
