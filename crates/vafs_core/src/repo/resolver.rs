//! Path resolution over the folder/file namespace.
//!
//! # Responsibility
//! - Resolve slash-delimited paths to concrete nodes or specific failures.
//! - Keep the name+depth parent lookup in one place.
//!
//! # Invariants
//! - Parent lookup keys on (name, depth), not on a per-segment walk; it
//!   relies on folder names being unique across the whole namespace.
//! - The root folder is depth 0, has no depth link row, and is never an
//!   addressable target for show/remove/edit.

use crate::db::DbError;
use crate::model::node::{Folder, NodeId, ResolvedNode, ROOT_NAME};
use crate::repo::path::{is_root_segment, parse_segments};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by path resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors from path resolution.
#[derive(Debug)]
pub enum ResolveError {
    /// Path is empty or one of its segments cannot be parsed.
    MalformedPath(String),
    /// Path addresses the root folder, which is not an ordinary target.
    RootProtected,
    /// The parent folder of the terminal segment does not resolve.
    ParentNotFound { name: String, depth: i64 },
    /// No folder or file with the terminal name exists under the parent.
    NotFound { name: String },
    /// Both a folder and a file with the terminal name exist under the
    /// same parent; the schema does not prevent this state.
    AmbiguousEntity { name: String },
    /// Persisted data cannot be interpreted.
    InvalidData(String),
    /// Underlying SQLite error.
    Db(DbError),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedPath(raw) => write!(f, "malformed path `{raw}`"),
            Self::RootProtected => {
                write!(f, "`{ROOT_NAME}` is protected and cannot be the target")
            }
            Self::ParentNotFound { name, depth } => {
                write!(f, "parent folder `{name}` not found at depth {depth}")
            }
            Self::NotFound { name } => write!(f, "no folder or file named `{name}`"),
            Self::AmbiguousEntity { name } => write!(
                f,
                "both a folder and a file named `{name}` exist under the same parent"
            ),
            Self::InvalidData(message) => write!(f, "invalid namespace data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ResolveError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ResolveError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Resolved parent folder: its id plus its own depth from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentFolder {
    pub id: NodeId,
    pub depth: i64,
}

/// Stand-alone path resolver borrowing the store connection.
pub struct PathResolver<'conn> {
    conn: &'conn Connection,
}

impl<'conn> PathResolver<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Loads the root folder row.
    pub fn root_folder(&self) -> ResolveResult<Folder> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name FROM folders WHERE name = ?1;",
                [ROOT_NAME],
                |row| {
                    Ok(Folder {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        row.ok_or_else(|| ResolveError::InvalidData(format!("folder `{ROOT_NAME}` is missing")))
    }

    /// Resolves the parent folder of a target path.
    ///
    /// `target_segments` is the full path of the entity being created or
    /// addressed, so the parent is the last-but-one segment looked up by
    /// name plus computed depth (`segment count - 2`). Depth 0 is the root
    /// special case: the root has no depth link row and matches by name
    /// only, case-insensitively.
    pub fn resolve_parent(&self, target_segments: &[String]) -> ResolveResult<ParentFolder> {
        if target_segments.len() < 2 {
            return Err(ResolveError::MalformedPath(target_segments.join("/")));
        }

        let name = &target_segments[target_segments.len() - 2];
        let depth = (target_segments.len() - 2) as i64;

        if depth == 0 {
            if !is_root_segment(name) {
                return Err(ResolveError::ParentNotFound {
                    name: name.clone(),
                    depth,
                });
            }
            let root = self.root_folder()?;
            return Ok(ParentFolder { id: root.id, depth });
        }

        let found: Option<NodeId> = self
            .conn
            .query_row(
                "SELECT f.id
                 FROM folders f
                 INNER JOIN depth_links dl ON dl.child_id = f.id
                 WHERE f.name = ?1
                   AND dl.depth = ?2;",
                params![name, depth],
                |row| row.get(0),
            )
            .optional()?;

        match found {
            Some(id) => Ok(ParentFolder { id, depth }),
            None => Err(ResolveError::ParentNotFound {
                name: name.clone(),
                depth,
            }),
        }
    }

    /// Resolves a terminal entity for show/remove/edit.
    ///
    /// A single-segment path naming the root is rejected with
    /// `RootProtected`; any other single-segment path is malformed. The
    /// parent resolves by name+depth, then the terminal segment is searched
    /// under it as a child folder or a file.
    pub fn resolve(&self, path: &str) -> ResolveResult<ResolvedNode> {
        let segments =
            parse_segments(path).ok_or_else(|| ResolveError::MalformedPath(path.to_string()))?;

        if segments.len() == 1 {
            if is_root_segment(&segments[0]) {
                return Err(ResolveError::RootProtected);
            }
            return Err(ResolveError::MalformedPath(path.to_string()));
        }

        let parent = self.resolve_parent(&segments)?;
        let name = &segments[segments.len() - 1];

        let folder_id: Option<NodeId> = self
            .conn
            .query_row(
                "SELECT f.id
                 FROM folders f
                 INNER JOIN depth_links dl ON dl.child_id = f.id
                 WHERE dl.parent_id = ?1
                   AND f.name = ?2;",
                params![parent.id, name],
                |row| row.get(0),
            )
            .optional()?;
        let file_id: Option<NodeId> = self
            .conn
            .query_row(
                "SELECT id FROM files WHERE folder_id = ?1 AND name = ?2;",
                params![parent.id, name],
                |row| row.get(0),
            )
            .optional()?;

        match (folder_id, file_id) {
            (Some(_), Some(_)) => Err(ResolveError::AmbiguousEntity { name: name.clone() }),
            (Some(id), None) => Ok(ResolvedNode::folder(id)),
            (None, Some(id)) => Ok(ResolvedNode::file(id)),
            (None, None) => Err(ResolveError::NotFound { name: name.clone() }),
        }
    }
}
