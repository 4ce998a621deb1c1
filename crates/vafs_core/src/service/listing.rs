//! Recursive namespace aggregation for display.
//!
//! # Responsibility
//! - Walk the tree top-down from the root and compute per-folder aggregate
//!   size and child counts, post-order.
//!
//! # Invariants
//! - Read-only: runs outside any transaction scope.
//! - `size(folder)` equals the byte sum of all files transitively contained
//!   in the folder's subtree.
//! - One child-folder query plus one file query per folder node (O(nodes)
//!   queries; accepted for a CLI-scale namespace).
//!
//! Sibling order is whatever the store returns for the child queries.

use crate::db::DbError;
use crate::model::node::{NodeId, ROOT_NAME};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from listing aggregation.
#[derive(Debug)]
pub enum ListingError {
    /// Persisted data cannot be interpreted (e.g. missing root).
    InvalidData(String),
    /// Underlying SQLite error.
    Db(DbError),
}

impl Display for ListingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidData(message) => write!(f, "invalid namespace data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for ListingError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One direct file of a folder, with its own size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub name: String,
    pub size: i64,
}

/// Aggregated view of one folder subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderReport {
    pub name: String,
    /// Display depth; the root renders at depth 1.
    pub depth: u32,
    /// Aggregate byte size: direct files plus all descendant folders.
    pub size: i64,
    /// Direct child folder count.
    pub folder_count: usize,
    /// Direct file count.
    pub file_count: usize,
    pub files: Vec<FileReport>,
    pub folders: Vec<FolderReport>,
}

/// Read-only aggregation engine over the namespace.
pub struct ListingService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ListingService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Builds the aggregated report for the whole namespace.
    pub fn report(&self) -> Result<FolderReport, ListingError> {
        let root_id: Option<NodeId> = self
            .conn
            .query_row(
                "SELECT id FROM folders WHERE name = ?1;",
                [ROOT_NAME],
                |row| row.get(0),
            )
            .optional()?;
        let root_id = root_id
            .ok_or_else(|| ListingError::InvalidData(format!("folder `{ROOT_NAME}` is missing")))?;
        self.walk(root_id, ROOT_NAME.to_string(), 1)
    }

    fn walk(&self, id: NodeId, name: String, depth: u32) -> Result<FolderReport, ListingError> {
        let mut stmt = self.conn.prepare(
            "SELECT f.id, f.name
             FROM folders f
             INNER JOIN depth_links dl ON dl.child_id = f.id
             WHERE dl.parent_id = ?1;",
        )?;
        let children = stmt
            .query_map([id], |row| Ok((row.get::<_, NodeId>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT name, size FROM files WHERE folder_id = ?1;",
        )?;
        let files = stmt
            .query_map([id], |row| {
                Ok(FileReport {
                    name: row.get(0)?,
                    size: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut size: i64 = files.iter().map(|file| file.size).sum();
        let mut folders = Vec::with_capacity(children.len());
        for (child_id, child_name) in children {
            let child = self.walk(child_id, child_name, depth + 1)?;
            size += child.size;
            folders.push(child);
        }

        Ok(FolderReport {
            name,
            depth,
            size,
            folder_count: folders.len(),
            file_count: files.len(),
            files,
            folders,
        })
    }
}
