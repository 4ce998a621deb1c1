//! Namespace domain records.
//!
//! # Responsibility
//! - Define the folder/file records shared by resolver, repository and
//!   service layers.
//!
//! # Invariants
//! - `id` values come from the store and are never reused for another row.
//! - `File::size` always equals the byte length of `File::content`.

use serde::{Deserialize, Serialize};

/// Stable store-assigned identifier for folders and files.
pub type NodeId = i64;

/// Name of the single undeletable namespace root.
pub const ROOT_NAME: &str = "Root";

/// Kind of entity a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Folder,
    File,
}

/// Folder read model.
///
/// Folder names are unique across the entire namespace, not just among
/// siblings; parent lookup depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: NodeId,
    pub name: String,
}

/// File read model. `content` is opaque bounded text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: NodeId,
    /// Owning folder id.
    pub folder_id: NodeId,
    pub name: String,
    pub content: String,
    /// Denormalized byte length of `content`.
    pub size: i64,
}

/// Outcome of terminal path resolution: a concrete node plus its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNode {
    pub id: NodeId,
    pub kind: EntityKind,
}

impl ResolvedNode {
    pub fn folder(id: NodeId) -> Self {
        Self {
            id,
            kind: EntityKind::Folder,
        }
    }

    pub fn file(id: NodeId) -> Self {
        Self {
            id,
            kind: EntityKind::File,
        }
    }
}
