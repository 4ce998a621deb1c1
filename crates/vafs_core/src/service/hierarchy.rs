//! Namespace mutation use-case service.
//!
//! # Responsibility
//! - Validate names above the repository layer.
//! - Provide the command-level add/remove/show/edit operations.
//!
//! # Invariants
//! - Names are non-blank after quote stripping and never contain `/`.
//! - An edit request must change at least one of name or content.

use crate::model::node::{File, Folder, ResolvedNode};
use crate::repo::hierarchy_repo::{HierarchyRepoError, HierarchyRepository};
use crate::repo::path::strip_quotes;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Optional changes applied by one edit command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditRequest {
    pub new_name: Option<String>,
    pub new_content: Option<String>,
}

/// Errors from hierarchy use-case operations.
#[derive(Debug)]
pub enum HierarchyServiceError {
    /// Name is blank after quote stripping or contains a path separator.
    InvalidName(String),
    /// Edit request carries neither a name nor a content change.
    NothingToEdit,
    /// Store-level failure.
    Repo(HierarchyRepoError),
}

impl Display for HierarchyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(
                f,
                "invalid name `{name}`: names must be non-blank and must not contain `/`"
            ),
            Self::NothingToEdit => write!(f, "edit requires --name and/or --content"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HierarchyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HierarchyRepoError> for HierarchyServiceError {
    fn from(value: HierarchyRepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case facade over the hierarchy store.
pub struct HierarchyService<R: HierarchyRepository> {
    repo: R,
}

impl<R: HierarchyRepository> HierarchyService<R> {
    /// Creates the service from a store implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one folder under the folder addressed by `parent_path`.
    pub fn add_folder(
        &self,
        parent_path: &str,
        name: &str,
    ) -> Result<Folder, HierarchyServiceError> {
        validate_name(name)?;
        self.repo.create_folder(parent_path, name).map_err(Into::into)
    }

    /// Creates one file under the folder addressed by `parent_path`.
    pub fn add_file(
        &self,
        parent_path: &str,
        name: &str,
        content: &str,
    ) -> Result<File, HierarchyServiceError> {
        validate_name(name)?;
        self.repo
            .create_file(parent_path, name, content)
            .map_err(Into::into)
    }

    /// Removes the folder or file addressed by `path`.
    pub fn remove(&self, path: &str) -> Result<ResolvedNode, HierarchyServiceError> {
        self.repo.remove(path).map_err(Into::into)
    }

    /// Returns the exact stored content of the file addressed by `path`.
    pub fn show(&self, path: &str) -> Result<String, HierarchyServiceError> {
        self.repo.read_content(path).map_err(Into::into)
    }

    /// Applies one edit command: rename and/or content replacement.
    pub fn edit(
        &self,
        path: &str,
        request: &EditRequest,
    ) -> Result<ResolvedNode, HierarchyServiceError> {
        if request.new_name.is_none() && request.new_content.is_none() {
            return Err(HierarchyServiceError::NothingToEdit);
        }
        if let Some(name) = &request.new_name {
            validate_name(name)?;
        }
        self.repo
            .edit(
                path,
                request.new_name.as_deref(),
                request.new_content.as_deref(),
            )
            .map_err(Into::into)
    }
}

fn validate_name(value: &str) -> Result<(), HierarchyServiceError> {
    let stripped = strip_quotes(value);
    if stripped.is_empty() || stripped.contains('/') {
        return Err(HierarchyServiceError::InvalidName(value.to_string()));
    }
    Ok(())
}
