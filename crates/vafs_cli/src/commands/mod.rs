//! CLI command definitions and dispatch.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::error::Error;
use std::path::PathBuf;
use vafs_core::db::open_db;
use vafs_core::{
    default_log_level, init_logging, EditRequest, EntityKind, FolderReport, HierarchyService,
    ListingService, SqliteHierarchyRepository,
};

/// vafs, a simple virtual file system backed by SQLite
#[derive(Debug, Parser)]
#[command(name = "vafs", version, about, long_about = None)]
pub struct Cli {
    /// Path to the database file
    #[arg(long, default_value = "vafs.db")]
    pub db: PathBuf,

    /// Directory for rotating log files; file logging is off when absent
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the whole file system hierarchy with aggregate sizes
    List,
    /// Add a folder into the specified folder
    #[command(name = "add_folder")]
    AddFolder {
        /// Path of the containing folder, like Root/My/Folder
        path: String,
        /// New folder name
        name: String,
    },
    /// Add a file with the given content into the specified folder
    #[command(name = "add_file")]
    AddFile {
        /// Path of the containing folder, like Root/My/Folder
        path: String,
        /// New file name
        name: String,
        /// Content of the new file
        content: String,
    },
    /// Remove the file or folder at the specified path
    Remove {
        /// Path to the file or folder to remove
        path: String,
    },
    /// Show the content of the file at the specified path
    Show {
        /// Path to the file, like Root/My/Folder/MyFile.txt
        path: String,
    },
    /// Edit the name of a file or folder, and/or the content of a file
    Edit {
        /// Path to the file or folder
        path: String,
        /// New name for the file or folder
        #[arg(long)]
        name: Option<String>,
        /// New file content; only valid when the path addresses a file
        #[arg(long)]
        content: Option<String>,
    },
}

impl Cli {
    /// Execute the parsed command against the store.
    pub fn execute(&self) -> Result<(), Box<dyn Error>> {
        if let Some(log_dir) = &self.log_dir {
            init_logging(default_log_level(), &log_dir.to_string_lossy())?;
        }

        let conn = open_db(&self.db)?;
        match self.run(&conn) {
            Ok(()) => {
                info!(
                    "event=command module=cli cmd={} status=ok",
                    self.command.event_name()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=command module=cli cmd={} status=error error={}",
                    self.command.event_name(),
                    err
                );
                Err(err)
            }
        }
    }

    fn run(&self, conn: &rusqlite::Connection) -> Result<(), Box<dyn Error>> {
        match &self.command {
            Commands::List => {
                let report = ListingService::new(conn).report()?;
                render_folder(&report);
            }
            Commands::AddFolder { path, name } => {
                let service = HierarchyService::new(SqliteHierarchyRepository::try_new(conn)?);
                let folder = service.add_folder(path, name)?;
                println!("created folder `{}`", folder.name);
            }
            Commands::AddFile {
                path,
                name,
                content,
            } => {
                let service = HierarchyService::new(SqliteHierarchyRepository::try_new(conn)?);
                let file = service.add_file(path, name, content)?;
                println!("created file `{}` ({} bytes)", file.name, file.size);
            }
            Commands::Remove { path } => {
                let service = HierarchyService::new(SqliteHierarchyRepository::try_new(conn)?);
                let node = service.remove(path)?;
                println!("removed {} `{}`", kind_word(node.kind), path);
            }
            Commands::Show { path } => {
                let service = HierarchyService::new(SqliteHierarchyRepository::try_new(conn)?);
                let content = service.show(path)?;
                println!("{content}");
            }
            Commands::Edit {
                path,
                name,
                content,
            } => {
                let service = HierarchyService::new(SqliteHierarchyRepository::try_new(conn)?);
                let request = EditRequest {
                    new_name: name.clone(),
                    new_content: content.clone(),
                };
                let node = service.edit(path, &request)?;
                println!("updated {} `{}`", kind_word(node.kind), path);
            }
        }
        Ok(())
    }
}

impl Commands {
    fn event_name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::AddFolder { .. } => "add_folder",
            Self::AddFile { .. } => "add_file",
            Self::Remove { .. } => "remove",
            Self::Show { .. } => "show",
            Self::Edit { .. } => "edit",
        }
    }
}

fn kind_word(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Folder => "folder",
        EntityKind::File => "file",
    }
}

fn render_folder(report: &FolderReport) {
    let indent = "  ".repeat(report.depth.saturating_sub(1) as usize);
    if report.file_count > 0 {
        println!(
            "{indent}{} [size: {}] (folders: {}, files: {})",
            report.name, report.size, report.folder_count, report.file_count
        );
    } else {
        println!(
            "{indent}{} [size: {}] (folders: {})",
            report.name, report.size, report.folder_count
        );
    }
    for file in &report.files {
        println!("{indent}  {} [size: {}]", file.name, file.size);
    }
    for child in &report.folders {
        render_folder(child);
    }
}
