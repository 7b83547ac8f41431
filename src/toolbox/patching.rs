use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::ToolboxError;
use crate::model::patch::PatchDirective;

pub trait FilePatcher {
    fn patch(&self, path: &Path, directive: &PatchDirective) -> Result<(), ToolboxError>;

    /// Append `text` verbatim, creating the file when it does not exist.
    fn append(&self, path: &Path, text: &str) -> Result<(), ToolboxError>;
}

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<String, ToolboxError>;
}

#[derive(Debug, Default)]
pub struct DiskPatcher;

impl FilePatcher for DiskPatcher {
    fn patch(&self, path: &Path, directive: &PatchDirective) -> Result<(), ToolboxError> {
        let content = DiskFs.read(path)?;
        let patched = directive
            .apply(&content)
            .map_err(|source| ToolboxError::Patch {
                path: path.to_path_buf(),
                source,
            })?;

        fs::write(path, patched).map_err(|source| ToolboxError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("{}: {directive}", path.display());
        Ok(())
    }

    fn append(&self, path: &Path, text: &str) -> Result<(), ToolboxError> {
        let io_err = |source| ToolboxError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;
        file.write_all(text.as_bytes()).map_err(io_err)?;
        tracing::info!("{}: appended {} bytes", path.display(), text.len());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<String, ToolboxError> {
        if !path.is_file() {
            return Err(ToolboxError::MissingFile(path.to_path_buf()));
        }
        fs::read_to_string(path).map_err(|source| ToolboxError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
