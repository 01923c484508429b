//! Paths of an STM32CubeIDE project touched by the export.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Folder created under `Core/Inc` (headers) and `Core/Src` (sources).
pub const ROSLIB_DIR: &str = "ROSLib";

/// Filesystem layout of the target project for one export.
///
/// ```text
/// <root>/Core/Inc           must exist before anything is written
/// <root>/Core/Inc/ROSLib    runtime library and generated headers
/// <root>/Core/Src           must exist for sources to be relocated
/// <root>/Core/Src/ROSLib    generated implementation files
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    core_inc: PathBuf,
    output: PathBuf,
    src: PathBuf,
    src_dest: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let core_inc = root.join("Core").join("Inc");
        let output = core_inc.join(ROSLIB_DIR);
        // Sources sit next to the headers: <output>/../../Src
        let src = root.join("Core").join("Src");
        let src_dest = src.join(ROSLIB_DIR);
        Self {
            root,
            core_inc,
            output,
            src,
            src_dest,
        }
    }

    /// Project root as given on the command line.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn core_inc(&self) -> &Path {
        &self.core_inc
    }

    /// Export target for the runtime library and generated code.
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    /// Destination of relocated implementation files.
    pub fn src_dest(&self) -> &Path {
        &self.src_dest
    }

    /// Fails with [`Error::CoreIncMissing`] unless `Core/Inc` is a directory.
    pub fn check_inputs(&self) -> Result<()> {
        if self.core_inc.is_dir() {
            Ok(())
        } else {
            Err(Error::CoreIncMissing(self.core_inc.clone()))
        }
    }

    pub fn has_src(&self) -> bool {
        self.src.is_dir()
    }
}
