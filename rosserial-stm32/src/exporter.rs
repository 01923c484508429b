//! Export of the rosserial library into an STM32CubeIDE project.
//!
//! An export runs these steps in order, stopping at the first failure:
//!
//! 1. Check that `<root>/Core/Inc` exists. Nothing is written before this.
//! 2. Resolve the bundled runtime library (`<package>/src/ros_lib`).
//! 3. Replace `<root>/Core/Inc/ROSLib` with a fresh copy of the runtime library.
//! 4. Let the generator copy the generic client runtime into it.
//! 5. Let the generator emit the message headers and sources.
//! 6. Move the generated `.cpp` files to `<root>/Core/Src/ROSLib`.
//!
//! There is no rollback: a failure in step 6 leaves the sources next to the
//! headers.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fs;
use crate::generator::MessageGenerator;
use crate::layout::ProjectLayout;
use crate::locator::PackageLocator;
use crate::types::TypeMap;

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Folder holding the runtime library and generated headers
    pub output: PathBuf,
    /// Folder holding the relocated implementation files
    pub src_dest: PathBuf,
    /// Implementation files at their final location
    pub relocated: Vec<PathBuf>,
}

/// Drives one export with injected package lookup and code generation.
pub struct Exporter<'a> {
    config: &'a Config,
    locator: &'a dyn PackageLocator,
    generator: &'a dyn MessageGenerator,
    types: &'a TypeMap,
}

impl<'a> Exporter<'a> {
    pub fn new(
        config: &'a Config,
        locator: &'a dyn PackageLocator,
        generator: &'a dyn MessageGenerator,
        types: &'a TypeMap,
    ) -> Self {
        Self {
            config,
            locator,
            generator,
            types,
        }
    }

    /// Exports the library into the project at `root`.
    pub fn export(&self, root: impl AsRef<Path>) -> Result<ExportReport> {
        let layout = ProjectLayout::new(root);
        layout.check_inputs()?;

        let output = layout.output();
        info!("Exporting to: {}", output.display());

        let runtime_lib = self.runtime_lib()?;
        self.stage(&runtime_lib, output)?;

        self.generator.copy_files(self.locator, output)?;
        self.generator.generate(self.locator, output, self.types)?;

        let relocated = self.relocate(&layout)?;
        Ok(ExportReport {
            output: output.to_path_buf(),
            src_dest: layout.src_dest().to_path_buf(),
            relocated,
        })
    }

    fn runtime_lib(&self) -> Result<PathBuf> {
        let path = match self.config.runtime_lib() {
            Some(path) => path.to_path_buf(),
            None => self
                .locator
                .package_path(self.config.package_name())?
                .join("src")
                .join("ros_lib"),
        };
        if path.is_dir() {
            Ok(path)
        } else {
            Err(Error::RuntimeLibMissing(path))
        }
    }

    fn stage(&self, runtime_lib: &Path, output: &Path) -> Result<()> {
        if output.exists() {
            info!("Delete old folder: {}", output.display());
            std::fs::remove_dir_all(output).map_err(|source| Error::StaleOutput {
                path: output.to_path_buf(),
                source,
            })?;
        }
        info!("Copying runtime library from {}", runtime_lib.display());
        fs::copy_dir_all(runtime_lib, output)
    }

    fn relocate(&self, layout: &ProjectLayout) -> Result<Vec<PathBuf>> {
        let sources = fs::files_with_extension(layout.output(), self.config.source_extension())?;
        if !layout.has_src() {
            warn!(
                "{} generated source files left in {}",
                sources.len(),
                layout.output().display()
            );
            return Err(Error::SrcMissing(layout.src().to_path_buf()));
        }

        let src_dest = layout.src_dest();
        fs::create_dir_in_existing(src_dest)?;
        info!(
            "Moving {} source files to {}",
            sources.len(),
            src_dest.display()
        );
        sources
            .iter()
            .map(|file| fs::move_into(file, src_dest))
            .collect()
    }
}
