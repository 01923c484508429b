//! Resolution of ROS package install locations.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};

/// Resolves a ROS package name to the folder it is installed in.
pub trait PackageLocator {
    fn package_path(&self, name: &str) -> Result<PathBuf>;
}

/// Package lookup through `rospack find`, with configured overrides first.
#[derive(Debug, Clone)]
pub struct RosPack {
    overrides: Vec<(String, PathBuf)>,
    program: PathBuf,
}

impl RosPack {
    pub fn new(config: &Config) -> Self {
        Self {
            overrides: config.package_overrides.clone(),
            program: PathBuf::from("rospack"),
        }
    }

    /// Uses `program` instead of `rospack` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn find(&self, name: &str) -> Result<PathBuf> {
        let output = Command::new(&self.program)
            .arg("find")
            .arg(name)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                debug!("Failed to run {}: {e}", self.program.display());
                Error::PackageNotFound(name.to_string())
            })?;
        if !output.status.success() {
            return Err(Error::PackageNotFound(name.to_string()));
        }
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if path.is_empty() {
            return Err(Error::PackageNotFound(name.to_string()));
        }
        Ok(PathBuf::from(path))
    }
}

impl PackageLocator for RosPack {
    fn package_path(&self, name: &str) -> Result<PathBuf> {
        if let Some((_, path)) = self.overrides.iter().rev().find(|(pkg, _)| pkg == name) {
            debug!("Package {name} overridden: {}", path.display());
            return Ok(path.clone());
        }
        let path = self.find(name)?;
        debug!("Package {name} found at {}", path.display());
        Ok(path)
    }
}
