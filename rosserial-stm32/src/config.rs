//! Configuration for the rosserial library export.
//!
//! This module provides the [`Config`] struct and [`ConfigBuilder`] for configuring
//! where the runtime library comes from, how packages are resolved and how the
//! external generator is launched.

use std::path::{Path, PathBuf};

use crate::THIS_PACKAGE;

/// Default interpreter used to run the rosserial generator.
const DEFAULT_PYTHON: &str = "python3";

/// Extension of the implementation files relocated into `Core/Src`.
const DEFAULT_SOURCE_EXTENSION: &str = "cpp";

/// Configuration for a rosserial library export.
///
/// # Example
///
/// ```rust,ignore
/// use rosserial_stm32::Config;
///
/// let config = Config::builder()
///     .runtime_lib("/opt/ros/noetic/share/rosserial_stm32/src/ros_lib")
///     .package("rosserial_client", "/home/me/catkin_ws/src/rosserial/rosserial_client")
///     .python("/usr/bin/python3")
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// ROS package shipping the runtime library.
    pub(crate) package_name: String,
    /// Explicit runtime library folder, bypassing package lookup.
    pub(crate) runtime_lib: Option<PathBuf>,
    /// Extension of generated implementation files (without the dot).
    pub(crate) source_extension: String,
    /// Interpreter running the generator bridge.
    pub(crate) python: PathBuf,
    /// Package locations that take priority over `rospack`.
    pub(crate) package_overrides: Vec<(String, PathBuf)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package_name: THIS_PACKAGE.to_string(),
            runtime_lib: None,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            python: PathBuf::from(DEFAULT_PYTHON),
            package_overrides: Vec::new(),
        }
    }
}

impl Config {
    /// Creates a new [`ConfigBuilder`] for constructing a [`Config`].
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn runtime_lib(&self) -> Option<&Path> {
        self.runtime_lib.as_deref()
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Returns the override for `name`. The last override given wins.
    pub fn package_override(&self, name: &str) -> Option<&Path> {
        self.package_overrides
            .iter()
            .rev()
            .find(|(pkg, _)| pkg == name)
            .map(|(_, path)| path.as_path())
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the package whose `src/ros_lib` is staged into the project.
    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.config.package_name = name.into();
        self
    }

    /// Uses `path` as the runtime library instead of resolving the package.
    pub fn runtime_lib(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.runtime_lib = Some(path.into());
        self
    }

    /// Sets the extension of implementation files moved to `Core/Src`.
    ///
    /// A leading dot is ignored.
    pub fn source_extension(mut self, extension: &str) -> Self {
        self.config.source_extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn python(mut self, python: impl Into<PathBuf>) -> Self {
        self.config.python = python.into();
        self
    }

    /// Resolves package `name` to `path` without asking `rospack`.
    pub fn package(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.config
            .package_overrides
            .push((name.into(), path.into()));
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::builder().build();
        assert_eq!(config.package_name(), "rosserial_stm32");
        assert_eq!(config.runtime_lib(), None);
        assert_eq!(config.source_extension(), "cpp");
        assert_eq!(config.python(), Path::new("python3"));
        assert_eq!(config.package_override("rosserial_client"), None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::builder()
            .runtime_lib("/tmp/ros_lib")
            .source_extension(".cc")
            .python("/usr/bin/python3.8")
            .package("rosserial_client", "/a")
            .package("rosserial_client", "/b")
            .build();
        assert_eq!(config.runtime_lib(), Some(Path::new("/tmp/ros_lib")));
        assert_eq!(config.source_extension(), "cc");
        assert_eq!(config.python(), Path::new("/usr/bin/python3.8"));
        assert_eq!(
            config.package_override("rosserial_client"),
            Some(Path::new("/b"))
        );
    }
}
