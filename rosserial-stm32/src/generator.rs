//! Message code generation entry points.
//!
//! The message parser and C++ emitter live in the `rosserial_client` package.
//! [`MessageGenerator`] is the seam the exporter calls through; the production
//! [`RosserialClient`] runs the package's Python entry points in a child process
//! and hands it the type map as JSON on stdin.

use std::env;
use std::ffi::{OsStr, OsString};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::locator::PackageLocator;
use crate::types::TypeMap;

/// ROS package providing the generic embedded client and its generator.
pub const CLIENT_PACKAGE: &str = "rosserial_client";

/// Generator entry points used by the exporter.
pub trait MessageGenerator {
    /// Copies the generic client runtime (node handle, time, publisher, ...) into `output`.
    fn copy_files(&self, locator: &dyn PackageLocator, output: &Path) -> Result<()>;

    /// Emits a header per message, service and implementation file reachable
    /// from the workspace into `output`.
    ///
    /// Fails if a message uses a wire type `types` does not declare.
    fn generate(&self, locator: &dyn PackageLocator, output: &Path, types: &TypeMap)
    -> Result<()>;
}

/// Python side of the bridge. Reads one request from stdin.
const BRIDGE: &str = r#"
import json
import sys

request = json.load(sys.stdin)
sys.path.insert(0, request["client_src"])

import rospkg
from rosserial_client.make_library import (
    MessageDataType,
    PrimitiveDataType,
    StringDataType,
    TimeDataType,
    rosserial_client_copy_files,
    rosserial_generate,
)

rospack = rospkg.RosPack()
if request["command"] == "copy_files":
    rosserial_client_copy_files(rospack, request["output"])
else:
    codecs = {
        cls.__name__: cls
        for cls in (PrimitiveDataType, TimeDataType, StringDataType, MessageDataType)
    }
    table = {
        name: (t["target_type"], t["wire_size"], codecs[t["codec"]], t["dependencies"])
        for name, t in request["types"].items()
    }
    rosserial_generate(rospack, request["output"], table)
"#;

#[derive(Debug, Serialize)]
struct BridgeRequest<'a> {
    command: &'static str,
    client_src: &'a Path,
    output: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    types: Option<&'a TypeMap>,
}

/// [`MessageGenerator`] backed by the `rosserial_client` Python package.
///
/// The generator's own `rospkg` lookup sees the folders holding configured
/// package overrides and `rosserial_client` ahead of the inherited
/// `ROS_PACKAGE_PATH`.
#[derive(Debug, Clone)]
pub struct RosserialClient {
    python: PathBuf,
    /// Overridden package folders, last override first
    overrides: Vec<PathBuf>,
}

impl RosserialClient {
    pub fn new(config: &Config) -> Self {
        Self {
            python: config.python().to_path_buf(),
            overrides: config
                .package_overrides
                .iter()
                .rev()
                .map(|(_, path)| path.clone())
                .collect(),
        }
    }

    /// Search path for the bridge: parents of overridden packages and of
    /// `client_pkg`, then `inherited`, without duplicates.
    fn ros_package_path(&self, client_pkg: &Path, inherited: Option<&OsStr>) -> Result<OsString> {
        let parents = self
            .overrides
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(client_pkg))
            .filter_map(Path::parent)
            .map(Path::to_path_buf);
        let inherited = inherited.into_iter().flat_map(|p| env::split_paths(p));

        let mut paths: Vec<PathBuf> = Vec::new();
        for path in parents.chain(inherited) {
            if !path.as_os_str().is_empty() && !paths.contains(&path) {
                paths.push(path);
            }
        }
        env::join_paths(paths)
            .map_err(|e| Error::io(client_pkg, io::Error::new(ErrorKind::InvalidInput, e)))
    }

    /// Resolves `rosserial_client` and builds the bridge environment.
    fn prepare(&self, locator: &dyn PackageLocator) -> Result<(PathBuf, OsString)> {
        let client_pkg = locator.package_path(CLIENT_PACKAGE)?;
        let search_path =
            self.ros_package_path(&client_pkg, env::var_os("ROS_PACKAGE_PATH").as_deref())?;
        Ok((client_pkg.join("src"), search_path))
    }

    fn run(&self, request: &BridgeRequest<'_>, ros_package_path: &OsStr) -> Result<()> {
        let payload = serde_json::to_vec(request)?;
        debug!(
            "Running {} bridge with {} (ROS_PACKAGE_PATH={})",
            request.command,
            self.python.display(),
            ros_package_path.to_string_lossy()
        );

        let mut child = Command::new(&self.python)
            .arg("-c")
            .arg(BRIDGE)
            .env("ROS_PACKAGE_PATH", ros_package_path)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| Error::io(&self.python, e))?;

        // stdin is dropped at the end of the block so the bridge sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload) {
                Ok(()) => {}
                // Exited without reading, the exit status reports it
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("{} bridge closed stdin early", request.command);
                }
                Err(e) => return Err(Error::io(&self.python, e)),
            }
        }

        let status = child.wait().map_err(|e| Error::io(&self.python, e))?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::GeneratorFailed {
                step: request.command,
                status,
            })
        }
    }
}

impl MessageGenerator for RosserialClient {
    fn copy_files(&self, locator: &dyn PackageLocator, output: &Path) -> Result<()> {
        let (client_src, search_path) = self.prepare(locator)?;
        info!("Copying rosserial client files");
        self.run(
            &BridgeRequest {
                command: "copy_files",
                client_src: &client_src,
                output,
                types: None,
            },
            &search_path,
        )
    }

    fn generate(
        &self,
        locator: &dyn PackageLocator,
        output: &Path,
        types: &TypeMap,
    ) -> Result<()> {
        let (client_src, search_path) = self.prepare(locator)?;
        info!("Generating messages with {} wire types", types.len());
        self.run(
            &BridgeRequest {
                command: "generate",
                client_src: &client_src,
                output,
                types: Some(types),
            },
            &search_path,
        )
    }
}
