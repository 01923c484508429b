//! rosserial client library generation for STM32 projects.
//!
//! This crate stages the rosserial embedded runtime into an STM32CubeIDE
//! project and drives the rosserial message generator with a type mapping
//! tailored to the STM32 toolchain.
//!
//! # Overview
//!
//! The crate provides functionality for:
//!
//! - **Type Mapping**: The [`STM32_TYPES`] table describing how every ROS wire
//!   type is rendered in embedded C++ (see [`types`])
//! - **Project Layout**: Locating `Core/Inc` and `Core/Src` in an STM32CubeIDE
//!   project (see [`layout`])
//! - **Export**: Staging the runtime library, running generation and moving the
//!   generated `.cpp` files where the IDE build expects them (see [`exporter`])
//!
//! The package registry and the message generator are injected through the
//! [`PackageLocator`] and [`MessageGenerator`] traits. [`RosPack`] and
//! [`RosserialClient`] are the production implementations.
//!
//! # Requirements
//!
//! - A sourced ROS installation providing `rospack` and the `rosserial_client`
//!   package (unless every package is overridden through [`ConfigBuilder::package`])
//! - A Python interpreter able to import `rospkg`
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use rosserial_stm32::{Config, Exporter, RosPack, RosserialClient, TypeMap};
//!
//! let config = Config::builder().build();
//! let locator = RosPack::new(&config);
//! let generator = RosserialClient::new(&config);
//! let types = TypeMap::stm32();
//!
//! let report = Exporter::new(&config, &locator, &generator, &types)
//!     .export("/home/me/STM32CubeIDE/workspace/blinky")?;
//! println!("{} sources moved", report.relocated.len());
//! ```

pub mod config;
pub mod error;
pub mod exporter;
pub mod fs;
pub mod generator;
pub mod layout;
pub mod locator;
pub mod logger;
pub mod types;

/// Name of the ROS package shipping the STM32 runtime library.
pub const THIS_PACKAGE: &str = "rosserial_stm32";

// Re-export public API
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use exporter::{ExportReport, Exporter};
pub use generator::{MessageGenerator, RosserialClient};
pub use layout::ProjectLayout;
pub use locator::{PackageLocator, RosPack};
pub use types::{Codec, STM32_TYPES, TypeMap, TypeMapping};
