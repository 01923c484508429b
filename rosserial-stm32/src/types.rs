//! ROS wire type to embedded C++ type mapping.
//!
//! The rosserial generator is target agnostic: every backend hands it a table
//! saying how each primitive ROS type is rendered on the device. This module
//! holds that table for the STM32 toolchain.
//!
//! Each [`TypeMapping`] carries:
//!
//! - the C++ type emitted into the generated message classes
//! - the fixed wire size in bytes (`0` for variable-length types)
//! - the [`Codec`] the generator uses to (de)serialize the field
//! - auxiliary headers/messages the type pulls in
//!
//! # Example
//!
//! ```rust,ignore
//! use rosserial_stm32::{Codec, TypeMap};
//!
//! let types = TypeMap::stm32();
//! let time = types.resolve("time")?;
//! assert_eq!(time.target_type, "ros::Time");
//! assert_eq!(time.codec, Codec::Time);
//! ```

use std::collections::BTreeMap;

use phf::phf_map;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Serialization strategy applied by the generator to a wire type.
///
/// Serialized as the name of the generator's wrapper class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Flat little-endian byte copy of a fixed-width value
    Primitive,
    /// Two 32-bit fields, seconds then nanoseconds
    Time,
    /// 32-bit length prefix followed by the bytes
    String,
    /// Nested message expanded recursively by the generator
    Message,
}

impl Codec {
    /// Name of the generator class implementing this codec.
    pub const fn class_name(self) -> &'static str {
        match self {
            Codec::Primitive => "PrimitiveDataType",
            Codec::Time => "TimeDataType",
            Codec::String => "StringDataType",
            Codec::Message => "MessageDataType",
        }
    }
}

impl Serialize for Codec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.class_name())
    }
}

/// How a single ROS wire type is rendered in embedded C++.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeMapping {
    /// C++ type emitted for fields of this wire type
    pub target_type: &'static str,
    /// Fixed size on the wire in bytes, `0` when the length travels in the stream
    pub wire_size: usize,
    /// Serialization strategy
    pub codec: Codec,
    /// Headers or message definitions the type depends on
    pub dependencies: &'static [&'static str],
}

impl TypeMapping {
    const fn primitive(target_type: &'static str, wire_size: usize) -> Self {
        Self {
            target_type,
            wire_size,
            codec: Codec::Primitive,
            dependencies: &[],
        }
    }

    /// Returns true if the size of the field is only known at runtime.
    pub const fn is_variable_length(&self) -> bool {
        self.wire_size == 0
    }
}

/// Wire types understood by the STM32 rosserial runtime.
pub static STM32_TYPES: phf::Map<&'static str, TypeMapping> = phf_map! {
    "bool" => TypeMapping::primitive("bool", 1),
    "byte" => TypeMapping::primitive("int8_t", 1),
    "int8" => TypeMapping::primitive("int8_t", 1),
    "char" => TypeMapping::primitive("uint8_t", 1),
    "uint8" => TypeMapping::primitive("uint8_t", 1),
    "int16" => TypeMapping::primitive("int16_t", 2),
    "uint16" => TypeMapping::primitive("uint16_t", 2),
    "int32" => TypeMapping::primitive("int32_t", 4),
    "uint32" => TypeMapping::primitive("uint32_t", 4),
    "int64" => TypeMapping::primitive("int64_t", 8),
    "uint64" => TypeMapping::primitive("uint64_t", 8),
    "float32" => TypeMapping::primitive("float", 4),
    "float64" => TypeMapping::primitive("double", 8),
    "time" => TypeMapping {
        target_type: "ros::Time",
        wire_size: 8,
        codec: Codec::Time,
        dependencies: &["ros/time"],
    },
    "duration" => TypeMapping {
        target_type: "ros::Duration",
        wire_size: 8,
        codec: Codec::Time,
        dependencies: &["ros/duration"],
    },
    "string" => TypeMapping {
        target_type: "char*",
        wire_size: 0,
        codec: Codec::String,
        dependencies: &[],
    },
    "Header" => TypeMapping {
        target_type: "std_msgs::Header",
        wire_size: 0,
        codec: Codec::Message,
        dependencies: &["std_msgs/Header"],
    },
};

/// Immutable lookup table from wire type name to [`TypeMapping`].
///
/// Iteration is ordered by wire type name so anything derived from the table
/// (generator requests, listings) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeMap {
    entries: BTreeMap<String, TypeMapping>,
}

impl TypeMap {
    /// The table used for STM32 targets.
    pub fn stm32() -> Self {
        Self::from_entries(STM32_TYPES.entries().map(|(name, mapping)| (*name, *mapping)))
    }

    /// Builds a table from `(wire type, mapping)` pairs. Later duplicates win.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, TypeMapping)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, mapping)| (name.to_string(), mapping))
                .collect(),
        }
    }

    pub fn get(&self, wire_type: &str) -> Option<&TypeMapping> {
        self.entries.get(wire_type)
    }

    /// Looks up a wire type, failing with [`Error::UnknownWireType`] if absent.
    pub fn resolve(&self, wire_type: &str) -> Result<&TypeMapping> {
        self.get(wire_type)
            .ok_or_else(|| Error::UnknownWireType(wire_type.to_string()))
    }

    /// Checks that every given wire type is declared.
    ///
    /// Returns the first missing type as [`Error::UnknownWireType`].
    pub fn check_coverage<'a, I>(&self, wire_types: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for wire_type in wire_types {
            self.resolve(wire_type)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeMapping)> {
        self.entries.iter().map(|(name, mapping)| (name.as_str(), mapping))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::stm32()
    }
}
