//! Core types for corral
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: dynamically-typed runtime value (the element type of every collection)
//! - TypeTag: closed classification of a value's kind
//! - Classification: classify output (tag plus concrete class name for typed objects)
//! - TypeRegistry: explicit class graph, registered functions, and the classifier
//! - Error: error type hierarchy
//! - Strictness: raise-on-violation vs. swallow-and-return-sentinel policy
//! - JSON interop: lossy-free conversion to and from `serde_json::Value`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod error;
pub mod json;
pub mod registry;
pub mod strict;
pub mod tag;
pub mod value;

pub use error::{Error, Result};
pub use registry::{ClassDef, NativeMethod, TypeRegistry};
pub use strict::Strictness;
pub use tag::{Classification, TypeTag};
pub use value::{Closure, Handle, Instance, InstanceId, Value};
