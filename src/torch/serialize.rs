//! Serialization of torch types
#![allow(clippy::use_self)] // created by serde derive for DeviceDef

use serde::{Deserialize, Serialize};
use tch::Device;

/// Remote serialization definition for [`tch::Device`].
///
/// Use `#[serde(with = "DeviceDef")]` when serializing a field of type [`Device`].
#[derive(Serialize, Deserialize)]
#[serde(remote = "Device")]
pub enum DeviceDef {
    Cpu,
    Cuda(usize),
}
