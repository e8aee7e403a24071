//! Wire-level vocabulary for the NV40-family ("RSX") 3D command processor.
//!
//! Dependency-free, so host-side tooling that inspects captured command rings
//! can use it without pulling in the encoder.

pub mod nv40;
