//! NV40 FIFO command format and 3D-class method table.
//!
//! - [`nv40_cmd`]: method header / control word encoding plus a stream decoder.
//! - [`nv40_3d`]: method addresses and enumerated argument values for the 3D object.

pub mod nv40_3d;
pub mod nv40_cmd;
