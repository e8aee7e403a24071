//! Command stream encoder for the RSX (NV40-class) 3D engine.
//!
//! Commands are written into a ring of GPU-visible words that the command
//! processor fetches asynchronously. This crate provides:
//!
//! - [`GpuContext`]: the producer side of the ring, with reserve-then-write flow
//!   control and wraparound
//! - [`Reservation`]: a scoped block of reserved words plus the method packet
//!   encoder (`put_cmd` and friends)
//! - State builders for render targets, blending, depth, culling, vertex
//!   attributes and textures
//! - [`VertexProgram`] upload and [`FragmentProgram`] placement in GPU memory
//! - `draw_arrays` / `draw_indexed`, split into hardware-sized [`Batches`]
//!
//! The register vocabulary lives in `reality-protocol`. Talking to a real
//! command processor (mapping memory, reading GET) is left to a
//! [`CommandFifo`] implementation.

mod address;
mod buffer;
mod config;
mod draw;
mod encode;
mod error;
mod fifo;
mod program;
mod state;

pub use address::{AddressResolver, IoMapping};
pub use buffer::{GpuContext, Reservation, RingStats};
pub use config::RingConfig;
pub use draw::{Batch, Batches};
pub use encode::{cmd_words, f32_bits, MAX_CMD_ARGS};
pub use error::{CommandBufferError, ProgramError, Result};
pub use fifo::{CommandFifo, HostFifo};
pub use program::{
    swap_halfwords, FragmentProgram, VertexConstant, VertexProgram, VP_INSTRUCTION_WORDS,
};
pub use state::{ClearBuffers, RenderSurface, RenderTargets, SurfaceSlot, Texture, VertexAttribute};

pub use reality_protocol::nv40::nv40_3d::{
    Nv40IndexType, Nv40Location, Nv40PrimitiveType, Nv40VertexDataType,
};

#[cfg(test)]
mod proptests;
