//! Vertex program upload and fragment program placement.

use std::num::NonZeroU32;

use reality_protocol::nv40::nv40_3d::{
    nv30_3d_vp_upload_inst, NV30_3D_FP_ACTIVE_PROGRAM, NV30_3D_FP_ACTIVE_PROGRAM_DMA0,
    NV30_3D_FP_CONTROL, NV30_3D_VP_START_FROM_ID, NV30_3D_VP_UPLOAD_CONST_ID,
    NV30_3D_VP_UPLOAD_FROM_ID, NV40_3D_FP_CONTROL_TEMP_COUNT_SHIFT, NV40_3D_VP_ATTRIB_EN,
};
use tracing::debug;

use crate::address::AddressResolver;
use crate::buffer::GpuContext;
use crate::encode::cmd_words;
use crate::error::{ProgramError, Result};
use crate::fifo::CommandFifo;

/// Machine words per vertex program instruction.
pub const VP_INSTRUCTION_WORDS: usize = 4;

/// Fixed overhead of a vertex program upload: UPLOAD_FROM_ID, START_FROM_ID
/// and ATTRIB_EN.
const VP_UPLOAD_OVERHEAD_WORDS: usize = cmd_words(1) + cmd_words(1) + cmd_words(2);

/// Swap the two 16-bit halves of a fragment program word.
///
/// Fragment program memory is fetched in the opposite half-word order to the
/// assembler's output.
pub const fn swap_halfwords(word: u32) -> u32 {
    word.rotate_left(16)
}

fn words_from_be_bytes(bytes: &[u8]) -> std::result::Result<Vec<u32>, ProgramError> {
    if bytes.len() % 4 != 0 {
        return Err(ProgramError::UnalignedBlob(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexConstant {
    pub index: u32,
    pub values: [f32; 4],
}

/// An assembled vertex program.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexProgram {
    instructions: Vec<u32>,
    input_mask: u32,
    output_mask: u32,
    constants: Vec<VertexConstant>,
}

impl VertexProgram {
    pub fn new(
        instructions: Vec<u32>,
        input_mask: u32,
        output_mask: u32,
    ) -> std::result::Result<Self, ProgramError> {
        if instructions.len() % VP_INSTRUCTION_WORDS != 0 {
            return Err(ProgramError::RaggedInstructions(instructions.len()));
        }
        Ok(Self {
            instructions,
            input_mask,
            output_mask,
            constants: Vec::new(),
        })
    }

    /// Build from big-endian microcode as emitted by the shader assembler.
    pub fn from_be_bytes(
        ucode: &[u8],
        input_mask: u32,
        output_mask: u32,
    ) -> std::result::Result<Self, ProgramError> {
        Self::new(words_from_be_bytes(ucode)?, input_mask, output_mask)
    }

    pub fn with_constants(mut self, constants: Vec<VertexConstant>) -> Self {
        self.constants = constants;
        self
    }

    pub fn instructions(&self) -> &[u32] {
        &self.instructions
    }

    pub fn num_insts(&self) -> usize {
        self.instructions.len() / VP_INSTRUCTION_WORDS
    }

    pub fn input_mask(&self) -> u32 {
        self.input_mask
    }

    pub fn output_mask(&self) -> u32 {
        self.output_mask
    }

    pub fn constants(&self) -> &[VertexConstant] {
        &self.constants
    }

    /// Words `load_vertex_program` reserves for the instruction upload.
    pub fn upload_words(&self) -> usize {
        self.num_insts() * cmd_words(VP_INSTRUCTION_WORDS) + VP_UPLOAD_OVERHEAD_WORDS
    }
}

/// An assembled fragment program.
///
/// Fragment programs execute from GPU memory. [`install`](Self::install) must
/// run before the program can be bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentProgram {
    ucode: Vec<u32>,
    num_regs: u32,
    offset: Option<NonZeroU32>,
}

impl FragmentProgram {
    pub fn new(ucode: Vec<u32>, num_regs: u32) -> Self {
        Self {
            ucode,
            num_regs,
            offset: None,
        }
    }

    pub fn from_be_bytes(ucode: &[u8], num_regs: u32) -> std::result::Result<Self, ProgramError> {
        Ok(Self::new(words_from_be_bytes(ucode)?, num_regs))
    }

    pub fn ucode(&self) -> &[u32] {
        &self.ucode
    }

    pub fn size_words(&self) -> usize {
        self.ucode.len()
    }

    pub fn size_bytes(&self) -> usize {
        self.ucode.len() * 4
    }

    pub fn num_regs(&self) -> u32 {
        self.num_regs
    }

    /// IO offset of the installed copy.
    pub fn offset(&self) -> Option<u32> {
        self.offset.map(NonZeroU32::get)
    }

    pub fn is_resolved(&self) -> bool {
        self.offset.is_some()
    }

    /// Copy the program into GPU-visible `storage` (half-word swapped) and
    /// record the storage's IO offset.
    ///
    /// Installing again into the same or different storage is allowed.
    pub fn install<R: AddressResolver + ?Sized>(
        &mut self,
        storage: &mut [u32],
        resolver: &R,
    ) -> std::result::Result<u32, ProgramError> {
        if storage.len() < self.ucode.len() {
            return Err(ProgramError::StorageTooSmall {
                required: self.ucode.len(),
                available: storage.len(),
            });
        }
        for (dst, &src) in storage.iter_mut().zip(&self.ucode) {
            *dst = swap_halfwords(src);
        }

        let addr = storage.as_ptr() as usize;
        let offset = resolver
            .address_to_offset(addr)
            .and_then(NonZeroU32::new)
            .ok_or(ProgramError::Unmapped { addr })?;
        self.offset = Some(offset);

        debug!(
            offset = offset.get(),
            words = self.ucode.len(),
            num_regs = self.num_regs,
            "fragment program installed"
        );
        Ok(offset.get())
    }
}

impl<F: CommandFifo> GpuContext<F> {
    /// Upload `prog`'s microcode to slot 0, start execution there and upload
    /// its constants.
    pub fn load_vertex_program(&mut self, prog: &VertexProgram) -> Result<()> {
        {
            let mut res = self.reserve(prog.upload_words())?;
            res.put_cmd(NV30_3D_VP_UPLOAD_FROM_ID, [0]);
            for (i, inst) in prog.instructions.chunks_exact(VP_INSTRUCTION_WORDS).enumerate() {
                let index = (i * VP_INSTRUCTION_WORDS) as u32;
                res.put_cmd(
                    nv30_3d_vp_upload_inst(index),
                    [inst[0], inst[1], inst[2], inst[3]],
                );
            }
            res.put_cmd(NV30_3D_VP_START_FROM_ID, [0]);
            res.put_cmd(NV40_3D_VP_ATTRIB_EN, [prog.input_mask, prog.output_mask]);
        }

        for constant in &prog.constants {
            self.set_vertex_program_constant(constant.index, constant.values)?;
        }
        Ok(())
    }

    pub fn set_vertex_program_constant(&mut self, index: u32, values: [f32; 4]) -> Result<()> {
        let [x, y, z, w] = values.map(f32::to_bits);
        let mut res = self.reserve(cmd_words(5))?;
        res.put_cmd(NV30_3D_VP_UPLOAD_CONST_ID, [index, x, y, z, w]);
        Ok(())
    }

    /// Upload consecutive constants starting at `first`.
    pub fn set_vertex_program_constants(&mut self, first: u32, values: &[[f32; 4]]) -> Result<()> {
        for (n, v) in values.iter().enumerate() {
            self.set_vertex_program_constant(first + n as u32, *v)?;
        }
        Ok(())
    }

    /// Make `prog` the active fragment program.
    ///
    /// # Panics
    ///
    /// If `prog` has not been installed. Nothing is reserved or written in that
    /// case.
    pub fn bind_fragment_program(&mut self, prog: &FragmentProgram) -> Result<()> {
        let Some(offset) = prog.offset() else {
            panic!("fragment program bound before it was installed");
        };

        let mut res = self.reserve(2 * cmd_words(1))?;
        res.put_cmd(
            NV30_3D_FP_ACTIVE_PROGRAM,
            [offset | NV30_3D_FP_ACTIVE_PROGRAM_DMA0],
        );
        res.put_cmd(
            NV30_3D_FP_CONTROL,
            [prog.num_regs << NV40_3D_FP_CONTROL_TEMP_COUNT_SHIFT],
        );
        Ok(())
    }
}
