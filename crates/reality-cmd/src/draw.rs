//! Vertex array and indexed draws, split into hardware-sized batches.

use reality_protocol::nv40::nv40_3d::{
    Nv40IndexType, Nv40Location, Nv40PrimitiveType, NV30_3D_IDXBUF_OFFSET,
    NV30_3D_VB_BATCH_COUNT_SHIFT, NV30_3D_VB_BATCH_MAX, NV30_3D_VB_BATCH_START_MASK,
    NV30_3D_VB_INDEX_BATCH, NV30_3D_VB_VERTEX_BATCH, NV30_3D_VERTEX_BEGIN_END,
    NV30_3D_VERTEX_BEGIN_END_STOP, NV40_3D_VTX_CACHE_INVALIDATE,
};

use crate::buffer::GpuContext;
use crate::encode::cmd_words;
use crate::error::Result;
use crate::fifo::CommandFifo;

/// One `VB_*_BATCH` command's worth of elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Batch {
    pub first: u32,
    /// Always in `1..=256`.
    pub count: u32,
}

impl Batch {
    /// Batch command argument: `(count - 1) << 24 | first`.
    pub fn word(self) -> u32 {
        debug_assert!((1..=NV30_3D_VB_BATCH_MAX).contains(&self.count));
        debug_assert!(
            self.first <= NV30_3D_VB_BATCH_START_MASK,
            "batch start {:#x} does not fit in 24 bits",
            self.first
        );
        ((self.count - 1) << NV30_3D_VB_BATCH_COUNT_SHIFT) | self.first
    }
}

/// Splits `count` elements starting at `first` into batches of at most 256.
///
/// Yields nothing for `count == 0`.
#[derive(Clone, Debug)]
pub struct Batches {
    next: u32,
    remaining: u32,
}

impl Batches {
    pub fn new(first: u32, count: u32) -> Self {
        Self {
            next: first,
            remaining: count,
        }
    }
}

impl Iterator for Batches {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.remaining == 0 {
            return None;
        }
        let count = self.remaining.min(NV30_3D_VB_BATCH_MAX);
        let batch = Batch {
            first: self.next,
            count,
        };
        self.remaining -= count;
        self.next = self.next.wrapping_add(count);
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.div_ceil(NV30_3D_VB_BATCH_MAX) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Batches {}

impl std::iter::FusedIterator for Batches {}

impl<F: CommandFifo> GpuContext<F> {
    /// Draw `count` vertices of the bound vertex arrays starting at `start`.
    pub fn draw_arrays(&mut self, prim: Nv40PrimitiveType, start: u32, count: u32) -> Result<()> {
        {
            let mut res = self.reserve(2 * cmd_words(1))?;
            res.put_cmd(NV40_3D_VTX_CACHE_INVALIDATE, [0]);
            res.put_cmd(NV30_3D_VERTEX_BEGIN_END, [prim as u32]);
        }
        self.emit_batches(NV30_3D_VB_VERTEX_BATCH, Batches::new(start, count))?;
        self.end_primitive()
    }

    /// Draw `count` indices from the index buffer at `offset`.
    ///
    /// Batches address the index buffer from element 0.
    pub fn draw_indexed(
        &mut self,
        prim: Nv40PrimitiveType,
        offset: u32,
        count: u32,
        index_type: Nv40IndexType,
        location: Nv40Location,
    ) -> Result<()> {
        {
            let mut res = self.reserve(cmd_words(1) + cmd_words(2) + cmd_words(1))?;
            res.put_cmd(NV40_3D_VTX_CACHE_INVALIDATE, [0]);
            res.put_cmd(
                NV30_3D_IDXBUF_OFFSET,
                [offset, index_type as u32 | location as u32],
            );
            res.put_cmd(NV30_3D_VERTEX_BEGIN_END, [prim as u32]);
        }
        self.emit_batches(NV30_3D_VB_INDEX_BATCH, Batches::new(0, count))?;
        self.end_primitive()
    }

    fn emit_batches(&mut self, method: u32, batches: Batches) -> Result<()> {
        for batch in batches {
            let mut res = self.reserve(cmd_words(1))?;
            res.put_cmd(method, [batch.word()]);
        }
        Ok(())
    }

    fn end_primitive(&mut self) -> Result<()> {
        let mut res = self.reserve(cmd_words(1))?;
        res.put_cmd(NV30_3D_VERTEX_BEGIN_END, [NV30_3D_VERTEX_BEGIN_END_STOP]);
        Ok(())
    }
}
