/// The consumer side of a command ring.
///
/// Implementations own the GPU-visible words the ring lives in and talk to the
/// command processor's PUT/GET registers. Offsets are IO-space byte offsets as
/// seen by the GPU; `base_offset()` is the offset of `ring()[0]`.
pub trait CommandFifo {
    fn ring(&self) -> &[u32];

    fn ring_mut(&mut self) -> &mut [u32];

    fn base_offset(&self) -> u32;

    /// Publish everything before `put` to the command processor.
    fn set_put(&mut self, put: u32);

    /// Current fetch offset of the command processor.
    ///
    /// May return offsets outside the ring (for example while the consumer is
    /// executing a called sub-buffer); callers ignore those and poll again. An
    /// implementation may block here; it decides how long to wait.
    fn get(&mut self) -> u32;
}

/// A ring in host memory whose consumer is always caught up.
///
/// `get()` returns the last published PUT, i.e. the command processor is idle
/// whenever it is asked. Useful for capturing streams in tooling and tests.
#[derive(Debug, Clone)]
pub struct HostFifo {
    words: Vec<u32>,
    base_offset: u32,
    put: u32,
    put_count: u64,
}

impl HostFifo {
    pub fn new(size_words: usize, base_offset: u32) -> Self {
        Self {
            words: vec![0u32; size_words],
            base_offset,
            put: base_offset,
            put_count: 0,
        }
    }

    /// Last published PUT.
    pub fn put(&self) -> u32 {
        self.put
    }

    /// Number of `set_put` calls seen.
    pub fn put_count(&self) -> u64 {
        self.put_count
    }
}

impl CommandFifo for HostFifo {
    fn ring(&self) -> &[u32] {
        &self.words
    }

    fn ring_mut(&mut self) -> &mut [u32] {
        &mut self.words
    }

    fn base_offset(&self) -> u32 {
        self.base_offset
    }

    fn set_put(&mut self, put: u32) {
        self.put = put;
        self.put_count += 1;
    }

    fn get(&mut self) -> u32 {
        self.put
    }
}

impl<F: CommandFifo + ?Sized> CommandFifo for &mut F {
    fn ring(&self) -> &[u32] {
        (**self).ring()
    }

    fn ring_mut(&mut self) -> &mut [u32] {
        (**self).ring_mut()
    }

    fn base_offset(&self) -> u32 {
        (**self).base_offset()
    }

    fn set_put(&mut self, put: u32) {
        (**self).set_put(put)
    }

    fn get(&mut self) -> u32 {
        (**self).get()
    }
}
