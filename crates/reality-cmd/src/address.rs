/// Maps CPU addresses of GPU-visible memory to IO offsets.
///
/// Must be idempotent, and must return a non-zero offset for every address
/// inside GPU-visible memory. `None` means the address is not mapped.
pub trait AddressResolver {
    fn address_to_offset(&self, addr: usize) -> Option<u32>;
}

/// One contiguous CPU range mapped at a fixed IO offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoMapping {
    cpu_base: usize,
    len_bytes: usize,
    io_base: u32,
}

impl IoMapping {
    pub fn new(cpu_base: usize, len_bytes: usize, io_base: u32) -> Self {
        Self {
            cpu_base,
            len_bytes,
            io_base,
        }
    }

    /// Mapping covering exactly `words`.
    pub fn of_slice(words: &[u32], io_base: u32) -> Self {
        Self::new(words.as_ptr() as usize, core::mem::size_of_val(words), io_base)
    }

    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.cpu_base && addr - self.cpu_base < self.len_bytes
    }
}

impl AddressResolver for IoMapping {
    fn address_to_offset(&self, addr: usize) -> Option<u32> {
        if !self.contains(addr) {
            return None;
        }
        let rel = u32::try_from(addr - self.cpu_base).ok()?;
        self.io_base.checked_add(rel)
    }
}

impl AddressResolver for [IoMapping] {
    fn address_to_offset(&self, addr: usize) -> Option<u32> {
        self.iter().find_map(|m| m.address_to_offset(addr))
    }
}

impl<R: AddressResolver + ?Sized> AddressResolver for &R {
    fn address_to_offset(&self, addr: usize) -> Option<u32> {
        (**self).address_to_offset(addr)
    }
}
