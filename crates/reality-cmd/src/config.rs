/// Tuning for a [`GpuContext`](crate::GpuContext)'s flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingConfig {
    /// NOP words kept at the start of the ring.
    ///
    /// After a wrap the producer only republishes PUT once GET has moved past
    /// this area, so an idle consumer can never be mistaken for a full ring.
    pub skip_words: usize,
    /// Upper bound on GET polls per reservation before giving up with
    /// [`CommandBufferError::Stalled`](crate::CommandBufferError::Stalled).
    ///
    /// `None` waits forever. Integrations talking to real hardware should set a
    /// bound so a wedged GPU surfaces as an error instead of a hang.
    pub max_wait_polls: Option<u32>,
}

impl RingConfig {
    pub const DEFAULT_SKIP_WORDS: usize = 8;
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            skip_words: Self::DEFAULT_SKIP_WORDS,
            max_wait_polls: None,
        }
    }
}
