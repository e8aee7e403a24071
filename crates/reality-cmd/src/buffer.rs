//! Producer side of the command ring: reservations and flow control.
//!
//! Ring layout (words):
//!
//! ```text
//! 0            skip_words                                  capacity-1
//! +------------+--------------------------------------------+-------+
//! | NOP skips  |  commands ...                              | jump  |
//! +------------+--------------------------------------------+-------+
//! ```
//!
//! The last word is never handed out so a jump back to the ring base always
//! fits. While the consumer fetches ahead of the writer (after a wrap), usable
//! space stops one word short of GET so PUT can never catch up with GET from
//! behind.

use reality_protocol::nv40::nv40_cmd::{nv40_jump, NV40_JUMP_OFFSET_MASK};
use tracing::{debug, trace, warn};

use crate::config::RingConfig;
use crate::error::{CommandBufferError, Result};
use crate::fifo::CommandFifo;

/// Smallest command (header + one argument).
const MIN_COMMAND_WORDS: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RingStats {
    pub reservations: u64,
    pub words_reserved: u64,
    pub wraps: u64,
    pub wait_polls: u64,
}

/// One producer's view of a command ring.
///
/// A context assumes it is the only writer of its ring; it does no locking.
pub struct GpuContext<F: CommandFifo> {
    fifo: F,
    config: RingConfig,
    base: u32,
    capacity: usize,
    /// Next word to write.
    current: usize,
    /// End (exclusive) of the region known to be free.
    end: usize,
    /// Last published PUT, as a word index.
    put: usize,
    stats: RingStats,
}

impl<F: CommandFifo> GpuContext<F> {
    pub fn new(fifo: F) -> Result<Self> {
        Self::with_config(fifo, RingConfig::default())
    }

    pub fn with_config(mut fifo: F, config: RingConfig) -> Result<Self> {
        let capacity = fifo.ring().len();
        let base = fifo.base_offset();

        if base % 4 != 0 {
            return Err(CommandBufferError::InvalidConfig(
                "ring base offset must be 4-byte aligned",
            ));
        }
        if capacity < config.skip_words + MIN_COMMAND_WORDS + 1 {
            return Err(CommandBufferError::InvalidConfig(
                "ring too small for the skip area, one command and the jump slot",
            ));
        }
        let last_word = u64::from(base) + (capacity as u64 - 1) * 4;
        if last_word > u64::from(NV40_JUMP_OFFSET_MASK) {
            return Err(CommandBufferError::InvalidConfig(
                "ring extends past the range a jump can address",
            ));
        }

        fifo.ring_mut()[..config.skip_words].fill(0);

        let mut ctx = Self {
            fifo,
            config,
            base,
            capacity,
            current: config.skip_words,
            end: capacity - 1,
            put: config.skip_words,
            stats: RingStats::default(),
        };
        let put = ctx.offset_of(ctx.put);
        ctx.fifo.set_put(put);

        debug!(
            capacity_words = capacity,
            base_offset = base,
            skip_words = config.skip_words,
            "command ring created"
        );
        Ok(ctx)
    }

    /// Reserve `words` contiguous words at the cursor.
    ///
    /// Waits for the consumer (and wraps the ring) as needed. The returned
    /// guard must be filled with exactly `words` words before it is dropped.
    pub fn reserve(&mut self, words: usize) -> Result<Reservation<'_>> {
        self.make_room(words)?;
        self.stats.reservations += 1;
        self.stats.words_reserved += words as u64;

        let start = self.current;
        let ring = self.fifo.ring_mut();
        Ok(Reservation {
            slots: &mut ring[start..start + words],
            written: 0,
            cursor: &mut self.current,
        })
    }

    /// Publish everything written so far.
    pub fn flush(&mut self) {
        if self.put != self.current {
            self.put = self.current;
            let put = self.offset_of(self.current);
            self.fifo.set_put(put);
        }
    }

    /// Cursor as a word index into the ring.
    pub fn cursor(&self) -> usize {
        self.current
    }

    /// End (exclusive) of the currently known-free region.
    pub fn region_end(&self) -> usize {
        self.end
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn base_offset(&self) -> u32 {
        self.base
    }

    /// Largest reservation that can ever be satisfied.
    pub fn max_reservation(&self) -> usize {
        self.capacity - 1 - self.config.skip_words
    }

    /// IO offset of ring word `index`.
    pub fn offset_of(&self, index: usize) -> u32 {
        self.base + (index as u32) * 4
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn stats(&self) -> RingStats {
        self.stats
    }

    pub fn fifo(&self) -> &F {
        &self.fifo
    }

    pub fn fifo_mut(&mut self) -> &mut F {
        &mut self.fifo
    }

    /// Flush and hand the fifo back.
    pub fn into_fifo(mut self) -> F {
        self.flush();
        self.fifo
    }

    fn tail(&self) -> usize {
        self.capacity - 1
    }

    fn make_room(&mut self, words: usize) -> Result<()> {
        let max = self.max_reservation();
        if words > max {
            return Err(CommandBufferError::ReservationTooLarge { words, max });
        }

        let mut polls = 0u32;
        while self.end - self.current < words {
            self.flush();

            // Discard GET while the consumer is outside the ring or still
            // fetching the skip area.
            let get = match self.poll_get(&mut polls)? {
                Some(get) if get >= self.config.skip_words => get,
                _ => continue,
            };

            let get = if get <= self.current {
                // Consumer is behind us on this lap (or idle): free up to the tail.
                self.end = self.tail();
                if self.end - self.current >= words {
                    break;
                }
                self.wrap(&mut polls)?
            } else {
                get
            };

            // Consumer is ahead of us, one lap back.
            self.end = get - 1;
        }
        Ok(())
    }

    /// Jump back to the start of the ring. Returns the GET observed once the
    /// consumer left the skip area.
    fn wrap(&mut self, polls: &mut u32) -> Result<usize> {
        let at = self.current;
        let jump = nv40_jump(self.base);
        self.fifo.ring_mut()[at] = jump;

        // PUT still points at the jump; the consumer stops in front of it until
        // PUT moves. Only move PUT into the skip area once GET is past it.
        let get = loop {
            if let Some(get) = self.poll_get(polls)? {
                if get > self.config.skip_words {
                    break get;
                }
            }
        };

        let skip = self.config.skip_words;
        self.current = skip;
        self.put = skip;
        let put = self.offset_of(skip);
        self.fifo.set_put(put);
        self.stats.wraps += 1;

        debug!(
            jump_at = at,
            get,
            wraps = self.stats.wraps,
            "command ring wrapped"
        );
        Ok(get)
    }

    fn poll_get(&mut self, polls: &mut u32) -> Result<Option<usize>> {
        if let Some(limit) = self.config.max_wait_polls {
            if *polls >= limit {
                warn!(
                    polls = *polls,
                    cursor = self.current,
                    "command processor is not making room"
                );
                return Err(CommandBufferError::Stalled { polls: *polls });
            }
        }
        *polls += 1;
        self.stats.wait_polls += 1;

        let get = self.fifo.get();
        trace!(get, cursor = self.current, "waiting for command processor");
        Ok(self.word_index(get))
    }

    fn word_index(&self, offset: u32) -> Option<usize> {
        let rel = offset.checked_sub(self.base)?;
        if rel % 4 != 0 {
            return None;
        }
        let index = (rel / 4) as usize;
        (index < self.capacity).then_some(index)
    }
}

/// Scoped write access to a reserved block of ring words.
///
/// Dropping the guard advances the ring cursor by the number of words written
/// and asserts that the whole reservation was used.
pub struct Reservation<'a> {
    slots: &'a mut [u32],
    written: usize,
    cursor: &'a mut usize,
}

impl Reservation<'_> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn remaining(&self) -> usize {
        self.slots.len() - self.written
    }

    /// Append one raw word.
    pub fn put(&mut self, word: u32) {
        assert!(
            self.written < self.slots.len(),
            "command reservation overrun: {} words reserved",
            self.slots.len()
        );
        self.slots[self.written] = word;
        self.written += 1;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        *self.cursor += self.written;
        if !std::thread::panicking() {
            assert_eq!(
                self.written,
                self.slots.len(),
                "command reservation underrun: {} of {} words written",
                self.written,
                self.slots.len()
            );
        }
    }
}
