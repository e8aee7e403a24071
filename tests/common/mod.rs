//! Shared helpers for end-to-end command stream tests.
//!
//! [`SimFifo`] plays the command processor: every GET poll it fetches a few
//! packets between GET and PUT, follows jumps and records the methods it
//! executed. Because it reads the ring lazily, a producer that overwrites words
//! the consumer has not fetched yet shows up as a corrupted method log.

#![allow(dead_code)]

use reality_cmd::{CommandFifo, GpuContext, HostFifo};
use reality_protocol::nv40::nv40_cmd::{
    decode_cmd_word, Nv40CmdIter, Nv40CmdPacket, Nv40CmdWord,
};

pub type Method = (u32, Vec<u32>);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

pub struct SimFifo {
    ring: Vec<u32>,
    base: u32,
    put: u32,
    get: u32,
    packets_per_poll: usize,
    executed: Vec<Method>,
    jumps_taken: usize,
}

impl SimFifo {
    pub fn new(size_words: usize, base: u32, packets_per_poll: usize) -> Self {
        Self {
            ring: vec![0; size_words],
            base,
            put: base,
            get: base,
            packets_per_poll,
            executed: Vec::new(),
            jumps_taken: 0,
        }
    }

    pub fn executed(&self) -> &[Method] {
        &self.executed
    }

    pub fn jumps_taken(&self) -> usize {
        self.jumps_taken
    }

    /// Run until GET reaches PUT.
    pub fn drain(&mut self) {
        while self.step() {}
    }

    fn index(&self, offset: u32) -> usize {
        ((offset - self.base) / 4) as usize
    }

    /// Fetch one packet. Returns false when idle.
    fn step(&mut self) -> bool {
        if self.get == self.put {
            return false;
        }
        let at = self.index(self.get);
        let word = self.ring[at];
        match decode_cmd_word(word) {
            Ok(Nv40CmdWord::Method(header)) => {
                let count = header.count as usize;
                if count > 0 {
                    let args = self.ring[at + 1..at + 1 + count].to_vec();
                    self.executed.push((header.method, args));
                }
                self.get += 4 * (1 + count as u32);
            }
            Ok(Nv40CmdWord::Jump { offset }) => {
                self.jumps_taken += 1;
                self.get = offset;
            }
            other => panic!("command processor fetched {other:?} at word {at}"),
        }
        true
    }
}

impl CommandFifo for SimFifo {
    fn ring(&self) -> &[u32] {
        &self.ring
    }

    fn ring_mut(&mut self) -> &mut [u32] {
        &mut self.ring
    }

    fn base_offset(&self) -> u32 {
        self.base
    }

    fn set_put(&mut self, put: u32) {
        self.put = put;
    }

    fn get(&mut self) -> u32 {
        for _ in 0..self.packets_per_poll {
            if !self.step() {
                break;
            }
        }
        self.get
    }
}

/// Methods `f` emits into a ring large enough that it never wraps.
pub fn reference_stream(f: impl FnOnce(&mut GpuContext<HostFifo>)) -> Vec<Method> {
    let mut ctx = GpuContext::new(HostFifo::new(1 << 16, 0)).expect("ring config is valid");
    let start = ctx.cursor();
    f(&mut ctx);
    assert_eq!(ctx.stats().wraps, 0);
    Nv40CmdIter::new(&ctx.fifo().ring()[start..ctx.cursor()])
        .map(|packet| match packet.expect("stream decodes") {
            Nv40CmdPacket::Method { header, args } => (header.method, args.to_vec()),
            other => panic!("unexpected control word {other:?}"),
        })
        .collect()
}
