#![allow(dead_code)]

use reality_cmd::{CommandFifo, GpuContext, HostFifo};
use reality_protocol::nv40::nv40_cmd::{Nv40CmdIter, Nv40CmdPacket, Nv40MethodMode};

pub const RING_WORDS: usize = 1024;

pub fn context() -> GpuContext<HostFifo> {
    GpuContext::new(HostFifo::new(RING_WORDS, 0x0010_0000)).expect("ring config is valid")
}

/// Run `f` and return the method packets it wrote as `(method, args)` pairs.
///
/// Fails the test if anything other than increasing-mode method packets on
/// subchannel 0 was written.
pub fn capture(
    ctx: &mut GpuContext<HostFifo>,
    f: impl FnOnce(&mut GpuContext<HostFifo>),
) -> Vec<(u32, Vec<u32>)> {
    let start = ctx.cursor();
    f(ctx);
    let end = ctx.cursor();
    assert!(end >= start, "ring wrapped during capture");
    decode(&ctx.fifo().ring()[start..end])
}

pub fn decode(words: &[u32]) -> Vec<(u32, Vec<u32>)> {
    Nv40CmdIter::new(words)
        .map(|packet| match packet.expect("stream decodes") {
            Nv40CmdPacket::Method { header, args } => {
                assert_eq!(header.subchannel, 0);
                assert_eq!(header.mode, Nv40MethodMode::Increasing);
                (header.method, args.to_vec())
            }
            other => panic!("unexpected control word {other:?}"),
        })
        .collect()
}

/// Words written by `f`.
pub fn words_written(
    ctx: &mut GpuContext<HostFifo>,
    f: impl FnOnce(&mut GpuContext<HostFifo>),
) -> usize {
    let start = ctx.cursor();
    f(ctx);
    ctx.cursor() - start
}
