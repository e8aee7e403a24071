use crate::{
    swap_halfwords, Batches, ClearBuffers, CommandFifo, FragmentProgram, GpuContext, HostFifo,
    IoMapping, Nv40IndexType, Nv40Location, Nv40PrimitiveType, RenderTargets, Texture,
    VertexProgram,
};
use proptest::prelude::*;
use reality_protocol::nv40::nv40_cmd::{Nv40CmdIter, Nv40CmdPacket};

const RING_WORDS: usize = 8192;
const MAX_OPS: usize = 48;

#[derive(Debug, Clone)]
enum Op {
    ClearColor(u32),
    Clear(u32),
    RenderTarget { log2_w: u8, log2_h: u8 },
    Viewport(u16, u16),
    BlendFunc(u32, u32),
    DepthControl(bool, bool, bool),
    Texture(u32),
    Vertex([f32; 4]),
    DrawArrays { start: u32, count: u32 },
    DrawIndexed { offset: u32, count: u32 },
    VertexProgram { insts: usize, constants: usize },
    Constant(u32),
}

impl Op {
    /// Words the operation is documented to emit.
    fn words(&self) -> usize {
        match self {
            Op::ClearColor(_) => 2,
            Op::Clear(_) => 4,
            Op::RenderTarget { .. } => 11,
            Op::Viewport(..) => 3,
            Op::BlendFunc(..) => 3,
            Op::DepthControl(..) => 2,
            Op::Texture(_) => 11,
            Op::Vertex(_) => 5,
            Op::DrawArrays { count, .. } => 4 + 2 * batches(*count) + 2,
            Op::DrawIndexed { count, .. } => 7 + 2 * batches(*count) + 2,
            Op::VertexProgram { insts, constants } => insts * 5 + 7 + constants * 6,
            Op::Constant(_) => 6,
        }
    }
}

fn batches(count: u32) -> usize {
    count.div_ceil(256) as usize
}

fn any_f32() -> impl Strategy<Value = f32> {
    // Raw bit patterns, so NaN payloads, signed zeros, infinities and
    // subnormals all show up.
    any::<u32>().prop_map(f32::from_bits)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::ClearColor),
        (0u32..0x100).prop_map(Op::Clear),
        (0u8..13, 0u8..13).prop_map(|(log2_w, log2_h)| Op::RenderTarget { log2_w, log2_h }),
        (any::<u16>(), any::<u16>()).prop_map(|(w, h)| Op::Viewport(w, h)),
        (any::<u32>(), any::<u32>()).prop_map(|(s, d)| Op::BlendFunc(s, d)),
        (any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(a, b, c)| Op::DepthControl(a, b, c)),
        (0u32..16).prop_map(Op::Texture),
        prop::array::uniform4(any_f32()).prop_map(Op::Vertex),
        (0u32..0x10_0000, 0u32..1200).prop_map(|(start, count)| Op::DrawArrays { start, count }),
        (any::<u32>(), 0u32..1200).prop_map(|(offset, count)| Op::DrawIndexed { offset, count }),
        (0usize..6, 0usize..4).prop_map(|(insts, constants)| Op::VertexProgram { insts, constants }),
        (0u32..468).prop_map(Op::Constant),
    ]
}

fn apply(ctx: &mut GpuContext<HostFifo>, op: &Op) {
    match op {
        Op::ClearColor(c) => ctx.set_clear_color(*c).unwrap(),
        Op::Clear(bits) => ctx.clear_buffers(ClearBuffers::from_bits_truncate(*bits)).unwrap(),
        Op::RenderTarget { log2_w, log2_h } => ctx
            .select_render_target(
                RenderTargets::COLOR0,
                0,
                1 << log2_w,
                1 << log2_h,
                0,
                0,
            )
            .unwrap(),
        Op::Viewport(w, h) => ctx.set_viewport(*w, *h).unwrap(),
        Op::BlendFunc(s, d) => ctx.set_blend_func(*s, *d).unwrap(),
        Op::DepthControl(a, b, c) => ctx.set_depth_control(*a, *b, *c).unwrap(),
        Op::Texture(unit) => ctx.set_texture(*unit, &Texture::default()).unwrap(),
        Op::Vertex([x, y, z, w]) => ctx.vertex4f(*x, *y, *z, *w).unwrap(),
        Op::DrawArrays { start, count } => ctx
            .draw_arrays(Nv40PrimitiveType::Triangles, *start, *count)
            .unwrap(),
        Op::DrawIndexed { offset, count } => ctx
            .draw_indexed(
                Nv40PrimitiveType::TriangleStrip,
                *offset,
                *count,
                Nv40IndexType::U16,
                Nv40Location::Main,
            )
            .unwrap(),
        Op::VertexProgram { insts, constants } => {
            let constants = (0..*constants as u32)
                .map(|index| crate::VertexConstant {
                    index,
                    values: [1.0, 2.0, 3.0, 4.0],
                })
                .collect();
            let vp = VertexProgram::new(vec![0xdead_beef; insts * 4], 0x1, 0x3)
                .unwrap()
                .with_constants(constants);
            ctx.load_vertex_program(&vp).unwrap();
        }
        Op::Constant(index) => ctx
            .set_vertex_program_constant(*index, [0.0, -0.0, 1.0, -1.0])
            .unwrap(),
    }
}

proptest! {
    #[test]
    fn batches_cover_count_exactly(first in 0u32..0x10_0000, count in 0u32..10_000) {
        let split: Vec<_> = Batches::new(first, count).collect();
        prop_assert_eq!(split.len(), batches(count));
        prop_assert_eq!(split.iter().map(|b| b.count).sum::<u32>(), count);

        let mut next = first;
        for b in &split {
            prop_assert!((1..=256).contains(&b.count));
            prop_assert_eq!(b.first, next);
            next += b.count;
        }
    }

    #[test]
    fn halfword_swap_is_an_involution(word in any::<u32>()) {
        prop_assert_eq!(swap_halfwords(swap_halfwords(word)), word);
    }

    #[test]
    fn installed_fragment_program_reads_back_swapped(ucode in prop::collection::vec(any::<u32>(), 1..64)) {
        let mut storage = vec![0u32; ucode.len()];
        let map = IoMapping::of_slice(&storage, 0x0010_0000);
        let mut fp = FragmentProgram::new(ucode.clone(), 2);
        prop_assert_eq!(fp.install(&mut storage, &map), Ok(0x0010_0000));
        for (stored, original) in storage.iter().zip(&ucode) {
            prop_assert_eq!(swap_halfwords(*stored), *original);
        }
    }

    #[test]
    fn float_arguments_keep_their_bits(v in prop::array::uniform4(any_f32())) {
        let mut ctx = GpuContext::new(HostFifo::new(64, 0)).unwrap();
        let start = ctx.cursor();
        ctx.vertex4f(v[0], v[1], v[2], v[3]).unwrap();
        let args = &ctx.fifo().ring()[start + 1..ctx.cursor()];
        prop_assert_eq!(args, &v.map(f32::to_bits)[..]);
    }

    #[test]
    fn every_builder_writes_what_it_reserves(ops in prop::collection::vec(op_strategy(), 1..MAX_OPS)) {
        let mut ctx = GpuContext::new(HostFifo::new(RING_WORDS, 0)).unwrap();
        let skip = ctx.cursor();
        let total: usize = ops.iter().map(Op::words).sum();

        for op in &ops {
            let before = ctx.cursor();
            let reservations = ctx.stats().words_reserved;
            apply(&mut ctx, op);
            prop_assert_eq!(ctx.cursor() - before, op.words(), "{:?}", op);
            prop_assert_eq!(
                (ctx.stats().words_reserved - reservations) as usize,
                op.words()
            );
        }

        // The whole stream decodes as well-formed method packets.
        let stream = &ctx.fifo().ring()[skip..ctx.cursor()];
        let mut decoded = 0;
        for packet in Nv40CmdIter::new(stream) {
            let packet = packet.unwrap();
            let is_method = matches!(packet, Nv40CmdPacket::Method { .. });
            prop_assert!(is_method);
            decoded += packet.len_words();
        }
        prop_assert_eq!(decoded, total);
    }
}
