//! NV40 3D-class (Curie) method addresses and argument values.
//!
//! Names follow the `NV30_3D_*` / `NV40_3D_*` register database: methods that
//! first appeared on NV30 keep the NV30 prefix.

/* ------------------------------- DMA objects ------------------------------ */

/// High tag of the DMA object handles the kernel binds for RSX local memory
/// (`| 0`) and main memory (`| 1`).
pub const NV40_DMA_CONTEXT_TAG: u32 = 0xfeed_0000;

pub const NV30_3D_DMA_COLOR1: u32 = 0x0000_018c;
pub const NV30_3D_DMA_COLOR0: u32 = 0x0000_0194;
pub const NV30_3D_DMA_ZETA: u32 = 0x0000_0198;
pub const NV40_3D_DMA_COLOR2: u32 = 0x0000_01b4;
pub const NV40_3D_DMA_COLOR3: u32 = 0x0000_01b8;

/// Memory a DMA-relative offset points into.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nv40Location {
    /// RSX local (video) memory.
    Local = 0,
    /// Cell main memory mapped into the RSX IO space.
    Main = 1,
}

/* ----------------------------- Render targets ----------------------------- */

pub const NV30_3D_RT_HORIZ: u32 = 0x0000_0200;
pub const NV30_3D_RT_VERT: u32 = 0x0000_0204;
pub const NV30_3D_RT_FORMAT: u32 = 0x0000_0208;
pub const NV30_3D_COLOR0_PITCH: u32 = 0x0000_020c;
pub const NV30_3D_COLOR0_OFFSET: u32 = 0x0000_0210;
pub const NV30_3D_ZETA_OFFSET: u32 = 0x0000_0214;
pub const NV30_3D_COLOR1_OFFSET: u32 = 0x0000_0218;
pub const NV30_3D_COLOR1_PITCH: u32 = 0x0000_021c;
pub const NV30_3D_RT_ENABLE: u32 = 0x0000_0220;
pub const NV40_3D_ZETA_PITCH: u32 = 0x0000_022c;
pub const NV40_3D_COLOR2_PITCH: u32 = 0x0000_0280;
pub const NV40_3D_COLOR3_PITCH: u32 = 0x0000_0284;
pub const NV40_3D_COLOR2_OFFSET: u32 = 0x0000_0288;
pub const NV40_3D_COLOR3_OFFSET: u32 = 0x0000_028c;

pub const NV30_3D_RT_FORMAT_LOG2_WIDTH_SHIFT: u32 = 16;
pub const NV30_3D_RT_FORMAT_LOG2_HEIGHT_SHIFT: u32 = 24;

pub const NV30_3D_RT_FORMAT_COLOR_R5G6B5: u32 = 0x0000_0003;
pub const NV30_3D_RT_FORMAT_COLOR_X8R8G8B8: u32 = 0x0000_0005;
pub const NV30_3D_RT_FORMAT_COLOR_A8R8G8B8: u32 = 0x0000_0008;
pub const NV30_3D_RT_FORMAT_ZETA_Z16: u32 = 0x0000_0020;
pub const NV30_3D_RT_FORMAT_ZETA_Z24S8: u32 = 0x0000_0040;
pub const NV30_3D_RT_FORMAT_TYPE_LINEAR: u32 = 0x0000_0100;
pub const NV30_3D_RT_FORMAT_TYPE_SWIZZLED: u32 = 0x0000_0200;

pub const NV30_3D_RT_ENABLE_COLOR0: u32 = 0x0000_0001;
pub const NV30_3D_RT_ENABLE_COLOR1: u32 = 0x0000_0002;
pub const NV40_3D_RT_ENABLE_COLOR2: u32 = 0x0000_0004;
pub const NV40_3D_RT_ENABLE_COLOR3: u32 = 0x0000_0008;
pub const NV30_3D_RT_ENABLE_MRT: u32 = 0x0000_0010;

pub const NV30_3D_VIEWPORT_TX_ORIGIN: u32 = 0x0000_02b8;
pub const NV30_3D_COORD_CONVENTIONS: u32 = 0x0000_1d88;
pub const NV30_3D_COORD_CONVENTIONS_ORIGIN_INVERTED: u32 = 0x0000_1000;

/// DMA/offset/pitch method triple of one render-surface slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nv40SurfaceMethods {
    pub dma: u32,
    pub offset: u32,
    pub pitch: u32,
}

/// Color 0..3 followed by zeta.
pub const NV40_SURFACE_METHODS: [Nv40SurfaceMethods; 5] = [
    Nv40SurfaceMethods {
        dma: NV30_3D_DMA_COLOR0,
        offset: NV30_3D_COLOR0_OFFSET,
        pitch: NV30_3D_COLOR0_PITCH,
    },
    Nv40SurfaceMethods {
        dma: NV30_3D_DMA_COLOR1,
        offset: NV30_3D_COLOR1_OFFSET,
        pitch: NV30_3D_COLOR1_PITCH,
    },
    Nv40SurfaceMethods {
        dma: NV40_3D_DMA_COLOR2,
        offset: NV40_3D_COLOR2_OFFSET,
        pitch: NV40_3D_COLOR2_PITCH,
    },
    Nv40SurfaceMethods {
        dma: NV40_3D_DMA_COLOR3,
        offset: NV40_3D_COLOR3_OFFSET,
        pitch: NV40_3D_COLOR3_PITCH,
    },
    Nv40SurfaceMethods {
        dma: NV30_3D_DMA_ZETA,
        offset: NV30_3D_ZETA_OFFSET,
        pitch: NV40_3D_ZETA_PITCH,
    },
];

/* -------------------------------- Viewport -------------------------------- */

pub const NV30_3D_VIEWPORT_HORIZ: u32 = 0x0000_0a00;
pub const NV30_3D_VIEWPORT_VERT: u32 = 0x0000_0a04;
pub const NV30_3D_VIEWPORT_TRANSLATE: u32 = 0x0000_0a20;
pub const NV30_3D_VIEWPORT_SCALE: u32 = 0x0000_0a30;

/* ---------------------------------- Clear --------------------------------- */

pub const NV40_3D_NOP: u32 = 0x0000_0100;
pub const NV30_3D_CLEAR_DEPTH_VALUE: u32 = 0x0000_1d8c;
pub const NV30_3D_CLEAR_COLOR_VALUE: u32 = 0x0000_1d90;
pub const NV30_3D_CLEAR_BUFFERS: u32 = 0x0000_1d94;

pub const NV30_3D_CLEAR_BUFFERS_DEPTH: u32 = 0x0000_0001;
pub const NV30_3D_CLEAR_BUFFERS_STENCIL: u32 = 0x0000_0002;
pub const NV30_3D_CLEAR_BUFFERS_COLOR_R: u32 = 0x0000_0010;
pub const NV30_3D_CLEAR_BUFFERS_COLOR_G: u32 = 0x0000_0020;
pub const NV30_3D_CLEAR_BUFFERS_COLOR_B: u32 = 0x0000_0040;
pub const NV30_3D_CLEAR_BUFFERS_COLOR_A: u32 = 0x0000_0080;

/* ---------------------------------- Blend --------------------------------- */

pub const NV30_3D_BLEND_FUNC_ENABLE: u32 = 0x0000_0310;
pub const NV30_3D_BLEND_FUNC_SRC: u32 = 0x0000_0314;
pub const NV30_3D_BLEND_FUNC_DST: u32 = 0x0000_0318;
pub const NV40_3D_BLEND_EQUATION: u32 = 0x0000_0320;

pub const NV40_3D_BLEND_EQUATION_FUNC_ADD: u32 = 0x8006;
pub const NV40_3D_BLEND_EQUATION_MIN: u32 = 0x8007;
pub const NV40_3D_BLEND_EQUATION_MAX: u32 = 0x8008;
pub const NV40_3D_BLEND_EQUATION_FUNC_SUBTRACT: u32 = 0x800a;
pub const NV40_3D_BLEND_EQUATION_FUNC_REVERSE_SUBTRACT: u32 = 0x800b;

pub const NV30_3D_BLEND_FACTOR_ZERO: u32 = 0x0000;
pub const NV30_3D_BLEND_FACTOR_ONE: u32 = 0x0001;
pub const NV30_3D_BLEND_FACTOR_SRC_COLOR: u32 = 0x0300;
pub const NV30_3D_BLEND_FACTOR_ONE_MINUS_SRC_COLOR: u32 = 0x0301;
pub const NV30_3D_BLEND_FACTOR_SRC_ALPHA: u32 = 0x0302;
pub const NV30_3D_BLEND_FACTOR_ONE_MINUS_SRC_ALPHA: u32 = 0x0303;
pub const NV30_3D_BLEND_FACTOR_DST_ALPHA: u32 = 0x0304;
pub const NV30_3D_BLEND_FACTOR_ONE_MINUS_DST_ALPHA: u32 = 0x0305;
pub const NV30_3D_BLEND_FACTOR_DST_COLOR: u32 = 0x0306;
pub const NV30_3D_BLEND_FACTOR_ONE_MINUS_DST_COLOR: u32 = 0x0307;

/* --------------------------------- Depth ---------------------------------- */

pub const NV30_3D_DEPTH_FUNC: u32 = 0x0000_0a6c;
pub const NV30_3D_DEPTH_WRITE_ENABLE: u32 = 0x0000_0a70;
pub const NV30_3D_DEPTH_TEST_ENABLE: u32 = 0x0000_0a74;
pub const NV30_3D_DEPTH_CONTROL: u32 = 0x0000_1d78;

pub const NV30_3D_DEPTH_CONTROL_CULL_NEAR_FAR_SHIFT: u32 = 0;
pub const NV30_3D_DEPTH_CONTROL_Z_CLAMP_SHIFT: u32 = 4;
pub const NV30_3D_DEPTH_CONTROL_CULL_IGNORE_W_SHIFT: u32 = 8;

pub const NV30_3D_COMPARE_NEVER: u32 = 0x0200;
pub const NV30_3D_COMPARE_LESS: u32 = 0x0201;
pub const NV30_3D_COMPARE_EQUAL: u32 = 0x0202;
pub const NV30_3D_COMPARE_LEQUAL: u32 = 0x0203;
pub const NV30_3D_COMPARE_GREATER: u32 = 0x0204;
pub const NV30_3D_COMPARE_NOTEQUAL: u32 = 0x0205;
pub const NV30_3D_COMPARE_GEQUAL: u32 = 0x0206;
pub const NV30_3D_COMPARE_ALWAYS: u32 = 0x0207;

/* ---------------------------------- Cull ---------------------------------- */

pub const NV30_3D_CULL_FACE: u32 = 0x0000_1830;
pub const NV30_3D_FRONT_FACE: u32 = 0x0000_1834;
pub const NV30_3D_CULL_FACE_ENABLE: u32 = 0x0000_183c;

pub const NV30_3D_CULL_FACE_FRONT: u32 = 0x0404;
pub const NV30_3D_CULL_FACE_BACK: u32 = 0x0405;
pub const NV30_3D_CULL_FACE_FRONT_AND_BACK: u32 = 0x0408;

pub const NV30_3D_FRONT_FACE_CW: u32 = 0x0900;
pub const NV30_3D_FRONT_FACE_CCW: u32 = 0x0901;

/* ------------------------------ Vertex input ------------------------------ */

pub const NV40_3D_VTX_CACHE_INVALIDATE: u32 = 0x0000_1714;
pub const NV30_3D_VERTEX_BEGIN_END: u32 = 0x0000_1808;
pub const NV30_3D_VB_VERTEX_BATCH: u32 = 0x0000_1814;
pub const NV30_3D_IDXBUF_OFFSET: u32 = 0x0000_181c;
pub const NV30_3D_IDXBUF_FORMAT: u32 = 0x0000_1820;
pub const NV30_3D_VB_INDEX_BATCH: u32 = 0x0000_1824;

/// Count field of a vertex/index batch word (stores `count - 1`).
pub const NV30_3D_VB_BATCH_COUNT_SHIFT: u32 = 24;
pub const NV30_3D_VB_BATCH_START_MASK: u32 = 0x00ff_ffff;
/// Hardware ceiling on elements per batch word.
pub const NV30_3D_VB_BATCH_MAX: u32 = 256;

pub const NV30_3D_VTXFMT_TYPE_MASK: u32 = 0x0000_000f;
pub const NV30_3D_VTXFMT_SIZE_SHIFT: u32 = 4;
pub const NV30_3D_VTXFMT_STRIDE_SHIFT: u32 = 8;
pub const NV30_3D_VTXBUF_LOCATION_SHIFT: u32 = 31;

pub const fn nv30_3d_vtxbuf(attr: u32) -> u32 {
    0x0000_1680 + 4 * attr
}

pub const fn nv30_3d_vtxfmt(attr: u32) -> u32 {
    0x0000_1740 + 4 * attr
}

pub const fn nv30_3d_vtx_attr_4f(attr: u32) -> u32 {
    0x0000_1c00 + 16 * attr
}

pub const fn nv30_3d_vtx_attr_2f(attr: u32) -> u32 {
    0x0000_1880 + 8 * attr
}

/// Attribute slot conventionally fed by texture coordinate 0.
pub const NV40_VTX_ATTR_TEXCOORD0: u32 = 8;

#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nv40PrimitiveType {
    Points = 1,
    Lines = 2,
    LineLoop = 3,
    LineStrip = 4,
    Triangles = 5,
    TriangleStrip = 6,
    TriangleFan = 7,
    Quads = 8,
    QuadStrip = 9,
    Polygon = 10,
}

/// `VERTEX_BEGIN_END` argument closing a primitive sequence.
pub const NV30_3D_VERTEX_BEGIN_END_STOP: u32 = 0;

#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nv40IndexType {
    U32 = 0x00,
    U16 = 0x10,
}

#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nv40VertexDataType {
    B8G8R8A8Unorm = 0,
    V16Snorm = 1,
    V32Float = 2,
    V16Float = 3,
    U8Unorm = 4,
    V16Sscaled = 5,
    U8Uscaled = 7,
}

/* ------------------------------- Textures -------------------------------- */

pub const NV40_3D_TEX_SIZE1_DEPTH_SHIFT: u32 = 20;

/// First of eight consecutive per-unit texture methods
/// (offset, format, wrap, enable, swizzle, filter, size0, border color).
pub const fn nv30_3d_tex_offset(unit: u32) -> u32 {
    0x0000_1a00 + 32 * unit
}

pub const fn nv40_3d_tex_size1(unit: u32) -> u32 {
    0x0000_1840 + 4 * unit
}

/* ---------------------------- Vertex programs ---------------------------- */

pub const NV30_3D_VP_UPLOAD_FROM_ID: u32 = 0x0000_1e9c;
pub const NV30_3D_VP_START_FROM_ID: u32 = 0x0000_1ea0;
pub const NV30_3D_VP_UPLOAD_CONST_ID: u32 = 0x0000_1efc;
pub const NV40_3D_VP_ATTRIB_EN: u32 = 0x0000_1ff0;

/// Instruction upload window; `index` counts words, so consecutive
/// 4-word instructions are addressed at `index = 0, 4, 8, ...`.
pub const fn nv30_3d_vp_upload_inst(index: u32) -> u32 {
    0x0000_0b80 + 4 * index
}

/* --------------------------- Fragment programs --------------------------- */

pub const NV30_3D_FP_ACTIVE_PROGRAM: u32 = 0x0000_08e4;
pub const NV30_3D_FP_ACTIVE_PROGRAM_DMA0: u32 = 0x0000_0001;
pub const NV30_3D_FP_ACTIVE_PROGRAM_DMA1: u32 = 0x0000_0002;
pub const NV30_3D_FP_CONTROL: u32 = 0x0000_1d60;
pub const NV40_3D_FP_CONTROL_TEMP_COUNT_SHIFT: u32 = 24;
