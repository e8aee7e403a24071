//! Fixed-function and binding state.
//!
//! Every builder reserves the exact number of words it emits in one block, so a
//! group of related methods is never split across a ring wrap.

use bitflags::bitflags;
use reality_protocol::nv40::nv40_3d::*;

use crate::buffer::GpuContext;
use crate::encode::{cmd_words, f32_bits};
use crate::error::Result;
use crate::fifo::CommandFifo;

bitflags! {
    /// `RT_ENABLE` color target mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderTargets: u32 {
        const COLOR0 = NV30_3D_RT_ENABLE_COLOR0;
        const COLOR1 = NV30_3D_RT_ENABLE_COLOR1;
        const COLOR2 = NV40_3D_RT_ENABLE_COLOR2;
        const COLOR3 = NV40_3D_RT_ENABLE_COLOR3;
        const MRT = NV30_3D_RT_ENABLE_MRT;
    }
}

bitflags! {
    /// `CLEAR_BUFFERS` plane mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ClearBuffers: u32 {
        const DEPTH = NV30_3D_CLEAR_BUFFERS_DEPTH;
        const STENCIL = NV30_3D_CLEAR_BUFFERS_STENCIL;
        const COLOR_R = NV30_3D_CLEAR_BUFFERS_COLOR_R;
        const COLOR_G = NV30_3D_CLEAR_BUFFERS_COLOR_G;
        const COLOR_B = NV30_3D_CLEAR_BUFFERS_COLOR_B;
        const COLOR_A = NV30_3D_CLEAR_BUFFERS_COLOR_A;
        const COLOR = Self::COLOR_R.bits() | Self::COLOR_G.bits() | Self::COLOR_B.bits() | Self::COLOR_A.bits();
    }
}

/// Render surface slot: four color targets and depth/stencil.
#[repr(usize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceSlot {
    Color0 = 0,
    Color1 = 1,
    Color2 = 2,
    Color3 = 3,
    Zeta = 4,
}

impl SurfaceSlot {
    pub const fn methods(self) -> Nv40SurfaceMethods {
        NV40_SURFACE_METHODS[self as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSurface {
    pub slot: SurfaceSlot,
    pub location: Nv40Location,
    pub offset: u32,
    pub pitch: u32,
}

/// Sampling state of one texture unit. Words are passed through unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Texture {
    pub offset: u32,
    pub format: u32,
    pub wrap: u32,
    pub enable: u32,
    pub swizzle: u32,
    pub filter: u32,
    pub width: u16,
    pub height: u16,
    pub border_color: u32,
    pub stride: u32,
}

/// Vertex fetch layout of one attribute stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub index: u8,
    pub offset: u32,
    pub stride: u8,
    pub elements: u8,
    pub data_type: Nv40VertexDataType,
    pub location: Nv40Location,
}

/// Floor of log2, derived from the leading-zero count. `v` must be non-zero.
fn log2_floor(v: u32) -> u32 {
    31 - v.leading_zeros()
}

fn bool_word(v: bool) -> u32 {
    u32::from(v)
}

impl<F: CommandFifo> GpuContext<F> {
    fn emit1(&mut self, method: u32, arg: u32) -> Result<()> {
        let mut res = self.reserve(cmd_words(1))?;
        res.put_cmd(method, [arg]);
        Ok(())
    }

    pub fn set_clear_color(&mut self, color: u32) -> Result<()> {
        self.emit1(NV30_3D_CLEAR_COLOR_VALUE, color)
    }

    pub fn set_clear_depth_value(&mut self, value: u32) -> Result<()> {
        self.emit1(NV30_3D_CLEAR_DEPTH_VALUE, value)
    }

    pub fn nop(&mut self) -> Result<()> {
        self.emit1(NV40_3D_NOP, 0)
    }

    /// Clear the selected planes; a NOP follows the clear.
    pub fn clear_buffers(&mut self, buffers: ClearBuffers) -> Result<()> {
        let mut res = self.reserve(2 * cmd_words(1))?;
        res.put_cmd(NV30_3D_CLEAR_BUFFERS, [buffers.bits()]);
        res.put_cmd(NV40_3D_NOP, [0]);
        Ok(())
    }

    pub fn set_render_surface(&mut self, surface: &RenderSurface) -> Result<()> {
        let methods = surface.slot.methods();
        let mut res = self.reserve(3 * cmd_words(1))?;
        res.put_cmd(methods.dma, [surface.location as u32 | NV40_DMA_CONTEXT_TAG]);
        res.put_cmd(methods.offset, [surface.offset]);
        res.put_cmd(methods.pitch, [surface.pitch]);
        Ok(())
    }

    /// Select the active color targets and set up the window they cover.
    ///
    /// `width` and `height` must be powers of two; the format word only
    /// carries their log2.
    pub fn select_render_target(
        &mut self,
        targets: RenderTargets,
        format: u32,
        width: u16,
        height: u16,
        x: u16,
        y: u16,
    ) -> Result<()> {
        debug_assert!(width.is_power_of_two() && height.is_power_of_two());

        let (w, h) = (u32::from(width), u32::from(height));
        let (x, y) = (u32::from(x), u32::from(y));
        let format = format
            | log2_floor(w.max(1)) << NV30_3D_RT_FORMAT_LOG2_WIDTH_SHIFT
            | log2_floor(h.max(1)) << NV30_3D_RT_FORMAT_LOG2_HEIGHT_SHIFT;
        let conventions = h | NV30_3D_COORD_CONVENTIONS_ORIGIN_INVERTED;

        let mut res = self.reserve(4 * cmd_words(1) + cmd_words(2))?;
        res.put_cmd(NV30_3D_RT_FORMAT, [format]);
        res.put_cmd(NV30_3D_RT_ENABLE, [targets.bits()]);
        res.put_cmd(NV30_3D_VIEWPORT_TX_ORIGIN, [x | y << 16]);
        res.put_cmd(NV30_3D_COORD_CONVENTIONS, [conventions]);
        res.put_cmd(NV30_3D_RT_HORIZ, [x | w << 16, y | h << 16]);
        Ok(())
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) -> Result<()> {
        let mut res = self.reserve(cmd_words(2))?;
        res.put_cmd(
            NV30_3D_VIEWPORT_HORIZ,
            [u32::from(width) << 16, u32::from(height) << 16],
        );
        Ok(())
    }

    pub fn set_viewport_translate(&mut self, x: f32, y: f32, z: f32, w: f32) -> Result<()> {
        let mut res = self.reserve(cmd_words(4))?;
        res.put_cmd_f32(NV30_3D_VIEWPORT_TRANSLATE, [x, y, z, w]);
        Ok(())
    }

    pub fn set_viewport_scale(&mut self, x: f32, y: f32, z: f32, w: f32) -> Result<()> {
        let mut res = self.reserve(cmd_words(4))?;
        res.put_cmd_f32(NV30_3D_VIEWPORT_SCALE, [x, y, z, w]);
        Ok(())
    }

    pub fn set_blend_enable(&mut self, enable: bool) -> Result<()> {
        self.emit1(NV30_3D_BLEND_FUNC_ENABLE, bool_word(enable))
    }

    pub fn set_blend_equation(&mut self, equation: u32) -> Result<()> {
        self.emit1(NV40_3D_BLEND_EQUATION, equation)
    }

    pub fn set_blend_func(&mut self, src: u32, dst: u32) -> Result<()> {
        let mut res = self.reserve(cmd_words(2))?;
        res.put_cmd(NV30_3D_BLEND_FUNC_SRC, [src, dst]);
        Ok(())
    }

    pub fn set_depth_test_enable(&mut self, enable: bool) -> Result<()> {
        self.emit1(NV30_3D_DEPTH_TEST_ENABLE, bool_word(enable))
    }

    pub fn set_depth_func(&mut self, func: u32) -> Result<()> {
        self.emit1(NV30_3D_DEPTH_FUNC, func)
    }

    pub fn set_depth_write_enable(&mut self, enable: bool) -> Result<()> {
        self.emit1(NV30_3D_DEPTH_WRITE_ENABLE, bool_word(enable))
    }

    pub fn set_depth_control(
        &mut self,
        cull_near_far: bool,
        z_clamp: bool,
        cull_ignore_w: bool,
    ) -> Result<()> {
        let control = bool_word(cull_near_far) << NV30_3D_DEPTH_CONTROL_CULL_NEAR_FAR_SHIFT
            | bool_word(z_clamp) << NV30_3D_DEPTH_CONTROL_Z_CLAMP_SHIFT
            | bool_word(cull_ignore_w) << NV30_3D_DEPTH_CONTROL_CULL_IGNORE_W_SHIFT;
        self.emit1(NV30_3D_DEPTH_CONTROL, control)
    }

    pub fn set_cull_face(&mut self, face: u32) -> Result<()> {
        self.emit1(NV30_3D_CULL_FACE, face)
    }

    pub fn set_front_face(&mut self, face: u32) -> Result<()> {
        self.emit1(NV30_3D_FRONT_FACE, face)
    }

    pub fn set_cull_enable(&mut self, enable: bool) -> Result<()> {
        self.emit1(NV30_3D_CULL_FACE_ENABLE, bool_word(enable))
    }

    pub fn bind_vertex_attribute(&mut self, attr: &VertexAttribute) -> Result<()> {
        let index = u32::from(attr.index);
        let location = (attr.location as u32) << NV30_3D_VTXBUF_LOCATION_SHIFT;
        let format = u32::from(attr.stride) << NV30_3D_VTXFMT_STRIDE_SHIFT
            | u32::from(attr.elements) << NV30_3D_VTXFMT_SIZE_SHIFT
            | attr.data_type as u32;

        let mut res = self.reserve(2 * cmd_words(1))?;
        res.put_cmd(nv30_3d_vtxbuf(index), [attr.offset | location]);
        res.put_cmd(nv30_3d_vtxfmt(index), [format]);
        Ok(())
    }

    pub fn set_texture(&mut self, unit: u32, tex: &Texture) -> Result<()> {
        let size = u32::from(tex.width) << 16 | u32::from(tex.height);

        let mut res = self.reserve(cmd_words(8) + cmd_words(1))?;
        res.put_cmd(
            nv30_3d_tex_offset(unit),
            [
                tex.offset,
                tex.format,
                tex.wrap,
                tex.enable,
                tex.swizzle,
                tex.filter,
                size,
                tex.border_color,
            ],
        );
        res.put_cmd(
            nv40_3d_tex_size1(unit),
            [tex.stride | 1 << NV40_3D_TEX_SIZE1_DEPTH_SHIFT],
        );
        Ok(())
    }

    /// Open an immediate-mode primitive sequence.
    pub fn vertex_begin(&mut self, prim: Nv40PrimitiveType) -> Result<()> {
        self.emit1(NV30_3D_VERTEX_BEGIN_END, prim as u32)
    }

    pub fn vertex_end(&mut self) -> Result<()> {
        self.emit1(NV30_3D_VERTEX_BEGIN_END, NV30_3D_VERTEX_BEGIN_END_STOP)
    }

    /// Immediate position (attribute 0); this is what emits a vertex.
    pub fn vertex4f(&mut self, x: f32, y: f32, z: f32, w: f32) -> Result<()> {
        let mut res = self.reserve(cmd_words(4))?;
        res.put_cmd(nv30_3d_vtx_attr_4f(0), [x, y, z, w].map(f32_bits));
        Ok(())
    }

    pub fn tex_coord2f(&mut self, s: f32, t: f32) -> Result<()> {
        let mut res = self.reserve(cmd_words(2))?;
        res.put_cmd_f32(nv30_3d_vtx_attr_2f(NV40_VTX_ATTR_TEXCOORD0), [s, t]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log2_matches_power_of_two_exponent() {
        assert_eq!(log2_floor(1), 0);
        assert_eq!(log2_floor(256), 8);
        assert_eq!(log2_floor(4096), 12);
    }

    #[test]
    fn surface_slots_index_the_method_table() {
        assert_eq!(SurfaceSlot::Color1.methods().dma, NV30_3D_DMA_COLOR1);
        assert_eq!(SurfaceSlot::Zeta.methods().offset, NV30_3D_ZETA_OFFSET);
    }
}
