//! Method packet encoding on top of a [`Reservation`].

use reality_protocol::nv40::nv40_cmd::{nv40_method_header, Nv40MethodMode, NV40_SUBCHANNEL_3D};

use crate::buffer::Reservation;

/// Most arguments a single encoder packet carries.
pub const MAX_CMD_ARGS: usize = 8;

/// Ring words taken by a packet with `args` arguments.
pub const fn cmd_words(args: usize) -> usize {
    1 + args
}

/// Raw IEEE-754 bit pattern of `v`; no canonicalisation of NaNs or zeros.
#[inline]
pub fn f32_bits(v: f32) -> u32 {
    v.to_bits()
}

impl Reservation<'_> {
    /// Emit `method` followed by `N` arguments in increasing mode.
    ///
    /// Argument `i` lands in register `method + 4 * i`.
    pub fn put_cmd<const N: usize>(&mut self, method: u32, args: [u32; N]) {
        self.put_cmd_slice(method, &args, Nv40MethodMode::Increasing);
    }

    /// Like [`put_cmd`](Self::put_cmd) with float arguments passed as raw bits.
    pub fn put_cmd_f32<const N: usize>(&mut self, method: u32, args: [f32; N]) {
        self.put_cmd(method, args.map(f32_bits));
    }

    /// Emit `N` arguments that all target `method`.
    pub fn put_cmd_ni<const N: usize>(&mut self, method: u32, args: [u32; N]) {
        self.put_cmd_slice(method, &args, Nv40MethodMode::NonIncreasing);
    }

    pub fn put_cmd_slice(&mut self, method: u32, args: &[u32], mode: Nv40MethodMode) {
        assert!(
            (1..=MAX_CMD_ARGS).contains(&args.len()),
            "method 0x{method:04x}: {} arguments (expected 1..={MAX_CMD_ARGS})",
            args.len()
        );
        self.put(nv40_method_header(
            NV40_SUBCHANNEL_3D,
            method,
            args.len() as u32,
            mode,
        ));
        for &arg in args {
            self.put(arg);
        }
    }
}
