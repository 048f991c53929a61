// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Type conversion utilities
//!
//! Glyph and text indices are represented as `u32` by this library. Text
//! entered into a keychain is short, so `u32` is always an appropriate index
//! type.

use easy_cast::Cast;

/// Convert `usize` → `u32`
///
/// This is a "safer" wrapper around `as` ensuring (on debug builds) that the
/// input value may be represented correctly by `u32`.
#[inline]
pub fn to_u32(x: usize) -> u32 {
    x.cast()
}

/// Convert `u32` → `usize`
///
/// This is a "safer" wrapper around `as` ensuring that the operation is
/// zero-extension.
#[cfg(feature = "rustybuzz")]
#[inline]
pub fn to_usize(x: u32) -> usize {
    x.cast()
}

/// Scale factor: drawing units per font unit
///
/// Drawing units are those of the exported markup; a text size of `100`
/// means one Em spans 100 drawing units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DPU(pub f64);

impl DPU {
    /// Construct from a size (drawing units per Em) and the font's units per Em
    pub fn new(size: f64, units_per_em: u16) -> Self {
        DPU(size / f64::from(units_per_em.max(1)))
    }

    #[cfg(feature = "rustybuzz")]
    pub(crate) fn i32_to_units(self, x: i32) -> f64 {
        f64::from(x) * self.0
    }
    pub(crate) fn i16_to_units(self, x: i16) -> f64 {
        f64::from(x) * self.0
    }
    pub(crate) fn u16_to_units(self, x: u16) -> f64 {
        f64::from(x) * self.0
    }
    pub(crate) fn f32_to_units(self, x: f32) -> f64 {
        f64::from(x) * self.0
    }
}
