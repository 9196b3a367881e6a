//! Error types for the rasterizer's API boundary.
//!
//! `DimensionMismatch`, `MalformedIndices` and `InvalidVertexVariablesLayout`
//! are recoverable at the caller's level. `ClippingOverflow` is fatal: it
//! indicates the clipping bound invariant (at most 8 vertices survive
//! clipping a triangle against the six frustum planes) was violated, which
//! should not be reachable given the stated preconditions.

use failure::Fail;

#[derive(Debug, Fail)]
pub enum RasterError {
    #[fail(display = "surface is {}x{} but z-buffer is {}x{}", surface_w, surface_h, zbuf_w, zbuf_h)]
    DimensionMismatch {
        surface_w: u32,
        surface_h: u32,
        zbuf_w: u32,
        zbuf_h: u32,
    },

    #[fail(display = "index list length {} is not a multiple of 3", len)]
    MalformedIndices { len: usize },

    #[fail(display = "VertexVariables layout is invalid: {}", reason)]
    InvalidVertexVariablesLayout { reason: &'static str },

    #[fail(display = "clipping produced {} vertices, exceeding the fixed bound of {}", got, max)]
    ClippingOverflow { got: usize, max: usize },
}

pub type RasterResult<T> = Result<T, RasterError>;
