//! The shader contract: a compile-time bundle of a vertex program, a pixel
//! program, and the two data layouts they share (`spec.md` §4.6).
//!
//! The teacher composes shader stages as plain closures passed into
//! `VertexShader::run`/`FragmentShader::triangles` (`src/render/
//! pipeline.rs`). `spec.md` asks for something slightly different: a single
//! named bundle ("a trio of user-provided items bound at specialization
//! time") so the facade in `rasterizer.rs` can be generic over one `S:
//! Shader` type parameter instead of threading two separate closure type
//! parameters through every method. A trait plays that role without giving
//! up monomorphized, non-virtual dispatch in the inner loop (`spec.md` §9).

use nalgebra::{Matrix4, Vector4};

use crate::color::Color;
use crate::texture::BoundTexture;
use crate::vertex_variables::VertexVariables;

/// Read-only environment a shader can observe while running, supplied by
/// the facade (`spec.md` §4.6: "Shaders read two environment values
/// provided by the facade").
pub struct ShaderEnvironment<'a> {
    pub world_normal_matrix: &'a Matrix4<f32>,
    pub world_view_proj_matrix: &'a Matrix4<f32>,
    pub textures: &'a [BoundTexture],
}

impl<'a> ShaderEnvironment<'a> {
    #[inline]
    pub fn read_texture(&self, index: usize, u: f32, v: f32, bilinear: bool, tile: bool) -> Color {
        self.textures[index].sample(u, v, bilinear, tile)
    }
}

/// A compile-/build-time bundle of the vertex program, pixel program, and
/// their shared data layouts. Implementors are zero-sized marker types; all
/// dispatch is static (`spec.md` §9).
pub trait Shader {
    /// Interpolant payload, `spec.md` §3.
    type Vars: VertexVariables + Default;

    /// Declared length of `Vars::as_slice()`, checked once against the
    /// actual slice length at `Rasterizer::new` (`spec.md` §10): catches a
    /// hand-written `VertexVariables` impl whose `as_slice`/`as_mut_slice`
    /// disagree with the layout its accessors assume, before a single
    /// triangle is rendered rather than as a silent out-of-range read.
    const VARS_LEN: usize;
    /// Per-pipeline tunable state, read-only from the pixel shader and
    /// mutable only through `Rasterizer::shader_constants_mut` (`spec.md`
    /// §3, §4.6). Shaders with no constants use `()`.
    type Constants;
    /// Opaque caller-defined vertex record; the vertex shader alone knows
    /// its layout (`spec.md` §3).
    type Vertex;

    /// Writes the clip-space position (not yet divided by `w`) and the
    /// interpolant payload for one input vertex.
    fn vertex_shader(
        vertex: &Self::Vertex,
        constants: &Self::Constants,
        env: &ShaderEnvironment,
        pos: &mut Vector4<f32>,
        vars: &mut Self::Vars,
    );

    /// Produces the final color for one rasterized pixel. Pixel shaders are
    /// pure functions of their inputs and must not fail (`spec.md` §7).
    fn pixel_shader(vars: &Self::Vars, constants: &Self::Constants, env: &ShaderEnvironment) -> Color;
}
