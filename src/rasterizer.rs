//! The public facade: binds a shader, a render target pair, and the matrix/
//! culling/texture state, and drives one triangle list through the full
//! pipeline (`spec.md` §4.1).
//!
//! Grounded in the teacher's `Pipeline<U, V, T, P>` (`src/render/
//! pipeline.rs`), which owns uniforms, a vertex buffer and a render target
//! and exposes `render_mesh`/`render`. `spec.md` §4.1 asks for a narrower,
//! single-shader-generic surface (`IRasterizer`-shaped) instead of the
//! teacher's multi-stage builder, so the two type parameters here are the
//! shader bundle and the perspective-correction flag rather than the
//! teacher's four.

use nalgebra::{Vector3, Vector4};

use crate::cull::{is_culled, signed_area2, BackfaceCulling};
use crate::error::{RasterError, RasterResult};
use crate::fill::{draw_triangle_solid, draw_triangle_wireframe, ScreenVertex};
use crate::geometry::{clip_triangle, ClipBuffer, TransformedVertex};
use crate::matrices::MatrixCache;
use crate::plane::FRUSTUM_PLANES;
use crate::shader::{Shader, ShaderEnvironment};
use crate::target::{Surface, ZBuffer};
use crate::texture::BoundTexture;
use crate::vertex_variables::{validate_layout, VertexVariables};

/// Whether solid triangles are filled or drawn as outlines (`spec.md`
/// §4.5). Wireframe mode skips both the depth test and the fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Solid,
    Wireframe(crate::color::Color),
}

/// The rasterizer core: a shader bundle `S` plus a compile-time choice of
/// perspective-correct interpolation, specialized once per pipeline
/// (`spec.md` §4.1, §9).
pub struct Rasterizer<S: Shader, const PERSPECTIVE_CORRECT: bool> {
    matrices: MatrixCache,
    culling: BackfaceCulling,
    fill_mode: FillMode,
    textures: Vec<BoundTexture>,
    constants: S::Constants,
    width: u32,
    height: u32,
}

impl<S: Shader, const PERSPECTIVE_CORRECT: bool> Rasterizer<S, PERSPECTIVE_CORRECT> {
    pub fn new(width: u32, height: u32, constants: S::Constants) -> RasterResult<Self>
    where
        S::Vars: Default,
    {
        validate_layout::<S::Vars>(S::VARS_LEN)
            .map_err(|reason| RasterError::InvalidVertexVariablesLayout { reason })?;

        Ok(Rasterizer {
            matrices: MatrixCache::default(),
            culling: BackfaceCulling::default(),
            fill_mode: FillMode::Solid,
            textures: Vec::new(),
            constants,
            width,
            height,
        })
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn world_matrix(&self) -> &nalgebra::Matrix4<f32> {
        self.matrices.world()
    }

    pub fn set_world_matrix(&mut self, m: nalgebra::Matrix4<f32>) {
        self.matrices.set_world(m);
    }

    pub fn view_matrix(&self) -> &nalgebra::Matrix4<f32> {
        self.matrices.view()
    }

    pub fn set_view_matrix(&mut self, m: nalgebra::Matrix4<f32>) {
        self.matrices.set_view(m);
    }

    pub fn projection_matrix(&self) -> &nalgebra::Matrix4<f32> {
        self.matrices.projection()
    }

    pub fn set_projection_matrix(&mut self, m: nalgebra::Matrix4<f32>) {
        self.matrices.set_projection(m);
    }

    pub fn backface_culling(&self) -> BackfaceCulling {
        self.culling
    }

    pub fn set_backface_culling(&mut self, mode: BackfaceCulling) {
        self.culling = mode;
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn set_fill_mode(&mut self, mode: FillMode) {
        self.fill_mode = mode;
    }

    pub fn set_textures(&mut self, textures: Vec<BoundTexture>) {
        self.textures = textures;
    }

    pub fn shader_constants(&self) -> &S::Constants {
        &self.constants
    }

    pub fn shader_constants_mut(&mut self) -> &mut S::Constants {
        &mut self.constants
    }

    /// Resizes the viewport the facade maps clip space onto (`spec.md` §4.2:
    /// callers may render to a target smaller than a fixed allocation).
    pub fn set_render_target_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Runs `vertices[indices[..]]` through the full pipeline: vertex
    /// shading, homogeneous clipping, perspective divide, viewport mapping,
    /// fan triangulation, backface culling, and the fill stage, into
    /// `surface`/`zbuffer` (`spec.md` §4.1-§4.5).
    ///
    /// `indices` must be a flat triangle list (length a multiple of 3,
    /// `spec.md` §7's `MalformedIndices`); `surface` and `zbuffer` must
    /// share dimensions (`spec.md` §7's `DimensionMismatch`).
    pub fn render_triangle_list<Surf: Surface, Z: ZBuffer>(
        &self,
        vertices: &[S::Vertex],
        indices: &[u32],
        surface: &mut Surf,
        zbuffer: &mut Z,
    ) -> RasterResult<()>
    where
        S::Vars: Default,
    {
        if surface.width() != zbuffer.width() || surface.height() != zbuffer.height() {
            return Err(RasterError::DimensionMismatch {
                surface_w: surface.width(),
                surface_h: surface.height(),
                zbuf_w: zbuffer.width(),
                zbuf_h: zbuffer.height(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(RasterError::MalformedIndices { len: indices.len() });
        }

        let env = ShaderEnvironment {
            world_normal_matrix: self.matrices.normal(),
            world_view_proj_matrix: self.matrices.world_view_proj(),
            textures: &self.textures,
        };

        let mut a: ClipBuffer<S::Vars> = smallvec::SmallVec::new();
        let mut b: ClipBuffer<S::Vars> = smallvec::SmallVec::new();

        for tri in indices.chunks_exact(3) {
            a.clear();
            for &idx in tri {
                let vertex = &vertices[idx as usize];
                let mut pos = Vector4::new(0.0, 0.0, 0.0, 1.0);
                let mut vars = S::Vars::default();
                S::vertex_shader(vertex, &self.constants, &env, &mut pos, &mut vars);
                a.push(TransformedVertex::new(pos, vars));
            }

            let survivors = clip_triangle(&mut a, &mut b, &FRUSTUM_PLANES)?;
            if survivors < 3 {
                continue;
            }

            // Fan triangulation of the clipped polygon (`spec.md` §4.2).
            for i in 1..(survivors - 1) {
                let tri = [
                    self.to_screen(&a[0]),
                    self.to_screen(&a[i]),
                    self.to_screen(&a[i + 1]),
                ];

                let area = signed_area2((tri[0].x, tri[0].y), (tri[1].x, tri[1].y), (tri[2].x, tri[2].y));
                if is_culled(self.culling, area) {
                    continue;
                }

                match self.fill_mode {
                    FillMode::Solid => {
                        draw_triangle_solid::<S, Surf, Z, PERSPECTIVE_CORRECT>(
                            tri, surface, zbuffer, &self.constants, &env,
                        );
                    }
                    FillMode::Wireframe(color) => {
                        draw_triangle_wireframe::<S, Surf>(tri, surface, &self.constants, &env, color);
                    }
                }
            }
        }

        Ok(())
    }

    /// Perspective divide and viewport mapping for one clipped vertex
    /// (`spec.md` §4.2 steps 3-4). `inv_w` is kept alongside for optional
    /// perspective-correct interpolation in the fill stage.
    fn to_screen(&self, v: &TransformedVertex<S::Vars>) -> ScreenVertex<S::Vars> {
        let inv_w = 1.0 / v.pos.w;
        let ndc = Vector3::new(v.pos.x * inv_w, v.pos.y * inv_w, v.pos.z * inv_w);

        let x = (ndc.x * 0.5 + 0.5) * self.width as f32;
        let y = (1.0 - (ndc.y * 0.5 + 0.5)) * self.height as f32;
        let z = ndc.z * 0.5 + 0.5;

        let vars = if PERSPECTIVE_CORRECT {
            v.vars.scale(inv_w)
        } else {
            v.vars.clone()
        };

        ScreenVertex { x, y, z, inv_w, vars }
    }
}
