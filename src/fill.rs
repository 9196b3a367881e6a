//! The fill stage: scanline rasterization of one screen-space triangle,
//! solid (flat/Gouraud, depth-tested) or wireframe (line-drawn, untested)
//! (`spec.md` §4.5).
//!
//! The teacher rasterizes by walking sorted scanlines and stepping
//! per-pixel deltas down swept edges (`src/render/pipeline.rs`'s
//! `FragmentShader::triangles`). `spec.md` §4.5 asks for the edge-function
//! formulation instead (`orient2d`, top-left fill convention) — the same
//! "compute inside/outside from three signed areas" approach Fabian
//! Giesen's well-known rasterization notes describe, which several
//! teacher-era `src/render` comments already gesture at when discussing
//! why shared edges must not double-shade.

use crate::color::Color;
use crate::cull::signed_area2;
use crate::shader::{Shader, ShaderEnvironment};
use crate::target::{Surface, ZBuffer};
use crate::vertex_variables::VertexVariables;

/// One triangle vertex after perspective divide and viewport mapping:
/// screen-space `x`/`y` in pixels, normalized depth `z`, `inv_w = 1/w` kept
/// for optional perspective-correct interpolation, and the (still
/// un-divided-by-w, i.e. already perspective-corrected source) variables.
#[derive(Debug, Clone)]
pub struct ScreenVertex<V: VertexVariables> {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub inv_w: f32,
    pub vars: V,
}

#[inline]
fn is_top_left_edge(from: (f32, f32), to: (f32, f32)) -> bool {
    let dy = to.1 - from.1;
    let dx = to.0 - from.0;
    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

/// Solid-fills one screen-space triangle with depth testing and per-pixel
/// shading (`spec.md` §4.5). Vertices are taken in whatever order the
/// geometry stage produced (post fan-triangulation); this function
/// canonicalizes winding internally so the top-left convention is applied
/// consistently regardless of which way `v0, v1, v2` wind.
///
/// `PERSPECTIVE_CORRECT` is a compile-time choice (`spec.md` §4.1, §9): when
/// `true`, vertex variables are interpolated as `vars / w` and divided back
/// out per pixel; when `false`, they are interpolated directly in screen
/// space.
pub fn draw_triangle_solid<S: Shader, Surf: Surface, Z: ZBuffer, const PERSPECTIVE_CORRECT: bool>(
    verts: [ScreenVertex<S::Vars>; 3],
    surface: &mut Surf,
    zbuffer: &mut Z,
    constants: &S::Constants,
    env: &ShaderEnvironment,
) {
    let [mut v0, mut v1, mut v2] = verts;

    let area = signed_area2((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y));
    if area == 0.0 {
        return;
    }
    if area < 0.0 {
        std::mem::swap(&mut v1, &mut v2);
    }

    let p0 = (v0.x, v0.y);
    let p1 = (v1.x, v1.y);
    let p2 = (v2.x, v2.y);
    let area = signed_area2(p0, p1, p2);

    let min_x = p0.0.min(p1.0).min(p2.0).floor().max(0.0) as u32;
    let max_x = (p0.0.max(p1.0).max(p2.0).ceil() as i64).min(surface.width() as i64 - 1);
    let min_y = p0.1.min(p1.1).min(p2.1).floor().max(0.0) as u32;
    let max_y = (p0.1.max(p1.1).max(p2.1).ceil() as i64).min(surface.height() as i64 - 1);
    if max_x < 0 || max_y < 0 {
        return;
    }
    let max_x = max_x as u32;
    let max_y = max_y as u32;

    let top_left0 = is_top_left_edge(p1, p2);
    let top_left1 = is_top_left_edge(p2, p0);
    let top_left2 = is_top_left_edge(p0, p1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = (x as f32 + 0.5, y as f32 + 0.5);

            let w0 = signed_area2(p1, p2, p);
            let w1 = signed_area2(p2, p0, p);
            let w2 = signed_area2(p0, p1, p);

            let inside = (w0 > 0.0 || (w0 == 0.0 && top_left0))
                && (w1 > 0.0 || (w1 == 0.0 && top_left1))
                && (w2 > 0.0 || (w2 == 0.0 && top_left2));
            if !inside {
                continue;
            }

            let b0 = w0 / area;
            let b1 = w1 / area;
            let b2 = w2 / area;

            let z = b0 * v0.z + b1 * v1.z + b2 * v2.z;
            if z >= zbuffer.get_depth(x, y) {
                continue;
            }

            let vars = if PERSPECTIVE_CORRECT {
                let inv_w = b0 * v0.inv_w + b1 * v1.inv_w + b2 * v2.inv_w;
                let weighted = S::Vars::add(
                    &S::Vars::add(&v0.vars.scale(b0 * v0.inv_w), &v1.vars.scale(b1 * v1.inv_w)),
                    &v2.vars.scale(b2 * v2.inv_w),
                );
                weighted.scale(1.0 / inv_w)
            } else {
                S::Vars::add(&S::Vars::add(&v0.vars.scale(b0), &v1.vars.scale(b1)), &v2.vars.scale(b2))
            };

            let color = S::pixel_shader(&vars, constants, env);
            zbuffer.set_depth(x, y, z);
            surface.set_pixel(x, y, color);
        }
    }
}

/// Draws the three edges of a screen-space triangle as lines, shading each
/// pixel from variables linearly interpolated along the edge (`spec.md`
/// §4.5 edge case: wireframe mode skips the depth test and the fill-rule
/// entirely, since lines have no interior to disambiguate).
pub fn draw_triangle_wireframe<S: Shader, Surf: Surface>(
    verts: [ScreenVertex<S::Vars>; 3],
    surface: &mut Surf,
    constants: &S::Constants,
    env: &ShaderEnvironment,
    color: Color,
) {
    let [v0, v1, v2] = verts;
    let _ = constants;
    let _ = env;
    draw_line(&v0, &v1, surface, color);
    draw_line(&v1, &v2, surface, color);
    draw_line(&v2, &v0, surface, color);
}

fn draw_line<S: VertexVariables, Surf: Surface>(
    a: &ScreenVertex<S>,
    b: &ScreenVertex<S>,
    surface: &mut Surf,
    color: Color,
) {
    let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
    let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let w = surface.width() as i64;
    let h = surface.height() as i64;

    loop {
        if x0 >= 0 && x0 < w && y0 >= 0 && y0 < h {
            surface.set_pixel(x0 as u32, y0 as u32, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::target::{OwnedSurface, OwnedZBuffer};
    use nalgebra::Matrix4;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct NoVars;

    impl VertexVariables for NoVars {
        fn as_slice(&self) -> &[f32] {
            &[]
        }
        fn as_mut_slice(&mut self) -> &mut [f32] {
            &mut []
        }
    }

    struct FlatShader;

    impl Shader for FlatShader {
        type Vars = NoVars;
        type Constants = Color;
        type Vertex = ();
        const VARS_LEN: usize = 0;

        fn vertex_shader(
            _vertex: &(),
            _constants: &Color,
            _env: &ShaderEnvironment,
            _pos: &mut nalgebra::Vector4<f32>,
            _vars: &mut NoVars,
        ) {
        }

        fn pixel_shader(_vars: &NoVars, constants: &Color, _env: &ShaderEnvironment) -> Color {
            *constants
        }
    }

    fn sv(x: f32, y: f32, z: f32) -> ScreenVertex<NoVars> {
        ScreenVertex { x, y, z, inv_w: 1.0, vars: NoVars }
    }

    /// S1: a full-viewport-covering triangle pair fills every pixel.
    #[test]
    fn fullscreen_triangle_covers_every_pixel() {
        let mut surface = OwnedSurface::new(4, 4);
        let mut zbuffer = OwnedZBuffer::new(4, 4);
        let identity = Matrix4::identity();
        let env = ShaderEnvironment {
            world_normal_matrix: &identity,
            world_view_proj_matrix: &identity,
            textures: &[],
        };
        let constants = Color::opaque(10, 20, 30);

        draw_triangle_solid::<FlatShader, _, _, false>(
            [sv(-1.0, -1.0, 0.5), sv(8.0, -1.0, 0.5), sv(-1.0, 8.0, 0.5)],
            &mut surface,
            &mut zbuffer,
            &constants,
            &env,
        );

        for p in surface.pixels() {
            assert_eq!(*p, constants);
        }
    }

    /// Testable property 6: nearer triangle wins regardless of draw order.
    #[test]
    fn depth_test_keeps_the_nearer_fragment() {
        let mut surface = OwnedSurface::new(2, 2);
        let mut zbuffer = OwnedZBuffer::new(2, 2);
        let identity = Matrix4::identity();
        let env = ShaderEnvironment {
            world_normal_matrix: &identity,
            world_view_proj_matrix: &identity,
            textures: &[],
        };
        let far = Color::opaque(255, 0, 0);
        let near = Color::opaque(0, 255, 0);

        draw_triangle_solid::<FlatShader, _, _, false>(
            [sv(-1.0, -1.0, 0.9), sv(3.0, -1.0, 0.9), sv(-1.0, 3.0, 0.9)],
            &mut surface,
            &mut zbuffer,
            &far,
            &env,
        );
        draw_triangle_solid::<FlatShader, _, _, false>(
            [sv(-1.0, -1.0, 0.1), sv(3.0, -1.0, 0.1), sv(-1.0, 3.0, 0.1)],
            &mut surface,
            &mut zbuffer,
            &near,
            &env,
        );

        assert_eq!(surface.pixel(0, 0), near);
    }

    /// Testable property 7: adjacent triangles sharing an edge shade each
    /// boundary pixel exactly once, regardless of which triangle "owns" it
    /// under the top-left convention.
    #[test]
    fn shared_edge_is_not_double_shaded() {
        let mut surface = OwnedSurface::new(4, 4);
        let mut zbuffer_a = OwnedZBuffer::new(4, 4);
        let mut zbuffer_b = OwnedZBuffer::new(4, 4);
        let identity = Matrix4::identity();
        let env = ShaderEnvironment {
            world_normal_matrix: &identity,
            world_view_proj_matrix: &identity,
            textures: &[],
        };

        let mut hits_a = OwnedSurface::new(4, 4);
        let mut hits_b = OwnedSurface::new(4, 4);
        let one = Color::opaque(1, 1, 1);

        draw_triangle_solid::<FlatShader, _, _, false>(
            [sv(0.0, 0.0, 0.5), sv(4.0, 0.0, 0.5), sv(0.0, 4.0, 0.5)],
            &mut hits_a,
            &mut zbuffer_a,
            &one,
            &env,
        );
        draw_triangle_solid::<FlatShader, _, _, false>(
            [sv(4.0, 4.0, 0.5), sv(0.0, 4.0, 0.5), sv(4.0, 0.0, 0.5)],
            &mut hits_b,
            &mut zbuffer_b,
            &one,
            &env,
        );

        let _ = &mut surface;
        for (a, b) in hits_a.pixels().iter().zip(hits_b.pixels()) {
            assert!(!(a.r > 0 && b.r > 0), "a pixel was covered by both triangles");
        }
    }
}
