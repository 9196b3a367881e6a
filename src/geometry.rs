//! Clip-space vertices and homogeneous Sutherland-Hodgman clipping
//! (`spec.md` §4.2, §4.3).
//!
//! Grounded in the teacher's `ClipVertex<K>`/`ClippingPlane::intersect`
//! (`src/geometry/clipvertex.rs`, `src/geometry/clip.rs`), generalized from
//! a per-vertex `Interpolate` trait object to this crate's flat
//! `VertexVariables`, and from "clip one plane, return a fresh `Vec`" to
//! the fixed double-buffered scratch arrays `spec.md` §3/§4.3 requires
//! (bounded at 8 vertices, checked rather than trusted).

use nalgebra::Vector4;
use smallvec::SmallVec;

use crate::error::RasterError;
use crate::plane::Plane;
use crate::vertex_variables::VertexVariables;

/// Maximum vertex count after clipping a triangle against all six frustum
/// planes (`spec.md` §3, §4.3 invariant iii).
pub const MAX_CLIPPED_VERTICES: usize = 8;

/// A clip-space position paired with its interpolant payload. Mutated in
/// place by clipping, perspective divide, and viewport mapping; scratch-
/// owned for the lifetime of one triangle (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct TransformedVertex<V: VertexVariables> {
    pub pos: Vector4<f32>,
    pub vars: V,
}

impl<V: VertexVariables> TransformedVertex<V> {
    pub fn new(pos: Vector4<f32>, vars: V) -> TransformedVertex<V> {
        TransformedVertex { pos, vars }
    }

    /// `spec.md` §4.3: linear interpolation of both `pos` (as a 4-vector)
    /// and `vars` (via `VertexVariables::lerp`) at parameter `t`.
    fn lerp(a: &TransformedVertex<V>, b: &TransformedVertex<V>, t: f32) -> TransformedVertex<V> {
        TransformedVertex {
            pos: a.pos + (b.pos - a.pos) * t,
            vars: VertexVariables::lerp(&a.vars, &b.vars, t),
        }
    }
}

/// Fixed-capacity scratch polygon used as one side of the clipper's
/// double buffer (`spec.md` §3's "Clipping buffers").
pub type ClipBuffer<V> = SmallVec<[TransformedVertex<V>; MAX_CLIPPED_VERTICES]>;

#[inline]
fn push_bounded<V: VertexVariables>(
    out: &mut ClipBuffer<V>,
    v: TransformedVertex<V>,
) -> Result<(), RasterError> {
    if out.len() >= MAX_CLIPPED_VERTICES {
        return Err(RasterError::ClippingOverflow {
            got: out.len() + 1,
            max: MAX_CLIPPED_VERTICES,
        });
    }
    out.push(v);
    Ok(())
}

/// Clips a convex polygon against a single homogeneous plane, Sutherland-
/// Hodgman style (`spec.md` §4.3). `source` is consumed; the surviving
/// polygon is appended to `target` (which must start empty — the clipper
/// ping-pongs between two buffers across the six planes).
///
/// Comparisons use `>= 0` on the inside test so edges lying exactly on a
/// plane are preserved rather than discarded (`spec.md` §4.3 numerical
/// policy).
pub fn clip_to_plane<V: VertexVariables>(
    source: &[TransformedVertex<V>],
    target: &mut ClipBuffer<V>,
    plane: &Plane,
) -> Result<(), RasterError> {
    target.clear();

    let n = source.len();
    if n == 0 {
        return Ok(());
    }

    for i in 0..n {
        let j = (i + 1) % n;
        let vi = &source[i];
        let vj = &source[j];

        let di = plane.classify_homogeneous(&vi.pos);
        let dj = plane.classify_homogeneous(&vj.pos);

        if di >= 0.0 {
            push_bounded(target, vi.clone())?;
            if dj < 0.0 {
                let t = di / (di - dj);
                push_bounded(target, TransformedVertex::lerp(vi, vj, t))?;
            }
        } else if dj >= 0.0 {
            let t = di / (di - dj);
            push_bounded(target, TransformedVertex::lerp(vi, vj, t))?;
        }
    }

    Ok(())
}

/// Clips a triangle against all six frustum planes in order, ping-ponging
/// between two scratch buffers so the final polygon lands back in `a`
/// (`spec.md` §4.2 step 2). Returns the surviving vertex count; `0` means
/// the triangle was discarded entirely. `a` must be seeded with exactly the
/// triangle's three vertices before calling.
pub fn clip_triangle<V: VertexVariables>(
    a: &mut ClipBuffer<V>,
    b: &mut ClipBuffer<V>,
    planes: &[Plane],
) -> Result<usize, RasterError> {
    debug_assert_eq!(planes.len() % 2, 0, "plane count must be even to land back in `a`");

    for (i, plane) in planes.iter().enumerate() {
        let (source, target): (&mut ClipBuffer<V>, &mut ClipBuffer<V>) = if i % 2 == 0 {
            (a, b)
        } else {
            (b, a)
        };

        clip_to_plane(source, target, plane)?;

        if target.len() < 3 {
            a.clear();
            return Ok(0);
        }
    }

    // With an even number of planes the surviving polygon is already back
    // in `a`; with an odd count (not expected here) copy it over.
    if planes.len() % 2 != 0 {
        a.clear();
        a.extend(b.drain(..));
    }

    Ok(a.len())
}
