//! The rasterizer's cached matrix stack (`spec.md` §3's "Matrix cache").
//!
//! Grounded in the teacher's `GlobalUniforms` (`full_example/src/
//! uniforms.rs`), which stores `model`/`view`/`projection`/`mit` (model
//! inverse-transpose) and recomputes `mit` only where the model matrix
//! changes (`full_example/src/lib.rs`'s `model_matrix`). `spec.md` §3, §9
//! generalizes that into an invariant every setter must uphold: all derived
//! matrices are consistent with the inputs by the time the setter returns.

use nalgebra::Matrix4;

/// Caches world/view/projection plus their derived products, recomputing
/// dependents synchronously in each setter so callers may read derived
/// matrices at any time (`spec.md` §3, §9).
#[derive(Debug, Clone)]
pub struct MatrixCache {
    world: Matrix4<f32>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    /// `N = (W^-1)^T`, recomputed only when `world` changes — normals live
    /// in world space regardless of the camera, so `view`/`projection`
    /// changing shouldn't touch it (`spec.md` §9, Open Questions).
    normal: Matrix4<f32>,
    /// `WV = V * W`
    world_view: Matrix4<f32>,
    /// `WVP = P * V * W`
    world_view_proj: Matrix4<f32>,
}

impl Default for MatrixCache {
    fn default() -> MatrixCache {
        MatrixCache::new(Matrix4::identity(), Matrix4::identity(), Matrix4::identity())
    }
}

impl MatrixCache {
    pub fn new(world: Matrix4<f32>, view: Matrix4<f32>, projection: Matrix4<f32>) -> MatrixCache {
        let mut cache = MatrixCache {
            world,
            view,
            projection,
            normal: Matrix4::identity(),
            world_view: Matrix4::identity(),
            world_view_proj: Matrix4::identity(),
        };
        cache.recompute_normal();
        cache.recompute_products();
        cache
    }

    #[inline(always)]
    pub fn world(&self) -> &Matrix4<f32> {
        &self.world
    }

    #[inline(always)]
    pub fn view(&self) -> &Matrix4<f32> {
        &self.view
    }

    #[inline(always)]
    pub fn projection(&self) -> &Matrix4<f32> {
        &self.projection
    }

    #[inline(always)]
    pub fn normal(&self) -> &Matrix4<f32> {
        &self.normal
    }

    #[inline(always)]
    pub fn world_view(&self) -> &Matrix4<f32> {
        &self.world_view
    }

    #[inline(always)]
    pub fn world_view_proj(&self) -> &Matrix4<f32> {
        &self.world_view_proj
    }

    pub fn set_world(&mut self, world: Matrix4<f32>) {
        self.world = world;
        self.recompute_normal();
        self.recompute_products();
    }

    pub fn set_view(&mut self, view: Matrix4<f32>) {
        self.view = view;
        self.recompute_products();
    }

    pub fn set_projection(&mut self, projection: Matrix4<f32>) {
        self.projection = projection;
        self.recompute_products();
    }

    fn recompute_normal(&mut self) {
        self.normal = self
            .world
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
            .transpose();
    }

    fn recompute_products(&mut self) {
        self.world_view = self.view * self.world;
        self.world_view_proj = self.projection * self.world_view;
    }
}
