//! The interpolant payload carried from vertex shader to pixel shader.
//!
//! The teacher's `Interpolate` trait (`src/interpolate.rs`) and its
//! `declare_uniforms!` macro (`src/uniform.rs`) delegate barycentric/linear
//! interpolation field-by-field over a typed struct. `spec.md` §3/§9 asks
//! for something more constrained: a fixed-length flat array of `f32`s with
//! named accessors layered on top, so `scale`/`add`/`subtract`/`lerp` can be
//! implemented once, generically, over the flat view instead of being
//! regenerated per user struct. `declare_vertex_variables!` below is the
//! same code-generation strategy as `declare_uniforms!`, retargeted at that
//! flat-array requirement.

/// A fixed-length ordered sequence of `f32`s, `F` known at compile time for
/// a given specialized pipeline. `scale`/`add`/`subtract`/`lerp` must act
/// elementwise and are required to be linear: `lerp(a, b, 0) == a`,
/// `lerp(a, b, 1) == b` (`spec.md` §3).
pub trait VertexVariables: Clone {
    /// Flat, order-preserving view used by clipping and the fill stage.
    fn as_slice(&self) -> &[f32];
    fn as_mut_slice(&mut self) -> &mut [f32];

    #[inline]
    fn scale(&self, s: f32) -> Self
    where
        Self: Sized,
    {
        let mut out = self.clone();
        for v in out.as_mut_slice() {
            *v *= s;
        }
        out
    }

    #[inline]
    fn add(a: &Self, b: &Self) -> Self
    where
        Self: Sized,
    {
        let mut out = a.clone();
        for (o, bv) in out.as_mut_slice().iter_mut().zip(b.as_slice()) {
            *o += *bv;
        }
        out
    }

    #[inline]
    fn subtract(a: &Self, b: &Self) -> Self
    where
        Self: Sized,
    {
        let mut out = a.clone();
        for (o, bv) in out.as_mut_slice().iter_mut().zip(b.as_slice()) {
            *o -= *bv;
        }
        out
    }

    /// `lerp(a, b, t) = a + (b - a) * t`, `spec.md` §3.
    #[inline]
    fn lerp(a: &Self, b: &Self, t: f32) -> Self
    where
        Self: Sized,
    {
        let mut out = a.clone();
        for (o, bv) in out.as_mut_slice().iter_mut().zip(b.as_slice()) {
            *o += (*bv - *o) * t;
        }
        out
    }
}

/// Validates that a `VertexVariables` implementor's declared field count
/// matches its flat slice length, the one thing construction-time checking
/// (`spec.md` §7's `InvalidVertexVariablesLayout`) can actually verify for a
/// type that has already been reduced to "a flat array of floats" by the
/// time it reaches this trait.
pub fn validate_layout<V: VertexVariables + Default>(expected_len: usize) -> Result<(), &'static str> {
    let probe = V::default();
    if probe.as_slice().len() != expected_len {
        Err("declared field count does not match VertexVariables::as_slice length")
    } else {
        Ok(())
    }
}

/// The empty interpolant payload, for shaders that carry no per-vertex data
/// past the clip-space position (flat-colored or depth-only triangles).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexVariablesNone;

impl VertexVariables for VertexVariablesNone {
    #[inline(always)]
    fn as_slice(&self) -> &[f32] {
        &[]
    }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut []
    }
}

/// Declares a `VertexVariables` struct backed by a `[f32; N]`, with named
/// `Vector2`/`Vector3`/`Vector4`-shaped or scalar accessors over index
/// ranges, generated the way `declare_uniforms!` generates per-field
/// delegations (`src/uniform.rs`), but onto a flat array instead of typed
/// struct fields. The total length `N` is given explicitly since const
/// arithmetic over the field list isn't worth the macro complexity here.
///
/// ```ignore
/// declare_vertex_variables! {
///     pub struct GouraudVars: 8 {
///         pub world_position: vector3(0),
///         pub normal: vector3(3),
///         pub uv: vector2(6),
///     }
/// }
/// ```
#[macro_export]
macro_rules! declare_vertex_variables {
    (
        $(#[$($struct_attrs:tt)*])*
        pub struct $name:ident : $len:expr {
            $(
                $(#[$($field_attrs:tt)*])*
                pub $field:ident : $kind:ident ( $base:expr )
            ),* $(,)?
        }
    ) => {
        $(#[$($struct_attrs)*])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            values: [f32; $len],
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                $name { values: [0.0; $len] }
            }
        }

        impl $crate::VertexVariables for $name {
            #[inline]
            fn as_slice(&self) -> &[f32] { &self.values }

            #[inline]
            fn as_mut_slice(&mut self) -> &mut [f32] { &mut self.values }
        }

        impl $name {
            /// Declared backing length, for use as a `Shader::VARS_LEN`.
            pub const LEN: usize = $len;

            /// Construct directly from the flat backing array.
            #[inline]
            pub fn from_array(values: [f32; $len]) -> Self {
                $name { values }
            }

            $(
                declare_vertex_variables!(@accessor $field, $kind, $base);
            )*
        }
    };

    (@accessor $field:ident, scalar, $base:expr) => {
        #[inline(always)]
        pub fn $field(&self) -> f32 { self.values[$base] }
    };

    (@accessor $field:ident, vector2, $base:expr) => {
        #[inline(always)]
        pub fn $field(&self) -> ::nalgebra::Vector2<f32> {
            ::nalgebra::Vector2::new(self.values[$base], self.values[$base + 1])
        }
    };

    (@accessor $field:ident, vector3, $base:expr) => {
        #[inline(always)]
        pub fn $field(&self) -> ::nalgebra::Vector3<f32> {
            ::nalgebra::Vector3::new(self.values[$base], self.values[$base + 1], self.values[$base + 2])
        }
    };

    (@accessor $field:ident, vector4, $base:expr) => {
        #[inline(always)]
        pub fn $field(&self) -> ::nalgebra::Vector4<f32> {
            ::nalgebra::Vector4::new(
                self.values[$base],
                self.values[$base + 1],
                self.values[$base + 2],
                self.values[$base + 3],
            )
        }
    };

    (@accessor $field:ident, color, $base:expr) => {
        #[inline(always)]
        pub fn $field(&self) -> crate::color::Color {
            crate::color::Color::new(
                (self.values[$base] * 255.0) as u8,
                (self.values[$base + 1] * 255.0) as u8,
                (self.values[$base + 2] * 255.0) as u8,
                (self.values[$base + 3] * 255.0) as u8,
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::VertexVariables;

    declare_vertex_variables! {
        pub struct TestVars: 5 {
            pub uv: vector2(0),
            pub light: scalar(2),
            pub extra: vector2(3),
        }
    }

    #[test]
    fn lerp_is_linear_at_endpoints() {
        let a = TestVars::from_array([0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = TestVars::from_array([1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(VertexVariables::lerp(&a, &b, 0.0), a);
        assert_eq!(VertexVariables::lerp(&a, &b, 1.0), b);
    }

    #[test]
    fn scale_is_elementwise() {
        let a = TestVars::from_array([1.0, 2.0, 3.0, 4.0, 5.0]);
        let scaled = a.scale(2.0);
        assert_eq!(scaled.as_slice(), &[2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn named_accessors_read_the_right_range() {
        let v = TestVars::from_array([0.25, 0.75, 9.0, 1.0, 2.0]);
        assert_eq!(v.uv(), nalgebra::Vector2::new(0.25, 0.75));
        assert_eq!(v.light(), 9.0);
        assert_eq!(v.extra(), nalgebra::Vector2::new(1.0, 2.0));
    }
}
