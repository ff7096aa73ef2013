//! 3D vector math for joint positions and relation encodings.
//!
//! `Vec3` is a plain value type: most operations return new values, while
//! `translate`/`scale` mutate in place because the averaging paths accumulate
//! into a single vector.  Comparison helpers (`is_about`, `is_bounded_by`)
//! work per axis, which is what the tolerance model of the matching engine
//! is defined in terms of.

use std::ops::{Add, Sub};

// ── Vec3 ───────────────────────────────────────────────────

/// A 3D vector (or point) with `f32` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Componentwise in-place addition.
    pub fn translate(&mut self, other: Vec3) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }

    /// In-place multiplication by a scalar.
    pub fn scale(&mut self, factor: f32) {
        self.x *= factor;
        self.y *= factor;
        self.z *= factor;
    }

    /// Componentwise in-place multiplication (the vector form of `scale`).
    pub fn scale_axes(&mut self, other: Vec3) {
        self.x *= other.x;
        self.y *= other.y;
        self.z *= other.z;
    }

    /// Negation, as a new value.
    pub fn inverse(&self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }

    /// Euclidean length.
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in this direction.
    ///
    /// A degenerate (zero or near-zero length) input returns `Vec3::ZERO`
    /// instead of dividing through and producing NaN components.
    pub fn unit(&self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            return Vec3::ZERO;
        }
        Vec3::new(self.x / len, self.y / len, self.z / len)
    }

    /// Dot product.
    pub fn dot(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Componentwise mean of a collection.  An empty slice yields `ZERO`.
    pub fn average(items: &[Vec3]) -> Vec3 {
        if items.is_empty() {
            return Vec3::ZERO;
        }
        let mut acc = Vec3::ZERO;
        for v in items {
            acc.translate(*v);
        }
        acc.scale(1.0 / items.len() as f32);
        acc
    }

    /// True iff every axis differs by at most `epsilon`.
    ///
    /// The bound is inclusive: a difference of exactly `epsilon` still
    /// matches; anything beyond it does not.
    pub fn is_about(&self, other: Vec3, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }

    /// True iff, per axis, this value lies between the two bounds.
    ///
    /// Bounds are order-normalized independently on each axis, so the two
    /// bound vectors are interchangeable and neither has to dominate the
    /// other componentwise.  The comparison is inclusive on both ends.
    pub fn is_bounded_by(&self, a: Vec3, b: Vec3) -> bool {
        axis_between(self.x, a.x, b.x)
            && axis_between(self.y, a.y, b.y)
            && axis_between(self.z, a.z, b.z)
    }
}

/// Whether `v` lies in the closed interval spanned by `a` and `b`.
fn axis_between(v: f32, a: f32, b: f32) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    lo <= v && v <= hi
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

// ── Tests ──────────────────────────────────────────────────
