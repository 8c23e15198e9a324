// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.

//! Quaternion to Euler angle conversion with a selectable axis order.
//!
//! Everything is right handed, with counter-clockwise positive rotations.
//! Angles are intrinsic: for [`EulerOrder::Yxz`] the rotation is about Y first,
//! then about the rotated X axis, then about the twice rotated Z axis. This is the
//! yaw, pitch, roll order of a Y-up head tracker.

use nalgebra::{convert, RealField, Unit, UnitQuaternion, Vector3};

/// A coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X axis, positive is right
    X = 0,
    /// Y axis, positive is up
    Y = 1,
    /// Z axis, positive is backwards
    Z = 2,
}

impl Axis {
    fn index(self) -> usize {
        self as usize
    }

    fn unit<T: RealField>(self) -> Unit<Vector3<T>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// Order of the three rotations. The first letter is the first rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EulerOrder {
    /// X, then Y, then Z
    Xyz,
    /// X, then Z, then Y
    Xzy,
    /// Y, then X, then Z. Yaw, pitch, roll.
    Yxz,
    /// Y, then Z, then X
    Yzx,
    /// Z, then X, then Y
    Zxy,
    /// Z, then Y, then X
    Zyx,
}

impl EulerOrder {
    /// All orders
    pub const ALL: [EulerOrder; 6] = [
        EulerOrder::Xyz,
        EulerOrder::Xzy,
        EulerOrder::Yxz,
        EulerOrder::Yzx,
        EulerOrder::Zxy,
        EulerOrder::Zyx,
    ];

    /// The three axes, in rotation order
    pub fn axes(self) -> (Axis, Axis, Axis) {
        match self {
            EulerOrder::Xyz => (Axis::X, Axis::Y, Axis::Z),
            EulerOrder::Xzy => (Axis::X, Axis::Z, Axis::Y),
            EulerOrder::Yxz => (Axis::Y, Axis::X, Axis::Z),
            EulerOrder::Yzx => (Axis::Y, Axis::Z, Axis::X),
            EulerOrder::Zxy => (Axis::Z, Axis::X, Axis::Y),
            EulerOrder::Zyx => (Axis::Z, Axis::Y, Axis::X),
        }
    }

    /// `true` if the axes are a cyclic permutation of X, Y, Z
    fn is_even(self) -> bool {
        let (a1, a2, a3) = self.axes();
        (a1.index() + 1) % 3 == a2.index() && (a2.index() + 1) % 3 == a3.index()
    }
}

/// Distance from ±1 of the middle angle's sine, below which we are considered
/// to be in gimbal lock.
const SINGULARITY_RADIUS: f64 = 1e-7;

/// Decompose `rotation` into three angles (in radians) about the axes of `order`.
///
/// The first and last angles are in `-π..=π`, the middle one in `-π/2..=π/2`.
/// In gimbal lock the first angle is 0, and the last one absorbs the whole
/// rotation around the locked axis.
pub fn euler_angles<T: RealField + Copy>(
    rotation: &UnitQuaternion<T>,
    order: EulerOrder,
) -> (T, T, T) {
    let (a1, a2, a3) = order.axes();
    let q = rotation.quaternion();
    let w = q.w;
    let v = [q.i, q.j, q.k];
    let (q1, q2, q3) = (v[a1.index()], v[a2.index()], v[a3.index()]);

    let one = T::one();
    let two = convert::<f64, T>(2.0);
    let psign = if order.is_even() { one } else { -one };
    let radius = convert::<f64, T>(SINGULARITY_RADIUS);

    let ww = w * w;
    let q11 = q1 * q1;
    let q22 = q2 * q2;
    let q33 = q3 * q3;

    let s2 = psign * two * (psign * w * q2 + q1 * q3);

    if s2 < -one + radius {
        // South pole
        let c = (two * (psign * q1 * q2 + w * q3)).atan2(ww + q22 - q11 - q33);
        (T::zero(), -T::frac_pi_2(), c)
    } else if s2 > one - radius {
        // North pole
        let c = (two * (psign * q1 * q2 + w * q3)).atan2(ww + q22 - q11 - q33);
        (T::zero(), T::frac_pi_2(), c)
    } else {
        let a = (two * (w * q1 - psign * q2 * q3)).atan2(ww + q33 - q11 - q22);
        let b = s2.asin();
        let c = (two * (w * q3 - psign * q1 * q2)).atan2(ww + q11 - q22 - q33);
        (a, b, c)
    }
}

/// Compose three intrinsic rotations (in radians) about the axes of `order`.
/// Inverse of [`euler_angles`] outside of gimbal lock.
pub fn from_euler_angles<T: RealField + Copy>(
    order: EulerOrder,
    a: T,
    b: T,
    c: T,
) -> UnitQuaternion<T> {
    let (a1, a2, a3) = order.axes();
    UnitQuaternion::from_axis_angle(&a1.unit(), a)
        * UnitQuaternion::from_axis_angle(&a2.unit(), b)
        * UnitQuaternion::from_axis_angle(&a3.unit(), c)
}

/// Convert radians to degrees
pub fn rad_to_degree<T: RealField + Copy>(rad: T) -> T {
    rad * (convert::<f64, T>(180.0) / T::pi())
}
