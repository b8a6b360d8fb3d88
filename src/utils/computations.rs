use num_traits::Float;

pub fn length_squared<F: Float>(v: &[F; 3]) -> F {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}

/// Rotation matrix equivalent to the unit quaternion `q = (w, i, j, k)`.
///
/// ```rust
/// use asphere::utils::quat_to_mat;
///
/// let rot = quat_to_mat(&[1.0, 0.0, 0.0, 0.0]);
/// assert_eq!(rot, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn quat_to_mat<F: Float>(q: &[F; 4]) -> [[F; 3]; 3] {
    let two = F::one() + F::one();
    let w2 = q[0] * q[0];
    let i2 = q[1] * q[1];
    let j2 = q[2] * q[2];
    let k2 = q[3] * q[3];
    let twoij = two * q[1] * q[2];
    let twoik = two * q[1] * q[3];
    let twojk = two * q[2] * q[3];
    let twoiw = two * q[1] * q[0];
    let twojw = two * q[2] * q[0];
    let twokw = two * q[3] * q[0];

    [
        [w2 + i2 - j2 - k2, twoij - twokw, twojw + twoik],
        [twoij + twokw, w2 - i2 + j2 - k2, twojk - twoiw],
        [twoik - twojw, twojk + twoiw, w2 - i2 - j2 + k2],
    ]
}

/// `m^T * v`, which undoes the rotation `m` when `m` is orthonormal
pub fn transpose_matvec<F: Float>(m: &[[F; 3]; 3], v: &[F; 3]) -> [F; 3] {
    [
        m[0][0] * v[0] + m[1][0] * v[1] + m[2][0] * v[2],
        m[0][1] * v[0] + m[1][1] * v[1] + m[2][1] * v[2],
        m[0][2] * v[0] + m[1][2] * v[1] + m[2][2] * v[2],
    ]
}

pub fn matvec<F: Float>(m: &[[F; 3]; 3], v: &[F; 3]) -> [F; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}
