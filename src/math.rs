//! 几何辅助函数
//!
//! 零长度输入一律退化为单位旋转，不产生 NaN。

use glam::{EulerRot, Quat, Vec3};

/// 零长度判定阈值（平方）
const ZERO_LENGTH_SQ: f32 = 1e-12;

/// 向量投影到以 `normal` 为法线的平面
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    v - n * v.dot(n)
}

/// from → to 的最短弧旋转，任一向量长度为零时返回单位旋转
pub fn shortest_arc(from: Vec3, to: Vec3) -> Quat {
    if from.length_squared() < ZERO_LENGTH_SQ || to.length_squared() < ZERO_LENGTH_SQ {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(from.normalize(), to.normalize())
}

/// 以 `up` 为轴朝向 `direction` 的旋转（对象本地 Y 轴对准方向）
pub fn look_up_rotation(direction: Vec3) -> Option<Quat> {
    if direction.length_squared() < ZERO_LENGTH_SQ {
        return None;
    }
    Some(Quat::from_rotation_arc(Vec3::Y, direction.normalize()))
}

/// 从单位旋转向 `q` 做不钳制的球面插值
///
/// `t` 可以超出 [0, 1]，此时为外推。
#[inline]
pub fn slerp_from_identity(q: Quat, t: f32) -> Quat {
    Quat::IDENTITY.slerp(q, t)
}

/// 两个旋转是否相同（q 与 -q 视为相同）
///
/// 比较 |dot| 而非夹角：f32 下 acos 在 1 附近精度只有约 7e-4 弧度。
#[inline]
pub fn same_rotation(a: Quat, b: Quat, epsilon: f32) -> bool {
    a.dot(b).abs() >= 1.0 - epsilon
}

/// 是否为单位旋转
#[inline]
pub fn is_identity(q: Quat, epsilon: f32) -> bool {
    same_rotation(q, Quat::IDENTITY, epsilon)
}

/// 欧拉角（度）→ 四元数
///
/// 分量为 (pitch, yaw, roll)，先绕 Z 再绕 X 最后绕 Y。
pub fn quat_from_euler_degrees(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// 四元数 → 欧拉角（度），与 `quat_from_euler_degrees` 互逆
///
/// 返回 (pitch, yaw, roll)，各分量在 (-180, 180]。
pub fn quat_to_euler_degrees(q: Quat) -> Vec3 {
    let (yaw, pitch, roll) = q.normalize().to_euler(EulerRot::YXZ);
    Vec3::new(
        wrap_degrees(pitch.to_degrees()),
        wrap_degrees(yaw.to_degrees()),
        wrap_degrees(roll.to_degrees()),
    )
}

/// 角度归一化到 (-180, 180]
fn wrap_degrees(deg: f32) -> f32 {
    let mut r = deg % 360.0;
    if r <= -180.0 {
        r += 360.0;
    } else if r > 180.0 {
        r -= 360.0;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortest_arc_degenerate_is_identity() {
        assert_eq!(shortest_arc(Vec3::ZERO, Vec3::X), Quat::IDENTITY);
        assert_eq!(shortest_arc(Vec3::X, Vec3::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn test_shortest_arc_rotates_from_to() {
        let from = Vec3::new(2.0, 0.0, 0.0);
        let to = Vec3::new(0.0, 0.0, 3.0);
        let q = shortest_arc(from, to);
        assert!((q * Vec3::X - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_project_on_plane() {
        let v = project_on_plane(Vec3::new(1.0, 2.0, 3.0), Vec3::Y * 5.0);
        assert!((v - Vec3::new(1.0, 0.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_euler_degrees_round_trip() {
        let euler = Vec3::new(10.0, -35.0, 5.0);
        let back = quat_to_euler_degrees(quat_from_euler_degrees(euler));
        assert!((back - euler).length() < 1e-3);
    }

    #[test]
    fn test_is_identity_accepts_negated() {
        assert!(is_identity(-Quat::IDENTITY, 1e-6));
        assert!(!is_identity(Quat::from_rotation_y(0.1), 1e-6));
    }

    #[test]
    fn test_same_rotation_tolerates_rounding() {
        let direct = Quat::from_rotation_y(-0.1);
        let blended = slerp_from_identity(Quat::from_rotation_y(-0.5), 0.2);
        assert!(same_rotation(direct, blended, 1e-6));
        assert!(same_rotation(direct, -blended, 1e-6));
        assert!(!same_rotation(direct, Quat::from_rotation_y(-0.11), 1e-6));
    }

    #[test]
    fn test_slerp_extrapolates() {
        let q = Quat::from_rotation_z(0.2);
        let doubled = slerp_from_identity(q, 2.0);
        assert!((doubled.angle_between(Quat::IDENTITY) - 0.4).abs() < 1e-4);
    }
}
