//! 组合模式：单个接触同时产生旋转和平移
//!
//! 旋转：手腕根 → 近端关节 的平面向量，前后两帧的最短弧取逆。
//! 平移：手腕根的平面位移（全局项） + 去掉已计入旋转后指腹相对近端关节的残余位移（局部项）。

use glam::Vec3;

use crate::hand::FingerJointIndex::{Pad, Proximal, Root};
use crate::math::shortest_arc;
use super::{ContactSample, GestureDelta, GestureMode, GestureStrategy};

#[derive(Clone, Copy, Debug, Default)]
pub struct CombinedGesture;

impl GestureStrategy for CombinedGesture {
    fn mode(&self) -> GestureMode {
        GestureMode::Combined
    }

    fn extract(&self, sample: &ContactSample<'_>) -> Option<GestureDelta> {
        let required = [Root, Proximal, Pad];
        if !sample.previous.all_valid(&required) || !sample.current.all_valid(&required) {
            return None;
        }

        let (prev, cur) = (sample.previous, sample.current);
        let prev_root_to_start = prev.position(Proximal) - prev.position(Root);
        let cur_root_to_start = cur.position(Proximal) - cur.position(Root);
        let prev_start_to_pad = prev.position(Pad) - prev.position(Proximal);
        let cur_start_to_pad = cur.position(Pad) - cur.position(Proximal);

        // 旋转
        let rotation = sample.blended_inverse_arc(prev_root_to_start, cur_root_to_start);

        // 平移
        let global: Vec3 = sample.planar(cur.position(Root)) - sample.planar(prev.position(Root));
        let arc = shortest_arc(sample.planar(prev_root_to_start), sample.planar(cur_root_to_start));
        let local = cur_start_to_pad - arc * prev_start_to_pad;
        let translation = sample.local_translation(global + local);

        Some(GestureDelta { rotation, translation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{HandFinger, Handedness, JointChain, Pose, TouchFinger};
    use crate::math::{is_identity, same_rotation};
    use crate::touch::TouchSurface;
    use glam::Quat;

    fn chain(root: Vec3, proximal: Vec3, pad: Vec3) -> JointChain {
        JointChain::from_positions([root, proximal, proximal, proximal, pad, pad])
    }

    fn sample<'a>(prev: &'a JointChain, cur: &'a JointChain, surface: &'a TouchSurface) -> ContactSample<'a> {
        ContactSample {
            finger: TouchFinger::new(Handedness::Right, HandFinger::Index),
            previous: prev,
            current: cur,
            surface,
            thumb_active: false,
            blend: 0.2,
        }
    }

    #[test]
    fn test_identical_frames_produce_nothing() {
        let surface = TouchSurface::default();
        let c = chain(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.08), Vec3::new(0.0, -0.02, 0.15));
        let delta = CombinedGesture.extract(&sample(&c, &c, &surface)).unwrap();
        assert!(is_identity(delta.rotation, 1e-6));
        assert!(delta.translation.length() < 1e-7);
    }

    #[test]
    fn test_pad_slide_translates_opposite() {
        let surface = TouchSurface::default();
        let root = Vec3::ZERO;
        let proximal = Vec3::new(0.0, 0.0, 0.08);
        let prev = chain(root, proximal, Vec3::new(0.0, 0.0, 0.15));
        let cur = chain(root, proximal, Vec3::new(0.1, 0.0, 0.15));

        let delta = CombinedGesture.extract(&sample(&prev, &cur, &surface)).unwrap();
        assert!(is_identity(delta.rotation, 1e-6));
        assert!((delta.translation - Vec3::new(-0.02, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_translation_is_in_surface_frame() {
        let surface = TouchSurface::new(
            Pose::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
            Vec3::new(0.5, 0.01, 0.5),
        );
        let proximal = Vec3::new(0.0, 0.0, 0.08);
        let prev = chain(Vec3::ZERO, proximal, Vec3::new(0.0, 0.0, 0.15));
        // 沿世界 -Z 滑动 = 沿触控面本地 +X 滑动
        let cur = chain(Vec3::ZERO, proximal, Vec3::new(0.0, 0.0, 0.05));

        let delta = CombinedGesture.extract(&sample(&prev, &cur, &surface)).unwrap();
        assert!((delta.translation - Vec3::new(-0.02, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_hand_twist_rotates_opposite_and_blended() {
        let surface = TouchSurface::default();
        let twist = Quat::from_rotation_y(0.5);
        let proximal = Vec3::new(0.0, 0.0, 0.08);
        let pad = Vec3::new(0.0, 0.0, 0.15);
        let prev = chain(Vec3::ZERO, proximal, pad);
        let cur = chain(Vec3::ZERO, twist * proximal, twist * pad);

        let delta = CombinedGesture.extract(&sample(&prev, &cur, &surface)).unwrap();
        let expected = Quat::from_rotation_y(-0.1);
        assert!(same_rotation(delta.rotation, expected, 1e-6));
        // 整根手指刚性转动，残余平移为零
        assert!(delta.translation.length() < 1e-6);
    }

    #[test]
    fn test_missing_joint_is_skipped() {
        let surface = TouchSurface::default();
        let good = chain(Vec3::ZERO, Vec3::Z, Vec3::Z * 2.0);
        let mut bad = good;
        bad.valid &= !(1 << Proximal as u8);
        assert!(CombinedGesture.extract(&sample(&good, &bad, &surface)).is_none());
    }
}
