//! 分离模式：拇指作为模式键
//!
//! - 拇指正在接触：其余手指用 手腕根 → 指腹 的平面向量产生旋转
//! - 拇指未接触：其余手指用指腹的平面位移产生平移
//! - 拇指自身不产生任何增量

use crate::hand::FingerJointIndex::{Pad, Root};
use crate::hand::HandFinger;
use super::{ContactSample, GestureDelta, GestureMode, GestureStrategy};

#[derive(Clone, Copy, Debug, Default)]
pub struct SeparatedGesture;

impl GestureStrategy for SeparatedGesture {
    fn mode(&self) -> GestureMode {
        GestureMode::Separated
    }

    fn extract(&self, sample: &ContactSample<'_>) -> Option<GestureDelta> {
        if sample.finger.finger == HandFinger::Thumb {
            return None;
        }
        let (prev, cur) = (sample.previous, sample.current);

        if sample.thumb_active {
            if !prev.all_valid(&[Root, Pad]) || !cur.all_valid(&[Root, Pad]) {
                return None;
            }
            let rotation = sample.blended_inverse_arc(
                prev.position(Pad) - prev.position(Root),
                cur.position(Pad) - cur.position(Root),
            );
            Some(GestureDelta {
                rotation,
                ..GestureDelta::NONE
            })
        } else {
            if !prev.is_valid(Pad) || !cur.is_valid(Pad) {
                return None;
            }
            let translation = sample.local_translation(cur.position(Pad) - prev.position(Pad));
            Some(GestureDelta {
                translation,
                ..GestureDelta::NONE
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{Handedness, JointChain, TouchFinger};
    use crate::math::{is_identity, same_rotation};
    use crate::touch::TouchSurface;
    use glam::{Quat, Vec3};

    fn chain(root: Vec3, pad: Vec3) -> JointChain {
        let proximal = root + Vec3::Z * 0.08;
        JointChain::from_positions([root, proximal, proximal, proximal, pad, pad])
    }

    fn sample<'a>(
        finger: HandFinger,
        prev: &'a JointChain,
        cur: &'a JointChain,
        surface: &'a TouchSurface,
        thumb_active: bool,
    ) -> ContactSample<'a> {
        ContactSample {
            finger: TouchFinger::new(Handedness::Left, finger),
            previous: prev,
            current: cur,
            surface,
            thumb_active,
            blend: 0.2,
        }
    }

    #[test]
    fn test_translation_uses_pad_only() {
        let surface = TouchSurface::default();
        // 手腕根移动不影响平移，只看指腹
        let prev = chain(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.15));
        let cur = chain(Vec3::new(0.3, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.25));

        let delta = SeparatedGesture
            .extract(&sample(HandFinger::Index, &prev, &cur, &surface, false))
            .unwrap();
        assert!(is_identity(delta.rotation, 1e-6));
        assert!((delta.translation - Vec3::new(0.0, 0.0, -0.02)).length() < 1e-6);
    }

    #[test]
    fn test_thumb_active_selects_rotation() {
        let surface = TouchSurface::default();
        let twist = Quat::from_rotation_y(-0.4);
        let pad = Vec3::new(0.0, 0.0, 0.15);
        let prev = chain(Vec3::ZERO, pad);
        let cur = chain(Vec3::ZERO, twist * pad);

        let delta = SeparatedGesture
            .extract(&sample(HandFinger::Middle, &prev, &cur, &surface, true))
            .unwrap();
        assert!(delta.translation.length() < 1e-7);
        assert!(same_rotation(delta.rotation, Quat::from_rotation_y(0.08), 1e-6));
    }

    #[test]
    fn test_thumb_contributes_nothing() {
        let surface = TouchSurface::default();
        let prev = chain(Vec3::ZERO, Vec3::Z);
        let cur = chain(Vec3::ZERO, Vec3::X);
        assert!(SeparatedGesture
            .extract(&sample(HandFinger::Thumb, &prev, &cur, &surface, true))
            .is_none());
        assert!(SeparatedGesture
            .extract(&sample(HandFinger::Thumb, &prev, &cur, &surface, false))
            .is_none());
    }

    #[test]
    fn test_identical_frames_produce_nothing() {
        let surface = TouchSurface::default();
        let c = chain(Vec3::ZERO, Vec3::new(0.02, 0.0, 0.15));
        for thumb_active in [false, true] {
            let delta = SeparatedGesture
                .extract(&sample(HandFinger::Ring, &c, &c, &surface, thumb_active))
                .unwrap();
            assert!(is_identity(delta.rotation, 1e-6));
            assert!(delta.translation.length() < 1e-7);
        }
    }
}
