//! 手势累积器
//!
//! 每帧累积所有接触的增量：旋转左乘（按处理顺序组合），平移相加。
//! 发射时只在超过阈值时触发事件并复位该分量，低于阈值的量跨帧保留。

use glam::{Quat, Vec3};

use crate::math::{is_identity, quat_to_euler_degrees};
use super::GestureDelta;

/// 手势事件
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// 触控面本地平移 (x, y, z)
    Translate(Vec3),
    /// 旋转欧拉角（度）(pitch, yaw, roll)
    Rotate(Vec3),
}

/// 手势事件订阅者
pub trait GestureListener {
    fn on_translate(&mut self, delta: Vec3);

    /// 欧拉角（度）(pitch, yaw, roll)
    fn on_rotate(&mut self, euler_degrees: Vec3);
}

/// 收集事件，主要用于测试和回放
impl GestureListener for Vec<GestureEvent> {
    fn on_translate(&mut self, delta: Vec3) {
        self.push(GestureEvent::Translate(delta));
    }

    fn on_rotate(&mut self, euler_degrees: Vec3) {
        self.push(GestureEvent::Rotate(euler_degrees));
    }
}

/// 本帧发射结果
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitResult {
    pub translated: bool,
    pub rotated: bool,
}

/// 手势累积器
#[derive(Clone, Copy, Debug)]
pub struct GestureAccumulator {
    net_rotation: Quat,
    net_translation: Vec3,
}

impl Default for GestureAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureAccumulator {
    pub fn new() -> Self {
        Self {
            net_rotation: Quat::IDENTITY,
            net_translation: Vec3::ZERO,
        }
    }

    /// 累积单个接触的增量
    pub fn accumulate(&mut self, delta: GestureDelta) {
        self.net_rotation = (delta.rotation * self.net_rotation).normalize();
        self.net_translation += delta.translation;
    }

    #[inline]
    pub fn net_rotation(&self) -> Quat {
        self.net_rotation
    }

    #[inline]
    pub fn net_translation(&self) -> Vec3 {
        self.net_translation
    }

    /// 复位为单位旋转 / 零平移
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// 发射超过阈值的平移与旋转，只复位已发射的分量；
    /// 低于阈值的量保留到后续帧继续累积
    pub fn emit(
        &mut self,
        listener: &mut dyn GestureListener,
        translation_epsilon: f32,
        rotation_epsilon: f32,
    ) -> EmitResult {
        let mut result = EmitResult::default();

        if self.net_translation.length_squared() > translation_epsilon * translation_epsilon {
            listener.on_translate(self.net_translation);
            self.net_translation = Vec3::ZERO;
            result.translated = true;
        }

        if !is_identity(self.net_rotation, rotation_epsilon) {
            listener.on_rotate(quat_to_euler_degrees(self.net_rotation));
            self.net_rotation = Quat::IDENTITY;
            result.rotated = true;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_nothing_when_idle() {
        let mut acc = GestureAccumulator::new();
        let mut events: Vec<GestureEvent> = Vec::new();
        let result = acc.emit(&mut events, 1e-5, 1e-6);
        assert_eq!(result, EmitResult::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_emit_and_reset() {
        let mut acc = GestureAccumulator::new();
        acc.accumulate(GestureDelta {
            rotation: Quat::from_rotation_y(10f32.to_radians()),
            translation: Vec3::new(0.01, 0.0, 0.0),
        });
        acc.accumulate(GestureDelta {
            rotation: Quat::from_rotation_y(5f32.to_radians()),
            translation: Vec3::new(0.0, 0.0, 0.02),
        });

        let mut events: Vec<GestureEvent> = Vec::new();
        let result = acc.emit(&mut events, 1e-5, 1e-6);
        assert!(result.translated && result.rotated);
        assert_eq!(events.len(), 2);
        match events[0] {
            GestureEvent::Translate(t) => assert!((t - Vec3::new(0.01, 0.0, 0.02)).length() < 1e-6),
            other => panic!("unexpected event {:?}", other),
        }
        match events[1] {
            GestureEvent::Rotate(e) => assert!((e - Vec3::new(0.0, 15.0, 0.0)).length() < 1e-3),
            other => panic!("unexpected event {:?}", other),
        }

        // 已复位，下一帧不再发射
        events.clear();
        acc.emit(&mut events, 1e-5, 1e-6);
        assert!(events.is_empty());
        assert_eq!(acc.net_rotation(), Quat::IDENTITY);
        assert_eq!(acc.net_translation(), Vec3::ZERO);
    }

    #[test]
    fn test_sub_threshold_motion_builds_up() {
        let mut acc = GestureAccumulator::new();
        let mut events: Vec<GestureEvent> = Vec::new();
        // 每帧 0.05°，单帧低于旋转阈值
        let step = GestureDelta {
            rotation: Quat::from_rotation_y(0.05f32.to_radians()),
            translation: Vec3::new(4.0e-6, 0.0, 0.0),
        };

        acc.accumulate(step);
        let first = acc.emit(&mut events, 1e-5, 1e-6);
        assert_eq!(first, EmitResult::default());
        assert!(events.is_empty());

        let mut frames = 1;
        while events.iter().all(|e| !matches!(e, GestureEvent::Rotate(_))) && frames < 100 {
            acc.accumulate(step);
            acc.emit(&mut events, 1e-5, 1e-6);
            frames += 1;
        }
        assert!(frames < 100);
        assert!(events.iter().any(|e| matches!(e, GestureEvent::Translate(_))));
        let yaw: f32 = events
            .iter()
            .filter_map(|e| match e {
                GestureEvent::Rotate(r) => Some(r.y),
                _ => None,
            })
            .sum();
        assert!((yaw - 0.05 * frames as f32).abs() < 1e-2);
    }

    #[test]
    fn test_translation_only_is_edge_triggered() {
        let mut acc = GestureAccumulator::new();
        acc.accumulate(GestureDelta {
            translation: Vec3::new(0.0, 0.0, -0.02),
            ..GestureDelta::NONE
        });
        let mut events: Vec<GestureEvent> = Vec::new();
        let result = acc.emit(&mut events, 1e-5, 1e-6);
        assert!(result.translated);
        assert!(!result.rotated);
        assert_eq!(events.len(), 1);
    }
}
