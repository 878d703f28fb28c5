//! 相机 - 惯性积分器
//!
//! - CameraRig: 位置 / 朝向 + 线速度 / 角速度，每帧按 dt 推进并衰减
//! - CameraConfig: 从 EngineConfig 中拆出的相机参数快照

mod camera_rig;

pub use camera_rig::CameraRig;

use glam::Vec3;

use crate::config::{get_config, AngularSnap, EngineConfig};

/// 相机参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// 旋转增益
    pub rotation_gain: f32,
    /// 各轴平移增益 (truck, jib, dolly)
    pub translation_gain: Vec3,
    pub inertia: bool,
    pub linear_drag: f32,
    pub angular_drag: f32,
    pub linear_snap_threshold: f32,
    pub angular_snap: AngularSnap,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for CameraConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            rotation_gain: config.rotation_gain,
            translation_gain: config.translation_gain,
            inertia: config.inertia,
            linear_drag: config.linear_drag,
            angular_drag: config.angular_drag,
            linear_snap_threshold: config.linear_snap_threshold,
            angular_snap: config.angular_snap,
        }
    }
}

impl CameraConfig {
    /// 全局配置快照
    pub fn from_global() -> Self {
        Self::from(&get_config())
    }
}
