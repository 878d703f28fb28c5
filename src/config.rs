//! 引擎配置
//!
//! 所有参数扁平化，直接在代码中修改默认值即可。
//! 组件在 `new()` 时对全局配置做一次快照，也可通过 `with_config` 显式注入。

use glam::Vec3;
use once_cell::sync::Lazy;
use std::sync::RwLock;

use crate::{Result, TouchError};

/// 角速度归零判定方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngularSnap {
    /// 四元数实部低于阈值时归零
    ///
    /// 注意：实部小意味着旋转角接近 180°，并不是"小角度"判定，
    /// 保留它只是为了与既有手感一致。
    RealPart(f32),
    /// 旋转角（弧度）低于阈值时归零
    Angle(f32),
}

/// 引擎配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // ========== 骨架镜像 ==========
    /// 连杆胶囊体最小长宽比，防止零长度连杆导致高度无穷大
    pub min_link_scale_ratio: f32,

    // ========== 手指分类 ==========
    /// 弯曲度阈值（0~255 量程），低于此值视为张开
    pub curl_threshold: f32,
    /// 屈曲度阈值（0~255 量程）
    pub flexion_threshold: f32,
    /// 是否同时要求屈曲度低于阈值，默认 false（只看弯曲度）
    pub require_flexion: bool,

    // ========== 手势提取 ==========
    /// 每个接触的手势混合系数，默认 0.2
    pub gesture_blend: f32,
    /// 平移发射阈值（长度）
    pub translation_epsilon: f32,
    /// 旋转发射阈值（1 - |dot(q, identity)|）
    pub rotation_epsilon: f32,

    // ========== 相机 ==========
    /// 旋转增益，默认 1.0
    pub rotation_gain: f32,
    /// 各轴平移增益 (truck, jib, dolly)，默认 (1, 1, 1)
    pub translation_gain: Vec3,
    /// 是否启用惯性，默认 true
    pub inertia: bool,
    /// 线速度阻尼，默认 5.0
    pub linear_drag: f32,
    /// 角速度阻尼，默认 5.0
    pub angular_drag: f32,
    /// 线速度归零阈值，默认 0.01
    pub linear_snap_threshold: f32,
    /// 角速度归零判定，默认实部 < 0.01
    pub angular_snap: AngularSnap,

    // ========== 调试 ==========
    /// 是否输出逐帧调试日志，默认 false
    pub debug_log: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // ====== 骨架镜像 ======
            min_link_scale_ratio: 1.0e-3,

            // ====== 手指分类 ======
            // 特征提供方的量程近似 0~255，225 是实测校准值
            curl_threshold: 225.0,
            flexion_threshold: 225.0,
            require_flexion: false,

            // ====== 手势提取 ======
            gesture_blend: 0.2,
            translation_epsilon: 1.0e-5,
            rotation_epsilon: 1.0e-6,

            // ====== 相机 ======
            rotation_gain: 1.0,
            translation_gain: Vec3::ONE,
            inertia: true,
            linear_drag: 5.0,
            angular_drag: 5.0,
            linear_snap_threshold: 0.01,
            angular_snap: AngularSnap::RealPart(0.01),

            // ====== 调试 ======
            debug_log: false,
        }
    }
}

impl EngineConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if !(self.min_link_scale_ratio > 0.0) {
            return Err(TouchError::InvalidConfig(format!(
                "min_link_scale_ratio must be positive, got {}",
                self.min_link_scale_ratio
            )));
        }
        for (name, value) in [
            ("curl_threshold", self.curl_threshold),
            ("flexion_threshold", self.flexion_threshold),
        ] {
            if !(0.0..=255.0).contains(&value) {
                return Err(TouchError::InvalidConfig(format!(
                    "{} must be within 0..=255, got {}",
                    name, value
                )));
            }
        }
        if !self.gesture_blend.is_finite() {
            return Err(TouchError::InvalidConfig("gesture_blend must be finite".into()));
        }
        if !self.rotation_gain.is_finite() || !self.translation_gain.is_finite() {
            return Err(TouchError::InvalidConfig("camera gains must be finite".into()));
        }
        if self.linear_drag < 0.0 || self.angular_drag < 0.0 {
            return Err(TouchError::InvalidConfig(format!(
                "drag must be non-negative, got linear={} angular={}",
                self.linear_drag, self.angular_drag
            )));
        }
        if self.linear_snap_threshold < 0.0 {
            return Err(TouchError::InvalidConfig("linear_snap_threshold must be non-negative".into()));
        }
        Ok(())
    }
}

/// 全局配置实例
static ENGINE_CONFIG: Lazy<RwLock<EngineConfig>> = Lazy::new(|| {
    RwLock::new(EngineConfig::default())
});

/// 获取当前配置（只读）
pub fn get_config() -> EngineConfig {
    ENGINE_CONFIG.read().unwrap_or_else(|e| e.into_inner()).clone()
}

/// 设置配置（校验失败时保持原配置）
pub fn set_config(config: EngineConfig) -> Result<()> {
    config.validate()?;
    *ENGINE_CONFIG.write().unwrap_or_else(|e| e.into_inner()) = config;
    Ok(())
}

/// 重置为默认配置
pub fn reset_config() {
    *ENGINE_CONFIG.write().unwrap_or_else(|e| e.into_inner()) = EngineConfig::default();
}
