//! 惯性相机
//!
//! 每帧流程：
//! 1. position += linear_velocity * dt
//! 2. orientation = slerp(identity, angular_velocity, dt) * orientation（不钳制，允许外推）
//! 3. 有惯性：速度按 clamp(1 - drag * dt, 0, 1) 衰减，低于阈值归零
//!    无惯性：速度直接归零
//!
//! 手势输入（pan_tilt / dolly_track）在有惯性时叠加到速度，否则直接作用于位姿。

use glam::{Quat, Vec3};

use crate::config::AngularSnap;
use crate::gesture::GestureListener;
use crate::math::{quat_from_euler_degrees, slerp_from_identity};
use super::CameraConfig;

/// 惯性相机
#[derive(Debug, Clone)]
pub struct CameraRig {
    position: Vec3,
    orientation: Quat,
    /// 线速度（世界坐标，单位/秒）
    linear_velocity: Vec3,
    /// 角速度：旋转量即每秒转角
    angular_velocity: Quat,

    // 初始位姿（reset 时恢复）
    initial_position: Vec3,
    initial_orientation: Quat,

    config: CameraConfig,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::with_config(Vec3::ZERO, Quat::IDENTITY, CameraConfig::default())
    }
}

impl CameraRig {
    /// 使用全局配置创建
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self::with_config(position, orientation, CameraConfig::from_global())
    }

    pub fn with_config(position: Vec3, orientation: Quat, config: CameraConfig) -> Self {
        let orientation = orientation.normalize();
        log::info!(
            "相机创建: 位置={:?}, 惯性={}, 阻尼=({}, {})",
            position, config.inertia, config.linear_drag, config.angular_drag
        );
        Self {
            position,
            orientation,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Quat::IDENTITY,
            initial_position: position,
            initial_orientation: orientation,
            config,
        }
    }

    // ========================================
    // 积分
    // ========================================

    /// 推进一帧
    pub fn step(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("[Camera] 非法 dt={}，按 0 处理", dt);
            0.0
        };

        self.position += self.linear_velocity * dt;
        self.orientation = (slerp_from_identity(self.angular_velocity, dt) * self.orientation).normalize();

        if !self.config.inertia {
            self.linear_velocity = Vec3::ZERO;
            self.angular_velocity = Quat::IDENTITY;
            return;
        }

        let linear_keep = (1.0 - self.config.linear_drag * dt).clamp(0.0, 1.0);
        self.linear_velocity *= linear_keep;
        if self.linear_velocity.length() < self.config.linear_snap_threshold {
            self.linear_velocity = Vec3::ZERO;
        }

        let angular_keep = (1.0 - self.config.angular_drag * dt).clamp(0.0, 1.0);
        self.angular_velocity = slerp_from_identity(self.angular_velocity, angular_keep);
        if self.should_snap_angular() {
            self.angular_velocity = Quat::IDENTITY;
        }
    }

    fn should_snap_angular(&self) -> bool {
        match self.config.angular_snap {
            // 实部接近 0 对应接近 180° 的旋转，沿用既有手感
            AngularSnap::RealPart(threshold) => self.angular_velocity.w < threshold,
            AngularSnap::Angle(threshold) => self.angular_velocity.angle_between(Quat::IDENTITY) < threshold,
        }
    }

    // ========================================
    // 输入
    // ========================================

    /// 俯仰 / 偏航 / 翻滚（度）
    pub fn pan_tilt(&mut self, pitch: f32, yaw: f32, roll: f32) {
        let delta = slerp_from_identity(
            quat_from_euler_degrees(Vec3::new(pitch, yaw, roll)),
            self.config.rotation_gain,
        );
        if self.config.inertia {
            self.angular_velocity = (delta * self.angular_velocity).normalize();
        } else {
            self.orientation = (delta * self.orientation).normalize();
        }
    }

    /// 横移 / 升降 / 推拉（相机本地轴）
    pub fn dolly_track(&mut self, truck: f32, jib: f32, dolly: f32) {
        let local = Vec3::new(truck, jib, dolly) * self.config.translation_gain;
        let world = self.orientation * local;
        if self.config.inertia {
            self.linear_velocity += world;
        } else {
            self.position += world;
        }
    }

    /// 直接覆盖位姿，不影响速度
    pub fn set_pose(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation.normalize();
    }

    /// 速度归零并恢复初始位姿
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.orientation = self.initial_orientation;
        self.linear_velocity = Vec3::ZERO;
        self.angular_velocity = Quat::IDENTITY;
    }

    /// 切换惯性；关闭时立即清空残余速度
    pub fn set_inertia(&mut self, enabled: bool) {
        if self.config.inertia == enabled {
            return;
        }
        self.config.inertia = enabled;
        if !enabled {
            self.linear_velocity = Vec3::ZERO;
            self.angular_velocity = Quat::IDENTITY;
        }
        log::info!("[Camera] 惯性: {}", enabled);
    }

    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear_velocity = velocity;
    }

    pub fn set_angular_velocity(&mut self, velocity: Quat) {
        self.angular_velocity = velocity.normalize();
    }

    // ========================================
    // 查询
    // ========================================

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    #[inline]
    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    #[inline]
    pub fn angular_velocity(&self) -> Quat {
        self.angular_velocity
    }

    #[inline]
    pub fn inertia(&self) -> bool {
        self.config.inertia
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

impl GestureListener for CameraRig {
    fn on_translate(&mut self, delta: Vec3) {
        self.dolly_track(delta.x, delta.y, delta.z);
    }

    fn on_rotate(&mut self, euler_degrees: Vec3) {
        self.pan_tilt(euler_degrees.x, euler_degrees.y, euler_degrees.z);
    }
}
