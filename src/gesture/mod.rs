//! 手势提取 - 由接触手指的帧间关节链差分得到旋转 / 平移
//!
//! - GestureStrategy: 单个接触的增量提取策略
//!   - CombinedGesture: 单指同时驱动旋转和平移
//!   - SeparatedGesture: 拇指按下时其余手指驱动旋转，否则驱动平移
//! - GestureAccumulator: 每帧累积所有接触的增量，非单位时发射事件并复位

mod accumulator;
mod combined;
mod separated;

pub use accumulator::{EmitResult, GestureAccumulator, GestureEvent, GestureListener};
pub use combined::CombinedGesture;
pub use separated::SeparatedGesture;

use glam::{Quat, Vec3};

use crate::hand::{JointChain, TouchFinger};
use crate::math::{project_on_plane, shortest_arc, slerp_from_identity};
use crate::touch::TouchSurface;

/// 手势模式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureMode {
    /// 单指同时驱动旋转和平移
    #[default]
    Combined,
    /// 不同手指分别驱动旋转和平移
    Separated,
}

/// 单个接触的增量
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureDelta {
    /// 已按混合系数插值的旋转增量
    pub rotation: Quat,
    /// 已按混合系数缩放的平移增量（触控面本地坐标）
    pub translation: Vec3,
}

impl GestureDelta {
    pub const NONE: GestureDelta = GestureDelta {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };
}

/// 单个接触在本帧的采样
#[derive(Clone, Copy, Debug)]
pub struct ContactSample<'a> {
    pub finger: TouchFinger,
    pub previous: &'a JointChain,
    pub current: &'a JointChain,
    pub surface: &'a TouchSurface,
    /// 同一只手的拇指是否正在接触
    pub thumb_active: bool,
    /// 混合系数
    pub blend: f32,
}

impl ContactSample<'_> {
    /// 投影到触控面所在平面
    #[inline]
    pub(crate) fn planar(&self, v: Vec3) -> Vec3 {
        project_on_plane(v, self.surface.up())
    }

    /// 两帧平面向量之间的旋转：最短弧取逆，再从单位旋转插值 blend
    pub(crate) fn blended_inverse_arc(&self, from: Vec3, to: Vec3) -> Quat {
        let arc = shortest_arc(self.planar(from), self.planar(to));
        slerp_from_identity(arc.inverse(), self.blend)
    }

    /// 世界平面位移 → 取反 → 触控面本地 → 乘混合系数
    pub(crate) fn local_translation(&self, world_delta: Vec3) -> Vec3 {
        self.surface.vector_to_local(self.planar(-world_delta)) * self.blend
    }
}

/// 手势提取策略
pub trait GestureStrategy: std::fmt::Debug + Send + Sync {
    fn mode(&self) -> GestureMode;

    /// 提取单个接触的增量，关节数据不足时返回 None
    fn extract(&self, sample: &ContactSample<'_>) -> Option<GestureDelta>;
}

/// 按模式创建策略
pub fn strategy_for(mode: GestureMode) -> Box<dyn GestureStrategy> {
    match mode {
        GestureMode::Combined => Box::new(CombinedGesture),
        GestureMode::Separated => Box::new(SeparatedGesture),
    }
}
