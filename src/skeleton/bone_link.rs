//! 手部连杆
//!
//! 连杆由两个相邻关节派生，每帧根据端点重新计算：
//! 中点位置、沿关节方向的朝向、长度（关节距离的一半，对应以中点为中心的缩放）。

use glam::{Quat, Vec3};

use crate::hand::{HandJointId, Pose};
use crate::math::look_up_rotation;
use crate::scene::{CapsuleShape, NodeId};

/// 连杆派生状态
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkState {
    /// 两端点中点
    pub midpoint: Vec3,
    /// 本地 Y 轴对准 起点→终点 方向
    pub orientation: Quat,
    /// 关节距离的一半
    pub length: f32,
}

/// 连杆
#[derive(Clone, Debug)]
pub struct BoneLink {
    /// 起点关节
    pub start: HandJointId,
    /// 终点关节
    pub end: HandJointId,
    /// 代理节点
    pub(crate) node: Option<NodeId>,
    /// 最近一次有效的派生状态，任一端点无效时为 None
    pub(crate) state: Option<LinkState>,
}

impl BoneLink {
    pub fn new(start: HandJointId, end: HandJointId) -> Self {
        Self {
            start,
            end,
            node: None,
            state: None,
        }
    }

    #[inline]
    pub fn state(&self) -> Option<LinkState> {
        self.state
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.state.is_some()
    }

    /// 根据端点姿态更新，任一端点无效时连杆失效
    pub fn update(&mut self, start: Option<Pose>, end: Option<Pose>) -> Option<LinkState> {
        self.state = match (start, end) {
            (Some(s), Some(e)) => Some(Self::derive(s.position, e.position)),
            _ => None,
        };
        self.state
    }

    /// 从两端点位置派生连杆状态
    ///
    /// 零长度连杆保持单位朝向。
    pub fn derive(start: Vec3, end: Vec3) -> LinkState {
        let sub = end - start;
        LinkState {
            midpoint: 0.5 * (start + end),
            orientation: look_up_rotation(sub).unwrap_or(Quat::IDENTITY),
            length: 0.5 * sub.length(),
        }
    }
}

/// 根据连杆缩放计算胶囊体高度
///
/// height = 1 + 2r + 1 / (scale.y / scale.x)，长宽比低于 `min_ratio` 时按 `min_ratio` 计算，
/// 因此高度始终有限且不小于 2r + 1。
pub fn capsule_height(capsule: CapsuleShape, scale: Vec3, min_ratio: f32) -> f32 {
    let ratio = if scale.x.abs() > f32::EPSILON {
        (scale.y / scale.x).abs()
    } else {
        min_ratio
    };
    let ratio = if ratio.is_finite() { ratio.max(min_ratio) } else { min_ratio };
    1.0 + 2.0 * capsule.radius.max(0.0) + 1.0 / ratio
}
