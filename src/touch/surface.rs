//! 触控面
//!
//! 有向长方体，接触点取手指碰撞体中心在盒体上的最近点。

use glam::{Quat, Vec3};

use crate::hand::Pose;

/// 触控面
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSurface {
    /// 盒体中心与朝向
    pub pose: Pose,
    /// 半尺寸
    pub half_extents: Vec3,
}

impl TouchSurface {
    pub fn new(pose: Pose, half_extents: Vec3) -> Self {
        Self {
            pose,
            half_extents: half_extents.abs(),
        }
    }

    /// 面的上方向（本地 Y 轴）
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.pose.rotation * Vec3::Y
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.pose.rotation
    }

    /// 世界点在盒体上的最近点（盒内点返回自身）
    pub fn closest_point(&self, world: Vec3) -> Vec3 {
        let local = self.pose.inverse_transform_point(world);
        let clamped = local.clamp(-self.half_extents, self.half_extents);
        self.pose.transform_point(clamped)
    }

    /// 世界点 → 触控面本地坐标
    #[inline]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.pose.inverse_transform_point(world)
    }

    /// 世界向量 → 触控面本地方向
    #[inline]
    pub fn vector_to_local(&self, v: Vec3) -> Vec3 {
        self.pose.rotation.inverse() * v
    }
}

impl Default for TouchSurface {
    fn default() -> Self {
        Self::new(Pose::IDENTITY, Vec3::new(0.5, 0.01, 0.5))
    }
}
