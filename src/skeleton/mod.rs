//! 骨架镜像 - 把追踪到的手部关节映射为可渲染 / 可碰撞的代理节点
//!
//! 核心设计思想：
//! - BoneLink: 相邻关节派生的连杆（中点、朝向、长度）
//! - HandSkeleton: 单手节点层级（根 + 5 根手指的关节 / 连杆 / 指尖）
//! - SkeletonMirror: 双手镜像，独占节点池

mod bone_link;
mod hand_skeleton;

pub use bone_link::{capsule_height, BoneLink, LinkState};
pub use hand_skeleton::{HandSkeleton, LINK_COUNT};

use crate::config::{get_config, EngineConfig};
use crate::hand::{Handedness, JointPoseSource};
use crate::scene::{NodeArena, NodePrototype};

/// 双手骨架镜像
#[derive(Clone, Debug)]
pub struct SkeletonMirror {
    arena: NodeArena,
    left: HandSkeleton,
    right: HandSkeleton,
    config: EngineConfig,
}

impl SkeletonMirror {
    /// 使用全局配置创建
    pub fn new() -> Self {
        Self::with_config(get_config())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            arena: NodeArena::new(),
            left: HandSkeleton::new(Handedness::Left),
            right: HandSkeleton::new(Handedness::Right),
            config,
        }
    }

    /// 为双手实例化代理节点
    pub fn build(&mut self, joint_proto: &NodePrototype, link_proto: &NodePrototype, tip_proto: &NodePrototype) {
        self.left.build(&mut self.arena, joint_proto, link_proto, tip_proto);
        self.right.build(&mut self.arena, joint_proto, link_proto, tip_proto);
        log::info!("骨架镜像构建完成: {} 个代理节点", self.arena.len());
    }

    /// 每帧刷新，按数据源的手性分发；缺失的手保持上一帧状态
    pub fn refresh(&mut self, sources: &[&dyn JointPoseSource]) {
        for source in sources {
            let skeleton = match source.handedness() {
                Handedness::Left => &mut self.left,
                Handedness::Right => &mut self.right,
            };
            skeleton.refresh(&mut self.arena, *source, &self.config);
        }
    }

    pub fn hand(&self, handedness: Handedness) -> &HandSkeleton {
        match handedness {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }

    /// 节点池（只读，供宿主渲染 / 碰撞同步）
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }
}

impl Default for SkeletonMirror {
    fn default() -> Self {
        Self::new()
    }
}
