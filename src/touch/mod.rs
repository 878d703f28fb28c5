//! 触控系统
//!
//! - TouchHand: 单手手指接触分类器（张开判定 + 关节链双缓冲 + 手指碰撞体）
//! - TouchHands: 双手分类器，同时充当碰撞体身份查询表
//! - TouchSurface: 触控面几何
//! - TouchPad: 接触生命周期 + 手势累积与发射

mod surface;
mod touch_hand;
mod touch_pad;

pub use surface::TouchSurface;
pub use touch_hand::{FingerState, TouchHand};
pub use touch_pad::{TouchContact, TouchPad};

use glam::Vec3;

use crate::hand::{
    FingerFeatureProvider, HandFinger, Handedness, JointChain, JointPoseSource, TouchFinger,
};
use crate::scene::NodePrototype;

/// 碰撞体 ID（外部物理系统使用）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u64);

impl ColliderId {
    /// 手指碰撞体的固定编号：高位为手性，低位为手指
    pub fn for_finger(handedness: Handedness, finger: HandFinger) -> Self {
        let side: u64 = match handedness {
            Handedness::Left => 1,
            Handedness::Right => 2,
        };
        Self((side << 8) | finger.index() as u64)
    }
}

/// 碰撞事件（由外部物理系统送入）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactEvent {
    Begin(ColliderId),
    Persist(ColliderId),
    End(ColliderId),
}

/// 碰撞体身份查询
pub trait ColliderLookup {
    /// 碰撞体对应的手指
    fn touch_finger(&self, collider: ColliderId) -> Option<TouchFinger>;

    /// 碰撞体是否激活
    fn is_collider_active(&self, collider: ColliderId) -> bool;

    /// 碰撞体中心（世界坐标）
    fn collider_position(&self, collider: ColliderId) -> Option<Vec3>;
}

/// 手指关节链历史
pub trait FingerHistory {
    /// (previous, current)，任一缺失时返回 None
    fn joint_history(&self, finger: TouchFinger) -> Option<(JointChain, JointChain)>;
}

/// 双手分类器
#[derive(Clone, Debug)]
pub struct TouchHands {
    pub left: TouchHand,
    pub right: TouchHand,
}

impl TouchHands {
    pub fn new(marker_proto: &NodePrototype) -> Self {
        Self {
            left: TouchHand::new(Handedness::Left, marker_proto),
            right: TouchHand::new(Handedness::Right, marker_proto),
        }
    }

    pub fn with_config(marker_proto: &NodePrototype, config: crate::config::EngineConfig) -> Self {
        Self {
            left: TouchHand::with_config(Handedness::Left, marker_proto, config.clone()),
            right: TouchHand::with_config(Handedness::Right, marker_proto, config),
        }
    }

    pub fn hand(&self, handedness: Handedness) -> &TouchHand {
        match handedness {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }

    pub fn hand_mut(&mut self, handedness: Handedness) -> &mut TouchHand {
        match handedness {
            Handedness::Left => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }

    /// 按数据源手性更新对应的手
    pub fn update(&mut self, source: &dyn JointPoseSource, features: &dyn FingerFeatureProvider) {
        self.hand_mut(source.handedness()).update(source, features);
    }

    fn resolve(&self, collider: ColliderId) -> Option<(&TouchHand, HandFinger)> {
        Handedness::BOTH.iter().find_map(|side| {
            let hand = self.hand(*side);
            hand.finger_by_collider(collider).map(|s| (hand, s.finger))
        })
    }
}

impl ColliderLookup for TouchHands {
    fn touch_finger(&self, collider: ColliderId) -> Option<TouchFinger> {
        self.resolve(collider)
            .map(|(hand, finger)| TouchFinger::new(hand.handedness(), finger))
    }

    fn is_collider_active(&self, collider: ColliderId) -> bool {
        self.resolve(collider)
            .map(|(hand, finger)| hand.is_marker_active(finger))
            .unwrap_or(false)
    }

    fn collider_position(&self, collider: ColliderId) -> Option<Vec3> {
        self.resolve(collider)
            .and_then(|(hand, finger)| hand.marker_position(finger))
    }
}

impl FingerHistory for TouchHands {
    fn joint_history(&self, finger: TouchFinger) -> Option<(JointChain, JointChain)> {
        let hand = self.hand(finger.handedness);
        let previous = hand.previous_chain(finger.finger)?;
        let current = hand.current_chain(finger.finger)?;
        Some((*previous, *current))
    }
}
