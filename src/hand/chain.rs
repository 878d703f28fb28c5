//! 手指关节链
//!
//! 每根手指一条 [Root, Proximal, Middle, Distal, Tip, Pad] 姿态链，
//! 按帧双缓冲保存，用于帧间差分。

use glam::Vec3;

use super::joint::HandFinger;
use super::source::{JointPoseSource, Pose};
use super::HandJointId;

/// 关节链长度
pub const JOINT_CHAIN_LEN: usize = 6;

/// 关节链下标
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FingerJointIndex {
    /// 手腕根
    Root = 0,
    Proximal = 1,
    Middle = 2,
    Distal = 3,
    Tip = 4,
    /// 指腹（外部固定点）
    Pad = 5,
}

impl FingerJointIndex {
    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// 单帧关节链
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointChain {
    pub poses: [Pose; JOINT_CHAIN_LEN],
    /// 有效位掩码，第 i 位对应 poses[i]
    pub valid: u8,
}

impl Default for JointChain {
    fn default() -> Self {
        Self {
            poses: [Pose::IDENTITY; JOINT_CHAIN_LEN],
            valid: 0,
        }
    }
}

impl JointChain {
    /// 从姿态源采样，缺失的关节填单位姿态并清除有效位
    pub fn sample(source: &dyn JointPoseSource, finger: HandFinger) -> Self {
        let mut chain = Self::default();
        let joints = finger.joints();
        let ids: [HandJointId; 5] = [HandJointId::WristRoot, joints[0], joints[1], joints[2], joints[3]];

        for (slot, joint) in ids.iter().enumerate() {
            if let Some(pose) = source.try_get_pose(*joint) {
                chain.poses[slot] = pose;
                chain.valid |= 1 << slot;
            }
        }
        if let Some(pad) = source.finger_pad_pose(finger) {
            chain.poses[FingerJointIndex::Pad as usize] = pad;
            chain.valid |= FingerJointIndex::Pad.bit();
        }
        chain
    }

    /// 由位置直接构造（全部有效）
    pub fn from_positions(positions: [Vec3; JOINT_CHAIN_LEN]) -> Self {
        Self {
            poses: positions.map(Pose::from_position),
            valid: (1 << JOINT_CHAIN_LEN) - 1,
        }
    }

    #[inline]
    pub fn pose(&self, index: FingerJointIndex) -> Pose {
        self.poses[index as usize]
    }

    #[inline]
    pub fn position(&self, index: FingerJointIndex) -> Vec3 {
        self.poses[index as usize].position
    }

    #[inline]
    pub fn is_valid(&self, index: FingerJointIndex) -> bool {
        self.valid & index.bit() != 0
    }

    /// 所有给定下标都有效
    pub fn all_valid(&self, indices: &[FingerJointIndex]) -> bool {
        indices.iter().all(|i| self.is_valid(*i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{HandSnapshot, Handedness};

    #[test]
    fn test_sample_marks_missing_slots() {
        let mut hand = HandSnapshot::new(Handedness::Left);
        hand.set_joint(HandJointId::WristRoot, Pose::from_position(Vec3::ZERO));
        hand.set_joint(HandJointId::Index1, Pose::from_position(Vec3::Z * 0.05));
        hand.set_joint(HandJointId::IndexTip, Pose::from_position(Vec3::Z * 0.15));

        let chain = JointChain::sample(&hand, HandFinger::Index);
        assert!(chain.is_valid(FingerJointIndex::Root));
        assert!(chain.is_valid(FingerJointIndex::Proximal));
        assert!(!chain.is_valid(FingerJointIndex::Middle));
        assert!(chain.is_valid(FingerJointIndex::Tip));
        // 未设置指腹时退化为指尖
        assert!(chain.is_valid(FingerJointIndex::Pad));
        assert!((chain.position(FingerJointIndex::Pad) - Vec3::Z * 0.15).length() < 1e-6);
        assert_eq!(chain.pose(FingerJointIndex::Middle), Pose::IDENTITY);
    }

    #[test]
    fn test_from_positions_all_valid() {
        let chain = JointChain::from_positions([Vec3::ZERO; JOINT_CHAIN_LEN]);
        assert!(chain.all_valid(&[
            FingerJointIndex::Root,
            FingerJointIndex::Proximal,
            FingerJointIndex::Pad,
        ]));
    }
}
