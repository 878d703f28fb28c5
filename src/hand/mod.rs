//! 手部数据模型
//!
//! - joint: 手性、手指、21 个关节 ID
//! - source: 外部关节姿态源 / 手指特征提供方接口
//! - chain: 每根手指的关节链（帧间差分用）

mod chain;
mod joint;
mod source;

pub use chain::{FingerJointIndex, JointChain, JOINT_CHAIN_LEN};
pub use joint::{
    FingerMask, HandFinger, HandJointId, Handedness, TouchFinger, FINGER_COUNT, JOINT_COUNT,
};
pub use source::{
    FeatureTable, FingerFeature, FingerFeatureProvider, HandSnapshot, JointPoseSource, Pose,
};
