//! 外部数据源接口：关节姿态 / 手指特征
//!
//! 追踪器本身不在引擎内实现，这里只定义引擎消费的接口，
//! 以及宿主用来传入一帧数据的具体快照类型。

use glam::{Quat, Vec3};

use crate::{Result, TouchError};
use super::joint::{HandFinger, HandJointId, Handedness, FINGER_COUNT, JOINT_COUNT};

// ============================================================================
// 姿态
// ============================================================================

/// 位置 + 朝向
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// 本地点 → 世界点
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// 世界点 → 本地点
    #[inline]
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }
}

// ============================================================================
// 关节姿态源
// ============================================================================

/// 关节姿态源（外部手部追踪器）
pub trait JointPoseSource {
    /// 查询关节姿态，无效时返回 None
    fn try_get_pose(&self, joint: HandJointId) -> Option<Pose>;

    /// 追踪置信度是否足够
    fn is_high_confidence(&self) -> bool;

    fn handedness(&self) -> Handedness;

    /// 指腹点（外部固定点），默认退化为指尖姿态
    fn finger_pad_pose(&self, finger: HandFinger) -> Option<Pose> {
        self.try_get_pose(finger.joints()[3])
    }
}

/// 一帧手部数据快照
#[derive(Clone, Debug)]
pub struct HandSnapshot {
    pub handedness: Handedness,
    pub high_confidence: bool,
    pub joints: [Option<Pose>; JOINT_COUNT],
    /// 指腹点，None 时使用指尖
    pub pads: [Option<Pose>; FINGER_COUNT],
}

impl HandSnapshot {
    /// 创建空快照（所有关节无效）
    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            high_confidence: true,
            joints: [None; JOINT_COUNT],
            pads: [None; FINGER_COUNT],
        }
    }

    pub fn set_joint(&mut self, joint: HandJointId, pose: Pose) -> &mut Self {
        self.joints[joint.index()] = Some(pose);
        self
    }

    pub fn clear_joint(&mut self, joint: HandJointId) -> &mut Self {
        self.joints[joint.index()] = None;
        self
    }

    pub fn set_pad(&mut self, finger: HandFinger, pose: Pose) -> &mut Self {
        self.pads[finger.index()] = Some(pose);
        self
    }
}

impl JointPoseSource for HandSnapshot {
    fn try_get_pose(&self, joint: HandJointId) -> Option<Pose> {
        self.joints[joint.index()]
    }

    fn is_high_confidence(&self) -> bool {
        self.high_confidence
    }

    fn handedness(&self) -> Handedness {
        self.handedness
    }

    fn finger_pad_pose(&self, finger: HandFinger) -> Option<Pose> {
        self.pads[finger.index()].or_else(|| self.try_get_pose(finger.joints()[3]))
    }
}

// ============================================================================
// 手指特征
// ============================================================================

/// 手指特征类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FingerFeature {
    /// 弯曲度
    Curl,
    /// 屈曲度
    Flexion,
}

/// 手指特征提供方（外部），查询可能失败
pub trait FingerFeatureProvider {
    fn feature_value(&self, finger: HandFinger, feature: FingerFeature) -> Result<f32>;
}

/// 特征表，缺失项视为查询失败
#[derive(Clone, Debug, Default)]
pub struct FeatureTable {
    curl: [Option<f32>; FINGER_COUNT],
    flexion: [Option<f32>; FINGER_COUNT],
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有手指使用同一组特征值
    pub fn uniform(curl: f32, flexion: f32) -> Self {
        Self {
            curl: [Some(curl); FINGER_COUNT],
            flexion: [Some(flexion); FINGER_COUNT],
        }
    }

    pub fn set(&mut self, finger: HandFinger, feature: FingerFeature, value: Option<f32>) -> &mut Self {
        match feature {
            FingerFeature::Curl => self.curl[finger.index()] = value,
            FingerFeature::Flexion => self.flexion[finger.index()] = value,
        }
        self
    }
}

impl FingerFeatureProvider for FeatureTable {
    fn feature_value(&self, finger: HandFinger, feature: FingerFeature) -> Result<f32> {
        let slot = match feature {
            FingerFeature::Curl => self.curl[finger.index()],
            FingerFeature::Flexion => self.flexion[finger.index()],
        };
        slot.ok_or(TouchError::FeatureUnavailable { finger, feature })
    }
}
