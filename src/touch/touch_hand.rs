//! 手指接触分类器
//!
//! 每帧对每根手指：
//! 1. 上一帧的 current 整体复制为 previous（先交换，后填充）
//! 2. 置信度低时隐藏全部手指标记并跳过
//! 3. 查询弯曲度 / 屈曲度，判定手指是否张开
//! 4. 采样关节链作为 current，张开的手指把标记放到指腹处
//!
//! 手指标记同时就是手指碰撞体，标记可见 = 碰撞体激活。

use glam::Vec3;

use crate::config::{get_config, EngineConfig};
use crate::hand::{
    FingerFeature, FingerFeatureProvider, FingerJointIndex, FingerMask, HandFinger, Handedness,
    JointChain, JointPoseSource,
};
use crate::scene::{NodeArena, NodeId, NodePrototype};
use super::ColliderId;

/// 单根手指状态
#[derive(Clone, Debug)]
pub struct FingerState {
    pub finger: HandFinger,
    /// 是否张开
    pub engaged: bool,
    /// 本帧关节链
    pub current: Option<JointChain>,
    /// 上一帧关节链
    pub previous: Option<JointChain>,
    /// 手指标记（碰撞体）
    pub(crate) marker: NodeId,
    pub collider: ColliderId,
}

/// 单手分类器
#[derive(Clone, Debug)]
pub struct TouchHand {
    handedness: Handedness,
    arena: NodeArena,
    root: NodeId,
    fingers: Vec<FingerState>,
    config: EngineConfig,
}

impl TouchHand {
    /// 使用全局配置创建
    pub fn new(handedness: Handedness, marker_proto: &NodePrototype) -> Self {
        Self::with_config(handedness, marker_proto, get_config())
    }

    pub fn with_config(handedness: Handedness, marker_proto: &NodePrototype, config: EngineConfig) -> Self {
        let side = handedness.as_str();
        let mut arena = NodeArena::new();
        let root = arena.instantiate(&NodePrototype::group(), None, format!("{}TouchHand", side));

        let fingers = HandFinger::ALL
            .iter()
            .map(|finger| {
                let marker = arena.instantiate(
                    marker_proto,
                    Some(root),
                    format!("{}{}Touch", side, finger.as_str()),
                );
                if let Err(e) = arena.set_active(marker, false) {
                    log::warn!("[TouchHand] 隐藏手指标记失败: {}", e);
                }
                FingerState {
                    finger: *finger,
                    engaged: false,
                    current: None,
                    previous: None,
                    marker,
                    collider: ColliderId::for_finger(handedness, *finger),
                }
            })
            .collect();

        Self {
            handedness,
            arena,
            root,
            fingers,
            config,
        }
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// 每帧更新
    pub fn update(&mut self, source: &dyn JointPoseSource, features: &dyn FingerFeatureProvider) {
        // 先交换：previous 整体替换为上一帧 current 的副本
        for state in &mut self.fingers {
            state.previous = state.current;
        }

        if !source.is_high_confidence() {
            for state in &mut self.fingers {
                state.engaged = false;
                if let Err(e) = self.arena.set_active(state.marker, false) {
                    log::warn!("[TouchHand] 隐藏手指标记失败: {}", e);
                }
            }
            if self.config.debug_log {
                log::debug!("[TouchHand] {} 手置信度低，跳过", self.handedness.as_str());
            }
            return;
        }

        for i in 0..self.fingers.len() {
            let finger = self.fingers[i].finger;
            let engaged = self.check_finger_spread(finger, features);
            let chain = JointChain::sample(source, finger);

            let state = &mut self.fingers[i];
            state.current = Some(chain);
            state.engaged = engaged;

            let result = if engaged {
                let pad = chain.position(FingerJointIndex::Pad);
                self.arena
                    .set_position(state.marker, pad)
                    .and_then(|_| self.arena.set_active(state.marker, true))
            } else {
                self.arena.set_active(state.marker, false)
            };
            if let Err(e) = result {
                log::warn!("[TouchHand] 手指标记 {:?} 更新失败: {}", finger, e);
            }
        }
    }

    /// 手指是否张开；任一特征查询失败都视为未张开
    fn check_finger_spread(&self, finger: HandFinger, features: &dyn FingerFeatureProvider) -> bool {
        let values = features
            .feature_value(finger, FingerFeature::Curl)
            .and_then(|curl| {
                features
                    .feature_value(finger, FingerFeature::Flexion)
                    .map(|flexion| (curl, flexion))
            });

        match values {
            Ok((curl, flexion)) => {
                let curl_ok = curl < self.config.curl_threshold;
                let flexion_ok = !self.config.require_flexion || flexion < self.config.flexion_threshold;
                curl_ok && flexion_ok
            }
            Err(e) => {
                if self.config.debug_log {
                    log::debug!("[TouchHand] {}", e);
                }
                false
            }
        }
    }

    pub fn finger(&self, finger: HandFinger) -> &FingerState {
        &self.fingers[finger.index()]
    }

    #[inline]
    pub fn is_engaged(&self, finger: HandFinger) -> bool {
        self.finger(finger).engaged
    }

    /// 张开的手指集合
    pub fn engaged_mask(&self) -> FingerMask {
        self.fingers
            .iter()
            .filter(|s| s.engaged)
            .fold(FingerMask::empty(), |m, s| m | s.finger.mask())
    }

    pub fn current_chain(&self, finger: HandFinger) -> Option<&JointChain> {
        self.finger(finger).current.as_ref()
    }

    pub fn previous_chain(&self, finger: HandFinger) -> Option<&JointChain> {
        self.finger(finger).previous.as_ref()
    }

    /// 通过碰撞体 ID 查找手指
    pub fn finger_by_collider(&self, collider: ColliderId) -> Option<&FingerState> {
        self.fingers.iter().find(|s| s.collider == collider)
    }

    /// 手指标记当前是否激活
    pub fn is_marker_active(&self, finger: HandFinger) -> bool {
        self.arena
            .get(self.finger(finger).marker)
            .map(|n| n.active)
            .unwrap_or(false)
    }

    /// 手指标记位置
    pub fn marker_position(&self, finger: HandFinger) -> Option<Vec3> {
        self.arena.get(self.finger(finger).marker).map(|n| n.position)
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn root(&self) -> NodeId {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{FeatureTable, HandJointId, HandSnapshot, Pose};
    use crate::scene::NodeKind;

    fn hand_at(offset: Vec3) -> HandSnapshot {
        let mut hand = HandSnapshot::new(Handedness::Right);
        for joint in HandJointId::ALL {
            let i = joint.index() as f32;
            hand.set_joint(joint, Pose::from_position(offset + Vec3::new(0.01 * i, 0.0, 0.0)));
        }
        hand
    }

    fn touch_hand() -> TouchHand {
        TouchHand::with_config(
            Handedness::Right,
            &NodePrototype::new(NodeKind::Marker),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_engaged_by_curl_threshold() {
        let mut hand = touch_hand();
        let mut features = FeatureTable::uniform(250.0, 0.0);
        features.set(HandFinger::Index, FingerFeature::Curl, Some(100.0));

        hand.update(&hand_at(Vec3::ZERO), &features);
        assert!(hand.is_engaged(HandFinger::Index));
        assert!(!hand.is_engaged(HandFinger::Thumb));
        assert_eq!(hand.engaged_mask(), FingerMask::INDEX);
        assert!(hand.is_marker_active(HandFinger::Index));
        assert!(!hand.is_marker_active(HandFinger::Thumb));

        // 标记位于指腹（未设置指腹时为指尖）
        let tip = Vec3::new(0.01 * HandJointId::IndexTip.index() as f32, 0.0, 0.0);
        assert!((hand.marker_position(HandFinger::Index).unwrap() - tip).length() < 1e-6);
    }

    #[test]
    fn test_feature_failure_is_not_engaged() {
        let mut hand = touch_hand();
        let mut features = FeatureTable::uniform(10.0, 10.0);
        features.set(HandFinger::Middle, FingerFeature::Flexion, None);

        hand.update(&hand_at(Vec3::ZERO), &features);
        assert!(hand.is_engaged(HandFinger::Index));
        assert!(!hand.is_engaged(HandFinger::Middle));
    }

    #[test]
    fn test_flexion_gate() {
        let config = EngineConfig {
            require_flexion: true,
            ..EngineConfig::default()
        };
        let mut hand = TouchHand::with_config(Handedness::Right, &NodePrototype::new(NodeKind::Marker), config);
        hand.update(&hand_at(Vec3::ZERO), &FeatureTable::uniform(10.0, 240.0));
        assert_eq!(hand.engaged_mask(), FingerMask::empty());
    }

    #[test]
    fn test_history_is_one_frame_lagged() {
        let mut hand = touch_hand();
        let features = FeatureTable::uniform(10.0, 10.0);

        hand.update(&hand_at(Vec3::ZERO), &features);
        assert!(hand.previous_chain(HandFinger::Ring).is_none());

        hand.update(&hand_at(Vec3::Y), &features);
        let prev = hand.previous_chain(HandFinger::Ring).unwrap().position(FingerJointIndex::Root);
        let cur = hand.current_chain(HandFinger::Ring).unwrap().position(FingerJointIndex::Root);
        assert!((prev - Vec3::ZERO).length() < 1e-6);
        assert!((cur - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_low_confidence_hides_and_freezes_history() {
        let mut hand = touch_hand();
        let features = FeatureTable::uniform(10.0, 10.0);
        hand.update(&hand_at(Vec3::ZERO), &features);
        assert_eq!(hand.engaged_mask(), FingerMask::all());

        let mut low = hand_at(Vec3::X);
        low.high_confidence = false;
        hand.update(&low, &features);

        assert_eq!(hand.engaged_mask(), FingerMask::empty());
        assert!(HandFinger::ALL.iter().all(|f| !hand.is_marker_active(*f)));
        // previous == current，帧间差分为零
        assert_eq!(hand.previous_chain(HandFinger::Index), hand.current_chain(HandFinger::Index));
    }
}
