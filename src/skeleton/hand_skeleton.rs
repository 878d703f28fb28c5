//! 单手骨架镜像
//!
//! 节点层级：
//! ```text
//! {Side}HandSkeleton
//! ├── WristRoot
//! ├── Thumb
//! │   ├── ThumbJoint1 / ThumbLink1
//! │   ├── ThumbJoint2 / ThumbLink2
//! │   ├── ThumbJoint3 / ThumbLink3
//! │   └── ThumbTip
//! └── ... (Index / Middle / Ring / Pinky)
//! ```

use glam::Vec3;

use crate::config::EngineConfig;
use crate::hand::{HandFinger, HandJointId, Handedness, JointPoseSource, Pose, JOINT_COUNT};
use crate::scene::{NodeArena, NodeId, NodePrototype};
use super::bone_link::{capsule_height, BoneLink, LinkState};

/// 每只手的连杆数（每根手指 3 段）
pub const LINK_COUNT: usize = 15;

/// 单手骨架
#[derive(Clone, Debug)]
pub struct HandSkeleton {
    handedness: Handedness,
    root: Option<NodeId>,
    joints: [Option<NodeId>; JOINT_COUNT],
    links: Vec<BoneLink>,
}

impl HandSkeleton {
    pub fn new(handedness: Handedness) -> Self {
        let links = HandFinger::ALL
            .iter()
            .flat_map(|finger| {
                let chain = finger.joints();
                (0..chain.len() - 1).map(move |i| BoneLink::new(chain[i], chain[i + 1]))
            })
            .collect();

        Self {
            handedness,
            root: None,
            joints: [None; JOINT_COUNT],
            links,
        }
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// 关节代理节点
    #[inline]
    pub fn joint_node(&self, joint: HandJointId) -> Option<NodeId> {
        self.joints[joint.index()]
    }

    /// 以起点关节查找连杆
    pub fn bone_link(&self, start: HandJointId) -> Option<&BoneLink> {
        self.links.iter().find(|l| l.start == start)
    }

    /// 连杆派生状态，任一端点无效时为 None
    pub fn link(&self, start: HandJointId) -> Option<LinkState> {
        self.bone_link(start).and_then(|l| l.state)
    }

    /// 连杆代理节点
    pub fn link_node(&self, start: HandJointId) -> Option<NodeId> {
        self.bone_link(start).and_then(|l| l.node)
    }

    pub fn links(&self) -> &[BoneLink] {
        &self.links
    }

    /// 实例化代理节点（初始全部隐藏）
    ///
    /// 重复调用时先销毁旧的层级。
    pub fn build(
        &mut self,
        arena: &mut NodeArena,
        joint_proto: &NodePrototype,
        link_proto: &NodePrototype,
        tip_proto: &NodePrototype,
    ) {
        if let Some(old_root) = self.root.take() {
            if let Err(e) = arena.destroy(old_root) {
                log::warn!("[Skeleton] 销毁旧骨架失败: {}", e);
            }
        }

        let side = self.handedness.as_str();
        let root = arena.instantiate(&NodePrototype::group(), None, format!("{}HandSkeleton", side));
        self.root = Some(root);

        // 手腕根
        let wrist = arena.instantiate(joint_proto, Some(root), "WristRoot");
        self.joints = [None; JOINT_COUNT];
        self.joints[HandJointId::WristRoot.index()] = Some(wrist);

        // 手指
        for finger in HandFinger::ALL {
            let name = finger.as_str();
            let group = arena.instantiate(&NodePrototype::group(), Some(root), name);
            let chain = finger.joints();

            for i in 0..chain.len() - 1 {
                let joint = arena.instantiate(joint_proto, Some(group), format!("{}Joint{}", name, i + 1));
                self.joints[chain[i].index()] = Some(joint);

                let link = arena.instantiate(link_proto, Some(group), format!("{}Link{}", name, i + 1));
                if let Some(l) = self.links.iter_mut().find(|l| l.start == chain[i]) {
                    l.node = Some(link);
                    l.state = None;
                }
            }

            let tip = arena.instantiate(tip_proto, Some(group), format!("{}Tip", name));
            self.joints[chain[chain.len() - 1].index()] = Some(tip);
        }

        let proxies = self.joints.iter().flatten().chain(self.links.iter().filter_map(|l| l.node.as_ref()));
        for id in proxies {
            if let Err(e) = arena.set_active(*id, false) {
                log::warn!("[Skeleton] 隐藏代理节点失败: {}", e);
            }
        }
    }

    /// 每帧刷新：有效关节显示并同步姿态，无效关节隐藏；
    /// 两端都有效的连杆显示并更新中点 / 朝向 / 长度，否则隐藏。
    pub fn refresh(&mut self, arena: &mut NodeArena, source: &dyn JointPoseSource, config: &EngineConfig) {
        if !self.is_built() {
            if config.debug_log {
                log::debug!("[Skeleton] {} 手骨架未构建，跳过刷新", self.handedness.as_str());
            }
            return;
        }

        let mut poses: [Option<Pose>; JOINT_COUNT] = [None; JOINT_COUNT];
        for joint in HandJointId::ALL {
            poses[joint.index()] = source.try_get_pose(joint);
        }

        // 关节
        for joint in HandJointId::ALL {
            let Some(node) = self.joints[joint.index()] else { continue };
            let result = match poses[joint.index()] {
                Some(pose) => arena
                    .set_active(node, true)
                    .and_then(|_| arena.set_pose(node, pose.position, pose.rotation)),
                None => arena.set_active(node, false),
            };
            if let Err(e) = result {
                log::warn!("[Skeleton] 关节 {:?} 更新失败: {}", joint, e);
            }
        }

        // 连杆
        for link in &mut self.links {
            let state = link.update(poses[link.start.index()], poses[link.end.index()]);
            let Some(node) = link.node else { continue };

            let Some(state) = state else {
                if let Err(e) = arena.set_active(node, false) {
                    log::warn!("[Skeleton] 连杆 {:?} 隐藏失败: {}", link.start, e);
                }
                continue;
            };

            match arena.get_mut(node) {
                Ok(proxy) => {
                    proxy.active = true;
                    proxy.position = state.midpoint;
                    proxy.rotation = state.orientation;
                    proxy.scale = Vec3::new(proxy.scale.x, state.length, proxy.scale.z);
                    let scale = proxy.scale;
                    if let Some(capsule) = proxy.capsule.as_mut() {
                        capsule.height = capsule_height(*capsule, scale, config.min_link_scale_ratio);
                    }
                }
                Err(e) => log::warn!("[Skeleton] 连杆 {:?} 更新失败: {}", link.start, e),
            }
        }
    }
}
