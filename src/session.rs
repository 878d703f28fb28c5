//! 帧驱动
//!
//! 每个 tick 固定顺序执行，组件之间不共享可变状态：
//! SkeletonMirror → TouchHands（双手）→ TouchPad（碰撞事件、失活清理）→ 手势发射 → CameraRig.step

use glam::Vec3;

use crate::camera::{CameraConfig, CameraRig};
use crate::config::{get_config, EngineConfig};
use crate::gesture::{EmitResult, GestureMode};
use crate::hand::{FingerFeatureProvider, HandSnapshot, Handedness, JointPoseSource};
use crate::scene::{NodeKind, NodePrototype};
use crate::skeleton::SkeletonMirror;
use crate::touch::{ContactEvent, TouchHands, TouchPad, TouchSurface};

/// 代理节点原型
#[derive(Debug, Clone, Copy)]
pub struct SessionPrototypes {
    pub joint: NodePrototype,
    pub link: NodePrototype,
    pub tip: NodePrototype,
    /// 手指标记 / 接触点标记
    pub marker: NodePrototype,
}

impl Default for SessionPrototypes {
    fn default() -> Self {
        Self {
            joint: NodePrototype::new(NodeKind::Joint).with_scale(Vec3::splat(0.01)),
            link: NodePrototype::new(NodeKind::Link)
                .with_scale(Vec3::splat(0.008))
                .with_capsule(0.5),
            tip: NodePrototype::new(NodeKind::Tip).with_scale(Vec3::splat(0.01)),
            marker: NodePrototype::new(NodeKind::Marker).with_scale(Vec3::splat(0.012)),
        }
    }
}

/// 单帧外部输入
pub struct FrameInput<'a> {
    /// 未追踪到的手传 None，按低置信度处理
    pub left: Option<&'a dyn JointPoseSource>,
    pub right: Option<&'a dyn JointPoseSource>,
    pub left_features: &'a dyn FingerFeatureProvider,
    pub right_features: &'a dyn FingerFeatureProvider,
    /// 本帧物理系统报告的碰撞事件（按到达顺序）
    pub contacts: &'a [ContactEvent],
}

/// 触控会话
#[derive(Debug)]
pub struct TouchSession {
    mirror: SkeletonMirror,
    hands: TouchHands,
    pad: TouchPad,
    camera: CameraRig,
    frame: u64,
    debug_log: bool,
}

impl TouchSession {
    /// 使用全局配置和默认原型创建
    pub fn new(surface: TouchSurface, mode: GestureMode) -> Self {
        Self::with_config(surface, mode, get_config(), SessionPrototypes::default())
    }

    pub fn with_config(
        surface: TouchSurface,
        mode: GestureMode,
        config: EngineConfig,
        prototypes: SessionPrototypes,
    ) -> Self {
        let mut mirror = SkeletonMirror::with_config(config.clone());
        mirror.build(&prototypes.joint, &prototypes.link, &prototypes.tip);

        let hands = TouchHands::with_config(&prototypes.marker, config.clone());
        let pad = TouchPad::with_config(surface, prototypes.marker, mode, config.clone());
        let camera = CameraRig::with_config(
            Vec3::ZERO,
            glam::Quat::IDENTITY,
            CameraConfig::from(&config),
        );

        log::info!("触控会话创建: 模式={:?}", mode);
        Self {
            mirror,
            hands,
            pad,
            camera,
            frame: 0,
            debug_log: config.debug_log,
        }
    }

    /// 推进一帧
    pub fn tick(&mut self, input: &FrameInput<'_>, dt: f32) -> EmitResult {
        // 1. 骨架镜像（缺失的手保持上一帧）
        let tracked: Vec<&dyn JointPoseSource> = input.left.into_iter().chain(input.right).collect();
        self.mirror.refresh(&tracked);

        // 2. 手指分类
        let lost_left = Self::lost_hand(Handedness::Left);
        let lost_right = Self::lost_hand(Handedness::Right);
        self.hands.update(input.left.unwrap_or(&lost_left), input.left_features);
        self.hands.update(input.right.unwrap_or(&lost_right), input.right_features);

        // 3. 接触生命周期
        for event in input.contacts {
            self.pad.handle_event(*event, &self.hands, &self.hands);
        }

        // 4. 清理 + 手势发射（直接驱动相机）
        let result = self.pad.update(&self.hands, &mut self.camera);

        // 5. 相机积分
        self.camera.step(dt);

        if self.debug_log {
            log::debug!(
                "[Session] 帧 {}: 接触={}, 发射={:?}, 相机={:?}",
                self.frame,
                self.pad.contact_count(),
                result,
                self.camera.position()
            );
        }
        self.frame += 1;
        result
    }

    fn lost_hand(handedness: Handedness) -> HandSnapshot {
        HandSnapshot {
            high_confidence: false,
            ..HandSnapshot::new(handedness)
        }
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn mirror(&self) -> &SkeletonMirror {
        &self.mirror
    }

    pub fn hands(&self) -> &TouchHands {
        &self.hands
    }

    pub fn pad(&self) -> &TouchPad {
        &self.pad
    }

    pub fn pad_mut(&mut self) -> &mut TouchPad {
        &mut self.pad
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }
}
