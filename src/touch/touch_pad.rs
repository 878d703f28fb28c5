//! 触控板：接触生命周期
//!
//! 状态机（每个 手指 × 碰撞体）：Absent → Touching → Absent
//! - Begin: 已跟踪时先销毁旧条目再重建；创建接触点标记，current / previous 都设为投影点
//! - Persist: previous := current，current := 新投影点，随后做手势提取
//! - End / 碰撞体失活: 清除接触标志，销毁标记
//!
//! 每帧 `update` 清理失活碰撞体，再发射累积的手势。
//! 多个接触的旋转按碰撞事件到达顺序组合，顺序由外部物理系统决定。

use std::collections::HashMap;

use glam::Vec3;

use crate::config::{get_config, EngineConfig};
use crate::gesture::{
    strategy_for, ContactSample, EmitResult, GestureAccumulator, GestureListener, GestureMode,
    GestureStrategy,
};
use crate::hand::{FingerMask, Handedness, TouchFinger};
use crate::scene::{NodeArena, NodeId, NodePrototype};
use crate::TouchError;
use super::{ColliderId, ColliderLookup, ContactEvent, FingerHistory, TouchSurface};

/// 单个接触
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchContact {
    pub finger: TouchFinger,
    /// 接触点标记
    pub marker: NodeId,
    /// 本帧接触点（触控面本地坐标）
    pub current_local: Vec3,
    /// 上一帧接触点（触控面本地坐标）
    pub previous_local: Vec3,
}

/// 触控板
#[derive(Debug)]
pub struct TouchPad {
    surface: TouchSurface,
    arena: NodeArena,
    root: NodeId,
    marker_proto: NodePrototype,
    contacts: HashMap<ColliderId, TouchContact>,
    /// 正在接触的手指（左、右）
    touch_active: [FingerMask; 2],
    strategy: Box<dyn GestureStrategy>,
    accumulator: GestureAccumulator,
    config: EngineConfig,
}

#[inline]
fn side_slot(handedness: Handedness) -> usize {
    match handedness {
        Handedness::Left => 0,
        Handedness::Right => 1,
    }
}

impl TouchPad {
    /// 使用全局配置创建
    pub fn new(surface: TouchSurface, marker_proto: NodePrototype, mode: GestureMode) -> Self {
        Self::with_config(surface, marker_proto, mode, get_config())
    }

    pub fn with_config(
        surface: TouchSurface,
        marker_proto: NodePrototype,
        mode: GestureMode,
        config: EngineConfig,
    ) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.instantiate(&NodePrototype::group(), None, "TouchPad");
        if let Err(e) = arena.set_pose(root, surface.pose.position, surface.pose.rotation) {
            log::warn!("[TouchPad] 初始化根节点失败: {}", e);
        }
        log::info!("触控板创建: 模式={:?}", mode);

        Self {
            surface,
            arena,
            root,
            marker_proto,
            contacts: HashMap::new(),
            touch_active: [FingerMask::empty(); 2],
            strategy: strategy_for(mode),
            accumulator: GestureAccumulator::new(),
            config,
        }
    }

    #[inline]
    pub fn surface(&self) -> &TouchSurface {
        &self.surface
    }

    /// 移动触控面；已有接触的本地坐标在下次 Persist 时刷新
    pub fn set_surface(&mut self, surface: TouchSurface) {
        self.surface = surface;
        if let Err(e) = self.arena.set_pose(self.root, surface.pose.position, surface.pose.rotation) {
            log::warn!("[TouchPad] 更新根节点失败: {}", e);
        }
    }

    #[inline]
    pub fn mode(&self) -> GestureMode {
        self.strategy.mode()
    }

    /// 切换模式，丢弃尚未发射的累积量
    pub fn set_mode(&mut self, mode: GestureMode) {
        if self.strategy.mode() != mode {
            self.strategy = strategy_for(mode);
            self.accumulator.reset();
            log::info!("[TouchPad] 手势模式切换: {:?}", mode);
        }
    }

    // ========================================
    // 事件入口
    // ========================================

    pub fn handle_event(
        &mut self,
        event: ContactEvent,
        lookup: &dyn ColliderLookup,
        history: &dyn FingerHistory,
    ) {
        match event {
            ContactEvent::Begin(collider) => self.contact_begin(collider, lookup),
            ContactEvent::Persist(collider) => self.contact_persist(collider, lookup, history),
            ContactEvent::End(collider) => self.contact_end(collider),
        }
    }

    /// 接触开始；重复 Begin 时先销毁旧条目（幂等、自愈）
    pub fn contact_begin(&mut self, collider: ColliderId, lookup: &dyn ColliderLookup) {
        if self.contacts.contains_key(&collider) {
            self.destroy_contact(collider);
        }
        self.create_contact(collider, lookup);
    }

    /// 接触持续：更新接触点并提取手势
    pub fn contact_persist(
        &mut self,
        collider: ColliderId,
        lookup: &dyn ColliderLookup,
        history: &dyn FingerHistory,
    ) {
        if !lookup.is_collider_active(collider) {
            // 碰撞体本帧已失活：接触立即结束，不再提取手势
            if self.contacts.contains_key(&collider) {
                self.destroy_contact(collider);
            }
            return;
        }
        if !self.contacts.contains_key(&collider) {
            // 漏掉了 Begin：补建接触，本帧增量为零
            if self.config.debug_log {
                log::debug!("[TouchPad] 未跟踪的碰撞体 {:?} 收到 Persist，补建接触", collider);
            }
            self.create_contact(collider, lookup);
            return;
        }

        let Some(world) = lookup.collider_position(collider) else {
            return;
        };
        let contact_point = self.surface.closest_point(world);
        let local = self.surface.to_local(contact_point);

        let Some(contact) = self.contacts.get_mut(&collider) else {
            return;
        };
        contact.previous_local = contact.current_local;
        contact.current_local = local;
        let (finger, marker) = (contact.finger, contact.marker);

        if let Err(e) = self.arena.set_position(marker, contact_point) {
            log::warn!("[TouchPad] 接触点标记更新失败: {}", e);
        }

        self.extract_gesture(finger, history);
    }

    /// 接触结束；未跟踪的碰撞体忽略
    pub fn contact_end(&mut self, collider: ColliderId) {
        if self.contacts.contains_key(&collider) {
            self.destroy_contact(collider);
        } else if self.config.debug_log {
            log::debug!("[TouchPad] 未跟踪的碰撞体 {:?} 收到 End，忽略", collider);
        }
    }

    // ========================================
    // 每帧
    // ========================================

    /// 清理失活碰撞体，然后发射本帧手势
    pub fn update(&mut self, lookup: &dyn ColliderLookup, listener: &mut dyn GestureListener) -> EmitResult {
        self.sweep_inactive(lookup);
        self.accumulator.emit(
            listener,
            self.config.translation_epsilon,
            self.config.rotation_epsilon,
        )
    }

    /// 销毁所有碰撞体已失活的接触
    pub fn sweep_inactive(&mut self, lookup: &dyn ColliderLookup) {
        let inactive: Vec<ColliderId> = self
            .contacts
            .keys()
            .filter(|c| !lookup.is_collider_active(**c))
            .copied()
            .collect();
        for collider in inactive {
            self.destroy_contact(collider);
        }
    }

    fn extract_gesture(&mut self, finger: TouchFinger, history: &dyn FingerHistory) {
        let Some((previous, current)) = history.joint_history(finger) else {
            return;
        };
        let sample = ContactSample {
            finger,
            previous: &previous,
            current: &current,
            surface: &self.surface,
            thumb_active: self.is_touch_active(finger.thumb_of_same_hand()),
            blend: self.config.gesture_blend,
        };
        if let Some(delta) = self.strategy.extract(&sample) {
            if self.config.debug_log {
                log::debug!("[TouchPad] {:?} 增量: {:?}", finger, delta);
            }
            self.accumulator.accumulate(delta);
        }
    }

    // ========================================
    // 接触表
    // ========================================

    fn create_contact(&mut self, collider: ColliderId, lookup: &dyn ColliderLookup) {
        let Some(finger) = lookup.touch_finger(collider) else {
            log::debug!("[TouchPad] 忽略: {}", TouchError::UnknownCollider(collider.0));
            return;
        };
        if !lookup.is_collider_active(collider) {
            log::debug!("[TouchPad] 忽略失活碰撞体 {:?}", collider);
            return;
        }
        let Some(world) = lookup.collider_position(collider) else {
            return;
        };

        let contact_point = self.surface.closest_point(world);
        let local = self.surface.to_local(contact_point);
        let marker = self.arena.instantiate(
            &self.marker_proto,
            Some(self.root),
            format!("{}{}TouchPoint", finger.handedness.as_str(), finger.finger.as_str()),
        );
        if let Err(e) = self.arena.set_position(marker, contact_point) {
            log::warn!("[TouchPad] 接触点标记初始化失败: {}", e);
        }

        self.contacts.insert(
            collider,
            TouchContact {
                finger,
                marker,
                current_local: local,
                previous_local: local,
            },
        );
        self.touch_active[side_slot(finger.handedness)] |= finger.finger.mask();
    }

    fn destroy_contact(&mut self, collider: ColliderId) {
        let Some(contact) = self.contacts.remove(&collider) else {
            return;
        };
        self.touch_active[side_slot(contact.finger.handedness)].remove(contact.finger.finger.mask());
        if let Err(e) = self.arena.destroy(contact.marker) {
            log::warn!("[TouchPad] 销毁接触点标记失败: {}", e);
        }
    }

    // ========================================
    // 查询
    // ========================================

    pub fn contact(&self, collider: ColliderId) -> Option<&TouchContact> {
        self.contacts.get(&collider)
    }

    #[inline]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// 接触点标记数量
    #[inline]
    pub fn marker_count(&self) -> usize {
        // 根节点不算
        self.arena.len() - 1
    }

    #[inline]
    pub fn is_touch_active(&self, finger: TouchFinger) -> bool {
        self.touch_active[side_slot(finger.handedness)].has(finger.finger)
    }

    #[inline]
    pub fn touch_active_mask(&self, handedness: Handedness) -> FingerMask {
        self.touch_active[side_slot(handedness)]
    }

    /// 当前累积器（只读）
    pub fn accumulator(&self) -> &GestureAccumulator {
        &self.accumulator
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }
}
