//! 手部关节定义
//!
//! 每只手 21 个关节：手腕根 + 5 根手指 × (3 个关节 + 指尖)。

use bitflags::bitflags;

// ============================================================================
// 手性 / 手指
// ============================================================================

/// 手性
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const BOTH: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// 手指
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandFinger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

/// 手指数量
pub const FINGER_COUNT: usize = 5;

impl HandFinger {
    pub const ALL: [HandFinger; FINGER_COUNT] = [
        HandFinger::Thumb,
        HandFinger::Index,
        HandFinger::Middle,
        HandFinger::Ring,
        HandFinger::Pinky,
    ];

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "Thumb",
            Self::Index => "Index",
            Self::Middle => "Middle",
            Self::Ring => "Ring",
            Self::Pinky => "Pinky",
        }
    }

    /// 手指关节链（近端 → 指尖，不含手腕）
    pub fn joints(&self) -> [HandJointId; 4] {
        use HandJointId::*;
        match self {
            Self::Thumb => [Thumb1, Thumb2, Thumb3, ThumbTip],
            Self::Index => [Index1, Index2, Index3, IndexTip],
            Self::Middle => [Middle1, Middle2, Middle3, MiddleTip],
            Self::Ring => [Ring1, Ring2, Ring3, RingTip],
            Self::Pinky => [Pinky1, Pinky2, Pinky3, PinkyTip],
        }
    }

    /// 对应的掩码位
    #[inline]
    pub fn mask(&self) -> FingerMask {
        FingerMask::from_bits_truncate(1 << self.index())
    }
}

bitflags! {
    /// 单只手的手指集合
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct FingerMask: u8 {
        const THUMB = 1 << 0;
        const INDEX = 1 << 1;
        const MIDDLE = 1 << 2;
        const RING = 1 << 3;
        const PINKY = 1 << 4;
    }
}

impl FingerMask {
    #[inline]
    pub fn has(&self, finger: HandFinger) -> bool {
        self.contains(finger.mask())
    }
}

/// 手指碰撞体的身份（手性 + 手指）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TouchFinger {
    pub handedness: Handedness,
    pub finger: HandFinger,
}

impl TouchFinger {
    pub fn new(handedness: Handedness, finger: HandFinger) -> Self {
        Self { handedness, finger }
    }

    /// 同一只手的拇指
    pub fn thumb_of_same_hand(&self) -> Self {
        Self::new(self.handedness, HandFinger::Thumb)
    }
}

// ============================================================================
// 关节 ID
// ============================================================================

/// 关节数量
pub const JOINT_COUNT: usize = 21;

/// 手部关节
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandJointId {
    WristRoot = 0,
    Thumb1,
    Thumb2,
    Thumb3,
    ThumbTip,
    Index1,
    Index2,
    Index3,
    IndexTip,
    Middle1,
    Middle2,
    Middle3,
    MiddleTip,
    Ring1,
    Ring2,
    Ring3,
    RingTip,
    Pinky1,
    Pinky2,
    Pinky3,
    PinkyTip,
}

impl HandJointId {
    pub const ALL: [HandJointId; JOINT_COUNT] = {
        use HandJointId::*;
        [
            WristRoot,
            Thumb1, Thumb2, Thumb3, ThumbTip,
            Index1, Index2, Index3, IndexTip,
            Middle1, Middle2, Middle3, MiddleTip,
            Ring1, Ring2, Ring3, RingTip,
            Pinky1, Pinky2, Pinky3, PinkyTip,
        ]
    };

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// 所属手指（手腕根返回 None）
    pub fn finger(&self) -> Option<HandFinger> {
        match self.index() {
            0 => None,
            i => Some(HandFinger::ALL[(i - 1) / 4]),
        }
    }

    #[inline]
    pub fn is_tip(&self) -> bool {
        self.index() != 0 && self.index() % 4 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_table_is_consistent() {
        for (i, joint) in HandJointId::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
        for finger in HandFinger::ALL {
            let joints = finger.joints();
            assert!(joints.iter().all(|j| j.finger() == Some(finger)));
            assert!(joints[3].is_tip());
            assert!(!joints[0].is_tip());
        }
        assert_eq!(HandJointId::WristRoot.finger(), None);
    }

    #[test]
    fn test_finger_mask() {
        let mask = HandFinger::Thumb.mask() | HandFinger::Ring.mask();
        assert!(mask.has(HandFinger::Thumb));
        assert!(mask.has(HandFinger::Ring));
        assert!(!mask.has(HandFinger::Index));
    }
}
