//! 手部触控引擎
//!
//! 双手骨架镜像 + 手指触控 + 惯性相机。
//!
//! 数据流（每帧固定顺序）：
//! JointPoseSource → SkeletonMirror（可视化）
//!                 → TouchHands（手指分类）→ TouchPad（接触生命周期）
//!                 → GestureStrategy / GestureAccumulator → CameraRig

pub mod camera;
pub mod config;
pub mod error;
pub mod gesture;
pub mod hand;
pub mod math;
pub mod scene;
pub mod session;
pub mod skeleton;
pub mod touch;

pub use error::{Result, TouchError};

// ============================================================================
// 常用类型
// ============================================================================

pub use camera::{CameraConfig, CameraRig};
pub use config::{get_config, reset_config, set_config, AngularSnap, EngineConfig};
pub use gesture::{GestureEvent, GestureListener, GestureMode};
pub use hand::{
    FeatureTable, FingerFeature, FingerFeatureProvider, HandFinger, HandJointId, HandSnapshot,
    Handedness, JointPoseSource, Pose, TouchFinger,
};
pub use session::{FrameInput, SessionPrototypes, TouchSession};
pub use skeleton::SkeletonMirror;
pub use touch::{ColliderId, ContactEvent, TouchHands, TouchPad, TouchSurface};
