//! 触控回放
//!
//! 脚本化一段右手食指在触控面上滑动、再旋转手腕的会话，逐帧输出相机位姿。
//! 运行：RUST_LOG=debug cargo run --features replay --bin touch_replay

use glam::{Quat, Vec3};

use hand_touch_engine::{
    get_config, ColliderId, ContactEvent, FeatureTable, FrameInput, GestureMode, HandFinger,
    HandJointId, HandSnapshot, Handedness, Pose, SessionPrototypes, TouchSession, TouchSurface,
};

const FRAME_DT: f32 = 1.0 / 60.0;
const SLIDE_FRAMES: usize = 30;
const TWIST_FRAMES: usize = 30;
const COAST_FRAMES: usize = 30;

/// 右手平放在触控面上方，整只手绕手腕转 `twist` 弧度，食指指腹偏移 `slide`
fn scripted_hand(slide: f32, twist: f32) -> HandSnapshot {
    let rotation = Quat::from_rotation_y(twist);
    let wrist = Vec3::new(0.0, 0.02, -0.1);
    let place = |local: Vec3| Pose::new(wrist + rotation * local, rotation);

    let mut hand = HandSnapshot::new(Handedness::Right);
    hand.set_joint(HandJointId::WristRoot, place(Vec3::ZERO));
    for finger in HandFinger::ALL {
        let x = 0.02 * finger.index() as f32 - 0.04;
        for (n, joint) in finger.joints().iter().enumerate() {
            hand.set_joint(*joint, place(Vec3::new(x, 0.0, 0.08 + 0.03 * n as f32)));
        }
    }
    hand.set_pad(HandFinger::Index, place(Vec3::new(-0.02 + slide, -0.02, 0.17)));
    hand
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut session = TouchSession::with_config(
        TouchSurface::default(),
        GestureMode::Combined,
        get_config(),
        SessionPrototypes::default(),
    );

    // 只有食指张开
    let mut features = FeatureTable::uniform(250.0, 250.0);
    features.set(HandFinger::Index, hand_touch_engine::FingerFeature::Curl, Some(40.0));
    features.set(HandFinger::Index, hand_touch_engine::FingerFeature::Flexion, Some(40.0));

    let index = ColliderId::for_finger(Handedness::Right, HandFinger::Index);
    let total = SLIDE_FRAMES + TWIST_FRAMES + COAST_FRAMES;

    for frame in 0..total {
        let (slide, twist, touching) = if frame < SLIDE_FRAMES {
            (0.003 * frame as f32, 0.0, true)
        } else if frame < SLIDE_FRAMES + TWIST_FRAMES {
            let t = (frame - SLIDE_FRAMES) as f32;
            (0.003 * SLIDE_FRAMES as f32, 0.01 * t, true)
        } else {
            (0.0, 0.0, false)
        };

        let hand = scripted_hand(slide, twist);
        let contacts: Vec<ContactEvent> = match (frame, touching) {
            (0, _) => vec![ContactEvent::Begin(index)],
            (f, false) if f == SLIDE_FRAMES + TWIST_FRAMES => vec![ContactEvent::End(index)],
            (_, true) => vec![ContactEvent::Persist(index)],
            _ => Vec::new(),
        };

        let result = session.tick(
            &FrameInput {
                left: None,
                right: Some(&hand),
                left_features: &features,
                right_features: &features,
                contacts: &contacts,
            },
            FRAME_DT,
        );

        let camera = session.camera();
        log::info!(
            "[Replay] 帧 {:3}: 接触={} 平移={} 旋转={} 位置={:?} 朝向={:?}",
            frame,
            session.pad().contact_count(),
            result.translated,
            result.rotated,
            camera.position(),
            hand_touch_engine::math::quat_to_euler_degrees(camera.orientation()),
        );
    }
}
