//! Property-based tests for the motion primitives and the coordinator.
//!
//! Verifies that outputs stay inside their documented bounds for arbitrary
//! frame delta sequences, including garbage deltas.

use kouki_core::Emotion;
use kouki_motion::primitives::{
    Blink, Breathing, BLINK_CHANNEL, BREATH_POSITION_AMPLITUDE, BREATH_YAW_AMPLITUDE,
    MOUTH_CHANNEL, MOUTH_GAIN,
};
use kouki_motion::{Avatar, ExpressionSurface, GestureKind, Joint, MemoryModel, Side};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Strategies
// ============================================================================

fn arb_delta() -> impl Strategy<Value = f32> {
    prop_oneof![
        8 => 0.0f32..0.25,
        1 => -1.0f32..0.0,
        1 => Just(f32::NAN),
        1 => Just(f32::INFINITY),
    ]
}

fn arb_emotion() -> impl Strategy<Value = Emotion> {
    prop::sample::select(Emotion::ALL.to_vec())
}

// ============================================================================
// Breathing
// ============================================================================

proptest! {
    #[test]
    fn breathing_stays_bounded(deltas in prop::collection::vec(arb_delta(), 1..200)) {
        let mut model = MemoryModel::humanoid();
        let mut breathing = Breathing::default();
        for dt in deltas {
            let dt = kouki_motion::clock::sanitize_delta(dt);
            let offset = breathing.update(dt, &mut model);
            prop_assert!(offset.x.abs() <= BREATH_POSITION_AMPLITUDE + 1e-6);
            prop_assert!(offset.z.abs() <= BREATH_POSITION_AMPLITUDE + 1e-6);
            prop_assert!(offset.yaw.abs() <= BREATH_YAW_AMPLITUDE + 1e-6);
        }
    }
}

// ============================================================================
// Blink
// ============================================================================

proptest! {
    #[test]
    fn blink_fires_within_five_seconds(seed in any::<u64>(), step in 0.005f32..0.1) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut model = MemoryModel::humanoid();
        let mut blink = Blink::new(&mut rng);

        let mut elapsed = 0.0;
        let mut fired = false;
        while elapsed < 5.0 + step {
            if blink.update(step, &mut rng, &mut model) {
                fired = true;
                break;
            }
            elapsed += step;
        }
        prop_assert!(fired);
        prop_assert_eq!(model.weight(BLINK_CHANNEL), Some(1.0));
    }
}

// ============================================================================
// Coordinator
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn weights_stay_in_unit_range(
        seed in any::<u64>(),
        deltas in prop::collection::vec(arb_delta(), 1..300),
        emotion in arb_emotion(),
    ) {
        let mut avatar = Avatar::new(Some(seed)).with_model(MemoryModel::humanoid());
        avatar.arm_gestures();
        avatar.set_expression(emotion);
        avatar.restore_neutral_after(1.0);
        avatar.start_speaking();

        for dt in deltas {
            avatar.tick(dt);
            let surface = avatar.model().unwrap().expressions();
            for channel in surface.channels() {
                let w = surface.weight(&channel).unwrap();
                prop_assert!((0.0..=1.0).contains(&w), "{} = {}", channel, w);
            }
            prop_assert!(surface.weight(MOUTH_CHANNEL).unwrap() <= MOUTH_GAIN);
        }
    }

    #[test]
    fn exactly_one_semantic_channel_set(emotions in prop::collection::vec(arb_emotion(), 1..10)) {
        let mut avatar = Avatar::new(Some(0)).with_model(MemoryModel::humanoid());
        for emotion in &emotions {
            avatar.set_expression(*emotion);
        }
        let surface = avatar.model().unwrap().expressions();
        let lit: Vec<_> = Emotion::ALL
            .iter()
            .filter(|e| surface.weight(e.channel()) == Some(1.0))
            .collect();
        prop_assert_eq!(lit, vec![emotions.last().unwrap()]);
    }

    #[test]
    fn gestures_restore_their_axis(
        kind in prop::sample::select(GestureKind::ALL.to_vec()),
        left in any::<bool>(),
    ) {
        let side = if left { Side::Left } else { Side::Right };
        let mut avatar = Avatar::new(Some(1)).with_model(MemoryModel::humanoid());
        prop_assert!(avatar.trigger_gesture(kind, side));
        for _ in 0..150 {
            avatar.tick(1.0 / 60.0);
        }
        prop_assert!(!avatar.motion().is_active());

        let skeleton = avatar.model().unwrap().skeleton();
        prop_assert_eq!(skeleton.joint(Joint::Head).unwrap().rotation.z, 0.0);
        prop_assert_eq!(skeleton.joint(Joint::Root).unwrap().rotation.z, 0.0);
        prop_assert_eq!(skeleton.joint(Joint::LeftUpperArm).unwrap().rotation.x, 0.0);
        prop_assert_eq!(skeleton.joint(Joint::RightUpperArm).unwrap().rotation.x, 0.0);
    }
}
