//! Integration tests for the filtration simulation.
//!
//! These drive the public API the way a renderer would: through the
//! controller, the frame it composes and the generator functions.

use nephron::particles::{blood, filtrate, protein, CKD_FILTRATE_PEAK_OPACITY};
use nephron::prelude::*;
use nephron::{update, Dynamics};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

fn sample_times(seed: u64, n: usize) -> Vec<CyclicTime> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| CyclicTime::new(rng.gen_range(0.0..1.0))).collect()
}

// ============================================================================
// Clock and drop counting
// ============================================================================

#[test]
fn test_wrap_from_099_credits_exact_drops() {
    let state = ViewState {
        time: CyclicTime::new(0.99),
        playing: true,
        ..ViewState::default()
    };
    let next = update(&Dynamics::default(), state, Event::Tick);
    assert!(next.time.value() < 0.99);
    assert_eq!(next.drops.healthy, 10);
    assert_eq!(next.drops.ckd, 6);
}

#[test]
fn test_one_wrap_per_cycle_at_every_speed() {
    for speed in Speed::steps() {
        let mut controller = Controller::default();
        controller.handle(Event::SetSpeed(speed));
        controller.handle(Event::Play);

        let ticks = (Clock::default().ticks_per_cycle(speed) * 3.0).ceil() as usize + 1;
        for _ in 0..ticks {
            controller.advance(Duration::from_millis(40));
        }
        let drops = controller.state().drops;
        assert_eq!(drops, DropCount::new(30, 18), "speed {}", speed.value());
    }
}

#[test]
fn test_drop_counters_never_decrease_while_playing() {
    let mut controller = Controller::default();
    controller.handle(Event::Play);
    let mut previous = controller.state().drops;
    for _ in 0..500 {
        controller.advance(Duration::from_millis(40));
        let drops = controller.state().drops;
        assert!(drops.healthy >= previous.healthy);
        assert!(drops.ckd >= previous.ckd);
        previous = drops;
    }
}

// ============================================================================
// Reset and pause
// ============================================================================

#[test]
fn test_reset_after_ticks() {
    let mut controller = Controller::default();
    controller.handle(Event::SetStage(CkdStage::try_from(4).unwrap()));
    controller.handle(Event::Play);
    for _ in 0..150 {
        controller.advance(Duration::from_millis(40));
    }
    let stage_before = controller.state().stage;
    assert!(controller.state().drops.healthy > 0);

    controller.handle(Event::Reset);
    let state = controller.state();
    assert_eq!(state.time, CyclicTime::ZERO);
    assert_eq!(state.drops, DropCount::default());
    assert!(!state.playing);
    assert_eq!(state.stage, stage_before);
}

#[test]
fn test_no_tick_after_pause() {
    let mut controller = Controller::default();
    controller.handle(Event::Play);
    controller.advance(Duration::from_millis(30));
    controller.handle(Event::Pause);

    let before = *controller.state();
    controller.advance(Duration::from_secs(60));
    assert_eq!(*controller.state(), before);

    // Resuming starts a fresh phase: the 30ms from before the pause is gone
    controller.handle(Event::Play);
    controller.advance(Duration::from_millis(30));
    assert_eq!(controller.state().time, before.time);
}

#[test]
fn test_keyboard_shortcuts_drive_controller() {
    let mut controller = Controller::default();
    let mut input = Input::new();

    input.key_down(KeyCode::Space);
    input.key_down(KeyCode::I);
    for event in input.shortcuts() {
        controller.handle(event);
    }
    assert!(controller.state().playing);
    assert!(!controller.state().info_visible);

    input.begin_frame();
    input.key_up(KeyCode::Space);
    input.key_down(KeyCode::R);
    for event in input.shortcuts() {
        controller.handle(event);
    }
    assert!(!controller.state().playing);
}

// ============================================================================
// GFR
// ============================================================================

#[test]
fn test_gfr_reference_values() {
    assert_eq!(gfr(Variant::Healthy, CyclicTime::ZERO, CkdStage::MIN), 105.0);
    assert!((gfr(Variant::Healthy, CyclicTime::new(0.25), CkdStage::MIN) - 110.0).abs() < 1e-4);
}

#[test]
fn test_gfr_stage_five_band() {
    for t in sample_times(7, 1000) {
        let value = gfr(Variant::Ckd, t, CkdStage::MAX);
        assert!(value >= 0.0);
        assert!((5.0 - 1e-4..=11.0 + 1e-4).contains(&value));
    }
}

// ============================================================================
// Particles
// ============================================================================

#[test]
fn test_ckd_filtrate_never_brighter_than_healthy() {
    let counts = ParticleCounts::default();
    for t in sample_times(11, 500) {
        let healthy = Population::Filtrate.generate_all(t, Variant::Healthy, counts, CkdStage::MIN);
        let ckd = Population::Filtrate.generate_all(t, Variant::Ckd, counts, CkdStage::MIN);
        assert_eq!(healthy.len(), ckd.len());
        for (h, c) in healthy.iter().zip(&ckd) {
            assert!(c.opacity <= CKD_FILTRATE_PEAK_OPACITY);
            assert!(c.opacity <= h.opacity);
        }
    }
}

#[test]
fn test_protein_population_size_by_stage() {
    let counts = ParticleCounts::default();
    let three = CkdStage::try_from(3).unwrap();
    assert_eq!(Population::Protein.count(Variant::Ckd, counts, three), 3);
    assert_eq!(Population::Protein.count(Variant::Ckd, counts, CkdStage::MIN), 1);

    for t in sample_times(13, 200) {
        let active = Population::Protein.generate_all(t, Variant::Ckd, counts, three);
        assert!(active.len() <= 3);
        assert!(active.iter().all(|p| p.id < 3));
    }
}

#[test]
fn test_generators_are_reproducible() {
    for t in sample_times(17, 100) {
        for variant in Variant::all() {
            for i in 0..15 {
                assert_eq!(blood(t, i, 15, variant), blood(t, i, 15, variant));
                assert_eq!(filtrate(t, i, 10, variant), filtrate(t, i, 10, variant));
                assert_eq!(protein(t, i, 5, variant), protein(t, i, 5, variant));
            }
        }
    }
}

#[test]
fn test_particles_stay_in_unit_opacity() {
    let counts = ParticleCounts::default();
    for t in sample_times(19, 300) {
        for variant in Variant::all() {
            let scene = Scene::compose(variant, t, CkdStage::MAX, counts);
            for population in Population::all() {
                for p in scene.particles(population) {
                    assert!((0.0..=1.0).contains(&p.opacity), "{:?} {:?}", population, p);
                }
            }
        }
    }
}

// ============================================================================
// Frame
// ============================================================================

#[test]
fn test_frame_reports_both_indicators() {
    let mut controller = Controller::default();
    controller.handle(Event::SetView(ViewMode::Healthy));
    let frame = controller.frame();
    assert_eq!(frame.scenes.len(), 1);
    assert_eq!(frame.gfr_for(Variant::Ckd), frame.gfr_ckd);
    assert_eq!(frame.drops_for(Variant::Healthy), 0);
    assert_eq!(frame.stage, controller.state().stage);
}

#[test]
fn test_frame_composition_is_pure() {
    let mut controller = Controller::default();
    controller.handle(Event::Play);
    controller.advance(Duration::from_millis(200));
    assert_eq!(controller.frame(), controller.frame());
}
