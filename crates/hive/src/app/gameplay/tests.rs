use std::cell::RefCell;
use std::rc::Rc;

use engine::{InputAction, InputSnapshot, Scene, SceneCommand, Vec2};
use proptest::prelude::*;

use super::cues::{Cue, CueSink};
use super::hideout::{DistanceBand, HideoutScene};
use super::house::HouseScene;
use super::scene_impl::StoryScene;
use super::script;
use super::story::{ActiveScene, StoryState};
use super::types::{Intent, ItemId, PendingTransition, SceneId, SpiritMood, WatcherMood};
use super::build_story_scene;
use crate::app::config::Tuning;

const DT: f32 = 1.0 / 60.0;

fn new_story() -> StoryState {
    StoryState::new(Tuning::default())
}

fn idle() -> Intent {
    Intent::default()
}

fn hold_interact() -> Intent {
    Intent {
        interact_held: true,
        ..Intent::default()
    }
}

fn press_interact() -> Intent {
    Intent {
        interact_held: true,
        interact_pressed: true,
        ..Intent::default()
    }
}

fn press_observe() -> Intent {
    Intent {
        observe_held: true,
        observe_pressed: true,
        ..Intent::default()
    }
}

fn run(story: &mut StoryState, intent: Intent, ticks: u32) {
    for _ in 0..ticks {
        story.tick(DT, &intent);
    }
}

fn played_last_tick(story: &StoryState, cue: Cue) -> bool {
    story.cues().last_tick().contains(&cue)
}

fn house_mut(story: &mut StoryState) -> &mut HouseScene {
    match story.active_mut() {
        ActiveScene::House(house) => house,
        other => panic!("expected house, found {}", other.id()),
    }
}

fn house(story: &StoryState) -> &HouseScene {
    match story.active() {
        ActiveScene::House(house) => house,
        other => panic!("expected house, found {}", other.id()),
    }
}

fn hideout(story: &StoryState) -> &HideoutScene {
    match story.active() {
        ActiveScene::Hideout(hideout) => hideout,
        other => panic!("expected hideout, found {}", other.id()),
    }
}

fn place_player(story: &mut StoryState, position: Vec2) {
    let player = story.player_mut();
    player.position = position;
    player.velocity = Vec2::ZERO;
}

#[test]
fn story_opens_at_the_well_with_its_first_line() {
    let story = new_story();
    assert_eq!(story.scene_id(), SceneId::Well);
    assert_eq!(story.dialogue().current(), Some(script::WELL_OPENING[0]));
    assert_eq!(story.progress().gauge(), 0.0);
    assert!((story.progress().imagination() - 0.4).abs() < 1e-6);
    assert!((story.progress().trust() - 0.3).abs() < 1e-6);
}

#[test]
fn continue_advances_the_dialogue() {
    let mut story = new_story();
    let intent = Intent {
        continue_pressed: true,
        ..Intent::default()
    };
    run(&mut story, intent, 1);
    assert_eq!(story.dialogue().current(), Some(script::WELL_OPENING[1]));
    run(&mut story, intent, 1);
    assert_eq!(story.dialogue().current(), None);
}

#[test]
fn listening_at_the_well_leads_to_the_house_after_the_delay() {
    let mut story = new_story();
    run(&mut story, hold_interact(), 1);
    assert_eq!(story.hint(), Some(script::HINT_LISTEN));

    run(&mut story, hold_interact(), 126);
    assert!(story.progress().gauge() < 1.0);
    assert!(!story.active().is_complete());

    run(&mut story, hold_interact(), 1);
    assert_eq!(story.progress().gauge(), 1.0);
    assert!((story.progress().imagination() - 0.55).abs() < 1e-5);
    assert!(story.active().is_complete());
    assert!(played_last_tick(&story, Cue::Discovery));
    assert_eq!(
        story.pending(),
        Some(PendingTransition {
            from: SceneId::Well,
            to: SceneId::House,
            remaining_ticks: 90,
        })
    );

    run(&mut story, idle(), 89);
    assert_eq!(story.scene_id(), SceneId::Well);
    run(&mut story, idle(), 1);
    assert_eq!(story.scene_id(), SceneId::House);
    assert_eq!(story.progress().gauge(), 0.0);
    assert_eq!(story.pending(), None);
}

#[test]
fn gauge_decays_when_the_player_stops_listening() {
    let mut story = new_story();
    run(&mut story, hold_interact(), 64);
    let filled = story.progress().gauge();
    let decay = story.tuning().well.decay_per_tick;
    let mut previous = filled;
    for _ in 0..32 {
        run(&mut story, idle(), 1);
        let gauge = story.progress().gauge();
        assert!(gauge <= previous);
        assert!(previous - gauge <= decay + 1e-6);
        previous = gauge;
    }
    assert!(previous < filled);
    assert!(previous > 0.0);
}

#[test]
fn listening_out_of_range_does_nothing() {
    let mut story = new_story();
    place_player(&mut story, Vec2::new(100.0, 480.0));
    run(&mut story, hold_interact(), 30);
    assert_eq!(story.progress().gauge(), 0.0);
    assert_eq!(story.hint(), None);
}

#[test]
fn safe_pickup_adds_each_item_once() {
    let mut story = new_story();
    story.jump_to(SceneId::House);
    house_mut(&mut story).force_watchers(WatcherMood::Calm, WatcherMood::Calm);
    let bread = house(&story).item_position(ItemId::Bread);
    place_player(&mut story, bread);

    run(&mut story, press_interact(), 1);
    assert!(story.progress().inventory.contains(ItemId::Bread));
    assert!(played_last_tick(&story, Cue::Pickup));

    run(&mut story, press_interact(), 1);
    assert_eq!(story.progress().inventory.len(), 1);
    assert!(!played_last_tick(&story, Cue::Pickup));
}

#[test]
fn pickup_while_watched_is_rejected_with_a_stress_spike() {
    let mut story = new_story();
    story.jump_to(SceneId::House);
    house_mut(&mut story).force_watchers(WatcherMood::Alert, WatcherMood::Calm);
    let bread = house(&story).item_position(ItemId::Bread);
    place_player(&mut story, bread);
    let before = story.progress().stress();

    run(&mut story, press_interact(), 1);
    assert!(story.progress().inventory.is_empty());
    assert!(played_last_tick(&story, Cue::Reject));
    let spiked = story.progress().stress();
    assert!(spiked >= before + 0.35);

    run(&mut story, press_interact(), 1);
    assert!(!played_last_tick(&story, Cue::Reject));
    assert!(story.progress().stress() < spiked + 0.35);
}

#[test]
fn every_unsafe_press_raises_stress_even_while_cooling_down() {
    let mut tuning = Tuning::default();
    tuning.house.stress_horizontal_range = 1.0;
    tuning.house.detection_radius = 1.0;
    let mut story = StoryState::new(tuning);
    story.jump_to(SceneId::House);
    house_mut(&mut story).force_watchers(WatcherMood::Alert, WatcherMood::Alert);
    let bread = house(&story).item_position(ItemId::Bread);
    place_player(&mut story, bread);

    run(&mut story, press_interact(), 1);
    assert!(played_last_tick(&story, Cue::Reject));
    let first = story.progress().stress();

    run(&mut story, press_interact(), 1);
    assert!(!played_last_tick(&story, Cue::Reject));
    assert!(story.progress().inventory.is_empty());
    assert!(story.progress().stress() > first);
}

#[test]
fn standing_near_a_detecting_watcher_maxes_stress() {
    let mut story = new_story();
    story.jump_to(SceneId::House);
    house_mut(&mut story).force_watchers(WatcherMood::Alert, WatcherMood::Calm);
    let father = house(&story).watchers()[0].position();
    place_player(&mut story, father);

    run(&mut story, idle(), 1);
    assert_eq!(story.progress().stress(), 1.0);
    assert!(house(&story).caught());
    assert!(played_last_tick(&story, Cue::Alarm));

    run(&mut story, idle(), 1);
    assert!(!played_last_tick(&story, Cue::Alarm));
}

#[test]
fn door_needs_both_items_and_then_leads_to_the_hideout() {
    let mut story = new_story();
    story.jump_to(SceneId::House);
    house_mut(&mut story).force_watchers(WatcherMood::Calm, WatcherMood::Calm);
    let door = house(&story).door_position();
    place_player(&mut story, door);

    run(&mut story, press_interact(), 1);
    assert!(!house(&story).escaped());

    story.progress_mut().inventory.insert(ItemId::Bread);
    story.progress_mut().inventory.insert(ItemId::Water);
    run(&mut story, idle(), 1);
    assert_eq!(story.hint(), Some(script::HINT_SLIP_OUT));

    run(&mut story, press_interact(), 1);
    assert!(house(&story).escaped());
    assert!(played_last_tick(&story, Cue::Door));

    run(&mut story, idle(), 29);
    assert_eq!(story.scene_id(), SceneId::House);
    run(&mut story, idle(), 1);
    assert_eq!(story.scene_id(), SceneId::Hideout);
    assert_eq!(story.progress().inventory.len(), 2);
}

#[test]
fn crowding_the_spirit_blocks_giving() {
    let mut story = new_story();
    story.jump_to(SceneId::Hideout);
    story.progress_mut().inventory.insert(ItemId::Bread);
    let spirit = hideout(&story).spirit_position();
    place_player(&mut story, Vec2::new(spirit.x, spirit.y + 30.0));
    let trust_before = story.progress().trust();

    run(&mut story, press_interact(), 1);
    let scene = hideout(&story);
    assert_eq!(scene.band(), DistanceBand::TooClose);
    assert_eq!(scene.mood(), SpiritMood::Wary);
    assert!(scene.darkened());
    assert_eq!(story.progress().stress(), 1.0);
    assert!(story.progress().inventory.contains(ItemId::Bread));
    assert!(story.progress().trust() < trust_before);
    assert!(played_last_tick(&story, Cue::Reject));
}

#[test]
fn retreat_backs_away_from_the_spirit() {
    let mut story = new_story();
    story.jump_to(SceneId::Hideout);
    let spirit = hideout(&story).spirit_position();
    place_player(&mut story, Vec2::new(spirit.x, spirit.y + 30.0));
    let intent = Intent {
        retreat_held: true,
        ..Intent::default()
    };

    run(&mut story, intent, 10);
    assert!((story.player().position.y - (spirit.y + 45.0)).abs() < 1e-3);
}

#[test]
fn gifts_leave_oldest_first_and_raise_trust() {
    let mut story = new_story();
    story.jump_to(SceneId::Hideout);
    story.progress_mut().inventory.insert(ItemId::Water);
    story.progress_mut().inventory.insert(ItemId::Bread);
    assert_eq!(hideout(&story).band(), DistanceBand::Far);

    run(&mut story, press_interact(), 1);
    assert_eq!(hideout(&story).band(), DistanceBand::Interaction);
    assert!(!story.progress().inventory.contains(ItemId::Water));
    assert!(story.progress().inventory.contains(ItemId::Bread));
    assert!(played_last_tick(&story, Cue::Drop));

    run(&mut story, press_interact(), 1);
    assert!(story.progress().inventory.is_empty());
    assert!((story.progress().trust() - 0.7).abs() < 1e-5);

    run(&mut story, press_interact(), 1);
    assert!(!played_last_tick(&story, Cue::Drop));
    assert!((story.progress().trust() - 0.7).abs() < 1e-5);
}

#[test]
fn spirit_turns_receptive_once_both_scalars_are_high() {
    let mut story = new_story();
    story.jump_to(SceneId::Hideout);
    run(&mut story, idle(), 1);
    assert_eq!(hideout(&story).mood(), SpiritMood::Wary);

    story.progress_mut().add_trust(0.4);
    story.progress_mut().add_imagination(0.3);
    run(&mut story, idle(), 1);
    assert_eq!(hideout(&story).mood(), SpiritMood::Receptive);
}

#[test]
fn observing_resolves_the_hideout_once() {
    let mut story = new_story();
    story.jump_to(SceneId::Hideout);

    run(&mut story, press_observe(), 1);
    let scene = hideout(&story);
    assert!(scene.resolved());
    assert!(scene.photo_revealed());
    assert_eq!(scene.mood(), SpiritMood::Resolved);
    assert!(played_last_tick(&story, Cue::Reveal));
    let imagination = story.progress().imagination();
    assert!((imagination - 0.5).abs() < 1e-5);

    run(&mut story, press_observe(), 1);
    assert!(!played_last_tick(&story, Cue::Reveal));
    assert_eq!(story.progress().imagination(), imagination);

    let spirit = hideout(&story).spirit_position();
    place_player(&mut story, Vec2::new(spirit.x, spirit.y + 30.0));
    run(&mut story, idle(), 1);
    assert_eq!(hideout(&story).mood(), SpiritMood::Resolved);
    assert!(story.active().is_complete());
}

#[test]
fn stale_transitions_are_discarded() {
    let mut story = new_story();
    story.set_pending(PendingTransition {
        from: SceneId::House,
        to: SceneId::Hideout,
        remaining_ticks: 1,
    });
    run(&mut story, idle(), 1);
    assert_eq!(story.scene_id(), SceneId::Well);
    assert_eq!(story.pending(), None);

    story.set_pending(PendingTransition {
        from: SceneId::Well,
        to: SceneId::House,
        remaining_ticks: 1,
    });
    run(&mut story, idle(), 1);
    assert_eq!(story.scene_id(), SceneId::Well);
}

#[test]
fn full_walkthrough_reaches_the_epilogue() {
    let mut story = new_story();
    run(&mut story, hold_interact(), 128);
    run(&mut story, idle(), 90);
    assert_eq!(story.scene_id(), SceneId::House);

    for item in [ItemId::Bread, ItemId::Water] {
        let position = house(&story).item_position(item);
        place_player(&mut story, position);
        run(&mut story, press_interact(), 1);
    }
    let door = house(&story).door_position();
    place_player(&mut story, door);
    run(&mut story, press_interact(), 1);
    run(&mut story, idle(), 30);
    assert_eq!(story.scene_id(), SceneId::Hideout);

    run(&mut story, press_interact(), 2);
    assert!((story.progress().imagination() - 0.85).abs() < 1e-5);
    run(&mut story, idle(), 1);
    assert_eq!(hideout(&story).mood(), SpiritMood::Receptive);

    run(&mut story, press_observe(), 1);
    assert!(hideout(&story).resolved());
    assert!(story.progress().inventory.is_empty());
    assert!((story.progress().trust() - 0.8).abs() < 1e-5);
    assert!((story.progress().imagination() - 0.95).abs() < 1e-5);
}

#[derive(Clone, Default)]
struct RecordingSink {
    played: Rc<RefCell<Vec<Cue>>>,
}

impl CueSink for RecordingSink {
    fn play(&mut self, cue: Cue) {
        self.played.borrow_mut().push(cue);
    }
}

#[test]
fn story_scene_forwards_cues_to_its_sink() {
    let sink = RecordingSink::default();
    let mut scene = StoryScene::new(new_story(), Box::new(sink.clone()));
    let input = InputSnapshot::empty()
        .with_action_down(InputAction::Interact, true)
        .with_window_size((960, 540));

    for _ in 0..128 {
        assert_eq!(scene.update(DT, &input), SceneCommand::None);
    }
    assert!(scene.story().active().is_complete());
    assert!(sink.played.borrow().contains(&Cue::Discovery));
}

#[test]
fn story_scene_quits_without_ticking() {
    let mut scene = StoryScene::new(new_story(), Box::new(RecordingSink::default()));
    let input = InputSnapshot::empty().with_quit_requested(true);
    assert_eq!(scene.update(DT, &input), SceneCommand::Quit);
    assert_eq!(scene.story().clock().tick(), 0);
}

#[test]
fn built_scene_reports_stage_and_title() {
    let scene = build_story_scene(Tuning::default());
    assert_eq!(scene.stage_size(), Vec2::new(960.0, 540.0));
    assert_eq!(
        scene.debug_title().as_deref(),
        Some("Spirit of the Hive - well")
    );
    assert!(scene
        .debug_lines()
        .iter()
        .any(|line| line == "pending: none"));
}

fn intent_strategy() -> impl Strategy<Value = Intent> {
    (
        -1i8..=1,
        -1i8..=1,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(x, y, interact_held, interact_pressed, observe_pressed, retreat_held, continue_pressed)| {
                Intent {
                    move_axis: Vec2::new(f32::from(x), f32::from(y)),
                    pointer: None,
                    interact_held: interact_held || interact_pressed,
                    interact_pressed,
                    observe_held: observe_pressed,
                    observe_pressed,
                    retreat_held,
                    continue_pressed,
                }
            },
        )
}

fn scene_strategy() -> impl Strategy<Value = SceneId> {
    prop_oneof![
        Just(SceneId::Well),
        Just(SceneId::House),
        Just(SceneId::Hideout),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_play_keeps_scalars_bounded_and_completion_sticky(
        start in scene_strategy(),
        intents in prop::collection::vec(intent_strategy(), 1..400),
    ) {
        let mut story = new_story();
        story.jump_to(start);
        let stage = story.tuning().stage.clone();
        let mut previous = (story.scene_id(), story.active().is_complete());

        for intent in &intents {
            story.tick(DT, intent);
            let progress = story.progress();
            for value in [
                progress.imagination(),
                progress.trust(),
                progress.stress(),
                progress.gauge(),
            ] {
                prop_assert!((0.0..=1.0).contains(&value));
            }

            let position = story.player().position;
            prop_assert!(position.x >= stage.inset_x && position.x <= stage.width - stage.inset_x);
            prop_assert!(position.y >= stage.inset_top && position.y <= stage.height - stage.inset_bottom);

            let current = (story.scene_id(), story.active().is_complete());
            if current.0 == previous.0 && previous.1 {
                prop_assert!(current.1);
            }
            previous = current;
        }
    }
}
