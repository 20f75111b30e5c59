use engine::{Canvas, InputSnapshot, Scene, SceneCommand, Vec2};
use tracing::info;

use super::cues::CueSink;
use super::render::draw_story;
use super::story::{ActiveScene, StoryState};
use super::types::{Intent, ItemId};

/// Adapts the story to the engine loop and forwards each tick's cues to a sink.
pub(crate) struct StoryScene {
    story: StoryState,
    sink: Box<dyn CueSink>,
}

impl StoryScene {
    pub(crate) fn new(story: StoryState, sink: Box<dyn CueSink>) -> Self {
        Self { story, sink }
    }

    #[cfg(test)]
    pub(crate) fn story(&self) -> &StoryState {
        &self.story
    }
}

impl Scene for StoryScene {
    fn load(&mut self) {
        info!(
            scene = %self.story.scene_id(),
            seed = self.story.tuning().cue_seed,
            "story_loaded"
        );
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }
        let intent = Intent::from_input(input, self.story.stage_size());
        self.story.tick(fixed_dt_seconds, &intent);
        for cue in self.story.cues().last_tick() {
            self.sink.play(*cue);
        }
        SceneCommand::None
    }

    fn render(&self, canvas: &mut Canvas<'_>) {
        draw_story(canvas, &self.story);
    }

    fn unload(&mut self) {
        let progress = self.story.progress();
        info!(
            scene = %self.story.scene_id(),
            tick = self.story.clock().tick(),
            imagination = progress.imagination(),
            trust = progress.trust(),
            "story_unloaded"
        );
    }

    fn stage_size(&self) -> Vec2 {
        self.story.stage_size()
    }

    fn debug_title(&self) -> Option<String> {
        Some(format!("Spirit of the Hive - {}", self.story.scene_id()))
    }

    fn debug_lines(&self) -> Vec<String> {
        let progress = self.story.progress();
        let carrying: Vec<&str> = progress.inventory.iter().map(ItemId::name).collect();
        let pending = match self.story.pending() {
            Some(transition) => format!(
                "{} -> {} in {}",
                transition.from, transition.to, transition.remaining_ticks
            ),
            None => "none".to_string(),
        };
        vec![
            format!("scene: {}", self.story.scene_id()),
            format!(
                "tick: {} ({:.1}s)",
                self.story.clock().tick(),
                self.story.clock().elapsed_seconds()
            ),
            format!(
                "imag {:.2} trust {:.2} stress {:.2} gauge {:.2}",
                progress.imagination(),
                progress.trust(),
                progress.stress(),
                progress.gauge()
            ),
            format!("player: {:?}", self.story.player().mood),
            scene_detail(self.story.active()),
            format!(
                "carrying: {}",
                if carrying.is_empty() {
                    "nothing".to_string()
                } else {
                    carrying.join(", ")
                }
            ),
            format!("pending: {pending}"),
        ]
    }
}

fn scene_detail(active: &ActiveScene) -> String {
    match active {
        ActiveScene::Well(well) => format!(
            "well: listening {} discovered {}",
            well.listening(),
            well.discovered()
        ),
        ActiveScene::House(house) => house
            .watchers()
            .iter()
            .map(|watcher| {
                format!(
                    "{} {} {}",
                    watcher.kind().name(),
                    if watcher.is_detecting() { "alert" } else { "calm" },
                    watcher.phase_elapsed()
                )
            })
            .collect::<Vec<_>>()
            .join(" | "),
        ActiveScene::Hideout(hideout) => format!(
            "spirit: {:?} {:?} fear {:.2}",
            hideout.mood(),
            hideout.band(),
            hideout.fear()
        ),
    }
}
