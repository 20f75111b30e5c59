mod cues;
mod dialogue;
mod hideout;
mod house;
mod motion;
mod render;
mod scene_impl;
mod script;
mod story;
mod types;
mod well;

use engine::Scene;

use crate::app::config::Tuning;

use self::cues::TracingCueSink;
use self::scene_impl::StoryScene;
use self::story::StoryState;

pub(crate) fn build_story_scene(tuning: Tuning) -> Box<dyn Scene> {
    Box::new(StoryScene::new(
        StoryState::new(tuning),
        Box::new(TracingCueSink),
    ))
}

#[cfg(test)]
mod tests;
