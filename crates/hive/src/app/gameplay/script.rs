//! Hand-authored lines. The bitmap font is ASCII only.

use super::types::{ItemId, SceneId};

pub(crate) const WELL_OPENING: &[&str] = &[
    "Night. The old well breathes like something asleep.",
    "If you listen long enough, it might answer.",
];
pub(crate) const HOUSE_OPENING: &[&str] = &[
    "The kitchen. Father is at the table, grandmother by the stove.",
    "Bread and water. Take them while nobody is watching.",
];
pub(crate) const HIDEOUT_OPENING: &[&str] = &[
    "The barn. Something wounded waits in the dark.",
    "Not too close. Let it see you first.",
];

pub(crate) const WELL_DISCOVERED: &str = "A question mark is scratched onto the map.";
pub(crate) const HOUSE_CAUGHT: &str = "Caught... hide.";
pub(crate) const HOUSE_REJECTED: &str = "Not now. Someone is paying attention.";
pub(crate) const HOUSE_ESCAPED: &str = "You slip out into the cold with both hands full.";
pub(crate) const HIDEOUT_TOO_CLOSE: &str = "It flinches away. You are too close.";
pub(crate) const HIDEOUT_NOTHING_LEFT: &str = "Nothing left to give.";
pub(crate) const HIDEOUT_GAVE_BREAD: &str = "You set the bread down between you.";
pub(crate) const HIDEOUT_GAVE_WATER: &str = "You set the water down between you.";
pub(crate) const HIDEOUT_REVEAL: &str = "In the uniform pocket: an old family photograph.";
pub(crate) const EPILOGUE: &str = "Somewhere far away, someone is still waiting for him.";

pub(crate) const HINT_LISTEN: &str = "Listen at the well (hold F)";
pub(crate) const HINT_TAKE_BREAD: &str = "Take the bread (F)";
pub(crate) const HINT_TAKE_WATER: &str = "Take the water (F)";
pub(crate) const HINT_SLIP_OUT: &str = "Slip out the door (F)";
pub(crate) const HINT_GIVE: &str = "Set down what you carry (F)";
pub(crate) const HINT_OBSERVE: &str = "Observe (E)";
pub(crate) const HINT_BACK_AWAY: &str = "Too close... back away (B)";
pub(crate) const HINT_FAR: &str = "A shape breathes in the dark. Come a little closer.";

pub(crate) fn opening_lines(scene: SceneId) -> &'static [&'static str] {
    match scene {
        SceneId::Well => WELL_OPENING,
        SceneId::House => HOUSE_OPENING,
        SceneId::Hideout => HIDEOUT_OPENING,
    }
}

pub(crate) fn take_hint(item: ItemId) -> &'static str {
    match item {
        ItemId::Bread => HINT_TAKE_BREAD,
        ItemId::Water => HINT_TAKE_WATER,
    }
}

pub(crate) fn give_line(item: ItemId) -> &'static str {
    match item {
        ItemId::Bread => HIDEOUT_GAVE_BREAD,
        ItemId::Water => HIDEOUT_GAVE_WATER,
    }
}
