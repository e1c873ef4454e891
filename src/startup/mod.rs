use bevy::prelude::*;

use crate::{
    data::rng::RngPlugin,
    systems::{colors::ColorsPlugin, interaction::InteractionPlugin, time::clock::ClockPlugin},
};

pub mod cursor;
pub mod render;
pub mod shortcuts;

use cursor::CursorPlugin;
use render::RenderPlugin;

pub struct StartupPlugin;
impl Plugin for StartupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            CursorPlugin,
            RenderPlugin,
            RngPlugin,
            ColorsPlugin,
            ClockPlugin,
            InteractionPlugin,
        ))
        .add_systems(Update, shortcuts::scroll_to_top_on_esc);
    }
}
