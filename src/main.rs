use bevy::{prelude::*, window::WindowResolution};

mod data;
mod scenes;
mod startup;
mod systems;

use scenes::ScenePlugin;
use startup::StartupPlugin;
use systems::ui::window::DesktopWindowPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: String::from("Portfolio"),
                resolution: WindowResolution::new(1280, 720),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(GamePlugin)
        .run();
}

struct GamePlugin;
impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((StartupPlugin, DesktopWindowPlugin, ScenePlugin));
    }
}
