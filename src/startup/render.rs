use bevy::prelude::*;

use crate::systems::colors::PAGE_BACKGROUND;

#[derive(Component)]
pub struct MainCamera;

pub struct RenderPlugin;
impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(PAGE_BACKGROUND))
            .add_systems(Startup, setup_cameras);
    }
}

pub fn setup_cameras(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera, Msaa::Off));
}
