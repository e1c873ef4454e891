use bevy::{
    prelude::*,
    window::{CursorIcon, PrimaryWindow, SystemCursorIcon},
};

use super::render::MainCamera;

pub struct CursorPlugin;
impl Plugin for CursorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CustomCursor>()
            .add_systems(
                PreUpdate,
                (CustomCursor::reset_mode, CustomCursor::update_position).chain(),
            )
            .add_systems(
                PostUpdate,
                CustomCursor::update_icon.run_if(resource_changed::<CustomCursor>),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Pointer,
    Clicker,
    Dragging,
}

impl CursorMode {
    fn system_icon(self) -> SystemCursorIcon {
        match self {
            Self::Pointer => SystemCursorIcon::Default,
            Self::Clicker => SystemCursorIcon::Pointer,
            Self::Dragging => SystemCursorIcon::Move,
        }
    }
}

/// Pointer state shared by every hit-testing system.
#[derive(Resource, Default)]
pub struct CustomCursor {
    pub current_mode: CursorMode,
    /// World-space position, `None` while the pointer is outside the window.
    pub position: Option<Vec2>,
    applied_mode: Option<CursorMode>,
}

impl CustomCursor {
    fn reset_mode(mut custom_cursor: ResMut<CustomCursor>) {
        if custom_cursor.current_mode != CursorMode::Pointer {
            custom_cursor.current_mode = CursorMode::Pointer;
        }
    }

    fn update_position(
        window: Single<&Window, With<PrimaryWindow>>,
        camera_query: Single<(&Camera, &GlobalTransform), With<MainCamera>>,
        mut custom_cursor: ResMut<CustomCursor>,
    ) {
        let (camera, camera_transform) = *camera_query;
        let position = window.cursor_position().and_then(|screen_position| {
            camera
                .viewport_to_world_2d(camera_transform, screen_position)
                .ok()
        });
        if custom_cursor.position != position {
            custom_cursor.position = position;
        }
    }

    fn update_icon(
        mut commands: Commands,
        window: Single<Entity, With<PrimaryWindow>>,
        mut custom_cursor: ResMut<CustomCursor>,
    ) {
        let mode = custom_cursor.current_mode;
        if custom_cursor.applied_mode == Some(mode) {
            return;
        }
        commands
            .entity(*window)
            .insert(CursorIcon::System(mode.system_icon()));
        custom_cursor.applied_mode = Some(mode);
    }
}
