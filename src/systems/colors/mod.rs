use std::time::Duration;

use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};

pub const DESKTOP_TEAL: Color = Color::srgb(0.0, 0.502, 0.502);
pub const WINDOW_FACE: Color = Color::srgb(0.753, 0.753, 0.753);
pub const WINDOW_SHADOW: Color = Color::srgb(0.502, 0.502, 0.502);
pub const FIELD_BACKGROUND: Color = Color::WHITE;
pub const TITLE_ACTIVE: Color = Color::srgb(0.0, 0.0, 0.502);
pub const TITLE_INACTIVE: Color = Color::srgb(0.502, 0.502, 0.502);
pub const PROGRESS_FILL: Color = Color::srgb(0.0, 0.0, 0.502);
pub const TEXT_DARK: Color = Color::BLACK;
pub const TEXT_LIGHT: Color = Color::WHITE;
pub const DISABLED_TEXT: Color = Color::srgb(0.4, 0.4, 0.4);

pub const PAGE_BACKGROUND: Color = Color::srgb(0.933, 0.925, 0.894);
pub const PROFILE_BACKGROUND: Color = Color::srgb(0.831, 0.816, 0.784);
pub const INK: Color = Color::srgb(0.102, 0.102, 0.102);
pub const ACCENT: Color = Color::srgb(0.0, 0.0, 0.502);
pub const LINK_IDLE: Color = Color::srgb(0.333, 0.333, 0.333);
pub const GRID_LINE: Color = Color::srgba(1.0, 1.0, 1.0, 0.08);

pub const BLOCK_FREE: Color = Color::WHITE;
pub const BLOCK_FRAGMENTED: Color = Color::srgb(0.8, 0.0, 0.0);
pub const BLOCK_CONTIGUOUS: Color = Color::srgb(0.0, 0.0, 0.8);

pub struct ColorsPlugin;
impl Plugin for ColorsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, ColorTranslation::translate);
    }
}

trait ColorExt {
    fn to_vec4(self) -> Vec4;
}

impl ColorExt for Color {
    fn to_vec4(self) -> Vec4 {
        let color = self.to_linear();
        Vec4::new(color.red, color.green, color.blue, color.alpha)
    }
}

fn from_vec4(color: Vec4) -> Color {
    Color::LinearRgba(LinearRgba {
        red: color.x,
        green: color.y,
        blue: color.z,
        alpha: color.w,
    })
}

/// Linear sprite tint transition. The start color is captured from the
/// sprite when the component is inserted.
#[derive(Component, Clone, Debug)]
#[component(on_insert = ColorTranslation::on_insert)]
pub struct ColorTranslation {
    pub initial_color: Vec4,
    pub final_color: Vec4,
    pub timer: Timer,
}

impl ColorTranslation {
    pub fn new(final_color: Color, duration: Duration) -> Self {
        Self {
            initial_color: Vec4::default(),
            final_color: final_color.to_vec4(),
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(color) = world.entity(entity).get::<Sprite>().map(|sprite| sprite.color) else {
            warn!("color translation inserted on {entity:?} without a sprite");
            return;
        };
        if let Some(mut translation) = world.entity_mut(entity).get_mut::<ColorTranslation>() {
            translation.initial_color = color.to_vec4();
        }
    }

    pub fn translate(
        mut commands: Commands,
        time: Res<Time>,
        mut query: Query<(Entity, &mut ColorTranslation, &mut Sprite)>,
    ) {
        for (entity, mut translation, mut sprite) in query.iter_mut() {
            translation.timer.tick(time.delta());
            if translation.timer.just_finished() {
                sprite.color = from_vec4(translation.final_color);
                commands.entity(entity).remove::<ColorTranslation>();
                continue;
            }
            let fraction = translation.timer.fraction();
            let difference = translation.final_color - translation.initial_color;
            sprite.color = from_vec4(translation.initial_color + difference * fraction);
        }
    }
}
