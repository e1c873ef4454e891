//! Shared UI primitives.
//!
//! Everything here is laid out top-left anchored with `y` growing
//! downwards inside its parent, matching the page and window coordinates.
use bevy::{prelude::*, sprite::Anchor};

pub mod tabs;
pub mod window;

/// Flat rectangle covering `rect` in parent-local, `y`-down coordinates.
pub fn panel(color: Color, rect: Rect, z: f32) -> impl Bundle {
    (
        Sprite::from_color(color, rect.size()),
        Anchor::TOP_LEFT,
        Transform::from_xyz(rect.min.x, -rect.min.y, z),
    )
}

pub fn label(text: impl Into<String>, size: f32, color: Color, at: Vec2, z: f32) -> impl Bundle {
    (
        Text2d::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Anchor::TOP_LEFT,
        Transform::from_xyz(at.x, -at.y, z),
    )
}
