//! Window chrome geometry and pointer hit classification.
//!
//! All rectangles are window-local, origin at the top-left corner of the
//! frame, `y` growing downwards.
use bevy::prelude::*;

use super::{
    dial_up::DialField,
    manager::{WindowId, WindowManager},
    templates::{Dimension, TemplateRegistry, WindowBody, WindowTemplate},
};

pub const TITLE_BAR_HEIGHT: f32 = 24.0;
pub const BORDER: f32 = 3.0;
pub const LINE_HEIGHT: f32 = 18.0;
pub const CONTENT_PADDING: f32 = 12.0;

const AUTO_WIDTH: f32 = 400.0;
const CLOSE_BUTTON_SIZE: Vec2 = Vec2::new(16.0, 14.0);
const TAB_STRIP_TOP: f32 = TITLE_BAR_HEIGHT + 8.0;
const TAB_SIZE: Vec2 = Vec2::new(96.0, 22.0);
const TAB_LEFT: f32 = 10.0;
const FOOTER_BUTTON_SIZE: Vec2 = Vec2::new(75.0, 23.0);
const FOOTER_MARGIN: f32 = 12.0;
const FOOTER_GAP: f32 = 6.0;
const LAUNCHER_CELL: Vec2 = Vec2::new(110.0, 76.0);
const LAUNCHER_COLUMNS: usize = 3;
const DIAL_FIELD_LEFT: f32 = 188.0;
const DIAL_FIELD_TOP: f32 = TITLE_BAR_HEIGHT + 52.0;
const DIAL_FIELD_GAP: f32 = 10.0;
const DIAL_STATUS_HEIGHT: f32 = 64.0;

/// What a pointer-down inside a window landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowHit {
    Close,
    TitleBar,
    Tab(usize),
    Footer(usize),
    Launcher(usize),
    Field(DialField),
    Body,
}

pub fn frame_size(template: &WindowTemplate) -> Vec2 {
    let width = match template.width {
        Dimension::Px(width) => width,
        Dimension::Auto => AUTO_WIDTH,
    };
    let height = match template.height {
        Dimension::Px(height) => height,
        Dimension::Auto => auto_height(template, width),
    };
    Vec2::new(width, height)
}

fn auto_height(template: &WindowTemplate, width: f32) -> f32 {
    let footer = if template.footer.is_empty() {
        0.0
    } else {
        FOOTER_BUTTON_SIZE.y + 2.0 * FOOTER_MARGIN
    };
    let content = match template.body {
        WindowBody::DialUp => {
            field_rect(width, DialField::Message).max.y + DIAL_STATUS_HEIGHT - TITLE_BAR_HEIGHT
        }
        WindowBody::Tabbed(panes) => {
            let lines = panes.iter().map(|pane| pane.lines.len()).max().unwrap_or(0);
            TAB_SIZE.y + 16.0 + lines as f32 * LINE_HEIGHT
        }
        WindowBody::Listing { entries, .. } => (1 + 2 * entries.len()) as f32 * LINE_HEIGHT,
        WindowBody::Files(entries) => {
            entries.len().div_ceil(LAUNCHER_COLUMNS) as f32 * LAUNCHER_CELL.y
        }
        WindowBody::Launchers { entries, .. } => {
            entries.len().div_ceil(LAUNCHER_COLUMNS) as f32 * LAUNCHER_CELL.y + 2.0 * LINE_HEIGHT
        }
    };
    TITLE_BAR_HEIGHT + 2.0 * CONTENT_PADDING + content + footer
}

pub fn title_bar_rect(size: Vec2) -> Rect {
    Rect::new(BORDER, BORDER, size.x - BORDER, TITLE_BAR_HEIGHT)
}

pub fn close_button_rect(size: Vec2) -> Rect {
    let max = Vec2::new(size.x - BORDER - 3.0, BORDER + 2.0 + CLOSE_BUTTON_SIZE.y);
    Rect::from_corners(max - CLOSE_BUTTON_SIZE, max)
}

pub fn tab_rect(index: usize) -> Rect {
    let min = Vec2::new(TAB_LEFT + index as f32 * TAB_SIZE.x, TAB_STRIP_TOP);
    Rect::from_corners(min, min + TAB_SIZE)
}

pub fn footer_button_rect(size: Vec2, index: usize, count: usize) -> Rect {
    let from_right = (count - 1 - index.min(count - 1)) as f32;
    let max_x = size.x - FOOTER_MARGIN - from_right * (FOOTER_BUTTON_SIZE.x + FOOTER_GAP);
    let max = Vec2::new(max_x, size.y - FOOTER_MARGIN);
    Rect::from_corners(max - FOOTER_BUTTON_SIZE, max)
}

pub fn launcher_rect(index: usize) -> Rect {
    let column = (index % LAUNCHER_COLUMNS) as f32;
    let row = (index / LAUNCHER_COLUMNS) as f32;
    let min = Vec2::new(
        CONTENT_PADDING + 8.0 + column * LAUNCHER_CELL.x,
        TITLE_BAR_HEIGHT + CONTENT_PADDING + 8.0 + row * LAUNCHER_CELL.y,
    );
    Rect::from_corners(min, min + LAUNCHER_CELL - Vec2::splat(8.0))
}

pub fn field_rect(width: f32, field: DialField) -> Rect {
    let mut top = DIAL_FIELD_TOP;
    for previous in DialField::ALL {
        if previous == field {
            break;
        }
        top += previous.height() + DIAL_FIELD_GAP;
    }
    Rect::new(
        DIAL_FIELD_LEFT,
        top,
        width - CONTENT_PADDING - 8.0,
        top + field.height(),
    )
}

/// Status line and progress bar area below the dial-up form.
pub fn dial_status_rect(width: f32) -> Rect {
    let top = field_rect(width, DialField::Message).max.y + 12.0;
    Rect::new(DIAL_FIELD_LEFT - 100.0, top, width - CONTENT_PADDING - 8.0, top + 48.0)
}

/// First line of body content, below the title bar and tab strip.
pub fn content_origin(template: &WindowTemplate) -> Vec2 {
    match template.body {
        WindowBody::Tabbed(_) => Vec2::new(
            TAB_LEFT + CONTENT_PADDING,
            TAB_STRIP_TOP + TAB_SIZE.y + CONTENT_PADDING,
        ),
        _ => Vec2::new(CONTENT_PADDING, TITLE_BAR_HEIGHT + CONTENT_PADDING),
    }
}

/// Classifies a window-local point. `None` when it is outside the frame.
pub fn classify(template: &WindowTemplate, local: Vec2) -> Option<WindowHit> {
    let size = frame_size(template);
    if !Rect::from_corners(Vec2::ZERO, size).contains(local) {
        return None;
    }
    if close_button_rect(size).contains(local) {
        return Some(WindowHit::Close);
    }
    if local.y <= TITLE_BAR_HEIGHT {
        return Some(WindowHit::TitleBar);
    }

    let count = template.footer.len();
    if let Some(index) =
        (0..count).find(|&index| footer_button_rect(size, index, count).contains(local))
    {
        return Some(WindowHit::Footer(index));
    }

    let hit = match template.body {
        WindowBody::Tabbed(panes) => (0..panes.len())
            .find(|&index| tab_rect(index).contains(local))
            .map(WindowHit::Tab),
        WindowBody::Launchers { entries, .. } => (0..entries.len())
            .find(|&index| launcher_rect(index).contains(local))
            .map(WindowHit::Launcher),
        WindowBody::DialUp => DialField::ALL
            .into_iter()
            .find(|&field| field_rect(size.x, field).contains(local))
            .map(WindowHit::Field),
        WindowBody::Listing { .. } | WindowBody::Files(_) => None,
    };
    Some(hit.unwrap_or(WindowHit::Body))
}

/// Finds the topmost window under a desktop-local point.
pub fn hit_test(
    manager: &WindowManager,
    registry: &TemplateRegistry,
    point: Vec2,
) -> Option<(WindowId, WindowHit)> {
    manager.stacked().into_iter().rev().find_map(|instance| {
        classify(registry.get(instance.template()), point - instance.position())
            .map(|hit| (instance.id(), hit))
    })
}
