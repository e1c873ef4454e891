use bevy::{
    input::mouse::{MouseScrollUnit, MouseWheel},
    prelude::*,
    window::PrimaryWindow,
};

use super::{
    observer::Viewport,
    sections::{PageLayout, SectionId},
};
use crate::startup::render::MainCamera;

/// Smoothly eased vertical page offset.
#[derive(Resource, Clone, Debug)]
pub struct PageScroll {
    offset: f32,
    target: f32,
    viewport: Vec2,
    max_offset: f32,
}

impl Default for PageScroll {
    fn default() -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            viewport: Vec2::new(1280.0, 720.0),
            max_offset: f32::MAX,
        }
    }
}

impl PageScroll {
    /// Fixed header height subtracted from table-of-contents jumps.
    pub const HEADER_OFFSET: f32 = 100.0;
    const EASE_RATE: f32 = 10.0;
    const SNAP_DISTANCE: f32 = 0.5;
    const LINE_HEIGHT_PX: f32 = 40.0;

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            top: self.offset,
            height: self.viewport.y,
        }
    }

    pub fn set_extent(&mut self, page_height: f32, viewport: Vec2) {
        self.viewport = viewport;
        self.max_offset = (page_height - viewport.y).max(0.0);
        self.target = self.target.clamp(0.0, self.max_offset);
        self.offset = self.offset.clamp(0.0, self.max_offset);
    }

    pub fn scroll_to(&mut self, target: f32) {
        self.target = target.clamp(0.0, self.max_offset);
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.target + delta);
    }

    pub fn scroll_to_section(&mut self, layout: &PageLayout, section: SectionId, header_offset: f32) {
        self.scroll_to(layout.span(section).top - header_offset);
    }

    /// Eases the offset toward the target.
    pub fn step(&mut self, delta_secs: f32) {
        let remaining = self.target - self.offset;
        if remaining.abs() <= Self::SNAP_DISTANCE {
            self.offset = self.target;
            return;
        }
        let blend = 1.0 - (-Self::EASE_RATE * delta_secs).exp();
        self.offset += remaining * blend;
    }

    pub fn is_settled(&self) -> bool {
        self.offset == self.target
    }

    pub fn track_viewport(
        window: Single<&Window, With<PrimaryWindow>>,
        layout: Res<PageLayout>,
        mut scroll: ResMut<PageScroll>,
    ) {
        let size = Vec2::new(window.resolution.width(), window.resolution.height());
        if size != scroll.viewport || scroll.max_offset == f32::MAX {
            scroll.set_extent(layout.total_height(), size);
        }
    }

    pub fn wheel(mut wheel_events: MessageReader<MouseWheel>, mut scroll: ResMut<PageScroll>) {
        for event in wheel_events.read() {
            let pixels = match event.unit {
                MouseScrollUnit::Line => event.y * Self::LINE_HEIGHT_PX,
                MouseScrollUnit::Pixel => event.y,
            };
            scroll.scroll_by(-pixels);
        }
    }

    pub fn ease(time: Res<Time>, mut scroll: ResMut<PageScroll>) {
        if !scroll.is_settled() {
            scroll.step(time.delta_secs());
        }
    }

    pub fn follow_camera(
        scroll: Res<PageScroll>,
        mut camera: Single<&mut Transform, With<MainCamera>>,
        mut anchored: Query<(&ScreenAnchor, &mut Transform), Without<MainCamera>>,
    ) {
        let center = Vec2::new(0.0, -(scroll.offset + scroll.viewport.y * 0.5));
        camera.translation.x = center.x;
        camera.translation.y = center.y;
        for (anchor, mut transform) in anchored.iter_mut() {
            let position = center + anchor.fraction * scroll.viewport + anchor.offset;
            transform.translation.x = position.x;
            transform.translation.y = position.y;
        }
    }
}

/// Keeps an entity fixed on screen. `fraction` is relative to the viewport
/// centre (`(-0.5, 0.5)` is the top-left corner).
#[derive(Component, Clone, Copy, Debug)]
#[require(Transform, Visibility)]
pub struct ScreenAnchor {
    pub fraction: Vec2,
    pub offset: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroll() -> PageScroll {
        let mut scroll = PageScroll::default();
        scroll.set_extent(3000.0, Vec2::new(1280.0, 1000.0));
        scroll
    }

    #[test]
    fn targets_clamp_to_the_page_extent() {
        let mut scroll = scroll();
        scroll.scroll_to(-50.0);
        assert_eq!(scroll.target(), 0.0);
        scroll.scroll_to(5000.0);
        assert_eq!(scroll.target(), 2000.0);
        scroll.scroll_by(-500.0);
        assert_eq!(scroll.target(), 1500.0);
    }

    #[test]
    fn easing_converges_and_snaps_onto_the_target() {
        let mut scroll = scroll();
        scroll.scroll_to(800.0);
        scroll.step(1.0 / 60.0);
        assert!(scroll.offset() > 0.0 && scroll.offset() < 800.0);
        for _ in 0..240 {
            scroll.step(1.0 / 60.0);
        }
        assert!(scroll.is_settled());
        assert_eq!(scroll.offset(), 800.0);
    }

    #[test]
    fn section_jumps_subtract_the_header_offset() {
        let layout = PageLayout::default();
        let mut scroll = scroll();
        scroll.scroll_to_section(&layout, SectionId::Profile, PageScroll::HEADER_OFFSET);
        assert_eq!(
            scroll.target(),
            layout.span(SectionId::Profile).top - PageScroll::HEADER_OFFSET
        );
        scroll.scroll_to_section(&layout, SectionId::Cover, PageScroll::HEADER_OFFSET);
        assert_eq!(scroll.target(), 0.0);
    }
}
