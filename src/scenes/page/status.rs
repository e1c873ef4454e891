//! Active chapter tracking, table of contents and the status bar.
use std::time::Duration;

use bevy::prelude::*;

use super::{
    observer::{IntersectionObserver, Margin, ObserverOptions},
    scroll::PageScroll,
    sections::{PageLayout, SectionId},
};
use crate::systems::{
    colors::{ACCENT, LINK_IDLE},
    interaction::Clickable,
    time::clock::WallClock,
    ui::window::{ScheduledOpens, WindowTemplateId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    ScrollTo(SectionId),
    /// Scrolls to the desktop and opens the connect hub once the scroll had
    /// time to land.
    Connect,
}

impl NavAction {
    pub const CONNECT_OPEN_DELAY: Duration = Duration::from_millis(800);

    pub fn for_section(section: SectionId) -> Self {
        match section {
            SectionId::Connect => NavAction::Connect,
            other => NavAction::ScrollTo(other),
        }
    }

    pub fn apply(self, layout: &PageLayout, scroll: &mut PageScroll, scheduled: &mut ScheduledOpens) {
        match self {
            NavAction::ScrollTo(section) => {
                scroll.scroll_to_section(layout, section, PageScroll::HEADER_OFFSET);
            }
            NavAction::Connect => {
                scroll.scroll_to_section(layout, SectionId::Expertise, 0.0);
                scheduled.schedule(WindowTemplateId::ConnectHub, Self::CONNECT_OPEN_DELAY);
            }
        }
    }

    pub fn handle_clicks(
        links: Query<&Clickable<NavAction>>,
        layout: Res<PageLayout>,
        mut scroll: ResMut<PageScroll>,
        mut scheduled: ResMut<ScheduledOpens>,
    ) {
        for clickable in links.iter().filter(|clickable| clickable.triggered) {
            for action in &clickable.actions {
                action.apply(&layout, &mut scroll, &mut scheduled);
            }
        }
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChapterEntered {
    pub section: SectionId,
}

#[derive(Resource, Clone, Debug)]
pub struct ChapterTracker {
    observer: IntersectionObserver<SectionId>,
    active: Option<SectionId>,
}

impl Default for ChapterTracker {
    fn default() -> Self {
        Self {
            observer: IntersectionObserver::new(Self::OPTIONS),
            active: None,
        }
    }
}

impl ChapterTracker {
    /// A band from 20 % to 40 % of the viewport height.
    pub const OPTIONS: ObserverOptions = ObserverOptions::threshold(0.0)
        .with_margins(Margin::Percent(-20.0), Margin::Percent(-60.0));

    pub fn active(&self) -> Option<SectionId> {
        self.active
    }

    pub fn track(
        scroll: Res<PageScroll>,
        layout: Res<PageLayout>,
        mut tracker: ResMut<ChapterTracker>,
        mut entered: MessageWriter<ChapterEntered>,
    ) {
        let viewport = scroll.viewport();
        for section in SectionId::ALL {
            let entry = tracker
                .observer
                .observe(section, layout.span(section), viewport);
            if entry.is_some_and(|entry| entry.intersecting) {
                entered.write(ChapterEntered { section });
            }
        }
    }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct TocLink {
    pub section: SectionId,
}

#[derive(Component)]
pub struct StatusSectionText;

#[derive(Component)]
pub struct StatusClockText;

#[derive(Component)]
pub struct TaskbarClockText;

#[derive(Component, Clone, Debug)]
pub struct FooterYearText {
    pub suffix: String,
}

pub fn section_label(section: SectionId) -> String {
    format!("SECTION: {}", section.chapter_number())
}

fn update_active_link(section: SectionId, links: &mut Query<(&TocLink, &mut TextColor)>) {
    for (link, mut color) in links.iter_mut() {
        color.0 = if link.section == section { ACCENT } else { LINK_IDLE };
    }
}

fn update_section(section: SectionId, status: &mut Query<&mut Text2d, With<StatusSectionText>>) {
    for mut text in status.iter_mut() {
        text.0 = section_label(section);
    }
}

/// Single handler for chapter changes: highlights the link and updates the
/// status bar in one place.
pub fn on_chapter_entered(
    mut entered: MessageReader<ChapterEntered>,
    mut tracker: ResMut<ChapterTracker>,
    mut links: Query<(&TocLink, &mut TextColor)>,
    mut status: Query<&mut Text2d, With<StatusSectionText>>,
) {
    for ChapterEntered { section } in entered.read().copied() {
        tracker.active = Some(section);
        update_active_link(section, &mut links);
        update_section(section, &mut status);
    }
}

pub fn sync_clock_texts(
    clock: Res<WallClock>,
    mut status: Query<&mut Text2d, (With<StatusClockText>, Without<TaskbarClockText>)>,
    mut taskbar: Query<&mut Text2d, (With<TaskbarClockText>, Without<StatusClockText>)>,
    mut footer: Query<(&FooterYearText, &mut Text2d), (Without<StatusClockText>, Without<TaskbarClockText>)>,
) {
    for mut text in status.iter_mut() {
        text.0 = clock.status.clone();
    }
    for mut text in taskbar.iter_mut() {
        text.0 = clock.taskbar.clone();
    }
    for (footer_text, mut text) in footer.iter_mut() {
        text.0 = format!("(c) {} {}", clock.year, footer_text.suffix);
    }
}
