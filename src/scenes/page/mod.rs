use bevy::{prelude::*, sprite::Anchor};

pub mod content;
pub mod observer;
pub mod reveal;
pub mod scroll;
pub mod sections;
pub mod status;

use content::PortfolioContent;
use reveal::{Reveal, RevealQueue};
use scroll::{PageScroll, ScreenAnchor};
use sections::{PageLayout, PageSpan, SectionId};
use status::{
    ChapterEntered, ChapterTracker, FooterYearText, NavAction, StatusClockText,
    StatusSectionText, TocLink,
};

use crate::systems::{
    colors::{
        ACCENT, INK, LINK_IDLE, PAGE_BACKGROUND, PROFILE_BACKGROUND, TEXT_DARK,
        TEXT_LIGHT, WINDOW_FACE, WINDOW_SHADOW,
    },
    interaction::{register_clickable, Clickable, InteractionSystem},
    time::clock::WallClock,
    ui::{
        label, panel,
        window::{DesktopArea, LaunchRequested},
    },
};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum PageSystem {
    Scroll,
    Observe,
}

pub struct PagePlugin;
impl Plugin for PagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PageLayout>()
            .init_resource::<PageScroll>()
            .init_resource::<PortfolioContent>()
            .init_resource::<ChapterTracker>()
            .init_resource::<RevealQueue>()
            .add_message::<ChapterEntered>()
            .configure_sets(
                Update,
                (
                    PageSystem::Scroll.after(InteractionSystem),
                    PageSystem::Observe.after(PageSystem::Scroll),
                ),
            )
            .add_systems(Startup, (place_desktop, spawn_page, spawn_hud))
            .add_systems(
                Update,
                (NavAction::handle_clicks, open_connect_links)
                    .after(InteractionSystem)
                    .before(PageSystem::Scroll),
            )
            .add_systems(
                Update,
                (
                    PageScroll::track_viewport,
                    PageScroll::wheel,
                    PageScroll::ease,
                    PageScroll::follow_camera,
                )
                    .chain()
                    .in_set(PageSystem::Scroll),
            )
            .add_systems(
                Update,
                (
                    (ChapterTracker::track, status::on_chapter_entered).chain(),
                    (RevealQueue::watch, RevealQueue::release).chain(),
                    status::sync_clock_texts.run_if(resource_changed::<WallClock>),
                )
                    .in_set(PageSystem::Observe),
            );
        register_clickable::<NavAction>(app);
        register_clickable::<PageLink>(app);
    }
}

/// Backdrop sprite of one page section.
#[derive(Component, Clone, Copy, Debug)]
pub struct SectionBackdrop {
    pub section: SectionId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLink {
    Open,
}

#[derive(Component, Clone, Debug)]
pub struct LinkTarget {
    pub url: String,
}

const CONTENT_LEFT: f32 = 80.0;
const HUD_Z: f32 = 900.0;
const EXPERTISE_CARD: Vec2 = Vec2::new(230.0, 130.0);
const EXPERTISE_CARD_GAP: f32 = 20.0;

fn place_desktop(layout: Res<PageLayout>, mut area: ResMut<DesktopArea>) {
    *area = layout.desktop_area();
}

fn section_color(section: SectionId) -> Color {
    match section {
        SectionId::Cover | SectionId::Connect => PAGE_BACKGROUND,
        SectionId::Profile => PROFILE_BACKGROUND,
        SectionId::Expertise => INK,
    }
}

fn heading(section: SectionId) -> String {
    format!("{} // {}", section.chapter_number(), section.anchor().to_uppercase())
}

fn spawn_page(mut commands: Commands, layout: Res<PageLayout>, content: Res<PortfolioContent>) {
    for section in SectionId::ALL {
        let span = layout.span(section);
        let origin = layout.in_section(section, Vec2::ZERO);
        let heading_color = if section == SectionId::Expertise {
            TEXT_LIGHT
        } else {
            ACCENT
        };
        commands
            .spawn((
                Name::new(format!("section:{section}")),
                SectionBackdrop { section },
                Sprite::from_color(section_color(section), Vec2::new(layout.width, span.height)),
                Anchor::TOP_LEFT,
                Transform::from_xyz(origin.x, origin.y, 0.0),
            ))
            .with_children(|parent| {
                if section != SectionId::Cover {
                    parent.spawn(label(
                        heading(section),
                        14.0,
                        heading_color,
                        Vec2::new(CONTENT_LEFT, 40.0),
                        1.0,
                    ));
                }
            });
    }

    let cover = layout.in_section(SectionId::Cover, Vec2::ZERO);
    commands
        .spawn((
            Name::new("cover"),
            Transform::from_xyz(cover.x, cover.y, 1.0),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn(label(
                content.cover.title.clone(),
                64.0,
                INK,
                Vec2::new(CONTENT_LEFT, 220.0),
                0.0,
            ));
            parent.spawn(label(
                content.cover.subtitle.clone(),
                24.0,
                ACCENT,
                Vec2::new(CONTENT_LEFT, 310.0),
                0.0,
            ));
            parent.spawn(label(
                content.cover.tagline.clone(),
                14.0,
                LINK_IDLE,
                Vec2::new(CONTENT_LEFT, 380.0),
                0.0,
            ));
        });

    let expertise = layout.span(SectionId::Expertise);
    let row_width = content.expertise.len() as f32 * (EXPERTISE_CARD.x + EXPERTISE_CARD_GAP)
        - EXPERTISE_CARD_GAP;
    let row_left = ((layout.width - row_width) * 0.5).max(0.0);
    for (order, item) in content.expertise.iter().enumerate() {
        let left = row_left + order as f32 * (EXPERTISE_CARD.x + EXPERTISE_CARD_GAP);
        let at = layout.in_section(
            SectionId::Expertise,
            Vec2::new(left, PageLayout::EXPERTISE_ITEMS_TOP),
        );
        commands
            .spawn((
                Name::new(format!("expertise:{order}")),
                Reveal {
                    span: PageSpan::new(
                        expertise.top + PageLayout::EXPERTISE_ITEMS_TOP,
                        EXPERTISE_CARD.y,
                    ),
                    order,
                },
                Sprite::from_color(WINDOW_FACE, EXPERTISE_CARD),
                Anchor::TOP_LEFT,
                Transform::from_xyz(at.x, at.y, 2.0),
                Visibility::Hidden,
            ))
            .with_children(|parent| {
                parent.spawn(panel(
                    WINDOW_SHADOW,
                    Rect::new(0.0, 0.0, EXPERTISE_CARD.x, 4.0),
                    0.1,
                ));
                parent.spawn(label(item.title.clone(), 16.0, TEXT_DARK, Vec2::new(12.0, 20.0), 0.1));
                parent.spawn(label(
                    item.summary.clone(),
                    12.0,
                    WINDOW_SHADOW,
                    Vec2::new(12.0, 56.0),
                    0.1,
                ));
            });
    }

    let connect = layout.span(SectionId::Connect);
    for (order, link) in content.connect.iter().enumerate() {
        let top = 120.0 + order as f32 * 56.0;
        let at = layout.in_section(SectionId::Connect, Vec2::new(CONTENT_LEFT, top));
        commands.spawn((
            Name::new(format!("connect:{}", link.label)),
            Reveal {
                span: PageSpan::new(connect.top + top, 32.0),
                order,
            },
            LinkTarget {
                url: link.url.clone(),
            },
            Clickable::with_region(vec![PageLink::Open], Vec2::new(360.0, 32.0)),
            Text2d::new(format!("> {}", link.label)),
            TextFont {
                font_size: 22.0,
                ..default()
            },
            TextColor(ACCENT),
            Anchor::TOP_LEFT,
            Transform::from_xyz(at.x, at.y, 2.0),
            Visibility::Hidden,
        ));
    }

    let footer = layout.in_section(SectionId::Connect, Vec2::new(CONTENT_LEFT, connect.height - 60.0));
    commands.spawn((
        FooterYearText {
            suffix: content.footer.clone(),
        },
        label(String::new(), 12.0, LINK_IDLE, Vec2::new(footer.x, -footer.y), 2.0),
    ));
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        ScreenAnchor {
            fraction: Vec2::new(-0.5, 0.5),
            offset: Vec2::ZERO,
        },
        Sprite::from_color(PAGE_BACKGROUND, Vec2::new(4096.0, 44.0)),
        Anchor::TOP_LEFT,
        Transform::from_xyz(0.0, 0.0, HUD_Z),
    ));
    for (index, section) in SectionId::ALL.into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("toc:{section}")),
            TocLink { section },
            Clickable::with_region(vec![NavAction::for_section(section)], Vec2::new(140.0, 22.0)),
            ScreenAnchor {
                fraction: Vec2::new(-0.5, 0.5),
                offset: Vec2::new(24.0 + index as f32 * 150.0, -12.0),
            },
            Text2d::new(section.toc_label()),
            TextFont {
                font_size: 15.0,
                ..default()
            },
            TextColor(LINK_IDLE),
            Anchor::TOP_LEFT,
            Transform::from_xyz(0.0, 0.0, HUD_Z + 1.0),
        ));
    }

    commands.spawn((
        ScreenAnchor {
            fraction: Vec2::new(-0.5, -0.5),
            offset: Vec2::new(0.0, 26.0),
        },
        Sprite::from_color(WINDOW_FACE, Vec2::new(4096.0, 26.0)),
        Anchor::TOP_LEFT,
        Transform::from_xyz(0.0, 0.0, HUD_Z),
    ));
    commands.spawn((
        StatusSectionText,
        ScreenAnchor {
            fraction: Vec2::new(-0.5, -0.5),
            offset: Vec2::new(16.0, 21.0),
        },
        label(status::section_label(SectionId::Cover), 12.0, TEXT_DARK, Vec2::ZERO, HUD_Z + 1.0),
    ));
    commands.spawn((
        StatusClockText,
        ScreenAnchor {
            fraction: Vec2::new(0.5, -0.5),
            offset: Vec2::new(-64.0, 21.0),
        },
        label(String::new(), 12.0, TEXT_DARK, Vec2::ZERO, HUD_Z + 1.0),
    ));
}

fn open_connect_links(
    links: Query<(&Clickable<PageLink>, &LinkTarget)>,
    mut launches: MessageWriter<LaunchRequested>,
) {
    for (clickable, target) in links.iter() {
        if clickable.triggered {
            launches.write(LaunchRequested {
                url: target.url.clone(),
            });
        }
    }
}
