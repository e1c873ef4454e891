use std::time::Duration;

use bevy::{prelude::*, sprite::Anchor};

pub mod defrag;

use defrag::Defragmenter;

use crate::{
    scenes::page::{
        observer::{IntersectionObserver, ObserverOptions},
        scroll::PageScroll,
        sections::{PageLayout, SectionId},
        status::TaskbarClockText,
        PageSystem,
    },
    systems::{
        colors::{
            DESKTOP_TEAL, GRID_LINE, TEXT_DARK, TEXT_LIGHT, WINDOW_FACE, WINDOW_SHADOW,
        },
        interaction::{register_clickable, Clickable, InteractionSystem},
        ui::{
            label, panel,
            window::{ScheduledOpens, TemplateRegistry, WindowManager, WindowTemplateId},
        },
    },
};

pub struct DesktopScenePlugin;
impl Plugin for DesktopScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutoOpen>()
            .init_resource::<GridOverlay>()
            .init_resource::<Defragmenter>()
            .add_systems(
                Startup,
                (spawn_desktop, GridOverlay::spawn, Defragmenter::spawn),
            )
            .add_systems(
                Update,
                DesktopIconAction::handle_clicks.after(InteractionSystem),
            )
            .add_systems(
                Update,
                (
                    AutoOpen::watch,
                    GridOverlay::watch,
                    (
                        Defragmenter::watch,
                        Defragmenter::tick,
                        Defragmenter::sync_visuals.run_if(resource_changed::<Defragmenter>),
                    )
                        .chain(),
                )
                    .in_set(PageSystem::Observe),
            );
        register_clickable::<DesktopIconAction>(app);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesktopIconAction {
    /// Opens the window registered under this key.
    Open(&'static str),
}

impl DesktopIconAction {
    pub fn apply(self, registry: &TemplateRegistry, manager: &mut WindowManager) {
        match self {
            DesktopIconAction::Open(key) => match manager.open_key(registry, key) {
                Ok(id) => debug!("desktop icon `{key}` opened {id:?}"),
                Err(error) => warn!("desktop icon ignored: {error}"),
            },
        }
    }

    fn handle_clicks(
        icons: Query<&Clickable<DesktopIconAction>>,
        registry: Res<TemplateRegistry>,
        mut manager: ResMut<WindowManager>,
    ) {
        for clickable in icons.iter().filter(|clickable| clickable.triggered) {
            for action in &clickable.actions {
                action.apply(&registry, &mut manager);
            }
        }
    }
}

/// Icons down the left edge of the desktop, top to bottom.
const DESKTOP_ICONS: [(&str, &str); 5] = [
    ("computer", "My Computer"),
    ("network", "Network"),
    ("documents", "My Documents"),
    ("recycle", "Recycle Bin"),
    ("connect-hub", "Connect"),
];
const ICON_REGION: Vec2 = Vec2::new(84.0, 70.0);
const ICON_SIZE: f32 = 32.0;
const TASKBAR_HEIGHT: f32 = 28.0;
const DESKTOP_Z: f32 = 5.0;
const TASKBAR_Z: f32 = 15.0;

#[derive(Component)]
pub struct DesktopBackground;

fn spawn_desktop(mut commands: Commands, layout: Res<PageLayout>) {
    let area = layout.desktop_area();
    commands
        .spawn((
            Name::new("desktop"),
            DesktopBackground,
            Sprite::from_color(DESKTOP_TEAL, area.size),
            Anchor::TOP_LEFT,
            Transform::from_xyz(area.origin.x, area.origin.y, DESKTOP_Z),
        ))
        .with_children(|parent| {
            for (index, (key, title)) in DESKTOP_ICONS.into_iter().enumerate() {
                let top = 16.0 + index as f32 * (ICON_REGION.y + 8.0);
                parent
                    .spawn((
                        Name::new(format!("icon:{key}")),
                        Clickable::with_region(vec![DesktopIconAction::Open(key)], ICON_REGION),
                        Transform::from_xyz(16.0, -top, 1.0),
                    ))
                    .with_children(|icon| {
                        let left = (ICON_REGION.x - ICON_SIZE) * 0.5;
                        icon.spawn(panel(
                            WINDOW_SHADOW,
                            Rect::new(left + 2.0, 2.0, left + ICON_SIZE + 2.0, ICON_SIZE + 2.0),
                            0.0,
                        ));
                        icon.spawn(panel(
                            WINDOW_FACE,
                            Rect::new(left, 0.0, left + ICON_SIZE, ICON_SIZE),
                            0.1,
                        ));
                        icon.spawn(label(title, 11.0, TEXT_LIGHT, Vec2::new(4.0, ICON_SIZE + 8.0), 0.1));
                    });
            }

            let taskbar_top = area.size.y - TASKBAR_HEIGHT;
            parent
                .spawn((
                    Name::new("taskbar"),
                    panel(
                        WINDOW_FACE,
                        Rect::new(0.0, taskbar_top, area.size.x, area.size.y),
                        TASKBAR_Z,
                    ),
                ))
                .with_children(|taskbar| {
                    taskbar.spawn(panel(WINDOW_SHADOW, Rect::new(4.0, 4.0, 64.0, 24.0), 0.1));
                    taskbar.spawn(label("Start", 12.0, TEXT_DARK, Vec2::new(14.0, 8.0), 0.2));
                    taskbar.spawn(panel(
                        WINDOW_SHADOW,
                        Rect::new(area.size.x - 84.0, 4.0, area.size.x - 4.0, 24.0),
                        0.1,
                    ));
                    taskbar.spawn((
                        TaskbarClockText,
                        label(
                            String::new(),
                            12.0,
                            TEXT_LIGHT,
                            Vec2::new(area.size.x - 76.0, 8.0),
                            0.2,
                        ),
                    ));
                });
        });
}

/// Opens the primary window once the desktop is mostly in view.
#[derive(Resource)]
pub struct AutoOpen {
    observer: IntersectionObserver<SectionId>,
}

impl Default for AutoOpen {
    fn default() -> Self {
        Self {
            observer: IntersectionObserver::new(Self::OPTIONS),
        }
    }
}

impl AutoOpen {
    pub const OPTIONS: ObserverOptions = ObserverOptions::threshold(0.3);
    pub const DELAY: Duration = Duration::from_millis(500);
    pub const PRIMARY: WindowTemplateId = WindowTemplateId::Computer;

    pub fn watch(
        scroll: Res<PageScroll>,
        layout: Res<PageLayout>,
        manager: Res<WindowManager>,
        mut auto_open: ResMut<AutoOpen>,
        mut scheduled: ResMut<ScheduledOpens>,
    ) {
        let Some(entry) = auto_open.observer.observe(
            SectionId::Expertise,
            layout.span(SectionId::Expertise),
            scroll.viewport(),
        ) else {
            return;
        };
        if !entry.intersecting
            || manager.is_template_open(Self::PRIMARY)
            || scheduled.is_pending(Self::PRIMARY)
        {
            return;
        }
        debug!("desktop in view, opening {} shortly", Self::PRIMARY.key());
        scheduled.schedule(Self::PRIMARY, Self::DELAY);
    }
}

/// Faint grid drawn over the desktop section while it is on screen.
#[derive(Resource)]
pub struct GridOverlay {
    observer: IntersectionObserver<SectionId>,
}

impl Default for GridOverlay {
    fn default() -> Self {
        Self {
            observer: IntersectionObserver::new(Self::OPTIONS),
        }
    }
}

#[derive(Component)]
pub struct GridOverlayRoot;

impl GridOverlay {
    pub const OPTIONS: ObserverOptions = ObserverOptions::threshold(0.1);
    const SPACING: f32 = 40.0;

    fn spawn(mut commands: Commands, layout: Res<PageLayout>) {
        let span = layout.span(SectionId::Expertise);
        let origin = layout.in_section(SectionId::Expertise, Vec2::ZERO);
        commands
            .spawn((
                Name::new("grid_overlay"),
                GridOverlayRoot,
                Transform::from_xyz(origin.x, origin.y, 0.5),
                Visibility::Hidden,
            ))
            .with_children(|parent| {
                let mut x = Self::SPACING;
                while x < layout.width {
                    parent.spawn(panel(GRID_LINE, Rect::new(x, 0.0, x + 1.0, span.height), 0.0));
                    x += Self::SPACING;
                }
                let mut y = Self::SPACING;
                while y < span.height {
                    parent.spawn(panel(GRID_LINE, Rect::new(0.0, y, layout.width, y + 1.0), 0.0));
                    y += Self::SPACING;
                }
            });
    }

    pub fn watch(
        scroll: Res<PageScroll>,
        layout: Res<PageLayout>,
        mut overlay: ResMut<GridOverlay>,
        mut roots: Query<&mut Visibility, With<GridOverlayRoot>>,
    ) {
        let Some(entry) = overlay.observer.observe(
            SectionId::Expertise,
            layout.span(SectionId::Expertise),
            scroll.viewport(),
        ) else {
            return;
        };
        for mut visibility in roots.iter_mut() {
            *visibility = if entry.intersecting {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
    }
}
