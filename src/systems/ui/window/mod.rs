use std::{collections::HashMap, time::Duration};

// Windows are plain views over `WindowManager`; all lifecycle, focus and
// drag state lives in the manager and is mirrored here once per frame.

use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
    sprite::Anchor,
};

use crate::{
    startup::cursor::{CursorMode, CustomCursor},
    systems::{
        colors::{
            DISABLED_TEXT, FIELD_BACKGROUND, PROGRESS_FILL, TEXT_DARK, TEXT_LIGHT,
            TITLE_ACTIVE, TITLE_INACTIVE, WINDOW_FACE, WINDOW_SHADOW,
        },
        interaction::PointerClaim,
        time::{Step, StepSchedule},
        ui::{label, panel},
    },
};

pub mod dial_up;
pub mod layout;
pub mod manager;
pub mod templates;
#[cfg(test)]
mod tests;

pub use self::manager::{WindowId, WindowInstance, WindowManager};
pub use self::templates::{TemplateRegistry, WindowTemplateId};

use self::{
    dial_up::{
        DialField, DialFieldFocused, DialFieldText, DialProgressFill, DialProgressTrack,
        DialRequested, DialStatusText, DialUpSession,
    },
    layout::WindowHit,
    templates::{FooterAction, LaunchAction, WindowBody, WindowTemplate},
};

/* ─────────────────────────  PLUGIN  ───────────────────────── */

pub struct DesktopWindowPlugin;
impl Plugin for DesktopWindowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WindowManager>()
            .init_resource::<TemplateRegistry>()
            .init_resource::<ScheduledOpens>()
            .init_resource::<DesktopArea>()
            .init_resource::<PointerClaim>()
            .add_message::<LaunchRequested>()
            .add_message::<DialRequested>()
            .add_message::<DialFieldFocused>()
            .configure_sets(
                Update,
                (
                    WindowSystem::Input,
                    WindowSystem::Resolve.after(WindowSystem::Input),
                    WindowSystem::Layout.after(WindowSystem::Resolve),
                ),
            )
            .add_systems(
                Update,
                WindowView::handle_pointer.in_set(WindowSystem::Input),
            )
            .add_systems(
                Update,
                (
                    ScheduledOpens::fire,
                    DialUpSession::handle_requests,
                    DialUpSession::type_into_active,
                    DialUpSession::tick,
                    log_launch_requests,
                )
                    .chain()
                    .in_set(WindowSystem::Resolve),
            )
            .add_systems(
                Update,
                (WindowView::sync, DialUpSession::sync_visuals)
                    .chain()
                    .in_set(WindowSystem::Layout),
            );
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum WindowSystem {
    Input,
    Resolve,
    Layout,
}

/// Windows stack inside `[WINDOW_BASE_Z, WINDOW_BASE_Z + WINDOW_Z_SPAN)`,
/// above the desktop taskbar and below the page HUD.
pub const WINDOW_BASE_Z: f32 = 30.0;
pub const WINDOW_Z_SPAN: f32 = 800.0;
const WINDOW_Z_STEP: f32 = 10.0;

/// Depth of the window at `rank` (0 is bottom) among `count` open windows.
pub fn window_z(rank: usize, count: usize) -> f32 {
    let step = (WINDOW_Z_SPAN / count.max(1) as f32).min(WINDOW_Z_STEP);
    WINDOW_BASE_Z + rank as f32 * step
}

/* ─────────────────────────  DATA  ───────────────────────── */

/// World-space placement of the desktop the windows live on.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct DesktopArea {
    /// World position of the desktop's top-left corner.
    pub origin: Vec2,
    pub size: Vec2,
}

impl Default for DesktopArea {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            size: Vec2::new(1000.0, 640.0),
        }
    }
}

impl DesktopArea {
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x - self.origin.x, self.origin.y - world.y)
    }

    pub fn to_world(&self, local: Vec2) -> Vec2 {
        Vec2::new(self.origin.x + local.x, self.origin.y - local.y)
    }
}

/// Opens queued after a fixed delay. Entries cannot be cancelled.
#[derive(Resource, Default)]
pub struct ScheduledOpens {
    pending: Vec<(WindowTemplateId, StepSchedule)>,
}

impl ScheduledOpens {
    pub fn schedule(&mut self, template: WindowTemplateId, delay: Duration) {
        self.pending.push((template, StepSchedule::once(delay)));
    }

    pub fn is_pending(&self, template: WindowTemplateId) -> bool {
        self.pending.iter().any(|(pending, _)| *pending == template)
    }

    /// Returns the templates whose delay elapsed, in scheduling order.
    pub fn advance(&mut self, delta: Duration) -> Vec<WindowTemplateId> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(template, schedule)| {
            let finished = schedule.advance(delta, || Step::Finished) == Step::Finished;
            if finished {
                due.push(*template);
            }
            !finished
        });
        due
    }

    pub fn fire(
        time: Res<Time>,
        registry: Res<TemplateRegistry>,
        mut scheduled: ResMut<ScheduledOpens>,
        mut manager: ResMut<WindowManager>,
    ) {
        if scheduled.pending.is_empty() {
            return;
        }
        for template in scheduled.advance(time.delta()) {
            manager.open(&registry, template);
        }
    }
}

#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct LaunchRequested {
    pub url: String,
}

fn log_launch_requests(mut launches: MessageReader<LaunchRequested>) {
    for launch in launches.read() {
        info!("launch requested for {}; handing off is left to the host", launch.url);
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
#[require(Transform, Visibility)]
#[component(on_insert = WindowView::on_insert)]
pub struct WindowView {
    pub id: WindowId,
    pub template: WindowTemplateId,
}

#[derive(Component)]
pub struct WindowTitleBar;

#[derive(Component, Clone, Copy, Debug)]
pub struct WindowTabButton {
    pub index: usize,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct WindowPane {
    pub index: usize,
}

/// Remote icon reference; nothing is downloaded, the frame shows a
/// placeholder square.
#[derive(Component, Clone, Debug)]
pub struct WindowIcon {
    pub url: String,
}

impl WindowView {
    fn handle_pointer(
        mouse_input: Res<ButtonInput<MouseButton>>,
        mut cursor: ResMut<CustomCursor>,
        area: Res<DesktopArea>,
        registry: Res<TemplateRegistry>,
        mut manager: ResMut<WindowManager>,
        mut claim: ResMut<PointerClaim>,
        mut launches: MessageWriter<LaunchRequested>,
        mut dials: MessageWriter<DialRequested>,
        mut field_focus: MessageWriter<DialFieldFocused>,
    ) {
        claim.release();

        if !mouse_input.pressed(MouseButton::Left) && manager.is_dragging() {
            manager.end_drag();
        }

        let Some(cursor_position) = cursor.position else {
            return;
        };
        let local = area.to_local(cursor_position);

        if manager.is_dragging() {
            manager.drag_to(local);
            cursor.current_mode = CursorMode::Dragging;
            claim.claim();
            return;
        }

        if !mouse_input.just_pressed(MouseButton::Left) {
            return;
        }
        let Some((id, hit)) = layout::hit_test(&manager, &registry, local) else {
            return;
        };
        claim.claim();

        let Some(template_id) = manager.get(id).map(WindowInstance::template) else {
            return;
        };
        let template = registry.get(template_id);

        match hit {
            WindowHit::Close => {
                manager.close(id);
            }
            WindowHit::TitleBar => {
                manager.begin_drag(id, local);
            }
            WindowHit::Tab(index) => {
                manager.focus(id);
                if let Some(pane) = template.tab_panes().get(index) {
                    manager.select_tab(id, pane.tab);
                }
            }
            WindowHit::Footer(index) => {
                manager.focus(id);
                match template.footer.get(index).map(|button| button.action) {
                    Some(FooterAction::Close) => {
                        manager.close(id);
                    }
                    Some(FooterAction::Dial) => {
                        dials.write(DialRequested { window: id });
                    }
                    Some(FooterAction::Inert | FooterAction::Disabled) | None => {}
                }
            }
            WindowHit::Launcher(index) => {
                manager.focus(id);
                let WindowBody::Launchers { entries, .. } = template.body else {
                    return;
                };
                match entries.get(index).map(|launcher| launcher.action) {
                    Some(LaunchAction::OpenUrl(url)) => {
                        launches.write(LaunchRequested {
                            url: url.to_string(),
                        });
                    }
                    Some(LaunchAction::OpenWindow(target)) => {
                        manager.open(&registry, target);
                    }
                    None => {}
                }
            }
            WindowHit::Field(field) => {
                manager.focus(id);
                field_focus.write(DialFieldFocused { window: id, field });
            }
            WindowHit::Body => {
                manager.focus(id);
            }
        }
    }

    fn sync(
        mut commands: Commands,
        manager: Res<WindowManager>,
        area: Res<DesktopArea>,
        mut views: Query<(Entity, &WindowView, &mut Transform)>,
        mut title_bars: Query<(&ChildOf, &mut Sprite), With<WindowTitleBar>>,
        mut tab_buttons: Query<(&ChildOf, &WindowTabButton, &mut Sprite), Without<WindowTitleBar>>,
        mut panes: Query<(&ChildOf, &WindowPane, &mut Visibility)>,
    ) {
        let stacked = manager.stacked();
        let mut spawned: Vec<WindowId> = Vec::with_capacity(stacked.len());
        let mut states: HashMap<Entity, (bool, Option<usize>)> = HashMap::new();

        for (entity, view, mut transform) in views.iter_mut() {
            let Some(rank) = stacked.iter().position(|instance| instance.id() == view.id) else {
                commands.entity(entity).despawn();
                continue;
            };
            let instance = stacked[rank];
            let world = area.to_world(instance.position());
            let z = window_z(rank, stacked.len());
            if transform.translation != world.extend(z) {
                transform.translation = world.extend(z);
            }
            spawned.push(view.id);
            states.insert(
                entity,
                (
                    instance.is_active(),
                    instance.tabs().and_then(|tabs| tabs.active_index()),
                ),
            );
        }

        for (rank, instance) in stacked.iter().enumerate() {
            if spawned.contains(&instance.id()) {
                continue;
            }
            let world = area.to_world(instance.position());
            commands.spawn((
                Name::new(format!("window:{}", instance.template())),
                WindowView {
                    id: instance.id(),
                    template: instance.template(),
                },
                Transform::from_translation(
                    world.extend(window_z(rank, stacked.len())),
                ),
            ));
        }

        for (child_of, mut sprite) in title_bars.iter_mut() {
            if let Some((active, _)) = states.get(&child_of.parent()) {
                let color = if *active { TITLE_ACTIVE } else { TITLE_INACTIVE };
                if sprite.color != color {
                    sprite.color = color;
                }
            }
        }
        for (child_of, tab, mut sprite) in tab_buttons.iter_mut() {
            if let Some((_, active_tab)) = states.get(&child_of.parent()) {
                let color = if *active_tab == Some(tab.index) {
                    FIELD_BACKGROUND
                } else {
                    WINDOW_FACE
                };
                if sprite.color != color {
                    sprite.color = color;
                }
            }
        }
        for (child_of, pane, mut visibility) in panes.iter_mut() {
            if let Some((_, active_tab)) = states.get(&child_of.parent()) {
                let next = if *active_tab == Some(pane.index) {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                };
                if *visibility != next {
                    *visibility = next;
                }
            }
        }
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(view) = world.entity(entity).get::<WindowView>().copied() else {
            return;
        };
        let Some(template) = world
            .get_resource::<TemplateRegistry>()
            .map(|registry| *registry.get(view.template))
        else {
            warn!("window {:?} spawned before the template registry", view.id);
            return;
        };
        let size = layout::frame_size(&template);

        let mut commands = world.commands();
        commands
            .entity(entity)
            .insert((Sprite::from_color(WINDOW_FACE, size), Anchor::TOP_LEFT));
        if template.body == WindowBody::DialUp {
            commands.entity(entity).insert(DialUpSession::default());
        }
        commands.entity(entity).with_children(|parent| {
            Self::spawn_chrome(parent, &template, size);
            Self::spawn_body(parent, &template, size);
            Self::spawn_footer(parent, &template, size);
        });
    }

    fn spawn_chrome(parent: &mut ChildSpawnerCommands, template: &WindowTemplate, size: Vec2) {
        parent.spawn(panel(
            WINDOW_SHADOW,
            Rect::new(2.0, 2.0, size.x + 2.0, size.y + 2.0),
            -0.5,
        ));
        parent.spawn((WindowTitleBar, panel(TITLE_ACTIVE, layout::title_bar_rect(size), 0.1)));
        parent.spawn((
            WindowIcon {
                url: template.icon_url(),
            },
            panel(
                WINDOW_FACE,
                Rect::new(
                    layout::BORDER + 3.0,
                    layout::BORDER + 2.0,
                    layout::BORDER + 19.0,
                    layout::BORDER + 18.0,
                ),
                0.2,
            ),
        ));
        parent.spawn(label(
            template.title,
            13.0,
            TEXT_LIGHT,
            Vec2::new(layout::BORDER + 24.0, layout::BORDER + 3.0),
            0.2,
        ));

        let close = layout::close_button_rect(size);
        parent.spawn(panel(WINDOW_FACE, close, 0.2));
        parent.spawn(label(
            "x",
            12.0,
            TEXT_DARK,
            close.min + Vec2::new(4.0, 0.0),
            0.3,
        ));
    }

    fn spawn_body(parent: &mut ChildSpawnerCommands, template: &WindowTemplate, size: Vec2) {
        let origin = layout::content_origin(template);
        match template.body {
            WindowBody::Tabbed(panes) => {
                for (index, pane) in panes.iter().enumerate() {
                    let tab = layout::tab_rect(index);
                    parent.spawn((WindowTabButton { index }, panel(WINDOW_FACE, tab, 0.1)));
                    parent.spawn(label(
                        pane.label,
                        12.0,
                        TEXT_DARK,
                        tab.min + Vec2::new(8.0, 4.0),
                        0.2,
                    ));
                    parent
                        .spawn((
                            Name::new(pane.pane),
                            WindowPane { index },
                            Transform::from_xyz(origin.x, -origin.y, 0.2),
                            Visibility::Hidden,
                        ))
                        .with_children(|pane_parent| {
                            for (line_index, line) in pane.lines.iter().enumerate() {
                                pane_parent.spawn(label(
                                    *line,
                                    12.0,
                                    TEXT_DARK,
                                    Vec2::new(0.0, line_index as f32 * layout::LINE_HEIGHT),
                                    0.0,
                                ));
                            }
                        });
                }
            }
            WindowBody::Listing { heading, entries } => {
                parent.spawn(label(heading, 13.0, TEXT_DARK, origin, 0.2));
                for (index, entry) in entries.iter().enumerate() {
                    let top = origin.y + (1 + 2 * index) as f32 * layout::LINE_HEIGHT;
                    parent.spawn(label(
                        entry.label,
                        12.0,
                        TEXT_DARK,
                        Vec2::new(origin.x + 10.0, top),
                        0.2,
                    ));
                    if let Some(caption) = entry.caption {
                        parent.spawn(label(
                            caption,
                            11.0,
                            DISABLED_TEXT,
                            Vec2::new(origin.x + 10.0, top + layout::LINE_HEIGHT * 0.9),
                            0.2,
                        ));
                    }
                }
            }
            WindowBody::Files(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    let cell = layout::launcher_rect(index);
                    parent.spawn(panel(
                        WINDOW_SHADOW,
                        Rect::from_center_size(cell.center() - Vec2::Y * 12.0, Vec2::splat(32.0)),
                        0.1,
                    ));
                    parent.spawn(label(
                        entry.label,
                        11.0,
                        TEXT_DARK,
                        Vec2::new(cell.min.x, cell.max.y - 14.0),
                        0.2,
                    ));
                }
            }
            WindowBody::Launchers { entries, hint } => {
                for (index, launcher) in entries.iter().enumerate() {
                    let cell = layout::launcher_rect(index);
                    parent.spawn(panel(
                        WINDOW_SHADOW,
                        Rect::from_center_size(cell.center() - Vec2::Y * 12.0, Vec2::splat(32.0)),
                        0.1,
                    ));
                    parent.spawn(label(
                        launcher.label,
                        11.0,
                        TEXT_DARK,
                        Vec2::new(cell.min.x + 20.0, cell.max.y - 14.0),
                        0.2,
                    ));
                }
                parent.spawn(label(
                    hint,
                    11.0,
                    DISABLED_TEXT,
                    Vec2::new(origin.x, size.y - layout::CONTENT_PADDING - 14.0),
                    0.2,
                ));
            }
            WindowBody::DialUp => Self::spawn_dial_up(parent, size),
        }
    }

    fn spawn_dial_up(parent: &mut ChildSpawnerCommands, size: Vec2) {
        parent.spawn(panel(
            WINDOW_SHADOW,
            Rect::new(20.0, 40.0, 68.0, 88.0),
            0.1,
        ));
        parent.spawn(label(
            "User name and password are required to log on.",
            12.0,
            TEXT_DARK,
            Vec2::new(88.0, layout::TITLE_BAR_HEIGHT + 16.0),
            0.2,
        ));
        for field in DialField::ALL {
            let rect = layout::field_rect(size.x, field);
            parent.spawn(label(
                field.label(),
                12.0,
                TEXT_DARK,
                Vec2::new(88.0, rect.min.y + 4.0),
                0.2,
            ));
            parent.spawn(panel(FIELD_BACKGROUND, rect, 0.1));
            parent.spawn((
                DialFieldText { field },
                label(
                    field.placeholder(),
                    12.0,
                    DISABLED_TEXT,
                    rect.min + Vec2::new(4.0, 4.0),
                    0.2,
                ),
            ));
        }

        let status = layout::dial_status_rect(size.x);
        parent.spawn((
            DialStatusText,
            label(DialUpSession::READY_TEXT, 12.0, TEXT_DARK, status.min, 0.2),
        ));
        let track = Rect::new(status.min.x, status.min.y + 22.0, status.max.x, status.max.y);
        parent.spawn((
            DialProgressTrack,
            panel(FIELD_BACKGROUND, track, 0.1),
            Visibility::Hidden,
        ));
        parent.spawn((
            DialProgressTrack,
            DialProgressFill {
                full_width: track.width() - 4.0,
            },
            Sprite::from_color(PROGRESS_FILL, Vec2::new(0.0, 14.0)),
            Anchor::TOP_LEFT,
            Transform::from_xyz(track.min.x + 2.0, -(track.min.y + 2.0), 0.2),
            Visibility::Hidden,
        ));
    }

    fn spawn_footer(parent: &mut ChildSpawnerCommands, template: &WindowTemplate, size: Vec2) {
        let count = template.footer.len();
        for (index, button) in template.footer.iter().enumerate() {
            let rect = layout::footer_button_rect(size, index, count);
            let color = if button.action == FooterAction::Disabled {
                DISABLED_TEXT
            } else {
                TEXT_DARK
            };
            parent.spawn(panel(WINDOW_FACE, rect, 0.1));
            parent.spawn(panel(WINDOW_SHADOW, Rect::new(rect.min.x, rect.max.y, rect.max.x, rect.max.y + 1.0), 0.1));
            parent.spawn(label(
                button.label,
                12.0,
                color,
                rect.min + Vec2::new(10.0, 4.0),
                0.2,
            ));
        }
    }
}
