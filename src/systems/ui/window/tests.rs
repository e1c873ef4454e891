use std::time::Duration;

use bevy::{input::keyboard::KeyboardInput, prelude::*, time::TimeUpdateStrategy};

use crate::startup::cursor::CustomCursor;

use super::{
    dial_up::{DialField, DialUpSession},
    layout::{self, frame_size},
    window_z, DesktopWindowPlugin, WINDOW_BASE_Z, WINDOW_Z_SPAN, ScheduledOpens, TemplateRegistry, WindowId, WindowInstance,
    WindowManager, WindowTemplateId, WindowView,
};

fn make_window_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.add_message::<KeyboardInput>();
    app.init_resource::<ButtonInput<MouseButton>>();
    app.init_resource::<CustomCursor>();
    app.add_plugins(DesktopWindowPlugin);
    app
}

fn open(app: &mut App, template: WindowTemplateId) -> WindowId {
    let registry = app.world().resource::<TemplateRegistry>().clone();
    app.world_mut()
        .resource_mut::<WindowManager>()
        .open(&registry, template)
}

fn view_count(app: &mut App) -> usize {
    app.world_mut()
        .query::<&WindowView>()
        .iter(app.world())
        .count()
}

/// Presses at a desktop-local point. The default desktop sits at the world
/// origin, so local `(x, y)` is world `(x, -y)`.
fn press_at(app: &mut App, local: Vec2) {
    app.world_mut().resource_mut::<CustomCursor>().position = Some(Vec2::new(local.x, -local.y));
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .press(MouseButton::Left);
    app.update();
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .clear();
}

fn release(app: &mut App) {
    let mut mouse = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
    mouse.release(MouseButton::Left);
    app.update();
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .clear();
}

fn instance(app: &App, id: WindowId) -> Option<WindowInstance> {
    app.world().resource::<WindowManager>().get(id).cloned()
}

#[test]
fn computer_then_network_then_focus_computer() {
    let registry = TemplateRegistry::default();
    let mut manager = WindowManager::default();

    let computer = manager.open(&registry, WindowTemplateId::Computer);
    let network = manager.open(&registry, WindowTemplateId::Network);

    let c = manager.get(computer).expect("computer open");
    let n = manager.get(network).expect("network open");
    assert_eq!((c.position(), c.order()), (Vec2::splat(50.0), 101));
    assert_eq!((n.position(), n.order()), (Vec2::splat(80.0), 102));
    assert!(!c.is_active());
    assert!(n.is_active());

    assert!(manager.focus(computer));
    let c = manager.get(computer).expect("computer open");
    let n = manager.get(network).expect("network open");
    assert_eq!(c.order(), 103);
    assert!(c.is_active());
    assert!(!n.is_active());
    assert_eq!(manager.topmost().map(WindowInstance::id), Some(computer));
}

#[test]
fn closing_network_leaves_computer_open_but_unfocused() {
    let registry = TemplateRegistry::default();
    let mut manager = WindowManager::default();

    let computer = manager.open(&registry, WindowTemplateId::Computer);
    let network = manager.open(&registry, WindowTemplateId::Network);
    assert!(manager.close(network).is_some());

    assert_eq!(manager.len(), 1);
    assert!(!manager.get(computer).expect("computer open").is_active());
    assert!(manager.active().is_none());

    assert!(manager.focus(computer));
    assert_eq!(manager.active().map(WindowInstance::id), Some(computer));
}

#[test]
fn window_depth_stays_in_its_band_however_many_are_open() {
    for count in [1, 2, 90, 500] {
        let depths: Vec<f32> = (0..count).map(|rank| window_z(rank, count)).collect();
        assert!(depths.windows(2).all(|pair| pair[1] > pair[0]));
        assert!(depths.iter().all(|z| *z >= WINDOW_BASE_Z && *z < WINDOW_BASE_Z + WINDOW_Z_SPAN));
    }
    assert_eq!(window_z(1, 2) - window_z(0, 2), 10.0);
}

#[test]
fn opening_computer_twice_yields_two_independent_instances() {
    let registry = TemplateRegistry::default();
    let mut manager = WindowManager::default();

    let first = manager.open(&registry, WindowTemplateId::Computer);
    let second = manager.open(&registry, WindowTemplateId::Computer);
    assert_ne!(first, second);
    assert_eq!(manager.len(), 2);

    assert!(manager.select_tab(first, "performance"));
    let first_tabs = manager.get(first).and_then(WindowInstance::tabs).expect("tabs");
    let second_tabs = manager.get(second).and_then(WindowInstance::tabs).expect("tabs");
    assert!(first_tabs.is_active("performance"));
    assert!(second_tabs.is_active("general"));
    assert_eq!(
        manager.get(second).map(WindowInstance::position),
        Some(Vec2::splat(80.0))
    );
}

#[test]
fn open_count_tracks_opens_minus_closes_and_orders_keep_rising() {
    let registry = TemplateRegistry::default();
    let mut manager = WindowManager::default();
    let mut issued = Vec::new();
    let mut opened = Vec::new();

    for template in WindowTemplateId::ALL {
        let id = manager.open(&registry, template);
        issued.push(manager.get(id).map(WindowInstance::order).unwrap_or_default());
        opened.push(id);
    }
    assert!(manager.close(opened[1]).is_some());
    assert!(manager.close(opened[1]).is_none());
    assert!(manager.close(opened[4]).is_some());
    assert_eq!(manager.len(), WindowTemplateId::ALL.len() - 2);

    for &id in &[opened[0], opened[3], opened[2]] {
        manager.focus(id);
        issued.push(manager.get(id).map(WindowInstance::order).unwrap_or_default());
        assert_eq!(
            manager
                .instances()
                .iter()
                .filter(|instance| instance.is_active())
                .count(),
            1
        );
    }
    assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn unknown_tab_leaves_the_active_pane_alone() {
    let registry = TemplateRegistry::default();
    let mut manager = WindowManager::default();
    let id = manager.open(&registry, WindowTemplateId::Computer);
    manager.select_tab(id, "hardware");

    assert!(!manager.select_tab(id, "drivers"));
    let tabs = manager.get(id).and_then(WindowInstance::tabs).expect("tabs");
    assert!(tabs.is_active("hardware"));
    assert_eq!(tabs.active().map(|entry| entry.pane), Some("hardware"));
}

#[test]
fn drag_moves_by_the_cumulative_delta_and_leaves_others_in_place() {
    let registry = TemplateRegistry::default();
    let mut manager = WindowManager::default();
    let dragged = manager.open(&registry, WindowTemplateId::Documents);
    let bystander = manager.open(&registry, WindowTemplateId::Recycle);

    assert!(manager.drag(dragged, Vec2::new(40.0, -15.0)));
    assert!(manager.drag(dragged, Vec2::new(-10.0, 5.0)));
    assert_eq!(
        manager.get(dragged).map(WindowInstance::position),
        Some(Vec2::new(80.0, 40.0))
    );
    assert_eq!(
        manager.get(bystander).map(WindowInstance::position),
        Some(Vec2::splat(80.0))
    );

    manager.close(bystander);
    assert!(!manager.drag(bystander, Vec2::ONE));
}

#[test]
fn scheduled_open_waits_for_its_delay() {
    let mut scheduled = ScheduledOpens::default();
    scheduled.schedule(WindowTemplateId::Computer, Duration::from_millis(500));
    assert!(scheduled.is_pending(WindowTemplateId::Computer));

    assert!(scheduled.advance(Duration::from_millis(300)).is_empty());
    assert_eq!(
        scheduled.advance(Duration::from_millis(200)),
        vec![WindowTemplateId::Computer]
    );
    assert!(!scheduled.is_pending(WindowTemplateId::Computer));
    assert!(scheduled.advance(Duration::from_secs(1)).is_empty());
}

#[test]
fn views_follow_the_manager_lifecycle() {
    let mut app = make_window_test_app();
    let network = open(&mut app, WindowTemplateId::Network);
    let recycle = open(&mut app, WindowTemplateId::Recycle);
    app.update();
    assert_eq!(view_count(&mut app), 2);

    let (network_z, recycle_z) = {
        let mut query = app.world_mut().query::<(&WindowView, &Transform)>();
        let mut network_z = 0.0;
        let mut recycle_z = 0.0;
        for (view, transform) in query.iter(app.world()) {
            if view.id == network {
                network_z = transform.translation.z;
            } else if view.id == recycle {
                recycle_z = transform.translation.z;
            }
        }
        (network_z, recycle_z)
    };
    assert!(recycle_z > network_z);

    app.world_mut().resource_mut::<WindowManager>().close(network);
    app.update();
    assert_eq!(view_count(&mut app), 1);
}

#[test]
fn clicking_the_close_button_removes_the_window() {
    let mut app = make_window_test_app();
    let id = open(&mut app, WindowTemplateId::Recycle);
    app.update();

    let size = frame_size(app.world().resource::<TemplateRegistry>().get(WindowTemplateId::Recycle));
    let position = instance(&app, id).map(|w| w.position()).unwrap_or_default();
    press_at(&mut app, position + layout::close_button_rect(size).center());

    assert!(instance(&app, id).is_none());
    app.update();
    assert_eq!(view_count(&mut app), 0);
}

#[test]
fn pointer_drag_on_the_title_bar_moves_and_focuses_the_window() {
    let mut app = make_window_test_app();
    let below = open(&mut app, WindowTemplateId::Network);
    let above = open(&mut app, WindowTemplateId::Recycle);
    app.update();

    // Network's title bar, clear of the recycle bin window stacked on top.
    let grab = Vec2::new(60.0, 60.0);
    press_at(&mut app, grab);
    assert_eq!(
        app.world().resource::<WindowManager>().active().map(WindowInstance::id),
        Some(below)
    );

    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .press(MouseButton::Left);
    app.world_mut().resource_mut::<CustomCursor>().position =
        Some(Vec2::new(grab.x + 100.0, -(grab.y + 20.0)));
    app.update();
    release(&mut app);

    assert_eq!(
        instance(&app, below).map(|w| w.position()),
        Some(Vec2::new(150.0, 70.0))
    );
    assert_eq!(
        instance(&app, above).map(|w| w.position()),
        Some(Vec2::splat(80.0))
    );
    assert!(!app.world().resource::<WindowManager>().is_dragging());
}

#[test]
fn email_launcher_opens_the_dial_up_window() {
    let mut app = make_window_test_app();
    let hub = open(&mut app, WindowTemplateId::ConnectHub);
    app.update();

    let position = instance(&app, hub).map(|w| w.position()).unwrap_or_default();
    press_at(&mut app, position + layout::launcher_rect(2).center());

    let manager = app.world().resource::<WindowManager>();
    assert!(manager.is_template_open(WindowTemplateId::EmailClient));
    assert_eq!(
        manager.active().map(WindowInstance::template),
        Some(WindowTemplateId::EmailClient)
    );
}

#[test]
fn dialing_with_an_empty_form_shows_the_prompt() {
    let mut app = make_window_test_app();
    let id = open(&mut app, WindowTemplateId::EmailClient);
    app.update();

    let template = *app
        .world()
        .resource::<TemplateRegistry>()
        .get(WindowTemplateId::EmailClient);
    let size = frame_size(&template);
    let position = instance(&app, id).map(|w| w.position()).unwrap_or_default();

    press_at(
        &mut app,
        position + layout::field_rect(size.x, DialField::Email).center(),
    );
    press_at(
        &mut app,
        position + layout::footer_button_rect(size, 0, template.footer.len()).center(),
    );

    let mut sessions = app.world_mut().query::<&DialUpSession>();
    let session = sessions.single(app.world()).expect("one dial-up session");
    assert_eq!(session.form.focused(), Some(DialField::Email));
    assert_eq!(session.status_text(), DialUpSession::VALIDATION_PROMPT);
}

#[test]
fn scheduled_opens_fire_through_the_app() {
    let mut app = make_window_test_app();
    app.world_mut()
        .resource_mut::<ScheduledOpens>()
        .schedule(WindowTemplateId::Computer, Duration::from_millis(500));

    for _ in 0..3 {
        app.update();
    }
    assert!(!app
        .world()
        .resource::<WindowManager>()
        .is_template_open(WindowTemplateId::Computer));

    for _ in 0..4 {
        app.update();
    }
    assert!(app
        .world()
        .resource::<WindowManager>()
        .is_template_open(WindowTemplateId::Computer));
    assert_eq!(app.world().resource::<WindowManager>().len(), 1);
}
