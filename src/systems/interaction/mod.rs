use bevy::prelude::*;

use crate::{
    startup::cursor::{CursorMode, CustomCursor},
    systems::ui::window::WindowSystem,
};

/// Ordering for click detection; consumers read `Clickable::triggered` after
/// this set.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct InteractionSystem;

pub struct InteractionPlugin;
impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerClaim>().configure_sets(
            Update,
            InteractionSystem.after(WindowSystem::Input),
        );
    }
}

/// Registers click detection for one action type.
pub fn register_clickable<T>(app: &mut App)
where
    T: Copy + Send + Sync + 'static,
{
    app.add_systems(Update, clickable_system::<T>.in_set(InteractionSystem));
}

/// Set for the current frame once a floating window consumed the pointer, so
/// page elements underneath stay inert.
#[derive(Resource, Default, Debug)]
pub struct PointerClaim {
    claimed: bool,
}

impl PointerClaim {
    pub fn claim(&mut self) {
        self.claimed = true;
    }

    pub fn release(&mut self) {
        self.claimed = false;
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }
}

#[derive(Component)]
#[require(Transform, Visibility)]
pub struct Clickable<T>
where
    T: Copy + Send + Sync,
{
    /// Typed actions emitted when this element is activated.
    pub actions: Vec<T>,
    /// Hit area measured from the entity's origin, right and down.
    pub region: Vec2,
    /// One-frame activation flag written by `clickable_system`.
    pub triggered: bool,
    pub enabled: bool,
}

impl<T> Clickable<T>
where
    T: Copy + Send + Sync,
{
    pub fn with_region(actions: Vec<T>, region: Vec2) -> Self {
        Self {
            actions,
            region,
            triggered: false,
            enabled: true,
        }
    }
}

pub fn is_cursor_within_region(cursor: Vec2, origin: Vec2, region: Vec2) -> bool {
    cursor.x >= origin.x
        && cursor.x <= origin.x + region.x
        && cursor.y <= origin.y
        && cursor.y >= origin.y - region.y
}

pub fn clickable_system<T: Send + Sync + Copy + 'static>(
    mouse_input: Res<ButtonInput<MouseButton>>,
    claim: Res<PointerClaim>,
    mut cursor: ResMut<CustomCursor>,
    mut clickable_query: Query<(
        &GlobalTransform,
        Option<&InheritedVisibility>,
        &mut Clickable<T>,
    )>,
) {
    // Reset click latches every frame so stale clicks cannot retrigger actions.
    for (_, _, mut clickable) in clickable_query.iter_mut() {
        clickable.triggered = false;
    }

    let Some(cursor_position) = cursor.position else {
        return;
    };
    if claim.is_claimed() {
        return;
    }

    let mut top: Option<(f32, Mut<Clickable<T>>)> = None;
    for (global_transform, inherited_visibility, clickable) in clickable_query.iter_mut() {
        if !clickable.enabled || inherited_visibility.is_some_and(|visibility| !visibility.get())
        {
            continue;
        }
        let translation = global_transform.translation();
        if !is_cursor_within_region(cursor_position, translation.truncate(), clickable.region) {
            continue;
        }
        if top.as_ref().is_none_or(|(z, _)| translation.z > *z) {
            top = Some((translation.z, clickable));
        }
    }

    let Some((_, mut clickable)) = top else {
        return;
    };
    if cursor.current_mode != CursorMode::Clicker {
        cursor.current_mode = CursorMode::Clicker;
    }
    if mouse_input.just_pressed(MouseButton::Left) {
        clickable.triggered = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum TestAction {
        Go,
    }

    fn make_click_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<MouseButton>>();
        app.init_resource::<CustomCursor>();
        app.add_plugins(InteractionPlugin);
        register_clickable::<TestAction>(&mut app);
        app
    }

    fn click(app: &mut App, at: Vec2) {
        app.world_mut().resource_mut::<CustomCursor>().position = Some(at);
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
    }

    #[test]
    fn region_extends_right_and_down_from_the_origin() {
        let origin = Vec2::new(10.0, 10.0);
        let region = Vec2::new(100.0, 20.0);
        assert!(is_cursor_within_region(Vec2::new(50.0, 0.0), origin, region));
        assert!(!is_cursor_within_region(Vec2::new(50.0, 20.0), origin, region));
        assert!(!is_cursor_within_region(Vec2::new(5.0, 0.0), origin, region));
    }

    #[test]
    fn only_the_topmost_overlapping_clickable_triggers() {
        let mut app = make_click_test_app();
        let below = app
            .world_mut()
            .spawn((
                Clickable::with_region(vec![TestAction::Go], Vec2::splat(50.0)),
                GlobalTransform::from_xyz(0.0, 0.0, 1.0),
            ))
            .id();
        let above = app
            .world_mut()
            .spawn((
                Clickable::with_region(vec![TestAction::Go], Vec2::splat(50.0)),
                GlobalTransform::from_xyz(0.0, 0.0, 2.0),
            ))
            .id();

        click(&mut app, Vec2::new(10.0, -10.0));

        let triggered = |app: &App, entity: Entity| {
            app.world()
                .get::<Clickable<TestAction>>(entity)
                .is_some_and(|clickable| clickable.triggered)
        };
        assert!(triggered(&app, above));
        assert!(!triggered(&app, below));
    }

    #[test]
    fn claimed_pointer_blocks_clicks() {
        let mut app = make_click_test_app();
        let entity = app
            .world_mut()
            .spawn((
                Clickable::with_region(vec![TestAction::Go], Vec2::splat(50.0)),
                GlobalTransform::IDENTITY,
            ))
            .id();
        app.world_mut().resource_mut::<PointerClaim>().claim();

        click(&mut app, Vec2::new(10.0, -10.0));
        assert!(app
            .world()
            .get::<Clickable<TestAction>>(entity)
            .is_some_and(|clickable| !clickable.triggered));
    }
}
