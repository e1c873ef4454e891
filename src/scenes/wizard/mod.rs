use std::time::Duration;

use bevy::{prelude::*, sprite::Anchor};

use crate::{
    scenes::page::{
        content::PortfolioContent,
        scroll::PageScroll,
        sections::{PageLayout, SectionId},
        PageSystem, SectionBackdrop,
    },
    systems::{
        colors::{
            ColorTranslation, DESKTOP_TEAL, DISABLED_TEXT, TEXT_DARK, TEXT_LIGHT, TITLE_ACTIVE,
            WINDOW_FACE, WINDOW_SHADOW,
        },
        interaction::{register_clickable, Clickable, InteractionSystem},
        ui::{label, panel},
    },
};

pub struct WizardPlugin;
impl Plugin for WizardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (Wizard::setup, Wizard::spawn).chain())
            .add_systems(
                Update,
                (
                    Wizard::handle_buttons,
                    Wizard::sync.run_if(resource_exists_and_changed::<Wizard>),
                )
                    .chain()
                    .after(InteractionSystem)
                    .before(PageSystem::Scroll),
            );
        register_clickable::<WizardAction>(app);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardAction {
    Back,
    Next,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardOutcome {
    Advanced(usize),
    Finished,
}

/// Multi-step profile dialog. Steps are numbered from 1.
#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub struct Wizard {
    step: usize,
    total: usize,
    finished: bool,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct WizardStepPane {
    pub step: usize,
}

#[derive(Component)]
pub struct WizardNextLabel;

#[derive(Component)]
pub struct WizardBackLabel;

#[derive(Component)]
pub struct WizardIndicator;

impl Wizard {
    pub const FINISH_FADE: Duration = Duration::from_millis(800);
    const DIALOG_SIZE: Vec2 = Vec2::new(640.0, 420.0);
    const DIALOG_LEFT: f32 = 80.0;
    const DIALOG_TOP: f32 = 100.0;
    const BUTTON_SIZE: Vec2 = Vec2::new(100.0, 26.0);

    pub fn new(total: usize) -> Self {
        Self {
            step: 1,
            total: total.max(1),
            finished: false,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_last(&self) -> bool {
        self.step == self.total
    }

    pub fn back_enabled(&self) -> bool {
        self.step > 1
    }

    pub fn next_label(&self) -> &'static str {
        if self.is_last() {
            "Finish →"
        } else {
            "Next →"
        }
    }

    pub fn indicator(&self) -> String {
        format!("Step {} of {}", self.step, self.total)
    }

    /// On the last step this finishes instead; finishing again is allowed.
    pub fn next(&mut self) -> WizardOutcome {
        if self.step < self.total {
            self.step += 1;
            WizardOutcome::Advanced(self.step)
        } else {
            self.finished = true;
            WizardOutcome::Finished
        }
    }

    pub fn back(&mut self) -> bool {
        if self.step > 1 {
            self.step -= 1;
            true
        } else {
            false
        }
    }

    fn setup(mut commands: Commands, content: Res<PortfolioContent>) {
        commands.insert_resource(Wizard::new(content.wizard.len()));
    }

    fn button_rect(index: usize) -> Rect {
        let right = Self::DIALOG_SIZE.x - 16.0 - index as f32 * (Self::BUTTON_SIZE.x + 8.0);
        let bottom = Self::DIALOG_SIZE.y - 16.0;
        Rect::new(right - Self::BUTTON_SIZE.x, bottom - Self::BUTTON_SIZE.y, right, bottom)
    }

    fn spawn(mut commands: Commands, layout: Res<PageLayout>, content: Res<PortfolioContent>) {
        let origin = layout.in_section(
            SectionId::Profile,
            Vec2::new(Self::DIALOG_LEFT, Self::DIALOG_TOP),
        );
        commands
            .spawn((
                Name::new("profile_wizard"),
                Sprite::from_color(WINDOW_FACE, Self::DIALOG_SIZE),
                Anchor::TOP_LEFT,
                Transform::from_xyz(origin.x, origin.y, 3.0),
            ))
            .with_children(|parent| {
                parent.spawn(panel(
                    TITLE_ACTIVE,
                    Rect::new(3.0, 3.0, Self::DIALOG_SIZE.x - 3.0, 24.0),
                    0.1,
                ));
                parent.spawn(label("Profile Setup Wizard", 13.0, TEXT_LIGHT, Vec2::new(10.0, 6.0), 0.2));
                parent.spawn(panel(WINDOW_SHADOW, Rect::new(16.0, 40.0, 176.0, 340.0), 0.1));

                for (index, step) in content.wizard.iter().enumerate() {
                    parent
                        .spawn((
                            WizardStepPane { step: index + 1 },
                            Transform::from_xyz(196.0, -44.0, 0.2),
                            if index == 0 {
                                Visibility::Inherited
                            } else {
                                Visibility::Hidden
                            },
                        ))
                        .with_children(|pane| {
                            pane.spawn(label(step.title.clone(), 18.0, TEXT_DARK, Vec2::ZERO, 0.0));
                            for (line_index, line) in step.lines.iter().enumerate() {
                                pane.spawn(label(
                                    line.clone(),
                                    13.0,
                                    TEXT_DARK,
                                    Vec2::new(0.0, 44.0 + line_index as f32 * 20.0),
                                    0.0,
                                ));
                            }
                        });
                }

                parent.spawn((
                    WizardIndicator,
                    label(
                        format!("Step 1 of {}", content.wizard.len().max(1)),
                        12.0,
                        TEXT_DARK,
                        Vec2::new(16.0, Self::DIALOG_SIZE.y - 36.0),
                        0.2,
                    ),
                ));

                for (index, action, text) in [
                    (0, WizardAction::Next, "Next →"),
                    (1, WizardAction::Back, "← Back"),
                ] {
                    let rect = Self::button_rect(index);
                    let mut button = parent.spawn((
                        Clickable::with_region(vec![action], rect.size()),
                        panel(WINDOW_FACE, rect, 0.2),
                    ));
                    button.with_children(|button| {
                        button.spawn(panel(
                            WINDOW_SHADOW,
                            Rect::new(0.0, rect.height() - 2.0, rect.width(), rect.height()),
                            0.1,
                        ));
                    });
                    match action {
                        WizardAction::Next => {
                            button.with_child((
                                WizardNextLabel,
                                label(text, 12.0, TEXT_DARK, Vec2::new(18.0, 6.0), 0.2),
                            ));
                        }
                        WizardAction::Back => {
                            button.with_child((
                                WizardBackLabel,
                                label(text, 12.0, DISABLED_TEXT, Vec2::new(18.0, 6.0), 0.2),
                            ));
                        }
                    }
                }
            });
    }

    fn handle_buttons(
        mut commands: Commands,
        buttons: Query<&Clickable<WizardAction>>,
        wizard: Option<ResMut<Wizard>>,
        layout: Res<PageLayout>,
        mut scroll: ResMut<PageScroll>,
        backdrops: Query<(Entity, &SectionBackdrop)>,
    ) {
        let Some(mut wizard) = wizard else {
            return;
        };
        for clickable in buttons.iter().filter(|clickable| clickable.triggered) {
            for action in &clickable.actions {
                match action {
                    WizardAction::Back => {
                        wizard.back();
                    }
                    WizardAction::Next => {
                        if wizard.next() == WizardOutcome::Finished {
                            info!("profile wizard finished");
                            for (entity, backdrop) in backdrops.iter() {
                                if backdrop.section == SectionId::Profile {
                                    commands.entity(entity).insert(ColorTranslation::new(
                                        DESKTOP_TEAL,
                                        Self::FINISH_FADE,
                                    ));
                                }
                            }
                            scroll.scroll_to_section(&layout, SectionId::Expertise, 0.0);
                        }
                    }
                }
            }
        }
    }

    fn sync(
        wizard: Res<Wizard>,
        mut panes: Query<(&WizardStepPane, &mut Visibility)>,
        mut next_labels: Query<&mut Text2d, (With<WizardNextLabel>, Without<WizardIndicator>)>,
        mut back_labels: Query<&mut TextColor, With<WizardBackLabel>>,
        mut indicators: Query<&mut Text2d, (With<WizardIndicator>, Without<WizardNextLabel>)>,
        mut buttons: Query<&mut Clickable<WizardAction>>,
    ) {
        for (pane, mut visibility) in panes.iter_mut() {
            *visibility = if pane.step == wizard.step() {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
        for mut text in next_labels.iter_mut() {
            text.0 = wizard.next_label().to_string();
        }
        for mut color in back_labels.iter_mut() {
            color.0 = if wizard.back_enabled() {
                TEXT_DARK
            } else {
                DISABLED_TEXT
            };
        }
        for mut text in indicators.iter_mut() {
            text.0 = wizard.indicator();
        }
        for mut button in buttons.iter_mut() {
            if button.actions.contains(&WizardAction::Back) {
                button.enabled = wizard.back_enabled();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::colors::PROFILE_BACKGROUND;

    #[test]
    fn next_walks_to_the_last_step_then_finishes() {
        let mut wizard = Wizard::new(3);
        assert!(!wizard.back_enabled());
        assert_eq!(wizard.next_label(), "Next →");

        assert_eq!(wizard.next(), WizardOutcome::Advanced(2));
        assert_eq!(wizard.next(), WizardOutcome::Advanced(3));
        assert_eq!(wizard.next_label(), "Finish →");
        assert_eq!(wizard.indicator(), "Step 3 of 3");

        assert_eq!(wizard.next(), WizardOutcome::Finished);
        assert_eq!(wizard.step(), 3);
        assert!(wizard.is_finished());
    }

    #[test]
    fn back_stops_at_the_first_step() {
        let mut wizard = Wizard::new(2);
        wizard.next();
        assert!(wizard.back());
        assert!(!wizard.back());
        assert_eq!(wizard.step(), 1);
    }

    #[test]
    fn empty_wizard_still_has_one_step() {
        let mut wizard = Wizard::new(0);
        assert_eq!(wizard.total(), 1);
        assert_eq!(wizard.next(), WizardOutcome::Finished);
    }

    #[test]
    fn finishing_turns_the_profile_teal_and_scrolls_to_the_desktop() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<PageLayout>();
        let mut scroll = PageScroll::default();
        scroll.set_extent(
            app.world().resource::<PageLayout>().total_height(),
            Vec2::new(1280.0, 720.0),
        );
        app.insert_resource(scroll);
        app.insert_resource(Wizard::new(1));
        app.add_systems(Update, Wizard::handle_buttons);

        let backdrop = app
            .world_mut()
            .spawn((
                SectionBackdrop {
                    section: SectionId::Profile,
                },
                Sprite::from_color(PROFILE_BACKGROUND, Vec2::ONE),
            ))
            .id();
        let mut button = Clickable::with_region(vec![WizardAction::Next], Vec2::ONE);
        button.triggered = true;
        app.world_mut().spawn(button);

        app.update();

        assert!(app.world().resource::<Wizard>().is_finished());
        assert!(app.world().get::<ColorTranslation>(backdrop).is_some());
        let expertise_top = app
            .world()
            .resource::<PageLayout>()
            .span(SectionId::Expertise)
            .top;
        assert_eq!(app.world().resource::<PageScroll>().target(), expertise_top);
    }
}
