//! Dial-up contact dialog hosted by `email-client` windows.
//!
//! The "connection" is cosmetic: a validated form starts a fixed sequence of
//! progress steps that ends in a success message. Nothing leaves the process.
use std::{fmt, time::Duration};

use bevy::{
    input::{
        keyboard::{Key, KeyboardInput},
        ButtonState,
    },
    prelude::*,
};
use smallvec::SmallVec;

use super::{manager::WindowManager, WindowId, WindowView};
use crate::systems::time::{Step, StepSchedule};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialField {
    UserName,
    Email,
    Message,
}

impl DialField {
    pub const ALL: [DialField; 3] = [DialField::UserName, DialField::Email, DialField::Message];

    pub const fn label(self) -> &'static str {
        match self {
            Self::UserName => "User name:",
            Self::Email => "Email:",
            Self::Message => "Message:",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::UserName => "Your Name",
            Self::Email => "Your Email Address",
            Self::Message => "Your Message...",
        }
    }

    pub const fn height(self) -> f32 {
        match self {
            Self::UserName | Self::Email => 24.0,
            Self::Message => 80.0,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::UserName => Self::Email,
            Self::Email => Self::Message,
            Self::Message => Self::UserName,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialValidationError {
    pub missing: SmallVec<[DialField; 3]>,
}

impl fmt::Display for DialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(DialUpSession::VALIDATION_PROMPT)
    }
}

impl std::error::Error for DialValidationError {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialForm {
    user_name: String,
    email: String,
    message: String,
    focused: Option<DialField>,
}

impl DialForm {
    const MAX_FIELD_CHARS: usize = 500;

    pub fn value(&self, field: DialField) -> &str {
        match field {
            DialField::UserName => &self.user_name,
            DialField::Email => &self.email,
            DialField::Message => &self.message,
        }
    }

    fn value_mut(&mut self, field: DialField) -> &mut String {
        match field {
            DialField::UserName => &mut self.user_name,
            DialField::Email => &mut self.email,
            DialField::Message => &mut self.message,
        }
    }

    pub fn focused(&self) -> Option<DialField> {
        self.focused
    }

    pub fn focus(&mut self, field: DialField) {
        self.focused = Some(field);
    }

    pub fn cycle_focus(&mut self) {
        self.focused = Some(self.focused.map_or(DialField::UserName, DialField::next));
    }

    /// Appends to the focused field; ignored when nothing is focused.
    pub fn type_text(&mut self, text: &str) {
        let Some(field) = self.focused else {
            return;
        };
        let value = self.value_mut(field);
        for character in text.chars().filter(|c| !c.is_control()) {
            if value.chars().count() >= Self::MAX_FIELD_CHARS {
                break;
            }
            value.push(character);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused {
            self.value_mut(field).pop();
        }
    }

    pub fn validate(&self) -> Result<(), DialValidationError> {
        let missing: SmallVec<[DialField; 3]> = DialField::ALL
            .into_iter()
            .filter(|&field| self.value(field).trim().is_empty())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DialValidationError { missing })
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Fixed progress script: +10 % every 300 ms until 100 %.
#[derive(Clone, Debug)]
pub struct DialSequence {
    progress: u8,
    schedule: StepSchedule,
}

impl Default for DialSequence {
    fn default() -> Self {
        Self {
            progress: 0,
            schedule: StepSchedule::every(Self::STEP_INTERVAL),
        }
    }
}

impl DialSequence {
    const STEP_INTERVAL: Duration = Duration::from_millis(300);
    const STEP_PERCENT: u8 = 10;

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn stage_text(&self) -> &'static str {
        match self.progress {
            0..=29 => "Dialing...",
            30..=59 => "Verifying user name and password...",
            60..=99 => "Logging on to network...",
            _ => DialUpSession::CONNECTED_TEXT,
        }
    }

    pub fn advance(&mut self, delta: Duration) -> Step {
        let progress = &mut self.progress;
        self.schedule.advance(delta, || {
            *progress = (*progress + Self::STEP_PERCENT).min(100);
            if *progress >= 100 {
                Step::Finished
            } else {
                Step::Continue
            }
        })
    }
}

#[derive(Clone, Debug, Default)]
pub enum DialState {
    #[default]
    Ready,
    Rejected,
    Dialing(DialSequence),
    Connected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialOutcome {
    Started,
    AlreadyDialing,
    Rejected,
}

#[derive(Component, Clone, Debug, Default)]
pub struct DialUpSession {
    pub form: DialForm,
    state: DialState,
}

impl DialUpSession {
    pub const READY_TEXT: &'static str = "Ready to connect.";
    pub const VALIDATION_PROMPT: &'static str = "Please fill in all fields.";
    pub const CONNECTED_TEXT: &'static str = "Connected! Message sent.";

    pub fn state(&self) -> &DialState {
        &self.state
    }

    pub fn dial(&mut self) -> DialOutcome {
        if matches!(self.state, DialState::Dialing(_)) {
            return DialOutcome::AlreadyDialing;
        }
        match self.form.validate() {
            Ok(()) => {
                self.state = DialState::Dialing(DialSequence::default());
                DialOutcome::Started
            }
            Err(error) => {
                debug!("dial rejected, missing {:?}", error.missing);
                self.state = DialState::Rejected;
                DialOutcome::Rejected
            }
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        let DialState::Dialing(sequence) = &mut self.state else {
            return;
        };
        if sequence.advance(delta) == Step::Finished {
            info!("dial-up sequence complete; nothing was transmitted");
            self.state = DialState::Connected;
            self.form.clear();
        }
    }

    pub fn status_text(&self) -> &'static str {
        match &self.state {
            DialState::Ready => Self::READY_TEXT,
            DialState::Rejected => Self::VALIDATION_PROMPT,
            DialState::Dialing(sequence) => sequence.stage_text(),
            DialState::Connected => Self::CONNECTED_TEXT,
        }
    }

    /// Progress bar fill in `0..=1`; `None` while the bar is hidden.
    pub fn progress(&self) -> Option<f32> {
        match &self.state {
            DialState::Dialing(sequence) => Some(f32::from(sequence.progress()) / 100.0),
            DialState::Connected => Some(1.0),
            DialState::Ready | DialState::Rejected => None,
        }
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialRequested {
    pub window: WindowId,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialFieldFocused {
    pub window: WindowId,
    pub field: DialField,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct DialFieldText {
    pub field: DialField,
}

#[derive(Component)]
pub struct DialStatusText;

#[derive(Component)]
pub struct DialProgressTrack;

#[derive(Component)]
pub struct DialProgressFill {
    pub full_width: f32,
}

impl DialUpSession {
    pub fn handle_requests(
        mut dial_requests: MessageReader<DialRequested>,
        mut focus_requests: MessageReader<DialFieldFocused>,
        mut sessions: Query<(&WindowView, &mut DialUpSession)>,
    ) {
        for request in dial_requests.read() {
            for (view, mut session) in sessions.iter_mut() {
                if view.id == request.window {
                    session.dial();
                }
            }
        }
        for request in focus_requests.read() {
            for (view, mut session) in sessions.iter_mut() {
                if view.id == request.window {
                    session.form.focus(request.field);
                }
            }
        }
    }

    /// Keyboard input goes to the active window's form only.
    pub fn type_into_active(
        mut keyboard: MessageReader<KeyboardInput>,
        manager: Res<WindowManager>,
        mut sessions: Query<(&WindowView, &mut DialUpSession)>,
    ) {
        let Some(active) = manager.active().map(|instance| instance.id()) else {
            keyboard.clear();
            return;
        };
        let Some((_, mut session)) = sessions.iter_mut().find(|(view, _)| view.id == active)
        else {
            keyboard.clear();
            return;
        };
        if matches!(session.state, DialState::Dialing(_)) {
            keyboard.clear();
            return;
        }

        for event in keyboard.read() {
            if event.state != ButtonState::Pressed {
                continue;
            }
            match &event.logical_key {
                Key::Character(text) => session.form.type_text(text.as_str()),
                Key::Space => session.form.type_text(" "),
                Key::Backspace => session.form.backspace(),
                Key::Tab => session.form.cycle_focus(),
                _ => {}
            }
        }
    }

    pub fn tick(time: Res<Time>, mut sessions: Query<&mut DialUpSession>) {
        for mut session in sessions.iter_mut() {
            session.advance(time.delta());
        }
    }

    pub fn sync_visuals(
        sessions: Query<(&DialUpSession, &Children), Changed<DialUpSession>>,
        mut texts: Query<(&mut Text2d, Option<&DialFieldText>, Has<DialStatusText>)>,
        mut tracks: Query<&mut Visibility, With<DialProgressTrack>>,
        mut fills: Query<(&mut Sprite, &DialProgressFill)>,
    ) {
        for (session, children) in sessions.iter() {
            for child in children.iter() {
                if let Ok((mut text, field, is_status)) = texts.get_mut(child) {
                    if let Some(field) = field {
                        let value = session.form.value(field.field);
                        let caret = if session.form.focused() == Some(field.field) {
                            "_"
                        } else {
                            ""
                        };
                        text.0 = if value.is_empty() && caret.is_empty() {
                            field.field.placeholder().to_string()
                        } else {
                            format!("{value}{caret}")
                        };
                    } else if is_status {
                        text.0 = session.status_text().to_string();
                    }
                }
                if let Ok(mut visibility) = tracks.get_mut(child) {
                    *visibility = if session.progress().is_some() {
                        Visibility::Inherited
                    } else {
                        Visibility::Hidden
                    };
                }
                if let Ok((mut sprite, fill)) = fills.get_mut(child) {
                    let fraction = session.progress().unwrap_or(0.0);
                    sprite.custom_size = Some(Vec2::new(fill.full_width * fraction, 14.0));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_session() -> DialUpSession {
        let mut session = DialUpSession::default();
        for field in DialField::ALL {
            session.form.focus(field);
            session.form.type_text("hello");
        }
        session
    }

    #[test]
    fn typing_requires_a_focused_field() {
        let mut form = DialForm::default();
        form.type_text("ignored");
        assert_eq!(form.value(DialField::UserName), "");

        form.cycle_focus();
        form.type_text("Ada");
        form.backspace();
        assert_eq!(form.value(DialField::UserName), "Ad");

        form.cycle_focus();
        assert_eq!(form.focused(), Some(DialField::Email));
    }

    #[test]
    fn blank_fields_block_the_dial_with_a_prompt() {
        let mut session = DialUpSession::default();
        session.form.focus(DialField::UserName);
        session.form.type_text("Ada");
        session.form.focus(DialField::Email);
        session.form.type_text("   ");

        assert_eq!(session.dial(), DialOutcome::Rejected);
        assert_eq!(session.status_text(), DialUpSession::VALIDATION_PROMPT);
        assert_eq!(session.progress(), None);

        let error = session.form.validate().expect_err("missing fields");
        assert_eq!(
            error.missing.as_slice(),
            &[DialField::Email, DialField::Message]
        );
    }

    #[test]
    fn valid_form_walks_through_every_stage_and_clears_the_form() {
        let mut session = filled_session();
        assert_eq!(session.dial(), DialOutcome::Started);
        assert_eq!(session.status_text(), "Dialing...");
        assert_eq!(session.dial(), DialOutcome::AlreadyDialing);

        session.advance(Duration::from_millis(900));
        assert_eq!(session.status_text(), "Verifying user name and password...");
        session.advance(Duration::from_millis(900));
        assert_eq!(session.status_text(), "Logging on to network...");
        assert_eq!(session.progress(), Some(0.6));

        session.advance(Duration::from_millis(1200));
        assert_eq!(session.status_text(), DialUpSession::CONNECTED_TEXT);
        assert_eq!(session.progress(), Some(1.0));
        assert_eq!(session.form, DialForm::default());
    }
}
