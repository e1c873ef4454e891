use bevy::prelude::*;

use crate::scenes::page::scroll::PageScroll;

pub fn scroll_to_top_on_esc(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut scroll: ResMut<PageScroll>,
) {
    if keyboard_input.just_pressed(KeyCode::Escape) {
        scroll.scroll_to(0.0);
    }
}
