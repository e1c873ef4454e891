pub mod desktop;
pub mod page;
pub mod wizard;

use bevy::prelude::*;

use desktop::DesktopScenePlugin;
use page::PagePlugin;
use wizard::WizardPlugin;

/// Everything drawn on the scrolling page.
pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((PagePlugin, WizardPlugin, DesktopScenePlugin));
    }
}
