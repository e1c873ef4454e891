use bevy::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

pub struct RngPlugin;
impl Plugin for RngPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GlobalRng::default());
    }
}

#[derive(Resource)]
pub struct GlobalRng {
    pub uniform: Pcg64Mcg,
}

impl GlobalRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            uniform: Pcg64Mcg::seed_from_u64(seed),
        }
    }
}

impl Default for GlobalRng {
    fn default() -> Self {
        Self::seeded(12345)
    }
}
