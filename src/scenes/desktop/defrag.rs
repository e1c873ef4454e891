use std::time::Duration;

use bevy::{prelude::*, sprite::Anchor};
use rand::Rng;

use crate::{
    data::rng::GlobalRng,
    scenes::page::{
        content::PortfolioContent,
        observer::{IntersectionObserver, ObserverOptions},
        scroll::PageScroll,
        sections::{PageLayout, SectionId},
    },
    systems::{
        colors::{
            BLOCK_CONTIGUOUS, BLOCK_FRAGMENTED, BLOCK_FREE, TEXT_DARK, TEXT_LIGHT, TITLE_ACTIVE,
            WINDOW_FACE, WINDOW_SHADOW,
        },
        time::{Step, StepSchedule},
        ui::{label, panel},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Block {
    Free,
    Fragmented,
    Contiguous,
}

impl Block {
    pub fn color(self) -> Color {
        match self {
            Block::Free => BLOCK_FREE,
            Block::Fragmented => BLOCK_FRAGMENTED,
            Block::Contiguous => BLOCK_CONTIGUOUS,
        }
    }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct DefragBlock {
    pub index: usize,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct SkillLine {
    pub index: usize,
}

#[derive(Component)]
pub struct DefragStatusText;

/// Disk-defragmenter animation that uncovers the skills list as it runs.
///
/// The block grid is generated at most once, the first time the desktop
/// section scrolls into view; later visits keep whatever state it reached.
#[derive(Resource)]
pub struct Defragmenter {
    observer: IntersectionObserver<SectionId>,
    generated: bool,
    started: bool,
    blocks: Vec<Block>,
    initial_fragmented: usize,
    schedule: StepSchedule,
}

impl Default for Defragmenter {
    fn default() -> Self {
        Self {
            observer: IntersectionObserver::new(Self::OPTIONS),
            generated: false,
            started: false,
            blocks: vec![Block::Free; Self::BLOCK_COUNT],
            initial_fragmented: 0,
            schedule: StepSchedule::every(Self::STEP_INTERVAL),
        }
    }
}

impl Defragmenter {
    pub const OPTIONS: ObserverOptions = ObserverOptions::threshold(0.1);
    pub const STEP_INTERVAL: Duration = Duration::from_millis(120);
    pub const COLUMNS: usize = 36;
    pub const ROWS: usize = 6;
    pub const BLOCK_COUNT: usize = Self::COLUMNS * Self::ROWS;
    pub const COMPLETE_TEXT: &'static str = "Defragmentation complete";

    const BLOCK_SIZE: f32 = 12.0;
    const BLOCK_GAP: f32 = 2.0;
    const PANEL_SIZE: Vec2 = Vec2::new(1000.0, 240.0);
    const GRID_ORIGIN: Vec2 = Vec2::new(20.0, 44.0);
    const SKILLS_ORIGIN: Vec2 = Vec2::new(560.0, 44.0);
    const SKILL_LINE_HEIGHT: f32 = 20.0;

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn fragmented(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| **block == Block::Fragmented)
            .count()
    }

    pub fn initial_fragmented(&self) -> usize {
        self.initial_fragmented
    }

    pub fn is_complete(&self) -> bool {
        self.generated && self.fragmented() == 0
    }

    /// Fills the grid with a random mix of blocks. Only the first call has
    /// any effect.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) {
        if self.generated {
            return;
        }
        for block in self.blocks.iter_mut() {
            let roll: f32 = rng.random_range(0.0..1.0);
            *block = if roll < 0.2 {
                Block::Free
            } else if roll < 0.55 {
                Block::Fragmented
            } else {
                Block::Contiguous
            };
        }
        if self.fragmented() == 0 {
            let index = rng.random_range(0..self.blocks.len());
            self.blocks[index] = Block::Fragmented;
        }
        self.initial_fragmented = self.fragmented();
        self.generated = true;
    }

    pub fn progress(&self) -> f32 {
        if !self.generated {
            return 0.0;
        }
        if self.initial_fragmented == 0 {
            return 1.0;
        }
        1.0 - self.fragmented() as f32 / self.initial_fragmented as f32
    }

    /// How many of `total` skills are uncovered at the current progress.
    pub fn revealed_skills(&self, total: usize) -> usize {
        if self.is_complete() {
            return total;
        }
        ((self.progress() * total as f32).floor() as usize).min(total)
    }

    pub fn status_text(&self) -> String {
        if !self.started {
            String::from("Analyzing drive C:")
        } else if self.is_complete() {
            String::from(Self::COMPLETE_TEXT)
        } else {
            format!("Defragmenting... {:.0}% complete", self.progress() * 100.0)
        }
    }

    fn defragment_one<R: Rng>(blocks: &mut [Block], rng: &mut R) -> Step {
        let fragmented: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| **block == Block::Fragmented)
            .map(|(index, _)| index)
            .collect();
        if fragmented.is_empty() {
            return Step::Finished;
        }
        let index = fragmented[rng.random_range(0..fragmented.len())];
        blocks[index] = Block::Contiguous;
        if fragmented.len() == 1 {
            Step::Finished
        } else {
            Step::Continue
        }
    }

    /// Runs every step that fell due within `delta`.
    pub fn advance<R: Rng>(&mut self, delta: Duration, rng: &mut R) -> Step {
        if !self.started {
            return Step::Continue;
        }
        let Defragmenter {
            blocks, schedule, ..
        } = self;
        schedule.advance(delta, || Self::defragment_one(blocks, rng))
    }

    pub fn start<R: Rng>(&mut self, rng: &mut R) {
        self.generate(rng);
        if !self.started {
            info!(
                "defragmenter started with {} fragmented blocks",
                self.initial_fragmented
            );
        }
        self.started = true;
    }

    fn block_rect(index: usize) -> Rect {
        let column = (index % Self::COLUMNS) as f32;
        let row = (index / Self::COLUMNS) as f32;
        let step = Self::BLOCK_SIZE + Self::BLOCK_GAP;
        let min = Self::GRID_ORIGIN + Vec2::new(column * step, row * step);
        Rect::from_corners(min, min + Vec2::splat(Self::BLOCK_SIZE))
    }

    pub fn spawn(mut commands: Commands, layout: Res<PageLayout>, content: Res<PortfolioContent>) {
        let left = (layout.width - Self::PANEL_SIZE.x) * 0.5;
        let origin = layout.in_section(
            SectionId::Expertise,
            Vec2::new(left, PageLayout::DEFRAG_TOP),
        );
        commands
            .spawn((
                Name::new("defragmenter"),
                Sprite::from_color(WINDOW_FACE, Self::PANEL_SIZE),
                Anchor::TOP_LEFT,
                Transform::from_xyz(origin.x, origin.y, 3.0),
            ))
            .with_children(|parent| {
                parent.spawn(panel(
                    TITLE_ACTIVE,
                    Rect::new(3.0, 3.0, Self::PANEL_SIZE.x - 3.0, 24.0),
                    0.1,
                ));
                parent.spawn(label(
                    "Disk Defragmenter - Skills",
                    13.0,
                    TEXT_LIGHT,
                    Vec2::new(10.0, 6.0),
                    0.2,
                ));
                for index in 0..Self::BLOCK_COUNT {
                    parent.spawn((
                        DefragBlock { index },
                        panel(BLOCK_FREE, Self::block_rect(index), 0.2),
                    ));
                }
                for (index, skill) in content.skills.iter().enumerate() {
                    parent.spawn((
                        SkillLine { index },
                        label(
                            format!("- {skill}"),
                            14.0,
                            TEXT_DARK,
                            Self::SKILLS_ORIGIN + Vec2::Y * index as f32 * Self::SKILL_LINE_HEIGHT,
                            0.2,
                        ),
                        Visibility::Hidden,
                    ));
                }
                parent.spawn(panel(
                    WINDOW_SHADOW,
                    Rect::new(0.0, Self::PANEL_SIZE.y - 28.0, Self::PANEL_SIZE.x, Self::PANEL_SIZE.y - 27.0),
                    0.1,
                ));
                parent.spawn((
                    DefragStatusText,
                    label(
                        String::from("Analyzing drive C:"),
                        12.0,
                        TEXT_DARK,
                        Vec2::new(10.0, Self::PANEL_SIZE.y - 22.0),
                        0.2,
                    ),
                ));
            });
    }

    pub fn watch(
        scroll: Res<PageScroll>,
        layout: Res<PageLayout>,
        mut rng: ResMut<GlobalRng>,
        mut defrag: ResMut<Defragmenter>,
    ) {
        let viewport = scroll.viewport();
        let span = layout.span(SectionId::Expertise);
        let Some(entry) = defrag
            .bypass_change_detection()
            .observer
            .observe(SectionId::Expertise, span, viewport)
        else {
            return;
        };
        if entry.intersecting && !defrag.started {
            defrag.start(&mut rng.uniform);
        }
    }

    pub fn tick(time: Res<Time>, mut rng: ResMut<GlobalRng>, mut defrag: ResMut<Defragmenter>) {
        if !defrag.started || defrag.schedule.is_finished() {
            return;
        }
        if defrag.advance(time.delta(), &mut rng.uniform) == Step::Finished {
            info!("{}", Self::COMPLETE_TEXT);
        }
    }

    pub fn sync_visuals(
        defrag: Res<Defragmenter>,
        content: Res<PortfolioContent>,
        mut blocks: Query<(&DefragBlock, &mut Sprite)>,
        mut skills: Query<(&SkillLine, &mut Visibility)>,
        mut status: Query<&mut Text2d, With<DefragStatusText>>,
    ) {
        for (block, mut sprite) in blocks.iter_mut() {
            if let Some(state) = defrag.blocks.get(block.index) {
                sprite.color = state.color();
            }
        }
        let revealed = defrag.revealed_skills(content.skills.len());
        for (line, mut visibility) in skills.iter_mut() {
            *visibility = if line.index < revealed {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
        for mut text in status.iter_mut() {
            text.0 = defrag.status_text();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn rng() -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(7)
    }

    #[test]
    fn generation_happens_once_and_leaves_work_to_do() {
        let mut rng = rng();
        let mut defrag = Defragmenter::default();
        defrag.generate(&mut rng);
        assert!(defrag.is_generated());
        assert!(defrag.fragmented() > 0);
        assert_eq!(defrag.initial_fragmented(), defrag.fragmented());

        let snapshot = defrag.blocks().to_vec();
        defrag.generate(&mut rng);
        assert_eq!(defrag.blocks(), snapshot.as_slice());
    }

    #[test]
    fn each_step_defragments_one_block_until_complete() {
        let mut rng = rng();
        let mut defrag = Defragmenter::default();
        defrag.start(&mut rng);
        let initial = defrag.initial_fragmented();
        let skills = 10;
        assert_eq!(defrag.revealed_skills(skills), 0);

        assert_eq!(
            defrag.advance(Defragmenter::STEP_INTERVAL, &mut rng),
            if initial == 1 { Step::Finished } else { Step::Continue }
        );
        assert_eq!(defrag.fragmented(), initial - 1);

        let mut steps = 1;
        while defrag.advance(Defragmenter::STEP_INTERVAL, &mut rng) == Step::Continue {
            steps += 1;
            assert!(steps <= initial);
        }
        assert!(defrag.is_complete());
        assert_eq!(defrag.progress(), 1.0);
        assert_eq!(defrag.revealed_skills(skills), skills);
        assert_eq!(defrag.status_text(), Defragmenter::COMPLETE_TEXT);
        assert_eq!(
            defrag.advance(Defragmenter::STEP_INTERVAL, &mut rng),
            Step::Finished
        );
    }

    #[test]
    fn nothing_moves_before_the_section_is_seen() {
        let mut rng = rng();
        let mut defrag = Defragmenter::default();
        assert_eq!(
            defrag.advance(Duration::from_secs(5), &mut rng),
            Step::Continue
        );
        assert!(!defrag.is_generated());
        assert_eq!(defrag.revealed_skills(4), 0);
    }

    #[test]
    fn scrolling_the_desktop_into_view_starts_the_run() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<PageLayout>();
        app.insert_resource(GlobalRng::seeded(3));
        app.init_resource::<Defragmenter>();
        let mut scroll = PageScroll::default();
        let total = app.world().resource::<PageLayout>().total_height();
        scroll.set_extent(total, Vec2::new(1280.0, 720.0));
        app.insert_resource(scroll);
        app.add_systems(Update, Defragmenter::watch);

        app.update();
        assert!(!app.world().resource::<Defragmenter>().is_started());

        let expertise = app
            .world()
            .resource::<PageLayout>()
            .span(SectionId::Expertise);
        {
            let mut scroll = app.world_mut().resource_mut::<PageScroll>();
            scroll.scroll_to(expertise.top);
            for _ in 0..600 {
                scroll.step(1.0 / 60.0);
            }
        }
        app.update();

        let defrag = app.world().resource::<Defragmenter>();
        assert!(defrag.is_started());
        assert!(defrag.is_generated());
    }
}
