use std::{collections::HashSet, time::Duration};

use bevy::prelude::*;

use super::{
    observer::{IntersectionObserver, Margin, ObserverOptions},
    scroll::PageScroll,
    sections::PageSpan,
};
use crate::systems::time::{Step, StepSchedule};

/// Shown once scrolled into view. Spawn with `Visibility::Hidden`.
#[derive(Component, Clone, Copy, Debug)]
pub struct Reveal {
    pub span: PageSpan,
    /// Tie-breaker for items sharing a row, left to right.
    pub order: usize,
}

#[derive(Component)]
pub struct Revealed;

#[derive(Resource)]
pub struct RevealQueue {
    observer: IntersectionObserver<Entity>,
    queued: HashSet<Entity>,
    pending: Vec<(Entity, StepSchedule)>,
}

impl Default for RevealQueue {
    fn default() -> Self {
        Self {
            observer: IntersectionObserver::new(Self::OPTIONS),
            queued: HashSet::new(),
            pending: Vec::new(),
        }
    }
}

impl RevealQueue {
    pub const OPTIONS: ObserverOptions =
        ObserverOptions::threshold(0.1).with_margins(Margin::Px(0.0), Margin::Px(-50.0));
    pub const STAGGER: Duration = Duration::from_millis(100);

    pub fn is_pending(&self, entity: Entity) -> bool {
        self.pending.iter().any(|(pending, _)| *pending == entity)
    }

    /// Queues every item that came into view this frame, `i * STAGGER` apart
    /// in page order. Each item is queued at most once.
    pub fn observe<'a>(
        &mut self,
        items: impl IntoIterator<Item = (Entity, &'a Reveal)>,
        scroll: &PageScroll,
    ) -> usize {
        let viewport = scroll.viewport();
        let queued = &self.queued;
        let observer = &mut self.observer;
        let mut batch: Vec<(Entity, &Reveal)> = items
            .into_iter()
            .filter(|(entity, _)| !queued.contains(entity))
            .filter(|(entity, reveal)| {
                observer
                    .observe(*entity, reveal.span, viewport)
                    .is_some_and(|entry| entry.intersecting)
            })
            .collect();
        batch.sort_by(|(_, a), (_, b)| {
            a.span
                .top
                .total_cmp(&b.span.top)
                .then(a.order.cmp(&b.order))
        });

        for (index, (entity, _)) in batch.iter().enumerate() {
            self.observer.unobserve(*entity);
            self.queued.insert(*entity);
            self.pending
                .push((*entity, StepSchedule::once(Self::STAGGER * index as u32)));
        }
        batch.len()
    }

    pub fn advance(&mut self, delta: Duration) -> Vec<Entity> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(entity, schedule)| {
            let finished = schedule.advance(delta, || Step::Finished) == Step::Finished;
            if finished {
                due.push(*entity);
            }
            !finished
        });
        due
    }

    pub fn watch(
        scroll: Res<PageScroll>,
        mut queue: ResMut<RevealQueue>,
        items: Query<(Entity, &Reveal), Without<Revealed>>,
    ) {
        queue.observe(items.iter(), &scroll);
    }

    pub fn release(
        mut commands: Commands,
        time: Res<Time>,
        mut queue: ResMut<RevealQueue>,
        mut visibilities: Query<&mut Visibility, With<Reveal>>,
    ) {
        if queue.pending.is_empty() {
            return;
        }
        for entity in queue.advance(time.delta()) {
            if let Ok(mut visibility) = visibilities.get_mut(entity) {
                *visibility = Visibility::Inherited;
                commands.entity(entity).insert(Revealed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_entering_together_are_staggered_in_page_order() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();
        let offscreen = world.spawn_empty().id();

        let row = PageSpan::new(100.0, 150.0);
        let items = [
            (second, Reveal { span: row, order: 1 }),
            (first, Reveal { span: row, order: 0 }),
            (offscreen, Reveal { span: PageSpan::new(5000.0, 150.0), order: 2 }),
        ];

        let mut scroll = PageScroll::default();
        scroll.set_extent(6000.0, Vec2::new(1280.0, 720.0));
        let mut queue = RevealQueue::default();

        assert_eq!(queue.observe(items.iter().map(|(e, r)| (*e, r)), &scroll), 2);
        assert_eq!(queue.advance(Duration::ZERO), vec![first]);
        assert!(queue.advance(Duration::from_millis(50)).is_empty());
        assert_eq!(queue.advance(Duration::from_millis(50)), vec![second]);

        assert_eq!(queue.observe(items.iter().map(|(e, r)| (*e, r)), &scroll), 0);
    }
}
