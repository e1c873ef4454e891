//! Window lifecycle, stacking and drag state for the desktop.
//!
//! [`WindowManager`] is the single owner of every open window. Positions are
//! desktop-local pixels with `y` growing downwards; the view layer converts
//! them into world space.
use bevy::prelude::*;

use super::templates::{DesktopError, TemplateRegistry, WindowKind, WindowTemplateId};
use crate::systems::ui::tabs::TabSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragGesture {
    pointer_origin: Vec2,
    window_origin: Vec2,
}

#[derive(Clone, Debug)]
pub struct WindowInstance {
    id: WindowId,
    template: WindowTemplateId,
    kind: WindowKind,
    position: Vec2,
    order: u64,
    active: bool,
    tabs: Option<TabSet>,
    drag: Option<DragGesture>,
}

impl WindowInstance {
    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn template(&self) -> WindowTemplateId {
        self.template
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn order(&self) -> u64 {
        self.order
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tabs(&self) -> Option<&TabSet> {
        self.tabs.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn move_gesture(&mut self, pointer: Vec2) {
        if let Some(gesture) = self.drag {
            self.position = gesture.window_origin + (pointer - gesture.pointer_origin);
        }
    }
}

/// Diagonal offset applied to each new window, wrapping so repeated opens fan
/// out instead of stacking exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct StaggerCycle {
    offset: f32,
}

impl StaggerCycle {
    const STEP: f32 = 30.0;
    const WRAP: f32 = 150.0;

    fn next(&mut self) -> f32 {
        let current = self.offset;
        self.offset = (self.offset + Self::STEP) % Self::WRAP;
        current
    }
}

#[derive(Resource, Debug)]
pub struct WindowManager {
    next_order: u64,
    next_id: u64,
    stagger: StaggerCycle,
    open: Vec<WindowInstance>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self {
            next_order: Self::ORDER_BASE,
            next_id: 0,
            stagger: StaggerCycle::default(),
            open: Vec::new(),
        }
    }
}

impl WindowManager {
    /// Stacking counter start; the first window receives `ORDER_BASE + 1`.
    pub const ORDER_BASE: u64 = 100;
    pub const BASE_OFFSET: f32 = 50.0;

    fn issue_order(&mut self) -> u64 {
        self.next_order += 1;
        self.next_order
    }

    fn instance_mut(&mut self, id: WindowId) -> Option<&mut WindowInstance> {
        self.open.iter_mut().find(|instance| instance.id == id)
    }

    /// Opens a fresh instance of `template` on top of the stack.
    pub fn open(&mut self, registry: &TemplateRegistry, template: WindowTemplateId) -> WindowId {
        let blueprint = registry.get(template);
        let offset = self.stagger.next();
        let order = self.issue_order();
        let id = WindowId(self.next_id);
        self.next_id += 1;

        let tabs = (blueprint.kind == WindowKind::SysProp).then(|| {
            TabSet::new(
                blueprint.tab_panes().iter().map(|pane| pane.entry()),
                blueprint.default_tab,
            )
        });

        for instance in &mut self.open {
            instance.active = false;
        }
        self.open.push(WindowInstance {
            id,
            template,
            kind: blueprint.kind,
            position: Vec2::splat(Self::BASE_OFFSET + offset),
            order,
            active: true,
            tabs,
            drag: None,
        });
        debug!("opened window {} as {:?} (order {order})", template, id);
        id
    }

    /// Opens a window from an untyped key such as an icon's `data-window`.
    pub fn open_key(
        &mut self,
        registry: &TemplateRegistry,
        key: &str,
    ) -> Result<WindowId, DesktopError> {
        let template = key.parse::<WindowTemplateId>()?;
        Ok(self.open(registry, template))
    }

    /// Raises `id` to the top and makes it the only active window.
    pub fn focus(&mut self, id: WindowId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let order = self.issue_order();
        for instance in &mut self.open {
            instance.active = instance.id == id;
            if instance.active {
                instance.order = order;
            }
        }
        true
    }

    /// Pointer-down on a title bar: focuses the window and starts a gesture.
    pub fn begin_drag(&mut self, id: WindowId, pointer: Vec2) -> bool {
        if !self.focus(id) {
            return false;
        }
        if let Some(instance) = self.instance_mut(id) {
            instance.drag = Some(DragGesture {
                pointer_origin: pointer,
                window_origin: instance.position,
            });
        }
        true
    }

    /// Pointer moved; every window mid-gesture follows the cumulative delta.
    pub fn drag_to(&mut self, pointer: Vec2) {
        for instance in &mut self.open {
            instance.move_gesture(pointer);
        }
    }

    /// Pointer released anywhere; ends every gesture.
    pub fn end_drag(&mut self) {
        for instance in &mut self.open {
            instance.drag = None;
        }
    }

    /// One complete gesture on `id`: focus, move by `delta`, release.
    pub fn drag(&mut self, id: WindowId, delta: Vec2) -> bool {
        if !self.begin_drag(id, Vec2::ZERO) {
            return false;
        }
        if let Some(instance) = self.instance_mut(id) {
            instance.move_gesture(delta);
            instance.drag = None;
        }
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.open.iter().any(WindowInstance::is_dragging)
    }

    /// Removes `id` permanently. Remaining windows keep their flags.
    pub fn close(&mut self, id: WindowId) -> Option<WindowInstance> {
        let index = self.open.iter().position(|instance| instance.id == id)?;
        let closed = self.open.remove(index);
        debug!("closed window {} as {:?}", closed.template, id);
        Some(closed)
    }

    pub fn select_tab(&mut self, id: WindowId, tab: &str) -> bool {
        self.instance_mut(id)
            .and_then(|instance| instance.tabs.as_mut())
            .is_some_and(|tabs| tabs.select(tab))
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowInstance> {
        self.open.iter().find(|instance| instance.id == id)
    }

    pub fn is_template_open(&self, template: WindowTemplateId) -> bool {
        self.open.iter().any(|instance| instance.template == template)
    }

    /// Open windows in creation order.
    pub fn instances(&self) -> &[WindowInstance] {
        &self.open
    }

    /// Open windows bottom to top.
    pub fn stacked(&self) -> Vec<&WindowInstance> {
        let mut stacked: Vec<&WindowInstance> = self.open.iter().collect();
        stacked.sort_by_key(|instance| instance.order);
        stacked
    }

    pub fn topmost(&self) -> Option<&WindowInstance> {
        self.open.iter().max_by_key(|instance| instance.order)
    }

    pub fn active(&self) -> Option<&WindowInstance> {
        self.open.iter().find(|instance| instance.active)
    }

    /// Last stacking value handed out.
    pub fn current_order(&self) -> u64 {
        self.next_order
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
