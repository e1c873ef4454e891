//! Tab selection primitive for dialog windows.
//!
//! A [`TabSet`] is a thin data model: an ordered list of tab → pane pairs and
//! the index of the single visible pane. Selecting an unknown tab is a no-op.
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabEntry {
    pub tab: &'static str,
    pub pane: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabSet {
    entries: SmallVec<[TabEntry; 4]>,
    active: Option<usize>,
}

impl TabSet {
    /// Builds a tab set with `default_tab` visible, falling back to the first
    /// entry when the default is missing.
    pub fn new<I>(entries: I, default_tab: Option<&str>) -> Self
    where
        I: IntoIterator<Item = TabEntry>,
    {
        let entries: SmallVec<[TabEntry; 4]> = entries.into_iter().collect();
        let active = default_tab
            .and_then(|tab| entries.iter().position(|entry| entry.tab == tab))
            .or(if entries.is_empty() { None } else { Some(0) });
        Self { entries, active }
    }

    /// Marks `tab` and its pane active. Returns `false` and leaves the set
    /// untouched when `tab` is not part of it.
    pub fn select(&mut self, tab: &str) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.tab == tab) else {
            return false;
        };
        self.active = Some(index);
        true
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<TabEntry> {
        self.active.map(|index| self.entries[index])
    }

    pub fn is_active(&self, tab: &str) -> bool {
        self.active().is_some_and(|entry| entry.tab == tab)
    }

    pub fn entries(&self) -> &[TabEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
