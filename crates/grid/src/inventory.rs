//! Placeable definitions the player owns, plus the paging used to list them.

use std::fmt;
use std::ops::Range;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Unique key of a placeable definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceableId(pub String);

impl PlaceableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something the player can put on the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceableDefinition {
    pub id: PlaceableId,
    pub name: String,
    pub brief: String,
    pub description: String,
    /// Size in cells; both axes are at least 1.
    pub footprint: UVec2,
    pub cost: u32,
    /// How many the player still holds.
    pub count: u32,
    /// sRGBA tint of the spawned model.
    pub color: [f32; 4],
    /// Box height used to draw and pick the placed object.
    pub height: f32,
}

impl PlaceableDefinition {
    pub fn new(id: impl Into<String>, footprint: UVec2, count: u32) -> Self {
        let id = PlaceableId::new(id);
        Self {
            name: id.0.clone(),
            id,
            brief: String::new(),
            description: String::new(),
            footprint,
            cost: 0,
            count,
            color: [0.8, 0.8, 0.8, 1.0],
            height: crate::config::DEFAULT_OBJECT_HEIGHT,
        }
    }
}

/// What the placement controller needs from whoever tracks owned placeables.
pub trait PlaceableInventory {
    /// Lower the remaining count of `id`, dropping the entry when it runs out.
    fn decrement_count(&mut self, id: &PlaceableId, amount: u32);
    /// Remaining count, 0 when `id` is unknown.
    fn count_of(&self, id: &PlaceableId) -> u32;
    fn current_selection(&self) -> Option<&PlaceableDefinition>;
}

/// Ordered list of owned placeables and the one picked for building.
#[derive(Resource, Debug, Clone, Default)]
pub struct Inventory {
    entries: Vec<PlaceableDefinition>,
    selection: Option<PlaceableId>,
}

impl Inventory {
    pub fn from_definitions(defs: impl IntoIterator<Item = PlaceableDefinition>) -> Self {
        let mut inventory = Self::default();
        for def in defs {
            inventory.add(def);
        }
        inventory
    }

    /// Add a definition, merging counts with an existing entry of the same id.
    pub fn add(&mut self, def: PlaceableDefinition) {
        if def.count == 0 {
            return;
        }
        match self.entries.iter_mut().find(|e| e.id == def.id) {
            Some(existing) => existing.count = existing.count.saturating_add(def.count),
            None => self.entries.push(def),
        }
    }

    pub fn remove_all(&mut self, id: &PlaceableId) {
        self.entries.retain(|e| &e.id != id);
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
    }

    /// Take `amount` away from an entry; it disappears once nothing is left.
    pub fn remove(&mut self, id: &PlaceableId, amount: u32) {
        let Some(pos) = self.entries.iter().position(|e| &e.id == id) else {
            return;
        };
        let entry = &mut self.entries[pos];
        entry.count = entry.count.saturating_sub(amount);
        if entry.count == 0 {
            self.remove_all(id);
        }
    }

    pub fn contains(&self, id: &PlaceableId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    pub fn get(&self, id: &PlaceableId) -> Option<&PlaceableDefinition> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn entries(&self) -> &[PlaceableDefinition] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Select an owned placeable. Returns false (and keeps the old selection)
    /// when `id` is not in the inventory.
    pub fn select(&mut self, id: &PlaceableId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selection = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_id(&self) -> Option<&PlaceableId> {
        self.selection.as_ref()
    }
}

impl PlaceableInventory for Inventory {
    fn decrement_count(&mut self, id: &PlaceableId, amount: u32) {
        self.remove(id, amount);
    }

    fn count_of(&self, id: &PlaceableId) -> u32 {
        self.get(id).map_or(0, |e| e.count)
    }

    fn current_selection(&self) -> Option<&PlaceableDefinition> {
        self.selection.as_ref().and_then(|id| self.get(id))
    }
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

pub const PLACEABLES_PER_PAGE: usize = 8;

pub fn page_count(entries: usize) -> usize {
    entries.div_ceil(PLACEABLES_PER_PAGE)
}

/// Entry indices shown on 1-based `page`. Empty for page 0 or past the end.
pub fn page_range(page: usize, entries: usize) -> Range<usize> {
    if page == 0 {
        return 0..0;
    }
    let start = ((page - 1) * PLACEABLES_PER_PAGE).min(entries);
    let end = (start + PLACEABLES_PER_PAGE).min(entries);
    start..end
}

/// Current page of the inventory list, 1-based.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    current: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl Pager {
    pub fn current(&self) -> usize {
        self.current
    }

    /// Jump to `page`. Page 0 is ignored.
    pub fn show(&mut self, page: usize) {
        if page != 0 {
            self.current = page;
        }
    }

    pub fn next(&mut self, entries: usize) {
        let pages = page_count(entries);
        if pages == 0 {
            return;
        }
        self.current = if self.current >= pages {
            1
        } else {
            self.current + 1
        };
    }

    pub fn previous(&mut self, entries: usize) {
        let pages = page_count(entries);
        if pages == 0 {
            return;
        }
        self.current = if self.current <= 1 || self.current > pages {
            pages
        } else {
            self.current - 1
        };
    }

    /// Pull the page back into range after the inventory shrank.
    pub fn clamp(&mut self, entries: usize) {
        self.current = self.current.clamp(1, page_count(entries).max(1));
    }

    pub fn visible_range(&self, entries: usize) -> Range<usize> {
        page_range(self.current, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: &str, count: u32) -> PlaceableDefinition {
        PlaceableDefinition::new(id, UVec2::ONE, count)
    }

    #[test]
    fn test_add_merges_counts_by_id() {
        let mut inv = Inventory::default();
        inv.add(def("fence", 2));
        inv.add(def("shed", 1));
        inv.add(def("fence", 3));
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.count_of(&PlaceableId::new("fence")), 5);
        assert_eq!(inv.entries()[0].id.as_str(), "fence");
    }

    #[test]
    fn test_add_ignores_zero_count() {
        let mut inv = Inventory::default();
        inv.add(def("fence", 0));
        assert!(inv.is_empty());
    }

    #[test]
    fn test_remove_drops_entry_at_zero() {
        let mut inv = Inventory::from_definitions([def("fence", 2)]);
        let id = PlaceableId::new("fence");
        inv.remove(&id, 1);
        assert_eq!(inv.count_of(&id), 1);
        inv.remove(&id, 5);
        assert!(!inv.contains(&id));
        assert_eq!(inv.count_of(&id), 0);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut inv = Inventory::from_definitions([def("fence", 2)]);
        inv.remove(&PlaceableId::new("barn"), 1);
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_remove_all_clears_selection() {
        let mut inv = Inventory::from_definitions([def("fence", 2), def("shed", 1)]);
        let id = PlaceableId::new("fence");
        assert!(inv.select(&id));
        inv.remove_all(&id);
        assert!(inv.current_selection().is_none());
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_select_requires_owned_id() {
        let mut inv = Inventory::from_definitions([def("fence", 1)]);
        assert!(!inv.select(&PlaceableId::new("barn")));
        assert!(inv.current_selection().is_none());
        assert!(inv.select(&PlaceableId::new("fence")));
        assert_eq!(inv.current_selection().map(|d| d.count), Some(1));
    }

    #[test]
    fn test_decrement_last_unit_drops_selection() {
        let mut inv = Inventory::from_definitions([def("fence", 1)]);
        let id = PlaceableId::new("fence");
        inv.select(&id);
        inv.decrement_count(&id, 1);
        assert!(inv.current_selection().is_none());
        assert!(inv.selected_id().is_none());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(8), 1);
        assert_eq!(page_count(9), 2);
        assert_eq!(page_count(17), 3);
    }

    #[test]
    fn test_page_range() {
        assert_eq!(page_range(1, 10), 0..8);
        assert_eq!(page_range(2, 10), 8..10);
        assert_eq!(page_range(3, 10), 10..10);
        assert_eq!(page_range(0, 10), 0..0);
    }

    #[test]
    fn test_pager_wraps_both_ways() {
        let mut pager = Pager::default();
        pager.next(20);
        pager.next(20);
        assert_eq!(pager.current(), 3);
        pager.next(20);
        assert_eq!(pager.current(), 1);
        pager.previous(20);
        assert_eq!(pager.current(), 3);
        pager.previous(20);
        assert_eq!(pager.current(), 2);
    }

    #[test]
    fn test_pager_empty_inventory_is_noop() {
        let mut pager = Pager::default();
        pager.next(0);
        pager.previous(0);
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn test_pager_show_ignores_zero_and_clamps() {
        let mut pager = Pager::default();
        pager.show(0);
        assert_eq!(pager.current(), 1);
        pager.show(4);
        assert_eq!(pager.current(), 4);
        pager.clamp(9);
        assert_eq!(pager.current(), 2);
        assert_eq!(pager.visible_range(9), 8..9);
    }
}
