//! Level map: tiles grouped by the height of the plane they lie in.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use crate::constants::EPSILON;
use crate::grid::TileId;

/// A level's plane height, totally ordered so it can key a map
#[derive(Debug, Clone, Copy)]
pub struct LevelHeight(pub f32);

impl PartialEq for LevelHeight {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LevelHeight {}

impl PartialOrd for LevelHeight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LevelHeight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Ordered map height -> tiles of that level, in insertion order.
/// Heights within `EPSILON` of each other are the same level.
#[derive(Debug, Clone, Default)]
pub struct LevelMap {
    levels: BTreeMap<LevelHeight, Vec<TileId>>,
}

impl LevelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tile` to the level at `height` (creating it if needed)
    pub fn insert(&mut self, height: f32, tile: TileId) {
        let key = self.key_near(height).unwrap_or(LevelHeight(height));
        let tiles = self.levels.entry(key).or_default();
        if !tiles.contains(&tile) {
            tiles.push(tile);
        }
    }

    /// Drop `tile` from every level, removing levels left empty
    pub fn remove(&mut self, tile: TileId) {
        for tiles in self.levels.values_mut() {
            tiles.retain(|t| *t != tile);
        }
        self.levels.retain(|_, tiles| !tiles.is_empty());
    }

    /// Tiles of the level at `height`
    pub fn level(&self, height: f32) -> &[TileId] {
        self.key_near(height)
            .and_then(|key| self.levels.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Levels strictly above `y`, nearest first
    pub fn higher_than(&self, y: f32) -> impl Iterator<Item = (f32, &[TileId])> + '_ {
        self.levels
            .range((Bound::Excluded(LevelHeight(y + EPSILON)), Bound::Unbounded))
            .map(|(h, tiles)| (h.0, tiles.as_slice()))
    }

    /// Levels strictly below `y`, nearest first
    pub fn lower_than(&self, y: f32) -> impl Iterator<Item = (f32, &[TileId])> + '_ {
        self.levels
            .range((Bound::Unbounded, Bound::Excluded(LevelHeight(y - EPSILON))))
            .rev()
            .map(|(h, tiles)| (h.0, tiles.as_slice()))
    }

    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.levels.keys().map(|h| h.0)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    fn key_near(&self, height: f32) -> Option<LevelHeight> {
        self.levels
            .range(LevelHeight(height - EPSILON)..=LevelHeight(height + EPSILON))
            .map(|(key, _)| *key)
            .min_by(|a, b| {
                (a.0 - height)
                    .abs()
                    .total_cmp(&(b.0 - height).abs())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::test_ids;

    fn sample() -> (LevelMap, Vec<TileId>) {
        let ids = test_ids(5);
        let mut map = LevelMap::new();
        map.insert(0.0, ids[0]);
        map.insert(2.0, ids[1]);
        map.insert(2.0, ids[2]);
        map.insert(4.0, ids[3]);
        map.insert(-2.0, ids[4]);
        (map, ids)
    }

    #[test]
    fn test_level_keeps_insertion_order() {
        let (map, ids) = sample();
        assert_eq!(map.level(2.0), &ids[1..3]);
        assert_eq!(map.level(2.01), &ids[1..3], "near heights share a level");
        assert!(map.level(3.0).is_empty());
    }

    #[test]
    fn test_duplicate_insert_ignored() {
        let (mut map, ids) = sample();
        map.insert(0.0, ids[0]);
        assert_eq!(map.level(0.0), &ids[..1]);
    }

    #[test]
    fn test_higher_than_ascending() {
        let (map, _) = sample();
        let heights: Vec<f32> = map.higher_than(0.0).map(|(h, _)| h).collect();
        assert_eq!(heights, vec![2.0, 4.0]);
    }

    #[test]
    fn test_lower_than_descending() {
        let (map, _) = sample();
        let heights: Vec<f32> = map.lower_than(4.0).map(|(h, _)| h).collect();
        assert_eq!(heights, vec![2.0, 0.0, -2.0]);
    }

    #[test]
    fn test_remove_drops_empty_levels() {
        let (mut map, ids) = sample();
        map.remove(ids[3]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.heights().collect::<Vec<_>>(), vec![-2.0, 0.0, 2.0]);
    }
}
