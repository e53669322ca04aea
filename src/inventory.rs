//! Food box inventory, kept as one shelf per box category

use std::collections::VecDeque;

use crate::models::{CategoryCounters, FoodBox, FoodBoxCategory};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inventory {
    shelves: [VecDeque<FoodBox>; 4],
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, category: FoodBoxCategory) -> u32 {
        self.shelves[category.index()].len() as u32
    }

    pub fn counts(&self) -> CategoryCounters {
        let mut counts = CategoryCounters::default();
        for category in FoodBoxCategory::ALL {
            counts[category] = self.count(category);
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.shelves.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shelves.iter().all(VecDeque::is_empty)
    }

    /// Put a box on the shelf for its category
    pub fn add(&mut self, food_box: FoodBox) {
        self.shelves[food_box.category.index()].push_back(food_box);
    }

    /// Take one box of `category`, if any is in stock
    pub fn take(&mut self, category: FoodBoxCategory) -> Option<FoodBox> {
        self.shelves[category.index()].pop_front()
    }

    /// Age every box by one day and discard the ones that have expired.
    /// Returns how many boxes of each category were discarded.
    pub fn remove_expired(&mut self) -> CategoryCounters {
        let mut expired = CategoryCounters::default();
        for category in FoodBoxCategory::ALL {
            let shelf = &mut self.shelves[category.index()];
            let before = shelf.len();
            shelf.retain_mut(|food_box| {
                food_box.days_until_expiry -= 1;
                food_box.days_until_expiry > 0
            });
            expired[category] = (before - shelf.len()) as u32;
        }
        expired
    }

    /// Boxes with at most `days` of shelf life left
    pub fn expiring_within(&self, days: i32) -> u32 {
        self.boxes()
            .filter(|food_box| food_box.days_until_expiry <= days)
            .count() as u32
    }

    pub fn boxes(&self) -> impl Iterator<Item = &FoodBox> + '_ {
        self.shelves.iter().flat_map(|shelf| shelf.iter())
    }

    pub fn to_vec(&self) -> Vec<FoodBox> {
        self.boxes().cloned().collect()
    }
}
