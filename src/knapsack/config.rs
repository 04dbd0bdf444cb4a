use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ReplayError;

/// Largest accepted capacity
pub const MAX_CAPACITY: usize = 50;

/// Most items accepted
pub const MAX_ITEMS: usize = 12;

/// A candidate item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Display name
    pub name: String,
    /// Weight, at least 1
    pub weight: usize,
    /// Value
    pub value: u64,
}

impl Item {
    /// Create an item
    pub fn new(name: impl Into<String>, weight: usize, value: u64) -> Self {
        Self {
            name: name.into(),
            weight,
            value,
        }
    }
}

/// Capacity and item list
///
/// JSON shape: `{"capacity": 10, "items": [{"name": "a", "weight": 2, "value": 6}]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnapsackConfig {
    /// Knapsack capacity
    pub capacity: usize,
    /// Items, 1-based in the table
    pub items: Vec<Item>,
}

impl KnapsackConfig {
    /// Build a config without validating it
    pub fn new(capacity: usize, items: Vec<Item>) -> Self {
        Self { capacity, items }
    }

    /// Capacity in `1..=MAX_CAPACITY`, `1..=MAX_ITEMS` items, weights `>= 1`
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ReplayError::InvalidCapacity {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        if self.items.is_empty() {
            return Err(ReplayError::EmptyItems);
        }
        if self.items.len() > MAX_ITEMS {
            return Err(ReplayError::TooManyItems {
                count: self.items.len(),
                max: MAX_ITEMS,
            });
        }
        if let Some(index) = self.items.iter().position(|item| item.weight == 0) {
            return Err(ReplayError::InvalidItem {
                index,
                reason: "weight must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config; any problem is an import failure
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ReplayError::ImportFailed(e.to_string()))?;
        config
            .validate()
            .map_err(|e| ReplayError::ImportFailed(e.to_string()))?;
        Ok(config)
    }

    /// Serialize to the import shape
    pub fn to_json(&self) -> Result<String, ReplayError> {
        serde_json::to_string_pretty(self).map_err(|e| ReplayError::InvalidConfig(e.to_string()))
    }
}

impl Default for KnapsackConfig {
    fn default() -> Self {
        Self::new(
            10,
            vec![
                Item::new("Item 1", 2, 6),
                Item::new("Item 2", 3, 8),
                Item::new("Item 3", 4, 12),
                Item::new("Item 4", 5, 15),
            ],
        )
    }
}

/// 3 to 7 items, weights `1..=5` (at most `capacity`), values `5..=14`
pub fn random_items<R: Rng + ?Sized>(capacity: usize, rng: &mut R) -> Vec<Item> {
    let count = rng.gen_range(3..=7usize);
    (1..=count)
        .map(|i| Item {
            name: format!("Item {}", i),
            weight: rng.gen_range(1..=5).min(capacity.max(1)),
            value: rng.gen_range(5..=14),
        })
        .collect()
}
