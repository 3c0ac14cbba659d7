use crate::config::{ChartConfig, ChartType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved chart: a chart type and config bound to one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: String,
    pub dataset_id: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(default)]
    pub config: ChartConfig,
    #[serde(default)]
    pub shared_with: Vec<String>,
}

impl Visualization {
    pub fn new(
        name: impl Into<String>,
        owner_id: impl Into<String>,
        dataset_id: impl Into<String>,
        chart_type: ChartType,
        config: ChartConfig,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
            owner_id: owner_id.into(),
            dataset_id: dataset_id.into(),
            chart_type,
            config,
            shared_with: Vec::new(),
        }
    }

    /// Name the editor proposes for a new chart, e.g. `Bar of Sales`.
    pub fn default_name(chart_type: &ChartType, dataset_name: &str) -> String {
        let tag = chart_type.as_str();
        let mut chars = tag.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("{capitalized} of {dataset_name}")
    }
}

/// Cell rectangle of a dashboard item, in grid units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridPosition {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardItem {
    pub id: String,
    pub visualization_id: String,
    #[serde(flatten)]
    pub position: GridPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: String,
    #[serde(default, rename = "visualizations")]
    pub items: Vec<DashboardItem>,
    #[serde(default)]
    pub shared_with: Vec<String>,
}

impl Dashboard {
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
            owner_id: owner_id.into(),
            items: Vec::new(),
            shared_with: Vec::new(),
        }
    }

    /// Places a visualization on the grid. Item ids are `{dashboard}-{visualization}-{millis}`,
    /// with a numeric suffix appended if that id is already taken.
    pub fn add_item(&mut self, visualization_id: &str, position: GridPosition) -> &DashboardItem {
        let now = Utc::now();
        let base = format!("{}-{}-{}", self.id, visualization_id, now.timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while self.items.iter().any(|item| item.id == id) {
            id = format!("{base}-{n}");
            n += 1;
        }
        self.items.push(DashboardItem {
            id,
            visualization_id: visualization_id.to_string(),
            position,
        });
        self.updated_at = now;
        let last = self.items.len() - 1;
        &self.items[last]
    }

    /// Moves every item showing `visualization_id`; returns how many were moved.
    pub fn update_item_position(&mut self, visualization_id: &str, position: GridPosition) -> usize {
        let mut moved = 0;
        for item in self
            .items
            .iter_mut()
            .filter(|item| item.visualization_id == visualization_id)
        {
            item.position = position;
            moved += 1;
        }
        if moved > 0 {
            self.updated_at = Utc::now();
        }
        moved
    }

    /// Removes every item showing `visualization_id`; returns how many were removed.
    pub fn remove_items(&mut self, visualization_id: &str) -> usize {
        let before = self.items.len();
        self.items
            .retain(|item| item.visualization_id != visualization_id);
        let removed = before - self.items.len();
        if removed > 0 {
            self.updated_at = Utc::now();
        }
        removed
    }
}
