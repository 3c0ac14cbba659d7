//! In-memory entity stores.
//!
//! Stores are plain values owned by a [`Workspace`]; callers pass the workspace explicitly.
//! Reads are open; updates, deletion and sharing require the acting user to own the entity.

use crate::config::{ChartConfig, ChartType};
use crate::dataset::Dataset;
use crate::entities::{Dashboard, DashboardItem, GridPosition, Visualization};
use chrono::Utc;
use indexmap::IndexMap;

pub type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("permission denied for {id}")]
    Forbidden { id: String },

    #[error("invalid input: {message}")]
    Invalid { message: String },
}

/// What a repository needs to know about a stored entity.
pub trait Entity {
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn owner_id(&self) -> &str;
    fn shared_with(&self) -> &[String];
    fn shared_with_mut(&mut self) -> &mut Vec<String>;
    fn touch(&mut self);
}

macro_rules! impl_entity {
    ($ty:ty, $kind:literal) => {
        impl Entity for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn owner_id(&self) -> &str {
                &self.owner_id
            }

            fn shared_with(&self) -> &[String] {
                &self.shared_with
            }

            fn shared_with_mut(&mut self) -> &mut Vec<String> {
                &mut self.shared_with
            }

            fn touch(&mut self) {
                self.updated_at = Utc::now();
            }
        }
    };
}

impl_entity!(Dataset, "dataset");
impl_entity!(Visualization, "visualization");
impl_entity!(Dashboard, "dashboard");

pub trait Repository<T: Entity> {
    /// Stores a new entity. Fails with `Invalid` on an empty name or a duplicate id.
    fn insert(&mut self, item: T) -> RepoResult<&T>;

    fn get(&self, id: &str) -> RepoResult<&T>;

    /// Applies `edit` to the entity owned by `actor` and bumps its `updated_at`.
    fn update<F>(&mut self, id: &str, actor: &str, edit: F) -> RepoResult<&T>
    where
        F: FnOnce(&mut T);

    fn delete(&mut self, id: &str, actor: &str) -> RepoResult<T>;

    /// Grants read access to `email`. Sharing twice with the same address is a no-op.
    fn share(&mut self, id: &str, actor: &str, email: &str) -> RepoResult<&[String]>;

    /// Entities owned by `owner`, newest first.
    fn list_by_owner(&self, owner: &str) -> Vec<&T>;

    /// Entities shared with `email`, newest first.
    fn list_shared_with(&self, email: &str) -> Vec<&T>;
}

#[derive(Debug, Clone)]
pub struct InMemoryRepository<T> {
    items: IndexMap<String, T>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    fn owned_mut(&mut self, id: &str, actor: &str) -> RepoResult<&mut T> {
        let item = self.items.get_mut(id).ok_or_else(|| not_found::<T>(id))?;
        if item.owner_id() != actor {
            tracing::debug!(kind = T::KIND, id, actor, "rejecting write by non-owner");
            return Err(RepoError::Forbidden { id: id.to_string() });
        }
        Ok(item)
    }
}

fn not_found<T: Entity>(id: &str) -> RepoError {
    RepoError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn insert(&mut self, item: T) -> RepoResult<&T> {
        if item.name().trim().is_empty() {
            return Err(RepoError::Invalid {
                message: format!("{} name must not be empty", T::KIND),
            });
        }
        if self.items.contains_key(item.id()) {
            return Err(RepoError::Invalid {
                message: format!("duplicate {} id {}", T::KIND, item.id()),
            });
        }
        let id = item.id().to_string();
        tracing::debug!(kind = T::KIND, id = %id, "inserting entity");
        let entry = self.items.entry(id).or_insert(item);
        Ok(&*entry)
    }

    fn get(&self, id: &str) -> RepoResult<&T> {
        self.items.get(id).ok_or_else(|| not_found::<T>(id))
    }

    fn update<F>(&mut self, id: &str, actor: &str, edit: F) -> RepoResult<&T>
    where
        F: FnOnce(&mut T),
    {
        let item = self.owned_mut(id, actor)?;
        edit(&mut *item);
        item.touch();
        Ok(&*item)
    }

    fn delete(&mut self, id: &str, actor: &str) -> RepoResult<T> {
        self.owned_mut(id, actor)?;
        tracing::debug!(kind = T::KIND, id, "deleting entity");
        self.items
            .shift_remove(id)
            .ok_or_else(|| not_found::<T>(id))
    }

    fn share(&mut self, id: &str, actor: &str, email: &str) -> RepoResult<&[String]> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(RepoError::Invalid {
                message: format!("not an email address: {email:?}"),
            });
        }
        let item = self.owned_mut(id, actor)?;
        if !item.shared_with().iter().any(|e| e == email) {
            item.shared_with_mut().push(email.to_string());
            item.touch();
        }
        Ok(item.shared_with())
    }

    fn list_by_owner(&self, owner: &str) -> Vec<&T> {
        self.items
            .values()
            .rev()
            .filter(|item| item.owner_id() == owner)
            .collect()
    }

    fn list_shared_with(&self, email: &str) -> Vec<&T> {
        self.items
            .values()
            .rev()
            .filter(|item| item.shared_with().iter().any(|e| e == email))
            .collect()
    }
}

/// All stores an application session works against.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub datasets: InMemoryRepository<Dataset>,
    pub visualizations: InMemoryRepository<Visualization>,
    pub dashboards: InMemoryRepository<Dashboard>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a visualization over an existing dataset.
    pub fn create_visualization(
        &mut self,
        owner_id: &str,
        name: &str,
        dataset_id: &str,
        chart_type: ChartType,
        config: ChartConfig,
    ) -> RepoResult<&Visualization> {
        self.datasets.get(dataset_id)?;
        let vis = Visualization::new(name, owner_id, dataset_id, chart_type, config);
        self.visualizations.insert(vis)
    }

    pub fn visualizations_for_dataset(&self, dataset_id: &str) -> Vec<&Visualization> {
        self.visualizations
            .iter()
            .filter(|v| v.dataset_id == dataset_id)
            .collect()
    }

    /// A visualization together with the dataset it draws from.
    pub fn chart_inputs(&self, visualization_id: &str) -> RepoResult<(&Visualization, &Dataset)> {
        let vis = self.visualizations.get(visualization_id)?;
        let dataset = self.datasets.get(&vis.dataset_id)?;
        Ok((vis, dataset))
    }

    pub fn add_to_dashboard(
        &mut self,
        dashboard_id: &str,
        actor: &str,
        visualization_id: &str,
        position: GridPosition,
    ) -> RepoResult<DashboardItem> {
        self.visualizations.get(visualization_id)?;
        let dashboard = self.dashboards.owned_mut(dashboard_id, actor)?;
        Ok(dashboard.add_item(visualization_id, position).clone())
    }

    pub fn move_on_dashboard(
        &mut self,
        dashboard_id: &str,
        actor: &str,
        visualization_id: &str,
        position: GridPosition,
    ) -> RepoResult<usize> {
        let dashboard = self.dashboards.owned_mut(dashboard_id, actor)?;
        Ok(dashboard.update_item_position(visualization_id, position))
    }

    pub fn remove_from_dashboard(
        &mut self,
        dashboard_id: &str,
        actor: &str,
        visualization_id: &str,
    ) -> RepoResult<usize> {
        let dashboard = self.dashboards.owned_mut(dashboard_id, actor)?;
        Ok(dashboard.remove_items(visualization_id))
    }
}
