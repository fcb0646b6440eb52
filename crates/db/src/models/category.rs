//! Category entity, request DTOs and response projections.

use inventra_core::category_tree::{self, Branch, CategoryNode, FlatEntry, TreeCounts};
use inventra_core::scope::Scoped;
use inventra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub owner_id: Option<DbId>,
    pub is_default: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Scoped for Category {
    fn owner_id(&self) -> Option<DbId> {
        self.owner_id
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

impl CategoryNode for Category {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// DTO for creating a user-owned category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    pub parent_id: Option<DbId>,
}

/// DTO for updating a category.
///
/// The update replaces both fields: omitting `parent_id` makes the category
/// top-level.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    pub parent_id: Option<DbId>,
}

/// A category as returned by the API. Children are attached in tree views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    /// `None` for system defaults.
    pub owner_id: Option<DbId>,
    pub name: String,
    pub is_default: bool,
    pub is_custom: bool,
    pub is_parent: bool,
    pub level: u8,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryResponse>,
}

impl From<&Category> for CategoryResponse {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            owner_id: c.owner_id,
            name: c.name.clone(),
            is_default: c.is_default,
            is_custom: c.scope().is_custom(),
            is_parent: c.parent_id.is_none(),
            level: category_tree::level(c.parent_id),
            created_at: c.created_at,
            updated_at: c.updated_at,
            children: Vec::new(),
        }
    }
}

/// The nested tree view with totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTreeResponse {
    pub categories: Vec<CategoryResponse>,
    pub total: usize,
    pub parents: usize,
    pub children: usize,
}

impl CategoryTreeResponse {
    /// Nest each branch's children under its parent.
    pub fn from_branches(branches: &[Branch<Category>]) -> Self {
        let TreeCounts {
            parents,
            children,
            total,
        } = category_tree::count_tree(branches);

        let categories = branches
            .iter()
            .map(|branch| CategoryResponse {
                children: branch.children.iter().map(CategoryResponse::from).collect(),
                ..CategoryResponse::from(&branch.parent)
            })
            .collect();

        Self {
            categories,
            total,
            parents,
            children,
        }
    }

    /// A single-level listing (only parents, or the children of one parent).
    pub fn from_level(rows: &[Category]) -> Self {
        let categories: Vec<CategoryResponse> = rows.iter().map(CategoryResponse::from).collect();
        let children = rows.iter().filter(|c| c.parent_id.is_some()).count();
        Self {
            total: categories.len(),
            parents: categories.len() - children,
            children,
            categories,
        }
    }
}

/// One entry of the flat view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFlatEntry {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub owner_id: Option<DbId>,
    pub name: String,
    /// `"Parent > Child"` for children, the bare name for parents.
    pub full_name: String,
    pub is_default: bool,
    pub is_custom: bool,
    pub is_parent: bool,
    pub level: u8,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<FlatEntry<'_, Category>> for CategoryFlatEntry {
    fn from(entry: FlatEntry<'_, Category>) -> Self {
        let c = entry.node;
        Self {
            id: c.id,
            parent_id: c.parent_id,
            owner_id: c.owner_id,
            name: c.name.clone(),
            full_name: entry.full_name,
            is_default: c.is_default,
            is_custom: c.scope().is_custom(),
            is_parent: c.parent_id.is_none(),
            level: entry.level,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFlatResponse {
    pub categories: Vec<CategoryFlatEntry>,
    pub total: usize,
}

impl CategoryFlatResponse {
    pub fn from_branches(branches: &[Branch<Category>]) -> Self {
        let categories: Vec<CategoryFlatEntry> = category_tree::flatten(branches)
            .into_iter()
            .map(CategoryFlatEntry::from)
            .collect();
        Self {
            total: categories.len(),
            categories,
        }
    }
}
