//! Two-level category tree rules and projections.
//!
//! Categories form a forest of depth exactly two: top-level parents
//! (`parent_id = None`) and their direct children. Grandchildren are never
//! allowed. This module holds the storage-agnostic pieces: listing order,
//! tree assembly for a given user, the flat "Parent > Child" projection, and
//! the validation rules applied before a write.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::CoreError;
use crate::naming::{same_name, sort_key};
use crate::scope::{visible, Scoped};
use crate::types::DbId;

/// Separator used in the flat projection's full path.
pub const PATH_SEPARATOR: &str = " > ";

/// Level of a top-level category.
pub const LEVEL_PARENT: u8 = 0;

/// Level of a child category.
pub const LEVEL_CHILD: u8 = 1;

/// A category row as seen by the tree rules.
pub trait CategoryNode: Scoped {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Listing order: defaults first, then name ascending (case-insensitive).
///
/// Ties fall back to `id` so listings are fully deterministic.
pub fn listing_order<T: CategoryNode>(a: &T, b: &T) -> Ordering {
    b.is_default()
        .cmp(&a.is_default())
        .then_with(|| sort_key(a.name()).cmp(&sort_key(b.name())))
        .then_with(|| a.id().cmp(&b.id()))
}

pub fn sort_for_listing<T: CategoryNode>(rows: &mut [T]) {
    rows.sort_by(listing_order);
}

/// `0` for parents, `1` for children.
pub fn level(parent_id: Option<DbId>) -> u8 {
    if parent_id.is_some() {
        LEVEL_CHILD
    } else {
        LEVEL_PARENT
    }
}

/// Human-readable path: `"Parent > Child"` for children, the bare name for parents.
pub fn full_name(parent_name: Option<&str>, name: &str) -> String {
    match parent_name {
        Some(parent) => format!("{parent}{PATH_SEPARATOR}{name}"),
        None => name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tree assembly
// ---------------------------------------------------------------------------

/// A top-level category with its children attached.
#[derive(Debug, Clone)]
pub struct Branch<T> {
    pub parent: T,
    pub children: Vec<T>,
}

/// Parent/child totals of an assembled tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeCounts {
    pub parents: usize,
    pub children: usize,
    pub total: usize,
}

/// Assemble the tree a user sees from an unordered set of rows.
///
/// Rows not visible to `user_id` are dropped, as are children whose parent
/// is not among the visible rows. Parents and each child list are sorted in
/// [`listing_order`].
pub fn assemble_tree<T: CategoryNode>(rows: Vec<T>, user_id: DbId) -> Vec<Branch<T>> {
    let (mut parents, children): (Vec<T>, Vec<T>) = rows
        .into_iter()
        .filter(|row| visible(row, user_id))
        .partition(|row| row.parent_id().is_none());

    sort_for_listing(&mut parents);

    let mut by_parent: HashMap<DbId, Vec<T>> = HashMap::new();
    for child in children {
        if let Some(parent_id) = child.parent_id() {
            by_parent.entry(parent_id).or_default().push(child);
        }
    }

    parents
        .into_iter()
        .map(|parent| {
            let mut children = by_parent.remove(&parent.id()).unwrap_or_default();
            sort_for_listing(&mut children);
            Branch { parent, children }
        })
        .collect()
}

pub fn count_tree<T>(branches: &[Branch<T>]) -> TreeCounts {
    let parents = branches.len();
    let children = branches.iter().map(|b| b.children.len()).sum();
    TreeCounts {
        parents,
        children,
        total: parents + children,
    }
}

/// One entry of the flat projection.
#[derive(Debug, Clone)]
pub struct FlatEntry<'a, T> {
    pub node: &'a T,
    pub full_name: String,
    pub level: u8,
}

/// Flatten an assembled tree: each parent followed by its children.
pub fn flatten<T: CategoryNode>(branches: &[Branch<T>]) -> Vec<FlatEntry<'_, T>> {
    let mut out = Vec::new();
    for branch in branches {
        out.push(FlatEntry {
            node: &branch.parent,
            full_name: full_name(None, branch.parent.name()),
            level: LEVEL_PARENT,
        });
        for child in &branch.children {
            out.push(FlatEntry {
                node: child,
                full_name: full_name(Some(branch.parent.name()), child.name()),
                level: LEVEL_CHILD,
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Write validation
// ---------------------------------------------------------------------------

/// Reject a category naming itself as parent.
pub fn reject_self_parent(category_id: DbId, parent_id: Option<DbId>) -> Result<(), CoreError> {
    if parent_id == Some(category_id) {
        return Err(CoreError::Validation(
            "Category cannot be its own parent".to_string(),
        ));
    }
    Ok(())
}

/// Ensure `parent` may hold children: it must itself be top-level.
pub fn validate_parent<T: CategoryNode>(parent: &T) -> Result<(), CoreError> {
    if parent.parent_id().is_some() {
        return Err(CoreError::Validation(
            "Categories can only be nested two levels deep; the selected parent is a subcategory"
                .to_string(),
        ));
    }
    Ok(())
}

/// A category that already has children cannot itself become a child.
pub fn validate_reparent(child_count: i64, new_parent_id: Option<DbId>) -> Result<(), CoreError> {
    if child_count > 0 && new_parent_id.is_some() {
        return Err(CoreError::Validation(
            "A category with subcategories cannot be moved under another category".to_string(),
        ));
    }
    Ok(())
}

/// Whether an update moves the row into a different uniqueness bucket.
pub fn needs_uniqueness_check(
    current_name: &str,
    current_parent: Option<DbId>,
    new_name: &str,
    new_parent: Option<DbId>,
) -> bool {
    !same_name(current_name, new_name) || current_parent != new_parent
}

/// Block deletion of a category that still has live children.
pub fn ensure_childless(child_count: i64) -> Result<(), CoreError> {
    if child_count > 0 {
        return Err(CoreError::Conflict(
            "Cannot delete category that has subcategories".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        id: DbId,
        parent_id: Option<DbId>,
        owner_id: Option<DbId>,
        is_default: bool,
        name: &'static str,
    }

    impl Scoped for Node {
        fn owner_id(&self) -> Option<DbId> {
            self.owner_id
        }
        fn is_default(&self) -> bool {
            self.is_default
        }
    }

    impl CategoryNode for Node {
        fn id(&self) -> DbId {
            self.id
        }
        fn parent_id(&self) -> Option<DbId> {
            self.parent_id
        }
        fn name(&self) -> &str {
            self.name
        }
    }

    fn system(id: DbId, parent_id: Option<DbId>, name: &'static str) -> Node {
        Node {
            id,
            parent_id,
            owner_id: None,
            is_default: true,
            name,
        }
    }

    fn owned(id: DbId, parent_id: Option<DbId>, owner: DbId, name: &'static str) -> Node {
        Node {
            id,
            parent_id,
            owner_id: Some(owner),
            is_default: false,
            name,
        }
    }

    fn names<T: CategoryNode>(rows: &[T]) -> Vec<&str> {
        rows.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn defaults_sort_before_custom_then_alphabetical() {
        let mut rows = vec![
            owned(1, None, 1, "apples"),
            system(2, None, "Zoo"),
            owned(3, None, 1, "Bananas"),
            system(4, None, "art"),
        ];
        sort_for_listing(&mut rows);
        assert_eq!(names(&rows), vec!["art", "Zoo", "apples", "Bananas"]);
    }

    #[test]
    fn tree_attaches_default_children_first() {
        let rows = vec![
            owned(3, Some(1), 10, "Gadgets"),
            system(2, Some(1), "Laptops"),
            system(1, None, "Technology"),
        ];
        let tree = assemble_tree(rows, 10);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].parent.name, "Technology");
        assert_eq!(names(&tree[0].children), vec!["Laptops", "Gadgets"]);
    }

    #[test]
    fn tree_hides_other_users_rows() {
        let rows = vec![
            system(1, None, "Technology"),
            owned(2, Some(1), 20, "Drones"),
            owned(3, None, 20, "Secret"),
            owned(4, Some(1), 10, "Gadgets"),
        ];
        let tree = assemble_tree(rows, 10);
        assert_eq!(tree.len(), 1);
        assert_eq!(names(&tree[0].children), vec!["Gadgets"]);
    }

    #[test]
    fn orphaned_children_are_dropped() {
        let rows = vec![system(1, None, "Technology"), owned(5, Some(99), 10, "Lost")];
        let tree = assemble_tree(rows, 10);
        assert_eq!(count_tree(&tree).children, 0);
    }

    #[test]
    fn counts_parents_and_children() {
        let rows = vec![
            system(1, None, "Technology"),
            system(2, Some(1), "Laptops"),
            system(3, Some(1), "Tablets"),
            owned(4, None, 10, "Garage Stuff"),
        ];
        let counts = count_tree(&assemble_tree(rows, 10));
        assert_eq!(
            counts,
            TreeCounts {
                parents: 2,
                children: 2,
                total: 4
            }
        );
    }

    #[test]
    fn flat_projection_has_paths_and_levels() {
        let rows = vec![
            system(1, None, "Technology"),
            system(2, Some(1), "Laptops"),
            owned(3, None, 10, "Hobby"),
        ];
        let tree = assemble_tree(rows, 10);
        let flat = flatten(&tree);
        let summary: Vec<(&str, u8)> = flat
            .iter()
            .map(|e| (e.full_name.as_str(), e.level))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Technology", 0),
                ("Technology > Laptops", 1),
                ("Hobby", 0)
            ]
        );
        assert_eq!(flat[1].node.id, 2);
    }

    #[test]
    fn level_and_full_name_helpers() {
        assert_eq!(level(None), LEVEL_PARENT);
        assert_eq!(level(Some(1)), LEVEL_CHILD);
        assert_eq!(full_name(Some("A"), "B"), "A > B");
        assert_eq!(full_name(None, "A"), "A");
    }

    #[test]
    fn self_parent_rejected() {
        assert_matches!(reject_self_parent(5, Some(5)), Err(CoreError::Validation(_)));
        assert!(reject_self_parent(5, Some(6)).is_ok());
        assert!(reject_self_parent(5, None).is_ok());
    }

    #[test]
    fn subcategory_cannot_be_a_parent() {
        let child = system(2, Some(1), "Laptops");
        assert_matches!(validate_parent(&child), Err(CoreError::Validation(msg)) if msg.contains("two levels"));
        assert!(validate_parent(&system(1, None, "Technology")).is_ok());
    }

    #[test]
    fn parent_with_children_cannot_move_down() {
        assert_matches!(validate_reparent(2, Some(1)), Err(CoreError::Validation(_)));
        assert!(validate_reparent(2, None).is_ok());
        assert!(validate_reparent(0, Some(1)).is_ok());
    }

    #[test]
    fn uniqueness_recheck_only_on_bucket_change() {
        assert!(!needs_uniqueness_check("Gadgets", Some(1), "gadgets", Some(1)));
        assert!(needs_uniqueness_check("Gadgets", Some(1), "Gizmos", Some(1)));
        assert!(needs_uniqueness_check("Gadgets", Some(1), "Gadgets", None));
    }

    #[test]
    fn childless_guard() {
        assert!(ensure_childless(0).is_ok());
        assert_matches!(ensure_childless(1), Err(CoreError::Conflict(msg)) if msg.contains("subcategories"));
    }
}
