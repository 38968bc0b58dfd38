//! Category entity: a named product grouping with an optional parent.

use serde::{Deserialize, Serialize};

use tradedesk_core::policy::{require_max_chars, require_present};
use tradedesk_core::{DomainError, DomainResult, Entity, EntityId};

/// Longest accepted category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 50;

/// Characters not allowed in category names.
pub const FORBIDDEN_NAME_CHARS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '<', '>', '?', '/', '\\', '|', '{', '}',
    '[', ']', '~', '`', ';', ':', '"', '\'', '+', '=',
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub EntityId);

impl CategoryId {
    pub fn new() -> Self {
        Self(EntityId::new())
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Product grouping.
///
/// Only direct self-parenting is rejected; longer cycles (A -> B -> A) need the
/// whole category tree and are not detected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CategoryRecord")]
pub struct Category {
    id: CategoryId,
    name: String,
    parent_id: Option<CategoryId>,
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    id: CategoryId,
    name: String,
    #[serde(default)]
    parent_id: Option<CategoryId>,
}

impl TryFrom<CategoryRecord> for Category {
    type Error = DomainError;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        Category::of(record.id, record.name, record.parent_id)
    }
}

impl Category {
    /// Create a new category with a fresh id.
    pub fn create(name: impl Into<String>, parent_id: Option<CategoryId>) -> DomainResult<Self> {
        Self::of(CategoryId::new(), name, parent_id)
    }

    /// Rebuild a category with a known id (e.g. loaded from storage).
    pub fn of(
        id: CategoryId,
        name: impl Into<String>,
        parent_id: Option<CategoryId>,
    ) -> DomainResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        validate_parent(id, parent_id)?;
        Ok(Self {
            id,
            name,
            parent_id,
        })
    }

    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_id(&self) -> Option<CategoryId> {
        self.parent_id
    }

    pub fn update_name(&self, name: impl Into<String>) -> DomainResult<Self> {
        Self::of(self.id, name, self.parent_id)
    }

    pub fn update_parent_id(&self, parent_id: Option<CategoryId>) -> DomainResult<Self> {
        Self::of(self.id, self.name.clone(), parent_id)
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    require_present(name, "category name")?;
    require_max_chars(name, MAX_CATEGORY_NAME_LEN, "category name")?;
    if name.contains(FORBIDDEN_NAME_CHARS) {
        return Err(DomainError::validation(
            "category name must not contain special characters",
        ));
    }
    Ok(())
}

fn validate_parent(id: CategoryId, parent_id: Option<CategoryId>) -> DomainResult<()> {
    if parent_id == Some(id) {
        return Err(DomainError::validation(
            "a category cannot be its own parent",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_with_valid_name() {
        let category = Category::create("Test Category", None).unwrap();
        assert_eq!(category.name(), "Test Category");
        assert_eq!(category.parent_id(), None);
    }

    #[test]
    fn create_generates_unique_ids() {
        let a = Category::create("A", None).unwrap();
        let b = Category::create("A", None).unwrap();
        assert_ne!(a.id_typed(), b.id_typed());
        assert!(!a.same_identity_as(&b));
    }

    #[test]
    fn create_rejects_empty_name() {
        for name in ["", "   "] {
            let err = Category::create(name, None).unwrap_err();
            assert_eq!(err.message(), "category name is required");
        }
    }

    #[test]
    fn create_with_parent() {
        let parent = Category::create("Parent Category", None).unwrap();
        let child = Category::create("Child Category", Some(parent.id_typed())).unwrap();
        assert_eq!(child.parent_id(), Some(parent.id_typed()));
    }

    #[test]
    fn name_length_limit() {
        assert!(Category::create("a".repeat(MAX_CATEGORY_NAME_LEN), None).is_ok());
        let err = Category::create("a".repeat(MAX_CATEGORY_NAME_LEN + 1), None).unwrap_err();
        assert_eq!(err.message(), "category name must be at most 50 characters");
    }

    #[test]
    fn name_rejects_special_characters() {
        let err = Category::create("Test!@#$%^&*()", None).unwrap_err();
        assert_eq!(
            err.message(),
            "category name must not contain special characters"
        );
        assert!(Category::create("Snacks & Drinks", None).is_err());
        assert!(Category::create("Snacks - Drinks 2", None).is_ok());
        assert!(Category::create("음료", None).is_ok());
    }

    #[test]
    fn update_name_returns_new_instance() {
        let category = Category::create("Old Name", None).unwrap();
        let renamed = category.update_name("New Name").unwrap();

        assert_eq!(renamed.name(), "New Name");
        assert_eq!(renamed.id_typed(), category.id_typed());
        assert_eq!(category.name(), "Old Name");
    }

    #[test]
    fn update_name_validates() {
        let category = Category::create("Test", None).unwrap();
        assert!(category.update_name("").is_err());
    }

    #[test]
    fn update_parent_id() {
        let child = Category::create("Child Category", None).unwrap();
        let parent = Category::create("Parent Category", None).unwrap();

        let updated = child.update_parent_id(Some(parent.id_typed())).unwrap();
        assert_eq!(updated.parent_id(), Some(parent.id_typed()));
        assert_eq!(child.parent_id(), None);

        let detached = updated.update_parent_id(None).unwrap();
        assert_eq!(detached.parent_id(), None);
    }

    #[test]
    fn cannot_be_its_own_parent() {
        let category = Category::create("Test Category", None).unwrap();
        let err = category
            .update_parent_id(Some(category.id_typed()))
            .unwrap_err();
        assert_eq!(err.message(), "a category cannot be its own parent");

        let id = CategoryId::new();
        assert!(Category::of(id, "Loop", Some(id)).is_err());
    }

    #[test]
    fn two_hop_cycles_are_not_detected() {
        let a = Category::create("A", None).unwrap();
        let b = Category::create("B", Some(a.id_typed())).unwrap();
        assert!(a.update_parent_id(Some(b.id_typed())).is_ok());
    }
}
