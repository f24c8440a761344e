//! Sibling spacing rules for list-like containers.
//!
//! Whether two neighbours sit tight together or get extra room depends on
//! what kind of entries they are. Nodes carry a [`SpacingRole`] describing
//! that, and [`custom_spacing`] resolves the gap between a node and the one
//! after it.

/// How a node participates in list spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpacingRole {
    /// Ordinary node: the base spacing applies.
    #[default]
    Plain,
    /// A list row. Rows without a sub label stack almost flush.
    ListItem { has_sub_label: bool },
    /// An explicit spacer between groups of rows.
    GroupSpacing,
    /// A key/value table block.
    Table,
}

/// Spacing between a visible entry with role `current` and the entry after it.
pub fn custom_spacing(current: SpacingRole, next: SpacingRole, base: f32) -> f32 {
    match (current, next) {
        (_, SpacingRole::Table) | (SpacingRole::Table, _) => base / 2.0,
        (SpacingRole::ListItem { .. }, SpacingRole::ListItem { has_sub_label: false }) => 2.0,
        (SpacingRole::ListItem { .. }, SpacingRole::GroupSpacing) => 0.0,
        _ => base,
    }
}
