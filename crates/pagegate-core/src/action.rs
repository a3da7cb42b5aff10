//! Permission actions and action sets.

use std::fmt;
use std::str::FromStr;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// An action a principal may be granted on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PermissionAction {
    View,
    Create,
    Edit,
    Delete,
}

impl PermissionAction {
    /// All actions, in declaration order.
    pub const ALL: [PermissionAction; 4] = [
        PermissionAction::View,
        PermissionAction::Create,
        PermissionAction::Edit,
        PermissionAction::Delete,
    ];

    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionAction::View => "View",
            PermissionAction::Create => "Create",
            PermissionAction::Edit => "Edit",
            PermissionAction::Delete => "Delete",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionAction::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownAction(s.to_string()))
    }
}

/// A set of [`PermissionAction`]s.
///
/// Stored as a bitmask; iteration always yields actions in declaration
/// order regardless of insertion order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionSet(u8);

impl ActionSet {
    /// No actions.
    pub const EMPTY: Self = Self(0);

    /// Every action.
    pub const ALL: Self = Self(0b1111);

    /// Create an empty set.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Set containing exactly one action.
    pub const fn only(action: PermissionAction) -> Self {
        Self(action.bit())
    }

    pub fn contains(self, action: PermissionAction) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn insert(&mut self, action: PermissionAction) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: PermissionAction) {
        self.0 &= !action.bit();
    }

    /// Flip membership of `action`. Returns whether it is now present.
    pub fn toggle(&mut self, action: PermissionAction) -> bool {
        self.0 ^= action.bit();
        self.contains(action)
    }

    /// Builder-style insert.
    pub fn with(mut self, action: PermissionAction) -> Self {
        self.insert(action);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_full(self) -> bool {
        self == Self::ALL
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = PermissionAction> {
        PermissionAction::ALL
            .into_iter()
            .filter(move |a| self.contains(*a))
    }
}

impl fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(PermissionAction::as_str).collect();
        f.write_str(&names.join(", "))
    }
}

impl FromIterator<PermissionAction> for ActionSet {
    fn from_iter<I: IntoIterator<Item = PermissionAction>>(iter: I) -> Self {
        let mut set = ActionSet::new();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

impl<const N: usize> From<[PermissionAction; N]> for ActionSet {
    fn from(actions: [PermissionAction; N]) -> Self {
        actions.into_iter().collect()
    }
}

impl Serialize for ActionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for action in self.iter() {
            seq.serialize_element(&action)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ActionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ActionSetVisitor;

        impl<'de> Visitor<'de> for ActionSetVisitor {
            type Value = ActionSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of permission actions")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ActionSet, A::Error> {
                let mut set = ActionSet::new();
                while let Some(action) = seq.next_element::<PermissionAction>()? {
                    set.insert(action);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(ActionSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PermissionAction::*;

    #[test]
    fn test_set_membership() {
        let set = ActionSet::from([View, Edit]);
        assert!(set.contains(View));
        assert!(set.contains(Edit));
        assert!(!set.contains(Create));
        assert!(!set.contains(Delete));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_toggle() {
        let mut set = ActionSet::new();
        assert!(set.toggle(Delete));
        assert!(set.contains(Delete));
        assert!(!set.toggle(Delete));
        assert!(set.is_empty());
    }

    #[test]
    fn test_iteration_is_declaration_order() {
        let set: ActionSet = [Delete, View, Create].into_iter().collect();
        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, vec![View, Create, Delete]);
        assert_eq!(set.to_string(), "View, Create, Delete");
    }

    #[test]
    fn test_all_is_full() {
        assert!(ActionSet::ALL.is_full());
        assert_eq!(ActionSet::ALL.len(), 4);
        for action in PermissionAction::ALL {
            assert!(ActionSet::ALL.contains(action));
        }
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("Edit".parse::<PermissionAction>().unwrap(), Edit);
        assert_eq!("delete".parse::<PermissionAction>().unwrap(), Delete);
        assert!("Publish".parse::<PermissionAction>().is_err());
    }

    #[test]
    fn test_serde_as_list() {
        let set = ActionSet::from([Edit, View]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["View","Edit"]"#);

        let back: ActionSet = serde_json::from_str(r#"["Edit","View","Edit"]"#).unwrap();
        assert_eq!(back, set);
    }
}
