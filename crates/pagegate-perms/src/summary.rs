//! Read-only summaries of a principal's access, as shown on the
//! administration screens.

use serde::Serialize;

use pagegate_core::{ActionSet, PageId, Principal};

use crate::gate::effective_actions;

/// Access to a single page, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "access", content = "actions", rename_all = "snake_case")]
pub enum PageAccess {
    NoAccess,
    Granted(ActionSet),
}

impl PageAccess {
    pub fn for_principal(principal: &Principal, page: PageId) -> Self {
        let actions = effective_actions(principal, page);
        if actions.is_empty() {
            PageAccess::NoAccess
        } else {
            PageAccess::Granted(actions)
        }
    }
}

/// One row of the access matrix: every catalog page, in order.
pub fn access_row(principal: &Principal) -> Vec<(PageId, PageAccess)> {
    PageId::ALL
        .into_iter()
        .map(|page| (page, PageAccess::for_principal(principal, page)))
        .collect()
}

/// Number of explicit (page, action) grants held by `principal`.
///
/// Admins count as zero: their access is implicit.
pub fn grant_count(principal: &Principal) -> usize {
    principal.permissions().grant_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagegate_core::{PermissionAction::*, PermissionMap};

    #[test]
    fn test_access_row() {
        let p = Principal::standard(
            "2",
            "Jane Smith",
            "jane@example.com",
            PermissionMap::new().with(PageId::SalesReports, [View]),
        );
        let row = access_row(&p);
        assert_eq!(row.len(), 10);
        assert_eq!(row[0], (PageId::ProductsList, PageAccess::NoAccess));
        assert_eq!(
            row[8],
            (PageId::SalesReports, PageAccess::Granted(ActionSet::only(View)))
        );
    }

    #[test]
    fn test_grant_count_ignores_admin() {
        let admin = Principal::admin("root", "Root", "root@example.com");
        assert_eq!(grant_count(&admin), 0);
        assert_eq!(
            access_row(&admin)
                .iter()
                .filter(|(_, a)| *a == PageAccess::Granted(ActionSet::ALL))
                .count(),
            10
        );
    }
}
