//! Catalogue of backend resources the portal reads and writes.
//!
//! Each entry names the endpoint path (relative to the backend base URL) and
//! the entity key the backend may wrap the collection in. Keeping the strings
//! here stops them drifting between screens.

/// One backend collection endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resource {
    path: &'static str,
    collection_key: &'static str,
}

impl Resource {
    /// Declare a resource.
    pub const fn new(path: &'static str, collection_key: &'static str) -> Self {
        Self {
            path,
            collection_key,
        }
    }

    /// Endpoint path relative to the backend base URL.
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Entity-named key that may hold the rows, e.g. `sales`.
    pub const fn collection_key(&self) -> &'static str {
        self.collection_key
    }

    /// Path of one member, e.g. `sales/7`.
    pub fn member_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }

    /// Path of an action on one member, e.g. `sales/7/payments`.
    pub fn member_action_path(&self, id: &str, action: &str) -> String {
        format!("{}/{}/{}", self.path, id, action)
    }
}

/// Sales.
pub const SALES: Resource = Resource::new("sales", "sales");
/// Payments recorded against sales.
pub const PAYMENTS: Resource = Resource::new("payments", "payments");
/// Cashier till sessions.
pub const CASH_SESSIONS: Resource = Resource::new("cash-sessions", "sessions");
/// Aggregated cash reports.
pub const CASH_REPORTS: Resource = Resource::new("cash-reports", "reports");
/// Refunds issued against completed sales.
pub const REFUNDS: Resource = Resource::new("refunds", "refunds");
/// Business expenses.
pub const EXPENSES: Resource = Resource::new("expenses", "expenses");
/// Customer credits.
pub const CREDITS: Resource = Resource::new("credits", "credits");
/// Stock on hand.
pub const INVENTORY: Resource = Resource::new("inventory", "inventory");
/// Goods received.
pub const INVENTORY_ARRIVALS: Resource = Resource::new("inventory/arrivals", "arrivals");
/// Stock correction requests.
pub const ADJUSTMENT_REQUESTS: Resource =
    Resource::new("inventory/adjustment-requests", "requests");
/// Stock transfer requests.
pub const STOCK_REQUESTS: Resource = Resource::new("stock-requests", "requests");
/// Audit log.
pub const AUDIT_LOGS: Resource = Resource::new("audit-logs", "logs");
/// Audit action vocabulary.
pub const AUDIT_ACTIONS: Resource = Resource::new("audit-logs/actions", "actions");
/// Staff accounts.
pub const USERS: Resource = Resource::new("users", "users");
/// Customers; supports a server-side `q` filter.
pub const CUSTOMERS: Resource = Resource::new("customers", "customers");
/// Messaging threads.
pub const MESSAGE_THREADS: Resource = Resource::new("messages/threads", "threads");
/// File uploads.
pub const UPLOADS: Resource = Resource::new("uploads", "files");

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn member_paths_nest_under_the_collection() {
        assert_eq!(SALES.member_path("7"), "sales/7");
        assert_eq!(
            SALES.member_action_path("7", "payments"),
            "sales/7/payments"
        );
    }

    #[rstest]
    #[case(SALES)]
    #[case(INVENTORY_ARRIVALS)]
    #[case(MESSAGE_THREADS)]
    fn paths_are_relative(#[case] resource: Resource) {
        assert!(!resource.path().starts_with('/'));
        assert!(!resource.collection_key().is_empty());
    }
}
