//! Classification of packages into the two report categories
//!
//! - out of date: the newest published version differs from the declared one
//! - can be bumped: the installed version differs from the declared one
//!
//! Packages without an installed version are left out of both.

use crate::domain::{Ledger, Package};
use serde::Serialize;

/// Rules applied while classifying packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilePolicy {
    /// When set, a package whose latest version is unknown is never out of date
    pub require_latest: bool,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            require_latest: true,
        }
    }
}

/// Result of classifying a ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Packages whose newest version differs from the declared one
    pub out_of_date: Vec<Package>,
    /// Packages whose installed version differs from the declared one
    pub can_be_bumped: Vec<Package>,
    /// Whether any package in the ledger had an installed version
    pub has_installed: bool,
}

impl Reconciliation {
    /// True when neither category has entries
    pub fn is_empty(&self) -> bool {
        self.out_of_date.is_empty() && self.can_be_bumped.is_empty()
    }
}

/// Classify every package of the ledger, keeping ledger order
pub fn reconcile(ledger: &Ledger, policy: ReconcilePolicy) -> Reconciliation {
    let mut result = Reconciliation {
        has_installed: ledger.has_installed(),
        ..Default::default()
    };

    for package in ledger.iter().filter(|p| p.installed_version.is_some()) {
        if package.latest_differs(policy.require_latest) {
            result.out_of_date.push(package.clone());
        }
        if package.installed_differs() {
            result.can_be_bumped.push(package.clone());
        }
    }

    tracing::debug!(
        out_of_date = result.out_of_date.len(),
        can_be_bumped = result.can_be_bumped.len(),
        "reconciled"
    );

    result
}
