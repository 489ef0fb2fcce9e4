//! Account status derivation.

use crate::models::report::AccountStatus;

/// Derive the account status from the closed-date capture.
///
/// A missing, empty or `-` closed date means the account is still active.
pub fn derive_status(closed_date: Option<&str>) -> AccountStatus {
    match closed_date.map(str::trim) {
        None | Some("") | Some("-") => AccountStatus::Active,
        Some(_) => AccountStatus::Closed,
    }
}
