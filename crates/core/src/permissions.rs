//! Capability checks for resource access.
//!
//! One pure function answers "may this role, standing in this relation to
//! the resource, perform this action?". The HTTP extractors delegate here so
//! the authorization matrix is testable without an axum router.

use crate::roles::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_TECHNICIAN};

/// The caller's relation to the resource being acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The resource belongs to the caller (e.g. the job's customer).
    Owner,
    /// The caller is the technician assigned to the job.
    AssignedTechnician,
    /// No ownership or assignment relation.
    None,
}

/// Actions gated by a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReadJob,
    CreateJob,
    UpdateJobStatus,
    AssignTechnician,
    ManageStaff,
    ManageSettings,
    ListAllSubscriptions,
    ListAllPayments,
}

/// Authorization matrix.
///
/// Admins may do everything. Technicians may read and progress jobs they are
/// assigned to. Customers may read their own jobs. Everything else is denied.
pub fn allows(role: &str, relation: Relation, action: Action) -> bool {
    if role == ROLE_ADMIN {
        return true;
    }
    match (role, action) {
        (ROLE_TECHNICIAN, Action::ReadJob | Action::UpdateJobStatus) => {
            relation == Relation::AssignedTechnician
        }
        (ROLE_CUSTOMER, Action::ReadJob) => relation == Relation::Owner,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_is_unrestricted() {
        for action in [
            Action::ReadJob,
            Action::CreateJob,
            Action::UpdateJobStatus,
            Action::AssignTechnician,
            Action::ManageStaff,
            Action::ManageSettings,
            Action::ListAllSubscriptions,
            Action::ListAllPayments,
        ] {
            assert!(allows(ROLE_ADMIN, Relation::None, action));
        }
    }

    #[test]
    fn test_assigned_technician_may_progress_job() {
        assert!(allows(
            ROLE_TECHNICIAN,
            Relation::AssignedTechnician,
            Action::UpdateJobStatus
        ));
        assert!(allows(
            ROLE_TECHNICIAN,
            Relation::AssignedTechnician,
            Action::ReadJob
        ));
    }

    #[test]
    fn test_unassigned_technician_is_denied() {
        assert!(!allows(ROLE_TECHNICIAN, Relation::None, Action::UpdateJobStatus));
        assert!(!allows(ROLE_TECHNICIAN, Relation::None, Action::ReadJob));
    }

    #[test]
    fn test_customer_reads_own_job_only() {
        assert!(allows(ROLE_CUSTOMER, Relation::Owner, Action::ReadJob));
        assert!(!allows(ROLE_CUSTOMER, Relation::None, Action::ReadJob));
        assert!(!allows(ROLE_CUSTOMER, Relation::Owner, Action::UpdateJobStatus));
    }

    #[test]
    fn test_admin_only_actions() {
        for role in [ROLE_CUSTOMER, ROLE_TECHNICIAN] {
            assert!(!allows(role, Relation::None, Action::AssignTechnician));
            assert!(!allows(role, Relation::None, Action::ManageStaff));
            assert!(!allows(role, Relation::None, Action::ManageSettings));
            assert!(!allows(role, Relation::None, Action::CreateJob));
        }
    }

    #[test]
    fn test_unknown_role_is_denied() {
        assert!(!allows("auditor", Relation::Owner, Action::ReadJob));
    }
}
