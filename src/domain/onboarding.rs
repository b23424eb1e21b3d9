//! Login gate for doctor accounts.

use super::{ApprovalStatus, DoctorProfile, DoctorRequest};

/// What a doctor login is allowed to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginGate {
    /// Approved profile: a session may be issued
    Ok,
    /// Credentials are valid but no profile has been submitted yet
    NeedsProfile,
    /// A profile or request exists but has not been approved
    AwaitingApproval(ApprovalStatus),
}

impl LoginGate {
    /// Decide the gate from what the store holds for one doctor.
    ///
    /// An existing profile always wins. The request queue is only looked at
    /// when there is no profile, and only a still-pending request counts.
    pub fn evaluate(profile: Option<&DoctorProfile>, request: Option<&DoctorRequest>) -> Self {
        match (profile, request) {
            (Some(profile), _) if profile.is_approved() => LoginGate::Ok,
            (Some(profile), _) => LoginGate::AwaitingApproval(profile.status),
            (None, Some(request)) if request.is_pending() => {
                LoginGate::AwaitingApproval(ApprovalStatus::Pending)
            }
            (None, _) => LoginGate::NeedsProfile,
        }
    }

    pub fn allows_session(&self) -> bool {
        matches!(self, LoginGate::Ok)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn profile(status: ApprovalStatus) -> DoctorProfile {
        DoctorProfile {
            id: 1,
            account_id: 10,
            specialty: "Cardiology".to_string(),
            license_number: "L123".to_string(),
            phone: None,
            license_document: None,
            status,
            reviewed_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(status: ApprovalStatus) -> DoctorRequest {
        DoctorRequest {
            id: 5,
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Ada".to_string(),
            specialty: "Cardiology".to_string(),
            license_number: "L123".to_string(),
            phone: None,
            status,
            decided_by: None,
            decided_at: None,
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_approved_profile_opens_gate() {
        let gate = LoginGate::evaluate(Some(&profile(ApprovalStatus::Approved)), None);
        assert_eq!(gate, LoginGate::Ok);
        assert!(gate.allows_session());
    }

    #[test]
    fn test_unapproved_profile_waits() {
        for status in [ApprovalStatus::Pending, ApprovalStatus::Rejected] {
            let gate = LoginGate::evaluate(Some(&profile(status)), None);
            assert_eq!(gate, LoginGate::AwaitingApproval(status));
            assert!(!gate.allows_session());
        }
    }

    #[test]
    fn test_missing_profile_needs_profile() {
        assert_eq!(LoginGate::evaluate(None, None), LoginGate::NeedsProfile);
    }

    #[test]
    fn test_profile_takes_precedence_over_request() {
        let gate = LoginGate::evaluate(
            Some(&profile(ApprovalStatus::Rejected)),
            Some(&request(ApprovalStatus::Pending)),
        );
        assert_eq!(gate, LoginGate::AwaitingApproval(ApprovalStatus::Rejected));

        let gate = LoginGate::evaluate(
            Some(&profile(ApprovalStatus::Approved)),
            Some(&request(ApprovalStatus::Pending)),
        );
        assert_eq!(gate, LoginGate::Ok);
    }

    #[test]
    fn test_pending_request_without_profile_waits() {
        let gate = LoginGate::evaluate(None, Some(&request(ApprovalStatus::Pending)));
        assert_eq!(gate, LoginGate::AwaitingApproval(ApprovalStatus::Pending));
    }

    #[test]
    fn test_decided_request_without_profile_needs_profile() {
        let gate = LoginGate::evaluate(None, Some(&request(ApprovalStatus::Rejected)));
        assert_eq!(gate, LoginGate::NeedsProfile);
    }
}
