//! Access gate: registration, credential checks, sessions.
//!
//! Doctor logins are routed through the onboarding gate; only an approved
//! doctor profile gets a session. Other roles get one on valid credentials.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use super::onboarding_service::OnboardingService;
use super::token::{SessionIssuer, TokenKind, TokenResponse};
use crate::config::DUMMY_PASSWORD_HASH;
use crate::domain::{
    normalize_email, Account, ApprovalStatus, LoginGate, NewAccount, Password, RegisterAccount,
    Role,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{AccountRepository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Result of a credential login
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Session issued
    Authenticated {
        account: Account,
        tokens: TokenResponse,
    },
    /// Doctor with valid credentials but no profile yet
    NeedsProfile { account: Account },
    /// Doctor whose profile or request is not approved
    AwaitingApproval {
        account: Account,
        status: ApprovalStatus,
    },
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Self-service sign-up as patient or unapproved user
    async fn register(&self, input: RegisterAccount) -> AppResult<Account>;

    /// Check credentials without minting anything
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Account>;

    async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome>;

    /// Trade a refresh token for a new pair; the gate is evaluated again
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse>;

    /// Map an access token to the current state of its account.
    /// Doctors must still pass the gate, so a token outlives neither
    /// deactivation nor a profile that is pending or rejected.
    async fn resolve_session(&self, access_token: &str) -> AppResult<Account>;
}

/// Credential check shared by login and profile submission.
///
/// Unknown email, wrong password and disabled account all come back as the
/// same `InvalidCredentials`; the hash is verified against a dummy when the
/// account is missing so timing stays flat.
pub(crate) async fn verify_credentials(
    accounts: &dyn AccountRepository,
    email: &str,
    password: &str,
) -> AppResult<Account> {
    let account = accounts.find_by_email(&normalize_email(email)).await?;

    let hash = account
        .as_ref()
        .map(|a| a.password_hash.as_str())
        .unwrap_or(DUMMY_PASSWORD_HASH);
    let password_valid = Password::from_hash(hash).verify(password);

    match account {
        Some(account) if password_valid && account.is_active => Ok(account),
        _ => Err(AppError::InvalidCredentials),
    }
}

/// [`AuthService`] over a Unit of Work
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    sessions: Arc<dyn SessionIssuer>,
    onboarding: Arc<dyn OnboardingService>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(
        uow: Arc<U>,
        sessions: Arc<dyn SessionIssuer>,
        onboarding: Arc<dyn OnboardingService>,
    ) -> Self {
        Self {
            uow,
            sessions,
            onboarding,
        }
    }

    async fn gate(&self, account: &Account) -> AppResult<LoginGate> {
        if account.is_doctor() {
            self.onboarding.evaluate_login_gate(account).await
        } else {
            Ok(LoginGate::Ok)
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: RegisterAccount) -> AppResult<Account> {
        input.validate()?;

        let (role, status) = match input.role.unwrap_or(Role::UnapprovedUser) {
            Role::Patient => (Role::Patient, ApprovalStatus::Approved),
            Role::UnapprovedUser => (Role::UnapprovedUser, ApprovalStatus::Pending),
            _ => {
                return Err(AppError::validation(
                    "Role must be patient or unapproved-user",
                ))
            }
        };

        let new_account = NewAccount {
            email: normalize_email(&input.email),
            password_hash: Password::new(&input.password)?.into_string(),
            name: input.name.trim().to_string(),
            role,
            status,
        };

        let account = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    if ctx.accounts().find_by_email(&new_account.email).await?.is_some() {
                        return Err(AppError::conflict("Account"));
                    }
                    // The request's approval would create this account later
                    if ctx
                        .doctor_requests()
                        .find_pending_by_email(&new_account.email)
                        .await?
                        .is_some()
                    {
                        return Err(AppError::conflict("Pending doctor request"));
                    }
                    ctx.accounts().create(new_account).await
                })
            })
            .await?;

        tracing::info!(account_id = account.id, role = %account.role, "Account registered");
        Ok(account)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Account> {
        verify_credentials(self.uow.accounts().as_ref(), email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let account = self.authenticate(email, password).await?;

        let outcome = match self.gate(&account).await? {
            LoginGate::Ok => {
                let tokens = self.sessions.issue(&account)?;
                LoginOutcome::Authenticated { account, tokens }
            }
            LoginGate::NeedsProfile => LoginOutcome::NeedsProfile { account },
            LoginGate::AwaitingApproval(status) => {
                LoginOutcome::AwaitingApproval { account, status }
            }
        };

        match &outcome {
            LoginOutcome::Authenticated { account, .. } => {
                tracing::info!(account_id = account.id, "Login succeeded")
            }
            LoginOutcome::NeedsProfile { account } => {
                tracing::info!(account_id = account.id, "Doctor login without profile")
            }
            LoginOutcome::AwaitingApproval { account, status } => {
                tracing::info!(account_id = account.id, status = %status, "Doctor login awaiting approval")
            }
        }
        Ok(outcome)
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let claims = self.sessions.verify(refresh_token, TokenKind::Refresh)?;

        let account = self
            .uow
            .accounts()
            .find_by_id(claims.sub)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AppError::Unauthorized)?;

        if !self.gate(&account).await?.allows_session() {
            return Err(AppError::Forbidden);
        }

        self.sessions.issue(&account)
    }

    async fn resolve_session(&self, access_token: &str) -> AppResult<Account> {
        let claims = self.sessions.verify(access_token, TokenKind::Access)?;

        let account = self
            .uow
            .accounts()
            .find_by_id(claims.sub)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AppError::Unauthorized)?;

        if !self.gate(&account).await?.allows_session() {
            tracing::debug!(account_id = account.id, "Session refused by doctor gate");
            return Err(AppError::Forbidden);
        }

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::predicate::eq;

    use super::*;
    use crate::infra::repositories::{
        MockAccountRepository, MockDoctorProfileRepository, MockDoctorRequestRepository,
    };
    use crate::infra::unit_of_work::test_support::TestUnitOfWork;
    use crate::services::onboarding_service::MockOnboardingService;
    use crate::services::token::{Claims, MockSessionIssuer};

    fn account(role: Role, password: &str) -> Account {
        Account {
            id: 42,
            email: "a@x.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            name: "Ada".to_string(),
            role,
            status: ApprovalStatus::Approved,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tokens() -> TokenResponse {
        TokenResponse {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        }
    }

    fn claims(kind: TokenKind) -> Claims {
        Claims {
            sub: 42,
            email: "a@x.com".to_string(),
            role: "doctor".to_string(),
            kind,
            exp: 0,
            iat: 0,
        }
    }

    fn accounts_returning(found: Option<Account>) -> MockAccountRepository {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .returning(move |_| Ok(found.clone()));
        accounts
    }

    fn authenticator(
        accounts: MockAccountRepository,
        sessions: MockSessionIssuer,
        onboarding: MockOnboardingService,
    ) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork::new(
            accounts,
            MockDoctorRequestRepository::new(),
            MockDoctorProfileRepository::new(),
        );
        Authenticator::new(Arc::new(uow), Arc::new(sessions), Arc::new(onboarding))
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid_credentials() {
        let auth = authenticator(
            accounts_returning(None),
            MockSessionIssuer::new(),
            MockOnboardingService::new(),
        );

        let result = auth.authenticate("nobody@x.com", "secret1").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let auth = authenticator(
            accounts_returning(Some(account(Role::Patient, "secret1"))),
            MockSessionIssuer::new(),
            MockOnboardingService::new(),
        );

        let result = auth.authenticate("a@x.com", "wrong-password").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_inactive_account_is_invalid_credentials() {
        let mut disabled = account(Role::Patient, "secret1");
        disabled.is_active = false;
        let auth = authenticator(
            accounts_returning(Some(disabled)),
            MockSessionIssuer::new(),
            MockOnboardingService::new(),
        );

        let result = auth.authenticate("a@x.com", "secret1").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_email_is_normalized_before_lookup() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .with(eq("a@x.com"))
            .times(1)
            .returning(|_| Ok(Some(account(Role::Patient, "secret1"))));
        let auth = authenticator(accounts, MockSessionIssuer::new(), MockOnboardingService::new());

        assert!(auth.authenticate("  A@X.com ", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_patient_login_issues_session_without_gate() {
        let mut sessions = MockSessionIssuer::new();
        sessions.expect_issue().times(1).returning(|_| Ok(tokens()));
        let mut onboarding = MockOnboardingService::new();
        onboarding.expect_evaluate_login_gate().never();

        let auth = authenticator(
            accounts_returning(Some(account(Role::Patient, "secret1"))),
            sessions,
            onboarding,
        );

        let outcome = auth.login("a@x.com", "secret1").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Authenticated { .. }));
    }

    #[tokio::test]
    async fn test_doctor_without_profile_gets_no_session() {
        let mut sessions = MockSessionIssuer::new();
        sessions.expect_issue().never();
        let mut onboarding = MockOnboardingService::new();
        onboarding
            .expect_evaluate_login_gate()
            .returning(|_| Ok(LoginGate::NeedsProfile));

        let auth = authenticator(
            accounts_returning(Some(account(Role::Doctor, "secret1"))),
            sessions,
            onboarding,
        );

        let outcome = auth.login("a@x.com", "secret1").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::NeedsProfile { .. }));
    }

    #[tokio::test]
    async fn test_doctor_with_unapproved_profile_gets_no_session() {
        for status in [ApprovalStatus::Pending, ApprovalStatus::Rejected] {
            let mut sessions = MockSessionIssuer::new();
            sessions.expect_issue().never();
            let mut onboarding = MockOnboardingService::new();
            onboarding
                .expect_evaluate_login_gate()
                .returning(move |_| Ok(LoginGate::AwaitingApproval(status)));

            let auth = authenticator(
                accounts_returning(Some(account(Role::Doctor, "secret1"))),
                sessions,
                onboarding,
            );

            match auth.login("a@x.com", "secret1").await.unwrap() {
                LoginOutcome::AwaitingApproval { status: got, .. } => assert_eq!(got, status),
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_approved_doctor_gets_session() {
        let mut sessions = MockSessionIssuer::new();
        sessions.expect_issue().times(1).returning(|_| Ok(tokens()));
        let mut onboarding = MockOnboardingService::new();
        onboarding
            .expect_evaluate_login_gate()
            .returning(|_| Ok(LoginGate::Ok));

        let auth = authenticator(
            accounts_returning(Some(account(Role::Doctor, "secret1"))),
            sessions,
            onboarding,
        );

        let outcome = auth.login("a@x.com", "secret1").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Authenticated { .. }));
    }

    #[tokio::test]
    async fn test_register_refuses_privileged_roles() {
        let auth = authenticator(
            MockAccountRepository::new(),
            MockSessionIssuer::new(),
            MockOnboardingService::new(),
        );

        for role in [Role::Doctor, Role::Admin] {
            let result = auth
                .register(RegisterAccount {
                    email: "new@x.com".to_string(),
                    password: "secret1".to_string(),
                    name: "New".to_string(),
                    role: Some(role),
                })
                .await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_resolve_session_rejects_deactivated_account() {
        let mut sessions = MockSessionIssuer::new();
        sessions
            .expect_verify()
            .returning(|_, kind| Ok(claims(kind)));
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().with(eq(42)).returning(|_| {
            let mut disabled = account(Role::Patient, "secret1");
            disabled.is_active = false;
            Ok(Some(disabled))
        });

        let auth = authenticator(accounts, sessions, MockOnboardingService::new());
        let result = auth.resolve_session("token").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_rechecks_doctor_gate() {
        let mut sessions = MockSessionIssuer::new();
        sessions
            .expect_verify()
            .with(eq("refresh"), eq(TokenKind::Refresh))
            .returning(|_, kind| Ok(claims(kind)));
        sessions.expect_issue().never();
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .returning(|_| Ok(Some(account(Role::Doctor, "secret1"))));
        let mut onboarding = MockOnboardingService::new();
        onboarding
            .expect_evaluate_login_gate()
            .returning(|_| Ok(LoginGate::AwaitingApproval(ApprovalStatus::Rejected)));

        let auth = authenticator(accounts, sessions, onboarding);
        let result = auth.refresh("refresh").await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_resolve_session_refuses_unapproved_doctor() {
        for gate in [
            LoginGate::NeedsProfile,
            LoginGate::AwaitingApproval(ApprovalStatus::Pending),
            LoginGate::AwaitingApproval(ApprovalStatus::Rejected),
        ] {
            let mut sessions = MockSessionIssuer::new();
            sessions
                .expect_verify()
                .returning(|_, kind| Ok(claims(kind)));
            let mut accounts = MockAccountRepository::new();
            accounts
                .expect_find_by_id()
                .returning(|_| Ok(Some(account(Role::Doctor, "secret1"))));
            let mut onboarding = MockOnboardingService::new();
            onboarding
                .expect_evaluate_login_gate()
                .times(1)
                .returning(move |_| Ok(gate));

            let auth = authenticator(accounts, sessions, onboarding);
            let result = auth.resolve_session("token").await;
            assert!(matches!(result, Err(AppError::Forbidden)));
        }
    }

    #[tokio::test]
    async fn test_resolve_session_admits_approved_doctor() {
        let mut sessions = MockSessionIssuer::new();
        sessions
            .expect_verify()
            .returning(|_, kind| Ok(claims(kind)));
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .returning(|_| Ok(Some(account(Role::Doctor, "secret1"))));
        let mut onboarding = MockOnboardingService::new();
        onboarding
            .expect_evaluate_login_gate()
            .returning(|_| Ok(LoginGate::Ok));

        let auth = authenticator(accounts, sessions, onboarding);
        let account = auth.resolve_session("token").await.unwrap();
        assert_eq!(account.id, 42);
    }
}
