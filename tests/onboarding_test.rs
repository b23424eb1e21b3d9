//! Onboarding and access gate against a real (in-memory SQLite) store.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};

use clinic_api::config::Config;
use clinic_api::domain::{
    ApprovalStatus, DoctorProfileInput, DoctorRequestInput, NewAccount, Password,
    RegisterAccount, Role,
};
use clinic_api::errors::{AppError, AppResult};
use clinic_api::infra::{
    AccountRepository, AccountStore, Database, FileMetadata, FileStore, Persistence, UnitOfWork,
};
use clinic_api::services::{LicenseDocument, LoginOutcome, ServiceContainer, Services};

/// File store that remembers what it was given
#[derive(Default)]
struct RecordingFileStore {
    uploads: Mutex<Vec<FileMetadata>>,
}

#[async_trait]
impl FileStore for RecordingFileStore {
    async fn upload(&self, _bytes: Vec<u8>, metadata: FileMetadata) -> AppResult<String> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(metadata);
        Ok(format!("uploads/license-{}", uploads.len()))
    }
}

struct TestApp {
    services: Services,
    files: Arc<RecordingFileStore>,
    connection: DatabaseConnection,
}

async fn setup() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let connection = sea_orm::Database::connect(options).await.unwrap();

    let db = Database::from_connection(connection);
    db.run_migrations().await.unwrap();

    let config = Config::new("sqlite::memory:", "integration-test-secret-0123456789abcdef").unwrap();
    let files = Arc::new(RecordingFileStore::default());
    let services = Services::with_file_store(db.get_connection(), &config, files.clone());

    TestApp {
        services,
        files,
        connection: db.get_connection(),
    }
}

fn request_input(email: &str) -> DoctorRequestInput {
    DoctorRequestInput {
        email: email.to_string(),
        password: "secret123".to_string(),
        name: "Dr. Ada".to_string(),
        specialty: "Cardiology".to_string(),
        license_number: "L123".to_string(),
        phone: Some("+1 555 0100".to_string()),
    }
}

fn new_account(email: &str, role: Role) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        password_hash: Password::new("secret123").unwrap().into_string(),
        name: "Existing".to_string(),
        role,
        status: ApprovalStatus::Approved,
    }
}

fn register_input(email: &str, role: Option<Role>) -> RegisterAccount {
    RegisterAccount {
        email: email.to_string(),
        password: "secret123".to_string(),
        name: "Sam".to_string(),
        role,
    }
}

fn profile_input(email: &str) -> DoctorProfileInput {
    DoctorProfileInput {
        email: email.to_string(),
        password: "secret123".to_string(),
        specialty: "Dermatology".to_string(),
        license_number: "D-77".to_string(),
        phone: None,
    }
}

#[tokio::test]
async fn test_submit_then_approve_creates_account_and_profile() {
    let app = setup().await;
    let onboarding = app.services.onboarding();

    let request = onboarding
        .submit_request(request_input("a@x.com"))
        .await
        .unwrap();
    assert_eq!(request.status, ApprovalStatus::Pending);
    assert_ne!(request.password_hash, "secret123");

    let approval = onboarding.approve_request(request.id, 7).await.unwrap();

    assert_eq!(approval.request.status, ApprovalStatus::Approved);
    assert_eq!(approval.request.decided_by, Some(7));
    assert!(approval.request.decided_at.is_some());

    assert_eq!(approval.account.email, "a@x.com");
    assert_eq!(approval.account.role, Role::Doctor);
    assert_eq!(approval.account.status, ApprovalStatus::Approved);
    assert_eq!(approval.account.password_hash, request.password_hash);

    assert_eq!(approval.profile.account_id, approval.account.id);
    assert_eq!(approval.profile.specialty, "Cardiology");
    assert_eq!(approval.profile.license_number, "L123");
    assert_eq!(approval.profile.phone.as_deref(), Some("+1 555 0100"));
    assert_eq!(approval.profile.status, ApprovalStatus::Approved);
    assert_eq!(approval.profile.reviewed_by, Some(7));

    let profiles = onboarding.list_profiles(None).await.unwrap();
    assert_eq!(profiles.len(), 1);
    let (accounts, total) = app
        .services
        .accounts()
        .list_accounts(Some(Role::Doctor), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(accounts.len(), 1);

    let stored = onboarding.get_request(request.id).await.unwrap();
    assert_eq!(stored.decided_by, Some(7));
}

#[tokio::test]
async fn test_approved_doctor_logs_in_with_request_password() {
    let app = setup().await;
    let onboarding = app.services.onboarding();

    let request = onboarding
        .submit_request(request_input("a@x.com"))
        .await
        .unwrap();
    onboarding.approve_request(request.id, 7).await.unwrap();

    let outcome = app
        .services
        .auth()
        .login("A@X.com", "secret123")
        .await
        .unwrap();

    match outcome {
        LoginOutcome::Authenticated { account, tokens } => {
            assert_eq!(account.email, "a@x.com");
            assert_eq!(tokens.token_type, "Bearer");
        }
        other => panic!("expected a session, got {other:?}"),
    }
}

#[tokio::test]
async fn test_second_approval_is_not_found() {
    let app = setup().await;
    let onboarding = app.services.onboarding();

    let request = onboarding
        .submit_request(request_input("b@x.com"))
        .await
        .unwrap();

    onboarding.approve_request(request.id, 1).await.unwrap();
    let again = onboarding.approve_request(request.id, 1).await;

    assert!(matches!(again, Err(AppError::NotFound)));
    assert_eq!(onboarding.list_profiles(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_approvals_create_one_account() {
    let app = setup().await;
    let onboarding = app.services.onboarding();

    let request = onboarding
        .submit_request(request_input("race@x.com"))
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        onboarding.approve_request(request.id, 1),
        onboarding.approve_request(request.id, 2)
    );

    assert_eq!(
        [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
        1
    );
    let loser = if first.is_ok() { second } else { first };
    assert!(matches!(loser, Err(AppError::NotFound)));

    let (_, total) = app
        .services
        .accounts()
        .list_accounts(None, 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn test_reject_leaves_no_account_or_profile() {
    let app = setup().await;
    let onboarding = app.services.onboarding();

    let request = onboarding
        .submit_request(request_input("c@x.com"))
        .await
        .unwrap();

    let rejected = onboarding
        .reject_request(request.id, 3, Some("  License expired ".to_string()))
        .await
        .unwrap();

    assert_eq!(rejected.status, ApprovalStatus::Rejected);
    assert_eq!(rejected.decided_by, Some(3));
    assert_eq!(rejected.rejection_reason.as_deref(), Some("License expired"));

    let (_, total) = app
        .services
        .accounts()
        .list_accounts(None, 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(onboarding.list_profiles(None).await.unwrap().is_empty());

    // Decided requests stay decided
    assert!(matches!(
        onboarding.approve_request(request.id, 3).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_duplicate_pending_submission_is_conflict() {
    let app = setup().await;
    let onboarding = app.services.onboarding();

    onboarding
        .submit_request(request_input("d@x.com"))
        .await
        .unwrap();
    let duplicate = onboarding.submit_request(request_input("D@X.com")).await;

    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert_eq!(
        onboarding
            .list_requests(Some(ApprovalStatus::Pending))
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_request_for_registered_email_is_conflict() {
    let app = setup().await;

    app.services
        .auth()
        .register(register_input("e@x.com", Some(Role::Patient)))
        .await
        .unwrap();
    let result = app
        .services
        .onboarding()
        .submit_request(request_input("e@x.com"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_resubmission_after_rejection_is_allowed() {
    let app = setup().await;
    let onboarding = app.services.onboarding();

    let first = onboarding
        .submit_request(request_input("f@x.com"))
        .await
        .unwrap();
    onboarding.reject_request(first.id, 1, None).await.unwrap();

    let second = onboarding
        .submit_request(request_input("f@x.com"))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(second.status, ApprovalStatus::Pending);
}

#[tokio::test]
async fn test_account_first_profile_flow() {
    let app = setup().await;
    let auth = app.services.auth();
    let onboarding = app.services.onboarding();

    let account = auth
        .register(register_input("g@x.com", None))
        .await
        .unwrap();
    assert_eq!(account.role, Role::UnapprovedUser);
    assert_eq!(account.status, ApprovalStatus::Pending);

    let document = LicenseDocument {
        bytes: b"%PDF-1.4".to_vec(),
        metadata: FileMetadata {
            file_name: "license.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
        },
    };
    let profile = onboarding
        .submit_profile(profile_input("g@x.com"), Some(document))
        .await
        .unwrap();

    assert_eq!(profile.account_id, account.id);
    assert_eq!(profile.status, ApprovalStatus::Pending);
    assert_eq!(profile.license_document.as_deref(), Some("uploads/license-1"));
    assert_eq!(app.files.uploads.lock().unwrap().len(), 1);

    let promoted = app
        .services
        .accounts()
        .get_account(account.id)
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::Doctor);
    assert_eq!(promoted.status, ApprovalStatus::Pending);

    // Pending profile: no session
    match auth.login("g@x.com", "secret123").await.unwrap() {
        LoginOutcome::AwaitingApproval { status, .. } => {
            assert_eq!(status, ApprovalStatus::Pending)
        }
        other => panic!("expected awaiting approval, got {other:?}"),
    }

    // A second profile for the same account is refused
    assert!(matches!(
        onboarding
            .submit_profile(profile_input("g@x.com"), None)
            .await,
        Err(AppError::Conflict(_))
    ));

    // Admin approval flows to the account and opens the gate
    let approved = onboarding
        .update_profile_status(profile.id, "APPROVED", 9)
        .await
        .unwrap();
    assert_eq!(approved.status, ApprovalStatus::Approved);
    assert_eq!(approved.reviewed_by, Some(9));

    let account = app
        .services
        .accounts()
        .get_account(account.id)
        .await
        .unwrap();
    assert_eq!(account.status, ApprovalStatus::Approved);
    assert!(matches!(
        auth.login("g@x.com", "secret123").await.unwrap(),
        LoginOutcome::Authenticated { .. }
    ));

    // Rejection closes it again
    onboarding
        .update_profile_status(profile.id, "rejected", 9)
        .await
        .unwrap();
    assert!(matches!(
        auth.login("g@x.com", "secret123").await.unwrap(),
        LoginOutcome::AwaitingApproval {
            status: ApprovalStatus::Rejected,
            ..
        }
    ));
}

#[tokio::test]
async fn test_profile_submission_with_wrong_password_is_rejected() {
    let app = setup().await;

    app.services
        .auth()
        .register(register_input("h@x.com", None))
        .await
        .unwrap();

    let mut input = profile_input("h@x.com");
    input.password = "wrong-password".to_string();
    let result = app.services.onboarding().submit_profile(input, None).await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
    assert!(app
        .services
        .onboarding()
        .list_profiles(None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unknown_profile_status_is_validation_error() {
    let app = setup().await;

    let result = app
        .services
        .onboarding()
        .update_profile_status(1, "archived", 1)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_deactivated_account_cannot_log_in() {
    let app = setup().await;
    let auth = app.services.auth();

    let account = auth
        .register(register_input("i@x.com", Some(Role::Patient)))
        .await
        .unwrap();
    assert!(matches!(
        auth.login("i@x.com", "secret123").await.unwrap(),
        LoginOutcome::Authenticated { .. }
    ));

    app.services
        .accounts()
        .set_active(account.id, false, 999)
        .await
        .unwrap();

    assert!(matches!(
        auth.login("i@x.com", "secret123").await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_failed_approval_rolls_back_decision() {
    let app = setup().await;
    let onboarding = app.services.onboarding();

    let request = onboarding
        .submit_request(request_input("taken@x.com"))
        .await
        .unwrap();
    // Inserted directly, past the checks register and create_admin make
    AccountStore::new(app.connection.clone())
        .create(new_account("taken@x.com", Role::Patient))
        .await
        .unwrap();

    let result = onboarding.approve_request(request.id, 5).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let stored = onboarding.get_request(request.id).await.unwrap();
    assert_eq!(stored.status, ApprovalStatus::Pending);
    assert_eq!(stored.decided_by, None);
    assert!(stored.decided_at.is_none());
    assert!(onboarding.list_profiles(None).await.unwrap().is_empty());

    let (accounts, total) = app
        .services
        .accounts()
        .list_accounts(None, 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(accounts[0].role, Role::Patient);

    // Still decidable afterwards
    let rejected = onboarding.reject_request(request.id, 5, None).await.unwrap();
    assert_eq!(rejected.status, ApprovalStatus::Rejected);
}

#[tokio::test]
async fn test_status_update_for_missing_profile_is_not_found() {
    let app = setup().await;

    let result = app
        .services
        .onboarding()
        .update_profile_status(404, "approved", 1)
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_slow_transaction_times_out_and_rolls_back() {
    let app = setup().await;
    let persistence = Persistence::new(app.connection.clone(), Duration::from_millis(50));

    let result: AppResult<()> = persistence
        .transaction(|ctx| {
            Box::pin(async move {
                ctx.accounts()
                    .create(new_account("slow@x.com", Role::Patient))
                    .await?;
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok(())
            })
        })
        .await;

    assert!(matches!(result, Err(AppError::Timeout)));
    assert!(persistence
        .accounts()
        .find_by_email("slow@x.com")
        .await
        .unwrap()
        .is_none());
}
