//! Doctor onboarding: the single state machine behind doctor requests and
//! doctor profiles.
//!
//! Request lifecycle is `pending -> approved | rejected`, decided once.
//! Approval creates the doctor account and its approved profile in the same
//! transaction that flips the request, so either all three writes land or
//! none do.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use super::auth_service::verify_credentials;
use crate::config::MAX_LICENSE_FILE_BYTES;
use crate::domain::validation::clean_optional;
use crate::domain::{
    normalize_email, Account, ApprovalStatus, DoctorProfile, DoctorProfileInput, DoctorRequest,
    DoctorRequestInput, LoginGate, NewAccount, NewDoctorProfile, NewDoctorRequest, Password, Role,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Decision, FileMetadata, FileStore, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// License file attached to a profile submission
#[derive(Debug, Clone)]
pub struct LicenseDocument {
    pub bytes: Vec<u8>,
    pub metadata: FileMetadata,
}

/// Everything an approval produced
#[derive(Debug, Clone)]
pub struct Approval {
    pub request: DoctorRequest,
    pub account: Account,
    pub profile: DoctorProfile,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OnboardingService: Send + Sync {
    /// Store a pending application. No account is created.
    async fn submit_request(&self, input: DoctorRequestInput) -> AppResult<DoctorRequest>;

    async fn list_requests(&self, status: Option<ApprovalStatus>) -> AppResult<Vec<DoctorRequest>>;

    async fn get_request(&self, id: i32) -> AppResult<DoctorRequest>;

    /// Approve a pending request; `NotFound` unless it is still pending.
    async fn approve_request(&self, request_id: i32, admin_id: i32) -> AppResult<Approval>;

    async fn reject_request(
        &self,
        request_id: i32,
        admin_id: i32,
        reason: Option<String>,
    ) -> AppResult<DoctorRequest>;

    /// Gate consulted before a doctor gets a session
    async fn evaluate_login_gate(&self, account: &Account) -> AppResult<LoginGate>;

    /// Account-first variant: an existing account applies with a profile.
    async fn submit_profile(
        &self,
        input: DoctorProfileInput,
        document: Option<LicenseDocument>,
    ) -> AppResult<DoctorProfile>;

    /// Admin override. Approved and rejected are mirrored onto the account.
    async fn update_profile_status(
        &self,
        profile_id: i32,
        status: &str,
        admin_id: i32,
    ) -> AppResult<DoctorProfile>;

    async fn list_profiles(&self, status: Option<ApprovalStatus>) -> AppResult<Vec<DoctorProfile>>;

    async fn get_profile(&self, id: i32) -> AppResult<DoctorProfile>;
}

/// [`OnboardingService`] over a Unit of Work and a file store
pub struct DoctorOnboarding<U: UnitOfWork> {
    uow: Arc<U>,
    files: Arc<dyn FileStore>,
}

impl<U: UnitOfWork> DoctorOnboarding<U> {
    pub fn new(uow: Arc<U>, files: Arc<dyn FileStore>) -> Self {
        Self { uow, files }
    }
}

#[async_trait]
impl<U: UnitOfWork> OnboardingService for DoctorOnboarding<U> {
    async fn submit_request(&self, input: DoctorRequestInput) -> AppResult<DoctorRequest> {
        input.validate()?;

        let new_request = NewDoctorRequest {
            email: normalize_email(&input.email),
            password_hash: Password::new(&input.password)?.into_string(),
            name: input.name.trim().to_string(),
            specialty: input.specialty.trim().to_string(),
            license_number: input.license_number.trim().to_string(),
            phone: clean_optional(input.phone),
        };

        let request = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    if ctx.accounts().find_by_email(&new_request.email).await?.is_some() {
                        return Err(AppError::conflict("Account"));
                    }
                    if ctx
                        .doctor_requests()
                        .find_pending_by_email(&new_request.email)
                        .await?
                        .is_some()
                    {
                        return Err(AppError::conflict("Pending doctor request"));
                    }
                    ctx.doctor_requests().create(new_request).await
                })
            })
            .await?;

        tracing::info!(request_id = request.id, email = %request.email, "Doctor request submitted");
        Ok(request)
    }

    async fn list_requests(&self, status: Option<ApprovalStatus>) -> AppResult<Vec<DoctorRequest>> {
        self.uow.doctor_requests().list(status).await
    }

    async fn get_request(&self, id: i32) -> AppResult<DoctorRequest> {
        self.uow.doctor_requests().find_by_id(id).await?.ok_or_not_found()
    }

    async fn approve_request(&self, request_id: i32, admin_id: i32) -> AppResult<Approval> {
        let decision = Decision {
            status: ApprovalStatus::Approved,
            decided_by: admin_id,
            decided_at: Utc::now(),
            rejection_reason: None,
        };

        let approval = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    // Losing a race here leaves zero rows updated
                    if !ctx.doctor_requests().decide(request_id, decision).await? {
                        return Err(AppError::NotFound);
                    }
                    let request = ctx
                        .doctor_requests()
                        .find_by_id(request_id)
                        .await?
                        .ok_or_not_found()?;

                    if ctx.accounts().find_by_email(&request.email).await?.is_some() {
                        return Err(AppError::conflict("Account"));
                    }
                    let account = ctx
                        .accounts()
                        .create(NewAccount {
                            email: request.email.clone(),
                            password_hash: request.password_hash.clone(),
                            name: request.name.clone(),
                            role: Role::Doctor,
                            status: ApprovalStatus::Approved,
                        })
                        .await?;

                    let profile = ctx
                        .doctor_profiles()
                        .create(NewDoctorProfile {
                            account_id: account.id,
                            specialty: request.specialty.clone(),
                            license_number: request.license_number.clone(),
                            phone: request.phone.clone(),
                            license_document: None,
                            status: ApprovalStatus::Approved,
                            reviewed_by: Some(admin_id),
                        })
                        .await?;

                    Ok(Approval {
                        request,
                        account,
                        profile,
                    })
                })
            })
            .await?;

        tracing::info!(
            request_id,
            admin_id,
            account_id = approval.account.id,
            profile_id = approval.profile.id,
            "Doctor request approved"
        );
        Ok(approval)
    }

    async fn reject_request(
        &self,
        request_id: i32,
        admin_id: i32,
        reason: Option<String>,
    ) -> AppResult<DoctorRequest> {
        let decision = Decision {
            status: ApprovalStatus::Rejected,
            decided_by: admin_id,
            decided_at: Utc::now(),
            rejection_reason: clean_optional(reason),
        };

        let request = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if !ctx.doctor_requests().decide(request_id, decision).await? {
                        return Err(AppError::NotFound);
                    }
                    ctx.doctor_requests()
                        .find_by_id(request_id)
                        .await?
                        .ok_or_not_found()
                })
            })
            .await?;

        tracing::info!(request_id, admin_id, "Doctor request rejected");
        Ok(request)
    }

    async fn evaluate_login_gate(&self, account: &Account) -> AppResult<LoginGate> {
        let profile = self.uow.doctor_profiles().find_by_account(account.id).await?;
        let pending = match profile {
            Some(_) => None,
            None => {
                self.uow
                    .doctor_requests()
                    .find_pending_by_email(&account.email)
                    .await?
            }
        };

        Ok(LoginGate::evaluate(profile.as_ref(), pending.as_ref()))
    }

    async fn submit_profile(
        &self,
        input: DoctorProfileInput,
        document: Option<LicenseDocument>,
    ) -> AppResult<DoctorProfile> {
        input.validate()?;
        if let Some(document) = &document {
            if document.bytes.is_empty() {
                return Err(AppError::validation("License file is empty"));
            }
            if document.bytes.len() > MAX_LICENSE_FILE_BYTES {
                return Err(AppError::validation("License file is too large"));
            }
        }

        let account =
            verify_credentials(self.uow.accounts().as_ref(), &input.email, &input.password).await?;
        if matches!(account.role, Role::Admin | Role::Patient) {
            return Err(AppError::Forbidden);
        }
        if self
            .uow
            .doctor_profiles()
            .find_by_account(account.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Doctor profile"));
        }

        // Uploaded before the transaction opens
        let license_document = match document {
            Some(document) => Some(self.files.upload(document.bytes, document.metadata).await?),
            None => None,
        };

        let account_id = account.id;
        let new_profile = NewDoctorProfile {
            account_id,
            specialty: input.specialty.trim().to_string(),
            license_number: input.license_number.trim().to_string(),
            phone: clean_optional(input.phone),
            license_document,
            status: ApprovalStatus::Pending,
            reviewed_by: None,
        };

        let profile = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let profile = ctx.doctor_profiles().create(new_profile).await?;
                    ctx.accounts()
                        .update_access(
                            account_id,
                            Some(Role::Doctor),
                            Some(ApprovalStatus::Pending),
                        )
                        .await?;
                    Ok(profile)
                })
            })
            .await?;

        tracing::info!(account_id, profile_id = profile.id, "Doctor profile submitted");
        Ok(profile)
    }

    async fn update_profile_status(
        &self,
        profile_id: i32,
        status: &str,
        admin_id: i32,
    ) -> AppResult<DoctorProfile> {
        let status = ApprovalStatus::parse(status)?;

        let profile = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let profile = ctx
                        .doctor_profiles()
                        .update_status(profile_id, status, admin_id)
                        .await?;
                    if status.is_decided() {
                        ctx.accounts()
                            .update_access(profile.account_id, None, Some(status))
                            .await?;
                    }
                    Ok(profile)
                })
            })
            .await?;

        tracing::info!(profile_id, admin_id, status = %status, "Doctor profile status changed");
        Ok(profile)
    }

    async fn list_profiles(&self, status: Option<ApprovalStatus>) -> AppResult<Vec<DoctorProfile>> {
        self.uow.doctor_profiles().list(status).await
    }

    async fn get_profile(&self, id: i32) -> AppResult<DoctorProfile> {
        self.uow.doctor_profiles().find_by_id(id).await?.ok_or_not_found()
    }
}
