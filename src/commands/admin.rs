//! Admin command - Bootstraps admin accounts.

use validator::Validate;

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::domain::{
    normalize_email, Account, ApprovalStatus, NewAccount, Password, RegisterAccount, Role,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    AccountRepository, AccountStore, Database, DoctorRequestRepository, DoctorRequestStore,
};

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let accounts = AccountStore::new(db.get_connection());
    let requests = DoctorRequestStore::new(db.get_connection());

    match args.action {
        AdminAction::Create {
            email,
            password,
            name,
        } => {
            let account = create_admin(&accounts, &requests, email, password, name).await?;
            tracing::info!(account_id = account.id, email = %account.email, "Admin account created");
            println!("Created admin {} (id {})", account.email, account.id);
        }
    }

    Ok(())
}

/// Validate and insert an approved admin account.
///
/// An email held by a pending doctor request is refused, since approving
/// that request would later collide with this account.
pub async fn create_admin(
    accounts: &dyn AccountRepository,
    requests: &dyn DoctorRequestRepository,
    email: String,
    password: String,
    name: String,
) -> AppResult<Account> {
    let input = RegisterAccount {
        email,
        password,
        name,
        role: None,
    };
    input.validate()?;

    let email = normalize_email(&input.email);
    if accounts.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("Account"));
    }
    if requests.find_pending_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("Pending doctor request"));
    }

    accounts
        .create(NewAccount {
            email,
            password_hash: Password::new(&input.password)?.into_string(),
            name: input.name.trim().to_string(),
            role: Role::Admin,
            status: ApprovalStatus::Approved,
        })
        .await
}
