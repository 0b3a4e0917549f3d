//! Subcommand implementations.

use std::sync::Arc;

use auth::SessionRepository;
use clap::Args;
use entities::Credential;
use session_store::SqliteSessionStore;

/// Arguments for `sign-in`.
#[derive(Debug, Args)]
pub struct SignInArgs {
    /// Email address of the account.
    #[arg(long)]
    pub email: Option<String>,
    /// Display name of the account.
    #[arg(long)]
    pub name: Option<String>,
    /// Profile photo URL.
    #[arg(long)]
    pub photo_url: Option<String>,
}

pub async fn sign_in(
    repository: &SessionRepository<SqliteSessionStore>,
    args: SignInArgs,
) -> anyhow::Result<()> {
    let mut credential = Credential::new();
    if let Some(email) = args.email {
        credential = credential.with_email(email);
    }
    if let Some(name) = args.name {
        credential = credential.with_display_name(name);
    }
    if let Some(photo_url) = args.photo_url {
        credential = credential.with_photo_url(photo_url);
    }

    let user = repository.sign_in(&credential).await?;
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

pub async fn logout(repository: &SessionRepository<SqliteSessionStore>) -> anyhow::Result<()> {
    repository.logout().await?;
    println!("Logged out");
    Ok(())
}

pub async fn whoami(repository: &SessionRepository<SqliteSessionStore>) -> anyhow::Result<()> {
    match repository.current_user().await? {
        Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
        None => println!("Not signed in"),
    }
    Ok(())
}

/// Follows the logged-in user until interrupted, printing every change.
pub async fn watch(store: Arc<SqliteSessionStore>) -> anyhow::Result<()> {
    use session_store::SessionStore;

    let mut rx = store.watch_logged_in_user();

    loop {
        match &*rx.borrow_and_update() {
            Some(user) => println!("{}", serde_json::to_string(user)?),
            None => println!("null"),
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
