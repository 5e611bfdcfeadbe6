use crate::args::DashboardArgs;
use crate::commands::Out;
use crate::dashboard::DashboardScreen;
use crate::error::{ErrorType, IntoResult};
use crate::model::UserProfile;
use crate::store::StoreKey;
use crate::summary::Summary;
use crate::{Config, Result};
use anyhow::Context;
use tracing::debug;

/// Loads the transactions for the selected key and renders the dashboard.
///
/// # Returns
///
/// On success, returns an `Out` containing:
/// - The rendered dashboard as the message.
/// - The `Summary` as structured data.
///
/// # Errors
///
/// - `ErrorType::Store` if the store cannot be opened or read.
/// - `ErrorType::Parse` if the stored transactions are malformed.
pub async fn dashboard(config: Config, args: DashboardArgs) -> Result<Out<Summary>> {
    let key = args.key().store_key(&config);
    debug!("Showing the dashboard for '{key}'");

    let store = config
        .open_store()
        .await
        .context("Unable to open the transaction store")
        .pub_result(ErrorType::Store)?;

    let mut screen = DashboardScreen::new(store, key.clone(), greeted_user(&config, &key));
    screen.on_mount().await?;

    let summary = screen
        .summary()
        .cloned()
        .context("The dashboard finished loading without a summary")
        .pub_result(ErrorType::Store)?;
    Ok(Out::new(screen.render(), summary))
}

/// The configured user is greeted unless another user's key was requested, in which case that
/// user id stands in for the name.
fn greeted_user(config: &Config, key: &StoreKey) -> Option<UserProfile> {
    match key {
        StoreKey::User(id) => Some(
            config
                .user()
                .filter(|user| user.id() == id.as_str())
                .cloned()
                .unwrap_or_else(|| UserProfile::new(id.clone(), id.clone(), None)),
        ),
        StoreKey::Global => config.user().cloned(),
    }
}
