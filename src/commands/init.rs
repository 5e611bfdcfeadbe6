use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::UserProfile;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, an initial `config.json` and an empty transaction store.
///
/// # Arguments
/// - `home` - The directory that will be the root of the data directory, e.g. `$HOME/gofinances`
/// - `user` - The signed-in user. When `None`, transactions are stored under the global key.
///
/// # Errors
/// - Returns an error if the directory already contains a store or any file operation fails.
pub async fn init(home: &Path, user: Option<UserProfile>) -> Result<Out<()>> {
    let config = Config::create(home, user)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the gofinances directory at {}",
        config.root().display()
    )
    .into())
}
