use crate::args::ClearArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::store::Store;
use crate::{Config, Result};
use anyhow::Context;
use tracing::info;

/// Removes every stored transaction for the selected key.
pub async fn clear(config: Config, args: ClearArgs) -> Result<Out<()>> {
    let key = args.key().store_key(&config).key();
    let store = config
        .open_store()
        .await
        .context("Unable to open the transaction store")
        .pub_result(ErrorType::Store)?;

    store
        .remove(&key)
        .await
        .with_context(|| format!("Unable to remove '{key}'"))
        .pub_result(ErrorType::Store)?;
    info!("Removed '{key}'");

    Ok(format!("Cleared all transactions stored at '{key}'").into())
}
