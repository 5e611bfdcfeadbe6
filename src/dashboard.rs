//! The dashboard screen: loads the stored transactions, summarizes them and renders the result.
//!
//! The screen owns a simple loading/loaded/error state. A reload is triggered when the screen is
//! mounted and again every time it regains focus; each reload replaces the state wholesale.

use crate::error::{ErrorType, IntoResult};
use crate::model::{parse_transactions, TransactionType, UserProfile};
use crate::store::{Store, StoreKey};
use crate::summary::{summarize, Summary, NO_TRANSACTIONS};
use crate::Result;
use anyhow::Context;
use std::fmt;
use tracing::{debug, warn};

/// Reads the transactions stored at `key` and summarizes them.
///
/// A missing (or blank) value is an empty dataset, not an error.
///
/// # Errors
/// - `ErrorType::Store` if the store cannot be read.
/// - `ErrorType::Parse` if the stored value is not a valid list of transactions.
pub async fn load_summary<S>(store: &S, key: &StoreKey) -> Result<Summary>
where
    S: Store + ?Sized,
{
    let key = key.key();
    let payload = store
        .get(&key)
        .await
        .with_context(|| format!("Unable to read transactions from '{key}'"))
        .pub_result(ErrorType::Store)?;

    let records = match payload.as_deref().map(str::trim) {
        None | Some("") => {
            debug!("No transactions stored at '{key}'");
            Vec::new()
        }
        Some(json) => parse_transactions(json)?,
    };
    debug!("Loaded {} transactions from '{key}'", records.len());
    Ok(summarize(&records))
}

/// What the dashboard is currently showing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ScreenState {
    Loading,
    Loaded(Summary),
    Error {
        error_type: ErrorType,
        message: String,
    },
}

/// The dashboard for one user (or for the global key).
#[derive(Debug)]
pub struct DashboardScreen<S> {
    store: S,
    key: StoreKey,
    user: Option<UserProfile>,
    state: ScreenState,
}

impl<S> DashboardScreen<S>
where
    S: Store,
{
    /// Creates the screen in the `Loading` state. Nothing is read until it is mounted.
    pub fn new(store: S, key: StoreKey, user: Option<UserProfile>) -> Self {
        Self {
            store,
            key,
            user,
            state: ScreenState::Loading,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// The summary currently shown, if the last load succeeded.
    pub fn summary(&self) -> Option<&Summary> {
        match &self.state {
            ScreenState::Loaded(summary) => Some(summary),
            _ => None,
        }
    }

    pub async fn on_mount(&mut self) -> Result<()> {
        self.reload().await
    }

    pub async fn on_focus(&mut self) -> Result<()> {
        self.reload().await
    }

    /// Loads and summarizes the transactions, replacing the current state.
    ///
    /// On failure the screen moves to `ScreenState::Error` and the error is also returned.
    pub async fn reload(&mut self) -> Result<()> {
        match load_summary(&self.store, &self.key).await {
            Ok(summary) => {
                self.state = ScreenState::Loaded(summary);
                Ok(())
            }
            Err(e) => {
                warn!("Unable to load the dashboard: {e}");
                self.state = ScreenState::Error {
                    error_type: e.error_type(),
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Renders the screen as plain text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl<S> fmt::Display for DashboardScreen<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            ScreenState::Loading => f.write_str("Carregando..."),
            ScreenState::Error { message, .. } => {
                write!(f, "Não foi possível carregar as transações: {message}")
            }
            ScreenState::Loaded(summary) => write_summary(f, self.user.as_ref(), summary),
        }
    }
}

fn write_summary(
    out: &mut impl fmt::Write,
    user: Option<&UserProfile>,
    summary: &Summary,
) -> fmt::Result {
    match user {
        Some(user) => {
            writeln!(out, "Olá, {}", user.name())?;
            if let Some(photo) = user.photo() {
                writeln!(out, "{photo}")?;
            }
        }
        None => writeln!(out, "Olá")?,
    }

    for bucket in summary.highlights().iter() {
        writeln!(out)?;
        writeln!(
            out,
            "{:<10}{}",
            bucket.kind().title(),
            bucket.total_amount()
        )?;
        writeln!(out, "{:<10}{}", "", bucket.last_transaction_label())?;
    }

    writeln!(out)?;
    writeln!(out, "Listagem")?;
    if summary.is_empty() {
        writeln!(out, "{NO_TRANSACTIONS}")?;
    }
    for t in summary.transactions() {
        let sign = match t.transaction_type() {
            TransactionType::Positive => "",
            TransactionType::Negative => "- ",
        };
        writeln!(
            out,
            "{}  {sign}{}  {}  {}",
            t.name(),
            t.amount(),
            t.category().name(),
            t.date()
        )?;
    }
    Ok(())
}
