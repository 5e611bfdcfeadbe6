//! These structs provide the CLI interface for the gofinances CLI.

use crate::model::{Amount, TransactionDate, TransactionType, UserProfile};
use crate::store::StoreKey;
use crate::Config;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// gofinances: your personal finances at a glance.
///
/// Transactions are kept in a local store inside the gofinances home directory. Register incomes
/// and expenses with `gofinances register`, then run `gofinances dashboard` to see your total
/// entries, total expenses, the balance and the full listing.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and the transaction store.
    ///
    /// Pass --user-id (and optionally --user-name and --user-photo) to keep transactions under
    /// that user's own key. Without a user, transactions are kept under a single global key.
    Init(InitArgs),
    /// Show the summary cards and the transaction listing.
    Dashboard(DashboardArgs),
    /// Register a new income or expense.
    Register(Box<RegisterArgs>),
    /// Remove all stored transactions for the current user (or the global key).
    Clear(ClearArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where gofinances data and configuration is held. Defaults to ~/gofinances
    #[arg(long, env = "GOFINANCES_HOME", default_value_t = default_gofinances_home())]
    gofinances_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, gofinances_home: PathBuf) -> Self {
        Self {
            log_level,
            gofinances_home: gofinances_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn gofinances_home(&self) -> &DisplayPath {
        &self.gofinances_home
    }
}

/// Args for the `gofinances init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The id of the signed-in user. Transactions are namespaced by this id.
    #[arg(long)]
    user_id: Option<String>,

    /// The name shown in the dashboard greeting.
    #[arg(long, requires = "user_id")]
    user_name: Option<String>,

    /// A URL to the user's photo.
    #[arg(long, requires = "user_id")]
    user_photo: Option<String>,
}

impl InitArgs {
    pub fn new(
        user_id: Option<String>,
        user_name: Option<String>,
        user_photo: Option<String>,
    ) -> Self {
        Self {
            user_id,
            user_name,
            user_photo,
        }
    }

    /// The user profile described by these args, if a user id was given.
    pub fn user(&self) -> Option<UserProfile> {
        self.user_id.as_ref().map(|id| {
            UserProfile::new(
                id,
                self.user_name.clone().unwrap_or_else(|| id.clone()),
                self.user_photo.clone(),
            )
        })
    }
}

/// Selects which store key a command operates on.
#[derive(Debug, Parser, Clone, Default)]
pub struct KeyArgs {
    /// Use this user's transactions instead of the configured user's.
    #[arg(long, conflicts_with = "global")]
    user_id: Option<String>,

    /// Use the global transactions key even if a user is configured.
    #[arg(long)]
    global: bool,
}

impl KeyArgs {
    pub fn new(user_id: Option<String>, global: bool) -> Self {
        Self { user_id, global }
    }

    /// Resolves the store key: `--global`, then `--user-id`, then the configured user.
    pub fn store_key(&self, config: &Config) -> StoreKey {
        if self.global {
            StoreKey::Global
        } else if let Some(id) = &self.user_id {
            StoreKey::for_user(id)
        } else {
            config.store_key()
        }
    }
}

/// Args for the `gofinances dashboard` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct DashboardArgs {
    #[clap(flatten)]
    key: KeyArgs,
}

impl DashboardArgs {
    pub fn new(key: KeyArgs) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &KeyArgs {
        &self.key
    }
}

/// Args for the `gofinances register` command.
#[derive(Debug, Parser, Clone)]
pub struct RegisterArgs {
    /// A short description, e.g. "Salário" or "Pizza".
    #[arg(long)]
    pub(crate) name: String,

    /// The amount, always positive, e.g. 12.50. Use --type to say whether it is income or expense.
    #[arg(long)]
    pub(crate) amount: Amount,

    /// Either "positive" (income) or "negative" (expense).
    #[arg(long = "type")]
    pub(crate) transaction_type: TransactionType,

    /// The category name, e.g. "Alimentação".
    #[arg(long)]
    pub(crate) category: String,

    /// The category icon name.
    #[arg(long)]
    pub(crate) icon: Option<String>,

    /// The date of the transaction as an ISO-8601 date or timestamp. Defaults to now.
    #[arg(long)]
    pub(crate) date: Option<TransactionDate>,

    #[clap(flatten)]
    pub(crate) key: KeyArgs,
}

impl RegisterArgs {
    pub fn new(
        name: impl Into<String>,
        amount: Amount,
        transaction_type: TransactionType,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            transaction_type,
            category: category.into(),
            icon: None,
            date: None,
            key: KeyArgs::default(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_date(mut self, date: TransactionDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_key(mut self, key: KeyArgs) -> Self {
        self.key = key;
        self
    }
}

/// Args for the `gofinances clear` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ClearArgs {
    #[clap(flatten)]
    key: KeyArgs,
}

impl ClearArgs {
    pub fn new(key: KeyArgs) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &KeyArgs {
        &self.key
    }
}

fn default_gofinances_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("gofinances"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --gofinances-home or GOFINANCES_HOME instead of relying on the \
                default directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("gofinances")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_register() {
        let args = Args::try_parse_from([
            "gofinances",
            "--gofinances-home",
            "/tmp/gf",
            "register",
            "--name",
            "Pizza",
            "--amount",
            "40.5",
            "--type",
            "negative",
            "--category",
            "Alimentação",
            "--date",
            "2023-01-10",
        ])
        .unwrap();
        assert_eq!(args.common().gofinances_home().path(), Path::new("/tmp/gf"));
        let Command::Register(register) = args.command() else {
            panic!("expected register, got {:?}", args.command());
        };
        assert_eq!(register.name, "Pizza");
        assert_eq!(register.amount.value(), dec!(40.5));
        assert_eq!(register.transaction_type, TransactionType::Negative);
        assert_eq!(register.date.as_ref().unwrap().as_str(), "2023-01-10");
        assert!(register.icon.is_none());
    }

    #[test]
    fn test_parse_register_bad_amount() {
        let res = Args::try_parse_from([
            "gofinances",
            "register",
            "--name",
            "x",
            "--amount",
            "lots",
            "--type",
            "positive",
            "--category",
            "c",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_parse_log_level() {
        let args =
            Args::try_parse_from(["gofinances", "--log-level", "debug", "dashboard"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_global_conflicts_with_user_id() {
        let res = Args::try_parse_from(["gofinances", "dashboard", "--global", "--user-id", "x"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_init_user() {
        let args = InitArgs::new(Some("u1".into()), None, None);
        let user = args.user().unwrap();
        assert_eq!(user.id(), "u1");
        assert_eq!(user.name(), "u1");
        assert!(InitArgs::new(None, None, None).user().is_none());
    }
}
