use crate::args::RegisterArgs;
use crate::commands::Out;
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{
    parse_transactions, serialize_transactions, Category, TransactionDate, TransactionRecord,
};
use crate::store::Store;
use crate::utils::generate_transaction_id;
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use chrono::Utc;
use tracing::debug;

/// Appends a new transaction to the stored list for the selected key.
///
/// A unique id is generated for the transaction and the date defaults to now. The whole list is
/// read, extended and written back, matching how the list is always replaced wholesale.
///
/// # Errors
///
/// - `ErrorType::Request` if the name or category is blank, or the amount is not positive.
/// - `ErrorType::Parse` if the currently stored list is malformed. Nothing is written in that
///   case, so existing data is never overwritten.
/// - `ErrorType::Store` if the store cannot be opened, read or written.
pub async fn register(config: Config, args: RegisterArgs) -> Result<Out<TransactionRecord>> {
    validate(&args)?;
    let key = args.key.store_key(&config).key();

    let store = config
        .open_store()
        .await
        .context("Unable to open the transaction store")
        .pub_result(ErrorType::Store)?;

    let existing = store
        .get(&key)
        .await
        .with_context(|| format!("Unable to read transactions from '{key}'"))
        .pub_result(ErrorType::Store)?;

    let mut records = match existing.as_deref().map(str::trim) {
        None | Some("") => Vec::new(),
        Some(json) => parse_transactions(json)?,
    };

    let record = TransactionRecord::new(
        generate_transaction_id(),
        args.name.trim(),
        args.amount,
        args.transaction_type,
        Category::new(args.category.trim(), args.icon.clone().unwrap_or_default()),
        args.date
            .clone()
            .unwrap_or_else(|| TransactionDate::new(Utc::now())),
    );
    records.push(record.clone());

    let json = serialize_transactions(&records)?;
    store
        .set(&key, &json)
        .await
        .with_context(|| format!("Unable to write transactions to '{key}'"))
        .pub_result(ErrorType::Store)?;

    debug!("'{key}' now holds {} transactions", records.len());
    Ok(Out::new(
        format!(
            "Registered {} '{}' of {}",
            record.transaction_type(),
            record.name(),
            record.amount()
        ),
        record,
    ))
}

fn validate(args: &RegisterArgs) -> Result<()> {
    if args.name.trim().is_empty() {
        return Err(Error::new(ErrorType::Request, anyhow!("The name is required")));
    }
    if args.category.trim().is_empty() {
        return Err(Error::new(
            ErrorType::Request,
            anyhow!("The category is required"),
        ));
    }
    if args.amount.value().is_sign_negative() || args.amount.is_zero() {
        return Err(Error::new(
            ErrorType::Request,
            anyhow!(
                "The amount must be greater than zero, got {}; use --type negative for expenses",
                args.amount.value()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::KeyArgs;
    use crate::model::{Amount, TransactionType};
    use crate::store::StoreKey;
    use crate::test::TestEnv;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn pizza() -> RegisterArgs {
        RegisterArgs::new(
            "Pizza",
            Amount::new(dec!(40)),
            TransactionType::Negative,
            "Alimentação",
        )
        .with_icon("coffee")
        .with_date(TransactionDate::from_str("2023-01-10").unwrap())
    }

    #[tokio::test]
    async fn test_register_into_empty_store() {
        let env = TestEnv::new().await;
        let out = register(env.config(), pizza()).await.unwrap();
        assert_eq!(out.message(), "Registered negative 'Pizza' of R$ 40,00");

        let stored = env.stored(&env.config().store_key()).await.unwrap();
        let records = parse_transactions(&stored).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], *out.structure().unwrap());
        assert_eq!(records[0].category(), &Category::new("Alimentação", "coffee"));
        assert_eq!(records[0].date().as_str(), "2023-01-10");
    }

    #[tokio::test]
    async fn test_register_appends_in_order() {
        let env = TestEnv::new().await;
        env.seed(&env.config().store_key(), TestEnv::SAMPLE).await;
        register(env.config(), pizza()).await.unwrap();

        let stored = env.stored(&env.config().store_key()).await.unwrap();
        let records = parse_transactions(&stored).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Salário", "Pizza", "Pizza"]);
        assert_ne!(records[1].id(), records[2].id());
    }

    #[tokio::test]
    async fn test_register_defaults_date_to_now() {
        let env = TestEnv::new().await;
        let args = RegisterArgs::new(
            "Freela",
            Amount::new(dec!(250)),
            TransactionType::Positive,
            "Trabalho",
        );
        let before = Utc::now();
        let out = register(env.config(), args).await.unwrap();
        let date = out.structure().unwrap().date().timestamp();
        assert!(date >= before - chrono::Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_register_global_key() {
        let env = TestEnv::new().await;
        let args = pizza().with_key(KeyArgs::new(None, true));
        register(env.config(), args).await.unwrap();
        assert!(env.stored(&StoreKey::Global).await.is_some());
        assert!(env.stored(&env.config().store_key()).await.is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_non_positive_amount() {
        let env = TestEnv::new().await;
        for amount in [dec!(0), dec!(-5)] {
            let args = RegisterArgs::new(
                "x",
                Amount::new(amount),
                TransactionType::Positive,
                "c",
            );
            let err = register(env.config(), args).await.unwrap_err();
            assert_eq!(err.error_type(), ErrorType::Request);
        }
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let env = TestEnv::new().await;
        let args = RegisterArgs::new("  ", Amount::new(dec!(1)), TransactionType::Positive, "c");
        let err = register(env.config(), args).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Request);
    }

    #[tokio::test]
    async fn test_register_does_not_overwrite_malformed_data() {
        let env = TestEnv::new().await;
        let key = env.config().store_key();
        env.seed(&key, "garbage").await;
        let err = register(env.config(), pizza()).await.unwrap_err();
        assert!(err.is_parse());
        assert_eq!(env.stored(&key).await.as_deref(), Some("garbage"));
    }
}
