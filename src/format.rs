//! Brazilian Portuguese (pt-BR) formatting for currency amounts and dates.
//!
//! The dashboard shows money as `R$ 1.234,56`, list dates as `05/01/23` and card dates as
//! `5 de janeiro`.

use chrono::{Datelike, Month, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// The currency symbol for the Brazilian real.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Formats `value` as BRL currency, e.g. `R$ 1.234,56` or `-R$ 60,00`.
pub fn currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let grouped = format_num::format_num!(",.2", rounded.abs().to_f64().unwrap_or_default());
    format!("{sign}{CURRENCY_SYMBOL} {}", swap_separators(&grouped))
}

/// Turns `1,234.56` into `1.234,56`.
fn swap_separators(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ',' => '.',
            '.' => ',',
            other => other,
        })
        .collect()
}

/// Formats a date as `dd/mm/yy`.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%y").to_string()
}

/// Formats a date as `<day> de <month>`, e.g. `5 de janeiro`.
pub fn day_and_month(date: NaiveDate) -> String {
    let month = Month::try_from(date.month() as u8).map_or("", month_name);
    format!("{} de {month}", date.day())
}

/// The lowercase Portuguese name of `month`.
pub fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "janeiro",
        Month::February => "fevereiro",
        Month::March => "março",
        Month::April => "abril",
        Month::May => "maio",
        Month::June => "junho",
        Month::July => "julho",
        Month::August => "agosto",
        Month::September => "setembro",
        Month::October => "outubro",
        Month::November => "novembro",
        Month::December => "dezembro",
    }
}
