//! # Reports Feature
//!
//! Income/expense summaries over fixed periods: totals, balance, and
//! per-category breakdowns.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;

use crate::database::{Database, EntryKind, LedgerEntry};
use crate::features::ledger::{capitalize, DATETIME_FORMAT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportPeriod {
    All,
    Today,
    Week,
    Year,
}

impl ReportPeriod {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(ReportPeriod::All),
            "today" => Some(ReportPeriod::Today),
            "week" => Some(ReportPeriod::Week),
            "year" => Some(ReportPeriod::Year),
            _ => None,
        }
    }
}

/// Build the report for a channel. `now` is injected so period boundaries are
/// testable.
pub async fn generate(
    db: &Database,
    channel_id: u64,
    period: ReportPeriod,
    now: NaiveDateTime,
) -> Result<String> {
    match period {
        ReportPeriod::All => {
            let entries = db.entries(channel_id, None).await?;
            if entries.is_empty() {
                return Ok("📊 No transactions yet".to_string());
            }
            Ok(format_report(&entries, "all time"))
        }
        ReportPeriod::Today => {
            let start = now.date().and_hms_opt(0, 0, 0).unwrap_or(now);
            let entries = db
                .entries(channel_id, Some(&start.format(DATETIME_FORMAT).to_string()))
                .await?;
            if entries.is_empty() {
                return Ok("📊 No transactions today".to_string());
            }
            Ok(format_report(&entries, "today"))
        }
        ReportPeriod::Week => {
            let Some(first) = first_entry_time(db, channel_id).await? else {
                return Ok("📊 No transactions yet".to_string());
            };
            let days_with_data = (now - first).num_days() + 1;
            if days_with_data < 7 {
                return Ok(format!(
                    "📊 You have only {days_with_data} day(s) of data. The weekly report unlocks after 7 days of use"
                ));
            }
            let week_ago = now - Duration::weeks(1);
            let start = if first > week_ago { first } else { week_ago };
            let entries = db
                .entries(channel_id, Some(&start.format(DATETIME_FORMAT).to_string()))
                .await?;
            if entries.is_empty() {
                return Ok("📊 No transactions this week".to_string());
            }
            let days = (now - start).num_days() + 1;
            Ok(format_report(&entries, &format!("the week ({days} days)")))
        }
        ReportPeriod::Year => {
            let Some(first) = first_entry_time(db, channel_id).await? else {
                return Ok("📊 No transactions yet".to_string());
            };
            let year_ago = now - Duration::days(365);
            if first > year_ago {
                let days_with_data = (now - first).num_days() + 1;
                return Ok(format!(
                    "📊 You have only {days_with_data} day(s) of data. The yearly report unlocks after a year of use"
                ));
            }
            let entries = db
                .entries(
                    channel_id,
                    Some(&year_ago.format(DATETIME_FORMAT).to_string()),
                )
                .await?;
            if entries.is_empty() {
                return Ok("📊 No transactions this year".to_string());
            }
            let days = (now - year_ago).num_days() + 1;
            Ok(format_report(&entries, &format!("the year ({days} days)")))
        }
    }
}

async fn first_entry_time(db: &Database, channel_id: u64) -> Result<Option<NaiveDateTime>> {
    Ok(db
        .first_entry_at(channel_id)
        .await?
        .and_then(|s| NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).ok()))
}

fn format_report(entries: &[LedgerEntry], period_name: &str) -> String {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut income_by_category: BTreeMap<&str, f64> = BTreeMap::new();
    let mut expense_by_category: BTreeMap<&str, f64> = BTreeMap::new();

    for entry in entries {
        match entry.kind {
            EntryKind::Income => {
                total_income += entry.amount;
                *income_by_category.entry(&entry.category).or_default() += entry.amount;
            }
            EntryKind::Expense => {
                total_expense += entry.amount;
                *expense_by_category.entry(&entry.category).or_default() += entry.amount;
            }
        }
    }

    let mut report = format!("📊 Report for {period_name}:\n\n");
    report.push_str(&format!("💰 Income: {total_income:.2}\n"));
    report.push_str(&format!("💸 Expenses: {total_expense:.2}\n"));
    report.push_str(&format!("⚖️ Balance: {:.2}\n\n", total_income - total_expense));

    if !income_by_category.is_empty() {
        report.push_str("📈 Income by category:\n");
        for (category, amount) in &income_by_category {
            report.push_str(&format!("  • {}: {amount:.2}\n", capitalize(category)));
        }
        report.push('\n');
    }

    if !expense_by_category.is_empty() {
        report.push_str("📉 Expenses by category:\n");
        for (category, amount) in &expense_by_category {
            report.push_str(&format!("  • {}: {amount:.2}\n", capitalize(category)));
        }
    }

    report.push_str(&format!("\nTotal operations: {}", entries.len()));
    report
}
