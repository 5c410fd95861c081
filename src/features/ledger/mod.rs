//! # Ledger Feature
//!
//! Income/expense bookkeeping: record entries, list categories, delete one
//! category through the numbered-choice dialog, clear history.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::Result;
use chrono::Local;

use crate::database::{Database, EntryKind};

/// Timestamp format used for ledger rows.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse dialog input like `Food 500` or `500 Food` (comma decimals accepted).
///
/// Exactly two whitespace-separated tokens, one numeric: returns the
/// lowercased category and the amount. `Err` carries the user-facing hint.
pub fn parse_entry_input(text: &str) -> Result<(String, f64), &'static str> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.len() {
        0 | 1 => Err("⚠️ Enter a category and an amount separated by a space. Example: Food 500"),
        2 => {
            let (first, second) = (parts[0], parts[1]);
            if let Some(amount) = parse_amount(first) {
                Ok((second.to_lowercase(), amount))
            } else if let Some(amount) = parse_amount(second) {
                Ok((first.to_lowercase(), amount))
            } else {
                Err("⚠️ One field must be a number (the amount). Example: 500 Food")
            }
        }
        _ => Err("⚠️ Only one entry can be added at a time."),
    }
}

fn parse_amount(s: &str) -> Option<f64> {
    s.replace(',', ".").parse().ok().filter(|v: &f64| v.is_finite())
}

/// Record one entry and reply with the running category overview.
pub async fn record_entry(
    db: &Database,
    channel_id: u64,
    category: &str,
    amount: f64,
    kind: EntryKind,
) -> Result<String> {
    let category = category.to_lowercase();
    let now = Local::now().naive_local().format(DATETIME_FORMAT).to_string();
    db.add_entry(channel_id, &category, amount, kind, &now).await?;

    let categories: Vec<String> = db
        .entries(channel_id, None)
        .await?
        .into_iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.category)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut reply = match kind {
        EntryKind::Expense => format!(
            "✅ 💸 Expense recorded: {:.2} ({})\n\n",
            amount,
            capitalize(&category)
        ),
        EntryKind::Income => format!(
            "✅ 💰 Income recorded: {:.2} ({})\n\n",
            amount,
            capitalize(&category)
        ),
    };

    if categories.is_empty() {
        reply.push_str("❗ No categories yet.");
    } else {
        reply.push_str(match kind {
            EntryKind::Expense => "📉 Expense categories:\n",
            EntryKind::Income => "📈 Income categories:\n",
        });
        for (i, category) in categories.iter().enumerate() {
            reply.push_str(&format!("{}. {}\n", i + 1, capitalize(category)));
        }
    }
    Ok(reply)
}

/// Numbered category list shown before an ordinal-based deletion.
///
/// The caller is responsible for arming the awaiting-category-choice mode.
pub async fn deletion_prompt(db: &Database, channel_id: u64) -> Result<Option<String>> {
    let categories = db.categories(channel_id).await?;
    if categories.is_empty() {
        return Ok(None);
    }

    let mut prompt = String::from("🗑️ Choose a category to delete:\n\n");
    for (i, category) in categories.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, capitalize(category)));
    }
    prompt.push_str("\n💡 Reply with the category number to delete it");
    Ok(Some(prompt))
}

/// Delete the category at the 1-based `ordinal` of the sorted category list.
pub async fn delete_by_ordinal(db: &Database, channel_id: u64, ordinal: usize) -> Result<String> {
    let categories = db.categories(channel_id).await?;
    if ordinal < 1 || ordinal > categories.len() {
        return Ok("❌ Invalid category number".to_string());
    }

    let category = &categories[ordinal - 1];
    let removed = db.delete_category(channel_id, category).await?;
    let mut reply = format!(
        "✅ Category \"{}\" deleted!\nEntries removed: {removed}",
        capitalize(category)
    );

    let remaining = db.categories(channel_id).await?;
    if remaining.is_empty() {
        reply.push_str("\n📝 You have no categories left");
    } else {
        reply.push_str("\n📁 Remaining categories:\n");
        for (i, category) in remaining.iter().enumerate() {
            reply.push_str(&format!("{}. {}\n", i + 1, capitalize(category)));
        }
    }
    Ok(reply)
}

/// Wipe the channel's whole history.
pub async fn clear_history(db: &Database, channel_id: u64) -> Result<String> {
    let removed = db.clear_entries(channel_id).await?;
    if removed == 0 {
        Ok("📭 History is already empty".to_string())
    } else {
        Ok(format!("🗑️ History cleared! {removed} entries removed"))
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_input_both_orders() {
        assert_eq!(parse_entry_input("Food 500"), Ok(("food".into(), 500.0)));
        assert_eq!(parse_entry_input("500 Food"), Ok(("food".into(), 500.0)));
        assert_eq!(parse_entry_input("12,50 Coffee"), Ok(("coffee".into(), 12.5)));
    }

    #[test]
    fn test_parse_entry_input_rejects_bad_shapes() {
        assert!(parse_entry_input("Food").is_err());
        assert!(parse_entry_input("").is_err());
        assert!(parse_entry_input("Food 500 Rent 300").is_err());
        assert!(parse_entry_input("Food Rent").is_err());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("food"), "Food");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éclair"), "Éclair");
    }

    #[tokio::test]
    async fn test_record_entry_lists_categories_of_same_kind() {
        let db = Database::in_memory().await.unwrap();
        record_entry(&db, 1, "Salary", 2000.0, EntryKind::Income)
            .await
            .unwrap();
        let reply = record_entry(&db, 1, "Food", 500.0, EntryKind::Expense)
            .await
            .unwrap();

        assert!(reply.contains("Expense recorded: 500.00"));
        assert!(reply.contains("Food"));
        assert!(!reply.contains("Salary"), "income category not in expense list");
    }

    #[tokio::test]
    async fn test_delete_by_ordinal_range_checks() {
        let db = Database::in_memory().await.unwrap();
        record_entry(&db, 1, "food", 1.0, EntryKind::Expense)
            .await
            .unwrap();

        assert!(delete_by_ordinal(&db, 1, 0).await.unwrap().contains("Invalid"));
        assert!(delete_by_ordinal(&db, 1, 2).await.unwrap().contains("Invalid"));

        let reply = delete_by_ordinal(&db, 1, 1).await.unwrap();
        assert!(reply.contains("\"Food\" deleted"));
        assert!(reply.contains("no categories left"));
    }

    #[tokio::test]
    async fn test_clear_history_reports_count() {
        let db = Database::in_memory().await.unwrap();
        assert!(clear_history(&db, 1).await.unwrap().contains("already empty"));

        record_entry(&db, 1, "food", 1.0, EntryKind::Expense)
            .await
            .unwrap();
        record_entry(&db, 1, "rent", 2.0, EntryKind::Expense)
            .await
            .unwrap();
        assert!(clear_history(&db, 1).await.unwrap().contains("2 entries"));
    }
}
