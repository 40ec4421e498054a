//! Plain-text rendering of the password tree and security overview.

use std::fmt::Write;

use passvault_core::strength;
use passvault_core::tree::query::{account_count, item_count};
use passvault_core::types::{SecurityOverview, Vault};

const MASK: &str = "••••••••";

/// Render the tree as an indented outline.
pub fn tree(vault: &Vault, show_passwords: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} items, {} accounts",
        item_count(vault),
        account_count(vault)
    );

    for category in &vault.categories {
        let _ = writeln!(out, "{} {}  [{}]", category.icon, category.name, category.id);
        for sub in &category.subcategories {
            let _ = writeln!(out, "  {}  [{}]", sub.name, sub.id);
            for item in &sub.items {
                let _ = writeln!(out, "    {} <{}>  [{}]", item.website, item.url, item.id);
                for (index, account) in item.accounts.iter().enumerate() {
                    let password = if show_passwords {
                        account.password.as_str()
                    } else {
                        MASK
                    };
                    let rating = strength::level(&account.password)
                        .map_or("-", passvault_core::types::StrengthLevel::label);
                    let _ = write!(
                        out,
                        "      #{index} {} / {password} ({rating})",
                        account.username
                    );
                    if !account.note.is_empty() {
                        let _ = write!(out, "  {}", account.note);
                    }
                    out.push('\n');
                }
            }
        }
    }
    out
}

/// Render the security overview.
pub fn security(overview: &SecurityOverview) -> String {
    match overview.stats() {
        None => "No accounts yet\n".to_string(),
        Some(stats) => format!(
            "Accounts: {}\n  strong: {} ({}%)\n  medium: {} ({}%)\n  weak:   {} ({}%)\n",
            stats.total,
            stats.strong,
            stats.strong_percent,
            stats.medium,
            stats.medium_percent,
            stats.weak,
            stats.weak_percent
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passwords_are_masked_by_default() {
        let text = tree(&Vault::sample(), false);
        assert!(text.contains("Docker Hub"));
        assert!(text.contains(MASK));
        assert!(!text.contains("docker123"));

        assert!(tree(&Vault::sample(), true).contains("docker123"));
    }

    #[test]
    fn empty_overview() {
        assert_eq!(security(&SecurityOverview::Empty), "No accounts yet\n");
    }
}
