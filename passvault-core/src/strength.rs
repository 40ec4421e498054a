//! Password strength scoring.
//!
//! One point each for: length ≥ 8, length ≥ 12, mixed ASCII case, an ASCII
//! digit, and a character outside `[a-zA-Z0-9]`. Length counts characters,
//! not bytes.

use crate::types::{StrengthLevel, StrengthScore};

/// Score a password. Returns `None` ("no rating") for an empty password.
#[must_use]
pub fn score(password: &str) -> Option<StrengthScore> {
    if password.is_empty() {
        return None;
    }

    let len = password.chars().count();
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    let score = [
        len >= 8,
        len >= 12,
        has_lower && has_upper,
        has_digit,
        has_symbol,
    ]
    .into_iter()
    .map(u8::from)
    .sum();

    Some(StrengthScore {
        level: level_for(score),
        score,
    })
}

fn level_for(score: u8) -> StrengthLevel {
    match score {
        0..=2 => StrengthLevel::Weak,
        3 => StrengthLevel::Medium,
        _ => StrengthLevel::Strong,
    }
}

/// Shorthand for the strength level only.
#[must_use]
pub fn level(password: &str) -> Option<StrengthLevel> {
    score(password).map(|s| s.level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_is_unrated() {
        assert_eq!(score(""), None);
    }

    #[test]
    fn short_mixed_password_is_medium() {
        // length 6: no length points; mixed case + digit + symbol
        let s = score("Sh0rt!").unwrap();
        assert_eq!(s.score, 3);
        assert_eq!(s.level, StrengthLevel::Medium);
    }

    #[test]
    fn lowercase_only_is_weak() {
        let s = score("docker123").unwrap();
        assert_eq!(s.score, 2);
        assert_eq!(s.level, StrengthLevel::Weak);
        assert_eq!(score("abc").unwrap().score, 0);
    }

    #[test]
    fn long_complex_password_is_strong() {
        let s = score("Correct-Horse-Battery-9").unwrap();
        assert_eq!(s.score, 5);
        assert_eq!(s.level, StrengthLevel::Strong);
    }

    #[test]
    fn length_counts_characters() {
        // 8 CJK characters: one length point plus the symbol point
        let s = score("密码密码密码密码").unwrap();
        assert_eq!(s.score, 2);
    }

    #[test]
    fn adding_a_missing_class_never_lowers_the_score() {
        let bases = ["abc", "abcdefgh", "ABCDEFGHIJKL", "a1", "x!", "Password"];
        let additions = ["7", "#", "Q", "q"];
        for base in bases {
            let before = score(base).unwrap().score;
            for add in additions {
                let after = score(&format!("{base}{add}")).unwrap().score;
                assert!(after >= before, "{base} + {add}: {after} < {before}");
            }
        }
    }

    #[test]
    fn level_shorthand() {
        assert_eq!(level("Aa1!Aa1!Aa1!"), Some(StrengthLevel::Strong));
        assert_eq!(level(""), None);
    }
}
