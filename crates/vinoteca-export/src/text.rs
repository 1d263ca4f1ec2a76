//! # Text Transforms
//!
//! Small string helpers shared by both renderers.
//!
//! ## Why the Currency Transform Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The PDF renderer uses the builtin core fonts, whose glyph set does    │
//! │  not include currency symbols like ₽ or €. Data payloads, however,     │
//! │  are arbitrary user text (names, producers, regions in any script)     │
//! │  and must flow through untouched.                                      │
//! │                                                                         │
//! │  So the transform is surgical: exactly four currency glyphs become     │
//! │  their three-letter codes, and EVERY other character - including       │
//! │  Cyrillic and CJK - passes through unchanged.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

/// The four glyph substitutions applied to report text.
const CURRENCY_CODES: [(char, &str); 4] = [
    ('₽', "RUB"),
    ('€', "EUR"),
    ('£', "GBP"),
    ('¥', "JPY"),
];

/// Replaces currency glyphs with their three-letter codes.
///
/// All other characters pass through unchanged.
pub fn sanitize_currency(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match CURRENCY_CODES.iter().find(|(glyph, _)| *glyph == ch) {
            Some((_, code)) => out.push_str(code),
            None => out.push(ch),
        }
    }
    out
}

/// Truncates to `max` visible characters, ellipsis included.
///
/// `max` must be larger than the three-dot marker for truncation to keep
/// any payload text; the table column budgets (30/25/20) always are.
pub fn truncate_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Formats an amount with two decimals and thousands separators,
/// e.g. `1234567.8` → `"1,234,567.80"`.
///
/// Used for narrative text only; spreadsheet cells carry plain numbers
/// with a dedicated number format instead.
pub fn format_amount(value: Decimal) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (integral, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let digits: Vec<char> = integral.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_exactly_the_four_currency_glyphs() {
        assert_eq!(sanitize_currency("1500 ₽"), "1500 RUB");
        assert_eq!(sanitize_currency("€ / £ / ¥"), "EUR / GBP / JPY");
    }

    #[test]
    fn non_latin_text_passes_through_unchanged() {
        let cyrillic = "Кьянти Классико ₽";
        assert_eq!(sanitize_currency(cyrillic), "Кьянти Классико RUB");

        let mixed = "château 🍷 登美の丘";
        assert_eq!(sanitize_currency(mixed), mixed);
    }

    #[test]
    fn truncation_budgets_include_the_ellipsis() {
        assert_eq!(truncate_ellipsis("short", 30), "short");

        let long = "A very long wine name that keeps going";
        let cut = truncate_ellipsis(long, 30);
        assert_eq!(cut.chars().count(), 30);
        assert!(cut.ends_with("..."));
        assert!(cut.starts_with("A very long wine name that"));

        // Exactly at the budget: untouched.
        let exact: String = "x".repeat(25);
        assert_eq!(truncate_ellipsis(&exact, 25), exact);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let cyrillic = "Очень длинное название вина продолжается";
        let cut = truncate_ellipsis(cyrillic, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(Decimal::new(0, 0)), "0.00");
        assert_eq!(format_amount(Decimal::new(1_500_00, 2)), "1,500.00");
        assert_eq!(format_amount(Decimal::new(1_234_567_80, 2)), "1,234,567.80");
        assert_eq!(format_amount(Decimal::new(999_99, 2)), "999.99");
        assert_eq!(format_amount(Decimal::new(-2_500_00, 2)), "-2,500.00");
    }
}
