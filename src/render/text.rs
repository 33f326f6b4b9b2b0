use crate::render::Typeface;
use num_format::{Locale, ToFormattedString};

pub const ELLIPSIS: char = '…';

// Shortens `text` one character at a time until it measures within `max_width`.
// Never goes below one character plus the ellipsis.
pub fn fit_text<T: Typeface + ?Sized>(face: &T, text: &str, size: f32, max_width: f32) -> String {
    if face.text_width(text, size) <= max_width {
        return text.to_string();
    }

    let mut chars: Vec<char> = text.chars().collect();
    while chars.len() > 1 {
        chars.pop();
        let candidate = with_ellipsis(&chars);
        if face.text_width(&candidate, size) <= max_width {
            return candidate;
        }
    }
    with_ellipsis(&chars)
}

fn with_ellipsis(chars: &[char]) -> String {
    let base: String = chars.iter().collect();
    let trimmed = base.trim_end();
    // Keep at least the first character even if it was whitespace
    let mut label = if trimmed.is_empty() { base.clone() } else { trimmed.to_string() };
    label.push(ELLIPSIS);
    label
}

pub fn format_amount(amount: f64) -> String {
    (amount.round() as i64).to_formatted_string(&Locale::en)
}

pub fn format_percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as i64)
}

pub fn support_label(amount: f64, fraction: f64) -> String {
    format!("{} MKR - {}", format_amount(amount), format_percent(fraction))
}

// Blank once the spell has caught up with the hat
pub fn shortfall_label(support_amount: f64, hat_amount: f64) -> String {
    let shortfall = (hat_amount - support_amount).round();
    if shortfall > 0.0 {
        format!("{} more needed", format_amount(shortfall))
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::FixedWidth;

    #[test]
    fn short_text_is_left_untouched() {
        assert_eq!(fit_text(&FixedWidth(7.0), "Yes", 12.0, 125.0), "Yes");
    }

    #[test]
    fn long_title_is_cut_to_fit_with_ellipsis() {
        let face = FixedWidth(7.0);
        let title = "A very long poll title that exceeds the column";
        let fitted = fit_text(&face, title, 14.0, 250.0);

        assert!(fitted.ends_with(ELLIPSIS));
        assert!(face.text_width(&fitted, 14.0) <= 250.0);
        // 35 characters at 7px is the widest label that still fits
        assert_eq!(fitted.chars().count(), 35);
        assert!(title.starts_with(fitted.trim_end_matches(ELLIPSIS)));
    }

    #[test]
    fn labels_floor_at_one_character_in_narrow_columns() {
        let fitted = fit_text(&FixedWidth(7.0), "Stability fee", 12.0, 3.0);
        assert_eq!(fitted, "S…");
    }

    #[test]
    fn amounts_use_thousands_grouping() {
        assert_eq!(format_amount(50000.0), "50,000");
        assert_eq!(format_amount(1234567.6), "1,234,568");
        assert_eq!(format_amount(12.4), "12");
    }

    #[test]
    fn percentages_round_for_display() {
        assert_eq!(format_percent(0.625), "63%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(support_label(50000.0, 0.5), "50,000 MKR - 50%");
    }

    #[test]
    fn shortfall_is_blank_when_spell_matches_hat() {
        assert_eq!(shortfall_label(50000.0, 100000.0), "50,000 more needed");
        assert_eq!(shortfall_label(100000.0, 100000.0), "");
        assert_eq!(shortfall_label(120000.0, 100000.0), "");
    }
}
