use crate::models::{CompanySettings, Quote};

#[derive(Debug, Clone, PartialEq)]
pub struct NumberingConfig {
    pub prefix: String,
    pub start_number: u32,
}

impl From<&CompanySettings> for NumberingConfig {
    fn from(settings: &CompanySettings) -> Self {
        NumberingConfig {
            prefix: settings.quote_prefix.clone(),
            start_number: settings.quote_start_number,
        }
    }
}

pub fn format_quote_number(prefix: &str, year: i32, sequence: u32) -> String {
    format!("{}-{}-{:04}", prefix, year, sequence)
}

/// `PREFIX-YEAR-NNNN`, one above the highest sequence already used in `year`.
///
/// The sequence restarts every year at the configured start number. It is
/// derived by scanning existing numbers, so gaps are never refilled and a
/// hand-edited number simply moves the maximum.
pub fn next_quote_number(quotes: &[Quote], config: &NumberingConfig, year: i32) -> String {
    let marker = format!("-{}-", year);
    let highest = quotes
        .iter()
        .filter(|quote| quote.number.contains(&marker))
        .map(|quote| trailing_sequence(&quote.number))
        .max();

    let next = match highest {
        Some(max) => max.saturating_add(1),
        None => config.start_number,
    };

    format_quote_number(&config.prefix, year, next)
}

/// Leading digits of the last `-` token, so `0004b` reads as 4. No digits reads as 0.
fn trailing_sequence(number: &str) -> u32 {
    let token = number.rsplit('-').next().unwrap_or_default().trim_start();
    let digits: String = token.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}
