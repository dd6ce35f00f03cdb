use chrono::{Datelike, Days, NaiveDate};

use crate::db::{DocumentStore, KeyValueBackend, StoreResult};
use crate::models::{DashboardStats, MonthlyRevenue, QuoteStatus, QuoteView};
use crate::services::quotes::list_quotes;
use crate::utils::{parse_calendar_date, round2};

const MONTH_LABELS: [&str; 12] = [
    "Gen", "Feb", "Mar", "Apr", "Mag", "Giu", "Lug", "Ago", "Set", "Ott", "Nov", "Dic",
];

const EXPIRY_WINDOW_DAYS: u64 = 30;
const UPCOMING_EVENTS_LIMIT: usize = 5;

pub fn dashboard_stats<B: KeyValueBackend>(store: &DocumentStore<B>, today: NaiveDate) -> StoreResult<DashboardStats> {
    Ok(compute_stats(&list_quotes(store)?, today))
}

/// Read-only dashboard view over every quote, relative to `today`.
///
/// Quote counts and value bucket by creation date; the revenue series
/// buckets by event date.
pub fn compute_stats(quotes: &[QuoteView], today: NaiveDate) -> DashboardStats {
    let horizon = today
        .checked_add_days(Days::new(EXPIRY_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let expiring_quotes = quotes
        .iter()
        .filter(|view| view.quote.status.is_open())
        .filter(|view| {
            parse_calendar_date(&view.quote.expiry_date)
                .map(|expiry| expiry >= today && expiry <= horizon)
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    let mut upcoming: Vec<(NaiveDate, &QuoteView)> = quotes
        .iter()
        .filter(|view| view.quote.status == QuoteStatus::Confirmed)
        .filter_map(|view| parse_calendar_date(&view.quote.event_date).map(|date| (date, view)))
        .filter(|(date, _)| *date >= today)
        .collect();
    upcoming.sort_by_key(|(date, _)| *date);
    let upcoming_events = upcoming
        .into_iter()
        .take(UPCOMING_EVENTS_LIMIT)
        .map(|(_, view)| view.clone())
        .collect();

    let this_month: Vec<&QuoteView> = quotes
        .iter()
        .filter(|view| {
            parse_calendar_date(&view.quote.created_at)
                .map(|created| same_month(created, today))
                .unwrap_or(false)
        })
        .collect();
    let won_this_month = this_month.iter().filter(|view| view.quote.status.is_won()).count();
    let conversion_rate = if this_month.is_empty() {
        0.0
    } else {
        won_this_month as f64 / this_month.len() as f64 * 100.0
    };
    let monthly_value = round2(this_month.iter().map(|view| view.quote.total).sum());

    let monthly_revenue = MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let value = quotes
                .iter()
                .filter(|view| view.quote.status.is_won())
                .filter(|view| {
                    parse_calendar_date(&view.quote.event_date)
                        .map(|date| date.year() == today.year() && date.month0() as usize == idx)
                        .unwrap_or(false)
                })
                .map(|view| view.quote.total)
                .sum();
            MonthlyRevenue {
                month: label.to_string(),
                value: round2(value),
            }
        })
        .collect();

    DashboardStats {
        expiring_quotes,
        upcoming_events,
        monthly_quotes: this_month.len(),
        monthly_value,
        conversion_rate,
        monthly_revenue,
    }
}

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}
