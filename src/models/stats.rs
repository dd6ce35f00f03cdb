use serde::{Deserialize, Serialize};

use super::QuoteView;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub expiring_quotes: Vec<QuoteView>,
    pub upcoming_events: Vec<QuoteView>,
    pub monthly_quotes: usize,
    pub monthly_value: f64,
    pub conversion_rate: f64,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub value: f64,
}
