//! Quote money: line amounts, discount, VAT and payment instalments.
//!
//! Every function here is pure. Callers re-run them whenever an input
//! changes (items, discount, tax settings) and persist the result; nothing
//! is derived reactively. Each derived value is rounded to cents as soon as
//! it is computed so reloaded totals match what was stored.

use serde::Serialize;

use crate::models::{CompanySettings, DiscountType, PaymentPlan, PaymentPlanDraft, QuoteItem, QuoteItemDraft, TaxRegime};
use crate::utils::round2;

/// Tax inputs taken from the company settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    pub tax_regime: TaxRegime,
    pub vat_rate: f64,
}

impl PricingConfig {
    /// The rate stored on a quote: zero under the flat-rate regime.
    pub fn effective_tax_rate(&self) -> f64 {
        match self.tax_regime {
            TaxRegime::FlatRate => 0.0,
            TaxRegime::Ordinary => self.vat_rate,
        }
    }
}

impl From<&CompanySettings> for PricingConfig {
    fn from(settings: &CompanySettings) -> Self {
        PricingConfig {
            tax_regime: settings.tax_regime,
            vat_rate: settings.vat_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Discount {
    pub kind: Option<DiscountType>,
    pub value: f64,
}

impl Discount {
    pub fn none() -> Self {
        Discount::default()
    }

    pub fn percentage(value: f64) -> Self {
        Discount {
            kind: Some(DiscountType::Percentage),
            value,
        }
    }

    pub fn fixed(value: f64) -> Self {
        Discount {
            kind: Some(DiscountType::Fixed),
            value,
        }
    }

    /// Fixed discounts are not clamped to the subtotal.
    pub fn amount_on(&self, subtotal: f64) -> f64 {
        if self.value <= 0.0 {
            return 0.0;
        }
        match self.kind {
            None => 0.0,
            Some(DiscountType::Percentage) => round2(subtotal * self.value / 100.0),
            Some(DiscountType::Fixed) => round2(self.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub after_discount: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// Anything that can sit on a quote as a priced line.
pub trait PricedLine {
    fn amount(&self) -> f64;
    fn is_gift(&self) -> bool;
}

impl PricedLine for QuoteItem {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn is_gift(&self) -> bool {
        self.is_gift
    }
}

impl PricedLine for QuoteItemDraft {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn is_gift(&self) -> bool {
        self.is_gift
    }
}

impl<L: PricedLine> PricedLine for &L {
    fn amount(&self) -> f64 {
        (**self).amount()
    }

    fn is_gift(&self) -> bool {
        (**self).is_gift()
    }
}

pub fn line_amount(quantity: i64, unit_price: f64) -> f64 {
    round2(quantity as f64 * unit_price)
}

pub fn payment_amount(total: f64, percentage: f64) -> f64 {
    round2(total * percentage / 100.0)
}

/// Gift lines are shown with their price but never counted.
pub fn subtotal<L: PricedLine>(items: &[L]) -> f64 {
    round2(
        items
            .iter()
            .filter(|item| !item.is_gift())
            .map(|item| item.amount())
            .sum(),
    )
}

pub fn compute_totals<L: PricedLine>(items: &[L], discount: Discount, config: &PricingConfig) -> QuoteTotals {
    let subtotal = subtotal(items);
    let discount_amount = discount.amount_on(subtotal);
    let after_discount = round2(subtotal - discount_amount);
    let tax_rate = config.effective_tax_rate();
    let tax_amount = round2(after_discount * tax_rate / 100.0);
    let total = round2(after_discount + tax_amount);

    QuoteTotals {
        subtotal,
        discount_amount,
        after_discount,
        tax_rate,
        tax_amount,
        total,
    }
}

/// Reprices every instalment against a new total. Percentages are kept as
/// entered, whatever they add up to.
pub fn reprice_payment_plans<'a, I>(plans: I, total: f64) -> usize
where
    I: IntoIterator<Item = &'a mut PaymentPlan>,
{
    let mut count = 0;
    for plan in plans {
        plan.amount = payment_amount(total, plan.percentage);
        count += 1;
    }
    count
}

pub fn reprice_payment_drafts(plans: &mut [PaymentPlanDraft], total: f64) {
    for plan in plans.iter_mut() {
        plan.amount = payment_amount(total, plan.percentage);
    }
}

/// Soft check on a quote's schedule. Returns a warning when the percentages
/// do not add up to 100; saving goes ahead either way.
pub fn payment_split_warning<'a, I>(percentages: I) -> Option<String>
where
    I: IntoIterator<Item = &'a f64>,
{
    let sum: f64 = percentages.into_iter().sum();
    if (sum - 100.0).abs() > 1e-9 {
        return Some(format!(
            "Payment percentages add up to {}% (expected 100%)",
            sum
        ));
    }
    None
}

/// The three-instalment schedule a new quote starts from.
pub fn default_payment_plan(settings: &CompanySettings, total: f64) -> Vec<PaymentPlanDraft> {
    vec![
        PaymentPlanDraft::new("Acconto alla firma", settings.default_payment_deposit, total),
        PaymentPlanDraft::new("Seconda rata", settings.default_payment_second, total),
        PaymentPlanDraft::new("Saldo", settings.default_payment_balance, total),
    ]
}
