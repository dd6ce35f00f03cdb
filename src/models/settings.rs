use serde::{Deserialize, Serialize};

use super::{PdfTemplate, TaxRegime};
use crate::db::merge_fields;
use crate::errors::ValidationError;

const DEFAULT_NOTES: &str =
    "Eventuali danni agli accessori saranno addebitati al costo corrente di mercato.";

const DEFAULT_CONDITIONS: &str = "Il presente preventivo ha validità 30 giorni dalla data di emissione. \
I prezzi indicati si intendono IVA esclusa salvo diversa indicazione. \
Eventuali variazioni richieste dopo la conferma potranno comportare adeguamenti di prezzo.";

/// Process-wide company configuration. Stored values are read over
/// [`Default`], so fields added later still get a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanySettings {
    pub company_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub vat_number: String,
    pub logo_path: String,
    pub tax_regime: TaxRegime,
    pub vat_rate: f64,
    pub default_template: PdfTemplate,
    pub default_payment_deposit: f64,
    pub default_payment_second: f64,
    pub default_payment_balance: f64,
    pub default_notes: String,
    pub default_conditions: String,
    pub quote_prefix: String,
    pub quote_start_number: u32,
}

impl Default for CompanySettings {
    fn default() -> Self {
        CompanySettings {
            company_name: "Stella Filella Wedding & Events".to_string(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            vat_number: String::new(),
            logo_path: String::new(),
            tax_regime: TaxRegime::FlatRate,
            vat_rate: 22.0,
            default_template: PdfTemplate::Elegant,
            default_payment_deposit: 30.0,
            default_payment_second: 30.0,
            default_payment_balance: 40.0,
            default_notes: DEFAULT_NOTES.to_string(),
            default_conditions: DEFAULT_CONDITIONS.to_string(),
            quote_prefix: "PRV".to_string(),
            quote_start_number: 1,
        }
    }
}

impl CompanySettings {
    pub fn payment_split_sum(&self) -> f64 {
        self.default_payment_deposit + self.default_payment_second + self.default_payment_balance
    }

    /// The default split is a hard requirement: it must total 100%.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let sum = self.payment_split_sum();
        if (sum - 100.0).abs() > 1e-9 {
            return Err(ValidationError::PaymentSplit { sum });
        }
        Ok(())
    }

    pub fn merge(&mut self, patch: SettingsPatch) {
        merge_fields!(
            self,
            patch,
            [
                company_name,
                address,
                phone,
                email,
                vat_number,
                logo_path,
                tax_regime,
                vat_rate,
                default_template,
                default_payment_deposit,
                default_payment_second,
                default_payment_balance,
                default_notes,
                default_conditions,
                quote_prefix,
                quote_start_number,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub vat_number: Option<String>,
    pub logo_path: Option<String>,
    pub tax_regime: Option<TaxRegime>,
    pub vat_rate: Option<f64>,
    pub default_template: Option<PdfTemplate>,
    pub default_payment_deposit: Option<f64>,
    pub default_payment_second: Option<f64>,
    pub default_payment_balance: Option<f64>,
    pub default_notes: Option<String>,
    pub default_conditions: Option<String>,
    pub quote_prefix: Option<String>,
    pub quote_start_number: Option<u32>,
}
