use super::{print_json, State};
use decor_quotes::models::SettingsPatch;

pub fn show(state: &State) -> anyhow::Result<()> {
    print_json(state.settings())
}

pub fn payment_split(state: &mut State, deposit: f64, second: f64, balance: f64) -> anyhow::Result<()> {
    let patch = SettingsPatch {
        default_payment_deposit: Some(deposit),
        default_payment_second: Some(second),
        default_payment_balance: Some(balance),
        ..SettingsPatch::default()
    };
    let settings = state.update_settings(patch)?;
    print_json(settings)
}
