//! Tests for the document store and quote logic.
//! Store logic runs over the in-memory backend; persistence tests use a
//! temporary SQLite file.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::db::{DocumentStore, KeyValueBackend, MemoryBackend, SqliteBackend, EXPORT_KEYS};
    use crate::errors::{Error, ValidationError};
    use crate::models::{
        Client, ClientPatch, CompanySettings, Flower, Greenery, NewCategory, NewClient, NewQuote, NewService,
        PaymentPlan, PaymentPlanDraft, Quote, QuoteItem, QuoteItemDraft, QuotePatch, QuoteStatus, QuoteView, Service,
        ServiceCategory, SettingsPatch, TaxRegime, WeddingArea, WeddingDetails, WeddingDetailsDraft,
        WeddingSelections, WeddingStyle,
    };
    use crate::services::numbering::{next_quote_number, NumberingConfig};
    use crate::services::pricing::{
        compute_totals, default_payment_plan, payment_split_warning, reprice_payment_drafts, Discount,
        PricingConfig,
    };
    use crate::services::quotes::{
        create_service, delete_quote, duplicate_quote, list_categories, list_quotes, list_services, payment_plans,
        quote_items, recompute_quote, save_payment_plans, save_quote_items, save_wedding_details,
        services_by_category, wedding_details,
    };
    use crate::services::renderer::{load_quote_document, DEFAULT_ACCENT_COLOR};
    use crate::services::seed::seed_catalogue;
    use crate::services::state::AppState;
    use crate::services::stats::compute_stats;
    use crate::services::transfer::{export_all_data, import_all_data};
    use crate::services::wedding::{apply_selections, decode_list, selections, ListEncoding};

    fn memory_store() -> DocumentStore<MemoryBackend> {
        DocumentStore::new(MemoryBackend::new())
    }

    fn create_client(store: &DocumentStore<MemoryBackend>, name: &str) -> Client {
        store
            .create::<Client>(NewClient {
                name: name.to_string(),
                ..NewClient::default()
            })
            .unwrap()
    }

    fn create_quote(store: &DocumentStore<MemoryBackend>, number: &str, client_id: i64) -> Quote {
        store
            .create::<Quote>(NewQuote {
                number: number.to_string(),
                client_id,
                ..NewQuote::default()
            })
            .unwrap()
    }

    /// Populates one quote with two lines, wedding details and a 30/30/40 plan.
    fn fill_quote(store: &DocumentStore<MemoryBackend>, quote_id: i64) {
        save_quote_items(
            store,
            quote_id,
            vec![
                QuoteItemDraft::new("Chiesa", "Bouquet sposa", 2, 100.0),
                QuoteItemDraft::new("Chiesa", "Bottoniere", 1, 50.0).as_gift(),
            ],
        )
        .unwrap();
        save_wedding_details(
            store,
            quote_id,
            WeddingDetailsDraft {
                bride_name: "Giulia".to_string(),
                groom_name: "Marco".to_string(),
                ..WeddingDetailsDraft::default()
            },
        )
        .unwrap();
        save_payment_plans(store, quote_id, default_payment_plan(&CompanySettings::default(), 0.0)).unwrap();
    }

    fn assert_money(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.005,
            "expected {expected}, got {actual}"
        );
    }

    fn flat_rate() -> PricingConfig {
        PricingConfig {
            tax_regime: TaxRegime::FlatRate,
            vat_rate: 22.0,
        }
    }

    fn ordinary() -> PricingConfig {
        PricingConfig {
            tax_regime: TaxRegime::Ordinary,
            vat_rate: 22.0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn view(status: QuoteStatus, created: &str, event: &str, expiry: &str, total: f64) -> QuoteView {
        QuoteView {
            quote: Quote {
                status,
                created_at: created.to_string(),
                event_date: event.to_string(),
                expiry_date: expiry.to_string(),
                total,
                ..Quote::default()
            },
            client_name: "Rossi".to_string(),
        }
    }

    // ===== DOCUMENT STORE TESTS =====

    #[test]
    fn test_create_assigns_next_id() {
        let store = memory_store();

        let first = create_client(&store, "Anna");
        let second = create_client(&store, "Bruno");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        let names: Vec<String> = store.list::<Client>().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Anna", "Bruno"]);
        assert!(!first.created_at.is_empty());
        assert_eq!(first.created_at, first.updated_at);
    }

    #[test]
    fn test_next_id_follows_stored_rows() {
        let store = memory_store();
        assert_eq!(store.next_id::<Client>().unwrap(), 1);

        let client = create_client(&store, "Anna");
        assert_eq!(store.next_id::<Client>().unwrap(), 2);

        assert!(store.delete::<Client>(client.id).unwrap());
        assert!(!store.delete::<Client>(client.id).unwrap());
        assert_eq!(store.next_id::<Client>().unwrap(), 1);
    }

    #[test]
    fn test_update_missing_row_returns_none() {
        let store = memory_store();

        let result = store.update::<Client>(42, ClientPatch::default()).unwrap();

        assert!(result.is_none());
        assert!(store.backend().get("clients").unwrap().is_none());
    }

    #[test]
    fn test_update_merges_given_fields_only() {
        let store = memory_store();
        let client = store
            .create::<Client>(NewClient {
                name: "Anna".to_string(),
                email: "anna@example.com".to_string(),
                ..NewClient::default()
            })
            .unwrap();

        let patch = ClientPatch {
            name: Some("Anna Rossi".to_string()),
            ..ClientPatch::default()
        };
        let updated = store.update::<Client>(client.id, patch).unwrap().unwrap();

        assert_eq!(updated.name, "Anna Rossi");
        assert_eq!(updated.email, "anna@example.com");
        assert_eq!(updated.created_at, client.created_at);
        assert_eq!(store.find::<Client>(client.id).unwrap().unwrap().name, "Anna Rossi");
    }

    #[test]
    fn test_corrupt_collection_reads_as_empty() {
        let store = memory_store();
        store.backend().set("clients", "{not json").unwrap();

        assert!(store.list::<Client>().unwrap().is_empty());

        let client = create_client(&store, "Anna");
        assert_eq!(client.id, 1);
        assert_eq!(store.list::<Client>().unwrap().len(), 1);
    }

    #[test]
    fn test_partial_rows_gain_defaults_and_italian_values_load() {
        let store = memory_store();
        store
            .backend()
            .set(
                "quotes",
                r#"[{"id":3,"number":"PRV-2024-0007","status":"confermato","eventType":"battesimo"}]"#,
            )
            .unwrap();

        let quotes = store.list::<Quote>().unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].status, QuoteStatus::Confirmed);
        assert_eq!(quotes[0].discount_type, None);
        assert_eq!(quotes[0].total, 0.0);
        assert_eq!(store.next_id::<Quote>().unwrap(), 4);
    }

    fn stored_rows(store: &DocumentStore<MemoryBackend>, key: &str) -> Vec<Value> {
        let raw = store.backend().get(key).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_unreadable_row_survives_writes() {
        let store = memory_store();
        store
            .backend()
            .set(
                "quotes",
                r#"[{"id":1,"number":"PRV-2025-0001","guestCount":120},{"id":2,"number":"PRV-2025-0002","guestCount":120.5}]"#,
            )
            .unwrap();

        assert_eq!(store.load::<Quote>().unwrap().unreadable_count(), 1);
        let readable = store.list::<Quote>().unwrap();
        assert_eq!(readable.len(), 1);
        assert_eq!(readable[0].guest_count, 120);

        let created = create_quote(&store, "PRV-2025-0003", 0);
        assert_eq!(created.id, 3);

        let patch = QuotePatch {
            guest_count: Some(80),
            ..QuotePatch::default()
        };
        store.update::<Quote>(1, patch).unwrap().unwrap();

        let rows = stored_rows(&store, "quotes");
        assert_eq!(rows.len(), 3);
        let kept = rows.iter().find(|row| row["id"].as_i64() == Some(2)).unwrap();
        assert_eq!(kept["guestCount"].as_f64(), Some(120.5));
        assert_eq!(store.list::<Quote>().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_quote_clears_unreadable_children() {
        let store = memory_store();
        let quote = create_quote(&store, "PRV-2025-0001", 0);
        store
            .backend()
            .set(
                "quote_items",
                &format!(
                    r#"[{{"id":1,"quoteId":{},"quantity":"tre"}},{{"id":2,"quoteId":99,"quantity":"due"}}]"#,
                    quote.id
                ),
            )
            .unwrap();

        assert!(delete_quote(&store, quote.id).unwrap());

        let rows = stored_rows(&store, "quote_items");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["quoteId"].as_i64(), Some(99));
        assert!(store.list::<Quote>().unwrap().is_empty());
    }

    // ===== SETTINGS TESTS =====

    #[test]
    fn test_missing_or_corrupt_settings_use_defaults() {
        let store = memory_store();
        assert_eq!(store.settings().unwrap(), CompanySettings::default());

        store.backend().set("settings", "oops").unwrap();
        assert_eq!(store.settings().unwrap(), CompanySettings::default());
    }

    #[test]
    fn test_partial_settings_merge_over_defaults() {
        let store = memory_store();
        store
            .backend()
            .set("settings", r#"{"companyName":"Atelier Fiori","taxRegime":"ordinario"}"#)
            .unwrap();

        let settings = store.settings().unwrap();

        assert_eq!(settings.company_name, "Atelier Fiori");
        assert_eq!(settings.tax_regime, TaxRegime::Ordinary);
        assert_eq!(settings.vat_rate, 22.0);
        assert_eq!(settings.quote_prefix, "PRV");
        assert_eq!(settings.default_payment_balance, 40.0);
    }

    #[test]
    fn test_wrong_typed_setting_keeps_other_stored_fields() {
        let store = memory_store();
        store
            .backend()
            .set(
                "settings",
                r#"{"companyName":"Mia Ditta","quotePrefix":"ABC","vatRate":"22","defaultPaymentDeposit":50}"#,
            )
            .unwrap();

        let settings = store.settings().unwrap();

        assert_eq!(settings.company_name, "Mia Ditta");
        assert_eq!(settings.quote_prefix, "ABC");
        assert_eq!(settings.vat_rate, 22.0);
        assert_eq!(settings.default_payment_deposit, 50.0);
    }

    #[test]
    fn test_payment_split_must_total_100() {
        let mut state = AppState::new(MemoryBackend::new()).unwrap();
        let patch = SettingsPatch {
            default_payment_balance: Some(30.0),
            ..SettingsPatch::default()
        };

        let err = state.update_settings(patch).unwrap_err();

        match err {
            Error::Validation(ValidationError::PaymentSplit { sum }) => assert_eq!(sum, 90.0),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            ValidationError::PaymentSplit { sum: 90.0 }.to_string(),
            "Payment percentages must add up to 100% (currently 90%)"
        );
        assert_eq!(state.settings().default_payment_balance, 40.0);
        assert!(state.store.read_raw("settings").unwrap().is_none());
    }

    #[test]
    fn test_settings_update_is_saved_and_drives_configs() {
        let mut state = AppState::new(MemoryBackend::new()).unwrap();
        let patch = SettingsPatch {
            tax_regime: Some(TaxRegime::Ordinary),
            vat_rate: Some(10.0),
            quote_prefix: Some("DEC".to_string()),
            ..SettingsPatch::default()
        };

        state.update_settings(patch).unwrap();

        assert_eq!(state.pricing().effective_tax_rate(), 10.0);
        assert_eq!(state.numbering().prefix, "DEC");
        assert_eq!(state.store.settings().unwrap().quote_prefix, "DEC");
        assert_eq!(state.store.settings().unwrap().company_name, "Stella Filella Wedding & Events");
    }

    // ===== PRICING TESTS =====

    #[test]
    fn test_totals_exclude_gifts_and_apply_percentage_discount() {
        let items = vec![
            QuoteItemDraft::new("Location", "Centrotavola", 2, 100.0),
            QuoteItemDraft::new("Location", "Runner", 1, 50.0).as_gift(),
        ];

        let totals = compute_totals(&items, Discount::percentage(10.0), &flat_rate());

        assert_money(totals.subtotal, 200.0);
        assert_money(totals.discount_amount, 20.0);
        assert_money(totals.after_discount, 180.0);
        assert_money(totals.tax_amount, 0.0);
        assert_money(totals.total, 180.0);
        assert_eq!(totals.tax_rate, 0.0);
    }

    #[test]
    fn test_ordinary_regime_adds_vat() {
        let items = vec![
            QuoteItemDraft::new("Location", "Centrotavola", 2, 100.0),
            QuoteItemDraft::new("Location", "Runner", 1, 50.0).as_gift(),
        ];

        let totals = compute_totals(&items, Discount::percentage(10.0), &ordinary());

        assert_money(totals.tax_amount, 39.60);
        assert_money(totals.total, 219.60);
        assert_eq!(totals.tax_rate, 22.0);
    }

    #[test]
    fn test_fixed_discount_is_not_clamped() {
        let items = vec![QuoteItemDraft::new("", "Allestimento", 1, 100.0)];

        let totals = compute_totals(&items, Discount::fixed(150.0), &flat_rate());

        assert_money(totals.total, -50.0);
    }

    #[test]
    fn test_non_positive_discount_is_ignored() {
        let items = vec![QuoteItemDraft::new("", "Allestimento", 3, 33.33)];

        let zero = compute_totals(&items, Discount::percentage(0.0), &flat_rate());
        let negative = compute_totals(&items, Discount::fixed(-10.0), &flat_rate());
        let none = compute_totals(&items, Discount::none(), &flat_rate());

        assert_money(zero.total, 99.99);
        assert_money(negative.total, 99.99);
        assert_money(none.discount_amount, 0.0);
    }

    #[test]
    fn test_payment_rows_follow_total() {
        let mut plans = vec![
            PaymentPlanDraft::new("Acconto alla firma", 30.0, 1000.0),
            PaymentPlanDraft::new("Saldo", 70.0, 1000.0),
        ];
        assert_money(plans[0].amount, 300.0);

        reprice_payment_drafts(&mut plans, 1500.0);
        assert_money(plans[0].amount, 450.0);
        assert_money(plans[1].amount, 1050.0);

        plans[0].set_percentage(40.0, 1500.0);
        assert_money(plans[0].amount, 600.0);
        assert_money(plans[1].amount, 1050.0);
        assert_eq!(plans[1].percentage, 70.0);
    }

    #[test]
    fn test_payment_split_warning_is_soft() {
        assert!(payment_split_warning(&[30.0, 30.0, 40.0]).is_none());

        let warning = payment_split_warning(&[30.0, 30.0, 30.0]).unwrap();
        assert!(warning.contains("90%"));
    }

    #[test]
    fn test_default_payment_plan_uses_settings_split() {
        let plan = default_payment_plan(&CompanySettings::default(), 1000.0);

        let descriptions: Vec<&str> = plan.iter().map(|row| row.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Acconto alla firma", "Seconda rata", "Saldo"]);
        assert_money(plan[0].amount, 300.0);
        assert_money(plan[1].amount, 300.0);
        assert_money(plan[2].amount, 400.0);
    }

    #[test]
    fn test_invalid_items_are_rejected() {
        let store = memory_store();
        let quote = create_quote(&store, "PRV-2025-0001", 1);

        let result = save_quote_items(&store, quote.id, vec![QuoteItemDraft::new("", "Bouquet", 0, 80.0)]);

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvalidQuantity { .. }))
        ));
        assert!(store.list::<QuoteItem>().unwrap().is_empty());
    }

    // ===== NUMBERING TESTS =====

    fn numbered(number: &str) -> Quote {
        Quote {
            number: number.to_string(),
            ..Quote::default()
        }
    }

    fn prv() -> NumberingConfig {
        NumberingConfig {
            prefix: "PRV".to_string(),
            start_number: 1,
        }
    }

    #[test]
    fn test_next_number_skips_gaps() {
        let quotes = vec![
            numbered("PRV-2025-0001"),
            numbered("PRV-2025-0003"),
            numbered("PRV-2024-0010"),
        ];

        assert_eq!(next_quote_number(&quotes, &prv(), 2025), "PRV-2025-0004");
    }

    #[test]
    fn test_next_number_restarts_each_year() {
        let quotes = vec![numbered("PRV-2024-0042")];
        let config = NumberingConfig {
            prefix: "PRV".to_string(),
            start_number: 5,
        };

        assert_eq!(next_quote_number(&quotes, &config, 2025), "PRV-2025-0005");
        assert_eq!(next_quote_number(&[], &prv(), 2025), "PRV-2025-0001");
    }

    #[test]
    fn test_next_number_treats_unparseable_suffix_as_zero() {
        let quotes = vec![numbered("PRV-2025-bozza")];

        assert_eq!(next_quote_number(&quotes, &prv(), 2025), "PRV-2025-0001");
    }

    #[test]
    fn test_next_number_reads_leading_digits_of_suffix() {
        let quotes = vec![numbered("PRV-2025-0004b"), numbered("PRV-2025-0002")];

        assert_eq!(next_quote_number(&quotes, &prv(), 2025), "PRV-2025-0005");
    }

    // ===== DASHBOARD TESTS =====

    #[test]
    fn test_conversion_rate_counts_confirmed_and_completed() {
        let today = date(2025, 6, 15);
        let quotes = vec![
            view(QuoteStatus::Draft, "2025-06-01", "", "", 100.0),
            view(QuoteStatus::Sent, "2025-06-03", "", "", 200.0),
            view(QuoteStatus::Confirmed, "2025-06-05", "", "", 300.0),
            view(QuoteStatus::Completed, "2025-06-10", "", "", 400.0),
            view(QuoteStatus::Confirmed, "2025-05-28", "", "", 999.0),
        ];

        let stats = compute_stats(&quotes, today);

        assert_eq!(stats.monthly_quotes, 4);
        assert_money(stats.monthly_value, 1000.0);
        assert_money(stats.conversion_rate, 50.0);
    }

    #[test]
    fn test_conversion_rate_is_zero_without_quotes() {
        let stats = compute_stats(&[], date(2025, 6, 15));

        assert_eq!(stats.monthly_quotes, 0);
        assert_eq!(stats.conversion_rate, 0.0);
        assert_eq!(stats.monthly_revenue.len(), 12);
        assert_eq!(stats.monthly_revenue[0].month, "Gen");
        assert_eq!(stats.monthly_revenue[11].month, "Dic");
    }

    #[test]
    fn test_expiring_quotes_window() {
        let today = date(2025, 6, 15);
        let quotes = vec![
            view(QuoteStatus::Draft, "2025-06-01", "", "2025-06-20", 0.0),
            view(QuoteStatus::Sent, "2025-06-01", "", "2025-07-15", 0.0),
            view(QuoteStatus::Sent, "2025-06-01", "", "2025-08-01", 0.0),
            view(QuoteStatus::Confirmed, "2025-06-01", "", "2025-06-20", 0.0),
            view(QuoteStatus::Draft, "2025-06-01", "", "2025-06-10", 0.0),
            view(QuoteStatus::Draft, "2025-06-01", "", "", 0.0),
        ];

        let stats = compute_stats(&quotes, today);

        let expiries: Vec<&str> = stats
            .expiring_quotes
            .iter()
            .map(|v| v.quote.expiry_date.as_str())
            .collect();
        assert_eq!(expiries, vec!["2025-06-20", "2025-07-15"]);
    }

    #[test]
    fn test_upcoming_events_are_confirmed_sorted_and_capped() {
        let today = date(2025, 6, 15);
        let mut quotes = vec![
            view(QuoteStatus::Confirmed, "2025-01-01", "2025-09-01", "", 0.0),
            view(QuoteStatus::Confirmed, "2025-01-01", "2025-07-01", "", 0.0),
            view(QuoteStatus::Confirmed, "2025-01-01", "2025-08-01", "", 0.0),
            view(QuoteStatus::Confirmed, "2025-01-01", "2025-06-20", "", 0.0),
            view(QuoteStatus::Confirmed, "2025-01-01", "2025-10-01", "", 0.0),
            view(QuoteStatus::Confirmed, "2025-01-01", "2025-11-01", "", 0.0),
            view(QuoteStatus::Confirmed, "2025-01-01", "2025-05-01", "", 0.0),
        ];
        quotes.push(view(QuoteStatus::Completed, "2025-01-01", "2025-06-16", "", 0.0));

        let stats = compute_stats(&quotes, today);

        let dates: Vec<&str> = stats
            .upcoming_events
            .iter()
            .map(|v| v.quote.event_date.as_str())
            .collect();
        assert_eq!(
            dates,
            vec!["2025-06-20", "2025-07-01", "2025-08-01", "2025-09-01", "2025-10-01"]
        );
    }

    #[test]
    fn test_monthly_revenue_buckets_by_event_date() {
        let today = date(2025, 6, 15);
        let quotes = vec![
            view(QuoteStatus::Confirmed, "2025-01-10", "2025-09-12", "", 1000.0),
            view(QuoteStatus::Completed, "2025-02-10", "2025-09-30", "", 500.5),
            view(QuoteStatus::Sent, "2025-02-10", "2025-09-20", "", 700.0),
            view(QuoteStatus::Confirmed, "2024-02-10", "2024-09-20", "", 800.0),
        ];

        let stats = compute_stats(&quotes, today);

        assert_eq!(stats.monthly_revenue[8].month, "Set");
        assert_money(stats.monthly_revenue[8].value, 1500.5);
        assert_money(stats.monthly_revenue[0].value, 0.0);
        assert_eq!(stats.monthly_quotes, 0);
    }

    // ===== QUOTE CASCADE TESTS =====

    #[test]
    fn test_delete_quote_removes_only_its_dependents() {
        let store = memory_store();
        let first = create_quote(&store, "PRV-2025-0001", 1);
        let second = create_quote(&store, "PRV-2025-0002", 1);
        fill_quote(&store, first.id);
        fill_quote(&store, second.id);

        assert!(delete_quote(&store, first.id).unwrap());

        assert!(store.find::<Quote>(first.id).unwrap().is_none());
        assert!(quote_items(&store, first.id).unwrap().is_empty());
        assert!(payment_plans(&store, first.id).unwrap().is_empty());
        assert!(wedding_details(&store, first.id).unwrap().is_none());

        assert_eq!(quote_items(&store, second.id).unwrap().len(), 2);
        assert_eq!(payment_plans(&store, second.id).unwrap().len(), 3);
        assert!(wedding_details(&store, second.id).unwrap().is_some());

        assert!(!delete_quote(&store, first.id).unwrap());
    }

    #[test]
    fn test_saving_children_replaces_previous_rows() {
        let store = memory_store();
        let quote = create_quote(&store, "PRV-2025-0001", 1);
        fill_quote(&store, quote.id);

        let saved = save_quote_items(
            &store,
            quote.id,
            vec![
                QuoteItemDraft::new("Casa Sposa", "Tavolo dolci", 1, 200.0),
                QuoteItemDraft::new("Casa Sposa", "Scala", 1, 180.0),
                QuoteItemDraft::new("Casa Sposa", "Ingresso", 1, 250.0),
            ],
        )
        .unwrap();

        let items = quote_items(&store, quote.id).unwrap();
        assert_eq!(items.len(), 3);
        let orders: Vec<i64> = items.iter().map(|item| item.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(items[0].description, "Tavolo dolci");
        assert_eq!(saved[0].quote_id, quote.id);
        assert_eq!(store.list::<WeddingDetails>().unwrap().len(), 1);
    }

    #[test]
    fn test_list_quotes_labels_deleted_clients() {
        let store = memory_store();
        let client = create_client(&store, "Famiglia Bianchi");
        create_quote(&store, "PRV-2025-0001", client.id);
        create_quote(&store, "PRV-2025-0002", 99);

        let views = list_quotes(&store).unwrap();

        assert_eq!(views[0].client_name, "Famiglia Bianchi");
        assert_eq!(views[1].client_name, "Cliente eliminato");
    }

    #[test]
    fn test_duplicate_copies_children_under_new_number() {
        let store = memory_store();
        let source = store
            .create::<Quote>(NewQuote {
                number: "PRV-2025-0001".to_string(),
                client_id: 1,
                status: QuoteStatus::Confirmed,
                event_location: "Villa Erba".to_string(),
                guest_count: 120,
                confirmed_date: Some("2025-03-01".to_string()),
                total: 180.0,
                ..NewQuote::default()
            })
            .unwrap();
        fill_quote(&store, source.id);

        let copy = duplicate_quote(&store, source.id, &prv(), 2025).unwrap().unwrap();

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.number, "PRV-2025-0002");
        assert_eq!(copy.status, QuoteStatus::Draft);
        assert_eq!(copy.confirmed_date, None);
        assert_eq!(copy.event_location, "Villa Erba");
        assert_eq!(copy.guest_count, 120);
        assert_eq!(copy.total, 180.0);

        let items = quote_items(&store, copy.id).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Bouquet sposa");
        assert_eq!(items[1].sort_order, 1);
        assert!(items[1].is_gift);
        assert_eq!(payment_plans(&store, copy.id).unwrap().len(), 3);
        assert_eq!(wedding_details(&store, copy.id).unwrap().unwrap().bride_name, "Giulia");

        assert_eq!(quote_items(&store, source.id).unwrap().len(), 2);
        assert_eq!(
            store.find::<Quote>(source.id).unwrap().unwrap().status,
            QuoteStatus::Confirmed
        );
    }

    #[test]
    fn test_duplicate_missing_quote_returns_none() {
        let store = memory_store();

        assert!(duplicate_quote(&store, 7, &prv(), 2025).unwrap().is_none());
        assert!(store.list::<Quote>().unwrap().is_empty());
    }

    #[test]
    fn test_recompute_quote_updates_totals_and_plans() {
        let store = memory_store();
        let quote = store
            .create::<Quote>(NewQuote {
                number: "PRV-2025-0001".to_string(),
                discount_type: Some(crate::models::DiscountType::Percentage),
                discount_value: 10.0,
                ..NewQuote::default()
            })
            .unwrap();
        let other = create_quote(&store, "PRV-2025-0002", 1);
        fill_quote(&store, quote.id);
        fill_quote(&store, other.id);

        let (updated, totals) = recompute_quote(&store, quote.id, &ordinary()).unwrap().unwrap();

        assert_money(totals.total, 219.60);
        assert_money(updated.subtotal, 200.0);
        assert_money(updated.total, 219.60);
        assert_eq!(updated.tax_rate, 22.0);

        let amounts: Vec<f64> = payment_plans(&store, quote.id)
            .unwrap()
            .iter()
            .map(|plan| plan.amount)
            .collect();
        assert_money(amounts[0], 65.88);
        assert_money(amounts[1], 65.88);
        assert_money(amounts[2], 87.84);
        assert!(payment_plans(&store, other.id)
            .unwrap()
            .iter()
            .all(|plan| plan.amount == 0.0));

        let (_, again) = recompute_quote(&store, quote.id, &ordinary()).unwrap().unwrap();
        assert_eq!(again, totals);
        assert!(recompute_quote(&store, 99, &ordinary()).unwrap().is_none());
    }

    // ===== CATALOGUE TESTS =====

    #[test]
    fn test_seeding_runs_once() {
        let store = memory_store();

        assert!(seed_catalogue(&store).unwrap());
        assert_eq!(store.list::<ServiceCategory>().unwrap().len(), 7);
        assert_eq!(store.list::<Service>().unwrap().len(), 34);

        store.delete::<ServiceCategory>(1).unwrap();
        assert!(!seed_catalogue(&store).unwrap());
        assert_eq!(store.list::<ServiceCategory>().unwrap().len(), 6);
        assert_eq!(store.list::<Service>().unwrap().len(), 34);
    }

    #[test]
    fn test_seeded_catalogue_shape() {
        let store = memory_store();
        seed_catalogue(&store).unwrap();

        let services = list_services(&store).unwrap();
        let coordinator = services
            .iter()
            .find(|listing| listing.service.name == "Wedding Coordinator")
            .unwrap();
        assert_eq!(coordinator.category_name, "Servizi Extra");
        assert!(coordinator.service.transport_included);
        assert_eq!(coordinator.service.base_price, 1500.0);

        let church: Vec<i64> = services
            .iter()
            .filter(|listing| listing.category_name == "Allestimento Chiesa")
            .map(|listing| listing.service.sort_order)
            .collect();
        assert_eq!(church, (1..=11).collect::<Vec<i64>>());
    }

    #[test]
    fn test_seeded_categories_hold_expected_services() {
        let store = memory_store();
        seed_catalogue(&store).unwrap();

        let counts: Vec<(String, usize)> = list_categories(&store)
            .unwrap()
            .into_iter()
            .map(|category| {
                let listed = services_by_category(&store, category.id).unwrap();
                assert!(listed.iter().all(|listing| listing.category_name == category.name));
                (category.name, listed.len())
            })
            .collect();

        let expected = [
            ("Allestimento Chiesa", 11),
            ("Allestimento Location", 8),
            ("Casa Sposa", 3),
            ("Casa Sposo", 2),
            ("Servizi Extra", 3),
            ("Pacchetti Compleanno", 4),
            ("Pacchetti Battesimo / Comunione", 3),
        ];
        let expected: Vec<(String, usize)> = expected.iter().map(|(name, n)| (name.to_string(), *n)).collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_catalogue_service_becomes_quote_line() {
        let store = memory_store();
        seed_catalogue(&store).unwrap();
        let extra = list_categories(&store)
            .unwrap()
            .into_iter()
            .find(|category| category.name == "Servizi Extra")
            .unwrap();
        let listing = services_by_category(&store, extra.id)
            .unwrap()
            .into_iter()
            .find(|listing| listing.service.name == "Wedding Coordinator")
            .unwrap();

        let draft = QuoteItemDraft::from_service(&listing);

        assert_eq!(draft.service_id, Some(listing.service.id));
        assert_eq!(draft.section, "Servizi Extra");
        assert_eq!(draft.description, "Wedding Coordinator");
        assert_eq!(draft.quantity, 1);
        assert_money(draft.amount, 1500.0);
        assert!(!draft.is_gift);
    }

    #[test]
    fn test_deleting_category_leaves_services_orphaned() {
        let store = memory_store();
        let category = store
            .create::<ServiceCategory>(NewCategory {
                name: "Casa Sposo".to_string(),
                sort_order: 1,
            })
            .unwrap();
        store
            .create::<Service>(NewService {
                category_id: category.id,
                name: "Tavolo dolci completo".to_string(),
                base_price: 180.0,
                ..NewService::default()
            })
            .unwrap();

        assert!(store.delete::<ServiceCategory>(category.id).unwrap());

        let services = list_services(&store).unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].category_name, "");
    }

    #[test]
    fn test_service_with_negative_price_is_rejected() {
        let store = memory_store();

        let result = create_service(
            &store,
            NewService {
                name: "Backdrop".to_string(),
                base_price: -1.0,
                ..NewService::default()
            },
        );

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::NegativePrice { .. }))
        ));
        assert!(store.list::<Service>().unwrap().is_empty());
    }

    #[test]
    fn test_categories_sorted_by_sort_order() {
        let store = memory_store();
        for (name, order) in [("Extra", 3), ("Chiesa", 1), ("Location", 2), ("Altro", 1)] {
            store
                .create::<ServiceCategory>(NewCategory {
                    name: name.to_string(),
                    sort_order: order,
                })
                .unwrap();
        }

        let names: Vec<String> = list_categories(&store).unwrap().into_iter().map(|c| c.name).collect();

        assert_eq!(names, vec!["Chiesa", "Altro", "Location", "Extra"]);
    }

    // ===== WEDDING DETAILS TESTS =====

    #[test]
    fn test_decode_list_prefers_json_array() {
        let (flowers, encoding) = decode_list::<Flower>(r#"["peonia","wax-flower","tulipano-nero"]"#);

        assert_eq!(encoding, ListEncoding::JsonArray);
        assert_eq!(flowers, vec![Flower::Peonia, Flower::WaxFlower]);
    }

    #[test]
    fn test_decode_list_falls_back_to_comma_split() {
        let (flowers, encoding) = decode_list::<Flower>(" peonia, calla ,,");
        assert_eq!(encoding, ListEncoding::CommaSeparated);
        assert_eq!(flowers, vec![Flower::Peonia, Flower::Calla]);

        let (colors, encoding) = decode_list::<String>("#F5E6D3,#8B6F5E");
        assert_eq!(encoding, ListEncoding::CommaSeparated);
        assert_eq!(colors, vec!["#F5E6D3", "#8B6F5E"]);
    }

    #[test]
    fn test_decode_list_degrades_to_empty() {
        let (broken, encoding) = decode_list::<Greenery>("[not json");
        assert!(broken.is_empty());
        assert_eq!(encoding, ListEncoding::Empty);

        let (blank, encoding) = decode_list::<Greenery>("   ");
        assert!(blank.is_empty());
        assert_eq!(encoding, ListEncoding::Empty);
    }

    #[test]
    fn test_wedding_selections_survive_storage() {
        let store = memory_store();
        let quote = create_quote(&store, "PRV-2025-0001", 1);
        let chosen = WeddingSelections {
            palette_colors: vec!["#FFFFFF".to_string(), "#C9A227".to_string()],
            style: Some(WeddingStyle::Romantico),
            flowers: vec![Flower::RoseAvalanche, Flower::Gypsophila],
            greenery: vec![Greenery::Eucalipto],
            areas: vec![WeddingArea::Chiesa, WeddingArea::CasaSposa],
        };
        let mut draft = WeddingDetailsDraft::default();
        apply_selections(&mut draft, &chosen);

        save_wedding_details(&store, quote.id, draft).unwrap();
        let stored = wedding_details(&store, quote.id).unwrap().unwrap();

        assert_eq!(stored.style, "romantico");
        assert_eq!(stored.areas, r#"["chiesa","casa-sposa"]"#);
        assert_eq!(selections(&stored), chosen);
    }

    // ===== DOCUMENT TESTS =====

    #[test]
    fn test_quote_document_groups_sections() {
        let store = memory_store();
        let quote = create_quote(&store, "PRV-2025-0001", 1);
        save_quote_items(
            &store,
            quote.id,
            vec![
                QuoteItemDraft::new("Chiesa", "Broken Arch", 1, 450.0),
                QuoteItemDraft::new("", "Extra", 1, 20.0),
                QuoteItemDraft::new("Chiesa", "Bottoniere", 4, 15.0).as_gift(),
            ],
        )
        .unwrap();
        let settings = CompanySettings::default();

        let document = load_quote_document(&store, quote.id, &settings, None, None)
            .unwrap()
            .unwrap();

        assert_eq!(document.accent_color, DEFAULT_ACCENT_COLOR);
        assert_eq!(document.template, settings.default_template);
        let sections = document.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Chiesa");
        assert_eq!(sections[0].items.len(), 2);
        assert_money(sections[0].subtotal, 450.0);
        assert_eq!(sections[1].title, "Altro");
        assert!(load_quote_document(&store, 99, &settings, None, None).unwrap().is_none());
    }

    // ===== IMPORT / EXPORT TESTS =====

    fn parsed(store: &DocumentStore<MemoryBackend>, key: &str) -> Option<Value> {
        store
            .read_raw(key)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_export_of_empty_store_is_all_null() {
        let store = memory_store();

        let exported: Value = serde_json::from_str(&export_all_data(&store).unwrap()).unwrap();

        let object = exported.as_object().unwrap();
        assert_eq!(object.len(), EXPORT_KEYS.len());
        assert!(object.values().all(Value::is_null));
    }

    #[test]
    fn test_export_import_round_trip() {
        let source = memory_store();
        seed_catalogue(&source).unwrap();
        let client = create_client(&source, "Anna");
        let quote = create_quote(&source, "PRV-2025-0001", client.id);
        fill_quote(&source, quote.id);
        source.save_settings(&CompanySettings::default()).unwrap();

        let backup = export_all_data(&source).unwrap();
        let target = memory_store();
        assert!(import_all_data(&target, &backup).unwrap());

        for key in EXPORT_KEYS {
            assert_eq!(parsed(&target, key), parsed(&source, key), "mismatch for {key}");
        }
        assert_eq!(export_all_data(&target).unwrap(), backup);
        assert_eq!(target.list::<PaymentPlan>().unwrap().len(), 3);
    }

    #[test]
    fn test_import_rejects_malformed_input() {
        let store = memory_store();
        create_client(&store, "Anna");

        assert!(!import_all_data(&store, "{ definitely not json").unwrap());
        assert!(!import_all_data(&store, "[1, 2, 3]").unwrap());

        assert_eq!(store.list::<Client>().unwrap().len(), 1);
    }

    #[test]
    fn test_import_skips_null_and_unknown_keys() {
        let store = memory_store();
        create_client(&store, "Anna");

        let backup = r#"{
            "clients": null,
            "quotes": [{"id": 5, "number": "PRV-2025-0005"}],
            "favourites": [1, 2]
        }"#;
        assert!(import_all_data(&store, backup).unwrap());

        assert_eq!(store.list::<Client>().unwrap().len(), 1);
        assert_eq!(store.list::<Quote>().unwrap()[0].number, "PRV-2025-0005");
        assert!(store.read_raw("favourites").unwrap().is_none());
    }

    #[test]
    fn test_state_import_reloads_settings() {
        let mut state = AppState::new(MemoryBackend::new()).unwrap();

        let imported = state
            .import_backup(r#"{"settings": {"quotePrefix": "EVT", "quoteStartNumber": 7}}"#)
            .unwrap();

        assert!(imported);
        assert_eq!(state.settings().quote_prefix, "EVT");
        assert!(state.next_quote_number().unwrap().starts_with("EVT-"));
        assert!(state.next_quote_number().unwrap().ends_with("-0007"));
    }

    // ===== SQLITE PERSISTENCE TESTS =====

    #[test]
    fn test_sqlite_data_survives_reopen() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("quotes.sqlite");

        {
            let store = DocumentStore::new(SqliteBackend::open(&path).unwrap());
            store
                .create::<Client>(NewClient {
                    name: "Anna".to_string(),
                    ..NewClient::default()
                })
                .unwrap();
        }

        let store = DocumentStore::new(SqliteBackend::open(&path).unwrap());
        let clients = store.list::<Client>().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].name, "Anna");
    }

    #[test]
    fn test_sqlite_state_seeds_only_on_first_open() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("quotes.sqlite");

        let first = AppState::open(&path).unwrap();
        assert!(first.seeded_on_open());
        drop(first);

        let second = AppState::open(&path).unwrap();
        assert!(!second.seeded_on_open());
        assert_eq!(second.store.list::<Service>().unwrap().len(), 34);
    }

    #[test]
    fn test_sqlite_cascade_delete_in_one_batch() {
        let store = DocumentStore::new(SqliteBackend::open_in_memory().unwrap());
        let quote = store
            .create::<Quote>(NewQuote {
                number: "PRV-2025-0001".to_string(),
                ..NewQuote::default()
            })
            .unwrap();
        save_payment_plans(&store, quote.id, vec![PaymentPlanDraft::new("Saldo", 100.0, 500.0)]).unwrap();

        assert!(delete_quote(&store, quote.id).unwrap());

        assert!(store.list::<Quote>().unwrap().is_empty());
        assert!(store.list::<PaymentPlan>().unwrap().is_empty());
        assert_eq!(store.backend().get("quote_items").unwrap().as_deref(), Some("[]"));
    }
}
