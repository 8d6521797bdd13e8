//! History module tests.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::core::history::{
    HistoryError, QuotationMeta, QuotationRecord, delete_quotation, filter_quotations,
    import_history, list_quotations, load_quotation, rename_quotation, save_quotation,
    title_preview,
};
use crate::core::quotation::{QuotationId, assemble_dual_markdown};

const INTERNAL: &str = "| Descripción | Proveedor | Costo Unitario | Importe |\n|---|---|---|---|\n| Cemento | Cemex | $8.00 | $10.00 |";
const CUSTOMER: &str = "# Cotización de cemento\n\n| Descripción | Importe |\n|---|---|\n| Cemento | $10.00 |";

static PERSISTENCE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

struct EnvGuard(&'static str);
impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var(self.0);
        }
    }
}

/// Point the data dir at a fresh temp dir for the duration of a test.
fn with_data_dir(f: impl FnOnce(&std::path::Path)) {
    let _lock = PERSISTENCE_TEST_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let data_dir = tmp.path().join("quotations");
    unsafe {
        std::env::set_var("TEST_DATA_DIR", &data_dir);
    }
    let _guard = EnvGuard("TEST_DATA_DIR");
    f(&data_dir);
}

fn record() -> QuotationRecord {
    let raw = format!("Aquí tiene.\n{}", assemble_dual_markdown(INTERNAL, CUSTOMER));
    QuotationRecord::from_response(
        "50 sacos de cemento",
        &raw,
        Some("Constructora Norte"),
        Some(" "),
        QuotationId::from_parts(123, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()),
    )
}

fn meta(id: &str, title: &str, customer: Option<&str>) -> QuotationMeta {
    let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    QuotationMeta {
        id: id.to_string(),
        title: title.to_string(),
        customer_name: customer.map(String::from),
        quotation_id: None,
        created_at: t,
        updated_at: t,
    }
}

#[test]
fn from_response_splits_payloads_and_takes_title() {
    let r = record();
    assert_eq!(r.title, "Cotización de cemento");
    assert_eq!(r.customer_name.as_deref(), Some("Constructora Norte"));
    assert!(r.customer_location.is_none());
    assert_eq!(r.internal_quotation.as_deref(), Some(INTERNAL));
    assert_eq!(r.customer_quotation.as_deref(), Some(CUSTOMER));
    assert_eq!(r.quotation_id.as_ref().map(|q| q.as_str()), Some("000123191026"));
}

#[test]
fn title_falls_back_to_user_query() {
    let r = QuotationRecord::from_response(
        "precio de varilla",
        "No tengo ese material.",
        None,
        None,
        QuotationId::generate_today(),
    );
    assert_eq!(r.title, "precio de varilla");
    assert!(r.internal_quotation.is_none());
    assert!(r.customer_quotation.is_none());
    assert_eq!(title_preview("   "), "(Sin título)");
}

#[test]
fn dual_result_prefers_stored_payloads() {
    let mut r = record();
    r.raw_response = "respuesta editada sin marcadores".to_string();
    let dual = r.dual_result();
    assert!(dual.internal.is_some_and(|q| q.tables[0][0].proveedor == "Cemex"));
    assert!(dual.customer.is_some_and(|q| q.has_table));
    assert_eq!(dual.raw_response, "respuesta editada sin marcadores");

    r.internal_quotation = None;
    let dual = r.dual_result();
    assert!(dual.internal.is_none());
    assert!(dual.customer.is_none());
}

#[test]
fn filter_matches_title_customer_and_id() {
    let items = vec![
        meta("a1", "Cemento gris", Some("Constructora Norte")),
        meta("b2", "Varilla", None),
    ];
    assert_eq!(filter_quotations(&items, "").len(), 2);
    assert_eq!(filter_quotations(&items, "norte")[0].id, "a1");
    assert_eq!(filter_quotations(&items, "VARILLA")[0].id, "b2");
    assert_eq!(filter_quotations(&items, "b2")[0].title, "Varilla");
    assert!(filter_quotations(&items, "grava").is_empty());
}

#[test]
fn save_then_load_roundtrip() {
    with_data_dir(|dir| {
        let saved = save_quotation(&record(), 10).expect("save");
        assert!(dir.join(format!("quote_{}.json", saved.id)).exists());
        let loaded = load_quotation(&saved.id).expect("load");
        assert_eq!(loaded, saved);

        let list = list_quotations().expect("list");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Cotización de cemento");
        assert_eq!(list[0].quotation_id.as_deref(), Some("000123191026"));
    });
}

#[test]
fn resave_preserves_created_at() {
    with_data_dir(|_| {
        let first = save_quotation(&record(), 10).expect("save");
        let mut edited = first.clone();
        edited.created_at = Utc::now();
        edited.title = "Otro".to_string();
        let second = save_quotation(&edited, 10).expect("resave");
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(list_quotations().unwrap().len(), 1);
    });
}

#[test]
fn prune_keeps_most_recent() {
    with_data_dir(|dir| {
        let first = save_quotation(&record(), 2).unwrap();
        save_quotation(&record(), 2).unwrap();
        save_quotation(&record(), 2).unwrap();
        let list = list_quotations().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|m| m.id != first.id));
        assert!(!dir.join(format!("quote_{}.json", first.id)).exists());
    });
}

#[test]
fn rename_and_delete() {
    with_data_dir(|_| {
        let saved = save_quotation(&record(), 10).unwrap();
        assert!(matches!(
            rename_quotation(&saved.id, "  "),
            Err(HistoryError::EmptyTitle)
        ));
        rename_quotation(&saved.id, "Obra Juárez").unwrap();
        assert_eq!(load_quotation(&saved.id).unwrap().title, "Obra Juárez");
        assert_eq!(list_quotations().unwrap()[0].title, "Obra Juárez");

        delete_quotation(&saved.id).unwrap();
        assert!(list_quotations().unwrap().is_empty());
        assert!(matches!(
            load_quotation(&saved.id),
            Err(HistoryError::NotFound(_))
        ));
        assert!(matches!(
            delete_quotation(&saved.id),
            Err(HistoryError::NotFound(_))
        ));
    });
}

#[test]
fn load_missing_and_invalid_ids() {
    with_data_dir(|_| {
        assert!(matches!(
            load_quotation("nonexistent"),
            Err(HistoryError::NotFound(_))
        ));
        assert!(matches!(
            load_quotation("../etc/passwd"),
            Err(HistoryError::InvalidId(_))
        ));
    });
}

#[test]
fn load_corrupt_record_is_json_error() {
    with_data_dir(|dir| {
        let saved = save_quotation(&record(), 10).unwrap();
        std::fs::write(dir.join(format!("quote_{}.json", saved.id)), "not json {{").unwrap();
        assert!(matches!(
            load_quotation(&saved.id),
            Err(HistoryError::Json(_))
        ));
    });
}

#[test]
fn import_accepts_items_object_and_numeric_ids() {
    with_data_dir(|_| {
        let dump = serde_json::json!({
            "items": [
                {
                    "id": 17,
                    "user_query": "block 15x20",
                    "title": "",
                    "customer_name": "Obra Centro",
                    "customer_location": null,
                    "quotation_id": "004512050126",
                    "internal_quotation": INTERNAL,
                    "customer_quotation": CUSTOMER,
                    "raw_response": "",
                    "created_at": "2026-01-05T10:00:00",
                    "updated_at": "2026-01-05T10:30:00.123Z"
                },
                { "id": "bad", "created_at": "ayer" }
            ]
        });
        let imported = import_history(&dump.to_string(), 10).expect("import");
        assert_eq!(imported, 1);

        let r = load_quotation("17").expect("imported record");
        assert_eq!(r.title, "block 15x20");
        assert_eq!(
            r.created_at,
            Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap()
        );
        assert!(r.dual_result().customer.is_some_and(|c| c.has_table));
    });
}

#[test]
fn import_accepts_bare_array_and_rejects_other_shapes() {
    with_data_dir(|_| {
        let dump = r#"[{"id": "abc", "raw_response": "hola",
            "created_at": "2026-02-01T00:00:00+00:00",
            "updated_at": "2026-02-01T00:00:00+00:00"}]"#;
        assert_eq!(import_history(dump, 10).unwrap(), 1);
        assert!(matches!(
            import_history(r#"{"data": []}"#, 10),
            Err(HistoryError::InvalidImport(_))
        ));
        assert!(matches!(
            import_history("{", 10),
            Err(HistoryError::Json(_))
        ));
    });
}
