//! Integration tests for building Q trees against model metadata, then
//! evaluating them in memory and compiling them to SQL.

use serde_json::json;
use viewcraft_db::fields::{FieldDef, FieldType};
use viewcraft_db::model::ModelMeta;
use viewcraft_db::query::{DatabaseBackendType, Lookup, OrderBy, QuerySet, Q};
use viewcraft_db::value::Value;

// ── Helpers ─────────────────────────────────────────────────────────

fn product_meta() -> ModelMeta {
    ModelMeta::new("shop", "product")
        .field(FieldDef::new("id", FieldType::AutoField))
        .field(FieldDef::new("name", FieldType::CharField))
        .field(FieldDef::new(
            "price",
            FieldType::DecimalField {
                max_digits: 8,
                decimal_places: 2,
            },
        ))
        .field(FieldDef::new("released", FieldType::DateField).nullable())
        .ordering(vec![OrderBy::asc("name")])
}

fn products(meta: &ModelMeta) -> QuerySet {
    QuerySet::from_rows(
        meta.db_table.clone(),
        vec![
            json!({"id": 1, "name": "Widget", "price": 5, "released": "2023-06-01"}),
            json!({"id": 2, "name": "Gadget", "price": 10.0, "released": "2024-01-15"}),
            json!({"id": 3, "name": "Doohickey", "price": 12.5, "released": null}),
            json!({"id": 4, "name": "widget pro", "price": "7.25", "released": "2024-02-01"}),
        ],
    )
    .order_by(meta.ordering.clone())
}

fn names(rows: &[serde_json::Value]) -> Vec<&str> {
    rows.iter().filter_map(|r| r["name"].as_str()).collect()
}

// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_default_ordering_from_meta() {
    let meta = product_meta();
    let rows = products(&meta).fetch();
    assert_eq!(names(&rows), vec!["Doohickey", "Gadget", "Widget", "widget pro"]);
}

#[test]
fn test_inclusive_price_range_across_number_representations() {
    let meta = product_meta();
    let qs = products(&meta).filter(Q::filter(
        "price",
        Lookup::Range(Value::Float(5.0), Value::Float(10.0)),
    ));
    assert_eq!(names(&qs.fetch()), vec!["Gadget", "Widget", "widget pro"]);
}

#[test]
fn test_global_style_or_then_and() {
    let meta = product_meta();
    let global = Q::filter("name", Lookup::IContains("widget".into()))
        | Q::filter("id", Lookup::Exact(Value::from(2)));
    let qs = products(&meta)
        .filter(Q::filter("released", Lookup::IsNull(false)))
        .filter(global);
    assert_eq!(names(&qs.fetch()), vec!["Gadget", "Widget", "widget pro"]);
}

#[test]
fn test_date_comparison_and_sql_agree() {
    let meta = product_meta();
    let since = Value::Date(Value::parse_date("2024-01-01").unwrap());
    let qs = products(&meta).filter(Q::filter("released", Lookup::Gte(since.clone())));
    assert_eq!(names(&qs.fetch()), vec!["Gadget", "widget pro"]);

    let (sql, params) = qs.to_sql(DatabaseBackendType::SQLite);
    assert_eq!(
        sql,
        "SELECT * FROM \"shop_product\" WHERE \"released\" >= ? ORDER BY \"name\" ASC"
    );
    assert_eq!(params, vec![since]);
}

#[test]
fn test_page_slice() {
    let meta = product_meta();
    let qs = products(&meta);
    let page = qs.clone().slice(2, 4).fetch();
    assert_eq!(names(&page), vec!["Widget", "widget pro"]);
    assert_eq!(qs.count(), 4);
}
