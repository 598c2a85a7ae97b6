//! SQL rendering of record listings and writes.
//!
//! Count and page queries are built from the same [`FilterSet`] by the same
//! function, so their WHERE clauses are identical by construction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

use flashsale_core::{EntityId, FilterSet, Page, Predicate, Value};

use super::PgRecord;

/// A column value bound into a write statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Text(String),
    Decimal(Decimal),
    Time(DateTime<Utc>),
    Bool(bool),
    Int(i32),
}

fn push_bind(qb: &mut QueryBuilder<'_, Postgres>, bind: Bind) {
    match bind {
        Bind::Text(v) => qb.push_bind(v),
        Bind::Decimal(v) => qb.push_bind(v),
        Bind::Time(v) => qb.push_bind(v),
        Bind::Bool(v) => qb.push_bind(v),
        Bind::Int(v) => qb.push_bind(v),
    };
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &Value) {
    match value {
        Value::Text(v) => push_bind(qb, Bind::Text(v.clone())),
        Value::Decimal(v) => push_bind(qb, Bind::Decimal(*v)),
        Value::Time(v) => push_bind(qb, Bind::Time(*v)),
        Value::Bool(v) => push_bind(qb, Bind::Bool(*v)),
    }
}

/// Escape LIKE metacharacters so the needle matches literally.
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append `WHERE deleted_at IS NULL [AND <predicate>]*`.
pub fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &FilterSet) {
    qb.push(" WHERE deleted_at IS NULL");
    for predicate in filters.predicates() {
        qb.push(" AND ");
        qb.push(predicate.column());
        match predicate {
            Predicate::Contains { needle, .. } => {
                qb.push(" ILIKE ");
                push_bind(qb, Bind::Text(format!("%{}%", escape_like(needle))));
            }
            Predicate::Equals { value, .. } => {
                qb.push(" = ");
                push_value(qb, value);
            }
            Predicate::AtLeast { value, .. } => {
                qb.push(" >= ");
                push_value(qb, value);
            }
            Predicate::AtMost { value, .. } => {
                qb.push(" <= ");
                push_value(qb, value);
            }
        }
    }
}

/// `id, <settable columns>, created_at, updated_at, deleted_at`
pub fn select_list<E: PgRecord>() -> String {
    format!(
        "id, {}, created_at, updated_at, deleted_at",
        E::COLUMNS.join(", ")
    )
}

pub fn count_query<E: PgRecord>(filters: &FilterSet) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
    push_filters(&mut qb, filters);
    qb
}

pub fn page_query<E: PgRecord>(filters: &FilterSet, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", select_list::<E>(), E::TABLE));
    push_filters(&mut qb, filters);
    qb.push(" ORDER BY created_at ASC, id ASC LIMIT ");
    qb.push_bind(page.limit());
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());
    qb
}

pub fn select_live_query<E: PgRecord>(id: &EntityId) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {} WHERE id = ", select_list::<E>(), E::TABLE));
    qb.push_bind(id.as_str().to_string());
    qb.push(" AND deleted_at IS NULL");
    qb
}

pub fn insert_query<E: PgRecord>(record: &E) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {} (id, {}, created_at, updated_at) VALUES (",
        E::TABLE,
        E::COLUMNS.join(", ")
    ));
    qb.push_bind(record.id().as_str().to_string());
    for bind in record.binds() {
        qb.push(", ");
        push_bind(&mut qb, bind);
    }
    qb.push(", NOW(), NOW()) RETURNING ");
    qb.push(select_list::<E>());
    qb
}

/// Full replace of the settable columns on the live row, plus the record's own
/// update guard.
pub fn update_query<E: PgRecord>(record: &E) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", E::TABLE));
    for (column, bind) in E::COLUMNS.iter().zip(record.binds()) {
        qb.push(*column);
        qb.push(" = ");
        push_bind(&mut qb, bind);
        qb.push(", ");
    }
    qb.push("updated_at = NOW() WHERE id = ");
    qb.push_bind(record.id().as_str().to_string());
    qb.push(" AND deleted_at IS NULL");
    qb.push(E::UPDATE_GUARD);
    qb.push(" RETURNING ");
    qb.push(select_list::<E>());
    qb
}

pub fn soft_delete_query<E: PgRecord>(id: &EntityId) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("UPDATE {} SET deleted_at = NOW() WHERE id = ", E::TABLE));
    qb.push_bind(id.as_str().to_string());
    qb.push(" AND deleted_at IS NULL");
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use flashsale_catalog::{
        EventStatus, EventType, FlashSaleEvent, NewFlashSaleEvent, Product, ProductFilter,
    };
    use flashsale_core::{materialize, Record};
    use proptest::prelude::*;

    fn event() -> FlashSaleEvent {
        let now = Utc::now();
        materialize(
            NewFlashSaleEvent {
                id: Some(EntityId::new("evt-1")),
                name: "Launch".to_string(),
                description: String::new(),
                start_time: now + Duration::hours(1),
                end_time: now + Duration::hours(2),
                status: EventStatus::Upcoming,
                event_type: EventType::Promotion,
            },
            now,
        )
        .unwrap()
    }

    #[test]
    fn count_and_page_share_the_where_clause() {
        let filters = Product::filter_set(&ProductFilter {
            name: Some("lamp".to_string()),
            min_price: Some(Decimal::new(10, 0)),
            ..Default::default()
        });

        let count = count_query::<Product>(&filters);
        let page = page_query::<Product>(&filters, Page::new(2, 5));

        let where_clause = " WHERE deleted_at IS NULL AND name ILIKE $1 AND current_price >= $2";
        assert_eq!(
            count.sql(),
            format!("SELECT COUNT(*) FROM products{where_clause}")
        );
        assert_eq!(
            page.sql(),
            format!(
                "SELECT id, name, description, base_price, current_price, image_url, stock_quantity, \
                 created_at, updated_at, deleted_at FROM products{where_clause} \
                 ORDER BY created_at ASC, id ASC LIMIT $3 OFFSET $4"
            )
        );
    }

    #[test]
    fn empty_filter_only_scopes_to_live_rows() {
        let filters = Product::filter_set(&ProductFilter::default());
        let count = count_query::<Product>(&filters);
        assert_eq!(count.sql(), "SELECT COUNT(*) FROM products WHERE deleted_at IS NULL");
    }

    #[test]
    fn event_update_carries_the_row_guard() {
        let qb = update_query(&event());
        let sql = qb.sql();
        assert!(sql.starts_with("UPDATE flash_sale_events SET name = $1, description = $2"));
        assert!(sql.contains(
            "WHERE id = $7 AND deleted_at IS NULL AND start_time > NOW() AND end_time >= NOW() AND status <> 'ENDED'"
        ));
    }

    #[test]
    fn soft_delete_only_touches_live_rows() {
        let qb = soft_delete_query::<Product>(&EntityId::new("p-1"));
        assert_eq!(
            qb.sql(),
            "UPDATE products SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL"
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    proptest! {
        /// Property: escaping never leaves an unescaped wildcard behind.
        #[test]
        fn escaped_needles_have_no_bare_wildcards(needle in ".{0,24}") {
            let escaped = escape_like(&needle);
            let mut chars = escaped.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    prop_assert!(matches!(chars.next(), Some('%' | '_' | '\\')));
                } else {
                    prop_assert!(c != '%' && c != '_');
                }
            }
        }
    }
}
