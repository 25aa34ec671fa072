//! Query builders for product listings and search.
//!
//! Every user value reaches SQL as a bound parameter; only column names and
//! fixed fragments are written into the statement text.

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Select};

use super::entities::product::{Column, Entity as ProductEntity};
use crate::domain::{ProductFilter, ProductOrdering, ProductStatus, SortDirection, SortField};

const SEARCH_CONDITION: &str = "(to_tsvector('english', name) @@ plainto_tsquery('english', $1) \
     OR to_tsvector('english', coalesce(description, '')) @@ plainto_tsquery('english', $2) \
     OR name ILIKE $3 \
     OR description ILIKE $4)";

const SEARCH_RANK: &str = "ts_rank(to_tsvector('english', name), plainto_tsquery('english', $1)) \
     + ts_rank(to_tsvector('english', coalesce(description, '')), plainto_tsquery('english', $2))";

/// Base select with the filter's conditions AND-ed in a fixed order:
/// category, status, featured, min_price, max_price, vendor_id.
pub fn filtered(filter: &ProductFilter) -> Select<ProductEntity> {
    let mut select = ProductEntity::find();

    if let Some(category) = filter.category() {
        select = select.filter(Column::Category.eq(category));
    }
    if let Some(status) = filter.status {
        select = select.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(featured) = filter.featured {
        select = select.filter(Column::Featured.eq(featured));
    }
    if let Some(min_price) = filter.min_price {
        select = select.filter(Column::Price.gte(min_price));
    }
    if let Some(max_price) = filter.max_price {
        select = select.filter(Column::Price.lte(max_price));
    }
    if let Some(vendor_id) = filter.vendor_id {
        select = select.filter(Column::VendorId.eq(vendor_id));
    }

    select
}

/// Filtered select narrowed to products matching `term` by full text or substring.
pub fn searched(filter: &ProductFilter, term: &str) -> Select<ProductEntity> {
    filtered(filter).filter(search_condition(term))
}

pub fn search_condition(term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(term));
    Expr::cust_with_values(
        SEARCH_CONDITION,
        [term.to_string(), term.to_string(), pattern.clone(), pattern],
    )
}

/// Apply the requested ordering. With no explicit sort, searches rank by
/// relevance and plain listings show the newest first.
pub fn ordered(
    select: Select<ProductEntity>,
    ordering: ProductOrdering,
    search_term: Option<&str>,
) -> Select<ProductEntity> {
    match (ordering, search_term) {
        (ProductOrdering::By(field, direction), _) => {
            let order = match direction {
                SortDirection::Asc => Order::Asc,
                SortDirection::Desc => Order::Desc,
            };
            select.order_by(sort_column(field), order)
        }
        (ProductOrdering::Default, Some(term)) => select
            .order_by(
                Expr::cust_with_values(SEARCH_RANK, [term.to_string(), term.to_string()]),
                Order::Desc,
            )
            .order_by(Column::CreatedAt, Order::Desc),
        (ProductOrdering::Default, None) => select.order_by(Column::CreatedAt, Order::Desc),
    }
}

/// Featured, active and in stock, newest first.
pub fn featured() -> Select<ProductEntity> {
    ProductEntity::find()
        .filter(Column::Featured.eq(true))
        .filter(Column::Status.eq(ProductStatus::Active.as_str()))
        .filter(Column::Stock.gt(0))
        .order_by(Column::CreatedAt, Order::Desc)
}

fn sort_column(field: SortField) -> Column {
    match field {
        SortField::Name => Column::Name,
        SortField::Price => Column::Price,
        SortField::CreatedAt => Column::CreatedAt,
        SortField::UpdatedAt => Column::UpdatedAt,
    }
}

/// Escape LIKE wildcards so the term only matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::{DbBackend, QueryTrait};
    use uuid::Uuid;

    fn sql(select: Select<ProductEntity>) -> (String, usize) {
        let statement = select.build(DbBackend::Postgres);
        let values = statement.values.map(|v| v.0.len()).unwrap_or(0);
        (statement.sql, values)
    }

    #[test]
    fn test_conditions_in_order() {
        let filter = ProductFilter {
            category: Some("books".into()),
            status: Some(ProductStatus::Active),
            featured: Some(true),
            min_price: Some(Decimal::new(5, 0)),
            max_price: Some(Decimal::new(50, 0)),
            vendor_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let (sql, values) = sql(filtered(&filter));

        let positions: Vec<usize> = [
            r#""products"."category" = $1"#,
            r#""products"."status" = $2"#,
            r#""products"."featured" = $3"#,
            r#""products"."price" >= $4"#,
            r#""products"."price" <= $5"#,
            r#""products"."vendor_id" = $6"#,
        ]
        .iter()
        .map(|fragment| sql.find(fragment).unwrap_or_else(|| panic!("missing {fragment} in {sql}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(values, 6);
        assert!(!sql.contains("books"));
    }

    #[test]
    fn test_empty_filter_has_no_where() {
        let (sql, values) = sql(filtered(&ProductFilter::default()));
        assert!(!sql.contains("WHERE"));
        assert_eq!(values, 0);
    }

    #[test]
    fn test_default_order_newest_first() {
        let (sql, _) = sql(ordered(
            filtered(&ProductFilter::default()),
            ProductOrdering::Default,
            None,
        ));
        assert!(sql.ends_with(r#"ORDER BY "products"."created_at" DESC"#));
    }

    #[test]
    fn test_explicit_sort() {
        let (sql, _) = sql(ordered(
            filtered(&ProductFilter::default()),
            ProductOrdering::By(SortField::Price, SortDirection::Asc),
            Some("lamp"),
        ));
        assert!(sql.ends_with(r#"ORDER BY "products"."price" ASC"#));
        assert!(!sql.contains("ts_rank"));
    }

    #[test]
    fn test_search_binds_term_and_pattern() {
        let filter = ProductFilter {
            status: Some(ProductStatus::Active),
            ..Default::default()
        };
        let select = ordered(searched(&filter, "50%_off"), ProductOrdering::Default, Some("50%_off"));
        let statement = select.build(DbBackend::Postgres);

        assert!(statement.sql.contains("plainto_tsquery('english', $2)"));
        assert!(statement.sql.contains("name ILIKE $4"));
        assert!(statement.sql.contains("description ILIKE $5"));
        assert!(statement.sql.contains("ts_rank"));
        assert!(!statement.sql.contains("50%_off"));

        let values = statement.values.unwrap().0;
        // status, 4 search values, 2 rank values
        assert_eq!(values.len(), 7);
        assert_eq!(values[3], sea_orm::Value::from(r"%50\%\_off%".to_string()));
    }

    #[test]
    fn test_featured_query() {
        let (sql, values) = sql(featured());
        assert!(sql.contains(r#""products"."featured" = $1"#));
        assert!(sql.contains(r#""products"."status" = $2"#));
        assert!(sql.contains(r#""products"."stock" > $3"#));
        assert_eq!(values, 3);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like(r"a%b_c\d"), r"a\%b\_c\\d");
    }
}
