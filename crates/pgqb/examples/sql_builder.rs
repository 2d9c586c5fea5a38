//! Example demonstrating pgqb's statement builders and condition shorthands.
//!
//! Run with:
//!   cargo run --example sql_builder -p pgqb

use pgqb::prelude::*;
use pgqb::Select;

#[derive(Debug)]
struct Filters {
    status: Option<String>,
    search: Option<String>,
    roles_any_of: Vec<String>,
    include_deleted: bool,
    page: u64,
    per_page: u64,
    sort_by: Option<String>,
}

fn build_list_users(filters: &Filters) -> Select {
    let mut conditions = Fields::new();
    conditions.set_opt("status", filters.status.clone());
    if let Some(search) = &filters.search {
        conditions.set("name", ilike(format!("%{}%", pgqb::escape_pattern(search))));
    }
    if !filters.roles_any_of.is_empty() {
        conditions.set("role", in_list(filters.roles_any_of.clone()));
    }
    if !filters.include_deleted {
        conditions.set("deleted_at", None::<i64>);
    }

    let order = match filters.sort_by.as_deref() {
        Some("name") => "name",
        _ => "created_at",
    };

    select(["id", "name", "role", "status"])
        .from("users")
        .where_(conditions)
        .order_by_desc(order)
        .paginate(filters.page, filters.per_page)
}

fn main() -> QbResult<()> {
    let filters = Filters {
        status: Some("active".to_string()),
        search: Some("al_ice".to_string()),
        roles_any_of: vec!["admin".to_string(), "owner".to_string()],
        include_deleted: false,
        page: 2,
        per_page: 20,
        sort_by: Some("name".to_string()),
    };

    let list = build_list_users(&filters);
    let p = list.to_params()?;
    println!("{filters:?}");
    println!("SQL: {}", p.text);
    println!("Params: {:?}", p.values);
    println!("Inline: {}", list.to_text()?);

    // Upsert with an EXCLUDED-based update
    let upsert = insert("users")
        .values(fields! { "email" => "alice@example.com", "name" => "Alice" })
        .on_conflict(["email"])
        .do_update_columns(["name"])
        .returning(["id"]);
    println!("{}", upsert.to_params()?.text);

    // Nested JSON per row
    let report = select([
        Arg::from("u.id"),
        Arg::from(
            jsonb(fields! {
                "orders" => select([raw("count(*)")])
                    .from("orders")
                    .where_(fields! { "orders.user_id" => ident("u.id") }),
            })
            .alias("stats"),
        ),
    ])
    .from(ident("users").alias("u"))
    .order_by_asc("u.id")
    .limit(10);
    println!("{}", report.to_text()?);

    Ok(())
}
