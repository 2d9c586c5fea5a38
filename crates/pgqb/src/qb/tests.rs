//! Integration tests for the statement builders.

use crate::node::{Arg, ident, raw, template, val};
use crate::op::{gt, in_list};
use crate::qb::{Params, SqlNode, delete, from, select, update};
use crate::value::Value;
use crate::{and, fields, not, or};

fn params(text: &str, values: Vec<Value>) -> Params {
    Params {
        text: text.to_string(),
        values,
    }
}

#[test]
fn test_simple_select() {
    let q = select(["*"]).from("person");
    assert_eq!(q.to_params().unwrap(), params("SELECT * FROM person", vec![]));
}

#[test]
fn test_select_literal_identifier_and_template() {
    let q = select([
        Arg::from(val(1)),
        Arg::from(ident("order")),
        Arg::from(template("COUNT(?)", [ident("name")])),
    ])
    .from("person");
    assert_eq!(
        q.to_params().unwrap(),
        params("SELECT $1, \"order\", COUNT(name) FROM person", vec![Value::Int(1)])
    );
}

#[test]
fn test_select_distinct() {
    let q = select(["id"]).distinct().from("person");
    assert_eq!(q.to_params().unwrap().text, "SELECT DISTINCT id FROM person");
}

#[test]
fn test_select_distinct_on() {
    let q = select(["id"]).distinct_on(["id"]).from("person");
    assert_eq!(q.to_params().unwrap().text, "SELECT DISTINCT ON (id) id FROM person");
}

#[test]
fn test_select_join() {
    let q = select(["*"])
        .from("person")
        .join("company", fields! { "company_id" => "company.id" });
    assert_eq!(
        q.to_params().unwrap(),
        params("SELECT * FROM person INNER JOIN company ON company_id = company.id", vec![])
    );
}

#[test]
fn test_select_where() {
    let q = select(["*"])
        .from("person")
        .where_(fields! { "name" => ident("nickname"), "id" => gt(1) })
        .where_(fields! { "name" => "John" });
    assert_eq!(
        q.to_params().unwrap(),
        params(
            "SELECT * FROM person WHERE name = nickname AND id > $1 AND name = $2",
            vec![Value::Int(1), Value::from("John")]
        )
    );
}

#[test]
fn test_select_where_and_or() {
    let q = select(["*"]).from("person").where_(and!(
        fields! { "name" => "John" },
        or!(fields! { "name" => "Mary" }, fields! { "name" => ident("nickname") })
    ));
    assert_eq!(
        q.to_params().unwrap(),
        params(
            "SELECT * FROM person WHERE name = $1 AND (name = $2 OR name = nickname)",
            vec![Value::from("John"), Value::from("Mary")]
        )
    );
}

#[test]
fn test_select_where_not() {
    let q = select(["*"]).from("person").where_(not!(and!(
        not!(fields! { "name" => "John" }),
        or!(fields! { "name" => "Mary" }, fields! { "name" => ident("nickname") })
    )));
    assert_eq!(
        q.to_params().unwrap(),
        params(
            "SELECT * FROM person WHERE NOT (NOT (name = $1) AND (name = $2 OR name = nickname))",
            vec![Value::from("John"), Value::from("Mary")]
        )
    );
}

#[test]
fn test_select_where_row_value() {
    let row = vec![Arg::from(1), Arg::from("John")];
    let q = select(["*"])
        .from("person")
        .where_((raw("(id, name)"), in_list(vec![row])));
    assert_eq!(
        q.to_params().unwrap(),
        params(
            "SELECT * FROM person WHERE (id, name) IN (($1, $2))",
            vec![Value::Int(1), Value::from("John")]
        )
    );
}

#[test]
fn test_select_cross_join() {
    let q = select(["*"]).from("person").cross_join("company");
    assert_eq!(q.to_params().unwrap().text, "SELECT * FROM person CROSS JOIN company");
}

#[test]
fn test_select_join_and_or() {
    let q = select(["*"]).from("person").join(
        "company",
        or!(
            fields! { "company_id" => "company.id" },
            and!(
                fields! { "company_id" => val(Value::Null) },
                fields! { "company.id" => val(Value::Null) }
            )
        ),
    );
    assert_eq!(
        q.to_params().unwrap(),
        params(
            "SELECT * FROM person INNER JOIN company ON company_id = company.id OR (company_id IS NULL AND company.id IS NULL)",
            vec![]
        )
    );
}

#[test]
fn test_select_join_not() {
    let q = select(["*"]).from("person").join(
        "company",
        not!(or!(
            not!(fields! { "company_id" => "company.id" }),
            and!(
                fields! { "company_id" => val(Value::Null) },
                fields! { "company.id" => val(Value::Null) }
            )
        )),
    );
    assert_eq!(
        q.to_params().unwrap().text,
        "SELECT * FROM person INNER JOIN company ON NOT (NOT (company_id = company.id) OR (company_id IS NULL AND company.id IS NULL))"
    );
}

#[test]
fn test_select_from_custom() {
    let q = select(["*"]).from(from("person").cross_join("company"));
    assert_eq!(q.to_params().unwrap().text, "SELECT * FROM person CROSS JOIN company");
}

#[test]
fn test_update_from_join() {
    let q = update("business")
        .set_fields(fields! { "name" => "ABC" })
        .from(from("person").cross_join("company"));
    assert_eq!(
        q.to_params().unwrap(),
        params(
            "UPDATE business SET name = $1 FROM person CROSS JOIN company",
            vec![Value::from("ABC")]
        )
    );
}

#[test]
fn test_delete_using_join() {
    let q = delete("business").using(from("person").cross_join("company"));
    assert_eq!(
        q.to_params().unwrap(),
        params("DELETE FROM business USING person CROSS JOIN company", vec![])
    );
}

#[test]
fn test_subquery_numbering_continues() {
    let sub = select(["id"]).from("company").where_(fields! { "name" => "Acme" });
    let q = select(["*"])
        .from("person")
        .where_(fields! { "age" => gt(18), "company_id" => in_list(sub) });
    let p = q.to_params().unwrap();
    assert_eq!(
        p.text,
        "SELECT * FROM person WHERE age > $1 AND company_id IN (SELECT id FROM company WHERE name = $2)"
    );
    assert_eq!(p.values, vec![Value::Int(18), Value::from("Acme")]);
}

#[test]
fn test_inline_and_param_forms_agree() {
    let q = select(["*"])
        .from("person")
        .where_(fields! { "name" => "O'Brien", "age" => gt(18) });
    assert_eq!(
        q.to_text().unwrap(),
        "SELECT * FROM person WHERE name = 'O''Brien' AND age > '18'"
    );
    assert_eq!(
        q.to_params().unwrap().text,
        "SELECT * FROM person WHERE name = $1 AND age > $2"
    );
}
