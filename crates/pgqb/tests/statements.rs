use pgqb::prelude::*;
use pgqb::{Expr, Node};

/// Count `$n` placeholders and check they run 1..=n in order of appearance.
fn placeholders_in_order(text: &str) -> usize {
    let mut expected = 1;
    let mut rest = text;
    while let Some(pos) = rest.find('$') {
        rest = &rest[pos + 1..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }
        assert_eq!(digits.parse::<usize>().unwrap(), expected, "in {text}");
        expected += 1;
        rest = &rest[digits.len()..];
    }
    expected - 1
}

fn sample_statements() -> Vec<Node> {
    let sub = select(["id"]).from("company").where_(fields! { "name" => "Acme" });
    vec![
        select(["*"])
            .from("person")
            .where_(fields! { "age" => between(18, 65), "company_id" => in_list(sub.clone()) })
            .into(),
        insert("person")
            .values(fields! { "name" => "John", "tags" => vec!["a", "b"] })
            .values(fields! { "name" => "Mary" })
            .on_conflict(["name"])
            .do_update(fields! { "tags" => vec!["c"] })
            .into(),
        update("person")
            .set("name", "Ann")
            .where_(or!(fields! { "id" => 1 }, fields! { "id" => in_list(vec![2, 3]) }))
            .into(),
        delete("person")
            .where_(exists(sub))
            .returning(["id"])
            .into(),
    ]
}

#[test]
fn placeholder_count_matches_values() {
    for stmt in sample_statements() {
        let p = stmt.to_params().unwrap();
        assert_eq!(placeholders_in_order(&p.text), p.values.len(), "in {}", p.text);
    }
}

#[test]
fn inline_and_param_forms_have_same_shape() {
    for stmt in sample_statements() {
        let text = stmt.to_text().unwrap();
        let p = stmt.to_params().unwrap();
        assert!(!text.contains('$'), "inline form still has placeholders: {text}");
        // Every keyword and identifier outside a value survives in both forms.
        let keywords = |s: &str| -> Vec<String> {
            s.split_whitespace()
                .filter(|w| w.chars().all(|c| c.is_ascii_uppercase()))
                .map(str::to_string)
                .collect()
        };
        assert_eq!(keywords(&text), keywords(&p.text));
    }
}

#[test]
fn to_param_continues_numbering() {
    let mut params = ParamList::new();
    let first = select(["*"]).from("a").where_(fields! { "x" => 1 });
    let second = select(["*"]).from("b").where_(fields! { "y" => 2 });

    assert_eq!(first.to_param(&mut params).unwrap(), "SELECT * FROM a WHERE x = $1");
    assert_eq!(second.to_param(&mut params).unwrap(), "SELECT * FROM b WHERE y = $2");
    assert_eq!(params.values(), &[Value::Int(1), Value::Int(2)]);
}

#[test]
fn failed_render_leaves_params_untouched() {
    let mut params = ParamList::new();
    params.push("kept");

    let broken = select(["*"])
        .from("a")
        .where_(fields! { "x" => 1, "y" => 2 })
        .order_by(Value::Null);
    assert!(broken.to_param(&mut params).unwrap_err().is_malformed());
    assert_eq!(params.values(), &[Value::from("kept")]);
}

#[test]
fn null_equality_collapses() {
    let q = select(["*"]).from("person").where_(fields! {
        "a" => None::<i64>,
        "b" => val(Value::Null),
        "c" => eq(None::<i64>),
        "d" => ne(None::<i64>),
    });
    let p = q.to_params().unwrap();
    assert_eq!(
        p.text,
        "SELECT * FROM person WHERE a IS NULL AND b IS NULL AND c IS NULL AND d IS NOT NULL"
    );
    assert!(p.values.is_empty());
}

#[test]
fn empty_in_list_is_dropped() {
    let q = select(["*"]).from("person").where_(fields! {
        "id" => in_list(Vec::<i64>::new()),
        "name" => not_in(Vec::<&str>::new()),
    });
    assert_eq!(q.to_text().unwrap(), "SELECT * FROM person");

    let q = select(["*"]).from("person").where_(fields! {
        "id" => in_list(Vec::<i64>::new()),
        "age" => gt(3),
    });
    assert_eq!(q.to_text().unwrap(), "SELECT * FROM person WHERE age > '3'");
}

#[test]
fn groups_flatten_on_construction() {
    let nested = and!(and!(fields! { "a" => 1 }), and!(fields! { "b" => 2 }, fields! { "c" => 3 }));
    match &nested {
        Expr::And(children) => assert_eq!(children.len(), 3),
        other => panic!("expected AND group, got {other:?}"),
    }
    assert_eq!(nested.to_text().unwrap(), "a = '1' AND b = '2' AND c = '3'");

    // A single-child OR is absorbed into the surrounding AND.
    let absorbed = and!(fields! { "a" => 1 }, or!(fields! { "b" => 2 }));
    assert_eq!(absorbed.to_text().unwrap(), "a = '1' AND b = '2'");

    // Double negation collapses.
    let twice = not!(not!(fields! { "a" => 1 }));
    assert_eq!(twice.to_text().unwrap(), "a = '1'");
}

#[test]
fn upsert_with_excluded_columns() {
    let q = insert("inventory")
        .values(fields! { "sku" => "A-1", "qty" => 5 })
        .on_conflict(["sku"])
        .do_update_columns(["qty"])
        .returning(["sku", "qty"]);
    let p = q.to_params().unwrap();
    assert_eq!(
        p.text,
        "INSERT INTO inventory (sku, qty) VALUES ($1, $2) ON CONFLICT (sku) DO UPDATE SET qty = EXCLUDED.qty RETURNING sku, qty"
    );
    assert_eq!(p.values, vec![Value::from("A-1"), Value::Int(5)]);
}

#[test]
fn json_object_from_subquery() {
    let q = select([Arg::from(
        jsonb(fields! { "id" => "p.id", "names" => select(["name"]).from("pet").limit(1) })
            .alias("obj"),
    )])
    .from(ident("person").alias("p"));
    assert_eq!(
        q.to_text().unwrap(),
        "SELECT jsonb_build_object('id', p.id, 'names', (SELECT name FROM pet LIMIT 1)) AS obj FROM person AS p"
    );
}

#[test]
fn sub_statement_resets_join_context() {
    let sub = select(["id"]).from("owner").where_(fields! { "name" => "company.name" });
    let q = select(["*"])
        .from("person")
        .join("company", fields! { "company.id" => "person.company_id", "company.owner_id" => in_list(sub) });
    assert_eq!(
        q.to_text().unwrap(),
        "SELECT * FROM person INNER JOIN company ON company.id = person.company_id \
         AND company.owner_id IN (SELECT id FROM owner WHERE name = 'company.name')"
    );
}

#[test]
fn quantified_comparison() {
    let q = select(["*"])
        .from("person")
        .where_(("id", eq(vec![1, 2]).any()));
    let p = q.to_params().unwrap();
    assert_eq!(p.text, "SELECT * FROM person WHERE id = ANY (ARRAY[$1, $2])");

    let sub = select(["age"]).from("limits");
    let q = select(["*"]).from("person").where_(("age", gt(sub).all()));
    assert_eq!(
        q.to_text().unwrap(),
        "SELECT * FROM person WHERE age > ALL (SELECT age FROM limits)"
    );
}

#[test]
fn values_as_join_source() {
    let v = values([fields! { "id" => 1, "label" => "one" }, fields! { "id" => 2 }]).alias("v");
    let q = select(["p.name", "v.label"])
        .from(ident("person").alias("p"))
        .join(v, fields! { "v.id" => "p.id" });
    let p = q.to_params().unwrap();
    assert_eq!(
        p.text,
        "SELECT p.name, v.label FROM person AS p INNER JOIN (VALUES ($1, $2), ($3, $4)) v(id, label) ON v.id = p.id"
    );
    assert_eq!(p.values[3], Value::Null);
}

#[test]
fn sequencing_errors_surface_at_render() {
    let q = pgqb::FromList::new().join("company", fields! { "a" => "b" });
    assert!(q.to_text().unwrap_err().is_sequence());

    let q = insert("t")
        .values(fields! { "id" => 1 })
        .select(select(["id"]).from("s"));
    let err = q.to_params().unwrap_err();
    assert_eq!(err.to_string(), "Sequencing error: insert values already exist");
}

#[test]
fn scalar_free_trees_render_identically() {
    let q = select(["p.id", "c.name"])
        .from(ident("person").alias("p"))
        .left_join(ident("company").alias("c"), fields! { "p.company_id" => "c.id" })
        .where_(("p.deleted_at", eq(None::<i64>)))
        .group_by(["p.id", "c.name"])
        .order_by_desc("p.id");
    assert_eq!(q.to_text().unwrap(), q.to_params().unwrap().text);
}
