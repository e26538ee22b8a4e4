use cypherable::cypher::ParameterTable;
use cypherable::CypherValue;

#[test]
fn serializes_as_insertion_ordered_map() {
    let mut table = ParameterTable::new("p");
    table.add(CypherValue::Int(30));
    table.add(CypherValue::Str("Acme".into()));
    table.add(CypherValue::Bool(true));

    let json = serde_json::to_string(&table).unwrap();
    assert_eq!(json, r#"{"p0":30,"p1":"Acme","p2":true}"#);
}

#[test]
fn null_and_list_values_round_trip() {
    let mut table = ParameterTable::new("p");
    table.add(CypherValue::List(vec![
        CypherValue::Int(1),
        CypherValue::Int(2),
    ]));
    table.add(CypherValue::Null);

    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["p0"], serde_json::json!([1, 2]));
    assert_eq!(json["p1"], serde_json::Value::Null);
}

#[test]
fn placeholders_are_insertion_ordered_and_deduplicated() {
    let mut table = ParameterTable::new("p");
    assert_eq!(table.add(CypherValue::Int(1)), "$p0");
    assert_eq!(table.add(CypherValue::Int(2)), "$p1");
    assert_eq!(table.add(CypherValue::Int(1)), "$p0");
    assert_eq!(table.len(), 2);
    let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["p0", "p1"]);
}
