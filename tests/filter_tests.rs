//! Filter behavior against a realistic catalog document.

use yamlscout::document::node::Node;
use yamlscout::document::parser::from_str;
use yamlscout::yamlpath::Path;

const STORE: &str = r#"
store:
  book:
  - category: reference
    author: Nigel Rees
    title: Sayings of the Century
    price: 8.95
  - category: fiction
    author: Evelyn Waugh
    title: Sword of Honour
    price: 12.99
  - category: fiction
    author: Herman Melville
    title: Moby Dick
    isbn: 0-553-21311-3
    price: 8.99
  - category: fiction
    author: J. R. R. Tolkien
    title: The Lord of the Rings
    isbn: 0-395-19395-8
    price: 22.99
  bicycle:
    color: red
    price: 19.95
limit: 10
"#;

fn titles(doc: &Node, expr: &str) -> Vec<String> {
    let path = Path::parse(expr).unwrap();
    path.find(doc)
        .into_iter()
        .map(|node| node.value().to_string())
        .collect()
}

#[test]
fn test_filter_numeric_comparison() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(&doc, "$.store.book[?(@.price < 10)].title"),
        vec!["Sayings of the Century", "Moby Dick"]
    );
}

#[test]
fn test_filter_existence() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(&doc, "$.store.book[?(@.isbn)].title"),
        vec!["Moby Dick", "The Lord of the Rings"]
    );
}

#[test]
fn test_filter_negated_existence() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(&doc, "$.store.book[?(!@.isbn)].title"),
        vec!["Sayings of the Century", "Sword of Honour"]
    );
}

#[test]
fn test_filter_string_equality() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(&doc, "$.store.book[?(@.category == 'fiction')].author"),
        vec!["Evelyn Waugh", "Herman Melville", "J. R. R. Tolkien"]
    );
}

#[test]
fn test_filter_conjunction() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(
            &doc,
            "$.store.book[?(@.category == 'fiction' && @.price < 10)].title"
        ),
        vec!["Moby Dick"]
    );
}

#[test]
fn test_filter_disjunction() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(
            &doc,
            "$.store.book[?(@.price < 9 || @.price > 20)].title"
        ),
        vec!["Sayings of the Century", "Moby Dick", "The Lord of the Rings"]
    );
}

#[test]
fn test_filter_grouping() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(
            &doc,
            "$.store.book[?((@.price < 9 || @.price > 20) && @.category == 'fiction')].title"
        ),
        vec!["Moby Dick", "The Lord of the Rings"]
    );
}

#[test]
fn test_filter_regex() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(&doc, "$.store.book[?(@.author =~ /Melville/)].title"),
        vec!["Moby Dick"]
    );
    assert_eq!(
        titles(&doc, "$.store.book[?(@.title =~ /^S/)].title"),
        vec!["Sayings of the Century", "Sword of Honour"]
    );
}

#[test]
fn test_filter_against_root_value() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(&doc, "$.store.book[?(@.price > $.limit)].title"),
        vec!["Sword of Honour", "The Lord of the Rings"]
    );
}

#[test]
fn test_filter_on_non_sequence_guards_the_node() {
    let doc = from_str(STORE).unwrap();
    // bicycle is a mapping: the filter applies to the node itself
    assert_eq!(
        titles(&doc, "$.store.bicycle[?(@.color == 'red')].price"),
        vec!["19.95"]
    );
    assert_eq!(
        titles(&doc, "$.store.bicycle[?(@.color == 'blue')].price"),
        Vec::<String>::new()
    );
}

#[test]
fn test_recursive_filter_guards_each_node() {
    let doc = from_str(STORE).unwrap();
    // every node with a price key, wherever it lives
    assert_eq!(
        titles(&doc, "$..[?(@.price > 19)].price"),
        vec!["22.99", "19.95"]
    );
}

#[test]
fn test_recursive_filter_with_equality() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(&doc, "$..[?(@.color == 'red')].color"),
        vec!["red"]
    );
}

#[test]
fn test_filter_keeps_element_order() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(&doc, "$.store.book[?(@.price != 12.99)].title"),
        vec!["Sayings of the Century", "Moby Dick", "The Lord of the Rings"]
    );
}

#[test]
fn test_filter_comparison_with_missing_key_is_false() {
    let doc = from_str(STORE).unwrap();
    assert_eq!(
        titles(&doc, "$.store.book[?(@.publisher == 'Acme')].title"),
        Vec::<String>::new()
    );
    // != against a missing key is false too, not vacuously true
    assert_eq!(
        titles(&doc, "$.store.book[?(@.publisher != 'Acme')].title"),
        Vec::<String>::new()
    );
}

#[test]
fn test_filter_int_float_coercion() {
    let doc = from_str("items:\n- count: 3\n- count: 3.0\n- count: 4\n").unwrap();
    assert_eq!(
        titles(&doc, "$.items[?(@.count == 3)].count"),
        vec!["3", "3"]
    );
}

#[test]
fn test_filter_bool_and_null() {
    let doc = from_str(
        "flags:\n- {name: a, on: true, note: null}\n- {name: b, on: false, note: set}\n",
    )
    .unwrap();
    assert_eq!(titles(&doc, "$.flags[?(@.on == true)].name"), vec!["a"]);
    assert_eq!(titles(&doc, "$.flags[?(@.note == null)].name"), vec!["a"]);
    assert_eq!(titles(&doc, "$.flags[?(@.note != null)].name"), vec!["b"]);
}

#[test]
fn test_quoted_numbers_stay_strings() {
    let doc = from_str("items:\n- id: 80\n- id: '80'\n").unwrap();
    assert_eq!(titles(&doc, "$.items[?(@.id == 80)].id").len(), 1);
    assert_eq!(titles(&doc, "$.items[?(@.id == '80')].id").len(), 1);
}

#[test]
fn test_filter_subpath_with_subscript() {
    let doc = from_str("rows:\n- [10, 20]\n- [30, 40]\n").unwrap();
    let path = Path::parse("$.rows[?(@[0] >= 30)]").unwrap();
    let found = path.find(&doc);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].content()[0].value(), "30");
}

#[test]
fn test_filter_recursive_subpath() {
    let doc = from_str(STORE).unwrap();
    // the store has some book cheaper than 9
    let path = Path::parse("$[?(@..price < 50)]").unwrap();
    assert_eq!(path.find(&doc).len(), 1);
}
