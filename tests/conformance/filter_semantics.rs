//! Filter parsing, evaluation and encoding.

use hiermem::encode::{encode_str, format_attributes, format_template};
use hiermem::{
    AttrValue, Attribute, Attributes, ContainmentFilter, Filter, FilterExpr, SearchFilter,
};
use proptest::prelude::*;

fn check(filter: &str, attrs: &Attributes) -> bool {
    SearchFilter::parse(filter).unwrap().check(attrs)
}

#[test]
fn wildcard_substring_examples() {
    assert!(check("(x=fo*ar)", &Attributes::new().with("x", ["foobar"])));
    assert!(!check("(x=fo*ar)", &Attributes::new().with("x", ["foobaz"])));
}

#[test]
fn empty_conjunction_and_disjunction() {
    let attrs = Attributes::new().with("x", ["1"]);
    assert!(FilterExpr::And(vec![]).check(&attrs));
    assert!(!FilterExpr::Or(vec![]).check(&attrs));
    assert!(check("(&)", &attrs));
    assert!(!check("(|)", &attrs));
}

#[test]
fn ordering_is_not_numeric() {
    let attrs = Attributes::new().with("n", ["10"]);
    assert!(!check("(n>=2)", &attrs));
    assert!(check("(n<=2)", &attrs));
}

#[test]
fn any_value_may_satisfy_an_assertion() {
    let attrs = Attributes::new().with("mail", ["a@x.org", "b@y.org"]);
    assert!(check("(mail=b@y.org)", &attrs));
    assert!(check("(!(mail=c@z.org))", &attrs));
}

#[test]
fn errors_report_position_and_text() {
    let err = SearchFilter::parse("(|(a=1)(b=2)").unwrap_err();
    assert!(err.is_invalid_filter());
    let text = err.to_string();
    assert!(text.contains("position 12"), "{text}");
    assert!(text.contains("(|(a=1)(b=2)"), "{text}");
}

#[test]
fn template_arguments_are_escaped() {
    let text = format_template("(cn={0})", &[AttrValue::from("a*(b)")]).unwrap();
    assert_eq!(text, r"(cn=a\2a\28b\29)");
    assert!(check(&text, &Attributes::new().with("cn", ["a*(b)"])));
    assert!(!check(&text, &Attributes::new().with("cn", ["aXXX(b)"])));
}

#[test]
fn containment_is_attribute_superset() {
    let candidate = Attributes::new()
        .with("objectClass", ["top", "person"])
        .with("cn", ["x"]);
    let yes = ContainmentFilter::new(Attributes::new().with("objectClass", ["person"]));
    let no = ContainmentFilter::new(Attributes::new().with("objectClass", ["group"]));
    assert!(yes.check(&candidate));
    assert!(!no.check(&candidate));
    assert!(ContainmentFilter::new(Attributes::new()).check(&candidate));
}

fn attr_value() -> impl Strategy<Value = AttrValue> {
    prop_oneof![
        "\\PC{0,10}".prop_map(AttrValue::Text),
        proptest::collection::vec(any::<u8>(), 0..6).prop_map(AttrValue::Bytes),
    ]
}

fn attributes() -> impl Strategy<Value = Attributes> {
    proptest::collection::vec(
        ("[a-zA-Z][a-zA-Z0-9-]{0,8}", proptest::collection::vec(attr_value(), 0..4)),
        0..6,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(id, values)| Attribute::with_values(id, values))
            .collect()
    })
}

proptest! {
    #[test]
    fn formatted_attributes_match_their_source(attrs in attributes()) {
        let text = format_attributes(&attrs);
        let filter = SearchFilter::parse(&text).unwrap();
        prop_assert!(filter.check(&attrs), "{} did not match", text);
    }

    #[test]
    fn formatted_attributes_match_supersets(attrs in attributes(), extra in "[a-z]{1,5}") {
        let mut bigger = attrs.clone();
        bigger.merge(Attribute::with_values(format!("extra-{extra}"), ["v"]));
        let filter = SearchFilter::from_attributes(&attrs).unwrap();
        prop_assert!(filter.check(&bigger));
        prop_assert!(ContainmentFilter::new(attrs).check(&bigger));
    }

    #[test]
    fn escaped_literal_matches_only_case_variants(value in "[ -~]{1,12}", other in "[ -~]{1,12}") {
        let filter = SearchFilter::parse(&format!("(v={})", encode_str(&value))).unwrap();
        prop_assert!(filter.check(&Attributes::new().with("v", [value.to_uppercase()])));
        let same = value.to_lowercase() == other.to_lowercase();
        prop_assert_eq!(filter.check(&Attributes::new().with("v", [other.as_str()])), same);
    }

    #[test]
    fn wildcards_match_any_infix(prefix in "[a-z]{0,4}", middle in "[ -~]{0,8}", suffix in "[a-z]{0,4}") {
        let filter = SearchFilter::parse(&format!("(v={prefix}*{suffix})")).unwrap();
        let value = format!("{prefix}{middle}{suffix}");
        prop_assert!(filter.check(&Attributes::new().with("v", [value])));
    }
}
