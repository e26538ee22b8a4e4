use cypherable::schema::labels::property_name_to_relationship_type;
use test_case::test_case;

#[test_case("WorksFor", "WORKS_FOR" ; "pascal case")]
#[test_case("Knows", "KNOWS" ; "single word")]
#[test_case("homeAddress", "HOME_ADDRESS" ; "camel case")]
#[test_case("WORKS_FOR", "WORKS_FOR" ; "already screaming")]
#[test_case("Tier2Member", "TIER2_MEMBER" ; "digit boundary")]
#[test_case("", "" ; "empty")]
fn relationship_type_derivation(input: &str, expected: &str) {
    assert_eq!(property_name_to_relationship_type(input), expected);
}
