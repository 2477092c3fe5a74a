use proptest::prelude::*;
use sb_subscribe::{extract_links, LINK_SCHEMES};

fn link_strategy(scheme: &'static str) -> impl Strategy<Value = String> {
    ("[a-z0-9]{1,8}", "[a-z]{1,8}", 1u16..=65535, "[A-Za-z0-9]{1,6}")
        .prop_map(move |(cred, host, port, tag)| format!("{scheme}{cred}@{host}.example:{port}#{tag}"))
}

fn any_link() -> impl Strategy<Value = String> {
    prop::sample::select(LINK_SCHEMES.to_vec()).prop_flat_map(link_strategy)
}

proptest! {
    #[test]
    fn extraction_is_idempotent(links in prop::collection::vec(any_link(), 1..8), noise in "[ a-z]{0,12}") {
        let text = links
            .iter()
            .map(|l| format!("{noise} {l}"))
            .collect::<Vec<_>>()
            .join("\n");
        let once = extract_links(&text);
        let twice = extract_links(&once.join("\n"));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn same_scheme_keeps_order_and_drops_duplicates(
        links in prop::collection::vec(link_strategy("vless://"), 1..8),
        repeat in 0usize..8,
    ) {
        let mut input = links.clone();
        input.push(links[repeat % links.len()].clone());
        let mut expected: Vec<String> = Vec::new();
        for l in &links {
            if !expected.contains(l) {
                expected.push(l.clone());
            }
        }
        prop_assert_eq!(extract_links(&input.join("\n")), expected);
    }
}
