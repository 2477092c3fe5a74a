use proptest::prelude::*;
use sb_export::{emit_clash, emit_singbox_batch};
use std::collections::HashSet;

fn trojan(i: usize, tag: &str) -> String {
    format!("trojan://pw{i}@n{i}.example:443#{tag}")
}

proptest! {
    #[test]
    fn outbounds_follow_input_order(tags in prop::collection::vec("[a-c]{1,2}", 1..12)) {
        let links: Vec<String> = tags.iter().enumerate().map(|(i, t)| trojan(i, t)).collect();
        let cfg = emit_singbox_batch(&links, false).unwrap();
        let outbounds = cfg.tree["outbounds"].as_array().unwrap();
        prop_assert_eq!(outbounds.len(), links.len());
        for (i, ob) in outbounds.iter().enumerate() {
            let expected = format!("n{i}.example");
            prop_assert_eq!(ob["server"].as_str(), Some(expected.as_str()));
        }
    }

    #[test]
    fn clash_names_are_unique(tags in prop::collection::vec("[a-b]{1,2}(-2)?", 1..12)) {
        let links: Vec<String> = tags.iter().enumerate().map(|(i, t)| trojan(i, t)).collect();
        let cfg = emit_clash(&links).unwrap();
        let names: Vec<&str> = cfg.tree["proxies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(unique.len(), names.len());
        prop_assert_eq!(names.len(), links.len());
    }
}
