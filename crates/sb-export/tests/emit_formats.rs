use sb_export::{
    emit_clash, emit_clash_single, emit_singbox, emit_singbox_batch, emit_xray, ExportError,
    TargetFormat,
};

const HY2: &str = "hy2://secret@h2.example:443?sni=h2.example#HY";
const VLESS: &str = "vless://11111111-2222-3333-4444-555555555555@v.example:443?security=tls&sni=v.example&type=ws&path=%2Fws#VL";
const TROJAN: &str = "trojan://pw@t.example:443#TR";

#[test]
fn clash_keeps_only_supported_dialects() {
    let cfg = emit_clash(&[HY2, VLESS]).unwrap();
    let proxies = cfg.tree["proxies"].as_array().unwrap();
    assert_eq!(proxies.len(), 1);
    assert_eq!(proxies[0]["name"], "VL");
    assert_eq!(proxies[0]["ws-opts"]["path"], "/ws");
    assert_eq!(cfg.converted, 1);
    assert_eq!(cfg.skipped.len(), 1);
    assert_eq!(cfg.skipped[0].kind, "unsupported_dialect");
    assert_eq!(cfg.skipped[0].link, HY2);
}

#[test]
fn xray_fails_when_nothing_converts() {
    let err = emit_xray(&[HY2, "socks5://s.example:1080"]).unwrap_err();
    assert_eq!(
        err,
        ExportError::NoConvertibleLinks {
            format: TargetFormat::Xray,
            total: 2
        }
    );
    assert_eq!(err.kind(), "no_convertible_links");
}

#[test]
fn singbox_full_batch_uses_selector() {
    let cfg = emit_singbox_batch(&[HY2, VLESS, TROJAN], true).unwrap();
    let tags: Vec<_> = cfg.tree["outbounds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["tag"].as_str().unwrap())
        .collect();
    assert_eq!(tags, ["HY", "VL", "TR", "proxy", "direct", "block"]);
    assert_eq!(cfg.tree["outbounds"][3]["default"], "HY");
    assert_eq!(cfg.tree["route"]["final"], "proxy");
}

#[test]
fn batch_preserves_input_order_and_skips_garbage() {
    let cfg = emit_singbox_batch(&[TROJAN, "vless://@broken", HY2], false).unwrap();
    let kinds: Vec<_> = cfg.tree["outbounds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["trojan", "hysteria2"]);
    assert_eq!(cfg.skipped[0].kind, "malformed_link");
}

#[test]
fn duplicate_tags_get_suffixes() {
    let cfg = emit_clash(&[TROJAN, TROJAN]).unwrap();
    assert_eq!(cfg.tree["proxies"][1]["name"], "TR-2");
    assert_eq!(
        cfg.tree["proxy-groups"][0]["proxies"],
        serde_json::json!(["TR", "TR-2", "DIRECT"])
    );
}

#[test]
fn single_link_errors_are_strict() {
    let err = emit_clash_single(HY2).unwrap_err();
    assert_eq!(err.kind(), "unsupported_dialect");
    assert!(err.to_string().contains("clash"));

    let err = emit_singbox("foo://bar", false).unwrap_err();
    assert_eq!(err.kind(), "unknown_scheme");
}

#[test]
fn clash_yaml_is_block_style() {
    let cfg = emit_clash(&[TROJAN]).unwrap();
    assert!(cfg.text.contains("\nproxies:\n- name: TR\n"));
    assert!(!cfg.text.contains('{'));
}

fn tags(tree: &serde_json::Value) -> Vec<&str> {
    tree["outbounds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["tag"].as_str().unwrap())
        .collect()
}

#[test]
fn link_tags_never_shadow_built_in_outbounds() {
    let cfg = emit_singbox_batch(&["trojan://pw@a.example:443#proxy", "trojan://pw@b.example:443#B"], true).unwrap();
    assert_eq!(tags(&cfg.tree), ["proxy-2", "B", "proxy", "direct", "block"]);
    assert_eq!(cfg.tree["route"]["final"], "proxy");

    let cfg = emit_xray(&["trojan://pw@a.example:443#direct"]).unwrap();
    assert_eq!(tags(&cfg.tree), ["direct-2", "direct", "block"]);

    let cfg = emit_clash(&["trojan://pw@a.example:443#DIRECT"]).unwrap();
    assert_eq!(cfg.tree["proxies"][0]["name"], "DIRECT-2");
    assert_eq!(
        cfg.tree["proxy-groups"][0]["proxies"],
        serde_json::json!(["DIRECT-2", "DIRECT"])
    );
}
