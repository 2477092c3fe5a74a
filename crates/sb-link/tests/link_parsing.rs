use sb_link::{detect_dialect, parse_link, Dialect, LinkError, LinkParams};
use serde_json::json;

#[test]
fn default_ports_per_dialect() {
    let cases = [
        ("hy2://pw@host", 443),
        ("ss://aes-256-gcm:pw@host", 8388),
        ("wg://host", 51820),
        ("socks5://host", 1080),
        ("trojan://pw@host", 443),
        ("tuic://u:p@host", 443),
        ("http://host", 80),
        ("https://host", 443),
        ("vless://id@host:notaport", 443),
    ];
    for (text, port) in cases {
        let link = parse_link(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        assert_eq!(link.port, port, "{text}");
        assert_eq!(link.server, "host", "{text}");
    }
}

#[test]
fn fatal_vs_lenient_credentials() {
    let err = parse_link("vless://host:443").unwrap_err();
    assert_eq!(
        err,
        LinkError::Malformed {
            dialect: Dialect::Vless,
            reason: "missing UUID before `@`".into()
        }
    );

    let link = parse_link("socks5://host:1080").unwrap();
    let LinkParams::Socks5(socks) = &link.params else {
        panic!("expected socks5 params, got {:?}", link.params);
    };
    assert!(socks.username.is_none());
    assert!(socks.password.is_none());
}

#[test]
fn unknown_scheme_is_reported() {
    assert_eq!(detect_dialect("ftp://host"), None);
    let err = parse_link("ftp://host").unwrap_err();
    assert_eq!(err, LinkError::UnknownScheme("ftp".into()));
    assert_eq!(err.kind(), "unknown_scheme");
}

#[test]
fn display_tag_defaults_to_dialect_and_host() {
    assert_eq!(parse_link("hy2://pw@h.example").unwrap().tag, "hysteria2-h.example");
    assert_eq!(parse_link("socks://h.example").unwrap().tag, "socks5-h.example");
    assert_eq!(
        parse_link("trojan://pw@h.example#%F0%9F%87%AF%F0%9F%87%B5%20Tokyo").unwrap().tag,
        "🇯🇵 Tokyo"
    );
}

#[test]
fn first_query_value_wins() {
    let out = parse_link("vless://id@h:443?security=tls&sni=first.example&sni=second.example")
        .unwrap()
        .to_singbox_outbound()
        .unwrap();
    assert_eq!(out["tls"]["server_name"], "first.example");
}

#[test]
fn canonical_record_serializes_with_dialect_tag() {
    let link = parse_link("trojan://pw@t.example:8443?type=ws&path=%2Fws&host=cdn.example#T").unwrap();
    let value = serde_json::to_value(&link).unwrap();
    assert_eq!(value["dialect"], "trojan");
    assert_eq!(value["password"], "pw");
    assert_eq!(value["transport"]["network"], "ws");
    assert_eq!(value["security"]["tier"], "tls");
    assert_eq!(value["port"], json!(8443));
}

#[test]
fn security_tier_is_shared_across_dialects() {
    // identical reality parameters must resolve identically for every tiered dialect
    let query = "security=reality&sni=www.example.com&fp=firefox&pbk=PUBKEY&sid=beef";
    let links = [
        format!("vless://id@h:443?{query}"),
        format!("trojan://pw@h:443?{query}"),
        format!("tuic://uuid:pw@h:443?{query}"),
    ];
    let trees: Vec<_> = links
        .iter()
        .map(|l| parse_link(l).unwrap().to_singbox_outbound().unwrap()["tls"].clone())
        .collect();
    assert_eq!(trees[0], trees[1]);
    assert_eq!(trees[0], trees[2]);
    assert_eq!(trees[0]["reality"]["public_key"], "PUBKEY");
}
