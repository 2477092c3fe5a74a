use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use sb_subscribe::{collect_links, extract_links, is_subscription, SubsError};

#[test]
fn base64_blob_without_padding() {
    let blob = "dHJvamFuOi8vcEBoOjQ0MyN0";
    assert_eq!(blob, STANDARD.encode("trojan://p@h:443#t"));
    assert!(is_subscription(blob));
    assert_eq!(extract_links(blob), ["trojan://p@h:443#t"]);
}

#[test]
fn base64_blob_of_a_list() {
    let list = "vless://u@a.example:443?security=tls#A\r\nhy2://pw@b.example:443#B\r\n";
    let blob = URL_SAFE_NO_PAD.encode(list);
    assert!(is_subscription(&blob));
    let links = extract_links(&blob);
    // regex pass runs scheme by scheme: hysteria2 aliases before vless
    assert_eq!(
        links,
        ["hy2://pw@b.example:443#B", "vless://u@a.example:443?security=tls#A"]
    );
}

#[test]
fn repeated_links_collapse() {
    let text = "trojan://pw@h:443#t\ntrojan://pw@h:443#t\n  trojan://pw@h:443#t  ";
    assert_eq!(extract_links(text), ["trojan://pw@h:443#t"]);
}

#[test]
fn links_inside_prose() {
    let text = "New servers today: vless://id@a.example:443#A, and also tuic://u:p@b.example:443#B.\n\
                Old one (retired): ss://YWVzLTEyOC1nY206cA@c.example:8388#C";
    assert_eq!(
        extract_links(text),
        [
            "vless://id@a.example:443#A",
            "tuic://u:p@b.example:443#B",
            "ss://YWVzLTEyOC1nY206cA@c.example:8388#C",
        ]
    );
}

#[test]
fn scraped_html_page() {
    let page = r#"<!DOCTYPE html>
<html><head><title>Free nodes</title></head>
<body>
  <div class="card"><pre>vless://id@a.example:443?type=ws&amp;path=%2Fws#A</pre></div>
  <a class="btn" href="hy2://pw@b.example:8443#B">Hysteria2</a>
  <span data-subscription="https://sub.example.com/s/abc">sub</span>
</body></html>"#;
    let links = extract_links(page);
    assert_eq!(
        links,
        ["hy2://pw@b.example:8443#B", "vless://id@a.example:443?type=ws&path=%2Fws#A"]
    );
}

#[test]
fn empty_subscription_is_unreadable() {
    assert!(matches!(
        collect_links("<html><body>nothing</body></html>"),
        Err(SubsError::Unreadable)
    ));
}

#[test]
fn single_link_is_not_a_subscription() {
    assert!(!is_subscription("vless://id@a.example:443#A"));
    assert!(is_subscription("http://sub.example.com/link"));
}
