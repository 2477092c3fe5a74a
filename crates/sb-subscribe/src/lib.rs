//! Subscription handling: recognise subscription text and pull link strings out of it.
//! 订阅处理：识别订阅文本并提取链接。
//!
//! Input arrives as plain link lists, base64 blobs or scraped HTML. Everything here is a
//! pure function of the text; fetching a subscription URL lives behind `subs_http`.

pub mod detect;
pub mod extract;
pub mod html;
#[cfg(feature = "subs_http")]
pub mod http;
pub mod model;

pub use detect::{is_base64_like, is_http_url, is_subscription, LINK_SCHEMES};
pub use extract::{collect_links, extract_links};
pub use model::{SubsError, SubscriptionBatch};
