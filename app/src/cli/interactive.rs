//! Line-oriented front end: submit a link or subscription, then answer the format menu.
//!
//! Lines may start with `@<user> ` to act as a different user; each user has at most one
//! pending submission, which expires after `SB_SESSION_TTL_SECS`.

use crate::cli::convert::{convert, Conversion};
use crate::cli::output;
use crate::format::OutputFormat;
use crate::resolve::{resolve, Resolved};
use crate::session::PendingChoices;
use crate::settings::Settings;
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Parser, Debug, Clone)]
pub struct InteractiveArgs {
    /// User key for lines without an `@user` prefix
    #[arg(long, default_value = "local")]
    pub user: String,
}

const SINGLE_MENU: &str = "\
1. sing-box full config (log, dns, inbounds, outbounds, route)
2. sing-box outbound only [default]
3. Clash YAML
4. Xray JSON";

const BATCH_MENU: &str = "\
1. Text (link list)
2. Clash YAML [default]
3. sing-box full config
4. Xray JSON";

/// Menu answer for a pending submission; blank picks the default.
pub fn choice_format(pending: &Resolved, choice: &str) -> Option<OutputFormat> {
    let single = matches!(pending, Resolved::Single { .. });
    let format = match (choice.trim(), single) {
        ("1", true) => OutputFormat::SingBoxFull,
        ("2" | "", true) => OutputFormat::SingBox,
        ("1", false) => OutputFormat::Text,
        ("2" | "", false) => OutputFormat::Clash,
        ("3", true) => OutputFormat::Clash,
        ("3", false) => OutputFormat::SingBoxFull,
        ("4", _) => OutputFormat::Xray,
        _ => return None,
    };
    Some(format)
}

fn is_menu_answer(line: &str) -> bool {
    line.trim().chars().all(|c| c.is_ascii_digit())
}

/// `@alice vless://...` -> (`alice`, `vless://...`).
fn split_user<'a>(line: &'a str, default_user: &'a str) -> (&'a str, &'a str) {
    if let Some(rest) = line.strip_prefix('@') {
        if let Some((user, msg)) = rest.split_once(char::is_whitespace) {
            return (user, msg.trim());
        }
        return (rest, "");
    }
    (default_user, line.trim())
}

/// Outcome of feeding one menu answer.
#[derive(Debug)]
pub enum Answer {
    Converted(Conversion),
    Expired,
    Invalid,
}

/// Pending submissions per user.
#[derive(Debug)]
pub struct Session {
    pending: PendingChoices<String, Resolved>,
}

impl Session {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: PendingChoices::new(ttl),
        }
    }

    pub fn has_pending(&self, user: &str, now: Instant) -> bool {
        self.pending.peek(&user.to_string(), now).is_some()
    }

    /// Remember the submission and return the menu to show.
    pub fn submit(&mut self, user: &str, resolved: Resolved, now: Instant) -> String {
        self.pending.purge_expired(now);
        let header = match &resolved {
            Resolved::Single { link, .. } => match sb_link::detect_dialect(link) {
                Some(d) => format!("Detected {}. Choose a config format:", d.name().to_uppercase()),
                None => "Choose a config format:".to_string(),
            },
            Resolved::Batch { links, .. } => {
                format!("Extracted {} links. Choose an export format:", links.len())
            }
        };
        let menu = match &resolved {
            Resolved::Single { .. } => SINGLE_MENU,
            Resolved::Batch { .. } => BATCH_MENU,
        };
        self.pending.insert(user.to_string(), resolved, now);
        format!("{header}\n{menu}")
    }

    /// Consume the user's pending submission with a menu answer.
    pub fn answer(&mut self, user: &str, choice: &str, now: Instant) -> Result<Answer> {
        let key = user.to_string();
        let Some(pending) = self.pending.take(&key, now) else {
            return Ok(Answer::Expired);
        };
        let Some(format) = choice_format(&pending, choice) else {
            // keep the submission so the user can answer again
            self.pending.insert(key, pending, now);
            return Ok(Answer::Invalid);
        };
        debug!(user, %format, "menu answered");
        Ok(Answer::Converted(convert(&pending, format)?))
    }
}

/// Drive a session over any line source, writing replies to `out`.
pub async fn run_with<R, W>(input: R, out: &mut W, settings: &Settings, default_user: &str) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = Session::new(settings.session_ttl);
    let mut lines = input.lines();
    writeln!(out, "Paste a link or subscription (q to quit):")?;

    while let Some(line) = lines.next_line().await? {
        let (user, msg) = split_user(&line, default_user);
        if matches!(msg, "q" | "quit" | "exit") {
            break;
        }
        let now = Instant::now();

        if is_menu_answer(msg) && session.has_pending(user, now) {
            match session.answer(user, msg, now) {
                Ok(Answer::Converted(c)) => {
                    writeln!(out, "{}", c.text.trim_end())?;
                    if !c.skipped.is_empty() {
                        writeln!(out, "({} links skipped)", c.skipped.len())?;
                    }
                }
                Ok(Answer::Invalid) => writeln!(out, "Pick 1-4.")?,
                Ok(Answer::Expired) => writeln!(out, "That choice expired; send the link again.")?,
                Err(e) => writeln!(out, "error [{}]: {e:#}", output::error_kind(&e))?,
            }
            continue;
        }
        if msg.is_empty() {
            continue;
        }

        match resolve(msg, settings).await {
            Ok(resolved) => {
                let menu = session.submit(user, resolved, now);
                writeln!(out, "{menu}")?;
            }
            Err(e) => writeln!(out, "error [{}]: {e:#}", output::error_kind(&e))?,
        }
    }
    Ok(())
}

pub async fn run(args: &InteractiveArgs, settings: &Settings) -> Result<i32> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_with(stdin, &mut stdout, settings, &args.user).await?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menus_map_answers() {
        let single = Resolved::Single {
            link: "trojan://pw@h:443".into(),
            source: None,
        };
        let batch = Resolved::Batch {
            links: vec!["a".into(), "b".into()],
            source: None,
        };
        assert_eq!(choice_format(&single, ""), Some(OutputFormat::SingBox));
        assert_eq!(choice_format(&single, "1"), Some(OutputFormat::SingBoxFull));
        assert_eq!(choice_format(&batch, ""), Some(OutputFormat::Clash));
        assert_eq!(choice_format(&batch, "1"), Some(OutputFormat::Text));
        assert_eq!(choice_format(&batch, "4"), Some(OutputFormat::Xray));
        assert_eq!(choice_format(&batch, "9"), None);
    }

    #[test]
    fn user_prefix() {
        assert_eq!(split_user("@bob 2", "local"), ("bob", "2"));
        assert_eq!(split_user("  trojan://x ", "local"), ("local", "trojan://x"));
    }

    #[test]
    fn expired_submission_is_not_converted() {
        let now = Instant::now();
        let mut session = Session::new(Duration::from_secs(1));
        let single = Resolved::Single {
            link: "trojan://pw@h:443#T".into(),
            source: None,
        };
        session.submit("u", single, now);
        let answer = session.answer("u", "2", now + Duration::from_secs(2)).unwrap();
        assert!(matches!(answer, Answer::Expired));
    }

    #[tokio::test]
    async fn users_have_separate_choices() {
        let script = "\
@alice trojan://pw@a.example:443#A
@bob vless://11111111-2222-3333-4444-555555555555@b.example:443#B
@alice 3
@bob 9
@bob 2
q
";
        let mut out = Vec::new();
        run_with(script.as_bytes(), &mut out, &Settings::default(), "local")
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Detected TROJAN"));
        assert!(out.contains("Detected VLESS"));
        // alice picked Clash
        assert!(out.contains("proxies:\n- name: A"));
        assert!(out.contains("Pick 1-4."));
        // bob's retry still had the pending link
        assert!(out.contains("\"type\": \"vless\""));
    }
}
