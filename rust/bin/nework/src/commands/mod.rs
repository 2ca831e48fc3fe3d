pub mod account;
pub mod config;
pub mod events;
pub mod jobs;
pub mod media;
pub mod posts;
pub mod users;

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use nework_client::MutationOutcome;

pub fn prompt_line(label: &str) -> Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Ask before destructive commands. Anything but `y` cancels.
pub fn confirm() -> Result<bool> {
    let answer = prompt_line("Are you sure? [y/N]: ")?;
    if answer.eq_ignore_ascii_case("y") {
        Ok(true)
    } else {
        println!("Cancelled.");
        Ok(false)
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD`; the last two are UTC.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Ok(t.and_utc());
    }
    if let Some(t) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(t.and_utc());
    }
    anyhow::bail!("Cannot parse date \"{}\". Use YYYY-MM-DD, \"YYYY-MM-DD HH:MM\" or RFC 3339.", raw)
}

/// Turn a holder outcome into a command result.
pub fn applied(outcome: MutationOutcome, what: &str, id: i64) -> Result<()> {
    match outcome {
        MutationOutcome::Applied => Ok(()),
        MutationOutcome::Pending => anyhow::bail!("{} {} is already being updated.", what, id),
        MutationOutcome::Missing => anyhow::bail!("{} {} not found.", what, id),
        MutationOutcome::Failed(e) => Err(anyhow::Error::new(e).context(format!("{} {}", what, id))),
    }
}
