use anyhow::Result;
use nework_client::{JobDraft, JobOwner};

use super::{applied, parse_instant};
use crate::output;
use crate::session::Session;

pub async fn list(session: &Session, user: Option<i64>) -> Result<()> {
    let owner = match user {
        Some(id) => JobOwner::User(id),
        None => {
            session.require_auth()?;
            JobOwner::Me
        }
    };
    let screen = session.app.jobs_screen(owner);
    screen.load().await?;
    let snapshot = screen.feed().snapshot();
    if session.out.is_json() {
        return output::json(snapshot.items());
    }
    output::jobs(snapshot.items());
    Ok(())
}

pub async fn add(
    session: &Session,
    name: String,
    position: String,
    start: &str,
    finish: Option<&str>,
    link: Option<String>,
) -> Result<()> {
    session.require_auth()?;
    let draft = JobDraft {
        name,
        position,
        start: parse_instant(start)?,
        finish: finish.map(parse_instant).transpose()?,
        link,
    };
    let job = session.app.job_composer().submit(&draft).await?;
    if session.out.is_json() {
        return output::json(&job);
    }
    println!("Job {} added.", job.id);
    Ok(())
}

pub async fn delete(session: &Session, id: i64) -> Result<()> {
    session.require_auth()?;
    let screen = session.app.jobs_screen(JobOwner::Me);
    screen.load().await?;
    applied(screen.remove(id).await, "Job", id)?;
    println!("Job {} deleted.", id);
    Ok(())
}
