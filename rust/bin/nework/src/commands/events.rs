use std::path::Path;

use anyhow::Result;
use nework_client::{EventDraft, LocalFile};
use nework_core::EventType;

use super::{applied, parse_instant};
use crate::output;
use crate::session::Session;

/// Arguments of `events create` apart from the attachment.
pub struct NewEvent {
    pub content: String,
    pub at: String,
    pub online: bool,
    pub link: Option<String>,
    pub speakers: Vec<i64>,
}

pub async fn list(session: &Session) -> Result<()> {
    let screen = session.app.events_screen();
    screen.load().await?;
    let snapshot = screen.feed().snapshot();
    if session.out.is_json() {
        return output::json(snapshot.items());
    }
    output::events(snapshot.items());
    Ok(())
}

pub async fn show(session: &Session, id: i64) -> Result<()> {
    let detail = session.app.event_detail();
    detail.load(id).await?;
    let Some(event) = detail.state().entity else {
        anyhow::bail!("Event {} not found.", id);
    };
    if session.out.is_json() {
        return output::json(&event);
    }
    output::event(&event, &detail.speakers(), &detail.participants());
    Ok(())
}

pub async fn like(session: &Session, id: i64) -> Result<()> {
    session.require_auth()?;
    let detail = session.app.event_detail();
    detail.load(id).await?;
    applied(detail.toggle_like().await, "Event", id)?;
    if let Some(event) = detail.state().entity {
        if session.out.is_json() {
            return output::json(&event);
        }
        let verb = if event.liked_by_me { "Liked" } else { "Unliked" };
        println!("{} event {} ({} likes).", verb, id, event.like_owner_ids.len());
    }
    Ok(())
}

pub async fn participate(session: &Session, id: i64) -> Result<()> {
    session.require_auth()?;
    let detail = session.app.event_detail();
    detail.load(id).await?;
    applied(detail.toggle_participation().await, "Event", id)?;
    if let Some(event) = detail.state().entity {
        if session.out.is_json() {
            return output::json(&event);
        }
        if event.participated_by_me {
            println!("You are going to event {} ({} going).", id, event.participants_ids.len());
        } else {
            println!("You left event {}.", id);
        }
    }
    Ok(())
}

pub async fn delete(session: &Session, id: i64) -> Result<()> {
    session.require_auth()?;
    session.app.events().remove_by_id(id).await?;
    println!("Event {} deleted.", id);
    Ok(())
}

pub async fn create(session: &Session, args: NewEvent, attach: Option<&Path>) -> Result<()> {
    session.require_auth()?;
    let kind = if args.online { EventType::Online } else { EventType::Offline };
    let mut draft = EventDraft::new(args.content, parse_instant(&args.at)?, kind);
    draft.link = args.link;
    draft.speaker_ids = args.speakers;
    if let Some(path) = attach {
        draft.attachment = Some(LocalFile::read(path).await?);
    }

    let event = session.app.event_composer().submit(&draft).await?;
    if session.out.is_json() {
        return output::json(&event);
    }
    println!("Event {} published for {}.", event.id, event.formatted_datetime());
    Ok(())
}
