use std::path::Path;

use anyhow::Result;
use nework_client::{LocalFile, PostDraft};

use super::applied;
use crate::output;
use crate::session::Session;

pub async fn list(session: &Session, latest: Option<u32>, before: Option<(i64, u32)>) -> Result<()> {
    let repo = session.app.posts();
    let items = match (latest, before) {
        (_, Some((id, count))) => repo.before(id, count).await?,
        (Some(count), None) => repo.latest(count).await?,
        (None, None) => {
            let screen = session.app.posts_screen();
            screen.load().await?;
            screen.feed().snapshot().items().to_vec()
        }
    };
    if session.out.is_json() {
        return output::json(&items);
    }
    output::posts(&items);
    Ok(())
}

pub async fn show(session: &Session, id: i64) -> Result<()> {
    let detail = session.app.post_detail();
    detail.load(id).await?;
    let Some(post) = detail.state().entity else {
        anyhow::bail!("Post {} not found.", id);
    };
    if session.out.is_json() {
        return output::json(&post);
    }
    output::post(&post, &detail.mentioned());
    Ok(())
}

pub async fn like(session: &Session, id: i64) -> Result<()> {
    session.require_auth()?;
    let detail = session.app.post_detail();
    detail.load(id).await?;
    applied(detail.toggle_like().await, "Post", id)?;
    if let Some(post) = detail.state().entity {
        if session.out.is_json() {
            return output::json(&post);
        }
        let verb = if post.liked_by_me { "Liked" } else { "Unliked" };
        println!("{} post {} ({} likes).", verb, id, post.like_owner_ids.len());
    }
    Ok(())
}

pub async fn delete(session: &Session, id: i64) -> Result<()> {
    session.require_auth()?;
    session.app.posts().remove_by_id(id).await?;
    println!("Post {} deleted.", id);
    Ok(())
}

pub async fn create(
    session: &Session,
    content: String,
    link: Option<String>,
    attach: Option<&Path>,
    mention_ids: Vec<i64>,
) -> Result<()> {
    session.require_auth()?;
    let attachment = match attach {
        Some(path) => Some(LocalFile::read(path).await?),
        None => None,
    };
    let draft = PostDraft {
        content,
        link,
        coords: None,
        mention_ids,
        attachment,
    };
    let post = session.app.post_composer().submit(&draft).await?;
    if session.out.is_json() {
        return output::json(&post);
    }
    println!("Post {} published.", post.id);
    Ok(())
}
