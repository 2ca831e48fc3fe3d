use anyhow::Result;
use serde_json::json;

use crate::output;
use crate::session::Session;

pub async fn list(session: &Session) -> Result<()> {
    let screen = session.app.users_screen();
    screen.load().await?;
    let snapshot = screen.feed().snapshot();
    if session.out.is_json() {
        return output::json(snapshot.items());
    }
    output::users(snapshot.items());
    Ok(())
}

pub async fn show(session: &Session, id: i64) -> Result<()> {
    let profile = session.app.profile();
    profile.load(id).await?;
    let Some(user) = profile.state().entity else {
        anyhow::bail!("User {} not found.", id);
    };
    if session.out.is_json() {
        return output::json(&user);
    }
    output::user(&user);
    Ok(())
}

/// Profile header, last job and the user's posts.
pub async fn wall(session: &Session, user_id: i64) -> Result<()> {
    let wall = session.app.wall_screen(user_id);
    wall.load().await?;
    let snapshot = wall.feed().snapshot();

    if session.out.is_json() {
        return output::json(&json!({
            "user": wall.user(),
            "lastJob": wall.last_job(),
            "posts": snapshot.items(),
        }));
    }
    match wall.user() {
        Some(user) => output::user(&user),
        None => println!("User {}", user_id),
    }
    if let Some(job) = wall.last_job() {
        println!("  Job:    {}", job);
    }
    println!();
    output::posts(snapshot.items());
    Ok(())
}
