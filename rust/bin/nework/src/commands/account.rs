//! Session commands: login, register, logout, whoami.

use std::path::Path;

use anyhow::Result;
use nework_client::{LocalFile, SignUpDraft};

use crate::output;
use crate::session::Session;

pub async fn login(session: &Session, login: &str, password: &str) -> Result<()> {
    session.app.sign_in_form().submit(login, password).await?;
    let state = session.app.auth().state();
    println!("Signed in as {} (id {}).", login.trim(), state.id);
    Ok(())
}

pub async fn register(
    session: &Session,
    login: String,
    name: String,
    pass: String,
    confirm: Option<String>,
    avatar: Option<&Path>,
) -> Result<()> {
    let avatar = match avatar {
        Some(path) => Some(LocalFile::read(path).await?),
        None => None,
    };
    let draft = SignUpDraft {
        login,
        name,
        pass,
        confirm,
        avatar,
    };
    session.app.sign_up_form().submit(&draft).await?;
    println!("Account {} created, id {}.", draft.login.trim(), session.app.auth().subject_id());
    Ok(())
}

pub fn logout(session: &Session) {
    if !session.app.auth().state().is_authenticated() {
        println!("Not signed in.");
        return;
    }
    session.app.auth().sign_out();
    println!("Signed out.");
}

pub async fn whoami(session: &Session) -> Result<()> {
    let state = session.app.auth().state();
    if !state.is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    let profile = session.app.profile();
    profile.load(state.id).await?;
    match profile.state().entity {
        Some(user) if session.out.is_json() => output::json(&user)?,
        Some(user) => output::user(&user),
        None => println!("Signed in as user {}.", state.id),
    }
    Ok(())
}
