//! Table and JSON rendering.

use anyhow::Result;
use clap::ValueEnum;
use nework_core::{Event, EventType, Job, Post, User};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Table,
    Json,
}

impl Output {
    pub fn is_json(self) -> bool {
        self == Output::Json
    }
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Cut to `max` characters on one line.
fn clip(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max || text.lines().nth(1).is_some() {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

fn marker(on: bool) -> &'static str {
    if on { "*" } else { " " }
}

pub fn posts(items: &[Post]) {
    if items.is_empty() {
        println!("No posts yet.");
        return;
    }
    println!("{:2} {:6} {:20} {:16} {:>5} {}", "", "ID", "AUTHOR", "PUBLISHED", "LIKES", "CONTENT");
    for p in items {
        println!(
            "{:2} {:<6} {:20} {:16} {:>5} {}",
            marker(p.liked_by_me),
            p.id,
            clip(&p.author, 20),
            p.formatted_published(),
            p.like_owner_ids.len(),
            clip(&p.content, 50),
        );
    }
}

pub fn post(p: &Post, mentioned: &[User]) {
    println!("Post {} by {} ({})", p.id, p.author, p.formatted_published());
    if let Some(job) = &p.author_job {
        println!("  Job:      {}", job);
    }
    println!("  Likes:    {}{}", p.like_owner_ids.len(), if p.liked_by_me { " (you)" } else { "" });
    if let Some(link) = &p.link {
        println!("  Link:     {}", link);
    }
    if let Some(coords) = &p.coords {
        println!("  Location: {}", coords);
    }
    if let Some(att) = &p.attachment {
        println!("  Media:    {:?} {}", att.kind, att.url);
    }
    if !mentioned.is_empty() {
        let names: Vec<&str> = mentioned.iter().map(|u| u.name.as_str()).collect();
        println!("  Mentions: {}", names.join(", "));
    }
    println!();
    println!("{}", p.content);
}

fn kind(k: EventType) -> &'static str {
    match k {
        EventType::Online => "online",
        EventType::Offline => "offline",
    }
}

pub fn events(items: &[Event]) {
    if items.is_empty() {
        println!("No events yet.");
        return;
    }
    println!(
        "{:2} {:6} {:20} {:16} {:8} {:>5} {}",
        "", "ID", "AUTHOR", "STARTS", "TYPE", "GOING", "CONTENT"
    );
    for e in items {
        println!(
            "{:2} {:<6} {:20} {:16} {:8} {:>5} {}",
            marker(e.participated_by_me),
            e.id,
            clip(&e.author, 20),
            e.formatted_datetime(),
            kind(e.kind),
            e.participants_ids.len(),
            clip(&e.content, 40),
        );
    }
}

pub fn event(e: &Event, speakers: &[User], participants: &[User]) {
    println!("Event {} by {} ({})", e.id, e.author, kind(e.kind));
    println!("  Starts:   {}", e.formatted_datetime());
    println!("  Likes:    {}{}", e.like_owner_ids.len(), if e.liked_by_me { " (you)" } else { "" });
    println!(
        "  Going:    {}{}",
        e.participants_ids.len(),
        if e.participated_by_me { " (you)" } else { "" }
    );
    if let Some(link) = &e.link {
        println!("  Link:     {}", link);
    }
    if let Some(coords) = &e.coords {
        println!("  Location: {}", coords);
    }
    for (label, people) in [("Speakers", speakers), ("People", participants)] {
        if !people.is_empty() {
            let names: Vec<&str> = people.iter().map(|u| u.name.as_str()).collect();
            println!("  {:9} {}", format!("{}:", label), names.join(", "));
        }
    }
    println!();
    println!("{}", e.content);
}

pub fn users(items: &[User]) {
    if items.is_empty() {
        println!("No users.");
        return;
    }
    println!("{:6} {:20} {}", "ID", "LOGIN", "NAME");
    for u in items {
        println!("{:<6} {:20} {}", u.id, clip(&u.login, 20), u.name);
    }
}

pub fn user(u: &User) {
    println!("{} (@{}, id {})", u.name, u.login, u.id);
    if let Some(avatar) = &u.avatar {
        println!("  Avatar: {}", avatar);
    }
}

pub fn jobs(items: &[Job]) {
    if items.is_empty() {
        println!("No jobs.");
        return;
    }
    println!("{:6} {:24} {:20} {:16} {:16}", "ID", "COMPANY", "POSITION", "START", "FINISH");
    for j in items {
        let finish = j.finish.as_deref().map(nework_core::format_instant);
        println!(
            "{:<6} {:24} {:20} {:16} {:16}",
            j.id,
            clip(&j.name, 24),
            clip(&j.position, 20),
            nework_core::format_instant(&j.start),
            finish.as_deref().unwrap_or("-"),
        );
    }
}
