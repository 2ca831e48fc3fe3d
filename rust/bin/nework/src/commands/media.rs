use std::path::Path;

use anyhow::Result;
use nework_client::LocalFile;

use crate::output;
use crate::session::Session;

pub async fn upload(session: &Session, path: &Path) -> Result<()> {
    session.require_auth()?;
    let file = LocalFile::read(path).await?;
    let Some(kind) = file.attachment_type() else {
        anyhow::bail!("{}: only image, video and audio files can be uploaded.", path.display());
    };
    let media = session.app.media().upload(&file, kind).await?;
    if session.out.is_json() {
        return output::json(&media);
    }
    println!("{}", media.url);
    Ok(())
}
