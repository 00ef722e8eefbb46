//! Photo command handlers.

use tabled::Tabled;

use albumkit_core::{
    CoreError, EntityId, FileVariant, ListParams, Photo, PhotoUpdate, Session,
};

use crate::cli::{GlobalOpts, PhotoFilterArgs, PhotosArgs, PhotosCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PhotoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Fav")]
    favorite: String,
    #[tabled(rename = "Album")]
    album: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Photo> for PhotoRow {
    fn from(p: &Photo) -> Self {
        Self {
            id: p.id.to_string(),
            name: display_name(p).to_owned(),
            tags: p.tags.join(", "),
            favorite: if p.is_favored { "★".into() } else { String::new() },
            album: p.album_id.as_ref().map(ToString::to_string).unwrap_or_default(),
            created: p
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

fn display_name(p: &Photo) -> &str {
    if p.name.is_empty() { &p.original_name } else { &p.name }
}

fn detail(p: &Photo) -> String {
    output::detail_lines(&[
        ("ID", p.id.to_string()),
        ("Name", p.name.clone()),
        ("Original", p.original_name.clone()),
        ("Tags", p.tags.join(", ")),
        ("Favorite", if p.is_favored { "yes" } else { "no" }.into()),
        (
            "Album",
            p.album_id.as_ref().map(ToString::to_string).unwrap_or_default(),
        ),
        (
            "Created",
            p.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ),
    ])
}

fn variant(thumbnail: bool) -> FileVariant {
    if thumbnail {
        FileVariant::Thumbnail
    } else {
        FileVariant::Original
    }
}

/// Apply `filter` to the photo store and print the filtered view.
pub fn render_filtered(session: &Session, filter: PhotoFilterArgs, global: &GlobalOpts) {
    let photos: Vec<Photo> = {
        let mut store = session.photos();
        store.set_filters(util::filter_update(filter));
        store.filtered().into_iter().cloned().collect()
    };
    let out = output::render_list(
        &global.output,
        &photos,
        |p| PhotoRow::from(p),
        |p| p.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: PhotosArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PhotosCommand::List { filter } => {
            session.load_photos(&ListParams::new()).await?;
            render_filtered(session, filter, global);
            Ok(())
        }

        PhotosCommand::Get { photo } => {
            let photo = session.load_photo(&EntityId::from(photo.as_str())).await?;
            let out = output::render_single(&global.output, &photo, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PhotosCommand::Update {
            photo,
            name,
            tags,
            album,
        } => {
            if name.is_none() && tags.is_none() && album.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass --name, --tag, or --album".into(),
                });
            }
            let id = EntityId::from(photo.as_str());
            let update = PhotoUpdate {
                name,
                tags,
                album_id: album.map(EntityId::from),
                ..PhotoUpdate::default()
            };
            session.update_photo(&id, &update).await?;
            if !global.quiet {
                eprintln!("Photo {id} updated");
            }
            Ok(())
        }

        PhotosCommand::Favorite { photo } => {
            let id = EntityId::from(photo.as_str());
            session.load_photo(&id).await?;
            let state = session.toggle_photo_favorite(&id).await;
            let (favored, error) = {
                let store = session.photos();
                (
                    store.get(&id).is_some_and(|p| p.is_favored),
                    store.error().map(ToOwned::to_owned),
                )
            };
            util::toggle_result(state, "photo", &photo, error.as_deref())?;
            if !global.quiet {
                let verb = if favored { "added to" } else { "removed from" };
                eprintln!("Photo {id} {verb} favorites");
            }
            Ok(())
        }

        PhotosCommand::Delete { photos } => {
            let ids: Vec<EntityId> = photos.iter().map(|p| EntityId::from(p.as_str())).collect();
            if !util::confirm(
                &format!("Delete {} photo(s)? This is destructive.", ids.len()),
                "photos delete",
                global.yes,
            )? {
                return Ok(());
            }
            if let [id] = ids.as_slice() {
                session.delete_photo(id).await?;
            } else {
                session.delete_photos(&ids).await?;
            }
            if !global.quiet {
                eprintln!("Deleted {} photo(s)", ids.len());
            }
            Ok(())
        }

        PhotosCommand::Url { photo, thumbnail } => {
            let url = session
                .client()
                .file_url(&EntityId::from(photo.as_str()), variant(thumbnail))
                .map_err(CoreError::from)?;
            output::print_output(url.as_str(), global.quiet);
            Ok(())
        }

        PhotosCommand::Download {
            photo,
            output: path,
            thumbnail,
        } => {
            let bytes = session
                .client()
                .download_file(&EntityId::from(photo.as_str()), variant(thumbnail))
                .await
                .map_err(CoreError::from)?;
            tokio::fs::write(&path, &bytes).await?;
            if !global.quiet {
                eprintln!("Saved {} bytes to {}", bytes.len(), path.display());
            }
            Ok(())
        }
    }
}
