//! Album command handlers.

use tabled::Tabled;

use albumkit_core::{Album, AlbumUpdate, CreateAlbumRequest, ListParams, Session};

use crate::cli::{AlbumsArgs, AlbumsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{photos, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlbumRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Fav")]
    favorite: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Album> for AlbumRow {
    fn from(a: &Album) -> Self {
        Self {
            id: a.id.to_string(),
            name: a.name.clone(),
            tags: a.tags.join(", "),
            favorite: if a.is_favored { "★".into() } else { String::new() },
            updated: a
                .updated_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

fn detail(a: &Album) -> String {
    output::detail_lines(&[
        ("ID", a.id.to_string()),
        ("Name", a.name.clone()),
        ("Tags", a.tags.join(", ")),
        ("Favorite", if a.is_favored { "yes" } else { "no" }.into()),
        (
            "Updated",
            a.updated_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: AlbumsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AlbumsCommand::List { tags, favorites } => {
            session.load_albums().await?;
            let albums: Vec<Album> = {
                let mut store = session.albums();
                store.set_selected_tags(tags);
                store.set_favorites_only(favorites);
                store.filtered().into_iter().cloned().collect()
            };
            let out = output::render_list(
                &global.output,
                &albums,
                |a| AlbumRow::from(a),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlbumsCommand::Get { album } => {
            let id = util::resolve_album_id(session, &album).await?;
            let album = session.load_album(&id).await?;
            let out = output::render_single(&global.output, &album, detail, |a| a.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlbumsCommand::Create {
            name,
            description,
            tags,
        } => {
            let request = CreateAlbumRequest {
                name,
                description,
                tags,
            };
            let album = session.create_album(&request).await?;
            let out = output::render_single(&global.output, &album, detail, |a| a.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlbumsCommand::Update { album, name, tags } => {
            if name.is_none() && tags.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass --name or --tag".into(),
                });
            }
            let id = util::resolve_album_id(session, &album).await?;
            let update = AlbumUpdate {
                name,
                tags,
                ..AlbumUpdate::default()
            };
            session.update_album(&id, &update).await?;
            if !global.quiet {
                eprintln!("Album {id} updated");
            }
            Ok(())
        }

        AlbumsCommand::Delete { album } => {
            let id = util::resolve_album_id(session, &album).await?;
            if !util::confirm(
                &format!("Delete album '{album}'? This is destructive."),
                "albums delete",
                global.yes,
            )? {
                return Ok(());
            }
            session.delete_album(&id).await?;
            if !global.quiet {
                eprintln!("Album {id} deleted");
            }
            Ok(())
        }

        AlbumsCommand::Favorite { album } => {
            let id = util::resolve_album_id(session, &album).await?;
            let state = session.toggle_album_favorite(&id).await;
            let (favored, error) = {
                let store = session.albums();
                (
                    store.get(&id).is_some_and(|a| a.is_favored),
                    store.error().map(ToOwned::to_owned),
                )
            };
            util::toggle_result(state, "album", &album, error.as_deref())?;
            if !global.quiet {
                let verb = if favored { "added to" } else { "removed from" };
                eprintln!("Album {id} {verb} favorites");
            }
            Ok(())
        }

        AlbumsCommand::Photos { album, filter } => {
            let id = util::resolve_album_id(session, &album).await?;
            session.load_album_photos(&id, &ListParams::new()).await?;
            photos::render_filtered(session, filter, global);
            Ok(())
        }
    }
}
