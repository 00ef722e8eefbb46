//! Tag command handlers.

use tabled::Tabled;

use albumkit_core::{Session, Tag};

use crate::cli::{GlobalOpts, OutputFormat, TagsArgs, TagsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Tag> for TagRow {
    fn from(t: &Tag) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            color: t.color.clone(),
            updated: t
                .updated_at
                .map(|u| u.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Tags sharing one color, in first-seen order.
#[derive(serde::Serialize)]
struct ColorGroup {
    color: String,
    tags: Vec<Tag>,
}

impl ColorGroup {
    fn line(&self) -> String {
        let names: Vec<&str> = self.tags.iter().map(|t| t.name.as_str()).collect();
        format!("{}: {}", self.color, names.join(", "))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: TagsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TagsCommand::List { by_color } => {
            session.load_tags().await?;
            let store = session.tags();

            if by_color {
                let groups: Vec<ColorGroup> = store
                    .by_color()
                    .into_iter()
                    .map(|(color, tags)| ColorGroup {
                        color: color.to_owned(),
                        tags: tags.into_iter().cloned().collect(),
                    })
                    .collect();
                let out = match global.output {
                    OutputFormat::Table | OutputFormat::Plain => groups
                        .iter()
                        .map(ColorGroup::line)
                        .collect::<Vec<_>>()
                        .join("\n"),
                    _ => output::render_single(&global.output, &groups, |_| String::new(), |_| {
                        String::new()
                    }),
                };
                output::print_output(&out, global.quiet);
                return Ok(());
            }

            let tags: Vec<Tag> = store.sorted().into_iter().cloned().collect();
            let out = output::render_list(
                &global.output,
                &tags,
                |t| TagRow::from(t),
                |t| t.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
