//! Config subcommand handlers.

use std::path::PathBuf;

use albumkit_config::{self as config, Settings};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

fn resolved_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config::config_path)
}

fn detail(settings: &Settings) -> String {
    let url = settings
        .server
        .url()
        .map_or_else(|e| format!("<{e}>"), |u| u.to_string());
    let mode = if settings.server.use_proxy { "proxy" } else { "direct" };
    output::detail_lines(&[
        ("Server URL", url),
        ("Mode", mode.into()),
        ("Timeout", format!("{} ms", settings.upload.timeout)),
        ("Max file size", format!("{} bytes", settings.upload.max_file_size)),
        ("Formats", settings.upload.formats().join(", ")),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = resolved_path(global);

    match args.command {
        ConfigCommand::Show => {
            let settings = config::load_settings_from(&path)?;
            settings.validate()?;
            let out = output::render_single(&global.output, &settings, detail, |s| {
                s.server.url().map(|u| u.to_string()).unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            host,
            port,
            protocol,
            use_proxy,
            force,
        } => {
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("{} already exists; pass --force to overwrite", path.display()),
                });
            }

            let mut settings = Settings::default();
            settings.server.host = host;
            settings.server.port = port;
            settings.server.protocol = protocol;
            settings.server.use_proxy = use_proxy;
            settings.validate()?;

            config::save_settings_to(&settings, &path)?;
            if !global.quiet {
                eprintln!("Config written to {}", path.display());
            }
            Ok(())
        }
    }
}
