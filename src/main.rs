mod cli;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands, DefaultAction};
use donetick::config::CoreConfig;
use donetick::nlp::{EnglishDateRecognizer, Label, SentenceParser};
use donetick::notify::{
    self, FileStore, NotificationTemplate, load_default_template, save_default_template,
};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    // Dropping the guard flushes the file writer, keep it for the whole run
    let _guard = init_logging(&config, cli.verbose)?;

    match cli.command {
        Commands::Parse {
            sentence,
            labels,
            now,
            day_first,
        } => {
            let labels: Vec<Label> = labels
                .into_iter()
                .enumerate()
                .map(|(i, name)| Label::new(i as i64 + 1, name))
                .collect();
            let recognizer = if day_first {
                EnglishDateRecognizer::day_first()
            } else {
                EnglishDateRecognizer::default()
            };
            let parser = SentenceParser::new(config.parser.clone());
            let result = parser.parse(&sentence, &labels, now.unwrap_or_else(Utc::now), &recognizer);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Timeline { offsets } => {
            let max = offsets.len().max(config.notifications.max_notifications);
            print_timeline(&NotificationTemplate::new(offsets, max));
        }

        Commands::Plan {
            name,
            due,
            now,
            offsets,
        } => {
            let template = if offsets.is_empty() {
                load_default_template(&store(&config), config.notifications.max_notifications)?
            } else {
                NotificationTemplate::try_new(offsets, config.notifications.max_notifications)?
            };
            let planned = notify::plan(&name, due, now.unwrap_or_else(Utc::now), &template);
            if planned.is_empty() {
                println!("Nothing left to notify.");
            }
            for n in planned {
                println!("{}  {}  {}", n.fire_at.to_rfc3339(), n.title, n.body);
            }
        }

        Commands::Default { action } => {
            let mut store = store(&config);
            let max = config.notifications.max_notifications;
            let current = load_default_template(&store, max)?;
            let updated = match action {
                DefaultAction::Show => {
                    print_timeline(&current);
                    return Ok(());
                }
                DefaultAction::Set { offsets } => NotificationTemplate::try_new(offsets, max)?,
                DefaultAction::Add { kind } => current.add_smart(kind)?,
                DefaultAction::Rm { index } => current.remove(index)?,
            };
            save_default_template(&mut store, &updated)?;
            print_timeline(&updated);
        }
    }

    Ok(())
}

fn store(config: &CoreConfig) -> FileStore {
    FileStore::new(config.state_dir())
}

fn print_timeline(template: &NotificationTemplate) {
    for entry in template.timeline() {
        println!(
            "[{}] #{} {:>6} {:>5.1}%  {}",
            entry.index,
            entry.rank,
            entry.offset.to_string(),
            entry.position,
            entry.offset.relative_label()
        );
    }
}

fn init_logging(config: &CoreConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let level = if verbose {
        Level::DEBUG
    } else {
        config
            .log_level
            .parse::<Level>()
            .context(format!("Invalid log level: {}", config.log_level))?
    };

    let Some(path) = &config.log_file else {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .context(format!("Log file has no file name: {:?}", path))?;
    std::fs::create_dir_all(dir).context(format!("Failed to create log directory {:?}", dir))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}
