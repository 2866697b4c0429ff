use anyhow::Context;
use clap::Parser;
use indentmask::config::Settings;
use indentmask::file;
use indentmask::tab_size::InferenceScope;
use indentmask::terminal::TerminalHost;
use indentmask::{DocumentId, EditorId, EditorOptions, IndentController, TextDocument, VisibleEditor};
use std::io::{stderr, stdout, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "indentmask",
    about = "Print a file with its indentation drawn as fixed-width markers",
    version
)]
struct Cli {
    /// File to render
    file: PathBuf,

    /// Settings file (VS Code style flat JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Language identifier; derived from the file extension when omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Tab size; inferred from the file's leading spaces when omitted
    #[arg(short, long)]
    tab_size: Option<usize>,

    /// Infer the tab size from every line instead of the first 50
    #[arg(long)]
    infer_whole_document: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "indentmask=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(stderr))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let text = file::load(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    let detected = file::language_id(&cli.file).unwrap_or("plaintext");
    let mut document = TextDocument::new(DocumentId(0), detected, &text);
    if let Some(language) = &cli.language {
        document.set_language_id(language.as_str());
    }

    let scope = if cli.infer_whole_document {
        InferenceScope::WholeDocument
    } else {
        InferenceScope::default()
    };
    let host = &mut TerminalHost::new(settings.colors.clone());
    let mut controller = IndentController::with_scope(scope);
    controller.update_configuration(host, &settings);

    let editor = VisibleEditor::new(
        EditorId(0),
        &document,
        EditorOptions {
            tab_size: cli.tab_size,
        },
    );
    let update = controller.update_editor(host, &editor)?;
    tracing::debug!(?update, "rendering {}", cli.file.display());

    let errors = &mut stderr();
    for notification in host.take_notifications() {
        writeln!(errors, "{}", notification)?;
    }
    host.render(&mut stdout(), editor.id, &document)?;
    controller.dispose(host);

    Ok(())
}
