#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console_nav_client::{
    FilePreferenceStore, HttpStatusTransport, resolve_base_url, resolve_preferences_path,
};
use console_nav_core::{NavController, Notice, RenderPass, SharedSignals};

#[derive(Parser, Debug)]
#[command(name = "console-nav", about = "Inspect console sidebar navigation")]
struct Args {
    /// Preference file. Defaults to `CONSOLE_PREFERENCES_PATH` or the platform data dir.
    #[arg(long, global = true)]
    preferences: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the route table built from the stored preferences.
    Routes,
    /// Print the menu with visibility classes and link targets.
    Menu,
    /// Mount at a path, optionally click an entry, and print the selection.
    Select {
        path: String,
        #[arg(long)]
        click: Option<String>,
    },
    /// Mount at a path and load `/api/status` into the preference file.
    Status {
        #[arg(long, default_value = "/")]
        path: String,
        /// Backend base URL. Defaults to `CONSOLE_BASE_URL` or the local default.
        #[arg(long)]
        base_url: Option<String>,
        /// Optional request timeout in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let preferences_path = resolve_preferences_path(args.preferences);
    tracing::info!(path = %preferences_path.display(), "using preference file");
    let store = Rc::new(FilePreferenceStore::load(preferences_path));
    let mut nav = NavController::new(Rc::clone(&store), SharedSignals::default());

    match args.command {
        Command::Routes => {
            let _ticket = nav.mount("/");
            let pass = nav.render_pass();
            for (id, path) in pass.routes.iter() {
                println!("{id:<12} {path}");
            }
        }
        Command::Menu => {
            let _ticket = nav.mount("/");
            print_menu(&nav.render_pass());
        }
        Command::Select { path, click } => {
            let _ticket = nav.mount(&path);
            if let Some(id) = click.as_deref() {
                nav.select(id);
            }
            let navigation = nav.navigation();
            println!("selected      {}", navigation.selected_id());
            println!("collapsed     {}", navigation.is_collapsed);
            println!("inner_padding {}", nav.signals().inner_padding.get());
        }
        Command::Status {
            path,
            base_url,
            timeout_ms,
        } => {
            let resolved = resolve_base_url(base_url.as_deref()).context("resolve base url")?;
            tracing::info!(base_url = %resolved.base_url, source = %resolved.source, "loading status");
            let mut transport =
                HttpStatusTransport::new(&resolved.base_url).context("build status transport")?;
            if let Some(timeout_ms) = timeout_ms {
                transport = transport.with_timeout(Duration::from_millis(timeout_ms));
            }

            let outcome = nav.mount_and_load(&path, &transport).await;
            println!("outcome       {outcome:?}");
            println!("collapsed     {}", nav.is_collapsed());
            if let Some(status) = nav.signals().status.get() {
                println!("status_fields {}", status.fields().len());
            }
        }
    }

    print_notices(&nav.drain_notices());
    Ok(())
}

fn print_menu(pass: &RenderPass) {
    for (entry, link) in pass.links() {
        println!(
            "{:<8} {:<10} {:<28} {}",
            entry.id,
            entry.label,
            entry.visibility.css_class(),
            link.unwrap_or("-")
        );
    }
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("[{}] {}", notice.level.as_str(), notice.message);
    }
}
