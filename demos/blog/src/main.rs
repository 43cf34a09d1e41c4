//! # viewcraft blog demo
//!
//! Serves a generated list of blog posts at `/posts/` with search,
//! filtering, ordering and pagination.
//!
//! ## Running
//!
//! ```bash
//! cargo run --package blog-example -- serve --addr 127.0.0.1:8000
//! curl -H 'accept: application/json' 'http://127.0.0.1:8000/posts/?ordering=-views&page=2'
//! ```

mod models;
mod settings;
mod views;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use viewcraft_core::logging::setup_logging;
use viewcraft_http::HttpRequest;
use viewcraft_views::{ComponentView, ViewcraftApp};

use settings::load_settings;
use views::post_list_view;

#[derive(Debug, Parser)]
#[command(name = "blog", about = "viewcraft blog demo")]
struct Cli {
    /// Settings file (TOML, or JSON by extension).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of posts to generate.
    #[arg(long, global = true, default_value_t = 45)]
    posts: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: String,
    },
    /// Render one list request and print the context as JSON.
    Render {
        /// Query string, e.g. `page=2&ordering=-views`.
        #[arg(default_value = "")]
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref()).context("loading settings")?;
    setup_logging(&settings);

    let view = post_list_view(&settings, cli.posts).context("building the post list view")?;
    tracing::info!(posts = cli.posts, components = view.components().len(), "blog configured");

    match cli.command {
        Command::Serve { addr } => {
            ViewcraftApp::new(settings).route("/posts/", view).run(&addr).await?;
        }
        Command::Render { query } => render(&view, &query)?,
    }
    Ok(())
}

fn render<S: viewcraft_views::ListSource>(view: &ComponentView<S>, query: &str) -> anyhow::Result<()> {
    let request = HttpRequest::builder().path("/posts/").query_string(query).build();
    let context = view.render(&request)?;
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}
