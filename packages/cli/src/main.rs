#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for GeoNode resource metadata.
//!
//! ```text
//! geonode_cli flatten --schema schema.json --instance metadata.json [--grouped]
//! geonode_cli ui-schema [--schema schema.json] [--tabs]
//! geonode_cli visual-style --name roads [--workspace geonode]
//! geonode_cli serve
//! ```
//!
//! Output is pretty-printed JSON on stdout.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geonode_metadata::GroupFilter;

#[derive(Parser)]
#[command(name = "geonode_cli", about = "Inspect and publish GeoNode resource metadata")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten a metadata instance against its schema
    Flatten {
        /// Metadata schema document (JSON, `$ref`s allowed)
        #[arg(long)]
        schema: PathBuf,
        /// Metadata values of one resource (JSON object)
        #[arg(long)]
        instance: PathBuf,
        /// Partition the fields into display groups
        #[arg(long)]
        grouped: bool,
        /// Skip fields rendered with the hidden widget (implies --grouped)
        #[arg(long)]
        visible_only: bool,
        /// Only keep fields whose title contains this text (implies --grouped)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print the metadata editor UI schema
    UiSchema {
        /// Merge the `ui:*` hints of this schema over the defaults
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Print the layout sections with their fields instead
        #[arg(long)]
        tabs: bool,
    },
    /// Make a dataset style open in visual mode on GeoServer
    VisualStyle {
        /// Dataset (layer and style) name
        #[arg(long)]
        name: String,
        /// GeoServer workspace of the dataset
        #[arg(long, env = "GEOSERVER_WORKSPACE")]
        workspace: Option<String>,
    },
    /// Start the metadata API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Flatten {
            schema,
            instance,
            grouped,
            visible_only,
            filter,
        } => {
            let filter = (grouped || visible_only || filter.is_some()).then(|| GroupFilter {
                include_hidden: !visible_only,
                text: filter,
            });
            commands::flatten(&schema, &instance, filter.as_ref())?
        }
        Commands::UiSchema { schema, tabs } => commands::ui_schema(schema.as_deref(), tabs)?,
        Commands::VisualStyle { name, workspace } => {
            commands::visual_style(name, workspace).await?
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(geonode_server::run_server())
            })
            .await??;
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
