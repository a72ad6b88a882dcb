//! Shroud admin CLI: migrations, hides and suspensions from the shell.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shroud_common::Config;
use shroud_core::{
    ModerationService, ModuleAvailability, QueryFilterRegistry, SuspendArgs, SuspendService,
};
use shroud_db::entities::{ContentType, HideSource};
use shroud_db::repositories::UserRepository;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shroud")]
#[command(about = "Hide and suspend site content")]
struct Cli {
    /// Configuration file; defaults to `config/` plus `SHROUD_*` variables.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending database migrations
    Migrate,

    /// Suspend an item and everything related to it
    Hide {
        content_type: ContentType,
        item_id: i64,
        /// Viewer the hide is recorded for
        #[arg(long)]
        user: Option<i64>,
        /// Hide from every viewer even when recorded for a user
        #[arg(long)]
        sitewide: bool,
    },

    /// Lift a suspension and everything it cascaded into
    Unhide {
        content_type: ContentType,
        item_id: i64,
        #[arg(long)]
        user: Option<i64>,
        /// Remove every record of each item, whoever recorded it
        #[arg(long)]
        force_all: bool,
    },

    /// Hide an item from every viewer as a moderator
    Moderate { content_type: ContentType, item_id: i64 },

    /// Undo a moderator hide
    Unmoderate { content_type: ContentType, item_id: i64 },

    /// Block a member for one viewer
    Block { viewer: i64, member: i64 },

    /// Remove a block
    Unblock { viewer: i64, member: i64 },

    /// Suspend a member and everything they created
    SuspendMember { member: i64 },

    /// Lift a member's suspension
    UnsuspendMember { member: i64 },

    /// Print the IDs hidden for a viewer (anonymous when omitted)
    HiddenIds {
        content_type: ContentType,
        #[arg(long, default_value = "moderation")]
        source: HideSource,
        #[arg(long)]
        viewer: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shroud=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let db = shroud_db::init(&config).await?;
    info!("Connected to database");

    if matches!(cli.command, Commands::Migrate) {
        info!("Running database migrations...");
        shroud_db::migrate(&db).await?;
        info!("Migrations completed");
        return Ok(());
    }

    let db = Arc::new(db);
    let registry = Arc::new(QueryFilterRegistry::with_defaults(
        db.clone(),
        ModuleAvailability::from(config.modules),
    ));
    let users = UserRepository::new(db);
    let moderation = ModerationService::new(registry.clone(), users.clone());
    let suspend = SuspendService::new(registry.clone(), users);

    match cli.command {
        Commands::Migrate => {}
        Commands::Hide {
            content_type,
            item_id,
            user,
            sitewide,
        } => {
            let args = user.map_or_else(SuspendArgs::default, SuspendArgs::by_user);
            suspend
                .hide(content_type, item_id, sitewide.then_some(true), args)
                .await?;
        }
        Commands::Unhide {
            content_type,
            item_id,
            user,
            force_all,
        } => {
            let args = user.map_or_else(SuspendArgs::default, SuspendArgs::by_user);
            suspend
                .unhide(content_type, item_id, None, force_all, args)
                .await?;
        }
        Commands::Moderate {
            content_type,
            item_id,
        } => {
            moderation.hide_item(content_type, item_id).await?;
        }
        Commands::Unmoderate {
            content_type,
            item_id,
        } => {
            if !moderation.unhide_item(content_type, item_id).await? {
                info!(%content_type, item_id, "Item was not hidden");
            }
        }
        Commands::Block { viewer, member } => {
            moderation.block_member(viewer, member).await?;
        }
        Commands::Unblock { viewer, member } => {
            if !moderation.unblock_member(viewer, member).await? {
                info!(viewer, member, "Member was not blocked");
            }
        }
        Commands::SuspendMember { member } => suspend.suspend_member(member).await?,
        Commands::UnsuspendMember { member } => suspend.unsuspend_member(member).await?,
        Commands::HiddenIds {
            content_type,
            source,
            viewer,
        } => {
            let ids = registry.hidden_ids(source, content_type, viewer).await;
            println!("{}", serde_json::to_string(&ids)?);
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_content_type_aliases() {
        let cli = Cli::try_parse_from(["shroud", "hide", "group", "42", "--user", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Hide {
                content_type: ContentType::Group,
                item_id: 42,
                user: Some(3),
                sitewide: false,
            }
        ));
    }

    #[test]
    fn test_hidden_ids_defaults_to_moderation() {
        let cli = Cli::try_parse_from(["shroud", "hidden-ids", "topic"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::HiddenIds {
                content_type: ContentType::Topic,
                source: HideSource::Moderation,
                viewer: None,
            }
        ));
    }
}
