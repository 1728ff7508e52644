use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use fnt_project::{NewMap, NewResource, ProjectMetaManager, SongInfo};
use fnt_store::{BlobStore, FsBlobStore};
use fnt_types::{ProjectId, ResourceKind};

use crate::cli::*;
use crate::config::CliConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.store, cli.project);

    let store: Arc<dyn BlobStore> = Arc::new(
        FsBlobStore::open(&config.store_root)
            .await
            .with_context(|| format!("opening store {}", config.store_root.display()))?,
    );
    let project = ProjectId(config.project_id);

    match cli.command {
        Command::Init(args) => cmd_init(args, project, store).await,
        Command::AddMap(args) => cmd_add_map(args, project, store).await,
        Command::AddResource(args) => cmd_add_resource(args, project, store).await,
        Command::Show(args) => cmd_show(args, project, store).await,
        Command::Check(_) => cmd_check(project, store).await,
        Command::Drop(args) => cmd_drop(args, project, store).await,
    }
}

async fn load(project: ProjectId, store: Arc<dyn BlobStore>) -> anyhow::Result<ProjectMetaManager> {
    ProjectMetaManager::load(project, store)
        .await
        .with_context(|| format!("loading {project}"))
}

async fn cmd_init(args: InitArgs, project: ProjectId, store: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    if store.get_meta_blob(project).await?.is_some() {
        bail!("{project} already exists");
    }
    let info = SongInfo {
        name: args.name,
        song_name: args.song_name,
        song_name_romanized: args.song_name_romanized,
        artist: args.artist,
        artist_romanized: args.artist_romanized,
    };
    let manager = ProjectMetaManager::create(project, info, store).await?;
    println!("{} Created {} {}", "✓".green().bold(), project.to_string().bold(), manager.info().name.yellow());
    println!("  Meta: {}", manager.meta_id().to_string().cyan());
    Ok(())
}

async fn cmd_add_map(args: AddMapArgs, project: ProjectId, store: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    let mut manager = load(project, store).await?;
    let id = manager
        .add_map(NewMap {
            map_type: args.map_type,
            difficulty: args.difficulty,
            level: args.level,
            music: args.music,
            bg: args.bg,
            color: args.color,
        })
        .await?;
    manager.save().await?;
    let name = manager.resources().find(&id).map(|r| r.name).unwrap_or_default();
    println!("{} Added map {} ({})", "✓".green().bold(), name.yellow(), id.to_string().cyan());
    Ok(())
}

async fn cmd_add_resource(args: AddResourceArgs, project: ProjectId, store: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    let payload = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("reading {}", args.path.display()))?;
    let name = match args.name {
        Some(name) => name,
        None => args
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("path has no file name; pass --name")?,
    };

    let mut manager = load(project, store).await?;
    let size = payload.len();
    let id = manager
        .add_resource(NewResource {
            name: name.clone(),
            kind: args.kind,
            payload,
        })
        .await?;
    manager.save().await?;
    println!("{} Added {} {} ({} bytes, {})", "✓".green().bold(), args.kind, name.yellow(), size, id.to_string().cyan());
    Ok(())
}

async fn cmd_show(args: ShowArgs, project: ProjectId, store: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    let manager = load(project, store).await?;
    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&manager.to_document())?);
        }
        OutputFormat::Text => {
            let info = manager.info();
            println!("{} {}", project.to_string().bold(), info.name.yellow().bold());
            println!("  Song: {} ({})", info.song_name, info.song_name_romanized.dimmed());
            println!("  Artist: {} ({})", info.artist, info.artist_romanized.dimmed());
            println!("  Identifiers allocated: {}", manager.allocator().len());
            for kind in ResourceKind::ALL {
                let records: Vec<_> = manager.resources().iter().filter(|r| r.kind == *kind).collect();
                if records.is_empty() {
                    continue;
                }
                println!("\n{}:", kind.to_string().bold());
                for record in records {
                    println!("  {}  {}", record.id.short_id().dimmed(), record.name);
                }
            }
            for map in manager.resources().maps() {
                println!(
                    "\n{} {} Lv.{} [{}, {}] offset {}ms",
                    map.name.yellow(),
                    map.difficulty,
                    map.level,
                    map.map_type,
                    map.color,
                    map.offset
                );
                println!("  music {}  bg {}  scripts {}", map.music.short_id(), map.bg.short_id(), map.scripts.len());
            }
        }
    }
    Ok(())
}

async fn cmd_check(project: ProjectId, store: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    let manager = load(project, store).await?;
    let report = manager.validate();
    if report.is_valid() {
        println!("{} {} resources, no issues.", "✓".green().bold(), report.resource_count);
        return Ok(());
    }
    for violation in &report.violations {
        println!("{} {:?} {}: {}", "✗".red().bold(), violation.kind, violation.id.short_id().dimmed(), violation.description);
    }
    bail!("{} issue(s) found in {}", report.violations.len(), project)
}

async fn cmd_drop(args: DropArgs, project: ProjectId, store: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    if !args.yes {
        bail!("refusing to delete {project} without --yes");
    }
    let removed = store.delete_all_blobs(project).await?;
    println!("{} Deleted {} blob(s) of {}", "✓".green().bold(), removed, project);
    Ok(())
}
