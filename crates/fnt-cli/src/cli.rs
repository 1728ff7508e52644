use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fnt_types::{DiffColor, MapType, MediaKind, ResourceId};

#[derive(Parser)]
#[command(
    name = "fnt",
    about = "Fannithm — manage chart project resources and metadata",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./fnt.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Blob store directory, overriding the config file
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Project id, overriding the config file
    #[arg(short, long, global = true)]
    pub project: Option<u64>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new project with its metadata document
    Init(InitArgs),
    /// Add a chart to the project
    AddMap(AddMapArgs),
    /// Add an audio, image or video file to the project
    AddResource(AddResourceArgs),
    /// Show the project metadata
    Show(ShowArgs),
    /// Check the metadata for dangling references and broken invariants
    Check(CheckArgs),
    /// Delete every blob of the project
    Drop(DropArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Project title
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub song_name: String,
    #[arg(long, default_value = "")]
    pub song_name_romanized: String,
    #[arg(long)]
    pub artist: String,
    #[arg(long, default_value = "")]
    pub artist_romanized: String,
}

#[derive(Args)]
pub struct AddMapArgs {
    /// Difficulty label; the chart filename is derived from it
    #[arg(long)]
    pub difficulty: String,
    #[arg(long)]
    pub level: i64,
    #[arg(long, default_value = "fannithm")]
    pub map_type: MapType,
    /// Id of the audio resource
    #[arg(long)]
    pub music: ResourceId,
    /// Id of the background image resource
    #[arg(long)]
    pub bg: ResourceId,
    #[arg(long, default_value = "normal")]
    pub color: DiffColor,
}

#[derive(Args)]
pub struct AddResourceArgs {
    pub path: PathBuf,
    #[arg(long)]
    pub kind: MediaKind,
    /// Resource name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct CheckArgs {}

#[derive(Args)]
pub struct DropArgs {
    /// Required to actually delete
    #[arg(long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_map() {
        let music = ResourceId::random();
        let bg = ResourceId::random();
        let cli = Cli::try_parse_from([
            "fnt",
            "--project",
            "4",
            "add-map",
            "--difficulty",
            "Expert",
            "--level",
            "27",
            "--music",
            &music.to_string(),
            "--bg",
            &bg.to_string(),
            "--color",
            "expert",
        ])
        .unwrap();

        assert_eq!(cli.project, Some(4));
        let Command::AddMap(args) = cli.command else {
            panic!("expected add-map");
        };
        assert_eq!(args.difficulty, "Expert");
        assert_eq!(args.level, 27);
        assert_eq!(args.map_type, MapType::Fannithm);
        assert_eq!(args.music, music);
        assert_eq!(args.bg, bg);
        assert_eq!(args.color, DiffColor::Expert);
    }

    #[test]
    fn rejects_non_media_kind() {
        let result = Cli::try_parse_from(["fnt", "add-resource", "a.json", "--kind", "map"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_resource_id() {
        let result = Cli::try_parse_from([
            "fnt", "add-map", "--difficulty", "Easy", "--level", "1", "--music", "nope", "--bg",
            "nope",
        ]);
        assert!(result.is_err());
    }
}
