use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use relative_path::RelativePath;
use wikimark_config::Config;
use wikimark_engine::editing::fix_eol;
use wikimark_engine::io::{self, PAGE_EXTENSION};
use wikimark_engine::{Chunk, Command, Flavor, MacroRegistry, WikiEngine, apply, parse};

#[derive(Parser)]
#[command(name = "wikimark", version, about = "Wiki markup renderer and editing commands")]
struct Cli {
    /// Config file to use instead of ~/.config/wikimark/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    flavor: FlavorArgs,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Args)]
struct FlavorArgs {
    /// Parse Markdown regardless of the configured flavor
    #[arg(long, global = true, conflicts_with = "creole")]
    markdown: bool,

    /// Parse Creole regardless of the configured flavor
    #[arg(long, global = true)]
    creole: bool,
}

impl FlavorArgs {
    fn flavor(&self) -> Option<Flavor> {
        match (self.markdown, self.creole) {
            (true, _) => Some(Flavor::Markdown),
            (_, true) => Some(Flavor::Creole),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
enum CliCommand {
    /// Render a page file, or a page name under the configured pages
    /// directory, to HTML
    Render { page: String },

    /// Print the document tree, one node per line
    Tree { page: String },

    /// List the pages in the configured pages directory
    Pages,

    /// Apply a toolbar command to a byte range of a file and print the result
    Edit(EditArgs),
}

#[derive(Args)]
struct EditArgs {
    command: EditCommand,
    file: PathBuf,
    start: usize,
    end: usize,

    /// Link or image target; without it link and image only remove markup
    #[arg(long)]
    url: Option<String>,

    /// Write the result back to the file instead of printing it
    #[arg(long)]
    write: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum EditCommand {
    Bold,
    Italic,
    Link,
    Image,
    Quote,
    Code,
    Olist,
    Ulist,
    Heading,
    Hr,
    Autoindent,
}

impl EditCommand {
    fn into_command(self, url: Option<String>) -> Command {
        match self {
            EditCommand::Bold => Command::Bold,
            EditCommand::Italic => Command::Italic,
            EditCommand::Link => Command::Link { url },
            EditCommand::Image => Command::Image { url },
            EditCommand::Quote => Command::Blockquote,
            EditCommand::Code => Command::Code,
            EditCommand::Olist => Command::OrderedList,
            EditCommand::Ulist => Command::UnorderedList,
            EditCommand::Heading => Command::Heading,
            EditCommand::Hr => Command::HorizontalRule,
            EditCommand::Autoindent => Command::Autoindent,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(flavor) = cli.flavor.flavor() {
        config.flavor = flavor;
    }

    match cli.command {
        CliCommand::Render { page } => {
            let source = read_source(&page, &config)?;
            let engine = WikiEngine::new(config.parse_options(), MacroRegistry::with_builtins());
            println!("{}", engine.render(&source));
        }
        CliCommand::Tree { page } => {
            let source = read_source(&page, &config)?;
            print!("{}", parse(&source, &config.parse_options()).outline());
        }
        CliCommand::Pages => {
            let root = pages_root(&config)?;
            for name in io::list_pages(root)? {
                println!("{name}");
            }
        }
        CliCommand::Edit(args) => edit(args, &config)?,
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.map_or_else(Config::config_path, Path::to_path_buf);
    log::debug!("Config path: {}", path.display());
    Ok(Config::load_from_path(&path)?.unwrap_or_default())
}

fn pages_root(config: &Config) -> Result<&Path> {
    match &config.pages_path {
        Some(path) => Ok(path.as_path()),
        None => bail!(
            "no pages_path configured; set it in {}",
            Config::config_path().display()
        ),
    }
}

/// Reads `page` as a file path if one exists, otherwise as a page name
/// under the configured pages directory.
fn read_source(page: &str, config: &Config) -> Result<String> {
    let as_file = Path::new(page);
    let text = if as_file.is_file() {
        std::fs::read_to_string(as_file).with_context(|| format!("reading {page}"))?
    } else {
        let root = pages_root(config)
            .with_context(|| format!("{page} is not a file"))?;
        let relative = RelativePath::new(page).normalize().with_extension(PAGE_EXTENSION);
        log::info!("Reading page {relative} from {}", root.display());
        io::read_page(&relative, root)?
    };
    Ok(fix_eol(&text))
}

fn edit(args: EditArgs, config: &Config) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let mut chunk = Chunk::new(&text, args.start, args.end, 0)?;
    let command = args.command.into_command(args.url);
    apply(&command, &mut chunk, &config.editor_options());
    let state = chunk.into_state();

    if args.write {
        std::fs::write(&args.file, &state.text)
            .with_context(|| format!("writing {}", args.file.display()))?;
    } else {
        print!("{}", state.text);
    }
    eprintln!("selection: {}..{}", state.selection.start, state.selection.end);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flavor_flags_override_config() {
        let cli = Cli::parse_from(["wikimark", "--markdown", "tree", "x"]);
        assert_eq!(cli.flavor.flavor(), Some(Flavor::Markdown));
        let cli = Cli::parse_from(["wikimark", "tree", "x"]);
        assert_eq!(cli.flavor.flavor(), None);
        assert!(Cli::try_parse_from(["wikimark", "--markdown", "--creole", "tree", "x"]).is_err());
    }

    #[test]
    fn edit_arguments_parse() {
        let cli = Cli::parse_from([
            "wikimark", "edit", "link", "page.txt", "3", "7", "--url", "x.org",
        ]);
        let CliCommand::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!((args.start, args.end), (3, 7));
        assert_eq!(
            args.command.into_command(args.url),
            Command::Link {
                url: Some("x.org".into())
            }
        );
    }

    #[test]
    fn page_names_read_from_pages_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("Projects")).unwrap();
        std::fs::write(dir.path().join("Projects/Wiki.txt"), "= Wiki =\r\n").unwrap();
        let config = Config {
            pages_path: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        assert_eq!(read_source("Projects/Wiki", &config).unwrap(), "= Wiki =\n");
    }

    #[test]
    fn unknown_page_without_pages_dir_is_an_error() {
        let err = read_source("NoSuchPage", &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains("no pages_path configured"));
    }

    #[test]
    fn edit_writes_back() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.txt");
        std::fs::write(&file, "a word here").unwrap();
        let args = EditArgs {
            command: EditCommand::Bold,
            file: file.clone(),
            start: 2,
            end: 6,
            url: None,
            write: true,
        };
        edit(args, &Config::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "a **word** here");
    }
}
