use anyhow::Result;
use clap::Parser;

use modtag::{config, ui, Tagger};

#[derive(clap::Parser)]
#[command(
    name = "modtag",
    about = "Compute and apply semantic-version tags from conventional commits"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Version prefix for tags (overrides configuration)")]
    prefix: Option<String>,

    #[arg(long, help = "Keep 0.x modules at 0.x on breaking changes")]
    pre_major: bool,

    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Print next tags for these module import paths"
    )]
    modules: Vec<String>,

    #[arg(long, help = "Print next tags for every module")]
    all: bool,

    #[arg(long, help = "Create tags when HEAD is a release commit")]
    tag: bool,

    #[arg(long, help = "Push created tags (implies --tag)")]
    push: bool,

    #[arg(long, help = "Remote that receives pushed tags")]
    remote: Option<String>,

    #[arg(default_value = ".", help = "Repository path")]
    path: String,
}

fn main() {
    if let Err(e) = run(Args::parse()) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(prefix) = args.prefix {
        config.version_prefix = prefix;
    }
    if args.pre_major {
        config.pre_major = true;
    }
    if args.tag || args.push {
        config.create_tag = true;
    }
    if args.push {
        config.push = true;
    }
    if let Some(remote) = args.remote {
        config.remote = remote;
    }

    let mut tagger = Tagger::open(&args.path)?;
    tagger.config = config;

    if !args.modules.is_empty() || args.all {
        for tag in tagger.module_versions(&args.modules)? {
            println!("{}", tag);
        }
        return Ok(());
    }

    if tagger.config.create_tag {
        ui::display_status("tagging repository");
        for tag in tagger.tag_repo()? {
            println!("{}", tag);
        }
        if tagger.config.push {
            ui::display_success(&format!("pushed tags to '{}'", tagger.config.remote));
        }
        return Ok(());
    }

    println!("{}", tagger.version()?);
    Ok(())
}
