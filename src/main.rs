mod args;
mod downloader;
mod errors;
mod utils;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, error::ErrorKind};
use std::io;
use tracing::warn;

use args::Args;
use downloader::{
    batch::{BatchOptions, Mode, run_batch},
    ytdlp::YtDlp,
};
use utils::{
    dependencies::check_dependencies,
    display::{Indicators, print_platforms},
    file::read_batch_file,
    logging::init_tracing,
    settings::Settings,
};

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.platforms {
        print_platforms(&mut io::stdout().lock())?;
        return Ok(());
    }

    let mut urls = args.urls.clone();
    if let Some(batch_file) = &args.batch_file {
        let from_file = read_batch_file(batch_file)
            .with_context(|| format!("Failed to read batch file: {:?}", batch_file))?;
        urls.extend(from_file);
    }

    if urls.is_empty() {
        Args::command()
            .error(ErrorKind::MissingRequiredArgument, "no URLs to download")
            .exit();
    }

    let mut settings = Settings::load().unwrap_or_else(|err| {
        warn!("{:#}; using default settings", err);
        Settings::default()
    });
    if let Some(dir) = &args.download_dir {
        settings.output_dir = dir.clone();
    }

    if let Err(missing) = check_dependencies(&args.ytdlp) {
        for message in missing {
            warn!("{}", message);
        }
    }

    let options = BatchOptions {
        output_dir: settings.output_dir.clone(),
        mode: if args.list_formats {
            Mode::ListFormats
        } else {
            Mode::Download
        },
        show_info: args.info,
        indicators: Indicators::new(settings.use_ascii_indicators),
    };
    let ytdlp = YtDlp::new(&args.ytdlp, settings, args.fallback)
        .context("Invalid custom yt-dlp arguments in settings")?;

    let summary = run_batch(&ytdlp, &urls, &options, &mut io::stdout().lock())?;

    if args.strict && summary.failed() > 0 {
        std::process::exit(1);
    }

    Ok(())
}
