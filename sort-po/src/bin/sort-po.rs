// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sort PO files by source reference.
//!
//! Each file given on the command line is backed up to a
//! `backup-sort-po/` directory next to it, sorted and then replaced.
//! Without arguments, `Game.po` in the current directory is sorted.
//!
//! The exit code is 0 when every file was sorted, 1 when there was
//! nothing to sort, 2 when every file failed and 3 when only some
//! files failed.

use std::io::{self, BufRead as _, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{CommandFactory as _, Parser};
use log::{debug, error, warn};
use sort_po::encoding::TextEncoding;
use sort_po::sorter::{ExitStatus, Report, Sorter};
use sort_po::{Config, DEFAULT_ENCODING};

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Sort PO files by source reference.")]
struct Args {
    /// The PO files to sort [default: Game.po].
    #[arg(id = "file.po")]
    filenames: Vec<PathBuf>,
    /// Encoding for reading and writing the files.
    #[arg(short, long, default_value = DEFAULT_ENCODING)]
    encoding: String,
    /// Wrap strings and references at this width, 0 disables wrapping.
    #[arg(short, long, default_value_t = 0)]
    wrap: usize,
    /// Wait for Enter before exiting.
    #[arg(long)]
    pause: bool,
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let args = Args::parse();

    let status = match run(&args) {
        Ok(status) => status,
        Err(err) => {
            error!("{err:#}");
            ExitStatus::NoInput
        }
    };
    if status == ExitStatus::NoInput {
        if let Err(err) = Args::command().print_help() {
            warn!("Could not print help: {err}");
        }
    }
    if args.pause {
        if let Err(err) = pause() {
            warn!("{err:#}");
        }
    }
    status.into()
}

fn run(args: &Args) -> anyhow::Result<ExitStatus> {
    let encoding = TextEncoding::for_label(&args.encoding)
        .with_context(|| format!("Invalid encoding {:?}", args.encoding))?;
    let config = Config {
        encoding,
        wrap_width: args.wrap,
        ..Config::default()
    };

    let sorter = Sorter::new(config);
    debug!(
        "Reading and writing {}, wrap width {}",
        sorter.config().encoding,
        sorter.config().wrap_width
    );
    let report = sorter.run(&args.filenames);
    print_report(&report);
    Ok(report.exit_status())
}

#[allow(clippy::print_stdout)]
fn print_report(report: &Report) {
    println!(" --- --- --- --- --- ");
    print!("{report}");
}

#[allow(clippy::print_stdout)]
fn pause() -> anyhow::Result<()> {
    print!("Press Enter to close...");
    io::stdout().flush().context("Could not flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Could not read from stdin")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["sort-po"]);
        assert!(args.filenames.is_empty());
        assert_eq!(args.encoding, "utf-8-sig");
        assert_eq!(args.wrap, 0);
        assert!(!args.pause);
    }

    #[test]
    fn test_args() {
        let args = Args::parse_from(["sort-po", "-e", "latin1", "-w", "79", "de.po", "fr.po"]);
        assert_eq!(
            args.filenames,
            vec![PathBuf::from("de.po"), PathBuf::from("fr.po")]
        );
        assert_eq!(args.encoding, "latin1");
        assert_eq!(args.wrap, 79);

        let args = Args::parse_from(["sort-po", "--encoding", "utf-8", "--pause"]);
        assert_eq!(args.encoding, "utf-8");
        assert!(args.pause);
    }

    #[test]
    fn test_invalid_encoding() {
        let args = Args::parse_from(["sort-po", "-e", "klingon", "de.po"]);
        assert!(run(&args).is_err());
    }

    #[test]
    fn test_verify_cli() {
        Args::command().debug_assert();
    }
}
