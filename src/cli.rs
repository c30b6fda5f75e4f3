use clap::{CommandFactory, Parser, ValueHint};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// gitpluck - Download the files touched by a GitHub commit
#[derive(Parser, Debug)]
#[command(name = "gitpluck", version, about, long_about = None)]
pub struct Args {
    /// Commit URL to pre-fill the form with
    /// (https://github.com/{owner}/{repo}/commit/{sha})
    #[arg(value_hint = ValueHint::Url)]
    pub url: Option<String>,

    /// Download folder to pre-fill the form with
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub dest: Option<PathBuf>,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

/// Generate shell completions to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    generate(shell, &mut cmd, "gitpluck", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_no_args() {
        let args = Args::try_parse_from(["gitpluck"]).unwrap();
        assert!(args.url.is_none());
        assert!(args.dest.is_none());
        assert!(args.completions.is_none());
    }

    #[test]
    fn test_parse_url_and_dest() {
        let args = Args::try_parse_from([
            "gitpluck",
            "https://github.com/octo/repo/commit/deadbeef",
            "--dest",
            "/tmp/out",
        ])
        .unwrap();

        assert_eq!(
            args.url.as_deref(),
            Some("https://github.com/octo/repo/commit/deadbeef")
        );
        assert_eq!(args.dest, Some(PathBuf::from("/tmp/out")));
    }
}
