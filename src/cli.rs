//! Command-line interface for scssfmt.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to format
    pub inputs: Vec<PathBuf>,

    /// Number of spaces per nesting level
    pub indent: Option<usize>,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Silent mode (no output)
    pub silent: bool,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Custom stylesheet file extensions (in addition to defaults)
    pub extensions: Vec<String>,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("scssfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Fred Jones")
        .about("Brace-driven re-indenting formatter for SCSS stylesheets")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to format")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("indent")
                .short('i')
                .long("indent")
                .help("Number of spaces per nesting level [default: 2]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of modifying files in-place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively format directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("ext")
                .short('x')
                .long("ext")
                .help("Additional stylesheet file extension (can be repeated, e.g., -x css -x sass)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output (shows config discovery and per-file sizes)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no output, for editor integration)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        indent: matches.get_one::<usize>("indent").copied(),
        stdout: matches.get_flag("stdout"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        silent: matches.get_flag("silent"),
        jobs: matches.get_one::<usize>("jobs").copied(),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        extensions: matches
            .get_many::<String>("ext")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        debug: matches.get_flag("debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_builds() {
        let cmd = build_cli();
        // Just verify it builds without panic
        assert_eq!(cmd.get_name(), "scssfmt");
    }

    #[test]
    fn test_cli_defaults() {
        let cmd = build_cli();
        let matches = cmd.try_get_matches_from(vec!["scssfmt"]).unwrap();

        assert!(matches.get_many::<PathBuf>("inputs").is_none());
        assert!(!matches.get_flag("recursive"));
        assert!(!matches.get_flag("stdout"));
    }

    #[test]
    fn test_indent_flag() {
        let args = parse_args_from(vec!["scssfmt", "-i", "4", "style.scss"]);
        assert_eq!(args.indent, Some(4));
    }

    #[test]
    fn test_indent_not_set() {
        let args = parse_args_from(vec!["scssfmt", "style.scss"]);
        assert_eq!(args.indent, None);
    }

    #[test]
    fn test_exclude_multiple() {
        let args = parse_args_from(vec![
            "scssfmt",
            "-r",
            "-e",
            "vendor*",
            "--exclude",
            "node_modules",
            "-e",
            "_generated.scss",
            "styles/",
        ]);
        assert_eq!(args.exclude, vec!["vendor*", "node_modules", "_generated.scss"]);
    }

    #[test]
    fn test_ext_multiple() {
        let args = parse_args_from(vec![
            "scssfmt", "-r", "-x", "css", "--ext", "sass", "styles/",
        ]);
        assert_eq!(args.extensions, vec!["css", "sass"]);
    }

    #[test]
    fn test_jobs_flag() {
        let args = parse_args_from(vec!["scssfmt", "-j", "1", "style.scss"]);
        assert_eq!(args.jobs, Some(1));
    }

    #[test]
    fn test_debug_and_silent_flags() {
        let args = parse_args_from(vec!["scssfmt", "-D", "-S", "style.scss"]);
        assert!(args.debug);
        assert!(args.silent);
    }
}
