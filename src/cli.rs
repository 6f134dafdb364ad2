// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the Cli struct below *is* the set of flags, and
// clap generates the parsing, --help and --version for us.
//
// Flags parse into raw values here; `probe_config()` then checks that they
// make sense together before anything reaches the checker.
// =============================================================================

use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::checker::ProbeConfig;
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(
    name = "link-patrol",
    version,
    about = "Detect dead links in markdown files",
    long_about = "link-patrol finds every link and image in a markdown file and checks that \
                  each HTTP/HTTPS target responds. Exits non-zero when a link is broken, \
                  which makes it a good fit for CI pipelines."
)]
pub struct Cli {
    /// Path to the markdown file
    #[arg(short = 'f', long)]
    pub filepath: PathBuf,

    /// Timeout for each HTTP request (e.g. 500ms, 5s, 1m)
    #[arg(short = 't', long, default_value = "5s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Maximum number of attempts per link
    #[arg(short = 'm', long, default_value_t = 1)]
    pub max_retries: u32,

    /// Base backoff between attempts
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub start_backoff: Duration,

    /// Upper bound for the backoff between attempts
    #[arg(long, default_value = "4s", value_parser = parse_duration)]
    pub max_backoff: Duration,

    /// Maximum number of links checked at once (default: all of them)
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Always exit with code 0, even if some links are broken
    #[arg(short = 'e', long)]
    pub error_ok: bool,

    /// Output as JSON
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    // Validates the retry settings and bundles them for the probes
    pub fn probe_config(&self) -> Result<ProbeConfig, ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.max_backoff < self.start_backoff {
            return Err(ConfigError::BackoffInverted {
                start: self.start_backoff,
                max: self.max_backoff,
            });
        }

        Ok(ProbeConfig {
            timeout: self.timeout,
            max_retries: self.max_retries,
            start_backoff: self.start_backoff,
            max_backoff: self.max_backoff,
        })
    }

    // None means "no cap"
    pub fn concurrency_limit(&self) -> Result<Option<NonZeroUsize>, ConfigError> {
        match self.concurrency {
            None => Ok(None),
            Some(n) => NonZeroUsize::new(n)
                .map(Some)
                .ok_or(ConfigError::ZeroConcurrency),
        }
    }
}

// Parses durations like "250ms", "1.5s", "1m30s", "2h45m", "300us", or a
// bare number of seconds
//
// Units: ns, us (or µs), ms, s, m, h. Segments add up, as in Go's
// time.ParseDuration. Used as a clap value_parser, hence the String error.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let invalid = || format!("invalid duration '{input}'");
    let is_number = |c: char| c.is_ascii_digit() || c == '.';

    if input.is_empty() {
        return Err(invalid());
    }
    if input.chars().all(is_number) {
        let seconds: f64 = input.parse().map_err(|_| invalid())?;
        return nanos_to_duration(seconds * 1e9, input);
    }

    let mut total_nanos = 0.0;
    let mut rest = input;
    while !rest.is_empty() {
        let number_end = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail.find(is_number).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let value: f64 = number.parse().map_err(|_| invalid())?;
        let nanos_per_unit = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            other => return Err(format!("unknown duration unit '{other}' in '{input}'")),
        };

        total_nanos += value * nanos_per_unit;
        rest = tail;
    }

    nanos_to_duration(total_nanos, input)
}

// Round to whole nanoseconds so "100ms" is exactly 100ms
fn nanos_to_duration(nanos: f64, input: &str) -> Result<Duration, String> {
    let nanos = nanos.round();
    if nanos > u64::MAX as f64 {
        return Err(format!("duration '{input}' is too large"));
    }
    Ok(Duration::from_nanos(nanos as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["link-patrol", "-f", "README.md"]).unwrap();
        assert_eq!(cli.filepath, PathBuf::from("README.md"));
        assert!(!cli.error_ok);
        assert!(!cli.json);
        assert_eq!(cli.concurrency_limit().unwrap(), None);
        assert_eq!(cli.probe_config().unwrap(), ProbeConfig::default());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "link-patrol",
            "--filepath",
            "docs/guide.md",
            "-t",
            "250ms",
            "-m",
            "3",
            "--start-backoff",
            "100ms",
            "--max-backoff",
            "2s",
            "-c",
            "8",
            "-e",
            "-j",
            "-vv",
        ])
        .unwrap();

        assert!(cli.error_ok);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.concurrency_limit().unwrap(), NonZeroUsize::new(8));
        assert_eq!(
            cli.probe_config().unwrap(),
            ProbeConfig {
                timeout: Duration::from_millis(250),
                max_retries: 3,
                start_backoff: Duration::from_millis(100),
                max_backoff: Duration::from_secs(2),
            }
        );
    }

    #[test]
    fn test_filepath_is_required() {
        assert!(Cli::try_parse_from(["link-patrol"]).is_err());
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["link-patrol", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_rejects_zero_retries() {
        let cli = Cli::try_parse_from(["link-patrol", "-f", "a.md", "-m", "0"]).unwrap();
        assert_eq!(cli.probe_config(), Err(ConfigError::ZeroRetries));
    }

    #[test]
    fn test_rejects_inverted_backoff() {
        let cli = Cli::try_parse_from([
            "link-patrol",
            "-f",
            "a.md",
            "--start-backoff",
            "3s",
            "--max-backoff",
            "1s",
        ])
        .unwrap();
        assert!(matches!(
            cli.probe_config(),
            Err(ConfigError::BackoffInverted { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let cli = Cli::try_parse_from(["link-patrol", "-f", "a.md", "-c", "0"]).unwrap();
        assert_eq!(cli.concurrency_limit(), Err(ConfigError::ZeroConcurrency));
    }

    #[test]
    fn test_parse_compound_and_sub_millisecond_durations() {
        assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("2h45m"), Ok(Duration::from_secs(2 * 3600 + 45 * 60)));
        assert_eq!(parse_duration("1s500ms"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration("300us"), Ok(Duration::from_micros(300)));
        assert_eq!(parse_duration("300µs"), Ok(Duration::from_micros(300)));
        assert_eq!(parse_duration("750ns"), Ok(Duration::from_nanos(750)));

        let cli = Cli::try_parse_from(["link-patrol", "-f", "a.md", "-t", "1m30s"]).unwrap();
        assert_eq!(cli.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("10"), Ok(Duration::from_secs(10)));

        assert!(parse_duration("").is_err());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("5 days").is_err());
        assert!(parse_duration("-1s").is_err());
    }
}
