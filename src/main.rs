use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use livecheck::config::{self, Settings};
use livecheck::fetch::{ArtifactDigest, ArtifactProbe, ContentSource, FileCredentialStore, Fetcher};
use livecheck::version::{
    Candidate, PackageAtom, Policy, VersionRestriction, resolve_with_feed_date,
};
use serde::Serialize;
use serde_json::json;

#[derive(Parser)]
#[command(name = "livecheck")]
#[command(version, about = "Latest upstream version resolution for Gentoo packages")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick the latest version out of a list of tags
    Resolve {
        /// Package atom, e.g. dev-util/foo-1.2.3
        #[arg(long)]
        atom: String,
        /// Accept development versions
        #[arg(long)]
        development: bool,
        /// Restriction: major, minor, prefix:<p>, regex:<re> or a semver requirement
        #[arg(long)]
        restrict: Option<String>,
        /// Settings file (defaults to the config directory)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// <updated> timestamp of the feed the tags came from
        #[arg(long)]
        feed_date: Option<String>,
        /// Candidates as tag or tag=id, in source order
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Fetch a URL with its detected profile
    Fetch { url: String },
    /// Download artifacts and print their digests
    Hash {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Print the Last-Modified date of artifacts as YYYYMMDD
    LastModified {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Resolve the latest version from regex matches on a page
    Scan {
        #[arg(long)]
        atom: String,
        #[arg(long)]
        regex: String,
        #[arg(long)]
        settings: Option<PathBuf>,
        url: String,
    },
}

#[derive(Serialize)]
struct DigestLine<'a> {
    url: &'a str,
    #[serde(flatten)]
    digest: ArtifactDigest,
}

fn parse_candidate(arg: &str) -> Candidate {
    match arg.split_once('=') {
        Some((tag, id)) => Candidate::new(tag, id),
        None => Candidate::tag(arg),
    }
}

fn load_policy(atom: &PackageAtom, settings: Option<PathBuf>) -> anyhow::Result<Policy> {
    let path = settings.unwrap_or_else(config::settings_path);
    Ok(Settings::load_or_default(&path)?.policy_for(&atom.catpkg())?)
}

fn fetcher() -> Fetcher {
    Fetcher::new(Arc::new(FileCredentialStore::load(&config::credentials_path())))
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Resolve {
            atom,
            development,
            restrict,
            settings,
            feed_date,
            tags,
        } => {
            let atom = PackageAtom::parse(&atom)?;
            let mut policy = load_policy(&atom, settings)?;
            if development {
                policy = policy.with_development(true);
            }
            if let Some(spec) = restrict {
                policy = policy.with_restriction(spec.parse::<VersionRestriction>()?);
            }

            let candidates: Vec<Candidate> = tags.iter().map(|t| parse_candidate(t)).collect();
            let result = resolve_with_feed_date(&candidates, &atom, &policy, feed_date.as_deref());
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Fetch { url } => {
            let result = fetcher().fetch(&url).await;
            let line = json!({
                "url": result.url(),
                "status": result.status_code(),
                "success": result.is_success(),
                "length": result.text().len(),
            });
            println!("{}", serde_json::to_string_pretty(&line)?);
        }
        Command::Hash { urls } => {
            let fetcher = fetcher();
            let probe = ArtifactProbe::new(fetcher.sessions())?;
            let digests =
                futures::future::join_all(urls.iter().map(|url| probe.hash_and_size(url))).await;
            let lines: Vec<DigestLine<'_>> = urls
                .iter()
                .zip(digests)
                .map(|(url, digest)| DigestLine { url, digest })
                .collect();
            println!("{}", serde_json::to_string_pretty(&lines)?);
        }
        Command::LastModified { urls } => {
            let fetcher = fetcher();
            let probe = ArtifactProbe::new(fetcher.sessions())?;
            let dates =
                futures::future::join_all(urls.iter().map(|url| probe.last_modified(url))).await;
            let lines: Vec<_> = urls
                .iter()
                .zip(dates)
                .map(|(url, date)| json!({ "url": url, "date": date }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&lines)?);
        }
        Command::Scan {
            atom,
            regex,
            settings,
            url,
        } => {
            let atom = PackageAtom::parse(&atom)?;
            let policy = load_policy(&atom, settings)?;
            let result =
                livecheck::scan::latest_by_regex(&fetcher(), &url, &regex, &atom, &policy).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = livecheck::logging::init(cli.verbose, cli.log_file.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command))
}
