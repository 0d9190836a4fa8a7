use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::app::{App, MigrationOptions};
use crate::config;
use crate::migrate::LabelOptions;
use crate::model::issue::SourceRepo;
use crate::providers::bitbucket::BitbucketSource;
use crate::providers::github::{parse_repo, GitHubTarget};

/// A tool to migrate issues from Bitbucket to GitHub.
///
/// The Bitbucket issue tracker has to be public unless a Bitbucket username
/// is given.
#[derive(Debug, Parser)]
#[command(name = "bb2gh", version)]
pub struct Cli {
    /// Account owner of the Bitbucket repository
    pub bitbucket_accountname: String,

    /// Bitbucket repository to pull data from
    pub bitbucket_repo: String,

    /// Your GitHub username
    pub github_username: String,

    /// GitHub repository to add issues to, as <owner>/<repo>
    pub github_repo: String,

    /// Perform a dry run and print everything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Bitbucket issue offset from which to start the import
    #[arg(short = 'f', long = "start_id", default_value_t = 0)]
    pub start_id: u64,

    /// Access Bitbucket as this user instead of anonymously
    #[arg(short = 'u', long)]
    pub bitbucket_username: Option<String>,

    /// Label issues with their Bitbucket kind (bug, enhancement, ...)
    #[arg(long)]
    pub kind_labels: bool,

    /// Label wontfix, on-hold, invalid and duplicate issues with their status
    #[arg(long)]
    pub status_labels: bool,

    /// Config file (default: ~/.bb2gh/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn options(&self) -> MigrationOptions {
        MigrationOptions {
            repo: SourceRepo::new(&self.bitbucket_accountname, &self.bitbucket_repo),
            start_id: self.start_id,
            dry_run: self.dry_run,
            labels: LabelOptions {
                kind_labels: self.kind_labels,
                status_labels: self.status_labels,
            },
        }
    }
}

pub async fn handle_migrate(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let (owner, repo) = parse_repo(&cli.github_repo)?;

    let bitbucket_username = cli
        .bitbucket_username
        .as_deref()
        .or(config.bitbucket_username());
    let credentials = config::resolve_credentials(&config, bitbucket_username)?;

    let source = BitbucketSource::new(
        config.bitbucket_api_url(),
        &cli.bitbucket_accountname,
        &cli.bitbucket_repo,
        credentials.bitbucket,
    );
    let target = GitHubTarget::new(
        config.github_api_url(),
        &owner,
        &repo,
        &cli.github_username,
        &credentials.github_password,
    );

    info!(
        from = %format!("{}/{}", cli.bitbucket_accountname, cli.bitbucket_repo),
        to = %cli.github_repo,
        dry_run = cli.dry_run,
        "starting migration"
    );
    let report = App::new(&source, &target, cli.options()).run().await?;
    info!(
        fetched = report.fetched,
        published = report.published,
        comments = report.comments,
        "migration finished"
    );
    Ok(())
}
