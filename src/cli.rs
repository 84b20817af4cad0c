//! Argument interpretation and dispatch for the `force` command.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use busbar_sf_sync::{
    fetch, import, write_fetch_report, write_import_report, DeploymentOptions, Error, FetchArgs,
    RemoteSyncClient, Result, DEFAULT_ROOT_DIR,
};

pub const USAGE: &str = "\
Usage: force <command> [<args>]

Commands:
  fetch <type> [<name>...] [--unpack|-u]
      Export metadata to a local directory.
      Use type \"package\" with a package name to fetch a whole package.
      --unpack, -u        Expand zip static resources into bundle directories

  import [deployment options] [-v] [<dir>]
      Import metadata from a local directory (default: ./metadata).
      -rollbackonerror    Indicates whether any failure causes a complete rollback
      -runalltests        If set all Apex tests defined in the organization are run
      -checkonly          Indicates whether classes and triggers are saved during deployment
      -purgeondelete      If set the deleted components are not stored in recycle bin
      -allowmissingfiles  Specifies whether a deploy succeeds even if files missing
      -autoupdatepackage  Auto add files to the package if missing
      -ignorewarnings     Indicates if warnings should fail deployment or not
      -v, --verbose       List every problem and success
      Flags also take an explicit value, e.g. -checkonly=false

Environment:
  SF_INSTANCE_URL, SF_ACCESS_TOKEN   Target org (required)
  SF_API_VERSION                     Metadata API version (default 62.0)
  SF_POLL_INTERVAL_SECS              Status polling interval (default 5)
  SF_POLL_TIMEOUT_SECS               Give up after this many seconds (default 600)

Examples:
  force fetch CustomObject Book__c Author__c
  force fetch StaticResource MyResource --unpack
  force import -checkonly -runalltests org/schema
";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch { args: FetchArgs, root: PathBuf },
    Import(ImportArgs),
    Help,
}

impl Command {
    /// Parse the arguments following the program name. Relative paths are
    /// resolved against `cwd`.
    pub fn parse<S: AsRef<str>>(args: &[S], cwd: &Path) -> Result<Self> {
        let Some((command, rest)) = args.split_first() else {
            return Err(Error::usage("must specify a command (fetch or import)"));
        };

        match command.as_ref() {
            "fetch" => Ok(Command::Fetch {
                args: FetchArgs::parse(rest)?,
                root: cwd.join(DEFAULT_ROOT_DIR),
            }),
            "import" => Ok(Command::Import(ImportArgs::parse(rest, cwd)?)),
            "help" | "-h" | "--help" => Ok(Command::Help),
            other => Err(Error::usage(format!("unknown command: {}", other))),
        }
    }
}

/// Parsed `import` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportArgs {
    pub root: PathBuf,
    pub options: DeploymentOptions,
    pub verbose: bool,
}

impl ImportArgs {
    /// Parse `[-flag[=bool]...] [-v] [<dir>]`. Flags take one or two leading
    /// dashes and may appear anywhere.
    pub fn parse<S: AsRef<str>>(args: &[S], cwd: &Path) -> Result<Self> {
        let mut options = DeploymentOptions::default();
        let mut verbose = false;
        let mut dirs = Vec::new();

        for token in args.iter().map(AsRef::as_ref) {
            let Some(flag) = token.strip_prefix("--").or_else(|| token.strip_prefix('-')) else {
                dirs.push(token);
                continue;
            };
            let (name, value) = match flag.split_once('=') {
                Some((name, value)) => (name, parse_bool(value).ok_or_else(|| {
                    Error::usage(format!("invalid boolean value in {}", token))
                })?),
                None => (flag, true),
            };
            match name {
                "v" | "verbose" => verbose = value,
                _ if options.set_flag(name, value) => {}
                _ => return Err(Error::usage(format!("unknown import option: {}", token))),
            }
        }

        let root = match dirs.as_slice() {
            [] => cwd.join(DEFAULT_ROOT_DIR),
            [dir] => cwd.join(dir),
            _ => {
                return Err(Error::usage(format!(
                    "expected at most one directory, got {}",
                    dirs.len()
                )))
            }
        };

        Ok(Self {
            root,
            options,
            verbose,
        })
    }
}

/// Boolean flag values in the spellings `1`, `t`, `true`, `0`, `f` and
/// `false`, also in upper and title case.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Run `command` against `client`, writing the report to `out`.
pub async fn run<C: RemoteSyncClient>(
    client: &C,
    command: &Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Fetch { args, root } => {
            tracing::info!(request = ?args.request, root = %root.display(), "Fetching metadata");
            let outcome = fetch(client, args, root).await?;
            tracing::debug!(files = outcome.files_written, "Fetch complete");
            write_fetch_report(out, &outcome).context("failed to write fetch report")?;
        }
        Command::Import(args) => {
            tracing::info!(root = %args.root.display(), options = ?args.options, "Importing metadata");
            let outcome = import(client, &args.root, &args.options).await?;
            tracing::debug!(
                files = outcome.files_sent,
                problems = outcome.result.problems.len(),
                "Import complete"
            );
            write_import_report(out, &outcome, args.verbose)
                .context("failed to write import report")?;
        }
        Command::Help => out.write_all(USAGE.as_bytes())?,
    }
    Ok(())
}
