//! CLI entrypoint for the droidcompat loader tooling.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use droidcompat_harness::coverage::{Provider, classify_file};
use droidcompat_harness::exports::check_exports_file;
use droidcompat_harness::patch::{PatchStatus, patch_file};
use droidcompat_harness::stage::{HostRuntime, stage};
use droidcompat_harness::structured_log::{ArtifactRef, LogEmitter, LogLevel, Outcome};
use droidcompat_harness::{HarnessResult, ShimLibrary};

/// Prepare a bionic-linked module and the droidcompat shims for the glibc loader.
#[derive(Debug, Parser)]
#[command(name = "droidcompat-harness")]
#[command(about = "Loader preparation tooling for droidcompat")]
struct Cli {
    /// Append a structured JSONL trace of the run to this file.
    #[arg(long, global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Neutralize symbol versioning in place.
    PatchVersions {
        /// Module files to patch.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check a built shim for every symbol it must export.
    Exports {
        /// Which shim: bionic-compat, log or opensles.
        #[arg(long)]
        library: String,
        file: PathBuf,
    },
    /// Classify a module's undefined symbols by provider.
    Coverage {
        module: PathBuf,
        /// Shared objects to resolve against, in lookup order.
        #[arg(long = "provider")]
        providers: Vec<PathBuf>,
    },
    /// Lay out a loader directory.
    Stage {
        #[arg(long)]
        out: PathBuf,
        /// Directory holding the built shim libraries.
        #[arg(long)]
        artifacts: PathBuf,
    },
}

struct Trace(Option<LogEmitter>);

impl Trace {
    fn open(path: Option<&Path>) -> std::io::Result<Self> {
        let run_id = format!("run-{}", std::process::id());
        Ok(Self(match path {
            Some(p) => Some(LogEmitter::to_file(p, &run_id)?),
            None => None,
        }))
    }

    fn record<T: Serialize>(
        &mut self,
        level: LogLevel,
        event: &str,
        outcome: Outcome,
        library: Option<&str>,
        artifacts: Vec<ArtifactRef>,
        details: &T,
    ) -> HarnessResult<()> {
        let Some(emitter) = self.0.as_mut() else {
            return Ok(());
        };
        let mut entry = emitter
            .entry(level, event)
            .with_outcome(outcome)
            .with_details(serde_json::to_value(details)?);
        if let Some(library) = library {
            entry = entry.with_library(library);
        }
        if !artifacts.is_empty() {
            entry = entry.with_artifacts(artifacts);
        }
        emitter.emit(&entry)?;
        Ok(())
    }

    fn finish(&mut self) -> std::io::Result<()> {
        match self.0.as_mut() {
            Some(emitter) => emitter.flush(),
            None => Ok(()),
        }
    }
}

fn run(cli: Cli, trace: &mut Trace) -> HarnessResult<bool> {
    match cli.command {
        Command::PatchVersions { files } => {
            let mut ok = true;
            for file in files {
                match patch_file(&file) {
                    Ok(outcome) => {
                        let (level, result) = match &outcome.status {
                            PatchStatus::Patched { .. } | PatchStatus::Unchanged => {
                                (LogLevel::Info, Outcome::Pass)
                            }
                            PatchStatus::Skipped { .. } => (LogLevel::Warn, Outcome::Skip),
                        };
                        match &outcome.status {
                            PatchStatus::Patched {
                                versym_rewritten, ..
                            } => println!(
                                "{}: patched ({versym_rewritten} version entries neutralized)",
                                file.display()
                            ),
                            PatchStatus::Unchanged => println!("{}: already neutral", file.display()),
                            PatchStatus::Skipped { reason } => {
                                println!("{}: skipped ({reason})", file.display());
                            }
                        }
                        let artifacts = outcome
                            .before
                            .iter()
                            .chain(outcome.after.iter())
                            .cloned()
                            .collect();
                        trace.record(level, "patch_versions", result, None, artifacts, &outcome)?;
                    }
                    Err(err) => {
                        ok = false;
                        eprintln!("{}: {err}", file.display());
                        trace.record(
                            LogLevel::Error,
                            "patch_versions",
                            Outcome::Error,
                            None,
                            Vec::new(),
                            &err.to_string(),
                        )?;
                    }
                }
            }
            Ok(ok)
        }
        Command::Exports { library, file } => {
            let library = ShimLibrary::from_name(&library)?;
            let report = check_exports_file(library, &file)?;
            let artifacts = vec![ArtifactRef::from_file(&file)?];
            let complete = report.is_complete();
            trace.record(
                if complete { LogLevel::Info } else { LogLevel::Error },
                "exports",
                if complete { Outcome::Pass } else { Outcome::Fail },
                Some(library.name()),
                artifacts,
                &report,
            )?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            report.into_result().map(|_| true)
        }
        Command::Coverage { module, providers } => {
            let providers = providers
                .iter()
                .map(|p| Provider::from_file(p))
                .collect::<HarnessResult<Vec<_>>>()?;
            let report = classify_file(&module, &providers)?;
            let unresolved = report.unresolved().count();
            trace.record(
                if unresolved == 0 { LogLevel::Info } else { LogLevel::Error },
                "coverage",
                if unresolved == 0 { Outcome::Pass } else { Outcome::Fail },
                None,
                vec![ArtifactRef::from_file(&module)?],
                &report,
            )?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            eprintln!(
                "{}: {} resolved, {unresolved} unresolved",
                module.display(),
                report.resolved_count()
            );
            Ok(unresolved == 0)
        }
        Command::Stage { out, artifacts } => {
            let host = HostRuntime::discover()?;
            let report = stage(&out, &artifacts, &host)?;
            let refs = report.shims.iter().map(|s| s.artifact.clone()).collect();
            trace.record(LogLevel::Info, "stage", Outcome::Pass, None, refs, &report)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut trace = match Trace::open(cli.log.as_deref()) {
        Ok(trace) => trace,
        Err(err) => {
            eprintln!("cannot open log: {err}");
            return ExitCode::FAILURE;
        }
    };
    let result = run(cli, &mut trace);
    if let Err(err) = trace.finish() {
        eprintln!("cannot flush log: {err}");
    }
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
