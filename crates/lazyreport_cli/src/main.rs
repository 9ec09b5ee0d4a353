//! CLI smoke entry point.
//!
//! Builds a linear chain report (`field0 = 0`, `fieldN = field{N-1} + 1`),
//! reads its tail, rewrites the head and reads the tail again.
//!
//! Usage: `lazyreport_cli [chain_len]` (default 100).

use lazyreport_core::{
    core_version, init_logging, FieldStore, LoggingConfig, ReportError, Template,
};
use log::info;
use std::process::ExitCode;

const DEFAULT_CHAIN_LEN: usize = 100;
const MAX_CHAIN_LEN: usize = 10_000;
// Each link nests one `get` plus one derivation closure; debug builds need
// roughly 2 KiB per link, so this leaves ample headroom at MAX_CHAIN_LEN.
const CHAIN_STACK_BYTES: usize = 64 * 1024 * 1024;
const SNAPSHOT_PREVIEW_FIELDS: usize = 3;

fn main() -> ExitCode {
    if let Err(err) = init_logging(&LoggingConfig::default()) {
        eprintln!("logging disabled: {err}");
    }

    let chain_len = match parse_chain_len(std::env::args().nth(1)) {
        Ok(len) => len,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match on_chain_stack(move || run(chain_len)) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Runs `work` on a dedicated thread whose stack fits a chain of
/// `MAX_CHAIN_LEN` links.
fn on_chain_stack<T, F>(work: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    // Why: reads recurse once per link, and the main thread's stack is too
    // small for long chains in debug builds.
    let handle = std::thread::Builder::new()
        .name("lazyreport-chain".to_string())
        .stack_size(CHAIN_STACK_BYTES)
        .spawn(work)
        .map_err(|err| format!("failed to spawn chain worker: {err}"))?;
    handle
        .join()
        .map_err(|_| "chain worker panicked".to_string())
}

fn parse_chain_len(arg: Option<String>) -> Result<usize, String> {
    match arg {
        None => Ok(DEFAULT_CHAIN_LEN),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(len) if (1..=MAX_CHAIN_LEN).contains(&len) => Ok(len),
            _ => Err(format!(
                "chain_len must be an integer in 1..={MAX_CHAIN_LEN}, got `{raw}`"
            )),
        },
    }
}

fn chain_template(len: usize) -> Template<i64> {
    (1..=len).fold(Template::<i64>::new().stored("field0", 0), |template, i| {
        let previous = format!("field{}", i - 1);
        template.derived(format!("field{i}"), move |report| {
            Ok(report.get(&previous)? + 1)
        })
    })
}

fn run(chain_len: usize) -> Result<(), ReportError> {
    info!(
        "event=cli_start module=cli status=ok version={} chain_len={chain_len}",
        core_version()
    );

    let tail = format!("field{chain_len}");
    let mut report = FieldStore::new(chain_template(chain_len));

    println!("lazyreport_core version={}", core_version());
    println!("{tail}={}", report.get(&tail)?);

    report.set("field0", 100)?;
    println!("field0=100 -> {tail}={}", report.get(&tail)?);

    let stats = report.stats();
    println!(
        "computations={} cache_hits={} invalidated={}",
        stats.computations, stats.cache_hits, stats.invalidated
    );

    let preview: Vec<String> = (0..=chain_len)
        .take(SNAPSHOT_PREVIEW_FIELDS)
        .map(|i| format!("field{i}"))
        .collect();
    let mut snapshot = report.snapshot();
    snapshot.fields.retain(|field| preview.contains(&field.name));
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("snapshot not printable: {err}"),
    }

    Ok(())
}
