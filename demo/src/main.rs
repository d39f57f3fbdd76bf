//! Provenance Gate demo CLI
//!
//! Runs the reference ingestion scenarios against a file-backed gate, and
//! offers the two operator tools that go with it: verifying an audit log and
//! issuing a signed lineage record.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- semantic-poisoning
//!   cargo run -p demo -- --config provgate.toml verify-log
//!   PROVGATE_SECRET=... cargo run -p demo -- sign-record notes.txt --document-id doc-7

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use provgate_audit::verify_log_file;
use provgate_config::GateConfig;
use provgate_contracts::error::{GateError, GateResult};
use provgate_lineage::{create_signed_record, HmacSigner};
use provgate_ref_corpus::{
    corpus::DEMO_SECRET,
    gate::REFERENCE_CONFIG,
    scenarios::{
        self, clean, combined_attack, lineage_tampering, malformed_lineage, semantic_poisoning,
    },
    Gate,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Provenance gate for documents entering a retrieval corpus.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Provenance gate reference scenarios and audit tooling",
    long_about = "Runs reference ingestion scenarios showing lineage verification,\n\
                  semantic screening, quarantine, and audit chain integrity."
)]
struct Cli {
    /// TOML configuration file.  The shipped reference configuration applies
    /// when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence and print the tally.
    RunAll,
    /// Correctly signed baseline document (accepted).
    Clean,
    /// Record edited in transit (blocked on lineage).
    LineageTampering,
    /// Signed hostile instructions (blocked by the scanner).
    SemanticPoisoning,
    /// Incomplete lineage payload (blocked while parsing).
    MalformedLineage,
    /// Tampered record over hostile text (blocked on lineage).
    CombinedAttack,
    /// Replay an audit log and verify its hash chain.
    VerifyLog {
        /// Log to verify.  Defaults to the configured audit path.
        path: Option<PathBuf>,
    },
    /// Create and sign a lineage record for a content file, printed as JSON.
    SignRecord {
        /// File holding the document text.
        content: PathBuf,
        #[arg(long)]
        document_id: String,
        #[arg(long, default_value = "security-team")]
        author: String,
        #[arg(long, default_value = "manual")]
        source: String,
        /// Hash of the previous version's record.
        #[arg(long)]
        prev_hash: Option<String>,
        #[arg(long, default_value_t = 1)]
        version: u64,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::RunAll => with_gate(&config, |gate| scenarios::run_all(gate).map(|_| ())),
        Command::Clean => with_gate(&config, |gate| clean::run_scenario(gate).map(|_| ())),
        Command::LineageTampering => {
            with_gate(&config, |gate| lineage_tampering::run_scenario(gate).map(|_| ()))
        }
        Command::SemanticPoisoning => {
            with_gate(&config, |gate| semantic_poisoning::run_scenario(gate).map(|_| ()))
        }
        Command::MalformedLineage => {
            with_gate(&config, |gate| malformed_lineage::run_scenario(gate).map(|_| ()))
        }
        Command::CombinedAttack => {
            with_gate(&config, |gate| combined_attack::run_scenario(gate).map(|_| ()))
        }
        Command::VerifyLog { path } => verify_log(&config, path),
        Command::SignRecord {
            content,
            document_id,
            author,
            source,
            prev_hash,
            version,
        } => sign_record(&config, &content, &document_id, &author, &source, prev_hash, version),
    });

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> GateResult<GateConfig> {
    match path {
        Some(path) => GateConfig::from_file(path),
        None => GateConfig::from_toml_str(REFERENCE_CONFIG),
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn with_gate(config: &GateConfig, run: impl FnOnce(&Gate) -> GateResult<()>) -> GateResult<()> {
    let secret = match config.signing.load_secret() {
        Ok(secret) => secret,
        Err(e) => {
            warn!(error = %e, "falling back to the built-in demo key");
            DEMO_SECRET.to_vec()
        }
    };

    print_banner(config);
    let gate = Gate::from_config(config, &secret)?;
    run(&gate)?;

    println!("Audit log       : {}", config.audit.path.display());
    println!("Quarantine root : {}", config.quarantine.root.display());
    Ok(())
}

// ── Operator tools ────────────────────────────────────────────────────────────

fn verify_log(config: &GateConfig, path: Option<PathBuf>) -> GateResult<()> {
    let path = path.unwrap_or_else(|| config.audit.path.clone());
    let report = verify_log_file(&path)?;

    println!("Audit chain VERIFIED: {}", path.display());
    println!("  entries  : {}", report.entries);
    println!("  segments : {}", report.segments);
    if let Some(head) = report.head_hash {
        println!("  head     : {}", head);
    }
    Ok(())
}

fn sign_record(
    config: &GateConfig,
    content_path: &Path,
    document_id: &str,
    author: &str,
    source: &str,
    prev_hash: Option<String>,
    version: u64,
) -> GateResult<()> {
    // Issuing a record needs the real key; no demo fallback here.
    let signer = HmacSigner::new(config.signing.load_secret()?);
    let content = fs::read_to_string(content_path).map_err(|e| GateError::ConfigError {
        reason: format!("cannot read content file '{}': {}", content_path.display(), e),
    })?;

    let record = create_signed_record(&signer, document_id, &content, author, source, prev_hash, version);
    let json = serde_json::to_string_pretty(&record).map_err(|e| GateError::ConfigError {
        reason: format!("cannot encode lineage record: {}", e),
    })?;
    println!("{}", json);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner(config: &GateConfig) {
    println!();
    println!("Provenance Gate");
    println!("Reference Scenarios");
    println!("===================");
    println!();
    println!("Gate pipeline per document:");
    println!("  [1] ingest_start recorded in the SHA-256 audit chain");
    println!("  [2] Lineage payload parsed; malformed input is quarantined");
    println!("  [3] Content hash and HMAC signature verified");
    println!(
        "  [4] Content scored against the baseline (threshold {}, alpha {})",
        config.scanner.threshold, config.scanner.alpha
    );
    println!("  [5] Accepted, or quarantined with an evidence bundle");
    println!();
}
