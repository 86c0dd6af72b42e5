use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use dialoguer::Input;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use victimator::advisor::{answer_question, build_guidance, passphrase_suggestions};
use victimator::config::{
    default_workers, validate_profile_inputs, DEFAULT_MAX_CANDIDATES, DEFAULT_MAX_LENGTH,
    DEFAULT_MIN_LENGTH, DEFAULT_OUTPUT_ROOT, DEFAULT_POLICY_MIN_LENGTH,
};
use victimator::engine::{enable_current_exe_workers, serve_worker, WORKER_FLAG};
use victimator::healthcheck::run_self_check;
use victimator::logging::init_logging;
use victimator::profile::{parse_csv, parse_tristate, slugify};
use victimator::report::{write_password_audit, write_run_summary, write_wordlists, OutputPaths, QuickReport};
use victimator::{
    load_password_list, AuditConfig, Auditor, CommonPasswords, EngineMode, SubjectProfile, TracingSink,
    APP_NAME, ETHICAL_NOTICE, VERSION,
};

const WEAK_EXAMPLES: usize = 10;
const PASSPHRASES: usize = 5;

/// Defensive password auditing tool. Use only on accounts/systems you own or
/// are authorized to assess.
#[derive(Parser, Debug)]
#[command(name = "victimator", author, version, about, long_about = None)]
struct Cli {
    /// Audit subject name
    #[arg(long)]
    subject_name: Option<String>,

    /// Comma-separated alternate names/usernames
    #[arg(long)]
    aliases: Option<String>,

    /// Comma-separated personal keywords
    #[arg(long)]
    keywords: Option<String>,

    /// Comma-separated numbers commonly reused in weak passwords
    #[arg(long)]
    favorite_numbers: Option<String>,

    #[arg(long)]
    birth_year: Option<i32>,

    /// Organization or team context
    #[arg(long)]
    organization: Option<String>,

    /// Role or account type context
    #[arg(long)]
    role: Option<String>,

    /// Known email hint (weak-pattern detection only)
    #[arg(long)]
    email_hint: Option<String>,

    /// Known phone hint (weak-pattern detection only)
    #[arg(long)]
    phone_hint: Option<String>,

    #[arg(long, default_value = "unknown", value_parser = ["yes", "no", "unknown"])]
    mfa_enabled: String,

    #[arg(long, default_value = "unknown", value_parser = ["yes", "no", "unknown"])]
    password_manager: String,

    /// Days since last password rotation
    #[arg(long, allow_negative_numbers = true)]
    last_rotation_days: Option<i64>,

    /// Comma-separated risk notes (e.g. reuse, phishing incident)
    #[arg(long)]
    risk_notes: Option<String>,

    /// File with passwords to audit, one per line
    #[arg(long)]
    password_file: Option<PathBuf>,

    /// Execution engine: auto, async, threading or parallel
    #[arg(long, default_value = "auto")]
    engine: EngineMode,

    #[arg(long, default_value_t = default_workers())]
    workers: usize,

    /// Minimum generated candidate length
    #[arg(long, default_value_t = DEFAULT_MIN_LENGTH)]
    min_length: usize,

    /// Maximum generated candidate length
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_CANDIDATES)]
    max_candidates: usize,

    /// Minimum length required by the policy checks
    #[arg(long, default_value_t = DEFAULT_POLICY_MIN_LENGTH)]
    policy_min_length: usize,

    /// Root directory for logs, wordlists and reports
    #[arg(long, default_value = DEFAULT_OUTPUT_ROOT)]
    output_root: PathBuf,

    /// Extra common passwords, one per line (added to VICTIMATOR_BLACKLIST_PATH)
    #[arg(long)]
    blacklist: Option<PathBuf>,

    /// Skip the ethical-use confirmation prompt
    #[arg(long)]
    yes: bool,

    #[arg(long, short)]
    verbose: bool,

    /// Check engines and output path, then exit
    #[arg(long)]
    self_check: bool,

    /// Ask the advisor a short question
    #[arg(long)]
    ask: Option<String>,

    /// Leave remediation guidance out of the output
    #[arg(long)]
    no_advice: bool,
}

impl Cli {
    fn audit_config(&self) -> AuditConfig {
        AuditConfig {
            min_length: self.min_length,
            max_length: self.max_length,
            max_candidates: self.max_candidates,
            policy_min_length: self.policy_min_length,
            engine: self.engine,
            workers: self.workers,
            output_root: self.output_root.clone(),
        }
    }

    fn profile(&self, name: String) -> SubjectProfile {
        SubjectProfile {
            name,
            aliases: parse_csv(self.aliases.as_deref()),
            keywords: parse_csv(self.keywords.as_deref()),
            favorite_numbers: parse_csv(self.favorite_numbers.as_deref()),
            birth_year: self.birth_year,
            organization: self.organization.clone(),
            role: self.role.clone(),
            email_hint: self.email_hint.clone(),
            phone_hint: self.phone_hint.clone(),
            mfa_enabled: parse_tristate(&self.mfa_enabled),
            password_manager_used: parse_tristate(&self.password_manager),
            last_rotation_days: self.last_rotation_days,
            risk_notes: parse_csv(self.risk_notes.as_deref()),
        }
        .sanitize()
    }
}

fn print_error(message: &str) {
    eprintln!("{} {message}", "[!]".red());
}

fn print_warning(message: &str) {
    eprintln!("{} {message}", "[*]".yellow());
}

fn print_success(message: &str) {
    println!("{} {message}", "[+]".green());
}

fn print_info(message: &str) {
    println!("{} {message}", "[i]".blue());
}

fn prompt(label: &str) -> anyhow::Result<String> {
    let answer: String = Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()?;
    Ok(answer.trim().to_string())
}

fn confirm_ethical_use(cli: &Cli) -> anyhow::Result<bool> {
    print_error(&format!("{ETHICAL_NOTICE} ({APP_NAME} v{VERSION})"));

    if cli.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        print_error("Non-interactive mode requires --yes for explicit acknowledgment.");
        return Ok(false);
    }
    if prompt("Type 'I AGREE' to continue")? != "I AGREE" {
        print_error("Confirmation mismatch. Exiting.");
        return Ok(false);
    }
    Ok(true)
}

fn run_worker() -> ExitCode {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match serve_worker(stdin.lock(), stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("worker failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.audit_config();
    if let Err(err) = config
        .validate()
        .and_then(|()| validate_profile_inputs(cli.birth_year, cli.last_rotation_days))
    {
        print_error(&err.to_string());
        return Ok(ExitCode::from(2));
    }
    if let Some(path) = &cli.password_file {
        if !path.exists() {
            print_error(&format!("--password-file does not exist: {}", path.display()));
            return Ok(ExitCode::from(2));
        }
    }

    if let Some(question) = &cli.ask {
        print_info(&format!("Advisor: {}", answer_question(question)));
    }

    if cli.self_check {
        let check = run_self_check(&cli.output_root, cli.workers, None);
        for message in &check.messages {
            if message.contains("FAIL") {
                print_error(message);
            } else {
                print_success(message);
            }
        }
        return Ok(if check.ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    if !confirm_ethical_use(&cli)? {
        return Ok(ExitCode::FAILURE);
    }

    let name = match &cli.subject_name {
        Some(name) => name.clone(),
        None if std::io::stdin().is_terminal() => prompt("Subject name")?,
        None => {
            print_error("--subject-name is required in non-interactive mode");
            return Ok(ExitCode::from(2));
        }
    };
    let profile = cli.profile(name);

    let validation = profile.validate();
    if !validation.is_valid() {
        for issue in &validation.errors {
            print_error(&format!("Profile validation: {issue}"));
        }
        return Ok(ExitCode::FAILURE);
    }
    for note in &validation.warnings {
        print_warning(&format!("Profile validation: {note}"));
    }

    let subject_slug = slugify(&profile.name);
    let paths = OutputPaths::new(&cli.output_root, &subject_slug);
    paths.create()?;
    init_logging(&paths.log_file(), cli.verbose)?;
    tracing::info!("Starting run for subject={} engine={}", profile.name, cli.engine);

    let mut common = CommonPasswords::from_env().context("loading VICTIMATOR_BLACKLIST_PATH")?;
    if let Some(path) = &cli.blacklist {
        let added = common
            .extend_from_path(path)
            .with_context(|| format!("loading common passwords from {}", path.display()))?;
        tracing::info!("Loaded {added} extra common passwords from {}", path.display());
    }

    let password_list = match &cli.password_file {
        Some(path) => load_password_list(path)?,
        None => Vec::new(),
    };

    let auditor = Auditor::new(config)?
        .with_common_passwords(common)
        .with_logger(Arc::new(TracingSink));
    let outcome = auditor.run(&profile, &password_list)?;
    let summary = &outcome.summary;

    let wordlist_paths = write_wordlists(&paths.wordlists_dir, &outcome.wordlists)?;
    if cli.password_file.is_some() {
        write_password_audit(&paths.reports_dir, &outcome.audited)?;
    }

    let weak_examples: Vec<String> = outcome.wordlists.weak.iter().take(WEAK_EXAMPLES).cloned().collect();
    let passphrases = passphrase_suggestions(&mut rand::thread_rng(), PASSPHRASES);
    let guidance = if cli.no_advice {
        Vec::new()
    } else {
        build_guidance(&profile, summary, &outcome.audited)
    };

    let summary_path = write_run_summary(&paths.reports_dir, summary)?;
    let report_path = QuickReport {
        summary,
        weak_examples: &weak_examples,
        passphrases: &passphrases,
        guidance: &guidance,
    }
    .write(&paths.reports_dir)?;

    print_success(&format!("App: {APP_NAME} v{VERSION}"));
    print_success(&format!("Subject: {} ({subject_slug})", profile.name));
    print_success(&format!("Generated candidates: {}", summary.generated_candidates));
    print_success(&format!(
        "Classified => weak:{} medium:{} strong:{}",
        summary.weak_count, summary.medium_count, summary.strong_count
    ));
    print_success(&format!(
        "Engine used: {} with {} worker(s)",
        summary.engine_mode, summary.workers
    ));
    if let Some(dir) = wordlist_paths.first().and_then(|path| path.parent()) {
        print_success(&format!("Wordlists saved at: {}", dir.display()));
    }
    print_success(&format!("Summary saved: {}", summary_path.display()));
    print_success(&format!("Report saved: {}", report_path.display()));
    if !guidance.is_empty() {
        print_info("Top guidance:");
        for tip in guidance.iter().take(3) {
            print_info(&format!("- {tip}"));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    // Worker processes speak JSON on stdout; nothing else may touch it.
    if std::env::args().nth(1).as_deref() == Some(WORKER_FLAG) {
        return run_worker();
    }
    enable_current_exe_workers();

    let cli = Cli::parse();

    if let Err(err) = ctrlc::set_handler(|| {
        print_error("Interrupted by user. Exiting safely.");
        std::process::exit(1);
    }) {
        print_warning(&format!("Could not install Ctrl-C handler: {err}"));
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
