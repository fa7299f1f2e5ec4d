use anyhow::{Context, Result};
use console::style;
use gavel_browser::{ChromeFinder, ChromeLauncher, PortalSession, ProfileManager};
use gavel_core::config::{Credentials, PASSWORD_ENV, RunConfigFile, USERNAME_ENV};
use gavel_core::export::CsvExporter;
use gavel_core::plan::{Division, SearchPlan, parse_date};
use gavel_core::record::{
    CASE_NUMBER_COLUMN, CHARGE_NUMBER_COLUMN, HearingContext, PARTY_COLUMNS,
};
use gavel_core::table::DataTable;
use gavel_portal::{login, scrape, search};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;

/// Party dataset file name inside the output directory
pub const PARTY_FILE: &str = "party_data.csv";
/// Charges dataset file name inside the output directory
pub const CHARGES_FILE: &str = "charges_data.csv";

#[derive(clap::Args, Debug)]
pub struct ScrapeArgs {
    /// Portal login URL
    #[arg(long, value_name = "URL")]
    pub portal_url: Option<String>,

    /// Division to search, as 'JUDGE LABEL=Courtroom N' (repeatable)
    #[arg(long = "division", value_name = "JUDGE=COURTROOM")]
    pub divisions: Vec<String>,

    /// First hearing date to search (MM/DD/YYYY)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Last hearing date to search, inclusive (MM/DD/YYYY)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// JSON file supplying the portal URL, divisions, and dates
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the CSV files are written to (default: data)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Portal account name
    #[arg(long, env = USERNAME_ENV, hide_env_values = true)]
    pub username: Option<String>,

    /// Portal account password
    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,

    /// Path to the Chrome binary
    #[arg(long, value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Run Chrome headless
    #[arg(long)]
    pub headless: bool,

    /// Named persistent Chrome profile (default: temporary profile)
    #[arg(long)]
    pub profile: Option<String>,

    /// Chrome remote debugging port
    #[arg(long, default_value_t = 9222)]
    pub port: u16,

    /// Upper bound for element and grid waits, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Fully resolved inputs for one run: flags merged over the config file
#[derive(Debug)]
struct Settings {
    portal_url: String,
    plan: SearchPlan,
    credentials: Credentials,
    output_dir: PathBuf,
    chrome_path: Option<PathBuf>,
    headless: bool,
    profile: Option<String>,
    port: u16,
    timeout: Duration,
}

impl Settings {
    fn resolve(args: ScrapeArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => RunConfigFile::load(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?,
            None => RunConfigFile::default(),
        };

        // Fail on missing credentials before any browser work starts.
        let credentials = Credentials::resolve(args.username, args.password)?;

        let portal_url = args.portal_url.or(file.portal_url).context(
            "No portal URL. Pass --portal-url or set portal_url in the config file.",
        )?;

        let divisions = if args.divisions.is_empty() {
            file.divisions
        } else {
            args.divisions
                .iter()
                .map(|d| Division::parse(d))
                .collect::<gavel_core::Result<Vec<_>>>()?
        };

        let from = args
            .from
            .or(file.date_from)
            .context("No start date. Pass --from or set date_from in the config file.")?;
        let to = args
            .to
            .or(file.date_to)
            .context("No end date. Pass --to or set date_to in the config file.")?;

        let plan = SearchPlan::new(divisions, parse_date(&from)?, parse_date(&to)?)?;

        Ok(Self {
            portal_url,
            plan,
            credentials,
            output_dir: args
                .out
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from("data")),
            chrome_path: args.chrome_path,
            headless: args.headless,
            profile: args.profile,
            port: args.port,
            timeout: Duration::from_secs(args.timeout_secs),
        })
    }
}

pub fn execute(args: ScrapeArgs) -> Result<()> {
    let settings = Settings::resolve(args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run(settings));

    // Explicitly shutdown runtime with timeout to prevent hanging on blocking tasks
    runtime.shutdown_timeout(Duration::from_millis(100));

    result
}

async fn run(settings: Settings) -> Result<()> {
    println!("🔍 Locating Chrome...");
    let finder = ChromeFinder::new(settings.chrome_path.clone());
    let chrome_binary = finder.find()?;
    println!("✅ Found Chrome at: {}", chrome_binary.display());

    let profile_manager = if let Some(profile_name) = &settings.profile {
        let profile_path = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(".gavel")
            .join("profiles")
            .join(profile_name);

        println!("📁 Using profile: {}", profile_path.display());
        ProfileManager::persistent(profile_path)?
    } else {
        println!("📁 Using temporary profile");
        ProfileManager::temporary()?
    };

    let launcher = ChromeLauncher::new(
        chrome_binary,
        profile_manager.path().to_path_buf(),
        Some(settings.portal_url.clone()),
    )
    .with_debugging_port(settings.port)
    .with_headless(settings.headless);

    println!("🚀 Launching Chrome...");
    let mut chrome_process = launcher.launch()?;
    let chrome_pid = chrome_process.id();
    println!("✅ Chrome started successfully");

    let result = drive(&settings).await;

    // Chrome has no reason to outlive the run.
    kill_process_by_pid(chrome_pid);
    let _ = tokio::task::spawn_blocking(move || chrome_process.wait()).await;

    result
}

async fn drive(settings: &Settings) -> Result<()> {
    let session = PortalSession::connect(settings.port, settings.timeout).await?;
    let result = scrape_all(&session, settings).await;
    session.close();
    result
}

async fn scrape_all(session: &PortalSession, settings: &Settings) -> Result<()> {
    login::login(session, &settings.portal_url, &settings.credentials)
        .await
        .context("portal login failed")?;

    let mut party_table = DataTable::with_columns(&PARTY_COLUMNS);
    let mut charge_table =
        DataTable::with_columns(&[CASE_NUMBER_COLUMN, CHARGE_NUMBER_COLUMN]);

    let progress = ProgressBar::new(settings.plan.len() as u64);

    for (division, date) in settings.plan.searches() {
        let context = HearingContext::new(division, date);
        progress.println(format!(
            "Currently processing {} on {}.",
            division.judge,
            context.date_string()
        ));

        search::submit_search(session, &context).await.with_context(|| {
            format!(
                "search failed for {} on {}",
                division.courtroom,
                context.date_string()
            )
        })?;

        let outcome = scrape::scrape_results(session, &context).await.with_context(|| {
            format!(
                "scrape failed for {} on {}",
                division.courtroom,
                context.date_string()
            )
        })?;

        tracing::info!(
            "{} on {}: {} cases, {} charge lines",
            division.courtroom,
            context.date_string(),
            outcome.parties.len(),
            outcome.charges.len()
        );

        for party in &outcome.parties {
            party_table.push(party.record());
        }
        for charge in &outcome.charges {
            charge_table.push(charge.record());
        }

        progress.inc(1);
    }
    progress.finish_and_clear();

    export(settings, &party_table, &charge_table)
}

fn export(settings: &Settings, party_table: &DataTable, charge_table: &DataTable) -> Result<()> {
    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "could not create output directory {}",
            settings.output_dir.display()
        )
    })?;

    let party_path = settings.output_dir.join(PARTY_FILE);
    CsvExporter::to_file(party_table, &party_path)
        .with_context(|| format!("could not write {}", party_path.display()))?;

    let charges_path = settings.output_dir.join(CHARGES_FILE);
    CsvExporter::to_file(charge_table, &charges_path)
        .with_context(|| format!("could not write {}", charges_path.display()))?;

    println!(
        "📊 Scraped {} party rows and {} charge rows",
        party_table.len(),
        charge_table.len()
    );
    println!(
        "✅ Data saved to {}",
        style(settings.output_dir.display()).green()
    );

    Ok(())
}

/// Kill a process by PID (cross-platform)
fn kill_process_by_pid(pid: u32) {
    #[cfg(unix)]
    {
        use std::process::Command;
        // Use kill command to send SIGTERM
        let _ = Command::new("kill").arg(pid.to_string()).output();
    }

    #[cfg(windows)]
    {
        use std::process::Command;
        let _ = Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/F"])
            .output();
    }
}
