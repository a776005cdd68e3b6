//! pg-crud CLI - interactive CRUD console for PostgreSQL.

mod credentials;

use std::process::ExitCode;

use clap::Parser;
use pg_crud::{
    CoercionMode, ConnectionConfig, CrudError, LineConsole, PgDatabase, Session, SessionConfig,
    SslMode,
};
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "pg-crud")]
#[command(about = "Interactive CRUD console for any PostgreSQL schema")]
#[command(version)]
struct Cli {
    /// Database server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Database server port
    #[arg(short, long, default_value = "5432")]
    port: u16,

    /// User name (prompted when omitted)
    #[arg(short = 'U', long)]
    user: Option<String>,

    /// Database name (prompted when omitted)
    #[arg(short, long)]
    database: Option<String>,

    /// TLS mode: disable, require, verify-ca, verify-full
    #[arg(long, default_value = "disable")]
    sslmode: String,

    /// Schema whose tables are offered
    #[arg(long, default_value = "public")]
    schema: String,

    /// Reject unparsable numbers instead of substituting zero
    #[arg(long)]
    strict: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), CrudError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(CrudError::Config)?;

    // Reject bad flags before asking for a password
    let mut config = ConnectionConfig {
        host: cli.host,
        port: cli.port,
        ssl_mode: SslMode::parse(&cli.sslmode)?,
        schema: cli.schema,
        ..Default::default()
    };

    credentials::complete(&mut config, cli.user, cli.database)?;
    config.validate()?;

    let db = PgDatabase::connect(&config).await?;
    println!("\nConnected to {} as {}", config.database, config.user);

    let session_config = SessionConfig {
        schema: config.schema.clone(),
        coercion: if cli.strict {
            CoercionMode::Strict
        } else {
            CoercionMode::Lenient
        },
    };

    let mut session = Session::new(&db, LineConsole::stdio(), session_config);
    session.run().await?;

    info!("Disconnected from {}:{}", config.host, config.port);
    Ok(())
}

/// Log to stderr so records never interleave with the console on stdout.
fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("Invalid verbosity '{}'", other)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("Invalid log format '{}'", other)),
    }

    Ok(())
}
