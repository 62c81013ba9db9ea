//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiServer, AuthManager};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands, SystemCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{
    APP_NAME_LOWER, DEFAULT_ADMIN_EMAIL, ENV_ADMIN_EMAIL, ENV_ADMIN_PASSWORD, ENV_LOG,
};
use crate::core::secret::SecretManager;
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::SqliteService;
use crate::domain::Services;
use crate::domain::services::BootstrapAdmin;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub secrets: SecretManager,
    pub database: Arc<SqliteService>,
    pub services: Services,
    pub auth: Arc<AuthManager>,
    /// Set on the first run, when the administrator account was just created
    pub bootstrap: Option<BootstrapAdmin>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::System {
                command: system_cmd,
            }) => {
                return Self::handle_system_command(&cli_config, system_cmd);
            }
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init(&config).await?;
        let secrets = SecretManager::init(&storage).await?;
        tracing::debug!(backend = secrets.backend().name(), "Secrets initialized");

        let database = Arc::new(
            SqliteService::init(&storage)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to initialize database: {}", e))?,
        );
        let services = Services::new(Arc::new(database.clone()));
        let auth = Arc::new(AuthManager::init(&secrets, config.auth.token_ttl_hours));

        let admin_email = std::env::var(ENV_ADMIN_EMAIL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| config.auth.admin_email.clone())
            .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());
        let admin_password = std::env::var(ENV_ADMIN_PASSWORD)
            .ok()
            .filter(|v| !v.is_empty());
        let bootstrap = services
            .users
            .bootstrap_admin(&admin_email, admin_password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create administrator: {}", e))?;

        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            secrets,
            database,
            services,
            auth,
            bootstrap,
        })
    }

    fn handle_system_command(cli: &CliConfig, cmd: SystemCommands) -> Result<()> {
        match cmd {
            SystemCommands::Prune { yes } => Self::prune_data(cli, yes),
        }
    }

    fn prune_data(cli: &CliConfig, skip_confirm: bool) -> Result<()> {
        let data_dir = AppStorage::resolve_data_dir(cli.data_dir.as_deref());

        if !data_dir.exists() {
            println!(
                "Nothing to prune. Data directory does not exist: {}",
                data_dir.display()
            );
            return Ok(());
        }

        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        println!("This will permanently delete the local data directory:");
        println!("  {}", data_dir.display());
        println!();
        println!(
            "Make sure the server is not running. \
             All boards, users and the signing key will be lost."
        );

        if !skip_confirm {
            print!("\nContinue? [y/N] ");
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;

            if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
                println!("Aborted.");
                return Ok(());
            }
        }

        std::fs::remove_dir_all(&data_dir)
            .with_context(|| format!("Failed to delete data directory: {}", data_dir.display()))?;
        println!("Pruned: {}", data_dir.display());
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.shutdown
            .register(
                app.database
                    .start_checkpoint_task(app.shutdown.subscribe()),
            )
            .await;

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            &app.storage.data_dir().display().to_string(),
            app.bootstrap.as_ref(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
