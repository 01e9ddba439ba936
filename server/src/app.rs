//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig, Commands, SystemCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::DocumentStoreService;
use crate::data::cache::CacheService;
use crate::domain::BuildPipeline;
use crate::domain::suggest::corpus;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub store: Arc<DocumentStoreService>,
    pub cache: Arc<CacheService>,
    pub pipeline: Arc<BuildPipeline>,
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
            }) => Self::handle_system_command(system_cmd),
            Some(Commands::Build) => {
                let app = Self::init(&cli_config).await?;
                app.run_build().await
            }
            Some(Commands::Serve) | None => {
                let app = Self::init(&cli_config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init().await?;

        let cache = Arc::new(
            CacheService::new(&config.database.cache_config())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to initialize cache service: {}", e))?,
        );
        tracing::debug!(backend = cache.backend_name(), "Cache initialized");

        let store = Arc::new(
            DocumentStoreService::init(
                config.database.store,
                &storage,
                config.database.postgres.as_ref(),
            )
            .await
            .context("Failed to initialize document store")?,
        );
        tracing::debug!(backend = %store.backend(), "Document store initialized");

        let source = corpus::from_config(&config.corpus)
            .context("Failed to initialize corpus source")?;
        let pipeline = Arc::new(BuildPipeline::new(source, store.repository()));

        let shutdown = ShutdownService::new(store.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            store,
            cache,
            pipeline,
        })
    }

    fn handle_system_command(cmd: SystemCommands) -> Result<()> {
        match cmd {
            SystemCommands::Prune { yes } => Self::prune_data(yes),
        }
    }

    /// One-shot rebuild for the `build` subcommand
    async fn run_build(self) -> Result<()> {
        let result = self.pipeline.run().await;
        self.store.close().await;

        let report = result.context("Build failed")?;
        println!("Records:   {}", report.records);
        println!("Documents: {}", report.documents);
        println!("Elapsed:   {} ms", report.elapsed.as_millis());
        Ok(())
    }

    fn prune_data(skip_confirm: bool) -> Result<()> {
        let data_dir = AppStorage::resolve_data_dir();

        if !data_dir.exists() {
            println!(
                "Nothing to prune. Data directory does not exist: {}",
                data_dir.display()
            );
            return Ok(());
        }

        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        println!("This will permanently delete the local prefix store:");
        println!("  {}", data_dir.display());
        println!();
        println!("Stop the server first. The next `build` recreates every prefix document.");

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
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

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
        // Before anything that can block
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        tracing::info!(
            store = %app.store.backend(),
            cache = app.cache.backend_name(),
            data_dir = %app.storage.data_dir().display(),
            "Typeahead starting"
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    async fn start_background_tasks(&self) {
        let maintenance = self.store.start_maintenance_task(self.shutdown.subscribe());
        self.shutdown.register(maintenance).await;

        match self.config.build.interval {
            Some(period) => {
                let schedule = self
                    .pipeline
                    .start_schedule_task(period, self.shutdown.subscribe());
                self.shutdown.register(schedule).await;
            }
            None => tracing::debug!("Scheduled builds disabled by config"),
        }

        tracing::debug!("Background tasks started");
    }
}
