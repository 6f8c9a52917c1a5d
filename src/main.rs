use std::sync::Arc;

use log::LevelFilter;
use pingora_core::server::{configuration::Opt, Server};

use algosix::{
    api::ApiHttpApp,
    config::Config,
    core::ConfigSource,
    logging::{init_stderr_logger, Logger},
    service::{health::self_test, ServiceContainer},
};

fn main() {
    // Read command-line arguments
    let cli_options = Opt::parse_args();
    let source = if cli_options.conf.is_some() {
        ConfigSource::Yaml
    } else {
        ConfigSource::Defaults
    };

    let config = match Config::load_yaml_with_opt_override(&cli_options) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    let logger = if let Some(log_cfg) = &config.log {
        let logger = Logger::new(log_cfg.clone());
        logger.init_env_logger();
        Some(logger)
    } else {
        init_stderr_logger(LevelFilter::Info);
        None
    };

    let services = match ServiceContainer::new(config.limits.clone()) {
        Ok(services) => Arc::new(services),
        Err(e) => {
            eprintln!("Failed to initialize services: {e}");
            std::process::exit(1);
        }
    };

    log::info!("Running startup self-test...");
    if let Err(e) = self_test() {
        log::error!("Startup self-test failed: {e}");
        eprintln!("Startup self-test failed: {e}");
        std::process::exit(1);
    }
    services.readiness().mark_ready(source);

    let Config {
        pingora,
        api,
        status,
        ..
    } = config;
    let mut algosix_server = Server::new_with_opt_and_conf(Some(cli_options), pingora);

    // Add log service
    if let Some(log_service) = logger {
        log::info!("Adding log sync service...");
        algosix_server.add_service(log_service);
    }

    log::info!("Adding API listener on {}...", api.address);
    let api_service = ApiHttpApp::api_http_service(&api, services.clone());
    algosix_server.add_service(api_service);

    if let Some(status) = &status {
        log::info!("Adding status listener on {}...", status.address);
        let status_service = ApiHttpApp::status_http_service(&api, status, services.clone());
        algosix_server.add_service(status_service);
    }

    log::info!("Endpoints: /api/v1/median, /api/v1/median/batch, /api/v1/median/stats");
    log::info!(
        "Endpoints: /api/v1/palindrome/pairs, /api/v1/palindrome/check, \
         /api/v1/palindrome/longest, /api/v1/palindrome/batch, /api/v1/palindrome/stats"
    );
    log::info!("Probes: /health, /status, /ready, /live, /metrics");

    log::info!("Bootstrapping...");
    algosix_server.bootstrap();

    log::info!("Starting Server...");
    algosix_server.run_forever();
}
