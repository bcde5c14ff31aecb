use anyhow::Context;
use clap::Parser;
use wait_for_db::config::env::database_url_from_env;
use wait_for_db::utils::logger;
use wait_for_db::{
    build_probe, CliConfig, ReadinessGate, Ready, TomlConfig, WaitError, WaitSettings,
};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.log_format, config.verbose);

    tracing::info!("Starting wait-for-db");

    match run(&config) {
        Ok(ready) => {
            if config.json {
                match serde_json::to_string(&ready) {
                    Ok(summary) => println!("{}", summary),
                    Err(e) => eprintln!("❌ Failed to serialize summary: {}", e),
                }
            } else {
                println!(
                    "✅ {} available after {} attempt(s)",
                    ready.dependency, ready.attempts
                );
            }
        }
        Err(e) => {
            let exit_code = match e.downcast_ref::<WaitError>() {
                Some(wait_error) => {
                    tracing::error!(
                        "❌ Wait failed: {} (Category: {:?}, Severity: {:?})",
                        wait_error,
                        wait_error.category(),
                        wait_error.severity()
                    );
                    tracing::error!("💡 Recovery suggestion: {}", wait_error.recovery_suggestion());

                    eprintln!("❌ {}", wait_error.user_friendly_message());
                    eprintln!("💡 {}", wait_error.recovery_suggestion());
                    wait_error.exit_code()
                }
                None => {
                    eprintln!("❌ {:#}", e);
                    1
                }
            };
            std::process::exit(exit_code);
        }
    }
}

fn run(config: &CliConfig) -> anyhow::Result<Ready> {
    let file = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let file = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path.display()))?;
            Some(file)
        }
        None => None,
    };

    let settings = WaitSettings::resolve(config, file.as_ref(), database_url_from_env)?;
    tracing::info!(
        "🔧 Target: {}, max attempts: {}, poll interval: {:?}, probe timeout: {:?}",
        settings.target,
        settings
            .policy
            .max_attempts
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unbounded".to_string()),
        settings.policy.poll_interval,
        settings.probe_timeout
    );

    let mut probe = build_probe(&settings.target, settings.probe_timeout)?;
    let gate = ReadinessGate::new(settings.name.clone(), settings.policy);
    let ready = gate.wait_until_ready(probe.as_mut())?;

    Ok(ready)
}
