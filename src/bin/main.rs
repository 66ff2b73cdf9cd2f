use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use gemini_stats::config::{Settings, SettingsArgs};
use gemini_stats::mailer::SmtpMailer;
use gemini_stats::marketplace::gemini::Gemini;
use gemini_stats::pipeline::Pipeline;
use gemini_stats::secrets::aws::AwsSecretsManager;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Emails a summary of Gemini purchases and their current value")]
struct Args {
    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the report and mail it (default)
    Send,
    /// Build the report and print it instead of mailing it
    Preview,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("{}=info,aws_config=warn", env!("CARGO_CRATE_NAME")).into()
        }))
        .with(fmt::layer())
        .init();

    let args = Args::parse();

    let res = match args.command.unwrap_or(Commands::Send) {
        Commands::Send => run_send(args.settings).await,
        Commands::Preview => run_preview(args.settings).await,
    };

    if let Err(err) = &res {
        error!("Invocation failed : {:#}", err);
    }

    res
}

async fn run_send(args: SettingsArgs) -> Result<()> {
    let settings = Settings::try_from(args)?;
    let secrets = AwsSecretsManager::new(&settings.region_name).await;
    let exchange = Gemini::new(&settings.endpoint, &settings.account, settings.limit_trades);
    let mailer = SmtpMailer::new(&settings.smtp_host, settings.smtp_port);

    let outcome = Pipeline::new(&settings, &secrets, &exchange, &mailer)
        .run()
        .await?;

    info!("{} {}", "REPORT SENT".green(), outcome.email.subject);

    Ok(())
}

async fn run_preview(args: SettingsArgs) -> Result<()> {
    let settings = Settings::try_from(args)?;
    let secrets = AwsSecretsManager::new(&settings.region_name).await;
    let exchange = Gemini::new(&settings.endpoint, &settings.account, settings.limit_trades);
    let mailer = SmtpMailer::new(&settings.smtp_host, settings.smtp_port);

    let (_, outcome) = Pipeline::new(&settings, &secrets, &exchange, &mailer)
        .prepare()
        .await?;

    println!("{}", outcome.email.subject);
    println!("{}", outcome.email.body);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_after_subcommand() {
        let args = Args::try_parse_from(["gemini-stats", "preview", "--symbol", "ethusd"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Preview)));
        assert_eq!(args.settings.symbol, "ethusd");

        let args = Args::try_parse_from(["gemini-stats", "--format", "text", "send"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Send)));
        assert_eq!(args.settings.format, "text");
    }

    #[test]
    fn test_args_are_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
