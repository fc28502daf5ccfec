use clap::Parser;
use membership_portal::config::cli::{ApplicantArgs, Command, LogFormat, MailCommand, NotifyCommand};
use membership_portal::utils::{logger, validation::Validate};
use membership_portal::{
    AccountMailer, Applicant, CliConfig, GateDecision, NotificationDispatcher,
    NotifierConfig, PortalToml, ResendClient, RouteGate,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }

    tracing::info!("Starting membership-portal CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let file_config = match &cli.config {
        Some(path) => PortalToml::from_file(path)?,
        None => PortalToml::default(),
    };
    let notifier = file_config.apply_to(NotifierConfig::from_env());

    // 驗證配置
    if let Err(e) = file_config.validate().and_then(|_| notifier.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match cli.command {
        Command::Route { target, logged_in } => {
            let gate = RouteGate::new(file_config.route_table());
            match gate.decide_target(&target, logged_in) {
                GateDecision::Continue => println!("continue"),
                GateDecision::Redirect { location } => println!("redirect {}", location),
            }
        }
        Command::Notify(command) => {
            let dispatcher =
                NotificationDispatcher::new(ResendClient::from_config(&notifier), notifier)?;
            let report = match command {
                NotifyCommand::NewApplication { to, applicant } => {
                    let recipients = if to.is_empty() {
                        file_config.notification_emails()
                    } else {
                        to
                    };
                    dispatcher
                        .notify_new_application(&recipients, &applicant_from(applicant))
                        .await
                }
                NotifyCommand::Approved { applicant, notes } => {
                    dispatcher
                        .notify_application_approved(&applicant_from(applicant), notes.as_deref())
                        .await
                }
                NotifyCommand::Rejected { applicant, notes } => {
                    dispatcher
                        .notify_application_rejected(&applicant_from(applicant), notes.as_deref())
                        .await
                }
            };
            println!("{}", report.to_json_pretty()?);
            if report.has_failures() {
                std::process::exit(2);
            }
        }
        Command::Mail(command) => {
            let mailer = AccountMailer::new(ResendClient::from_config(&notifier), notifier);
            let receipt = match command {
                MailCommand::TwoFactor { to, token } => {
                    mailer.send_two_factor_token_email(&to, &token).await
                }
                MailCommand::Reset { to, token } => mailer.send_password_reset_email(&to, &token).await,
                MailCommand::Verify { to, token } => mailer.send_verification_email(&to, &token).await,
                MailCommand::Notify {
                    to,
                    subject,
                    content,
                } => match mailer.send_email_notification(&to, &subject, &content).await {
                    Ok(receipt) => receipt,
                    Err(e) => {
                        eprintln!("❌ {}", e.user_friendly_message());
                        // 設定錯誤與驗證失敗同樣以 1 結束
                        std::process::exit(if e.is_config_error() { 1 } else { 2 });
                    }
                },
            };
            match receipt {
                Some(receipt) => println!("✅ sent {}", receipt.id.unwrap_or_default()),
                None => println!("ℹ️ not sent (see log)"),
            }
        }
    }

    Ok(())
}

fn applicant_from(args: ApplicantArgs) -> Applicant {
    Applicant {
        name: args.name,
        email: args.email,
        phone: args.phone,
        whatsapp: args.whatsapp,
    }
}
