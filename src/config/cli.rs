use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "membership-portal")]
#[command(about = "Route gate checks and membership notifications")]
pub struct CliConfig {
    #[arg(long, help = "Optional TOML file overriding routes and notifier settings")]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Evaluate a request target against the route table
    Route {
        /// Path with optional query, e.g. `/dashboard/settings?tab=profile`
        target: String,

        #[arg(long)]
        logged_in: bool,
    },
    /// Send a membership-application notification
    #[command(subcommand)]
    Notify(NotifyCommand),
    /// Send an account email
    #[command(subcommand)]
    Mail(MailCommand),
}

#[derive(Debug, Clone, Args)]
pub struct ApplicantArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub whatsapp: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum NotifyCommand {
    /// Alert the membership secretaries about a new application
    NewApplication {
        /// Recipients; falls back to `notification_emails` from the config file
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,

        #[command(flatten)]
        applicant: ApplicantArgs,
    },
    Approved {
        #[command(flatten)]
        applicant: ApplicantArgs,

        #[arg(long)]
        notes: Option<String>,
    },
    Rejected {
        #[command(flatten)]
        applicant: ApplicantArgs,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum MailCommand {
    TwoFactor {
        #[arg(long)]
        to: String,
        #[arg(long)]
        token: String,
    },
    Reset {
        #[arg(long)]
        to: String,
        #[arg(long)]
        token: String,
    },
    Verify {
        #[arg(long)]
        to: String,
        #[arg(long)]
        token: String,
    },
    Notify {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        content: String,
    },
}
