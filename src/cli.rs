use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};

use crate::domain::{
    booking::{BookingAction, BookingStatus},
    kyc::KycDocument,
};

#[derive(Debug, Parser)]
#[command(name = "pdesk", about = "Provider dashboard for the marketplace (CLI + TUI)")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Update the cached profile; shows it when no field is given
    Profile(ProfileArgs),
    /// Full-screen messaging dashboard
    Chat,
    /// Print the conversation list
    Conversations {
        /// Keep only rows whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the thread with a peer and mark it read
    Thread { peer_id: String },
    /// Send a text message
    Send {
        peer_id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Share a file by name with a peer
    Attach { peer_id: String, file: PathBuf },
    /// List bookings
    Bookings {
        /// PENDING, CONFIRMED, CHECKED_IN, COMPLETED, CANCELLED or REJECTED
        #[arg(long)]
        status: Option<BookingStatus>,
    },
    /// Move a booking along: accept, reject, checkin or complete
    Booking {
        booking_id: String,
        action: BookingAction,
        /// Sent with `reject` only
        #[arg(long)]
        reason: Option<String>,
    },
    /// Rate the customer of a completed booking
    RateCustomer {
        booking_id: String,
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
    /// List services
    Services,
    /// Create a service
    ServiceAdd(ServiceArgs),
    /// Replace a service
    ServiceUpdate {
        service_id: String,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Delete a service
    ServiceDelete { service_id: String },
    /// Switch a service between active and inactive
    ServiceToggle { service_id: String },
    /// List calendar events
    Calendar {
        #[arg(long, value_parser = parse_time)]
        start: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_time)]
        end: Option<DateTime<Utc>>,
    },
    /// Block a time span
    Block {
        #[arg(value_parser = parse_time)]
        start: DateTime<Utc>,
        #[arg(value_parser = parse_time)]
        end: DateTime<Utc>,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Remove a blocked span
    Unblock { block_id: String },
    /// List reviews
    Reviews,
    /// Reply to a review
    ReviewReply {
        review_id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Report a review
    ReviewReport {
        review_id: String,
        #[arg(required = true, num_args = 1..)]
        reason: Vec<String>,
    },
    /// Upload KYC documents given as TYPE=path
    Kyc {
        #[arg(required = true, num_args = 1..)]
        documents: Vec<KycDocument>,
    },
    /// Dashboard numbers
    Stats,
}

#[derive(Debug, Clone, Args)]
pub struct ServiceArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price: f64,
    /// Duration in minutes
    #[arg(long)]
    pub duration: u32,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub business_name: Option<String>,
    #[arg(long)]
    pub avatar: Option<String>,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }
}

/// Accepts RFC 3339 or local `YYYY-MM-DD HH:MM` (also with a `T`).
fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| format!("expected RFC 3339 or YYYY-MM-DD HH:MM, got: {value}"))
}
