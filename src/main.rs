use std::path::PathBuf;

use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use courtside::api::FacilityQuery;
use courtside::config::AppConfig;
use courtside::handlers;
use courtside::handlers::catalog::BookArgs;
use courtside::handlers::schedule::HoursEdit;
use courtside::models::{parse_date, parse_time, DayOfWeek, NewCalendarException, PaymentKind, Tier, User};
use courtside::state::AppState;

#[derive(Parser)]
#[command(name = "courtside", version, about = "Book sports courts and pay from the terminal")]
struct Cli {
    /// Backend API base URL
    #[arg(long, env = "API_BASE_URL", global = true)]
    api: Option<String>,

    /// Use this bearer token for the call instead of the stored session
    #[arg(long, env = "COURTSIDE_TOKEN", global = true, hide_env_values = true)]
    bearer: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the stored sign-in token
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// List sport types
    Sports,
    /// Search facilities
    Facilities {
        #[command(flatten)]
        search: SearchArgs,
    },
    /// List the courts of a facility
    Courts { facility_id: i64 },
    /// List the slots of a court on a day
    Slots {
        court_id: i64,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "Normal")]
        tier: Tier,
    },
    /// Book a slot and pay the deposit
    Book {
        #[command(flatten)]
        search: SearchArgs,
        #[arg(long)]
        facility: i64,
        #[arg(long)]
        court: i64,
        #[arg(long)]
        slot: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Book without opening the deposit checkout
        #[arg(long)]
        no_pay: bool,
        #[command(flatten)]
        qr: QrArgs,
    },
    /// List my bookings
    Bookings {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Show one booking
    Booking { booking_id: i64 },
    /// Pay the deposit or balance of a booking
    Pay {
        booking_id: i64,
        #[arg(long, default_value = "deposit")]
        kind: PaymentKind,
        #[command(flatten)]
        qr: QrArgs,
    },
    /// Review a completed booking
    Review {
        booking_id: i64,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
    /// List available and owned packages
    Packages,
    /// Buy a package
    BuyPackage {
        package_id: i64,
        #[command(flatten)]
        qr: QrArgs,
    },
    /// Weekly operating hours of a court
    Hours {
        court_id: i64,
        #[command(subcommand)]
        action: HoursAction,
    },
    /// Date-specific calendar exceptions of a court
    Exceptions {
        court_id: i64,
        #[command(subcommand)]
        action: ExceptionsAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store a token, with optional profile details
    SetToken {
        token: String,
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Show,
    Clear,
}

#[derive(Subcommand)]
enum HoursAction {
    Show,
    /// Set open and close times for a day
    Set {
        #[arg(value_parser = parse_day)]
        day: DayOfWeek,
        #[arg(value_parser = parse_time)]
        open: NaiveTime,
        #[arg(value_parser = parse_time)]
        close: NaiveTime,
    },
    Close {
        #[arg(value_parser = parse_day)]
        day: DayOfWeek,
    },
    Open {
        #[arg(value_parser = parse_day)]
        day: DayOfWeek,
    },
    /// Drop the saved schedule and fall back to defaults
    Reset,
}

#[derive(Subcommand)]
enum ExceptionsAction {
    List {
        #[command(flatten)]
        range: RangeArgs,
    },
    Add {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        closed: bool,
        #[arg(long, value_parser = parse_time)]
        open: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time)]
        close: Option<NaiveTime>,
        #[arg(long)]
        reason: Option<String>,
    },
    Remove {
        exception_id: i64,
        #[arg(short, long)]
        yes: bool,
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(long)]
    sport: Option<i64>,
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    #[arg(long, default_value = "Normal")]
    tier: Tier,
}

impl SearchArgs {
    fn into_query(self) -> FacilityQuery {
        FacilityQuery {
            sport_type_id: self.sport,
            date: self.date.unwrap_or_else(today),
            tier: self.tier,
        }
    }
}

#[derive(clap::Args)]
struct RangeArgs {
    #[arg(long, value_parser = parse_date, requires = "to")]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date, requires = "from")]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    fn pair(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.from.zip(self.to)
    }
}

#[derive(clap::Args)]
struct QrArgs {
    /// Write the checkout QR code PNG here
    #[arg(long)]
    qr_out: Option<PathBuf>,
}

fn parse_day(s: &str) -> Result<DayOfWeek, String> {
    DayOfWeek::from_key(s).ok_or_else(|| format!("invalid day of week: {s}"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(api) = cli.api {
        config.api_base_url = api;
    }
    let injected = cli.bearer.map(User::with_token);
    let state = AppState::init(config, injected.as_ref())?;
    tracing::debug!(api = %state.api.base_url(), "client ready");

    match cli.command {
        Command::Session { action } => match action {
            SessionAction::SetToken {
                token,
                id,
                name,
                email,
            } => {
                let user = User {
                    id,
                    name,
                    email,
                    token,
                };
                handlers::session::set_token(&state, &user)?;
            }
            SessionAction::Show => handlers::session::show(&state)?,
            SessionAction::Clear => handlers::session::clear(&state)?,
        },
        Command::Sports => handlers::catalog::sport_types(&state).await?,
        Command::Facilities { search } => {
            handlers::catalog::facilities(&state, search.into_query()).await?
        }
        Command::Courts { facility_id } => handlers::catalog::courts(&state, facility_id).await?,
        Command::Slots { court_id, date, tier } => {
            handlers::catalog::slots(&state, court_id, date.unwrap_or_else(today), tier).await?
        }
        Command::Book {
            search,
            facility,
            court,
            slot,
            yes,
            no_pay,
            qr,
        } => {
            let args = BookArgs {
                query: search.into_query(),
                facility_id: facility,
                court_id: court,
                slot_id: slot,
                assume_yes: yes,
                skip_payment: no_pay,
            };
            handlers::catalog::book(&state, args, qr.qr_out.as_deref()).await?
        }
        Command::Bookings { date } => handlers::bookings::list(&state, date).await?,
        Command::Booking { booking_id } => handlers::bookings::show(&state, booking_id).await?,
        Command::Pay { booking_id, kind, qr } => {
            handlers::bookings::pay(&state, booking_id, kind, qr.qr_out.as_deref()).await?
        }
        Command::Review {
            booking_id,
            rating,
            comment,
        } => handlers::bookings::review(&state, booking_id, rating, comment).await?,
        Command::Packages => handlers::packages::list(&state).await?,
        Command::BuyPackage { package_id, qr } => {
            handlers::packages::buy(&state, package_id, qr.qr_out.as_deref()).await?
        }
        Command::Hours { court_id, action } => {
            let edit = match action {
                HoursAction::Show => HoursEdit::Show,
                HoursAction::Set { day, open, close } => HoursEdit::Set { day, open, close },
                HoursAction::Close { day } => HoursEdit::Close(day),
                HoursAction::Open { day } => HoursEdit::Open(day),
                HoursAction::Reset => HoursEdit::Reset,
            };
            handlers::schedule::hours(&state, court_id, edit).await?
        }
        Command::Exceptions { court_id, action } => match action {
            ExceptionsAction::List { range } => {
                handlers::schedule::list_exceptions(&state, court_id, range.pair()).await?
            }
            ExceptionsAction::Add {
                date,
                closed,
                open,
                close,
                reason,
            } => {
                let draft = NewCalendarException {
                    date,
                    is_closed: closed,
                    open_time: open,
                    close_time: close,
                    reason,
                };
                handlers::schedule::add_exception(&state, court_id, draft).await?
            }
            ExceptionsAction::Remove {
                exception_id,
                yes,
                range,
            } => {
                handlers::schedule::remove_exception(&state, court_id, exception_id, yes, range.pair())
                    .await?
            }
        },
    }

    Ok(())
}
