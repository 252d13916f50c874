
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use portal::config::DEFAULT_API_URL;
use portal::net::types::{BaggageStatus, Flight, GateStatus, Ticket};
use portal::pages::admin::{AdminPage, GateForm};
use portal::pages::book_flight::{BookFlightPage, BookingForm};
use portal::pages::bookings::BookingsPage;
use portal::pages::home::{HomePage, SearchForm};
use portal::pages::login::{LoginPage, RegisterPage};
use portal::pages::profile::ProfileView;
use portal::routes::{Guard, GuardOutcome, nav_links};
use portal::util::format::format_date_time;
use portal::{App, ClientConfig, ClientError, Route, Session, ViewHandle};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("not signed in; run `airport login` first")]
    NotSignedIn,
    #[error("this command needs a staff or admin account")]
    NotPermitted,
    #[error("unknown status `{0}`")]
    InvalidStatus(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "airport", about = "Airport booking and operations CLI")]
struct Cli {
    #[arg(long, env = "AIRPORT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory holding the persisted session.
    #[arg(long, env = "AIRPORT_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    Flights(FlightsCommand),
    Bookings(BookingsCommand),
    Ops(OpsCommand),
}

#[derive(Args, Debug)]
struct FlightsCommand {
    #[command(subcommand)]
    command: FlightsSubcommand,
}

#[derive(Subcommand, Debug)]
enum FlightsSubcommand {
    Search {
        origin: String,
        destination: String,
        /// Departure date as YYYY-MM-DD.
        #[arg(long, default_value = "")]
        date: String,
        /// One line per flight instead of JSON.
        #[arg(long, default_value_t = false)]
        plain: bool,
    },
    Show {
        flight_id: i64,
    },
}

#[derive(Args, Debug)]
struct BookingsCommand {
    #[command(subcommand)]
    command: BookingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum BookingsSubcommand {
    List {
        #[arg(long, default_value_t = false)]
        plain: bool,
    },
    Book {
        flight_id: i64,
        #[arg(long)]
        passport: String,
        #[arg(long)]
        phone: String,
    },
    Cancel {
        ticket_id: i64,
    },
    Baggage,
}

#[derive(Args, Debug)]
struct OpsCommand {
    #[command(subcommand)]
    command: OpsSubcommand,
}

#[derive(Subcommand, Debug)]
enum OpsSubcommand {
    Gates(GatesCommand),
    Baggage(BaggageCommand),
}

#[derive(Args, Debug)]
struct GatesCommand {
    #[command(subcommand)]
    command: GatesSubcommand,
}

#[derive(Subcommand, Debug)]
enum GatesSubcommand {
    List,
    Create {
        #[arg(long)]
        terminal: String,
        #[arg(long)]
        code: String,
        #[arg(long, default_value = "OPEN")]
        status: String,
    },
}

#[derive(Args, Debug)]
struct BaggageCommand {
    #[command(subcommand)]
    command: BaggageSubcommand,
}

#[derive(Subcommand, Debug)]
enum BaggageSubcommand {
    List,
    CheckIn {
        ticket_id: i64,
    },
    /// Move a bag to its next handling step.
    Advance {
        baggage_id: i64,
    },
    Set {
        baggage_id: i64,
        status: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let defaults = ClientConfig::from_env();
    let config = ClientConfig::new(cli.api_url, cli.session_dir.unwrap_or(defaults.session_dir))
        .with_timeouts(defaults.timeouts);
    let mut app = App::from_config(&config)?;

    let result = run(&mut app, cli.command).await;
    let handled = app.process_events();
    tracing::debug!(handled, route = %app.current_route(), "client events drained");
    result
}

async fn run(app: &mut App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Register { name, email, password } => {
            app.navigate(Route::Register);
            let mut page = RegisterPage {
                full_name: name,
                email,
                password,
                ..RegisterPage::default()
            };
            page.submit(app).await?;
            println!("{}", page.status.notice.unwrap_or_default());
            Ok(())
        }
        Command::Login { email, password } => {
            app.navigate(Route::Login);
            let identity = LoginPage::new(email, password).submit(app).await?;
            print_json(&identity)
        }
        Command::Logout => {
            app.logout()?;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => run_whoami(app),
        Command::Flights(flights) => run_flights(app, flights).await,
        Command::Bookings(bookings) => run_bookings(app, bookings).await,
        Command::Ops(ops) => run_ops(app, ops).await,
    }
}

fn run_whoami(app: &mut App) -> Result<(), CliError> {
    enter(app, Route::Profile)?;
    let session = app.session();
    let Some(profile) = ProfileView::from_session(&session) else {
        return Err(CliError::NotSignedIn);
    };
    let views: Vec<String> = nav_links(&session).into_iter().map(Route::path).collect();
    print_json(&json!({
        "full_name": profile.full_name,
        "email": profile.email,
        "role": profile.role,
        "signed_in_since": profile.signed_in_since,
        "views": views,
    }))
}

async fn run_flights(app: &mut App, flights: FlightsCommand) -> Result<(), CliError> {
    match flights.command {
        FlightsSubcommand::Search {
            origin,
            destination,
            date,
            plain,
        } => {
            let view = app.navigate(Route::Home);
            let mut page = HomePage::default();
            let form = SearchForm { origin, destination, date };
            page.search(app.api(), &view, &form).await?;
            let flights = page.flights.unwrap_or_default();
            if !plain {
                return print_json(&flights);
            }
            for f in &flights {
                println!("{}", flight_line(f));
            }
            Ok(())
        }
        FlightsSubcommand::Show { flight_id } => {
            let view = enter(app, Route::BookFlight { flight_id })?;
            let mut page = BookFlightPage::new(flight_id);
            page.load(app.api(), &view).await?;
            print_json(&page.flight)
        }
    }
}

async fn run_bookings(app: &mut App, bookings: BookingsCommand) -> Result<(), CliError> {
    match bookings.command {
        BookingsSubcommand::List { plain } => {
            let view = enter(app, Route::Bookings)?;
            let mut page = BookingsPage::default();
            page.load(app.api(), &view).await?;
            if !plain {
                return print_json(&page.tickets);
            }
            for t in &page.tickets {
                println!("{}", ticket_line(t));
            }
            Ok(())
        }
        BookingsSubcommand::Book {
            flight_id,
            passport,
            phone,
        } => {
            enter(app, Route::BookFlight { flight_id })?;
            let mut page = BookFlightPage::new(flight_id);
            let form = BookingForm {
                passport_no: passport,
                phone,
            };
            let ticket = page.submit(app, &form).await?;
            print_json(&ticket)
        }
        BookingsSubcommand::Cancel { ticket_id } => {
            let view = enter(app, Route::Bookings)?;
            let mut page = BookingsPage::default();
            page.cancel(app.api(), &view, ticket_id).await?;
            println!("{}", page.status.notice.unwrap_or_default());
            Ok(())
        }
        BookingsSubcommand::Baggage => {
            let view = enter(app, Route::Bookings)?;
            let mut page = BookingsPage::default();
            page.toggle_baggage(app.api(), &view).await?;
            print_json(&page.baggage.unwrap_or_default())
        }
    }
}

async fn run_ops(app: &mut App, ops: OpsCommand) -> Result<(), CliError> {
    let view = match ops_guard(&ops.command) {
        Guard::Role => enter(app, Route::Admin)?,
        guard => {
            require(guard, &app.session())?;
            app.navigator().handle()
        }
    };
    let mut page = AdminPage::default();
    match ops.command {
        OpsSubcommand::Gates(gates) => match gates.command {
            GatesSubcommand::List => {
                page.reload_gates(app.api(), &view).await?;
                print_json(&page.gates)
            }
            GatesSubcommand::Create { terminal, code, status } => {
                let form = GateForm {
                    terminal_id: terminal,
                    code,
                    status: parse_status::<GateStatus>(&status, GateStatus::Unknown)?,
                };
                page.create_gate(app.api(), &view, &form).await?;
                print_json(&page.gates)
            }
        },
        OpsSubcommand::Baggage(baggage) => match baggage.command {
            BaggageSubcommand::List => {
                page.reload_baggage(app.api(), &view).await?;
                print_json(&page.baggage)
            }
            BaggageSubcommand::CheckIn { ticket_id } => {
                page.check_in(app.api(), &view, ticket_id).await?;
                print_json(&page.baggage)
            }
            BaggageSubcommand::Advance { baggage_id } => {
                page.reload_baggage(app.api(), &view).await?;
                page.advance_baggage(app.api(), &view, baggage_id).await?;
                print_json(&page.baggage)
            }
            BaggageSubcommand::Set { baggage_id, status } => {
                let status = parse_status::<BaggageStatus>(&status, BaggageStatus::Unknown)?;
                page.set_baggage_status(app.api(), &view, baggage_id, status).await?;
                print_json(&page.baggage)
            }
        },
    }
}

/// Guard for an ops subcommand. Listing gates only needs a signed-in user;
/// everything else needs staff or admin.
fn ops_guard(command: &OpsSubcommand) -> Guard {
    match command {
        OpsSubcommand::Gates(GatesCommand {
            command: GatesSubcommand::List,
        }) => Guard::Authenticated,
        _ => Guard::Role,
    }
}

fn require(guard: Guard, session: &Session) -> Result<(), CliError> {
    match guard.check(session) {
        GuardOutcome::Proceed => Ok(()),
        GuardOutcome::Redirect(Route::Login) => Err(CliError::NotSignedIn),
        GuardOutcome::Redirect(_) => Err(CliError::NotPermitted),
    }
}

/// Navigate through the route guard and fail if it redirected.
fn enter(app: &mut App, route: Route) -> Result<ViewHandle, CliError> {
    let view = app.navigate(route);
    match app.current_route() {
        landed if landed == route => Ok(view),
        Route::Login => Err(CliError::NotSignedIn),
        _ => Err(CliError::NotPermitted),
    }
}

/// Parse a status name (any case) into one of the wire enums.
fn parse_status<T>(raw: &str, unknown: T) -> Result<T, CliError>
where
    T: DeserializeOwned + PartialEq,
{
    let name = raw.trim().to_ascii_uppercase().replace('-', "_");
    let status: T = serde_json::from_value(Value::String(name))?;
    if status == unknown {
        return Err(CliError::InvalidStatus(raw.to_owned()));
    }
    Ok(status)
}

fn flight_line(f: &Flight) -> String {
    format!(
        "{:>6}  {:<8} {} -> {}  {}  {}",
        f.id,
        f.flight_no,
        f.origin,
        f.destination,
        format_date_time(f.departure_time),
        f.status.as_str()
    )
}

fn ticket_line(t: &Ticket) -> String {
    format!(
        "{:>6}  flight {:<6} seat {:<4} {:>9.2}  {}  {}",
        t.id,
        t.flight_id,
        t.seat_no.as_deref().unwrap_or("-"),
        t.price,
        t.status.as_str(),
        format_date_time(t.created_at)
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
