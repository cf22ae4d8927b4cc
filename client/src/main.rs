use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use hikejo_client::{
    ApiClient,
    stats::{BookingStats, can_cancel, can_edit},
};
use records::{
    accounts::Gender,
    bookings::{BookingRequest, BookingWithTrip, Participant},
    pages::{ContactRequest, PageSlug},
    trips::TripListing,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "HIKEJO_URL", default_value = "http://localhost:3000")]
    url: String,

    /// Bearer token from `hikejo login`.
    #[arg(long, env = "HIKEJO_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upcoming trips from every company.
    Trips,
    Companies,
    /// Print a static page: about, faq, terms or privacy.
    Page { slug: PageSlug },
    /// Log in and print the token. Pass --company-id to log in as a company.
    Login {
        #[arg(long, conflicts_with = "company_id", required_unless_present = "company_id")]
        email: Option<String>,
        #[arg(long)]
        company_id: Option<String>,
        #[arg(long, env = "HIKEJO_PASSWORD")]
        password: String,
    },
    /// Book a trip, one --participant NAME:AGE:GENDER:PHONE:EMAIL per ticket.
    Book {
        trip: String,
        #[arg(long = "participant", value_parser = parse_participant, required = true)]
        participants: Vec<Participant>,
    },
    MyHikes,
    /// Trips published by the logged-in company.
    MyTrips,
    Cancel { booking: String },
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        message: String,
    },
}

fn parse_participant(raw: &str) -> Result<Participant, String> {
    let fields: Vec<&str> = raw.splitn(5, ':').map(str::trim).collect();

    let [name, age, gender, phone, email] = fields[..] else {
        return Err(format!("expected NAME:AGE:GENDER:PHONE:EMAIL, got `{raw}`"));
    };
    let age = age
        .parse()
        .map_err(|_| format!("invalid age `{age}`"))?;
    let gender = match gender.to_lowercase().as_str() {
        "male" | "m" => Gender::Male,
        "female" | "f" => Gender::Female,
        other => return Err(format!("unknown gender `{other}`")),
    };

    Ok(Participant {
        name: name.to_string(),
        age,
        gender,
        phone_number: phone.to_string(),
        email: email.to_string(),
    })
}

fn print_trip(trip: &TripListing) {
    println!(
        "{}  {}  {}  by {} ({:.2} JOD, {:?})",
        trip.id,
        trip.details.date.format("%Y-%m-%d"),
        trip.details.title,
        trip.company.company_name,
        trip.details.price,
        trip.details.difficulty_level,
    );
}

fn print_booking(booking: &BookingWithTrip, now: chrono::DateTime<Utc>) {
    let hint = if can_cancel(booking, now) { "" } else { "  (locked)" };

    println!(
        "{}  {}  {}  {} ticket(s){hint}",
        booking.id,
        booking.trip.date().format("%Y-%m-%d"),
        booking.trip.details.title,
        booking.ticket_count,
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut api = ApiClient::new(&args.url)?;
    if let Some(token) = args.token {
        api = api.with_token(token);
    }

    match args.command {
        Command::Trips => {
            let trips = api.upcoming_trips().await?;
            trips.iter().for_each(print_trip);
            println!("{} upcoming trip(s)", trips.len());
        }
        Command::Companies => {
            for company in api.companies().await? {
                println!(
                    "{}  {}  {}  {}",
                    company.id,
                    company.company_name,
                    company.location,
                    company.website.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Page { slug } => {
            let page = api.page(slug).await?;
            println!("{}", page.html_content);
        }
        Command::Login {
            email,
            company_id,
            password,
        } => {
            match (email, company_id) {
                (Some(email), _) => {
                    let adventurer = api.login_adventurer(&email, &password).await?;
                    eprintln!("Logged in as {} {}", adventurer.first_name, adventurer.last_name);
                }
                (None, Some(company_id)) => {
                    let company = api.login_company(&company_id, &password).await?;
                    eprintln!("Logged in as {}", company.company_name);
                }
                (None, None) => bail!("Provide --email or --company-id"),
            }

            println!("{}", api.token().context("Server returned no token")?);
        }
        Command::Book { trip, participants } => {
            let request = BookingRequest {
                ticket_count: participants.len() as u32,
                participants,
            };
            let booking = api.book(&trip, &request).await?;
            println!("Booking confirmed: {}", booking.id);
        }
        Command::MyHikes => {
            let now = Utc::now();
            let hikes = api.my_hikes().await?;
            if hikes.is_empty() {
                println!("No hikes booked yet");
                return Ok(());
            }

            for (label, group) in [
                ("Upcoming", &hikes.upcoming),
                ("Past", &hikes.past),
                ("Cancelled", &hikes.cancelled),
            ] {
                println!("{label}:");
                group.iter().for_each(|booking| print_booking(booking, now));
            }

            let stats = BookingStats::from_hikes(&hikes);
            println!(
                "{} booking(s), {} active, {} cancelled, {} participant(s)",
                stats.total, stats.active, stats.cancelled, stats.participants
            );
            if let (Some(booked), Some(cancelled)) = (stats.booking_rate(), stats.cancellation_rate()) {
                println!("Booking rate {booked}%, cancellation rate {cancelled}%");
            }
        }
        Command::MyTrips => {
            let now = Utc::now();

            let trips = api.my_trips().await?;
            if trips.is_empty() {
                println!("No trips published yet");
                return Ok(());
            }

            for trip in &trips {
                let hint = if can_edit(trip.details.date, now) { "" } else { "  (locked)" };

                println!(
                    "{}  {}  {}  {} spot(s){hint}",
                    trip.id,
                    trip.details.date.format("%Y-%m-%d"),
                    trip.details.title,
                    trip.details.max_participants,
                );
            }
        }
        Command::Cancel { booking } => {
            let booking = api.cancel_booking(&booking).await?;
            println!("Booking {} cancelled", booking.id);
        }
        Command::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let request = ContactRequest {
                name,
                email,
                subject,
                message,
            };
            api.contact(&request).await?;
            println!("Message sent");
        }
    }

    Ok(())
}
