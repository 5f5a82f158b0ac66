// Calendar Planner
// Command-line front end over the client core

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Days, Local, NaiveDate};
use clap::{Parser, Subcommand};

use calendar_planner::config::AppConfig;
use calendar_planner::interaction::{GestureCommit, GestureKind};
use calendar_planner::models::event::Event;
use calendar_planner::models::recurrence::RepeatFrequency;
use calendar_planner::services::api::{EventQuery, HttpCalendarApi};
use calendar_planner::services::calendar::CalendarCache;
use calendar_planner::services::database::Database;
use calendar_planner::services::event::EventCache;
use calendar_planner::services::share::ShareService;
use calendar_planner::services::store::Workspace;
use calendar_planner::services::toast::Notice;
use calendar_planner::utils::date::parse_date;
use calendar_planner::utils::time::{ClockTime, TimeRange};

#[derive(Parser)]
#[command(name = "calendar-planner", version, about = "Plan events against a calendar server")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Work from the local cache without contacting the server
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events, falling back to the local cache when offline
    Agenda {
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=366))]
        days: u32,
    },
    /// Show free and busy start times for a day
    Slots {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        #[arg(long)]
        calendar: Option<String>,
    },
    /// Create an event in the active (or given) calendar
    Add {
        title: String,
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
        #[arg(long)]
        calendar: Option<String>,
        #[arg(long, default_value = "none")]
        repeat: RepeatFrequency,
        #[arg(long)]
        description: Option<String>,
    },
    /// Reschedule an event
    Move {
        id: String,
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    },
    /// Create or open share links
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
    /// Refresh the local cache from the server
    Sync,
}

#[derive(Subcommand)]
enum ShareAction {
    /// Print a share link for an event
    Create { id: String },
    /// Show the event behind a link, optionally importing it
    Open {
        url: String,
        #[arg(long)]
        import: bool,
    },
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Starting Calendar Planner");

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let db_path = config.database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let db = Database::open(&db_path)?;
    let mut api = HttpCalendarApi::new(&config.api)?;
    if cli.offline {
        api.set_sync_enabled(false);
    }
    let mut workspace = Workspace::new(config.grid.time_grid(), config.api.user_id.clone());

    let result = run(cli.command, &config, &db, &api, &mut workspace);

    for toast in workspace.toasts.drain() {
        eprintln!("{} {}", toast.level.icon(), toast.message);
    }
    result
}

fn run(
    command: Commands,
    config: &AppConfig,
    db: &Database,
    api: &HttpCalendarApi,
    workspace: &mut Workspace,
) -> Result<()> {
    match command {
        Commands::Agenda { from, days } => {
            let start = from.unwrap_or_else(|| Local::now().date_naive());
            let end = agenda_end(start, days)?;
            load(db, api, workspace, EventQuery::between(start, end))?;

            let events = workspace.events_between(start, end);
            if events.is_empty() {
                println!("No events between {} and {}", start, end);
            }
            for event in events {
                print_event(workspace, event);
            }
        }
        Commands::Slots { date, calendar } => {
            load(db, api, workspace, EventQuery::between(date, date))?;
            let calendar_id = calendar_or_active(workspace, calendar)?;
            for option in workspace.time_options(&calendar_id, date, None) {
                let mark = if option.busy { "busy" } else { "free" };
                println!("{}  {}", option.time, mark);
            }
        }
        Commands::Add {
            title,
            date,
            start,
            end,
            calendar,
            repeat,
            description,
        } => {
            load(db, api, workspace, EventQuery::default())?;
            let calendar_id = calendar_or_active(workspace, calendar)?;
            let mut builder = Event::builder()
                .title(title)
                .date(date)
                .start_time(start)
                .end_time(end)
                .calendar_id(calendar_id)
                .repeat(repeat);
            if let Some(description) = description {
                builder = builder.description(description);
            }
            let draft = builder.build().map_err(|e| anyhow!(e))?;

            let created = workspace.create_event(api, draft)?;
            for event in &created {
                print_event(workspace, event);
            }
            save(db, api, workspace)?;
        }
        Commands::Move {
            id,
            date,
            start,
            end,
        } => {
            load(db, api, workspace, EventQuery::default())?;
            let commit = GestureCommit {
                event_id: id,
                kind: GestureKind::Drag,
                date,
                range: TimeRange::from_clock(start, end),
            };
            let moved = workspace.reschedule_event(api, &commit)?;
            print_event(workspace, &moved);
            save(db, api, workspace)?;
        }
        Commands::Share { action } => {
            let share = ShareService::new(db.connection(), &config.share);
            share.cleanup_expired()?;
            match action {
                ShareAction::Create { id } => {
                    load(db, api, workspace, EventQuery::default())?;
                    let event = workspace
                        .refresh_event(api, &id)
                        .with_context(|| format!("Event '{}' not found", id))?;
                    match share.create_link(&event) {
                        Ok(url) => {
                            workspace.toasts.notify(Notice::LinkCreated);
                            println!("{}", url);
                        }
                        Err(error) => {
                            workspace.toasts.notify(Notice::ShareError);
                            return Err(error);
                        }
                    }
                }
                ShareAction::Open { url, import } => {
                    let resolved = share.resolve(&url).inspect_err(|_| {
                        workspace.toasts.notify(Notice::InvalidSharedData);
                    })?;
                    let Some(shared) = resolved else {
                        if import {
                            workspace.toasts.notify(Notice::ImportError);
                        }
                        return Err(anyhow!("This share link has expired or does not exist"));
                    };
                    println!(
                        "{}  {} {}-{}",
                        shared.title, shared.date, shared.start_time, shared.end_time
                    );
                    if import {
                        load(db, api, workspace, EventQuery::default())?;
                        workspace.import_shared_event(api, shared)?;
                        save(db, api, workspace)?;
                    }
                }
            }
        }
        Commands::Sync => {
            restore_unsynced(db, workspace)?;
            workspace.fetch_calendars(api)?;
            workspace.fetch_events(api, EventQuery::default())?;
            persist(db, workspace)?;
            println!(
                "Synced {} calendars and {} events",
                workspace.calendars.all().len(),
                workspace.events.len()
            );
            let waiting = workspace.events.unsynced().len();
            if waiting > 0 {
                println!("{} events are still waiting for the server", waiting);
            }
        }
    }
    Ok(())
}

/// Fill the workspace from the server, or from the cache when that fails.
fn load(
    db: &Database,
    api: &HttpCalendarApi,
    workspace: &mut Workspace,
    query: EventQuery,
) -> Result<()> {
    let unsynced = restore_unsynced(db, workspace)?;
    let online = workspace.fetch_calendars(api).is_ok()
        && workspace.fetch_events(api, query).is_ok();
    if online {
        return persist(db, workspace);
    }

    log::warn!("Server unavailable, using cached data");
    let calendars = CalendarCache::new(db.connection()).list_all()?;
    workspace.calendars.replace_all(calendars);
    let events = EventCache::new(db.connection()).list_all()?;
    workspace.events.replace_all(events);
    workspace.events.restore_unsynced(unsynced);
    Ok(())
}

/// Hand events created offline in an earlier run back to the store.
fn restore_unsynced(db: &Database, workspace: &mut Workspace) -> Result<Vec<Event>> {
    let unsynced = EventCache::new(db.connection()).list_unsynced()?;
    if !unsynced.is_empty() {
        log::info!("{} cached events were never sent to the server", unsynced.len());
    }
    workspace.events.restore_unsynced(unsynced.clone());
    Ok(unsynced)
}

/// Reload anything a failed request left stale, then write the cache.
fn save(db: &Database, api: &HttpCalendarApi, workspace: &mut Workspace) -> Result<()> {
    if workspace.refresh_if_dirty(api) {
        log::info!("Reloaded stale data from the server");
    }
    persist(db, workspace)
}

fn persist(db: &Database, workspace: &Workspace) -> Result<()> {
    let unsynced: Vec<&str> = workspace
        .events
        .unsynced()
        .into_iter()
        .map(|event| event.id.as_str())
        .collect();
    db.save_snapshot(workspace.calendars.all(), workspace.events.all(), &unsynced)
}

/// Last day of an agenda of `days` days starting at `start`.
fn agenda_end(start: NaiveDate, days: u32) -> Result<NaiveDate> {
    start
        .checked_add_days(Days::new(u64::from(days.saturating_sub(1))))
        .ok_or_else(|| anyhow!("{} days from {} is past the last supported date", days, start))
}

fn calendar_or_active(workspace: &mut Workspace, calendar: Option<String>) -> Result<String> {
    if let Some(id) = calendar {
        workspace.set_active_calendar(&id)?;
    }
    workspace
        .calendars
        .active_id()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No active calendar selected"))
}

fn print_event(workspace: &Workspace, event: &Event) {
    let calendar = workspace
        .calendars
        .get(&event.calendar_id)
        .map_or(event.calendar_id.as_str(), |calendar| calendar.name.as_str());
    let time = if event.all_day {
        "all day".to_string()
    } else {
        format!("{}-{}", event.start_time, event.end_time)
    };
    let repeat = if event.is_recurring() {
        format!("  ({})", event.repeat.label())
    } else {
        String::new()
    };
    println!(
        "{}  {:<11}  {}{}  [{}]  {}",
        event.date, time, event.title, repeat, calendar, event.id
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agenda_end_includes_start_day() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(agenda_end(start, 1).unwrap(), start);
        assert_eq!(
            agenda_end(start, 7).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
        );
    }

    #[test]
    fn test_agenda_end_past_max_date_is_error() {
        assert!(agenda_end(NaiveDate::MAX, 2).is_err());
    }

    #[test]
    fn test_agenda_days_out_of_range_rejected() {
        for days in ["0", "367", "9223372036854775807"] {
            let parsed = Cli::try_parse_from(["calendar-planner", "agenda", "--days", days]);
            assert!(parsed.is_err(), "--days {} should be rejected", days);
        }
        assert!(Cli::try_parse_from(["calendar-planner", "agenda", "--days", "366"]).is_ok());
    }
}
