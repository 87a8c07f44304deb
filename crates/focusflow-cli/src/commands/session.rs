//! Session planning commands for CLI.

use clap::Subcommand;
use focusflow_core::{parse_tasks, Config, NewSession};

use crate::context::{open_oneshot, print_json, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Plan a new session for today
    Create {
        /// Session title
        title: String,
        /// Subject label
        #[arg(long)]
        subject: String,
        /// Focus minutes (default: config defaults.duration_min)
        #[arg(long)]
        duration: Option<u32>,
        /// Break minutes (default: config defaults.break_min)
        #[arg(long = "break")]
        break_min: Option<u32>,
        /// Checklist item; repeat for several
        #[arg(long = "task")]
        tasks: Vec<String>,
    },
    /// List sessions
    List {
        /// Only today's sessions
        #[arg(long, conflicts_with = "completed")]
        today: bool,
        /// Only completed sessions, across all days
        #[arg(long)]
        completed: bool,
    },
    /// Show one session (default: the latest of today)
    Show {
        /// Session ID
        id: Option<String>,
    },
}

pub fn run(action: SessionAction) -> CliResult {
    let config = Config::load_or_default();
    let mut app = open_oneshot(&config)?;

    match action {
        SessionAction::Create {
            title,
            subject,
            duration,
            break_min,
            tasks,
        } => {
            let title = title.trim().to_string();
            let subject = subject.trim().to_string();
            if title.is_empty() || subject.is_empty() {
                return Err("title and subject must not be empty".into());
            }
            let session = app.create_session(NewSession {
                title,
                subject,
                duration_min: duration.unwrap_or(config.defaults.duration_min),
                break_min: break_min.unwrap_or(config.defaults.break_min),
                tasks: parse_tasks(&tasks.join("\n")),
            });
            eprintln!("Session created: {}", session.id);
            print_json(&session)?;
        }
        SessionAction::List { today, completed } => {
            if today {
                print_json(&app.list_today())?;
            } else if completed {
                print_json(&app.list_completed())?;
            } else {
                print_json(&app.sessions())?;
            }
        }
        SessionAction::Show { id } => {
            let session = match id {
                Some(id) => app.get(&id).ok_or_else(|| format!("session {id} not found"))?,
                None => app.active().ok_or("no session today")?,
            };
            print_json(session)?;
        }
    }
    Ok(())
}
