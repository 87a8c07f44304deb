use clap::Subcommand;
use focusflow_core::{Config, Event, FocusFlow, IntervalScheduler, ReflectionInput};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::distraction::check_kind;
use crate::context::{open_app, open_oneshot, print_json, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Drive the timer interactively; commands are read from stdin
    Run {
        /// Session to bind (default: the latest of today)
        #[arg(long)]
        session: Option<String>,
    },
    /// Print the timer panel state as JSON
    Status,
    /// End today's latest session now. Without reflection flags the
    /// reflection is skipped.
    End {
        /// Focus rating, 1 to 5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,
        /// What went well
        #[arg(long, default_value = "")]
        went_well: String,
        /// What to improve next time
        #[arg(long, default_value = "")]
        improve: String,
    },
}

const RUN_HELP: &str = "commands: start | pause | end | distraction <kind> | \
reflect <1-5|-> <went well> | <improve> | skip | status | quit";

pub fn run(action: TimerAction) -> CliResult {
    let config = Config::load_or_default();

    match action {
        TimerAction::Run { session } => {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()?;
            let result = rt.block_on(run_interactive(config, session));
            // The stdin reader thread may still be blocked on a read.
            rt.shutdown_background();
            result?;
        }
        TimerAction::Status => {
            let app = open_oneshot(&config)?;
            print_json(&app.snapshot())?;
        }
        TimerAction::End {
            rating,
            went_well,
            improve,
        } => {
            let mut app = open_oneshot(&config)?;
            for event in app.end_early()? {
                emit(&event)?;
            }
            let blank = rating.is_none() && went_well.trim().is_empty() && improve.trim().is_empty();
            let event = if blank {
                app.skip_reflection()
            } else {
                Some(app.submit_reflection(ReflectionInput {
                    rating,
                    went_well,
                    improve,
                })?)
            };
            if let Some(event) = event {
                emit(&event)?;
            }
        }
    }
    Ok(())
}

async fn run_interactive(config: Config, session: Option<String>) -> CliResult {
    let (scheduler, mut ticks) = IntervalScheduler::every_second();
    let mut app = open_app(&config, Box::new(scheduler))?;
    if let Some(id) = session {
        if app.get(&id).is_none() {
            return Err(format!("session {id} not found").into());
        }
        emit(&app.set_active(Some(&id)))?;
    }
    eprintln!("{RUN_HELP}");
    emit(&app.snapshot())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(()) = ticks.recv() => {
                for event in app.tick() {
                    emit(&event)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(&mut app, &config, line.trim()) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(e) => eprintln!("error: {e}"),
                }
            }
        }
    }

    if let Some(event) = app.pause() {
        emit(&event)?;
    }
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn handle_line(app: &mut FocusFlow, config: &Config, line: &str) -> CliResult<Flow> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    tracing::debug!(command, "stdin command");
    match command {
        "" => {}
        "start" => {
            for event in app.start()? {
                emit(&event)?;
            }
        }
        "pause" => {
            if let Some(event) = app.pause() {
                emit(&event)?;
            }
        }
        "end" => {
            for event in app.end_early()? {
                emit(&event)?;
            }
        }
        "distraction" => {
            let kind = rest.trim();
            check_kind(config, kind)?;
            emit(&app.log_distraction(kind)?)?;
        }
        "reflect" => emit(&app.submit_reflection(parse_reflection(rest)?)?)?,
        "skip" => {
            if let Some(event) = app.skip_reflection() {
                emit(&event)?;
            }
        }
        "status" => emit(&app.snapshot())?,
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => eprintln!("{RUN_HELP}"),
        other => return Err(format!("unknown command '{other}'\n{RUN_HELP}").into()),
    }
    Ok(Flow::Continue)
}

/// `<1-5|-> <went well> | <improve>`
fn parse_reflection(text: &str) -> CliResult<ReflectionInput> {
    let text = text.trim();
    let (rating, rest) = text.split_once(' ').unwrap_or((text, ""));
    let rating = match rating {
        "" | "-" => None,
        r => match r.parse::<u8>() {
            Ok(n @ 1..=5) => Some(n),
            _ => return Err(format!("rating must be 1-5 or '-', got '{r}'").into()),
        },
    };
    let (went_well, improve) = rest.split_once('|').unwrap_or((rest, ""));
    Ok(ReflectionInput {
        rating,
        went_well: went_well.trim().to_string(),
        improve: improve.trim().to_string(),
    })
}

/// One event per line so a front end can consume the stream.
fn emit(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_line_splits_on_bar() {
        let input = parse_reflection("4 kept the phone away | start earlier").unwrap();
        assert_eq!(input.rating, Some(4));
        assert_eq!(input.went_well, "kept the phone away");
        assert_eq!(input.improve, "start earlier");
    }

    #[test]
    fn reflection_line_without_rating() {
        let input = parse_reflection("- ok").unwrap();
        assert_eq!(input.rating, None);
        assert_eq!(input.went_well, "ok");
        assert_eq!(input.improve, "");
    }

    #[test]
    fn reflection_rating_out_of_range_is_rejected() {
        assert!(parse_reflection("6 great").is_err());
        assert!(parse_reflection("zero").is_err());
    }
}
