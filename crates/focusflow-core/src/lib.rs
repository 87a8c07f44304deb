//! # FocusFlow Core Library
//!
//! Business logic for the FocusFlow focus-session tracker. Everything runs
//! locally: sessions are kept in memory and written through to a local
//! key-value store after every change.
//!
//! ## Architecture
//!
//! - **Timer Engine**: an idle → focus → break → idle state machine driven by
//!   an injected one-second tick
//! - **Session Repository**: ordered session collection, the system of record
//!   while the process runs
//! - **Storage**: SQLite key-value store, JSON blobs, TOML configuration
//! - **Controller**: [`FocusFlow`] owns all of the above and exposes the
//!   operations a front end calls
//!
//! ## Key Components
//!
//! - [`FocusFlow`]: application controller
//! - [`TimerEngine`]: phase state machine
//! - [`SessionRepository`]: session collection and persistence
//! - [`Database`]: on-disk key-value store
//! - [`Config`]: application configuration

pub mod app;
pub mod clock;
pub mod error;
pub mod events;
pub mod reflection;
pub mod repository;
pub mod session;
pub mod stats;
pub mod storage;
pub mod theme;
pub mod timer;

pub use app::FocusFlow;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CommandError, ConfigError, StorageError};
pub use events::Event;
pub use reflection::{ReflectionCapture, ReflectionInput};
pub use repository::SessionRepository;
pub use session::{parse_tasks, Distraction, NewSession, Reflection, Session, SessionId};
pub use stats::{format_clock, HistoryRow, SubjectTotal};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use theme::Theme;
pub use timer::{
    IntervalScheduler, ManualScheduler, Phase, TickReceiver, TickScheduler, TimerEngine, TimerState,
};
