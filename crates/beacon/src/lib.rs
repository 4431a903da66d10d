//! # beacon
//!
//! Daemon lifecycle toolkit for Rust CLIs.
//!
//! Probe a local daemon over HTTP, auto-start it detached when it is not
//! running, and manage its PID file. Pairs with a daemon that serves a
//! status endpoint on a loopback port.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use beacon::{ensure_daemon, DaemonPaths};
//!
//! # #[tokio::main]
//! # async fn main() {
//! // Reuse a running daemon, or spawn `current_exe() server` and wait
//! // for it to answer on port 4242.
//! ensure_daemon(4242, &["server"]).await.unwrap();
//!
//! let paths = DaemonPaths::new("myapp");
//! println!("pid file at {}", paths.pid_path().display());
//! # }
//! ```

pub mod client;
pub mod daemon;
pub mod paths;

pub use client::{is_running, read_pid, ClientError};
pub use daemon::{ensure_daemon, Daemon};
pub use paths::DaemonPaths;
