/* Logger initialization */
use std::{panic, thread};

use tracing::{error, level_filters::LevelFilter};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::CargoEnv;

pub struct LoggerGuards {
    pub _tracing_guard: WorkerGuard,
    // only there when a dsn was configured
    pub _sentry_guard: Option<sentry::ClientInitGuard>,
}

pub struct Logger {}

impl Logger {
    pub fn init(cargo_env: CargoEnv, sentry_dsn: Option<String>) -> LoggerGuards {
        // development gets everything on stdout, production writes to a daily file so the
        // achievement and analytics debug noise doesn't flood the host's log capture
        let (max_level, (non_blocking, guard)) = match cargo_env {
            CargoEnv::Development => (
                LevelFilter::DEBUG,
                tracing_appender::non_blocking(std::io::stdout()),
            ),
            CargoEnv::Production => (
                LevelFilter::INFO,
                tracing_appender::non_blocking(tracing_appender::rolling::daily(
                    "logs",
                    "cinereview.log",
                )),
            ),
        };

        let sentry_guard = sentry_dsn.map(|dsn| {
            sentry::init((
                dsn,
                sentry::ClientOptions {
                    release: sentry::release_name!(),
                    environment: Some(Self::environment_name(cargo_env).into()),
                    attach_stacktrace: true,
                    ..Default::default()
                },
            ))
        });

        let registry = tracing_subscriber::registry()
            .with(max_level)
            .with(tracing_subscriber::fmt::layer().with_writer(non_blocking));

        if sentry_guard.is_some() {
            registry.with(sentry_tracing::layer()).init();
        } else {
            registry.init();
        }

        panic::set_hook(Box::new(Self::log_panic));

        LoggerGuards {
            _tracing_guard: guard,
            _sentry_guard: sentry_guard,
        }
    }

    fn environment_name(cargo_env: CargoEnv) -> &'static str {
        match cargo_env {
            CargoEnv::Development => "development",
            CargoEnv::Production => "production",
        }
    }

    // panics go through tracing so they end up in the same file (and sentry) as everything else
    fn log_panic(info: &panic::PanicHookInfo<'_>) {
        let current = thread::current();
        let thread_name = current.name().unwrap_or("unknown");

        let msg = if let Some(s) = info.payload().downcast_ref::<&'static str>() {
            *s
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "Box<Any>"
        };

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        error!(
            target: "panic",
            "thread '{}' panicked at '{}': {}\n{:?}",
            thread_name,
            msg,
            location,
            backtrace::Backtrace::new()
        );
    }
}
