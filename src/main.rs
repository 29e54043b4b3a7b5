use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use clap::Parser;
use tracing::info;

use loadapi::api::Server;
use loadapi::args::ControlPlaneArgs;
use loadapi::engine::{Engine, Info, Scaler, Sink, Status};
use loadapi::error::{AppResult, EngineError};
use loadapi::shutdown::ShutdownSignal;

/// Stub scaler for the standalone binary: records the requested VU count so
/// the `vus` sink reflects scale calls made through the API.
struct StubScaler {
    active: Arc<AtomicU64>,
}

impl Scaler for StubScaler {
    fn scale(&self, active_vus: u64) -> Result<(), EngineError> {
        info!("Scaling stub engine to {} VUs", active_vus);
        self.active.store(active_vus, Ordering::SeqCst);
        Ok(())
    }
}

struct VusSink {
    active: Arc<AtomicU64>,
}

impl Sink for VusSink {
    fn format(&self) -> String {
        self.active.load(Ordering::SeqCst).to_string()
    }
}

struct UptimeSink {
    started: Instant,
}

impl Sink for UptimeSink {
    fn format(&self) -> String {
        format!("{}s", self.started.elapsed().as_secs())
    }
}

fn main() -> AppResult<()> {
    let args = ControlPlaneArgs::parse();
    loadapi::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(args))
}

async fn run(args: ControlPlaneArgs) -> AppResult<()> {
    let active = Arc::new(AtomicU64::new(args.vus));
    let engine = Arc::new(
        Engine::new(
            Status {
                running: true,
                active_vus: args.vus,
            },
            Box::new(StubScaler {
                active: Arc::clone(&active),
            }),
        )
        .with_sink(
            "uptime",
            Box::new(UptimeSink {
                started: Instant::now(),
            }),
        )
        .with_sink("vus", Box::new(VusSink { active })),
    );

    let shutdown = Arc::new(ShutdownSignal::new());
    let interrupt = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received; stopping.");
            interrupt.fire();
        }
    });

    let server = Server::new(engine, Info::new(), shutdown);
    server.run(&args.address).await
}
