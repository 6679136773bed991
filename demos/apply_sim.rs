//! Apply Simulation: Drives the dashboard with a fake parallel apply.
//!
//! Ten workers pull planned changes off a queue and report them through
//! the hook, the same way an orchestration engine would. Some changes
//! fail on purpose so the errored panel fills up too.
//!
//! Logs go to `applyboard-demo.log`; set `APPLYBOARD_LOG=debug` to see
//! the dashboard's own events. Without a TTY the run falls back to plain
//! lines on stderr.

use applyboard::{
    open_ui_hook, ApplyError, DashboardConfig, Hook, InstanceDiff, InstanceInfo, InstanceState,
    PostApply, PreApply, UiHook,
};
use crossbeam_channel::{unbounded, Receiver};
use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const WORKERS: usize = 10;
const LOG_FILE: &str = "applyboard-demo.log";

/// One planned change.
struct Change {
    info: InstanceInfo,
    state: Option<InstanceState>,
    diff: InstanceDiff,
    duration: Duration,
    fails: bool,
}

fn init_logging() -> io::Result<()> {
    let filter = std::env::var("APPLYBOARD_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let file = File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn plan() -> Vec<Change> {
    let mut changes = Vec::new();
    for i in 0..48u64 {
        let (info, state, diff) = match i % 4 {
            0 => (
                InstanceInfo::new(format!("aws_instance.web[{i}]")),
                None,
                InstanceDiff::default(),
            ),
            1 => (
                InstanceInfo::new(format!("aws_security_group_rule.ingress[{i}]"))
                    .in_module(["network"]),
                Some(InstanceState::new(format!("sgr-{i:04}"))),
                InstanceDiff::default(),
            ),
            2 => (
                InstanceInfo::new(format!("aws_ebs_volume.scratch[{i}]")),
                Some(InstanceState::new(format!("vol-{i:04}"))),
                InstanceDiff::destroy(),
            ),
            _ => (
                InstanceInfo::new(format!("aws_route53_record.alias[{i}]"))
                    .in_module(["network", "dns"]),
                None,
                InstanceDiff::default(),
            ),
        };
        changes.push(Change {
            info,
            state,
            diff,
            duration: Duration::from_millis(150 + (i * 37) % 900),
            fails: i % 9 == 5,
        });
    }
    changes
}

fn worker(hook: &dyn UiHook, queue: &Receiver<Change>) -> applyboard::Result<()> {
    for change in queue {
        hook.pre_apply(&PreApply {
            info: &change.info,
            state: change.state.as_ref(),
            diff: &change.diff,
        })?;

        thread::sleep(change.duration);

        let failure = change
            .fails
            .then(|| io::Error::other("error waiting for resource to become ready"));
        hook.post_apply(&PostApply {
            info: &change.info,
            state: None,
            error: failure.as_ref().map(|e| e as &ApplyError),
        })?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let (tx, rx) = unbounded();
    for change in plan() {
        tx.send(change)?;
    }
    drop(tx);

    let mut hook = open_ui_hook(DashboardConfig::from_env())?;
    info!(workers = WORKERS, "apply started");

    let shared: &dyn UiHook = hook.as_ref();
    let results: Vec<applyboard::Result<()>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..WORKERS)
            .map(|_| {
                let rx = rx.clone();
                scope.spawn(move || worker(shared, &rx))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    // Leave the final state on screen for a moment.
    thread::sleep(Duration::from_secs(2));
    hook.close()?;

    for result in results {
        result?;
    }
    info!("apply finished");
    Ok(())
}
