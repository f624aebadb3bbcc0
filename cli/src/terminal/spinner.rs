use std::io::{self, Write};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TIP_DURATION: Duration = Duration::from_secs(1);
const MESSAGE_READ_TIME: Duration = Duration::from_secs(1);
const MIN_TIP_VISIBILITY: Duration = Duration::from_millis(750);
const TIPS: &[&str] = &["Press Ctrl-C to abort the scan"];
const TICKS: &[&str] = &[
    "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
];

struct SpinnerHandle {
    spinner: ProgressBar,
    tx: Sender<String>,
    worker: JoinHandle<()>,
}

/// The spinner currently on screen, if any. Log output is routed around it.
static ACTIVE: Mutex<Option<SpinnerHandle>> = Mutex::new(None);

/// Shows the spinner with `message`, replacing any spinner already running.
pub fn start(message: String) {
    stop();

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(TICKS));
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    let (tx, rx) = mpsc::channel::<String>();
    let pb_clone = pb.clone();
    let worker = thread::spawn(move || rotate_messages(pb_clone, rx));

    *ACTIVE.lock().unwrap_or_else(PoisonError::into_inner) = Some(SpinnerHandle {
        spinner: pb,
        tx,
        worker,
    });
}

/// Clears the spinner from the screen. Does nothing when none is running.
pub fn stop() {
    let handle = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(SpinnerHandle { spinner, tx, worker }) = handle {
        spinner.finish_and_clear();
        drop(tx);
        let _ = worker.join();
    }
}

pub fn report_discovery_progress(count: usize) {
    let active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(handle) = active.as_ref() {
        let _ = handle.tx.send(format!(
            "Identified {} hosts so far...",
            count.to_string().green().bold()
        ));
    }
}

/// Shows queued progress messages, falling back to tips when idle.
fn rotate_messages(pb: ProgressBar, rx: mpsc::Receiver<String>) {
    let mut tip_index = 0;
    let mut next_action_time = Instant::now() + TIP_DURATION;
    let mut is_showing_tip = false;
    let mut last_tip_time = Instant::now();

    loop {
        if pb.is_finished() {
            break;
        }

        let wait_time = next_action_time.saturating_duration_since(Instant::now());

        match rx.recv_timeout(wait_time) {
            Ok(mut msg) => {
                if is_showing_tip {
                    let elapsed = last_tip_time.elapsed();
                    if elapsed < MIN_TIP_VISIBILITY {
                        thread::sleep(MIN_TIP_VISIBILITY - elapsed);
                    }
                    is_showing_tip = false;
                }
                while let Ok(newer_msg) = rx.try_recv() {
                    msg = newer_msg;
                }
                pb.set_message(msg);
                next_action_time = Instant::now() + MESSAGE_READ_TIME;
            }
            Err(RecvTimeoutError::Timeout) => {
                let tip = TIPS[tip_index % TIPS.len()];
                pb.set_message(format!("{}", tip.italic().white()));

                tip_index += 1;
                is_showing_tip = true;
                last_tip_time = Instant::now();
                next_action_time = Instant::now() + TIP_DURATION;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Writer handed to the tracing subscriber: prints above the spinner while
/// one is running, straight to stdout otherwise.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
        match active.as_ref() {
            Some(handle) => handle.spinner.suspend(|| io::stdout().write_all(buf))?,
            None => io::stdout().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}
