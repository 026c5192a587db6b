use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Instant;

use rand::Rng;

use crate::config::Config;
use crate::export::export_match_xlsx;
use crate::source::load_payload;
use crate::state::{Delta, LoaderCommand};

/// Runs load and export work off the UI thread. Exits once either channel
/// end is dropped.
pub fn spawn_loader(config: Config, tx: Sender<Delta>, cmd_rx: Receiver<LoaderCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        while let Ok(cmd) = cmd_rx.recv() {
            let alive = match cmd {
                LoaderCommand::Upload { video } => {
                    simulate_upload(&mut rng, &config, video.as_deref(), &tx)
                        && fetch_payload(&config, &tx)
                }
                LoaderCommand::Reload => fetch_payload(&config, &tx),
                LoaderCommand::Export { path, view } => {
                    let shown = path.display().to_string();
                    let started = tx
                        .send(Delta::ExportStarted {
                            path: shown.clone(),
                        })
                        .is_ok();
                    let delta = match export_match_xlsx(&path, &view) {
                        Ok(report) => Delta::ExportFinished {
                            path: shown,
                            report,
                        },
                        Err(err) => Delta::ExportFailed {
                            path: shown,
                            error: format!("{err:#}"),
                        },
                    };
                    started && tx.send(delta).is_ok()
                }
            };
            if !alive {
                return;
            }
        }
    });
}

/// Progress only; the video itself is never read.
fn simulate_upload(
    rng: &mut impl Rng,
    config: &Config,
    video: Option<&str>,
    tx: &Sender<Delta>,
) -> bool {
    if let Some(video) = video {
        tracing::info!(video, "simulating upload");
        if tx
            .send(Delta::Log(format!("[INFO] Uploading {video}")))
            .is_err()
        {
            return false;
        }
    }

    let mut progress: u8 = 0;
    while progress < 100 {
        progress = progress.saturating_add(rng.gen_range(3..=12)).min(100);
        if tx.send(Delta::UploadProgress(progress)).is_err() {
            return false;
        }
        thread::sleep(config.upload_tick);
    }
    true
}

fn fetch_payload(config: &Config, tx: &Sender<Delta>) -> bool {
    let source = config.source.to_string();
    if tx
        .send(Delta::LoadStarted {
            source: source.clone(),
        })
        .is_err()
    {
        return false;
    }

    let started = Instant::now();
    let delta = match load_payload(&config.source, config.http_timeout) {
        Ok(loaded) => {
            tracing::info!(
                source = %source,
                events = loaded.payload.per_event.len(),
                roster = loaded.payload.summary.players.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "payload loaded"
            );
            Delta::PayloadLoaded {
                source,
                payload: Box::new(loaded.payload),
                fingerprint: loaded.fingerprint,
            }
        }
        Err(err) => {
            tracing::warn!(source = %source, error = %format!("{err:#}"), "payload load failed");
            Delta::LoadFailed(format!("Failed to load analytics: {err:#}"))
        }
    };
    tx.send(delta).is_ok()
}
