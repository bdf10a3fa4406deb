use crate::driver::SharedStatus;
use crate::events::AppEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the control socket and config watcher on their own thread and
/// runtime, leaving the caller's thread to the frame loop.
pub fn start_background_services(
    socket_path: PathBuf,
    config_path: PathBuf,
    tx: Sender<AppEvent>,
    status: SharedStatus,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime for services: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(socket_path, tx, status).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(config_path, tx).await;
                });
            }

            // Stop once the frame loop has dropped its receiver.
            while !tx.is_closed() {
                tokio::time::sleep(std::time::Duration::from_millis(250)).await;
            }
        });
    })
}
