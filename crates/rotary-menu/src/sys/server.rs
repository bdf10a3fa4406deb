use crate::driver::SharedStatus;
use crate::events::{AppEvent, ControlCommand};
use async_channel::Sender;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Accepts control connections on `socket_path` until the process exits.
pub async fn run_server(socket_path: PathBuf, tx: Sender<AppEvent>, status: SharedStatus) {
    if socket_path.exists()
        && let Err(e) = fs_err::remove_file(&socket_path)
    {
        log::warn!("Failed to remove stale socket: {}", e);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                let status = status.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, tx, status).await {
                        log::warn!("Control connection failed: {}", e);
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_connection(
    stream: UnixStream,
    tx: Sender<AppEvent>,
    status: SharedStatus,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command = match ControlCommand::from_str(line) {
            Ok(c) => c,
            Err(_) => {
                log::warn!("Unknown control command: {:?}", line);
                continue;
            }
        };
        log::debug!("Received command: {}", command);

        match command.event() {
            Some(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            None => {
                let snapshot = *status.read();
                let mut reply = serde_json::to_vec(&snapshot)?;
                reply.push(b'\n');
                writer.write_all(&reply).await?;
            }
        }
    }
    Ok(())
}
