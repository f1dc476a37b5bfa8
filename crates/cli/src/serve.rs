//! Daemon mode – line-delimited JSON actions over a Unix socket.
//!
//! Each request line carries an id plus one engine action; the response
//! line echoes the id and the post-action snapshot. The engine is a
//! single sequential state machine, so connections are served one at a
//! time and every action completes before the next is read.

use engine::types::{DaemonRequest, DaemonResponse};
use engine::Calculator;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_daemon(socket_path: PathBuf, mut calc: Calculator) {
    // Remove stale socket if it exists
    let _ = std::fs::remove_file(&socket_path);

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: cannot bind socket {}: {}", socket_path.display(), e);
            std::process::exit(2);
        }
    };

    eprintln!("calcctl daemon listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let (reader, mut writer) = stream.into_split();
                let mut lines = BufReader::new(reader).lines();

                while let Ok(Some(line)) = lines.next_line().await {
                    let response = handle_request(&line, &mut calc);
                    let mut resp_json =
                        serde_json::to_string(&response).unwrap_or_else(|_| "{}".into());
                    resp_json.push('\n');
                    if writer.write_all(resp_json.as_bytes()).await.is_err() {
                        break;
                    }
                }
            }
            Err(e) => {
                eprintln!("accept error: {}", e);
            }
        }
    }
}

fn handle_request(line: &str, calc: &mut Calculator) -> DaemonResponse {
    let req: DaemonRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return DaemonResponse {
                id: "unknown".into(),
                snapshot: None,
                error: Some(format!("invalid JSON request: {}", e)),
            };
        }
    };

    calc.dispatch(req.action);
    DaemonResponse {
        id: req.id,
        snapshot: Some(calc.snapshot()),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_request_dispatches() {
        let mut calc = Calculator::new();
        let resp = handle_request(
            r#"{"id":"1","action":"number","arg":"7"}"#,
            &mut calc,
        );
        assert_eq!(resp.id, "1");
        assert_eq!(resp.snapshot.unwrap().display, "7");
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_handle_request_bad_json() {
        let mut calc = Calculator::new();
        let resp = handle_request("not json", &mut calc);
        assert!(resp.snapshot.is_none());
        assert!(resp.error.is_some());
    }
}
