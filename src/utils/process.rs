use crate::error::CollaboratorError;
use log::{debug, warn};
use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `program` to completion or until `timeout` elapses.
///
/// Stdout and stderr are drained on their own threads so a chatty child
/// cannot block on a full pipe while we poll for its exit.
pub fn run_with_timeout(
    program: &str,
    args: &[String],
    stdin: Option<&str>,
    timeout: Duration,
) -> Result<ProcessOutput, CollaboratorError> {
    debug!("Running {} {:?} (timeout {:?})", program, args, timeout);

    let mut child = Command::new(program)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CollaboratorError::io(program, e))?;

    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => {
            let input = input.to_string();
            Some(thread::spawn(move || {
                // A child that exits early closes the pipe; that is not our error.
                if let Err(e) = pipe.write_all(input.as_bytes()) {
                    debug!("stdin write ended early: {}", e);
                }
            }))
        }
        _ => None,
    };
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = match wait_until(&mut child, Instant::now() + timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            warn!("{} exceeded {:?}, killing it", program, timeout);
            let _ = child.kill();
            let _ = child.wait();
            return Err(CollaboratorError::Timeout {
                program: program.to_string(),
                timeout,
            });
        }
        Err(e) => return Err(CollaboratorError::io(program, e)),
    };

    if let Some(handle) = writer {
        let _ = handle.join();
    }
    let output = ProcessOutput {
        stdout: collect(stdout),
        stderr: collect(stderr),
    };

    if !status.success() {
        return Err(CollaboratorError::ProcessFailed {
            program: program.to_string(),
            status: status.to_string(),
            stderr: output.stderr.trim().to_string(),
        });
    }

    Ok(output)
}

fn wait_until(
    child: &mut Child,
    deadline: Instant,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn captures_stdout_and_stdin() {
        let output =
            run_with_timeout("sh", &sh("cat; echo done"), Some("hello\n"), Duration::from_secs(5))
                .unwrap();
        assert_eq!(output.stdout, "hello\ndone\n");
    }

    #[test]
    fn non_zero_exit_is_process_failure() {
        let err = run_with_timeout(
            "sh",
            &sh("echo broken >&2; exit 3"),
            None,
            Duration::from_secs(5),
        )
        .unwrap_err();
        match err {
            CollaboratorError::ProcessFailed { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn slow_process_times_out() {
        let started = Instant::now();
        let err = run_with_timeout("sh", &sh("sleep 5"), None, Duration::from_millis(200))
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_program_is_io_error() {
        let err = run_with_timeout(
            "definitely-not-a-real-program-xyz",
            &[],
            None,
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, CollaboratorError::Io { .. }));
    }
}
