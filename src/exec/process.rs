// src/exec/process.rs

//! Supervised command process.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{oneshot, Mutex};
use tracing::{error, info, warn};

#[cfg(unix)]
use nix::sys::signal::{killpg, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Supervisor for at most one external process at a time.
///
/// `start` and `terminate` serialize on an internal mutex. The supervised
/// process runs in its own process group on Unix so that termination reaches
/// forked children too. An empty argv is the no-op command: `start` sleeps
/// the startup delay and returns, `terminate` returns immediately.
pub struct ProcessHandle {
    program: Vec<String>,
    slot: Mutex<ProcessState>,
}

enum ProcessState {
    Idle,
    Running(Running),
}

struct Running {
    #[cfg(unix)]
    pgid: Option<Pid>,
    /// Hard-kill request to the waiter task, for when process-group
    /// signalling is unavailable.
    kill: oneshot::Sender<()>,
    /// Signalled exactly once by the waiter task when the process exits.
    exited: oneshot::Receiver<()>,
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl ProcessHandle {
    pub fn new(program: Vec<String>) -> Self {
        Self {
            program,
            slot: Mutex::new(ProcessState::Idle),
        }
    }

    /// The command line as it appears in logs.
    pub fn display(&self) -> String {
        self.program.join(" ")
    }

    /// Sleep the startup delay, then spawn the command.
    ///
    /// The delay runs outside the lock and applies to the no-op command too;
    /// it keeps rapid restart cycles from thrashing. Spawn failures are
    /// logged and leave the handle idle.
    ///
    /// # Panics
    ///
    /// Panics if the previously started process has not exited yet. Callers
    /// must `terminate` first; overlapping instances are a contract
    /// violation, not a runtime condition.
    pub async fn start(&self, startup_delay: Duration) {
        tokio::time::sleep(startup_delay).await;

        let mut slot = self.slot.lock().await;
        if let ProcessState::Running(running) = &mut *slot {
            match running.exited.try_recv() {
                Err(TryRecvError::Empty) => {
                    panic!(
                        "`{}` is still running; terminate it before starting again",
                        self.display()
                    );
                }
                // Exited (or the waiter is gone); the slot is stale.
                Ok(()) | Err(TryRecvError::Closed) => *slot = ProcessState::Idle,
            }
        }

        if self.program.is_empty() {
            return;
        }

        let mut cmd = Command::new(&self.program[0]);
        cmd.args(&self.program[1..])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        info!("running `{}`", self.display());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                error!("failed to start `{}`: {err}", self.display());
                return;
            }
        };

        // With process_group(0) the child leads its own group, so its pid is
        // the group id.
        #[cfg(unix)]
        let pgid = child.id().map(|id| Pid::from_raw(id as i32));

        let (exit_tx, exit_rx) = oneshot::channel();
        let (kill_tx, mut kill_rx) = oneshot::channel();

        // The waiter owns the child. It reports the exit exactly once, even
        // when the kill channel closes without a request.
        let cmd_line = self.display();
        tokio::spawn(async move {
            let status = tokio::select! {
                status = child.wait() => status,
                req = &mut kill_rx => {
                    if req.is_ok() {
                        if let Err(err) = child.start_kill() {
                            warn!("failed to kill `{cmd_line}`: {err}");
                        }
                    }
                    child.wait().await
                }
            };
            match status {
                Ok(status) if status.success() => info!("`{cmd_line}` done"),
                Ok(status) => info!("`{cmd_line}` terminated ({status})"),
                Err(err) => warn!("failed waiting for `{cmd_line}`: {err}"),
            }
            let _ = exit_tx.send(());
        });

        *slot = ProcessState::Running(Running {
            #[cfg(unix)]
            pgid,
            kill: kill_tx,
            exited: exit_rx,
        });
    }

    /// Stop the running process, gracefully first.
    ///
    /// Sends SIGINT to the process group, waits up to `grace_period` for the
    /// exit report, then escalates with SIGTERM to the group (or a hard-kill
    /// request to the waiter) and returns without blocking for the exit.
    /// A no-op when nothing is running. The internal lock is held for the
    /// whole call, so a concurrent `start` observes the cleared slot.
    pub async fn terminate(&self, grace_period: Duration) {
        let mut slot = self.slot.lock().await;
        let mut running = match std::mem::replace(&mut *slot, ProcessState::Idle) {
            ProcessState::Idle => return,
            ProcessState::Running(running) => running,
        };
        match running.exited.try_recv() {
            // Already gone; nothing to stop.
            Ok(()) | Err(TryRecvError::Closed) => return,
            Err(TryRecvError::Empty) => {}
        }

        info!("stopping `{}`", self.display());
        #[cfg(unix)]
        if let Some(pgid) = running.pgid {
            if let Err(err) = killpg(pgid, Signal::SIGINT) {
                warn!("failed to interrupt process group {pgid}: {err}");
            }
        }

        tokio::select! {
            _ = &mut running.exited => {}
            _ = tokio::time::sleep(grace_period) => {
                warn!(
                    "`{}` did not stop within {:?}; killing it",
                    self.display(),
                    grace_period
                );
                #[cfg(unix)]
                match running.pgid {
                    Some(pgid) => {
                        if let Err(err) = killpg(pgid, Signal::SIGTERM) {
                            warn!("failed to terminate process group {pgid}: {err}");
                        }
                    }
                    None => {
                        let _ = running.kill.send(());
                    }
                }
                #[cfg(not(unix))]
                {
                    let _ = running.kill.send(());
                }
            }
        }
    }
}
