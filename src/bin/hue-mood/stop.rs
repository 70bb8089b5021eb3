//! Stop trigger: Esc on the terminal, Ctrl-C, or SIGTERM.

use std::future::pending;

use hue_mood::StopReason;
use tracing::warn;

/// Wait for the first stop request.
pub(crate) async fn wait_for_stop() -> StopReason {
    tokio::select! {
        () = escape_key() => StopReason::Escape,
        () = interrupt() => StopReason::Interrupt,
        () = terminate() => StopReason::Terminate,
    }
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {e}");
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Cannot listen for SIGTERM: {e}");
            pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    pending::<()>().await;
}

/// Resolves on Esc. Stays pending when stdin is not an interactive terminal.
#[cfg(unix)]
async fn escape_key() {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() {
        pending::<()>().await;
        return;
    }

    // Restores the terminal when this future is dropped.
    let _cbreak = match terminal::Cbreak::enable() {
        Ok(guard) => guard,
        Err(e) => {
            warn!("Cannot read keys from the terminal ({e}); use Ctrl-C to stop");
            pending::<()>().await;
            return;
        }
    };

    if terminal::escape_pressed().await.is_err() {
        // stdin closed
        pending::<()>().await;
    }
}

/// No terminal key reader off Unix; stop with Ctrl-C.
#[cfg(not(unix))]
async fn escape_key() {
    pending::<()>().await;
}

#[cfg(unix)]
mod terminal {
    use std::io::{self, ErrorKind, Read};

    use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};
    use tokio::sync::oneshot;
    use tracing::warn;

    const ESC: u8 = 0x1b;

    /// Unbuffered, non-echoing key input until dropped. Signals still work.
    pub(super) struct Cbreak {
        saved: Termios,
    }

    impl Cbreak {
        pub(super) fn enable() -> nix::Result<Self> {
            let stdin = io::stdin();
            let saved = termios::tcgetattr(&stdin)?;

            let mut cbreak = saved.clone();
            cbreak.local_flags.remove(LocalFlags::ICANON | LocalFlags::ECHO);
            cbreak.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
            cbreak.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
            termios::tcsetattr(&stdin, SetArg::TCSANOW, &cbreak)?;

            Ok(Cbreak { saved })
        }
    }

    impl Drop for Cbreak {
        fn drop(&mut self) {
            if let Err(e) = termios::tcsetattr(io::stdin(), SetArg::TCSADRAIN, &self.saved) {
                warn!("Failed to restore terminal settings: {e}");
            }
        }
    }

    /// Completes when an Esc byte is read; errors if stdin ends first.
    ///
    /// The reader is a detached thread so a blocked read never holds up exit.
    pub(super) fn escape_pressed() -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let spawned = std::thread::Builder::new()
            .name("escape-key".to_string())
            .spawn(move || {
                let mut stdin = io::stdin().lock();
                let mut byte = [0u8; 1];
                loop {
                    match stdin.read(&mut byte) {
                        Ok(0) => return,
                        Ok(_) if byte[0] == ESC => {
                            let _ = tx.send(());
                            return;
                        }
                        Ok(_) => {}
                        Err(e) if e.kind() == ErrorKind::Interrupted => {}
                        Err(_) => return,
                    }
                }
            });
        if let Err(e) = spawned {
            warn!("Cannot start key reader: {e}");
        }
        rx
    }
}
