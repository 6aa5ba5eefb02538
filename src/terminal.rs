use crossterm::terminal;
use tracing::warn;

/// Restores cooked mode when dropped, if raw mode was switched on.
pub struct RawLock {
    active: bool,
}

impl Drop for RawLock {
    fn drop(&mut self) {
        // terminal stays in raw mode but no means to repair
        if self.active
            && let Err(e) = terminal::disable_raw_mode()
        {
            warn!("Error resetting terminal {e}");
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EchoOptions {
    EchoOn,
    EchoOff,
}

/// Set terminal to raw in best-effort mode, only log on failure, since it fails whenever
/// stdin is not a terminal. Does nothing unless `enabled`.
///
/// Raw mode keeps the terminal from echoing a key press, echoing is then up to the caller.
pub fn set_terminal_raw(enabled: bool) -> RawLock {
    if !enabled {
        return RawLock { active: false };
    }
    match terminal::enable_raw_mode() {
        Ok(()) => RawLock { active: true },
        Err(e) => {
            warn!("Could not set terminal to raw mode: {e}");
            RawLock { active: false }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    fn test_disabled_raw_mode_is_noop() {
        let lock = set_terminal_raw(false);
        expect_that!(lock.active, eq(false));
    }
}
