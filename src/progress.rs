use std::{
    io::{self, IsTerminal, Write},
    time::Duration,
};

use owo_colors::OwoColorize;
use tokio::{task::JoinHandle, time::sleep};
use tracing::debug;

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_DELAY: Duration = Duration::from_millis(80);

/// A progress indicator scoped around one blocking call. Call
/// [Progress::succeed] once the call returned successfully, dropping it
/// otherwise reports failure, which covers the `?` paths.
///
/// The spinner is only drawn when stderr is a terminal, otherwise the text
/// goes to `debug!`.
#[must_use]
#[derive(Debug)]
pub struct Progress {
    text: String,
    animation: Option<JoinHandle<()>>,
    terminal: bool,
    finished: bool,
}

impl Progress {
    /// Starts showing `text`. The animation is a task on the current `tokio`
    /// runtime, so this must be called from within one.
    pub fn start(text: impl Into<String>) -> Self {
        let text = text.into();
        let terminal = io::stderr().is_terminal();
        let animation = if terminal {
            let text = text.clone();
            Some(tokio::spawn(async move {
                for frame in FRAMES.iter().cycle() {
                    {
                        let mut stderr = io::stderr().lock();
                        let _ = write!(stderr, "\r{} {}", frame.green(), text);
                        let _ = stderr.flush();
                    }
                    sleep(FRAME_DELAY).await;
                }
            }))
        } else {
            debug!("{text}");
            None
        };
        Self {
            text,
            animation,
            terminal,
            finished: false,
        }
    }

    /// Reports success
    pub fn succeed(mut self) {
        self.finish(true)
    }

    /// Reports failure, the same as dropping
    pub fn fail(mut self) {
        self.finish(false)
    }

    fn finish(&mut self, success: bool) {
        if self.finished {
            return
        }
        self.finished = true;
        if let Some(animation) = self.animation.take() {
            animation.abort();
        }
        if self.terminal {
            let mut stderr = io::stderr().lock();
            // clear the spinner line
            let _ = write!(stderr, "\r\x1b[2K");
            let _ = if success {
                writeln!(stderr, "{} {}", "✔".green(), self.text)
            } else {
                writeln!(stderr, "{} {}", "✖".red(), self.text)
            };
            let _ = stderr.flush();
        } else if success {
            debug!("done: {}", self.text);
        } else {
            debug!("failed: {}", self.text);
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finishes_once() {
        let mut progress = Progress::start("Obtaining things");
        progress.finish(true);
        assert!(progress.finished);
        assert!(progress.animation.is_none());
        // the drop after an explicit finish is a no-op
        drop(progress);
        Progress::start("Obtaining more things").fail();
    }
}
