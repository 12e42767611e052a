//! Fenced code block tracking shared by the segmenter and the extractor's tidy pass

/// Tracks whether a line-by-line scan is inside a fenced code block
///
/// A fence opens on a line whose indentation-trimmed form starts with at least
/// three backticks or tildes. It closes on a line made only of the same
/// character, at least as many times as the opening run.
#[derive(Debug, Default, Clone)]
pub(crate) struct FenceState {
    open: Option<(char, usize)>,
}

impl FenceState {
    /// Returns true while inside a fence
    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feeds one line; returns true if the line is a fence delimiter
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.open {
            Some((marker, len)) => {
                let body = trimmed.trim_end();
                let run = body.chars().take_while(|c| *c == marker).count();
                if run >= len && run == body.chars().count() {
                    self.open = None;
                    return true;
                }
                false
            }
            None => {
                let Some(marker) = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')
                else {
                    return false;
                };
                let run = trimmed.chars().take_while(|c| *c == marker).count();
                if run >= 3 {
                    self.open = Some((marker, run));
                    return true;
                }
                false
            }
        }
    }
}
