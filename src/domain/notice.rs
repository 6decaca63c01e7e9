/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Toast-style message shown in the status line for a few ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    ticks_left: u32,
}

impl Notice {
    pub fn info(text: impl Into<String>, ttl_ticks: u32) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
            ticks_left: ttl_ticks,
        }
    }

    pub fn error(text: impl Into<String>, ttl_ticks: u32) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
            ticks_left: ttl_ticks,
        }
    }

    /// Counts one tick down. Returns false once the notice has expired.
    pub fn tick(&mut self) -> bool {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.ticks_left > 0
    }
}
