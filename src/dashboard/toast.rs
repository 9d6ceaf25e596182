use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

pub const SHOW_DELAY: Duration = Duration::from_millis(100);
pub const VISIBLE_FOR: Duration = Duration::from_millis(3000);
pub const HIDE_TRANSITION: Duration = Duration::from_millis(300);
pub const DEFAULT_MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
    Info,
}

impl ToastLevel {
    /// Maps the backend's reply status onto a style.
    pub fn from_status(status: &str) -> Self {
        match status {
            "success" => ToastLevel::Success,
            "warning" => ToastLevel::Warning,
            "error" => ToastLevel::Error,
            _ => ToastLevel::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Pending,
    Visible,
    Hiding,
    Removed,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: uuid::Uuid,
    pub message: String,
    pub level: ToastLevel,
    pub repeats: u32,
    created_at: Instant,
}

impl Toast {
    fn new(message: String, level: ToastLevel, now: Instant) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            message,
            level,
            repeats: 1,
            created_at: now,
        }
    }

    pub fn phase_at(&self, now: Instant) -> ToastPhase {
        let age = now.saturating_duration_since(self.created_at);
        if age < SHOW_DELAY {
            ToastPhase::Pending
        } else if age < SHOW_DELAY + VISIBLE_FOR {
            ToastPhase::Visible
        } else if age < SHOW_DELAY + VISIBLE_FOR + HIDE_TRANSITION {
            ToastPhase::Hiding
        } else {
            ToastPhase::Removed
        }
    }
}

/// Bounded set of live toasts. Each one runs its own show/hide timeline; a
/// repeat of a live message restarts that toast instead of stacking another.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    capacity: usize,
}

impl ToastQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            toasts: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, level: ToastLevel, now: Instant) {
        let message = message.into();
        self.prune(now);

        if let Some(existing) = self
            .toasts
            .iter_mut()
            .find(|t| t.level == level && t.message == message)
        {
            existing.repeats += 1;
            // Restart the timeline without hiding a toast already on screen.
            if existing.phase_at(now) != ToastPhase::Pending {
                existing.created_at = now.checked_sub(SHOW_DELAY).unwrap_or(now);
            }
            return;
        }

        if self.toasts.len() >= self.capacity {
            if let Some(dropped) = self.toasts.pop_front() {
                debug!("Toast queue full, dropping {}: {}", dropped.id, dropped.message);
            }
        }
        self.toasts.push_back(Toast::new(message, level, now));
    }

    /// Detaches toasts whose hide transition has finished.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.phase_at(now) != ToastPhase::Removed);
    }

    /// Toasts that should be on screen, oldest first.
    pub fn shown(&self, now: Instant) -> impl Iterator<Item = (&Toast, ToastPhase)> {
        self.toasts.iter().filter_map(move |t| match t.phase_at(now) {
            phase @ (ToastPhase::Visible | ToastPhase::Hiding) => Some((t, phase)),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOASTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_toast_timeline() {
        let t0 = Instant::now();
        let mut queue = ToastQueue::default();
        queue.push("Bot started successfully", ToastLevel::Success, t0);
        let toast = queue.iter().next().unwrap().clone();

        assert_eq!(toast.phase_at(t0), ToastPhase::Pending);
        assert_eq!(toast.phase_at(t0 + ms(99)), ToastPhase::Pending);
        assert_eq!(toast.phase_at(t0 + ms(100)), ToastPhase::Visible);
        assert_eq!(toast.phase_at(t0 + ms(3099)), ToastPhase::Visible);
        assert_eq!(toast.phase_at(t0 + ms(3100)), ToastPhase::Hiding);
        assert_eq!(toast.phase_at(t0 + ms(3399)), ToastPhase::Hiding);
        assert_eq!(toast.phase_at(t0 + ms(3400)), ToastPhase::Removed);

        assert_eq!(queue.shown(t0 + ms(50)).count(), 0);
        assert_eq!(queue.shown(t0 + ms(2000)).count(), 1);
        queue.prune(t0 + ms(3400));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_toasts_time_independently() {
        let t0 = Instant::now();
        let mut queue = ToastQueue::default();
        queue.push("first", ToastLevel::Info, t0);
        queue.push("second", ToastLevel::Info, t0 + ms(2000));

        queue.prune(t0 + ms(3500));
        let left: Vec<&str> = queue.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(left, vec!["second"]);
    }

    #[test]
    fn test_duplicates_coalesce() {
        let t0 = Instant::now();
        let mut queue = ToastQueue::default();
        queue.push("Failed to update logs.", ToastLevel::Error, t0);
        queue.push("Failed to update logs.", ToastLevel::Error, t0 + ms(3000));

        assert_eq!(queue.len(), 1);
        let toast = queue.iter().next().unwrap();
        assert_eq!(toast.repeats, 2);
        // Timer restarted by the repeat.
        assert_eq!(toast.phase_at(t0 + ms(3500)), ToastPhase::Visible);
    }

    #[test]
    fn test_repeat_keeps_shown_toast_visible() {
        let t0 = Instant::now();
        let mut queue = ToastQueue::default();
        queue.push("Failed to update logs.", ToastLevel::Error, t0);
        let repeat_at = t0 + ms(1000);
        queue.push("Failed to update logs.", ToastLevel::Error, repeat_at);

        assert_eq!(queue.shown(repeat_at).count(), 1);
        assert_eq!(queue.shown(repeat_at + ms(50)).count(), 1);
        let toast = queue.iter().next().unwrap();
        assert_eq!(toast.phase_at(repeat_at + VISIBLE_FOR - ms(1)), ToastPhase::Visible);
        assert_eq!(toast.phase_at(repeat_at + VISIBLE_FOR), ToastPhase::Hiding);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let t0 = Instant::now();
        let mut queue = ToastQueue::new(3);
        for i in 0..10 {
            queue.push(format!("error {i}"), ToastLevel::Error, t0 + ms(i));
        }

        assert_eq!(queue.len(), 3);
        let left: Vec<&str> = queue.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(left, vec!["error 7", "error 8", "error 9"]);
    }

    #[test]
    fn test_level_from_status() {
        assert_eq!(ToastLevel::from_status("success"), ToastLevel::Success);
        assert_eq!(ToastLevel::from_status("warning"), ToastLevel::Warning);
        assert_eq!(ToastLevel::from_status("error"), ToastLevel::Error);
        assert_eq!(ToastLevel::from_status("running"), ToastLevel::Info);
    }
}
