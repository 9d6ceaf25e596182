use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Dashboard,
    Trades,
    Signals,
    Logs,
    Settings,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Trades,
        Section::Signals,
        Section::Logs,
        Section::Settings,
    ];

    pub fn fragment(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Trades => "trades",
            Section::Signals => "signals",
            Section::Logs => "logs",
            Section::Settings => "settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Trades => "Trades",
            Section::Signals => "Signals",
            Section::Logs => "Logs",
            Section::Settings => "Settings",
        }
    }

    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        Self::ALL.into_iter().find(|s| s.fragment() == id)
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or_default()
    }
}

/// Tab switcher; exactly one section is active.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    active: Section,
}

impl Navigation {
    pub fn active(&self) -> Section {
        self.active
    }

    pub fn is_active(&self, section: Section) -> bool {
        self.active == section
    }

    pub fn activate(&mut self, section: Section) {
        self.active = section;
    }

    /// Follows a `#fragment` link. Unknown targets leave the view unchanged.
    pub fn activate_fragment(&mut self, fragment: &str) -> bool {
        match Section::from_fragment(fragment) {
            Some(section) => {
                self.activate(section);
                true
            }
            None => {
                warn!("No section for link target {}", fragment);
                false
            }
        }
    }

    pub fn next(&mut self) {
        let idx = (self.active.position() + 1) % Section::ALL.len();
        self.active = Section::ALL[idx];
    }

    pub fn previous(&mut self) {
        let len = Section::ALL.len();
        let idx = (self.active.position() + len - 1) % len;
        self.active = Section::ALL[idx];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_count(nav: &Navigation) -> usize {
        Section::ALL.iter().filter(|s| nav.is_active(**s)).count()
    }

    #[test]
    fn test_activate_fragment() {
        let mut nav = Navigation::default();
        assert!(nav.activate_fragment("#trades"));
        assert_eq!(nav.active(), Section::Trades);
        assert_eq!(active_count(&nav), 1);

        assert!(!nav.activate_fragment("#nowhere"));
        assert_eq!(nav.active(), Section::Trades);
        assert_eq!(active_count(&nav), 1);
    }

    #[test]
    fn test_cycle() {
        let mut nav = Navigation::default();
        nav.previous();
        assert_eq!(nav.active(), Section::Settings);
        nav.next();
        nav.next();
        assert_eq!(nav.active(), Section::Trades);
        assert_eq!(active_count(&nav), 1);
    }
}
