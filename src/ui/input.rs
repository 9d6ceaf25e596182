use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::dashboard::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextSection,
    PreviousSection,
    Goto(Section),
    ToggleBot,
    Refresh,
    SelectNextField,
    SelectPreviousField,
    Adjust(i32),
    SubmitSettings,
}

/// Key bindings. Field editing keys only apply on the settings page.
pub fn map_key(key: KeyEvent, section: Section) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Tab => Action::NextSection,
        KeyCode::BackTab => Action::PreviousSection,
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            Action::Goto(Section::ALL[idx])
        }
        KeyCode::Char('s') => Action::ToggleBot,
        KeyCode::Char('r') => Action::Refresh,
        code if section == Section::Settings => match code {
            KeyCode::Down | KeyCode::Char('j') => Action::SelectNextField,
            KeyCode::Up | KeyCode::Char('k') => Action::SelectPreviousField,
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => Action::Adjust(1),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => Action::Adjust(-1),
            KeyCode::PageUp => Action::Adjust(10),
            KeyCode::PageDown => Action::Adjust(-10),
            KeyCode::Enter => Action::SubmitSettings,
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_global_keys() {
        assert_eq!(map_key(press(KeyCode::Char('q')), Section::Dashboard), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Char('s')), Section::Logs), Some(Action::ToggleBot));
        assert_eq!(
            map_key(press(KeyCode::Char('4')), Section::Dashboard),
            Some(Action::Goto(Section::Logs))
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Section::Trades),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_form_keys_only_on_settings() {
        assert_eq!(map_key(press(KeyCode::Enter), Section::Dashboard), None);
        assert_eq!(map_key(press(KeyCode::Right), Section::Trades), None);
        assert_eq!(
            map_key(press(KeyCode::Enter), Section::Settings),
            Some(Action::SubmitSettings)
        );
        assert_eq!(map_key(press(KeyCode::Left), Section::Settings), Some(Action::Adjust(-1)));
        assert_eq!(
            map_key(press(KeyCode::Down), Section::Settings),
            Some(Action::SelectNextField)
        );
    }
}
