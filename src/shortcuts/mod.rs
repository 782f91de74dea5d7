#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ShortcutAction {
    FocusSearch,
    ToggleTheme,
    ClearSearch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct KeyChord {
    key: &'static str,
    /// Ctrl on most platforms, Cmd on macOS.
    modifier: bool,
    /// Only while the search input has focus.
    in_search: bool,
}

const SHORTCUTS: &[(KeyChord, ShortcutAction)] = &[
    (
        KeyChord { key: "k", modifier: true, in_search: false },
        ShortcutAction::FocusSearch,
    ),
    (
        KeyChord { key: "d", modifier: true, in_search: false },
        ShortcutAction::ToggleTheme,
    ),
    (
        KeyChord { key: "escape", modifier: false, in_search: true },
        ShortcutAction::ClearSearch,
    ),
];

/// Look up the action for a keydown.
///
/// `modifier` is `ctrl || meta`. Global chords fire regardless of focus.
pub(crate) fn action_for(key: &str, modifier: bool, in_search: bool) -> Option<ShortcutAction> {
    let key = key.to_lowercase();
    SHORTCUTS
        .iter()
        .find(|(chord, _)| {
            chord.key == key && chord.modifier == modifier && (!chord.in_search || in_search)
        })
        .map(|(_, action)| *action)
}
