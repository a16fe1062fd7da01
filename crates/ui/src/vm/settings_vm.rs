/// State of the settings overlay.
///
/// Edits go to a draft; `save` commits it, `close` throws it away.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsOverlayVm {
    open: bool,
    only_starred: bool,
    draft_only_starred: bool,
}

impl SettingsOverlayVm {
    #[must_use]
    pub fn new(only_starred: bool) -> Self {
        Self {
            open: false,
            only_starred,
            draft_only_starred: only_starred,
        }
    }

    /// Open the overlay with the draft reset to the committed value.
    pub fn open(&mut self) {
        self.draft_only_starred = self.only_starred;
        self.open = true;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn only_starred(&self) -> bool {
        self.only_starred
    }

    #[must_use]
    pub fn draft_only_starred(&self) -> bool {
        self.draft_only_starred
    }

    pub fn set_only_starred(&mut self, value: bool) {
        self.draft_only_starred = value;
    }

    /// Commit the draft and close. Returns the committed value.
    pub fn save(&mut self) -> bool {
        self.only_starred = self.draft_only_starred;
        self.open = false;
        self.only_starred
    }

    pub fn close(&mut self) {
        self.draft_only_starred = self.only_starred;
        self.open = false;
    }
}
