use url::Url;

use crate::link;
use crate::overlay::{ShareCard, ShareOverlay};
use crate::profile::{Field, Profile};
use crate::qr::QrOptions;
use crate::Result;

#[derive(Eq, PartialEq, Clone, Debug, Default)]
enum FieldMode {
    #[default]
    View,
    Editing {
        draft: String,
    },
}

/// How a row of the editor is drawn.
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum RowDisplay {
    /// Label followed by the value as a link; tapping opens the URL.
    Link(Url),
    /// Label and value as plain text, tapping does nothing.
    Plain,
    /// An edit box holding `draft`.
    Editing { draft: String, single_line: bool },
}

#[derive(Eq, PartialEq, Clone, Debug)]
pub struct FieldRow {
    pub field: Field,
    pub value: String,
    pub display: RowDisplay,
}

impl FieldRow {
    pub fn label(&self) -> &'static str {
        self.field.label()
    }

    /// Text of the row in view state, e.g. `Website: https://example.com`.
    pub fn text(&self) -> String {
        format!("{}: {}", self.label(), self.value)
    }

    pub fn is_link(&self) -> bool {
        matches!(self.display, RowDisplay::Link(_))
    }
}

/// Owns the profile being edited, the edit state of each field and the
/// share overlay. Every mutation goes through one of its methods.
#[derive(Debug)]
pub struct ProfileEditor {
    profile: Profile,
    modes: [FieldMode; 3],
    overlay: ShareOverlay,
    share_error: Option<String>,
    options: QrOptions,
}

impl Default for ProfileEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileEditor {
    /// Editor over the placeholder profile with default QR options.
    pub fn new() -> Self {
        Self::with_profile(Profile::placeholder())
    }

    pub fn with_profile(profile: Profile) -> Self {
        Self {
            profile,
            modes: Default::default(),
            overlay: ShareOverlay::Hidden,
            share_error: None,
            options: QrOptions::default(),
        }
    }

    pub fn with_options(mut self, options: QrOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &QrOptions {
        &self.options
    }

    /// Committed value of `field`. Drafts are never visible here.
    pub fn field(&self, field: Field) -> &str {
        self.profile.get(field)
    }

    pub fn is_editing(&self, field: Field) -> bool {
        matches!(self.modes[field.index()], FieldMode::Editing { .. })
    }

    pub fn draft(&self, field: Field) -> Option<&str> {
        match &self.modes[field.index()] {
            FieldMode::Editing { draft } => Some(draft),
            FieldMode::View => None,
        }
    }

    /// Switches `field` into edit state with its committed value as the
    /// draft. A field already being edited keeps its draft.
    pub fn begin_edit(&mut self, field: Field) {
        let mode = &mut self.modes[field.index()];
        if let FieldMode::View = mode {
            log::trace!("Editing {}", field);
            *mode = FieldMode::Editing {
                draft: self.profile.get(field).to_owned(),
            };
        }
    }

    /// Replaces the draft of a field being edited. Ignored otherwise.
    pub fn update_draft<S: Into<String>>(&mut self, field: Field, text: S) {
        match &mut self.modes[field.index()] {
            FieldMode::Editing { draft } => *draft = text.into(),
            FieldMode::View => {
                log::trace!("{} is not being edited, draft dropped", field)
            }
        }
    }

    /// Stores `value` as the field's value and returns it to view state.
    /// Any text is accepted.
    pub fn commit_edit<S: Into<String>>(&mut self, field: Field, value: S) {
        let profile = std::mem::take(&mut self.profile);
        self.profile = profile.with(field, value.into());
        self.modes[field.index()] = FieldMode::View;
        self.share_error = None;
        log::debug!("Committed {}", field);
    }

    /// Commits the current draft. Does nothing when not editing.
    pub fn commit_draft(&mut self, field: Field) {
        if let FieldMode::Editing { draft } =
            std::mem::take(&mut self.modes[field.index()])
        {
            self.commit_edit(field, draft);
        }
    }

    /// Leaves edit state, discarding the draft.
    pub fn cancel_edit(&mut self, field: Field) {
        self.modes[field.index()] = FieldMode::View;
    }

    /// Copy of the committed values. In-progress drafts are not included.
    pub fn snapshot(&self) -> Profile {
        self.profile.clone()
    }

    /// Opens the share overlay for the current snapshot.
    ///
    /// While the overlay is shown the cached card is returned as is. When
    /// the payload cannot be encoded the overlay stays hidden and the error
    /// is both returned and kept for [`Self::share_error`].
    pub fn request_share(&mut self) -> Result<&ShareCard> {
        let snapshot = self.snapshot();
        let options = &self.options;
        match self
            .overlay
            .show_with(|| ShareCard::build(snapshot, options))
        {
            Ok(card) => {
                self.share_error = None;
                Ok(card)
            }
            Err(e) => {
                log::warn!("Could not share profile: {}", e);
                self.share_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.overlay.dismiss();
    }

    pub fn overlay(&self) -> &ShareOverlay {
        &self.overlay
    }

    /// Message to show inline after a failed share.
    pub fn share_error(&self) -> Option<&str> {
        self.share_error.as_deref()
    }

    /// URL to open when `field` is tapped: only the website, in view
    /// state, holding a valid link.
    pub fn tap(&self, field: Field) -> Option<Url> {
        match self.row_display(field) {
            RowDisplay::Link(url) => Some(url),
            _ => None,
        }
    }

    /// Long-press enters edit mode regardless of the field's content.
    pub fn long_press(&mut self, field: Field) {
        self.begin_edit(field);
    }

    /// Any tap inside the overlay closes it.
    pub fn tap_overlay(&mut self) {
        self.dismiss();
    }

    pub fn row(&self, field: Field) -> FieldRow {
        FieldRow {
            field,
            value: self.profile.get(field).to_owned(),
            display: self.row_display(field),
        }
    }

    pub fn rows(&self) -> Vec<FieldRow> {
        Field::ALL
            .into_iter()
            .map(|field| self.row(field))
            .collect()
    }

    fn row_display(&self, field: Field) -> RowDisplay {
        match &self.modes[field.index()] {
            FieldMode::Editing { draft } => RowDisplay::Editing {
                draft: draft.clone(),
                single_line: field.is_single_line(),
            },
            FieldMode::View if field == Field::Website => {
                match link::link_target(self.profile.get(field)) {
                    Some(url) => RowDisplay::Link(url),
                    None => RowDisplay::Plain,
                }
            }
            FieldMode::View => RowDisplay::Plain,
        }
    }
}
