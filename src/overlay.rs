use crate::payload::{self, Payload};
use crate::profile::Profile;
use crate::qr::{self, QrBitmap, QrOptions};
use crate::Result;

/// Everything the share overlay displays, computed once when it opens.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct ShareCard {
    pub snapshot: Profile,
    pub payload: Payload,
    pub bitmap: QrBitmap,
}

impl ShareCard {
    pub fn build(snapshot: Profile, options: &QrOptions) -> Result<Self> {
        let payload = payload::serialize(&snapshot)?;
        let bitmap = qr::render_with(payload.as_str(), options)?;
        Ok(Self {
            snapshot,
            payload,
            bitmap,
        })
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Default)]
pub enum ShareOverlay {
    #[default]
    Hidden,
    Shown(ShareCard),
}

impl ShareOverlay {
    pub fn is_shown(&self) -> bool {
        matches!(self, ShareOverlay::Shown(_))
    }

    pub fn card(&self) -> Option<&ShareCard> {
        match self {
            ShareOverlay::Shown(card) => Some(card),
            ShareOverlay::Hidden => None,
        }
    }

    /// Returns the card being shown, building it with `build` first when
    /// hidden. A failed build leaves the overlay hidden.
    pub fn show_with<F>(&mut self, build: F) -> Result<&ShareCard>
    where
        F: FnOnce() -> Result<ShareCard>,
    {
        if let ShareOverlay::Hidden = self {
            *self = ShareOverlay::Shown(build()?);
            log::debug!("Share overlay shown");
        }
        match self {
            ShareOverlay::Shown(card) => Ok(card),
            ShareOverlay::Hidden => unreachable!("overlay was just shown"),
        }
    }

    /// Hides the overlay and drops the cached card. Returns whether
    /// anything was shown.
    pub fn dismiss(&mut self) -> bool {
        let was_shown = self.is_shown();
        *self = ShareOverlay::Hidden;
        if was_shown {
            log::debug!("Share overlay dismissed");
        }
        was_shown
    }
}
