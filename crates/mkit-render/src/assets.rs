//! Asynchronously loaded images and their load tokens.
//!
//! The host fetches logo files and reads uploads on its own schedule. Each
//! request is stamped with a [`LoadToken`]; only the newest request for a
//! slot may store its result, so a slow earlier load can never overwrite a
//! later one.

use crate::bitmap::{Bitmap, DecodeError};

/// Identifies one load request. Tokens increase per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(pub u64);

/// One image slot (the logo or the uploaded background).
#[derive(Debug, Default)]
pub struct AssetSlot {
    issued: u64,
    bitmap: Option<Bitmap>,
    source: Option<String>,
}

impl AssetSlot {
    /// Start a new load, invalidating any request still in flight.
    ///
    /// The current bitmap stays visible until the new one arrives.
    pub fn begin(&mut self, source: impl Into<String>) -> LoadToken {
        self.issued += 1;
        let source = source.into();
        log::debug!("load #{} started: {source}", self.issued);
        self.source = Some(source);
        LoadToken(self.issued)
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        token.0 == self.issued
    }

    /// Store a finished load. Returns `false` (and drops `bitmap`) when a
    /// newer request has been issued since `token`.
    pub fn complete(&mut self, token: LoadToken, bitmap: Bitmap) -> bool {
        if !self.is_current(token) {
            log::debug!("load #{} superseded by #{}, ignored", token.0, self.issued);
            return false;
        }
        log::debug!("load #{} complete: {bitmap:?}", token.0);
        self.bitmap = Some(bitmap);
        true
    }

    /// Decode `bytes` and store the result for `token`.
    ///
    /// Stale tokens are ignored before decoding. A decode failure on the
    /// current token clears the slot so the element is omitted.
    pub fn complete_bytes(&mut self, token: LoadToken, bytes: &[u8]) -> Result<bool, DecodeError> {
        if !self.is_current(token) {
            log::debug!("load #{} superseded by #{}, ignored", token.0, self.issued);
            return Ok(false);
        }
        match Bitmap::decode(bytes) {
            Ok(bitmap) => Ok(self.complete(token, bitmap)),
            Err(err) => {
                self.fail(token);
                Err(err)
            }
        }
    }

    /// Record a failed load. The element is omitted until a later load
    /// succeeds, and the source is forgotten so the host may fetch it again.
    pub fn fail(&mut self, token: LoadToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        log::warn!(
            "load #{} failed: {}",
            token.0,
            self.source.as_deref().unwrap_or("<unknown>")
        );
        self.bitmap = None;
        self.source = None;
        true
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    /// Where the current bitmap (or pending load) came from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Drop the bitmap and invalidate outstanding loads.
    pub fn clear(&mut self) {
        self.issued += 1;
        self.bitmap = None;
        self.source = None;
    }
}

/// The two image slots a render can draw from.
#[derive(Debug, Default)]
pub struct Assets {
    pub logo: AssetSlot,
    pub background: AssetSlot,
}
