//! User-facing notifications.
//!
//! Failed cart operations surface one of four fixed, localized messages.
//! Successful operations are silent.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

/// Messages the cart can show to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Requested quantity exceeds the available stock.
    OutOfStock,
    /// Adding a product failed.
    AddFailed,
    /// Removing a product failed (including "not in cart").
    RemoveFailed,
    /// Changing a quantity failed (including "not in cart").
    UpdateFailed,
}

/// Language for notice text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    PtBr,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt-br" | "pt_br" | "pt" => Ok(Self::PtBr),
            "en" | "en-us" | "en_us" => Ok(Self::En),
            other => Err(format!("unsupported locale '{other}' (expected pt-BR or en)")),
        }
    }
}

impl Notice {
    /// Localized text for this notice.
    #[must_use]
    pub const fn message(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::PtBr, Self::OutOfStock) => "Quantidade solicitada fora de estoque",
            (Locale::PtBr, Self::AddFailed) => "Erro na adição do produto",
            (Locale::PtBr, Self::RemoveFailed) => "Erro na remoção do produto",
            (Locale::PtBr, Self::UpdateFailed) => "Erro na alteração de quantidade do produto",
            (Locale::En, Self::OutOfStock) => "Requested quantity is out of stock",
            (Locale::En, Self::AddFailed) => "Error adding product",
            (Locale::En, Self::RemoveFailed) => "Error removing product",
            (Locale::En, Self::UpdateFailed) => "Error changing product quantity",
        }
    }
}

/// Sink for user-facing notices. Fire-and-forget.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Writes notices to the `tracing` log in the configured language.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier {
    locale: Locale,
}

impl LogNotifier {
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(notice = ?notice, "{}", notice.message(self.locale));
    }
}

/// Keeps every notice in memory, in order.
///
/// Clones share the same buffer, so a clone handed to a store can be
/// inspected through the original.
#[derive(Debug, Clone, Default)]
pub struct CollectingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl CollectingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all notices received so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
