//! Review session state machine.
//!
//! A session walks the catalog one product at a time. The whole state is a
//! single owned [`SessionState`] value and every user action is a pure
//! transition:
//!
//! ```text
//! (SessionState, Action) -> SessionState
//! ```
//!
//! Side effects (reloading the catalog, building the PDF, opening the share
//! link) belong to the caller. Restart takes the freshly loaded catalog as
//! part of the action for that reason.
//!
//! # Screens
//!
//! ```text
//! start    --Start (catalog non-empty)-->  checking
//! checking --Skip (index += 1)---------->  checking
//! checking --Order---------------------->  ordering
//! checking --(index == catalog len)----->  summary
//! ordering --Cancel--------------------->  checking
//! ordering --Confirm(q) (index += 1)---->  checking   appends a line when q > 0
//! summary  --Restart(catalog)----------->  start      index 0, orders cleared
//! ```
//!
//! A `checking` state whose index has reached the end of the catalog settles
//! into `summary` as part of the same transition, so no caller ever sees a
//! `checking` screen without a current product.

use crate::catalog::{Catalog, ProductRecord};
use serde::{Deserialize, Serialize};

/// The four screens of a review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Start,
    Checking,
    Ordering,
    Summary,
}

/// One confirmed order entry. `quantity` is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u64,
    pub unit: String,
}

impl OrderLine {
    pub fn new(name: impl Into<String>, quantity: u64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

/// User-triggered events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Begin reviewing from the start screen.
    Start,
    /// "We have it": move on to the next product.
    Skip,
    /// "Need it": ask for a quantity.
    Order,
    /// Leave quantity entry without ordering.
    Cancel,
    /// Confirm the quantity for the current product. Values <= 0 advance
    /// without ordering.
    Confirm { quantity: i64 },
    /// Reset the session with a freshly loaded catalog.
    Restart { catalog: Catalog },
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Skip => "skip",
            Action::Order => "order",
            Action::Cancel => "cancel",
            Action::Confirm { .. } => "confirm",
            Action::Restart { .. } => "restart",
        }
    }
}

/// Per-session review state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub screen: Screen,
    /// Position of the product under review. Never decreases within a session.
    pub index: usize,
    pub orders: Vec<OrderLine>,
    pub catalog: Catalog,
    /// The line appended by the most recent transition, if it was a confirm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_confirmed: Option<OrderLine>,
}

impl SessionState {
    /// Fresh session on the start screen.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Product under review, if the screen shows one.
    pub fn current_product(&self) -> Option<&ProductRecord> {
        match self.screen {
            Screen::Checking | Screen::Ordering => self.catalog.get(self.index),
            Screen::Start | Screen::Summary => None,
        }
    }

    /// `(1-based position, total)` of the current product.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.catalog.len();
        ((self.index + 1).min(total), total)
    }

    /// Whether `action` would change the state.
    pub fn accepts(&self, action: &Action) -> bool {
        let in_catalog = self.index < self.catalog.len();
        match (self.screen, action) {
            (Screen::Start, Action::Start) => !self.catalog.is_empty(),
            (Screen::Checking, Action::Skip | Action::Order) => in_catalog,
            (Screen::Ordering, Action::Cancel) => true,
            (Screen::Ordering, Action::Confirm { quantity }) => in_catalog && *quantity > 0,
            (Screen::Summary, Action::Restart { .. }) => true,
            _ => false,
        }
    }

    /// Apply one user action.
    ///
    /// Actions that do not apply to the current screen return the state
    /// unchanged. `Confirm` with a quantity <= 0 is the exception: the
    /// interface never offers it, but if it arrives it advances without
    /// ordering.
    pub fn dispatch(mut self, action: Action) -> SessionState {
        let screen = self.screen;
        let label = action.label();
        self.last_confirmed = None;

        let in_catalog = self.index < self.catalog.len();
        let next = match (screen, action) {
            (Screen::Start, Action::Start) if !self.catalog.is_empty() => {
                self.screen = Screen::Checking;
                self
            }
            (Screen::Checking, Action::Skip) if in_catalog => {
                self.index += 1;
                self
            }
            (Screen::Checking, Action::Order) if in_catalog => {
                self.screen = Screen::Ordering;
                self
            }
            (Screen::Ordering, Action::Cancel) => {
                self.screen = Screen::Checking;
                self
            }
            (Screen::Ordering, Action::Confirm { quantity }) => {
                if let (Some(product), Ok(quantity @ 1..)) =
                    (self.catalog.get(self.index), u64::try_from(quantity))
                {
                    let line = OrderLine::new(&product.name, quantity, &product.unit);
                    self.orders.push(line.clone());
                    self.last_confirmed = Some(line);
                }
                self.index = (self.index + 1).min(self.catalog.len());
                self.screen = Screen::Checking;
                self
            }
            (Screen::Summary, Action::Restart { catalog }) => SessionState::new(catalog),
            (_, _) => {
                tracing::debug!(?screen, action = label, "action ignored on this screen");
                self
            }
        };

        let next = next.settle();
        if next.screen != screen {
            tracing::debug!(from = ?screen, to = ?next.screen, action = label, "screen change");
        }
        next
    }

    /// Move a `checking` state past the end of the catalog to `summary`.
    fn settle(mut self) -> Self {
        if self.screen == Screen::Checking && self.index >= self.catalog.len() {
            self.screen = Screen::Summary;
        }
        self
    }
}
