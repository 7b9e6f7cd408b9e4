// Copyright 2025 the RegionPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element status flags and tooltip bookkeeping.
//!
//! Each layer tracks, per [`Status`], an insertion-ordered set of element ids
//! ([`StatusSet`]). Tooltips are tracked in a separate set (`has_tooltip`) so that closing a
//! tooltip never changes selection or highlight, and vice versa.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use hashbrown::{HashMap, HashSet};
use regionplot_core::{ConfigError, ElementId};

use crate::Tooltip;

/// An interaction status an element can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Hovered or otherwise emphasised.
    Highlighted,
    /// Clicked.
    Selected,
    /// De-emphasised.
    Faded,
    /// Not drawn.
    Hidden,
}

impl Status {
    /// Every status, in a fixed order.
    pub const ALL: [Self; 4] = [Self::Highlighted, Self::Selected, Self::Faded, Self::Hidden];

    /// Returns the status name (`highlighted`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Highlighted => "highlighted",
            Self::Selected => "selected",
            Self::Faded => "faded",
            Self::Hidden => "hidden",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Highlighted => 0,
            Self::Selected => 1,
            Self::Faded => 2,
            Self::Hidden => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Status {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.name() == s)
            .ok_or_else(|| ConfigError::UnknownStatus(s.into()))
    }
}

/// An insertion-ordered set of element ids.
///
/// Re-adding a member keeps its original position; removing and re-adding moves it to the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSet {
    order: Vec<ElementId>,
    members: HashSet<ElementId>,
    revision: u64,
}

impl StatusSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id`, returning `true` if it was not already a member.
    pub fn insert(&mut self, id: ElementId) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        self.bump_revision();
        true
    }

    /// Removes `id`, returning `true` if it was a member.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|member| member != id);
        self.bump_revision();
        true
    }

    /// Returns `true` if `id` is a member.
    pub fn contains(&self, id: &ElementId) -> bool {
        self.members.contains(id)
    }

    /// Returns the members in insertion order.
    pub fn as_slice(&self) -> &[ElementId] {
        &self.order
    }

    /// Iterates over the members in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, ElementId> {
        self.order.iter()
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// A counter that changes whenever membership changes.
    ///
    /// No-op inserts and removes leave it untouched.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<'a> IntoIterator for &'a StatusSet {
    type Item = &'a ElementId;
    type IntoIter = core::slice::Iter<'a, ElementId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A boolean expression over status membership, used for tooltip `show` and `hide` rules.
///
/// In layouts an expression is a status name (`"selected"`), a negated status name
/// (`"unselected"`), or `{"and": [...]}` / `{"or": [...]}` of nested expressions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "ExprLayout"))]
pub enum StatusExpr {
    /// The element has the status.
    Is(Status),
    /// The element does not have the status.
    IsNot(Status),
    /// Every sub-expression holds. An empty list holds.
    All(Vec<StatusExpr>),
    /// Some sub-expression holds. An empty list does not hold.
    Any(Vec<StatusExpr>),
}

impl StatusExpr {
    /// Evaluates the expression for one element.
    pub fn eval(&self, tracker: &ElementStateTracker, id: &ElementId) -> bool {
        match self {
            Self::Is(status) => tracker.has(*status, id),
            Self::IsNot(status) => !tracker.has(*status, id),
            Self::All(exprs) => exprs.iter().all(|e| e.eval(tracker, id)),
            Self::Any(exprs) => exprs.iter().any(|e| e.eval(tracker, id)),
        }
    }
}

impl FromStr for StatusExpr {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(status) = s.parse() {
            return Ok(Self::Is(status));
        }
        match s.strip_prefix("un").map(str::parse::<Status>) {
            Some(Ok(status)) => Ok(Self::IsNot(status)),
            _ => Err(ConfigError::UnknownStatus(s.into())),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ExprLayout {
    Name(alloc::string::String),
    And { and: Vec<ExprLayout> },
    Or { or: Vec<ExprLayout> },
}

#[cfg(feature = "serde")]
impl TryFrom<ExprLayout> for StatusExpr {
    type Error = ConfigError;

    fn try_from(layout: ExprLayout) -> Result<Self, Self::Error> {
        let all = |exprs: Vec<ExprLayout>| {
            exprs
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
        };
        match layout {
            ExprLayout::Name(name) => name.parse(),
            ExprLayout::And { and } => Ok(Self::All(all(and)?)),
            ExprLayout::Or { or } => Ok(Self::Any(all(or)?)),
        }
    }
}

/// Interaction state for the elements of one layer.
///
/// The tracker only deals in [`ElementId`]s. Resolving records to ids, and deciding when a
/// tooltip should open, is the data layer's job.
#[derive(Clone, Debug, Default)]
pub struct ElementStateTracker {
    flags: [StatusSet; 4],
    has_tooltip: StatusSet,
    tooltips: HashMap<ElementId, Tooltip>,
    dismissed: HashSet<ElementId>,
}

impl ElementStateTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the members of `status`.
    pub fn status(&self, status: Status) -> &StatusSet {
        &self.flags[status.slot()]
    }

    /// Returns `true` if the element has `status`.
    pub fn has(&self, status: Status, id: &ElementId) -> bool {
        self.status(status).contains(id)
    }

    /// Adds or removes `id` from `status`.
    ///
    /// With `exclusive`, every other member is removed first. Returns the ids whose membership
    /// changed, in the order they changed.
    pub fn set(
        &mut self,
        status: Status,
        id: &ElementId,
        active: bool,
        exclusive: bool,
    ) -> Vec<ElementId> {
        let set = &mut self.flags[status.slot()];
        let mut changed = Vec::new();
        if exclusive {
            let others: Vec<_> = set.iter().filter(|m| *m != id).cloned().collect();
            for other in others {
                set.remove(&other);
                changed.push(other);
            }
        }
        let mutated = if active {
            set.insert(id.clone())
        } else {
            set.remove(id)
        };
        if mutated {
            changed.push(id.clone());
        }
        for id in &changed {
            self.dismissed.remove(id);
        }
        regionplot_core::trace!(
            status = status.name(),
            id = id.as_str(),
            active,
            exclusive,
            changed = changed.len(),
            "status updated"
        );
        changed
    }

    /// Returns the ids with an open tooltip, in the order the tooltips opened.
    pub fn has_tooltip(&self) -> &StatusSet {
        &self.has_tooltip
    }

    /// Returns the open tooltip of an element.
    pub fn tooltip(&self, id: &ElementId) -> Option<&Tooltip> {
        self.tooltips.get(id)
    }

    /// Returns a mutable reference to the open tooltip of an element.
    pub fn tooltip_mut(&mut self, id: &ElementId) -> Option<&mut Tooltip> {
        self.tooltips.get_mut(id)
    }

    /// Iterates over open tooltips in the order they opened.
    pub fn tooltips(&self) -> impl Iterator<Item = &Tooltip> + '_ {
        self.has_tooltip
            .iter()
            .filter_map(|id| self.tooltips.get(id))
    }

    /// Opens a tooltip, or updates the one already open for the same element.
    ///
    /// An existing anchor is kept when the new descriptor has none.
    pub fn open_tooltip(&mut self, mut tooltip: Tooltip) {
        let id = tooltip.id.clone();
        self.dismissed.remove(&id);
        if let Some(existing) = self.tooltips.get(&id) {
            tooltip.anchor = tooltip.anchor.or(existing.anchor);
        }
        self.has_tooltip.insert(id.clone());
        self.tooltips.insert(id, tooltip);
    }

    /// Closes a tooltip. With `dismiss`, it stays closed until the element's status changes
    /// or the tooltip is opened explicitly.
    ///
    /// Only an open tooltip can be dismissed; closing an element without one changes nothing.
    pub fn close_tooltip(&mut self, id: &ElementId, dismiss: bool) -> Option<Tooltip> {
        self.has_tooltip.remove(id);
        let closed = self.tooltips.remove(id)?;
        if dismiss {
            self.dismissed.insert(id.clone());
        }
        Some(closed)
    }

    /// Returns `true` if the user closed the element's tooltip and nothing has reopened it.
    pub fn is_dismissed(&self, id: &ElementId) -> bool {
        self.dismissed.contains(id)
    }

    /// Closes every tooltip whose element fails `keep`, without marking it dismissed.
    pub fn retain_tooltips(&mut self, mut keep: impl FnMut(&ElementId) -> bool) {
        let gone: Vec<_> = self.has_tooltip.iter().filter(|id| !keep(id)).cloned().collect();
        for id in &gone {
            self.close_tooltip(id, false);
        }
    }
}
