use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Color, SeedTiers};

/// Number of fields (color slots) in every plot.
pub const FIELDS_PER_PLOT: usize = 2;

/// Location of a field: owning plot index and slot within that plot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FieldId {
    pub plot: usize,
    pub slot: usize,
}

impl FieldId {
    #[must_use]
    pub const fn new(plot: usize, slot: usize) -> Self {
        Self { plot, slot }
    }

    /// The other field of the same plot.
    #[must_use]
    pub const fn sibling(self) -> Self {
        Self {
            plot: self.plot,
            slot: 1 - (self.slot % FIELDS_PER_PLOT),
        }
    }
}

/// Displayed 1-based, the way players count plots.
impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.plot + 1, self.slot + 1)
    }
}

/// The two colors of a plot, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorPair(pub Color, pub Color);

impl ColorPair {
    #[must_use]
    pub const fn slot(self, slot: usize) -> Color {
        if slot == 0 { self.0 } else { self.1 }
    }

    /// Order-independent form, used to detect duplicate plot layouts.
    #[must_use]
    pub fn signature(self) -> (Color, Color) {
        if self.0 <= self.1 {
            (self.0, self.1)
        } else {
            (self.1, self.0)
        }
    }
}

impl fmt::Display for ColorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0.code(), self.1.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    id: FieldId,
    color: Color,
    seeds: SeedTiers,
    used: bool,
}

impl Field {
    #[must_use]
    pub const fn new(id: FieldId, color: Color, starting_seeds: u32) -> Self {
        Self {
            id,
            color,
            seeds: SeedTiers::starting(starting_seeds),
            used: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> FieldId {
        self.id
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub const fn seeds(&self) -> &SeedTiers {
        &self.seeds
    }

    #[must_use]
    pub const fn is_used(&self) -> bool {
        self.used
    }

    pub(crate) const fn mark_used(&mut self) {
        self.used = true;
    }

    pub(crate) const fn set_seeds(&mut self, seeds: SeedTiers) {
        self.seeds = seeds;
    }
}

/// A plot owns two fields and can be activated until it fails or runs out
/// of unused fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plot {
    index: usize,
    fields: [Field; FIELDS_PER_PLOT],
    active: bool,
    failed: bool,
}

impl Plot {
    #[must_use]
    pub const fn new(index: usize, colors: ColorPair, starting_seeds: u32) -> Self {
        Self {
            index,
            fields: [
                Field::new(FieldId::new(index, 0), colors.0, starting_seeds),
                Field::new(FieldId::new(index, 1), colors.1, starting_seeds),
            ],
            active: true,
            failed: false,
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn colors(&self) -> ColorPair {
        ColorPair(self.fields[0].color, self.fields[1].color)
    }

    #[must_use]
    pub const fn fields(&self) -> &[Field; FIELDS_PER_PLOT] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, slot: usize) -> Option<&Field> {
        self.fields.get(slot)
    }

    pub(crate) fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether an activation of this plot has ever failed.
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn unused_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|f| !f.used)
    }

    pub(crate) fn close_after(&mut self, success: bool) {
        if !success {
            self.failed = true;
        }
        if self.failed || self.fields.iter().all(|f| f.used) {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_flips_slot() {
        assert_eq!(FieldId::new(3, 0).sibling(), FieldId::new(3, 1));
        assert_eq!(FieldId::new(3, 1).sibling(), FieldId::new(3, 0));
    }

    #[test]
    fn test_signature_ignores_slot_order() {
        let a = ColorPair(Color::Red, Color::Yellow);
        let b = ColorPair(Color::Yellow, Color::Red);
        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.to_string(), "RY");
    }

    #[test]
    fn test_plot_closes_on_failure_or_exhaustion() {
        let mut plot = Plot::new(0, ColorPair(Color::Yellow, Color::Red), 23);
        plot.fields_mut().next().unwrap().mark_used();
        plot.close_after(true);
        assert!(plot.is_active());
        assert_eq!(plot.unused_fields().map(Field::color).collect::<Vec<_>>(), vec![Color::Red]);

        plot.fields_mut().nth(1).unwrap().mark_used();
        plot.close_after(true);
        assert!(!plot.is_active());
        assert!(!plot.has_failed());

        let mut failed = Plot::new(1, ColorPair(Color::Blue, Color::Red), 23);
        failed.fields_mut().nth(1).unwrap().mark_used();
        failed.close_after(false);
        assert!(!failed.is_active());
        assert!(failed.has_failed());
        assert_eq!(failed.unused_fields().count(), 1);
    }
}
