//! Candidate sequence enumeration.
//!
//! Sequences of every length from 1 to the lookahead depth are produced,
//! shortest first, so the best immediate move can come from a short plan.
//! A sequence never targets the same field twice, but both fields of one
//! plot may appear: a success keeps the plot open for its second field.
//!
//! Enumeration stops at a fixed sequence count. Whatever would have come
//! after the cap is simply not generated, and the result says so.

use std::ops::ControlFlow;

use croprot_engine::Activation;

/// A plan of activations, first step first.
pub type Sequence = Vec<Activation>;

#[derive(Debug, Clone, Copy)]
pub struct SequenceGenerator {
    lookahead_depth: usize,
    max_sequences: usize,
}

#[derive(Debug, Clone, Default)]
pub struct GeneratedSequences {
    pub sequences: Vec<Sequence>,
    /// Whether more sequences existed than the cap allowed.
    pub truncated: bool,
}

impl SequenceGenerator {
    #[must_use]
    pub const fn new(lookahead_depth: usize, max_sequences: usize) -> Self {
        Self {
            lookahead_depth,
            max_sequences,
        }
    }

    #[must_use]
    pub fn generate(&self, available: &[Activation]) -> GeneratedSequences {
        let mut out = GeneratedSequences::default();
        let max_length = self.lookahead_depth.min(available.len());
        let mut current = Vec::with_capacity(max_length);

        for length in 1..=max_length {
            if self.extend(available, length, &mut current, &mut out).is_break() {
                out.truncated = true;
                break;
            }
        }
        if out.truncated {
            tracing::debug!(
                cap = self.max_sequences,
                depth = self.lookahead_depth,
                "sequence generation truncated"
            );
        }
        out
    }

    fn extend(
        &self,
        available: &[Activation],
        length: usize,
        current: &mut Sequence,
        out: &mut GeneratedSequences,
    ) -> ControlFlow<()> {
        if current.len() == length {
            if out.sequences.len() >= self.max_sequences {
                return ControlFlow::Break(());
            }
            out.sequences.push(current.clone());
            return ControlFlow::Continue(());
        }

        for activation in available {
            if current.iter().any(|a| a.field_id() == activation.field_id()) {
                continue;
            }
            current.push(*activation);
            let flow = self.extend(available, length, current, out);
            current.pop();
            flow?;
        }
        ControlFlow::Continue(())
    }
}
