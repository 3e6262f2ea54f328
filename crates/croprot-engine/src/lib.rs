pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("no plots configured")]
    NoPlots,
    #[display("{count} plots configured, at most {max} are supported")]
    TooManyPlots { count: usize, max: usize },
    #[display("plot {} is missing color {}", plot + 1, slot + 1)]
    MissingColor { plot: usize, slot: usize },
    #[display("{seeds} starting seeds configured, at most {max} are supported")]
    TooManySeeds { seeds: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ActivationError {
    #[display("field {field} does not exist")]
    UnknownField { field: FieldId },
    #[display("field {field} holds {actual} seeds, not {expected}")]
    ColorMismatch {
        field: FieldId,
        expected: Color,
        actual: Color,
    },
    #[display("field {field} cannot be activated: plot closed or field already used")]
    Unavailable { field: FieldId },
}
