//! Soft failures raised while building or querying rule tables.
//!
//! Nothing here aborts a build. Builders and the matcher hand each warning to
//! the [`Diagnostics`] sink they were given; callers pick whether warnings go
//! to the log ([`LogDiagnostics`]) or into a list (`Vec<MapperWarning>`).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperWarning {
    /// A culture rule condition that cannot be evaluated. Never matches.
    #[error("unhandled distinguisher type '{kind}' (value '{value}') in culture rules")]
    UnrecognizedDistinguisher { kind: String, value: String },

    #[error("'{value}' is not a province id (in {context})")]
    InvalidProvinceId { context: String, value: String },

    /// A region lists an area that `area.txt` never defines. The area is skipped.
    #[error("region '{region}' references undefined area '{area}'")]
    UndefinedArea { region: String, area: String },

    #[error("idea '{idea}': cannot read {effect} value '{value}', using 0")]
    InvalidEffectValue {
        idea: String,
        effect: &'static str,
        value: String,
    },
}

/// Receives warnings from builders and the culture matcher.
pub trait Diagnostics {
    fn warn(&mut self, warning: MapperWarning);
}

/// Forwards warnings to `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&mut self, warning: MapperWarning) {
        log::warn!("{}", warning);
    }
}

impl Diagnostics for Vec<MapperWarning> {
    fn warn(&mut self, warning: MapperWarning) {
        self.push(warning);
    }
}
