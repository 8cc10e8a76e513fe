//! Combination of I-VT and I-DT label sequences.

use crate::core::types::{Label, LabelSequence};
use crate::error::FixationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the velocity and dispersion labels are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Fixation only where both algorithms agree
    #[default]
    And,
    /// Fixation where either algorithm reports one
    Or,
    /// Velocity labels only
    VtOnly,
    /// Dispersion labels only
    DtOnly,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::And, Mode::Or, Mode::VtOnly, Mode::DtOnly];

    /// Map the dashboard's integer code (0 = AND, 1 = OR, 2 = I-VT, 3 = I-DT).
    pub fn from_code(code: i64) -> Result<Self, FixationError> {
        match code {
            0 => Ok(Mode::And),
            1 => Ok(Mode::Or),
            2 => Ok(Mode::VtOnly),
            3 => Ok(Mode::DtOnly),
            other => Err(FixationError::InvalidMode(other.to_string())),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Mode::And => 0,
            Mode::Or => 1,
            Mode::VtOnly => 2,
            Mode::DtOnly => 3,
        }
    }

    /// Short display name as shown in the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Mode::And => "AND",
            Mode::Or => "OR",
            Mode::VtOnly => "I-VT",
            Mode::DtOnly => "I-DT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = FixationError;

    /// Accepts names (`and`, `or`, `ivt`, `idt`, `vt_only`, `dt_only`,
    /// `i-vt`, `i-dt`, case-insensitive) and the codes `0`-`3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "and" => Ok(Mode::And),
            "or" => Ok(Mode::Or),
            "ivt" | "i-vt" | "vt" | "vt_only" => Ok(Mode::VtOnly),
            "idt" | "i-dt" | "dt" | "dt_only" => Ok(Mode::DtOnly),
            _ => match name.parse::<i64>() {
                Ok(code) => Mode::from_code(code),
                Err(_) => Err(FixationError::InvalidMode(s.to_string())),
            },
        }
    }
}

/// Merge velocity and dispersion labels under `mode`.
///
/// The combined sequence splits a fixation at index `i` only if an input
/// records a boundary there. Under [`Mode::And`] any such boundary splits.
/// Under [`Mode::Or`] it splits only when neither input runs continuously
/// across `i`.
pub fn combine_labels(
    ivt: &LabelSequence,
    idt: &LabelSequence,
    mode: Mode,
) -> Result<LabelSequence, FixationError> {
    if ivt.len() != idt.len() {
        return Err(FixationError::length_mismatch(
            "ivt_labels",
            ivt.len(),
            "idt_labels",
            idt.len(),
        ));
    }

    if mode == Mode::VtOnly {
        return Ok(ivt.clone());
    }
    if mode == Mode::DtOnly {
        return Ok(idt.clone());
    }

    let labels: Vec<Label> = ivt
        .iter()
        .zip(idt.iter())
        .map(|(a, b)| {
            let fixation = match mode {
                Mode::And => a.is_fixation() && b.is_fixation(),
                _ => a.is_fixation() || b.is_fixation(),
            };
            if fixation {
                Label::Fixation
            } else {
                Label::Saccade
            }
        })
        .collect();

    let boundaries: Vec<usize> = (1..labels.len())
        .filter(|&i| labels[i - 1].is_fixation() && labels[i].is_fixation())
        .filter(|&i| ivt.is_boundary(i) || idt.is_boundary(i))
        .filter(|&i| mode == Mode::And || !(ivt.continues_at(i) || idt.continues_at(i)))
        .collect();

    Ok(LabelSequence::from_parts(labels, boundaries))
}
