//! World-file (`.tfw`, `.jgw`, `.pgw`, ...) encoding of affine parameters.
//!
//! A world file is six lines, in order: `A`, `D`, `B`, `E`, `C`, `F`.

use crate::AffineParameters;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldFileError {
    #[error("world file must have 6 lines, got {got}")]
    LineCount { got: usize },
    #[error("invalid number on line {line}: {value:?}")]
    InvalidNumber { line: usize, value: String },
}

impl AffineParameters {
    /// Render as world-file text, each value followed by `\n`.
    ///
    /// Magnitudes below `1e-6` or from `1e21` up use exponent notation
    /// (`-8.326672684688673e-17`, `1e+21`).
    pub fn to_world_file(&self) -> String {
        [self.a, self.d, self.b, self.e, self.c, self.f]
            .iter()
            .fold(String::new(), |mut out, &v| {
                out.push_str(&format_value(v));
                out.push('\n');
                out
            })
    }

    /// Parse world-file text.
    pub fn from_world_file(text: &str) -> Result<Self, WorldFileError> {
        let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();
        if lines.len() != 6 {
            return Err(WorldFileError::LineCount { got: lines.len() });
        }

        let mut values = [0.0_f64; 6];
        for (i, (slot, raw)) in values.iter_mut().zip(&lines).enumerate() {
            *slot = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| WorldFileError::InvalidNumber {
                    line: i + 1,
                    value: (*raw).to_string(),
                })?;
        }

        let [a, d, b, e, c, f] = values;
        Ok(AffineParameters { a, b, c, d, e, f })
    }
}

fn format_value(v: f64) -> String {
    let mag = v.abs();
    if v == 0.0 || !v.is_finite() || (1e-6..1e21).contains(&mag) {
        return format!("{v}");
    }
    let sci = format!("{v:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => sci,
    }
}
