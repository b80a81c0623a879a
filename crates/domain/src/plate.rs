// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Prefix of every issued plate code.
pub const PLATE_PREFIX: char = 'K';

/// Prefix of the placeholder held by a plate until it is issued.
pub const PLACEHOLDER_PREFIX: &str = "PEND-";

const PLATE_SPACE: u32 = 1_000_000;

/// Formats a plate code: `K` followed by six zero-padded digits.
///
/// Values outside the six-digit range wrap.
#[must_use]
pub fn format_plate_code(number: u32) -> String {
    format!("{PLATE_PREFIX}{:06}", number % PLATE_SPACE)
}

/// Returns the placeholder code for a vehicle's pending plate.
///
/// Placeholders never match the issued code format.
#[must_use]
pub fn placeholder_code(vehiculo_id: i64) -> String {
    format!("{PLACEHOLDER_PREFIX}{vehiculo_id:010}")
}

/// Returns true if `code` has the issued plate format.
#[must_use]
pub fn is_plate_code(code: &str) -> bool {
    code.len() == 7
        && code.starts_with(PLATE_PREFIX)
        && code[1..].chars().all(|c| c.is_ascii_digit())
}

/// A plate code chosen by [`issue_plate_code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub code: String,
    /// Number of random draws consumed.
    pub attempts: u32,
    /// True if every draw collided and the timestamp fallback was used.
    pub fallback: bool,
}

/// Chooses a plate code.
///
/// Draws up to `max_attempts` random numbers and returns the first code for
/// which `is_taken` reports false. If every draw collides, the code is
/// derived from the trailing six digits of `fallback_seed` (normally the
/// current time) without a further check. The storage layer's uniqueness
/// constraint is the final arbiter for that case.
///
/// # Errors
///
/// Propagates any error returned by `is_taken`.
pub fn issue_plate_code<E>(
    max_attempts: u32,
    mut draw: impl FnMut() -> u32,
    mut is_taken: impl FnMut(&str) -> Result<bool, E>,
    fallback_seed: i64,
) -> Result<IssuedCode, E> {
    for attempt in 1..=max_attempts {
        let code = format_plate_code(draw());
        if !is_taken(&code)? {
            return Ok(IssuedCode {
                code,
                attempts: attempt,
                fallback: false,
            });
        }
    }

    let trailing = u32::try_from(fallback_seed.rem_euclid(i64::from(PLATE_SPACE))).unwrap_or(0);
    Ok(IssuedCode {
        code: format_plate_code(trailing),
        attempts: max_attempts,
        fallback: true,
    })
}
