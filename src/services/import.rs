//! Parser for the participant CSV import format.
//!
//! One header line (ignored), then one participant per line with exactly
//! eight comma-separated fields. Quoting is not supported.

use thiserror::Error;

use crate::dao::models::{Category, NewParticipant, ParticipantStatus};

/// Why a row of the import could not be turned into a participant.
///
/// Line numbers are 1-based and count the header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("line {line}: expected 8 fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: grade `{value}` is not a whole number")]
    Grade { line: usize, value: String },
    #[error("line {line}: category `{value}` must be Junior or Senior")]
    Category { line: usize, value: String },
}

/// Parse every data row of `text`.
///
/// Surrounding whitespace is ignored, so the header is the first non-blank
/// line. Blank lines are skipped and `\r\n` endings accepted. The first
/// malformed row aborts the whole parse so nothing gets written for a broken
/// file.
pub fn parse_csv(text: &str) -> Result<Vec<NewParticipant>, ImportError> {
    text.trim()
        .lines()
        .enumerate()
        .skip(1)
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line, row)| parse_row(line, row))
        .collect()
}

fn parse_row(line: usize, row: &str) -> Result<NewParticipant, ImportError> {
    let fields: Vec<&str> = row.split(',').map(str::trim).collect();
    let &[
        team_number,
        team_name,
        first_name,
        last_name,
        grade,
        school_name,
        category,
        arrival_time,
    ] = fields.as_slice()
    else {
        return Err(ImportError::FieldCount {
            line,
            found: fields.len(),
        });
    };

    let grade = grade.parse::<i32>().map_err(|_| ImportError::Grade {
        line,
        value: grade.to_string(),
    })?;
    let category = Category::parse(category).ok_or_else(|| ImportError::Category {
        line,
        value: category.to_string(),
    })?;

    Ok(NewParticipant {
        team_number: team_number.to_string(),
        team_name: team_name.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        grade,
        school_name: school_name.to_string(),
        category,
        arrival_time: arrival_time.to_string(),
        status: ParticipantStatus::Registered,
    })
}
