//! DIMACS CNF parsing.
//!
//! This is deliberately a plain, two-pass text parser rather than a
//! streaming byte-level state machine: the whole input is already in memory
//! by the time this runs (see `main`'s gzip-transparent read), and the
//! solver consumes a single, already-finished [`walksat::Formula`] handle --
//! there is no incremental/chunked parsing use case here the way there is in
//! a proof-producing CDCL pipeline.

use std::error::Error;
use std::fmt;

use walksat::formula::Lit;
use walksat::{Formula, FormulaBuilder};

/// Result of parsing a DIMACS CNF instance.
pub enum ParseOutcome {
    /// A finished, non-trivially-unsatisfiable formula.
    Formula(Formula),
    /// The input contained an empty clause: unsatisfiable at parse time.
    UnsatEmptyClause,
}

#[derive(Debug)]
pub enum DimacsError {
    MissingHeader,
    InvalidHeader(String),
    InvalidToken(String),
    LiteralOutOfRange { literal: i64, num_vars: u32 },
    UnterminatedClause,
    ClauseCountMismatch { declared: u32, found: u32 },
}

impl fmt::Display for DimacsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimacsError::MissingHeader => write!(f, "no 'p cnf <vars> <clauses>' header found"),
            DimacsError::InvalidHeader(line) => write!(f, "invalid problem line: '{}'", line),
            DimacsError::InvalidToken(tok) => write!(f, "expected an integer, found '{}'", tok),
            DimacsError::LiteralOutOfRange { literal, num_vars } => write!(
                f,
                "literal {} out of range for {} declared variables",
                literal, num_vars
            ),
            DimacsError::UnterminatedClause => write!(f, "final clause is not terminated by 0"),
            DimacsError::ClauseCountMismatch { declared, found } => write!(
                f,
                "header declares {} clauses but {} were present",
                declared, found
            ),
        }
    }
}

impl Error for DimacsError {}

/// Parses a complete DIMACS CNF instance from `input`.
pub fn parse(input: &str) -> Result<ParseOutcome, DimacsError> {
    let mut lines = input.lines();
    let mut header = None;
    let mut consumed = 0usize;

    for line in &mut lines {
        consumed += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        header = Some(parse_header_line(trimmed)?);
        break;
    }

    let (num_vars, num_clauses) = header.ok_or(DimacsError::MissingHeader)?;

    let mut builder = FormulaBuilder::new(num_vars);
    let mut clause: Vec<Lit> = Vec::new();
    let mut found_clauses = 0u32;

    let remaining = input.lines().skip(consumed).collect::<Vec<_>>().join(" ");
    for tok in remaining.split_whitespace() {
        let value: i64 = tok
            .parse()
            .map_err(|_| DimacsError::InvalidToken(tok.to_string()))?;

        if value == 0 {
            match builder.push_clause(&clause) {
                Ok(()) => {}
                Err(_empty_clause) => return Ok(ParseOutcome::UnsatEmptyClause),
            }
            found_clauses += 1;
            clause.clear();
        } else {
            let magnitude = value.unsigned_abs() as u32;
            if magnitude == 0 || magnitude > num_vars {
                return Err(DimacsError::LiteralOutOfRange {
                    literal: value,
                    num_vars,
                });
            }
            clause.push(value as Lit);
        }
    }

    if !clause.is_empty() {
        return Err(DimacsError::UnterminatedClause);
    }

    if found_clauses != num_clauses {
        return Err(DimacsError::ClauseCountMismatch {
            declared: num_clauses,
            found: found_clauses,
        });
    }

    Ok(ParseOutcome::Formula(builder.finish()))
}

fn parse_header_line(line: &str) -> Result<(u32, u32), DimacsError> {
    let body = line
        .strip_prefix('p')
        .ok_or_else(|| DimacsError::InvalidHeader(line.to_string()))?;

    let mut parts = body.split_whitespace();
    if parts.next() != Some("cnf") {
        return Err(DimacsError::InvalidHeader(line.to_string()));
    }
    let num_vars: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| DimacsError::InvalidHeader(line.to_string()))?;
    let num_clauses: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| DimacsError::InvalidHeader(line.to_string()))?;
    if parts.next().is_some() {
        return Err(DimacsError::InvalidHeader(line.to_string()));
    }

    Ok((num_vars, num_clauses))
}
