//! Tolerant parsers for the semi-structured numeric fields in the exports.
//!
//! Parse failures never escape as job errors: each parser returns an
//! [`Unparseable`] value carrying the raw text and its source row, and the
//! loaders store NULL for the field while the rest of the row proceeds.

/// A field value that could not be parsed, with enough context for an
/// operator to locate the offending cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unparseable {
    /// Zero-based data-row index within the source file.
    pub row: usize,
    pub field: &'static str,
    pub raw: String,
}

/// Parse a percentage field like `"72%"` (or plain `"72"`) into its integer
/// value.
pub fn percentage(raw: &str, row: usize, field: &'static str) -> Result<i32, Unparseable> {
    raw.trim()
        .trim_end_matches('%')
        .parse::<i32>()
        .map_err(|_| Unparseable {
            row,
            field,
            raw: raw.to_string(),
        })
}

/// Parse a compound field formatted as `"<label> <number>%"` (e.g. the
/// pick-rate column `"(152) 35%"`), extracting only the numeric token.
pub fn labeled_percentage(raw: &str, row: usize, field: &'static str) -> Result<i32, Unparseable> {
    let token = raw.split_whitespace().nth(1).ok_or_else(|| Unparseable {
        row,
        field,
        raw: raw.to_string(),
    })?;
    percentage(token, row, field).map_err(|mut unparseable| {
        // Report the whole compound value, not just the second token.
        unparseable.raw = raw.to_string();
        unparseable
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_strips_suffix() {
        assert_eq!(percentage("72%", 0, "KAST"), Ok(72));
        assert_eq!(percentage(" 100% ", 0, "KAST"), Ok(100));
    }

    #[test]
    fn percentage_accepts_bare_integers() {
        assert_eq!(percentage("33", 0, "HS%"), Ok(33));
    }

    #[test]
    fn percentage_rejects_garbage_with_context() {
        let err = percentage("garbage", 7, "KAST").unwrap_err();
        assert_eq!(
            err,
            Unparseable {
                row: 7,
                field: "KAST",
                raw: "garbage".to_string(),
            }
        );
    }

    #[test]
    fn percentage_rejects_fractional_values() {
        // The store column is integral; "72.5%" is an anomaly worth surfacing.
        assert!(percentage("72.5%", 0, "KAST").is_err());
    }

    #[test]
    fn labeled_percentage_takes_second_token() {
        assert_eq!(labeled_percentage("(152) 35%", 3, "Use"), Ok(35));
    }

    #[test]
    fn labeled_percentage_rejects_missing_token() {
        let err = labeled_percentage("garbage", 4, "Use").unwrap_err();
        assert_eq!(err.row, 4);
        assert_eq!(err.raw, "garbage");
    }

    #[test]
    fn labeled_percentage_reports_full_raw_value() {
        let err = labeled_percentage("(152) n/a", 2, "Use").unwrap_err();
        assert_eq!(err.raw, "(152) n/a");
    }
}
