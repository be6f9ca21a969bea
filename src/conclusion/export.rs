//! Findings export
//!
//! Comma-separated, header row `Attribute Name,Status,Details,Recommendation`,
//! `\n` record terminator. A field containing a comma, a double quote, CR or
//! LF is quoted, with internal quotes doubled. Absent details or
//! recommendation export as empty fields.

use thiserror::Error;

use crate::engine::Finding;

pub const CSV_HEADER: [&str; 4] = ["Attribute Name", "Status", "Details", "Recommendation"];

/// Malformed CSV input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvError {
    #[error("Unterminated quoted field starting on line {0}")]
    UnterminatedQuote(usize),

    #[error("Unexpected character after closing quote on line {0}")]
    TrailingAfterQuote(usize),
}

/// Renders findings as CSV, header first, in finding order.
pub fn findings_to_csv(findings: &[Finding]) -> String {
    let mut out = String::new();
    write_record(&mut out, &CSV_HEADER);
    for finding in findings {
        write_record(
            &mut out,
            &[
                finding.attribute_name.as_str(),
                finding.status.as_str(),
                finding.details.as_deref().unwrap_or(""),
                finding.recommendation.as_deref().unwrap_or(""),
            ],
        );
    }
    out
}

fn write_record(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push('\n');
}

/// Quotes `field` when it contains a delimiter, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parses CSV text into records.
///
/// Accepts `\n` and `\r\n` terminators and quoted fields spanning lines.
pub fn parse_csv(input: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;
    let mut quote_line = 0;
    let mut in_quotes = false;
    let mut after_quote = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    after_quote = true;
                }
                _ => {
                    if c == '\n' {
                        line += 1;
                    }
                    field.push(c);
                }
            }
            continue;
        }

        match c {
            ',' => {
                record.push(std::mem::take(&mut field));
                after_quote = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                after_quote = false;
                line += 1;
            }
            _ if after_quote => return Err(CsvError::TrailingAfterQuote(line)),
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote(quote_line));
    }
    if after_quote || !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FindingStatus;

    fn finding(name: &str, status: FindingStatus, details: Option<&str>) -> Finding {
        Finding {
            attribute_id: 1,
            attribute_name: name.into(),
            status,
            details: details.map(String::from),
            recommendation: None,
        }
    }

    #[test]
    fn test_header_and_lowercase_status() {
        let csv = findings_to_csv(&[finding("Balance", FindingStatus::Pass, None)]);
        assert_eq!(
            csv,
            "Attribute Name,Status,Details,Recommendation\nBalance,pass,,\n"
        );
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_quoted_details_parse_back() {
        let details = "balance = \"-5\", expected > 0";
        let csv = findings_to_csv(&[finding("Balance", FindingStatus::Fail, Some(details))]);
        let records = parse_csv(&csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], CSV_HEADER.map(String::from).to_vec());
        assert_eq!(records[1][2], details);
        assert_eq!(records[1][1], "fail");
    }

    #[test]
    fn test_multiline_field_parses() {
        let records = parse_csv("a,\"x\ny\"\r\nb,c\r\n").unwrap();
        assert_eq!(records, vec![vec!["a", "x\ny"], vec!["b", "c"]]);
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(parse_csv("a,\"open\n"), Err(CsvError::UnterminatedQuote(1)));
        assert_eq!(parse_csv("\"x\"y,z\n"), Err(CsvError::TrailingAfterQuote(1)));
    }
}
