//! CSV record encoding for the staging buffer.
//!
//! Records end in CRLF. A field is quoted when it contains a comma, a quote,
//! CR or LF, or starts with whitespace; quotes inside are doubled and line
//! breaks inside quoted fields are written as CRLF.

use draw2matrix_core::{format_list, BinaryMatrix};

pub(crate) const HEADER: &str = "Input,Target";
pub(crate) const RECORD_END: &str = "\r\n";

fn needs_quotes(field: &str) -> bool {
    if field.is_empty() {
        return false;
    }
    if field.contains([',', '"', '\r', '\n']) {
        return true;
    }
    field.chars().next().is_some_and(char::is_whitespace)
}

fn write_field(out: &mut Vec<u8>, field: &str) {
    if !needs_quotes(field) {
        out.extend_from_slice(field.as_bytes());
        return;
    }
    out.push(b'"');
    for ch in field.chars() {
        match ch {
            '"' => out.extend_from_slice(b"\"\""),
            '\r' => {}
            '\n' => out.extend_from_slice(b"\r\n"),
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    out.push(b'"');
}

/// Append one CRLF-terminated record.
pub(crate) fn write_record(out: &mut Vec<u8>, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        write_field(out, field);
    }
    out.extend_from_slice(RECORD_END.as_bytes());
}

/// Text of the `Input` column for one sample.
pub(crate) fn render_input(matrix: &BinaryMatrix, flatten: bool) -> String {
    if flatten {
        format_list(matrix.as_slice())
    } else {
        matrix.render_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> String {
        let mut out = Vec::new();
        write_record(&mut out, fields);
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn plain_fields_are_bare() {
        assert_eq!(record(&["[0 1 0]", "A"]), "[0 1 0],A\r\n");
    }

    #[test]
    fn special_fields_are_quoted() {
        assert_eq!(record(&["[1]", "a,b"]), "[1],\"a,b\"\r\n");
        assert_eq!(record(&["[1]", "say \"hi\""]), "[1],\"say \"\"hi\"\"\"\r\n");
        assert_eq!(record(&["[1]", " lead"]), "[1],\" lead\"\r\n");
        assert_eq!(record(&["[1]", "two\nlines"]), "[1],\"two\r\nlines\"\r\n");
        assert_eq!(record(&["[1]", ""]), "[1],\r\n");
    }

    #[test]
    fn input_rendering_follows_flatten() {
        let m = BinaryMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]).expect("m");
        assert_eq!(render_input(&m, true), "[0 1 1 0]");
        assert_eq!(render_input(&m, false), "[[0 1] [1 0]]");
    }
}
