//! MATLAB matrix literal rendering.

use std::fmt::Display;

/// Render rows as a MATLAB literal: `[ 1 0 ;\n0 1 ]`.
///
/// Every value is followed by a space and rows are separated by `;\n`, with
/// no separator after the last row.
pub fn render_matrix<T: Display>(rows: &[Vec<T>]) -> String {
    let mut out = String::from("[ ");
    for (i, row) in rows.iter().enumerate() {
        for v in row {
            out.push_str(&v.to_string());
            out.push(' ');
        }
        if i + 1 < rows.len() {
            out.push_str(";\n");
        }
    }
    out.push(']');
    out
}

/// Wrap a literal as a `.m` assignment.
pub fn assign_variable(name: &str, literal: &str) -> String {
    format!("{name}_variable = {literal};")
}
