use serde::Serialize;
use std::io::{self, Write};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let stdout = io::stdout();
    // Nothing useful to do if stdout is gone.
    let _ = write_table(&mut stdout.lock(), headers, &rows);
}

/// Write `rows` under `headers` with columns padded to the widest cell.
pub fn write_table<W: Write>(
    out: &mut W,
    headers: &[&str],
    rows: &[Vec<String>],
) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    writeln!(out, "{}", header_row.join("  ").trim_end())?;

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    writeln!(out, "{}", sep.join("  "))?;

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        writeln!(out, "{}", cells.join("  ").trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_padded_to_widest_cell() {
        let mut out = Vec::new();
        let rows = vec![
            vec!["1".to_string(), "Ana".to_string()],
            vec!["12".to_string(), "Bartholomew".to_string()],
        ];
        write_table(&mut out, &["ID", "NAME"], &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID  NAME");
        assert_eq!(lines[1], "--  -----------");
        assert_eq!(lines[2], "1   Ana");
        assert_eq!(lines[3], "12  Bartholomew");
    }
}
