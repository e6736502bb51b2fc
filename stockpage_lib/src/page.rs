//! HTML page rendering and the local file write.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use quick_xml::escape::escape;

use crate::report::{ReportRow, COLUMN_LABELS};

const STYLESHEET: &str = r#"
      * {
        box-sizing: border-box;
        -webkit-box-sizing: border-box;
        -moz-box-sizing: border-box;
      }
      body {
        font-family: Helvetica;
        -webkit-font-smoothing: antialiased;
        background: rgba( 71, 147, 227, 1);
      }
      h2 {
        text-align: center;
        font-size: 30px;
        text-transform: uppercase;
        letter-spacing: 1px;
        color: white;
        padding: 30px 0;
      }

      /* Table Styles */
      .table-wrapper {
        margin: 10px 70px 70px;
        box-shadow: 0px 35px 50px rgba( 0, 0, 0, 0.2 );
      }

      .fl-table {
        border-radius: 5px;
        font-size: 12px;
        font-weight: normal;
        border: none;
        border-collapse: collapse;
        width: 100%;
        max-width: 100%;
        white-space: nowrap;
        background-color: white;
      }

      .fl-table td, .fl-table th {
        text-align: center;
        padding: 8px;
      }

      .fl-table td {
        border-right: 1px solid #f8f8f8;
        font-size: 12px;
      }

      .fl-table thead th {
        color: #ffffff;
        background: #4FC3A1;
      }

      .fl-table thead th:nth-child(odd) {
        color: #ffffff;
        background: #324960;
      }

      .fl-table tr:nth-child(even) {
        background: #F8F8F8;
      }

      /* Responsive */
      @media (max-width: 767px) {
        .fl-table {
          display: block;
          width: 100%;
        }
        .table-wrapper:before {
          content: "Scroll horizontally >";
          display: block;
          text-align: right;
          font-size: 11px;
          color: white;
          padding: 0 0 10px;
        }
        .fl-table thead, .fl-table tbody, .fl-table thead th {
          display: block;
        }
        .fl-table thead th:last-child {
          border-bottom: none;
        }
        .fl-table thead {
          float: left;
        }
        .fl-table tbody {
          width: auto;
          position: relative;
          overflow-x: auto;
        }
        .fl-table td, .fl-table th {
          padding: 20px .625em .625em .625em;
          height: 60px;
          vertical-align: middle;
          box-sizing: border-box;
          overflow-x: hidden;
          overflow-y: auto;
          width: 120px;
          font-size: 13px;
          text-overflow: ellipsis;
        }
        .fl-table thead th {
          text-align: left;
          border-bottom: 1px solid #f7f7f9;
        }
        .fl-table tbody tr {
          display: table-cell;
        }
        .fl-table tbody tr:nth-child(odd) {
          background: none;
        }
        .fl-table tr:nth-child(even) {
          background: transparent;
        }
        .fl-table tr td:nth-child(odd) {
          background: #F8F8F8;
          border-right: 1px solid #E6E4E4;
        }
        .fl-table tr td:nth-child(even) {
          border-right: 1px solid #E6E4E4;
        }
        .fl-table tbody td {
          display: block;
          text-align: center;
        }
      }
"#;

/// Renders one `<tr>` per row. Cell values are HTML-escaped.
pub fn render_rows(rows: &[ReportRow]) -> String {
    let mut html = String::new();
    for row in rows {
        html.push_str("<tr>\n");
        let cells: Vec<String> = row
            .cells()
            .iter()
            .map(|cell| format!("<td>{}</td>", escape(cell.as_str())))
            .collect();
        html.push_str(&cells.join("\n"));
        html.push_str("\n</tr>\n");
    }
    html
}

/// Wraps rendered rows in the full HTML document.
pub fn render_page(title: &str, rows_html: &str) -> String {
    let headers: String = COLUMN_LABELS
        .iter()
        .map(|label| format!("        <th>{}</th>\n", label))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>{title}</title>
    <style>{STYLESHEET}    </style>
  </head>
  <body>
    <h2>{title}</h2>
    <div class="table-wrapper">
    <table class="fl-table">
      <thead>
      <tr>
{headers}      </tr>
      </thead>
      <tbody>
{rows_html}      </tbody>
    </table>
    </div>
  </body>
</html>
"#,
        title = escape(title),
    )
}

/// Renders the complete document for a report.
pub fn render_report(title: &str, rows: &[ReportRow]) -> String {
    render_page(title, &render_rows(rows))
}

/// Writes the document, replacing any existing file. Returns bytes written.
pub fn write_page(path: &Path, html: &str) -> std::io::Result<u64> {
    let mut file = File::create(path)?;
    file.write_all(html.as_bytes())?;
    file.flush()?;
    Ok(html.len() as u64)
}
