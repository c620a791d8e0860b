use anyhow::Result;
use log::info;

use avwx_core::{Error, OutputFormat, ReportData, Response, render};

/// Check a response for server errors, print its warnings and render it.
///
/// Server errors abort with [`Error::Application`]; warnings are notices.
pub fn project<D: ReportData>(response: &Response<D>, format: OutputFormat) -> Result<String> {
    let warnings = response.ensure_ok()?;
    for warning in warnings {
        eprintln!("WARNING: {warning}");
    }

    info!(
        "{} {} record(s) in {} ms",
        response.records().len(),
        response.data_source(),
        response.time_taken_ms()
    );

    Ok(render(response, format)?)
}

/// Print a block of output unless there is nothing to show.
pub fn print_block(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}

/// Server-reported errors are printed one per line; anything else as a
/// single message with its context chain.
pub fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<Error>().and_then(Error::application_messages) {
        Some(lines) => {
            for line in lines {
                eprintln!("ERROR: {line}");
            }
        }
        None => eprintln!("Error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avwx_core::parse_metars;

    const OK: &str = r#"<response version="1.2">
        <errors />
        <warnings><warning>W1</warning></warnings>
        <data num_results="1">
          <METAR><raw_text>KORD 011751Z 27012KT 10SM FEW045 M02/M09 A3012</raw_text></METAR>
        </data>
      </response>"#;

    const FAILED: &str = r#"<response version="1.2">
        <errors><error>E1</error><error>E2</error></errors>
        <data num_results="0" />
      </response>"#;

    #[test]
    fn warnings_do_not_block_projection() {
        let resp = parse_metars(OK.as_bytes()).unwrap();
        let text = project(&resp, OutputFormat::RawText).unwrap();
        assert_eq!(text, "KORD 011751Z 27012KT 10SM FEW045 M02/M09 A3012");
    }

    #[test]
    fn server_errors_abort_projection_with_every_line() {
        let resp = parse_metars(FAILED.as_bytes()).unwrap();
        let err = project(&resp, OutputFormat::Json).unwrap_err();

        let lines = err
            .downcast_ref::<Error>()
            .and_then(Error::application_messages)
            .unwrap();
        assert_eq!(lines, ["E1", "E2"]);
    }
}
