use std::error::Error;
use std::io::Write;
use serde::Serialize;
use crate::search_result::SearchResult;

const HEADER: [&str; 6] = [
    "Nummer",
    "Veranstaltungstitel",
    "Veranstaltungsart",
    "Dozent/-in (verantw.)",
    "Dozent/-in (durchf.)",
    "Organisationseinheit",
];
const DETAIL_HEADER: [&str; 2] = ["SWS", "Link"];

/// Pipe separated table with a header row. Fields are written raw, never
/// quoted. The detail columns are written only when details were requested.
pub fn write_table<W: Write>(out: W, results: &[SearchResult], with_details: bool) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(csv::QuoteStyle::Never)
        .has_headers(false)
        .from_writer(out);

    let mut header: Vec<&str> = HEADER.to_vec();
    if with_details {
        header.extend(DETAIL_HEADER);
    }
    writer.write_record(&header)?;

    for r in results {
        let mut row = vec![
            r.number.as_str(),
            r.title.as_str(),
            r.kind.as_str(),
            r.resp_instructor.as_str(),
            r.exec_instructor.as_str(),
            r.unit.as_str(),
        ];
        if with_details {
            row.push(r.sws.as_deref().unwrap_or_default());
            row.push(r.link.as_deref().unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct DetailedResult<'a> {
    #[serde(flatten)]
    result: &'a SearchResult,
    sws: &'a str,
    link: &'a str,
}

pub fn write_json<W: Write>(out: W, results: &[SearchResult], with_details: bool) -> Result<(), Box<dyn Error>> {
    if with_details {
        let detailed: Vec<DetailedResult> = results
            .iter()
            .map(|r| DetailedResult {
                result: r,
                sws: r.sws.as_deref().unwrap_or_default(),
                link: r.link.as_deref().unwrap_or_default(),
            })
            .collect();
        serde_json::to_writer_pretty(out, &detailed)?;
    } else {
        serde_json::to_writer_pretty(out, results)?;
    }
    Ok(())
}
