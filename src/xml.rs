//! # XML Assembler Module
//!
//! Renders search outcomes into the OpenSearch-style document scanners
//! consume. The movie element always carries the same children in the same
//! order; a missing value is written as an empty element.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <results for="la haine" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
//!   <opensearch:Query searchTerms="la haine"/>
//!   <opensearch:totalResults>5</opensearch:totalResults>
//!   <moviematches><movie>...</movie></moviematches>
//! </results>
//! ```

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::coordinator::SearchOutcome;
use crate::error::{Error, Result};
use crate::record::{Record, Title};

/// Content type of every rendered document
pub const CONTENT_TYPE: &str = "application/xml; charset=utf-8";

const OPENSEARCH_NS: &str = "http://a9.com/-/spec/opensearch/1.1/";
const NO_QUERY_MESSAGE: &str = "You need to search for something first.";
const NO_RESULTS_MESSAGE: &str = "Your query didn't return any results.";

/// Render whichever document `outcome` calls for
pub fn render(outcome: &SearchOutcome) -> Result<String> {
    match outcome {
        SearchOutcome::NoQuery => render_error(),
        SearchOutcome::Empty { query } => render_empty(query),
        SearchOutcome::Results {
            query,
            total,
            records,
        } => render_results(query, total, records),
    }
}

/// Document returned when the request carries no query
pub fn render_error() -> Result<String> {
    document(|writer| text_element(writer, "error", Some(NO_QUERY_MESSAGE)))
}

/// Document returned when the upstream search matched nothing
pub fn render_empty(query: &str) -> Result<String> {
    document(|writer| {
        results_element(writer, query, "0", |writer| {
            text_element(writer, "movie", Some(NO_RESULTS_MESSAGE))
        })
    })
}

/// Document listing resolved movies
///
/// `total` is the count announced by the search page and may differ from
/// the number of records. It is written out as given.
pub fn render_results(query: &str, total: &str, records: &[Record]) -> Result<String> {
    document(|writer| {
        results_element(writer, query, total, |writer| {
            for record in records {
                movie_element(writer, record)?;
            }
            Ok(())
        })
    })
}

/// Standalone document holding a single movie element
pub fn render_movie(record: &Record) -> Result<String> {
    document(|writer| movie_element(writer, record))
}

fn document<F>(body: F) -> Result<String>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> Result<()>,
{
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.get_mut().write_all(b"\n")?;
    body(&mut writer)?;
    writer.get_mut().write_all(b"\n")?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn results_element<W, F>(writer: &mut Writer<W>, query: &str, total: &str, matches: F) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut Writer<W>) -> Result<()>,
{
    let mut results = BytesStart::new("results");
    results.push_attribute(("for", query));
    results.push_attribute(("xmlns:opensearch", OPENSEARCH_NS));
    writer.write_event(Event::Start(results))?;

    let mut search_query = BytesStart::new("opensearch:Query");
    search_query.push_attribute(("searchTerms", query));
    writer.write_event(Event::Empty(search_query))?;

    text_element(writer, "opensearch:totalResults", Some(total))?;

    writer.write_event(Event::Start(BytesStart::new("moviematches")))?;
    matches(writer)?;
    writer.write_event(Event::End(BytesEnd::new("moviematches")))?;

    writer.write_event(Event::End(BytesEnd::new("results")))?;
    Ok(())
}

fn movie_element<W: Write>(writer: &mut Writer<W>, record: &Record) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("movie")))?;

    text_element(writer, "score", record.score.as_deref())?;
    text_element(writer, "popularity", record.popularity.as_deref())?;
    title_element(writer, "title", record.title.as_ref())?;
    title_element(writer, "alternative_title", record.alternative_title.as_ref())?;
    text_element(writer, "type", Some("movie"))?;
    text_element(writer, "id", Some(&record.id))?;
    text_element(writer, "url", Some(&record.url))?;
    text_element(writer, "short_overview", record.short_overview.as_deref())?;
    text_element(writer, "release", record.release_text().as_deref())?;
    text_element(
        writer,
        "runtime",
        record.runtime.map(|minutes| minutes.to_string()).as_deref(),
    )?;
    text_element(writer, "budget", record.budget.as_deref())?;

    if record.people.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("people")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("people")))?;
        for person in &record.people {
            let mut start = BytesStart::new("person");
            start.push_attribute(("job", person.job.as_str()));
            writer.write_event(Event::Start(start))?;
            text_element(writer, "name", Some(&person.name))?;
            text_element(writer, "role", None)?;
            text_element(writer, "url", Some(&person.url))?;
            writer.write_event(Event::End(BytesEnd::new("person")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("people")))?;
    }

    if record.categories.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("categories")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("categories")))?;
        for category in &record.categories {
            writer.write_event(Event::Start(BytesStart::new("category")))?;
            text_element(writer, "name", Some(&category.name))?;
            text_element(writer, "url", Some(&category.url))?;
            writer.write_event(Event::End(BytesEnd::new("category")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("categories")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("movie")))?;
    Ok(())
}

/// `<name>value</name>`, or `<name/>` when there is no value
fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, value: Option<&str>) -> Result<()> {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(value))))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        None => writer.write_event(Event::Empty(BytesStart::new(name)))?,
    }
    Ok(())
}

/// Title element carrying its sort key in the `lower` attribute
fn title_element<W: Write>(writer: &mut Writer<W>, name: &str, title: Option<&Title>) -> Result<()> {
    match title {
        Some(title) => {
            let mut start = BytesStart::new(name);
            start.push_attribute(("lower", title.lower.as_str()));
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
                &title.display,
            ))))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        None => writer.write_event(Event::Empty(BytesStart::new(name)))?,
    }
    Ok(())
}
