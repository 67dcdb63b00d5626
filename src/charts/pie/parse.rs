//! A small text format for pie data.
//!
//! ```text
//! pie showData
//!     title Pets adopted by volunteers
//!     %% comments run to the end of the line
//!     "Dogs" : 386
//!     "Cats" : 85.5
//! ```
use super::{PieChart, PieSettings};
use crate::data::{DataSet, Entry};
use nom::{
    bytes::complete::{take_till, take_until},
    character::complete::multispace0,
    Finish,
};
use nom_locate::LocatedSpan;
use std::{fmt, num::ParseFloatError};

/// If parsing failed, this type contains a description of the reason for the failure and the
/// location failure occurred at.
#[derive(Debug)]
pub struct Error {
    /// (1-indexed) line number of the error.
    pub line: u32,
    /// (1-indexed) column number of the error.
    pub col: usize,
    /// (0-indexed) offset in the input string of the error.
    pub offset: usize,
    kind: ErrorKind,
}

impl Error {
    fn new(span: &Span<'_>, kind: ErrorKind) -> Self {
        Self {
            line: span.location_line(),
            col: span.get_column(),
            offset: span.location_offset(),
            kind,
        }
    }

    /// Get a description of the failure.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "on line {}, col {}: {}", self.line, self.col, self.kind)
    }
}
impl std::error::Error for Error {}

/// Different types of parsing errors for the pie definition.
#[derive(Debug)]
pub enum ErrorKind {
    /// Expected a particular text string at the given location.
    ExpectedLiteral(&'static str),
    /// Expected a number at the given location.
    ///
    /// If the inner value is `Some`, then the input did look like a number, but there was some
    /// problem when actually parsing it.
    ExpectedFloat(Option<ParseFloatError>),
    /// The number parsed but cannot be charted (NaN or infinite).
    NonFiniteValue,
    /// Found an opening quote but no corresponding closing quote.
    UnclosedQuote(&'static str),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::ExpectedLiteral(lit) => write!(f, "expected {:?}", lit),
            ErrorKind::ExpectedFloat(Some(inner)) => {
                write!(f, "couldn't parse number because {}", inner)
            }
            ErrorKind::ExpectedFloat(None) => write!(f, "expected a number"),
            ErrorKind::NonFiniteValue => write!(f, "values must be finite"),
            ErrorKind::UnclosedQuote(lit) => {
                write!(f, "unclosed quoted string (expected {:?}, found EOF)", lit)
            }
        }
    }
}

/// A parsed pie definition.
#[derive(Debug, Clone)]
pub struct PieDefinition {
    pub title: Option<String>,
    /// Show raw values on the slices instead of percentages.
    pub show_data: bool,
    pub data: DataSet,
}

impl PieDefinition {
    pub fn into_chart(self) -> crate::Result<PieChart> {
        let settings = PieSettings {
            use_percent_values: !self.show_data,
            ..PieSettings::default()
        };
        let mut chart = PieChart::with_settings(self.data, settings)?;
        chart.set_description(self.title);
        Ok(chart)
    }
}

type Span<'input> = LocatedSpan<&'input str>;
type IResult<'input, Out> = nom::IResult<Span<'input>, Out, Error>;

/// Parse a whole definition.
pub fn parse(src: &str) -> Result<PieDefinition, Error> {
    let (_, definition) = parse_pie(LocatedSpan::new(src.trim())).finish()?;
    log::debug!(
        "parsed pie definition with {} entries",
        definition.data.entry_count()
    );
    Ok(definition)
}

fn parse_pie(i: Span) -> IResult<PieDefinition> {
    let (i, _) = ws(i)?;
    let (mut i, (title, show_data)) = parse_header(i)?;
    let mut entries = vec![];
    loop {
        let (rest, _) = ws(i)?;
        i = rest;
        if i.is_empty() {
            break;
        }
        if i.starts_with("%%") {
            let (rest, _) = comment(i)?;
            i = rest;
            continue;
        }
        let entry;
        (i, entry) = parse_entry(i)?;
        entries.push(entry);
    }
    let label = title.clone().unwrap_or_default();
    Ok((
        i,
        PieDefinition {
            title,
            show_data,
            data: DataSet::new(label, entries),
        },
    ))
}

fn parse_header(i: Span<'_>) -> IResult<(Option<String>, bool)> {
    let (i, _) = tag("pie")(i)?;
    let (i, _) = ws(i)?;
    let (i, show_data) = opt(tag("showData"))(i)?;
    let (i, _) = ws(i)?;
    let (i, title) = opt(parse_title)(i)?;
    let title = title
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned);
    Ok((i, (title, show_data.is_some())))
}

/// Parses "title The title" into 'The title'. The title runs to the end of the line.
fn parse_title(i: Span) -> IResult<&str> {
    let (i, _) = tag("title")(i)?;
    let (i, title) = comment_or_line(i)?;
    Ok((i, title.fragment()))
}

/// Skip a `%%` comment.
fn comment(i: Span) -> IResult<Span> {
    let (i, _) = tag("%%")(i)?;
    comment_or_line(i)
}

fn comment_or_line(i: Span) -> IResult<Span> {
    take_till::<_, _, nom::error::Error<Span>>(|c| c == '\n')(i)
        .map_error(|_| ErrorKind::ExpectedLiteral("\n"))
}

/// Parse a labelled value.
///
/// Expect that whitespace has already been consumed.
fn parse_entry(i: Span) -> IResult<Entry> {
    let (i, label) = quoted(i)?;
    let (i, _) = ws(i)?;
    let (i, _) = tag(":")(i)?;
    let (i, _) = ws(i)?;
    let (i, value) = float(i)?;
    Ok((i, Entry::value(value).with_label(label)))
}

/// A string surrouded by double quotes (")
fn quoted(i: Span) -> IResult<&str> {
    let (i, _) = tag("\"")(i)?;
    let (i, label) = take_until("\"")(i).map_error(|_| ErrorKind::UnclosedQuote("\""))?;
    let (i, _) = tag("\"")(i)?;
    Ok((i, label.fragment()))
}

/// Whitespace using our error type
fn ws(i: Span) -> IResult<Span> {
    multispace0::<_, nom::error::Error<Span>>(i).map_error(|_| ErrorKind::ExpectedLiteral(" "))
}

/// A version of `tag` that uses our error type.
fn tag(val: &'static str) -> impl Fn(Span<'_>) -> IResult<Span<'_>> {
    move |input| {
        nom::bytes::complete::tag(val)(input).map_error(|_| ErrorKind::ExpectedLiteral(val))
    }
}

/// A finite floating point number
fn float(i: Span) -> IResult<f64> {
    let (rest, num) =
        nom::number::complete::recognize_float(i).map_error(|_| ErrorKind::ExpectedFloat(None))?;
    match num.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok((rest, v)),
        Ok(_) => Err(nom::Err::Error(Error::new(&num, ErrorKind::NonFiniteValue))),
        Err(e) => {
            let kind = ErrorKind::ExpectedFloat(Some(e));
            Err(nom::Err::Error(Error::new(&num, kind)))
        }
    }
}

fn opt<'input, T, F: Fn(Span<'input>) -> IResult<'input, T>>(
    f: F,
) -> impl Fn(Span<'input>) -> IResult<'input, Option<T>> {
    move |input| match f(input) {
        Ok((i, out)) => Ok((i, Some(out))),
        Err(nom::Err::Error(_)) => Ok((input, None)),
        Err(other) => Err(other),
    }
}

/// Helper trait for mapping errors to our type.
trait MapErr {
    type Output;
    /// Given a way of getting the error kind, construct an error pointing at the current position.
    fn map_error(self, f: impl FnOnce(&nom::error::Error<Span<'_>>) -> ErrorKind) -> Self::Output;
}

impl<'a, T> MapErr for nom::IResult<Span<'a>, T> {
    type Output = IResult<'a, T>;
    fn map_error(self, f: impl FnOnce(&nom::error::Error<Span<'_>>) -> ErrorKind) -> Self::Output {
        self.map_err(|e| {
            e.map(|e| {
                let kind = f(&e);
                Error::new(&e.input, kind)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labelled_values() {
        let definition = parse(
            r#"
pie showData
    title Key elements in Product X
    "Calcium" : 42.96
    %% trace elements
    "Potassium" : 50.05
    "Iron" :  5
"#,
        )
        .expect("valid definition");
        assert_eq!(definition.title.as_deref(), Some("Key elements in Product X"));
        assert!(definition.show_data);
        let labels: Vec<_> = definition
            .data
            .entries()
            .iter()
            .map(|e| e.label.as_deref())
            .collect();
        assert_eq!(labels, vec![Some("Calcium"), Some("Potassium"), Some("Iron")]);
        assert_eq!(
            definition.data.values().collect::<Vec<_>>(),
            vec![42.96, 50.05, 5.]
        );
    }

    #[test]
    fn comments_between_and_after_entries() {
        let definition = parse(
            "pie\n%% first\n%% second\n\"A\" : 1\n  %% between\n\"B\" : 2\n%% trailing",
        )
        .expect("valid definition");
        assert_eq!(definition.data.values().collect::<Vec<_>>(), vec![1., 2.]);
    }

    #[test]
    fn header_only() {
        let definition = parse("pie").expect("valid definition");
        assert!(definition.title.is_none());
        assert!(!definition.show_data);
        assert_eq!(definition.data.entry_count(), 0);
    }

    #[test]
    fn unclosed_label_reports_position() {
        let err = parse("pie\n  \"Dogs : 3").expect_err("unclosed quote");
        assert!(matches!(err.kind(), ErrorKind::UnclosedQuote(_)));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn missing_number() {
        let err = parse("pie\n\"Dogs\" : lots").expect_err("not a number");
        assert!(matches!(err.kind(), ErrorKind::ExpectedFloat(None)));
        assert_eq!((err.line, err.col), (2, 10));
    }

    #[test]
    fn definition_becomes_chart() {
        let chart = parse("pie title Pets\n\"Dogs\" : 3\n\"Cats\" : 1")
            .expect("valid definition")
            .into_chart()
            .expect("valid chart");
        assert_eq!(chart.description(), Some("Pets"));
        assert!(chart.settings().use_percent_values);
        assert_eq!(chart.draw_angles(), &[270., 90.]);
    }
}
