//! CSV encoders.
//!
//! Two quoting policies live here and must stay distinct:
//! - expense export: every data field quoted (`QuoteStyle::Always`)
//! - generic export: quoted only when needed (`QuoteStyle::Necessary`)
//!
//! Both join lines with `\n` and never emit a trailing newline.
//!
//! The generic policy also quotes fields holding a bare `\r`. A row whose
//! fields are all empty is written as bare delimiters, so a one-column row
//! with no value is an empty line rather than `""`.
//!
//! Numbers render the way the hub's web client prints them: `1.0` is `1`,
//! `1e21` is `1e+21` and amounts round exact half-cent ties away from zero.

use std::ops::Range;

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use serde_json::Value;

use crate::export::model::{Event, Expense, Lookup, User};

/// Fixed header row of the expense export.
pub const EXPENSE_HEADER: &str =
    "Date,Description,Amount,Currency,Paid By,Participants,Event,Status,Notes";

pub const UNKNOWN_USER: &str = "Unknown";
pub const UNKNOWN_EVENT: &str = "Unknown Event";
pub const NO_EVENT: &str = "No Event";

/// A flat record for the generic exporter. Keys keep insertion order.
pub type FlatRecord = serde_json::Map<String, Value>;

/// Encode expenses as CSV, resolving user and event names.
///
/// Never fails: unresolved references become placeholder names and every
/// expense yields exactly one row, in input order.
pub fn encode_expenses_to_csv(expenses: &[Expense], users: &[User], events: &[Event]) -> String {
    let users = Lookup::new(users);
    let events = Lookup::new(events);

    let mut writer = csv_writer(QuoteStyle::Always);
    for expense in expenses {
        write_row(&mut writer, expense_row(expense, &users, &events));
    }
    let body = into_text(writer);

    let mut out = String::with_capacity(EXPENSE_HEADER.len() + 1 + body.len());
    out.push_str(EXPENSE_HEADER);
    if !body.is_empty() {
        out.push('\n');
        out.push_str(strip_terminator(&body));
    }
    out
}

fn expense_row(expense: &Expense, users: &Lookup<'_>, events: &Lookup<'_>) -> [String; 9] {
    let participants = expense
        .participants
        .iter()
        .map(|id| users.name_or(id, UNKNOWN_USER))
        .collect::<Vec<_>>()
        .join(", ");

    let event = match &expense.event_id {
        Some(id) => events.name_or(id, UNKNOWN_EVENT),
        None => NO_EVENT,
    };

    let status = if expense.settled { "Settled" } else { "Unsettled" };

    [
        expense.date.format("%-m/%-d/%Y").to_string(),
        expense.description.clone(),
        fixed_two(expense.amount),
        expense.currency.clone(),
        users.name_or(&expense.paid_by, UNKNOWN_USER).to_string(),
        participants,
        event.to_string(),
        status.to_string(),
        expense.notes.clone().unwrap_or_default(),
    ]
}

/// Encode flat records as CSV with a header taken from the first record.
///
/// Empty input yields an empty string, not a header line. Keys missing
/// from later records are written as empty fields; extra keys are ignored.
pub fn encode_generic_records_to_csv(records: &[FlatRecord]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut lines = GenericLines::new();
    lines.push(&headers);
    for record in records {
        let row: Vec<String> = headers.iter().map(|key| field_text(record.get(*key))).collect();
        lines.push(&row);
    }
    lines.finish()
}

/// Minimally quoted lines sharing one writer. Rows with only empty fields
/// bypass the writer, which would otherwise quote a lone empty field.
struct GenericLines {
    writer: Writer<Vec<u8>>,
    lines: Vec<Line>,
    written: usize,
}

enum Line {
    Encoded(Range<usize>),
    Blank(usize),
}

impl GenericLines {
    fn new() -> Self {
        Self {
            writer: csv_writer(QuoteStyle::Necessary),
            lines: Vec::new(),
            written: 0,
        }
    }

    fn push<T: AsRef<str>>(&mut self, fields: &[T]) {
        if fields.iter().all(|field| field.as_ref().is_empty()) {
            self.lines.push(Line::Blank(fields.len()));
            return;
        }
        write_row(&mut self.writer, fields.iter().map(|field| field.as_ref().as_bytes()));
        self.writer.flush().expect("in-memory csv write");
        let end = self.writer.get_ref().len();
        self.lines.push(Line::Encoded(self.written..end));
        self.written = end;
    }

    fn finish(self) -> String {
        let bytes = self.writer.into_inner().unwrap_or_default();
        self.lines
            .iter()
            .map(|line| match line {
                Line::Encoded(range) => {
                    let text = String::from_utf8_lossy(&bytes[range.clone()]);
                    strip_terminator(&text).to_string()
                }
                Line::Blank(fields) => ",".repeat(fields.saturating_sub(1)),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Two-decimal amount text. Exact half-cent ties round away from zero.
fn fixed_two(amount: f64) -> String {
    let scaled = amount * 200.0;
    // Zero residual means the product is exact, so `scaled` is the true value.
    let exact = amount.mul_add(200.0, -scaled) == 0.0;
    if exact && scaled.fract() == 0.0 && scaled % 2.0 != 0.0 {
        return format!("{:.2}", (amount * 100.0).round() / 100.0);
    }
    format!("{:.2}", amount)
}

fn number_text(n: &serde_json::Number) -> String {
    let Some(f) = n.as_f64().filter(|_| n.is_f64()) else {
        return n.to_string();
    };
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }
    let text = format!("{f:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number_text(n),
        Some(other) => other.to_string(),
    }
}

fn csv_writer(style: QuoteStyle) -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .quote_style(style)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn write_row<I, T>(writer: &mut Writer<Vec<u8>>, row: I)
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    writer.write_record(row).expect("in-memory csv write");
}

fn into_text(writer: Writer<Vec<u8>>) -> String {
    let bytes = writer.into_inner().unwrap_or_default();
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn strip_terminator(text: &str) -> &str {
    text.strip_suffix('\n').unwrap_or(text)
}
