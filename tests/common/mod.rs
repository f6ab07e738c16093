//! Shared test utilities and fixtures.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use octavo::BookRecord;
use uuid::Uuid;

pub struct BookSpec<'a> {
    pub title: &'a str,
    pub authors: &'a [&'a str],
    pub isbn13: Option<&'a str>,
    pub subjects: &'a [&'a str],
    /// Day-of-month used for `date_added`; later days sort as newer.
    pub day: u32,
}

pub fn book(spec: BookSpec<'_>) -> BookRecord {
    BookRecord {
        id: Uuid::new_v4(),
        title: spec.title.to_string(),
        authors: spec.authors.iter().map(|a| a.to_string()).collect(),
        isbn10: None,
        isbn13: spec.isbn13.map(|s| s.to_string()),
        subjects: spec.subjects.iter().map(|s| s.to_string()).collect(),
        date_added: Utc.with_ymd_and_hms(2024, 6, spec.day, 12, 0, 0).unwrap(),
    }
}

/// A small but realistic personal library.
pub fn library() -> Vec<BookRecord> {
    vec![
        book(BookSpec {
            title: "The Great Gatsby",
            authors: &["F. Scott Fitzgerald"],
            isbn13: Some("978-0-7432-7356-5"),
            subjects: &["Jazz Age", "Classics"],
            day: 1,
        }),
        book(BookSpec {
            title: "Tender Is the Night",
            authors: &["F. Scott Fitzgerald"],
            isbn13: Some("978-0-684-80154-8"),
            subjects: &["Classics"],
            day: 2,
        }),
        book(BookSpec {
            title: "One Hundred Years of Solitude",
            authors: &["Gabriel García Márquez"],
            isbn13: Some("978-0-06-088328-7"),
            subjects: &["Magical Realism"],
            day: 3,
        }),
        book(BookSpec {
            title: "Dune",
            authors: &["Frank Herbert"],
            isbn13: Some("978-0-441-17271-9"),
            subjects: &["Science Fiction"],
            day: 4,
        }),
        book(BookSpec {
            title: "Gatsby's Green Light: Essays",
            authors: &["Various"],
            isbn13: None,
            subjects: &["Literary Criticism"],
            day: 5,
        }),
    ]
}
