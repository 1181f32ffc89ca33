//! Plain-text rendering of a finalized session.
//!
//! Downstream collaborators consume a read-only [`ScrapeSession`]; these
//! renderers produce the export text and the summarization prompt handed
//! to an external assistant. Where the text goes (file, clipboard, chat
//! input) is out of scope here.

use std::fmt::Write;

use crate::types::session::ScrapeSession;

/// Render a finalized session as a plain-text report.
pub fn format_report(session: &ScrapeSession) -> String {
    let date = session
        .finished_at
        .unwrap_or(session.started_at)
        .format("%Y-%m-%d %H:%M:%S UTC");

    let mut out = String::new();
    let _ = writeln!(out, "Product Reviews");
    let _ = writeln!(out, "Product: {}", session.product_title);
    let _ = writeln!(out, "Date: {date}");
    let _ = writeln!(out, "Total Reviews: {}", session.review_count());
    let _ = writeln!(
        out,
        "Pages: {} of {} requested",
        session.pages_completed, session.pages_requested
    );
    let _ = writeln!(out, "\n{}\n", "=".repeat(50));

    for (index, review) in session.all_reviews.iter().enumerate() {
        let _ = writeln!(out, "Review {}", index + 1);
        let _ = writeln!(out, "Rating: {}/5 stars", review.rating);
        let _ = writeln!(out, "Text: {}", review.text);
        let _ = writeln!(out, "\n{}\n", "-".repeat(30));
    }

    out
}

/// Render the summarization prompt for an external chat assistant.
pub fn format_assistant_prompt(session: &ScrapeSession) -> String {
    let reviews = session
        .all_reviews
        .iter()
        .enumerate()
        .map(|(index, review)| {
            format!(
                "Review {} ({}/5 stars): {}",
                index + 1,
                review.rating,
                review.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Please analyze these product reviews and provide insights:\n\n\
         Product: {}\n\
         Total Reviews: {}\n\n\
         Reviews:\n{}\n\n\
         Please provide:\n\
         1. Overall sentiment analysis\n\
         2. Key pros and cons mentioned\n\
         3. Common themes\n\
         4. Whether this product is worth buying\n\
         5. Any quality concerns or red flags\n\n\
         Keep the analysis concise and actionable.",
        session.product_title,
        session.review_count(),
        reviews
    )
}
