//! Turns the message list into styled, width-wrapped transcript lines.

use chrono::{DateTime, Local, Utc};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::domain::message::{Message, Sender};

use super::styles;

/// Greedy word wrap against display width (not char count), so wide glyphs
/// do not overflow the panel.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_owned();
            continue;
        }

        if current.width() + 1 + word.width() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_owned();
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    // Hard-break any single word wider than the panel.
    lines
        .into_iter()
        .flat_map(|line| {
            if line.width() <= width {
                vec![line]
            } else {
                hard_break(&line, width)
            }
        })
        .collect()
}

fn hard_break(line: &str, width: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for ch in line.chars() {
        let candidate_width = current.width() + ch.to_string().width();
        if candidate_width > width && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Renders one message as a header line plus wrapped content lines.
pub fn message_lines(message: &Message, width: usize) -> Vec<Line<'static>> {
    let sender_style = match message.sender {
        Sender::User => styles::user_sender_style(),
        Sender::Assistant => styles::assistant_sender_style(),
    };

    let header = Line::from(vec![
        Span::styled(message.sender.display_label().to_owned(), sender_style),
        Span::raw("  "),
        Span::styled(format_time(message.created_at), styles::message_time_style()),
    ]);

    let mut lines = vec![header];
    for wrapped in wrap_text(&message.content, width.max(1)) {
        lines.push(Line::from(Span::styled(
            format!("  {wrapped}"),
            styles::message_text_style(),
        )));
    }
    lines
}

/// Builds the full transcript, keeping only as many trailing lines as fit.
pub fn build_transcript(messages: &[Message], width: usize, height: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        lines.extend(message_lines(message, width.saturating_sub(2)));
        lines.push(Line::raw(""));
    }

    if lines.len() > height {
        lines.split_off(lines.len() - height)
    } else {
        lines
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap_text("hello there", 20), vec!["hello there"]);
    }

    #[test]
    fn wrap_splits_at_word_boundaries() {
        let lines = wrap_text("one two three four", 9);

        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_hard_breaks_oversized_words() {
        let lines = wrap_text("abcdefghij", 4);

        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
        assert!(lines.iter().all(|l| l.width() <= 4));
    }

    #[test]
    fn wrap_of_empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn wrap_collapses_internal_whitespace() {
        assert_eq!(wrap_text("a   \n b", 10), vec!["a b"]);
    }

    #[test]
    fn message_lines_include_sender_and_content() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let message = Message::new(1, Sender::Assistant, "hello world", at);

        let lines = message_lines(&message, 40);
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.as_ref()))
            .collect();

        assert!(text.contains("Sidekick"));
        assert!(text.contains("hello world"));
    }

    #[test]
    fn transcript_keeps_only_the_trailing_lines_that_fit() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let messages: Vec<Message> = (0..10)
            .map(|i| Message::new(i, Sender::User, format!("message {i}"), at))
            .collect();

        let lines = build_transcript(&messages, 40, 6);

        assert_eq!(lines.len(), 6);
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.as_ref()))
            .collect();
        // The newest message survives the trim.
        assert!(text.contains("message 9"));
    }
}
