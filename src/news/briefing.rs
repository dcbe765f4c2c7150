//! Presentation of gathered headlines

use std::fmt::Write as _;

use super::{Headline, NewsMode, NewsRequest};

const RULE_WIDTH: usize = 60;

/// Lines to speak for a set of headlines
#[must_use]
pub fn briefing(request: &NewsRequest, headlines: &[Headline]) -> Vec<String> {
    if request.mode == NewsMode::Summary {
        return vec![format!(
            "I've displayed {} news headlines on screen",
            headlines.len()
        )];
    }

    let intro = match headlines.first() {
        Some(first) if !request.is_all() => {
            format!("Here are the latest headlines from {}", first.source)
        }
        _ => "Here are the latest headlines from Pakistan".to_string(),
    };

    let mut lines = Vec::with_capacity(headlines.len() + 2);
    lines.push(intro);
    lines.extend(headlines.iter().enumerate().map(|(i, h)| {
        if request.is_all() {
            format!("Headline {} from {}. {}", i + 1, h.source, h.title)
        } else {
            format!("Headline {}. {}", i + 1, h.title)
        }
    }));
    lines.push("That's all for now".to_string());
    lines
}

/// On-screen numbered list with links
#[must_use]
pub fn render_list(mode: NewsMode, headlines: &[Headline]) -> String {
    let heading = match mode {
        NewsMode::Headlines => "NEWS HEADLINES",
        NewsMode::Summary => "NEWS SUMMARY",
    };
    let rule = "=".repeat(RULE_WIDTH);

    let mut out = String::new();
    let _ = writeln!(out, "{rule}\n{heading:^RULE_WIDTH$}\n{rule}\n");
    for (i, h) in headlines.iter().enumerate() {
        let _ = writeln!(out, "{}. [{}] {}", i + 1, h.source, h.title);
        if !h.link.is_empty() {
            let _ = writeln!(out, "   {}", h.link);
        }
        out.push('\n');
    }
    out.push_str(&rule);
    out
}
