//! Plain-text drawing of a [`Page`].

use std::fmt::Write;

use pollen_core::{
    PollenError,
    flow::{BannerKind, PAGE_CAPTION, PAGE_TITLE, Page},
};

pub fn print_header() {
    println!("{PAGE_TITLE}\n{PAGE_CAPTION}\n");
}

pub fn print_page(page: &Page) {
    print!("{}", format_page(page));
}

pub fn print_failure(err: &PollenError) {
    eprintln!("[error] {err}");
}

fn banner_tag(kind: BannerKind) -> &'static str {
    match kind {
        BannerKind::Info => "[info]",
        BannerKind::Success => "[ok]",
        BannerKind::Warning => "[warning]",
        BannerKind::Error => "[error]",
    }
}

pub fn format_page(page: &Page) -> String {
    let mut out = String::new();

    if let Some(coords) = &page.coordinates {
        let _ = writeln!(out, "Coordinates used: {coords}");
    }

    for banner in &page.banners {
        let _ = writeln!(out, "{} {}", banner_tag(banner.kind), banner.text);
    }

    if let Some(hint) = &page.code_hint {
        let _ = writeln!(out, "\n    {hint}\n");
    }

    if let Some(payload) = &page.raw_payload {
        let body = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        let _ = writeln!(out, "{body}");
    }

    if let Some(map) = &page.map {
        let _ = writeln!(out, "\nMap (zoom {})", map.zoom);
        for point in &map.points {
            let _ = writeln!(
                out,
                "  * {} at {} [{}, radius {} m]",
                point.label, point.position, point.color, point.radius_m
            );
        }
    }

    if !page.metrics.is_empty() {
        let _ = writeln!(out, "\nPollen Details");
        let width = page.metrics.iter().map(|m| m.label.len()).max().unwrap_or(0);
        for metric in &page.metrics {
            let _ = writeln!(out, "  {:<width$}  {}", metric.label, metric.value);
        }
    }

    if let Some(updated_at) = &page.updated_at {
        let _ = writeln!(out, "\nUpdated at: {updated_at}");
    }

    out
}
