// Panel rendering - reads navigator state, never mutates it
// Every panel is cleared, bordered, titled and filled; only lines that fit are produced

use super::layout::{self, PanelLayout, TooSmall};
use super::navigator::{Mode, ModeKind, Navigator};
use crate::catalog::ResultSet;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::ops::Range;
use unicode_width::UnicodeWidthChar;

const HIGHLIGHT_PREFIX: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    SearchBar,
    Recent,
    Main,
    NowPlaying,
}

pub fn draw(f: &mut Frame, nav: &Navigator) {
    match layout::compute(f.area()) {
        Ok(panels) => draw_panels(f, nav, &panels),
        Err(too_small) => draw_too_small(f, too_small),
    }
}

fn draw_panels(f: &mut Frame, nav: &Navigator, panels: &PanelLayout) {
    render_panel(f, Panel::SearchBar, nav, panels.search_bar);
    render_panel(f, Panel::Recent, nav, panels.recent);
    render_panel(f, Panel::Main, nav, panels.main);
    render_panel(f, Panel::NowPlaying, nav, panels.now_playing);
}

pub fn render_panel(f: &mut Frame, panel: Panel, nav: &Navigator, area: Rect) {
    f.render_widget(Clear, area);

    match panel {
        Panel::SearchBar => render_search_bar(f, nav, area),
        Panel::Recent => render_recent(f, nav, area),
        Panel::Main => render_main(f, nav, area),
        Panel::NowPlaying => render_now_playing(f, nav, area),
    }
}

fn draw_too_small(f: &mut Frame, too_small: TooSmall) {
    let area = f.area();
    f.render_widget(Clear, area);

    let row = Rect::new(area.x, area.y + area.height / 2, area.width, area.height - area.height / 2);
    let message = Paragraph::new(too_small.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message, row);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Two-row bars: title sits in the top border, content on the second row
fn bar_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
        .border_style(border_style(focused))
        .title(title)
}

fn list_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(title)
}

fn render_search_bar(f: &mut Frame, nav: &Navigator, area: Rect) {
    let (text, focused) = match nav.mode() {
        Mode::Search { text } => (text.as_str(), true),
        _ => ("", false),
    };

    let block = bar_block(" tunedeck ".to_string(), focused);
    let inner = block.inner(area);
    let label = format!("Search: {text}");
    // Keep one column free for the cursor; long queries scroll so the tail stays visible
    let (visible, visible_width) = fit_tail(&label, usize::from(inner.width.saturating_sub(1)));

    f.render_widget(Paragraph::new(visible).block(block), area);

    if focused && inner.width > 0 && inner.height > 0 {
        let offset = u16::try_from(visible_width).unwrap_or(0);
        f.set_cursor_position((inner.x + offset, inner.y));
    }
}

/// Longest suffix of `text` no wider than `max_width` columns, with its width
fn fit_tail(text: &str, max_width: usize) -> (&str, usize) {
    let mut width = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = i;
    }
    (&text[start..], width)
}

fn render_recent(f: &mut Frame, nav: &Navigator, area: Rect) {
    let focused_cursor = match nav.mode() {
        Mode::Recent { cursor } => Some(*cursor),
        _ => None,
    };

    let block = list_block(" Recently Played ".to_string(), focused_cursor.is_some());
    let capacity = usize::from(block.inner(area).height);

    let artists = nav.recent().as_slice();
    let lines: Vec<Line> = if artists.is_empty() {
        vec![Line::styled("(nothing yet)", Style::default().fg(Color::DarkGray))]
    } else {
        let window = visible_window(artists.len(), focused_cursor.unwrap_or(0), capacity);
        window
            .map(|i| list_line(&artists[i], focused_cursor == Some(i)))
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_main(f: &mut Frame, nav: &Navigator, area: Rect) {
    match nav.mode() {
        Mode::SearchResults { results, cursor } => {
            let block = list_block(format!(" Search Results: {} ", results.query()), true);
            let capacity = usize::from(block.inner(area).height);
            let lines = result_lines(results, *cursor, capacity);
            f.render_widget(Paragraph::new(lines).block(block), area);
        }
        mode => {
            let block = list_block(" Keys ".to_string(), false);
            let lines: Vec<Line> = help_lines(mode.kind()).into_iter().map(Line::from).collect();
            f.render_widget(Paragraph::new(lines).block(block), area);
        }
    }
}

fn render_now_playing(f: &mut Frame, nav: &Navigator, area: Rect) {
    let title = if nav.is_backend_offline() {
        " Player (offline) ".to_string()
    } else {
        " Player ".to_string()
    };

    let paragraph = Paragraph::new(format!("Now Playing: {}", nav.now_playing())).block(bar_block(title, false));
    f.render_widget(paragraph, area);
}

fn list_line(text: &str, highlighted: bool) -> Line<'static> {
    if highlighted {
        Line::styled(
            format!("{HIGHLIGHT_PREFIX}{text}"),
            Style::default().add_modifier(Modifier::REVERSED),
        )
    } else {
        Line::from(text.to_string())
    }
}

/// Rows that fit in `capacity`, scrolled just enough to keep `selected` visible
pub fn visible_window(len: usize, selected: usize, capacity: usize) -> Range<usize> {
    if capacity == 0 || len == 0 {
        return 0..0;
    }
    let selected = selected.min(len - 1);
    let start = (selected + 1).saturating_sub(capacity);
    start..(start + capacity).min(len)
}

/// Row of the combined index once the two segment headers are counted
fn result_row(results: &ResultSet, index: usize) -> usize {
    let tracks = results.tracks().len();
    if index < tracks {
        1 + index
    } else {
        tracks + 2 + (index - tracks)
    }
}

fn result_lines(results: &ResultSet, cursor: usize, capacity: usize) -> Vec<Line<'static>> {
    if results.is_empty() {
        return vec![Line::from(format!("No results for '{}'", results.query()))];
    }

    let header = Style::default().add_modifier(Modifier::BOLD);
    let mut rows: Vec<Line<'static>> = Vec::with_capacity(results.len() + 2);

    rows.push(Line::styled("Tracks:", header));
    for (i, track) in results.tracks().iter().enumerate() {
        let text = format!("{}. {}", i + 1, track.display_line());
        rows.push(list_line(&text, cursor == i));
    }

    let offset = results.tracks().len();
    rows.push(Line::styled("Albums:", header));
    for (i, album) in results.albums().iter().enumerate() {
        let text = format!("{}. {}", i + 1, album.display_line());
        rows.push(list_line(&text, cursor == offset + i));
    }

    let window = visible_window(rows.len(), result_row(results, cursor), capacity);
    rows.drain(window).collect()
}

fn help_lines(mode: ModeKind) -> Vec<&'static str> {
    match mode {
        ModeKind::Search => vec!["Type to search", "Enter  run search", "Esc    cancel"],
        ModeKind::Recent => vec![
            "j/k    move",
            "Enter  play artist",
            "p      play / pause",
            "h/l    previous / next",
            "Esc    back",
        ],
        _ => vec![
            "s      search the catalog",
            "r      recently played",
            "p      play / pause",
            "h/l    previous / next",
            "q      quit",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, CatalogSearch};
    use crate::error::{BackendError, BackendResult};
    use crate::playback::PlaybackControl;
    use crate::recent::RecentArtists;
    use crate::ui::events::Action;
    use async_trait::async_trait;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Offline;

    #[async_trait]
    impl PlaybackControl for Offline {
        async fn play_pause(&self) -> BackendResult<()> {
            Err(BackendError::Unavailable("offline".to_string()))
        }
        async fn next(&self) -> BackendResult<()> {
            Err(BackendError::Unavailable("offline".to_string()))
        }
        async fn previous(&self) -> BackendResult<()> {
            Err(BackendError::Unavailable("offline".to_string()))
        }
        async fn play_uri(&self, _uri: &str) -> BackendResult<()> {
            Err(BackendError::Unavailable("offline".to_string()))
        }
        async fn play_artist(&self, _name: &str) -> BackendResult<()> {
            Err(BackendError::Unavailable("offline".to_string()))
        }
        async fn now_playing(&self) -> BackendResult<String> {
            Err(BackendError::Unavailable("offline".to_string()))
        }
    }

    struct FixedCatalog {
        tracks: usize,
        albums: usize,
    }

    #[async_trait]
    impl CatalogSearch for FixedCatalog {
        async fn search(&self, query: &str) -> BackendResult<ResultSet> {
            let tracks = (0..self.tracks)
                .map(|i| CatalogEntry::new(format!("T{i}"), "Art", format!("spotify:track:{i}")))
                .collect();
            let albums = (0..self.albums)
                .map(|i| CatalogEntry::new(format!("A{i}"), "Art", format!("spotify:album:{i}")))
                .collect();
            Ok(ResultSet::new(query, tracks, albums))
        }

        async fn find_artist(&self, _name: &str) -> BackendResult<Option<String>> {
            Ok(None)
        }
    }

    fn navigator(dir: &TempDir, recent: &[&str], tracks: usize, albums: usize) -> Navigator {
        let path = dir.path().join("recent.txt");
        std::fs::write(&path, recent.join("\n")).unwrap();
        Navigator::new(
            RecentArtists::load(&path).unwrap(),
            Arc::new(Offline),
            Arc::new(FixedCatalog { tracks, albums }),
        )
    }

    fn render(nav: &Navigator, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, nav)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        let width = buffer.area.width;
        (0..width)
            .map(|x| buffer.content[usize::from(y) * usize::from(width) + usize::from(x)].symbol())
            .collect()
    }

    fn screen(buffer: &Buffer) -> Vec<String> {
        (0..buffer.area.height).map(|y| row_text(buffer, y)).collect()
    }

    fn is_reversed(buffer: &Buffer, x: u16, y: u16) -> bool {
        let width = usize::from(buffer.area.width);
        buffer.content[usize::from(y) * width + usize::from(x)]
            .modifier
            .contains(Modifier::REVERSED)
    }

    #[test]
    fn test_visible_window() {
        assert_eq!(visible_window(0, 0, 5), 0..0);
        assert_eq!(visible_window(3, 0, 0), 0..0);
        assert_eq!(visible_window(3, 2, 5), 0..3);
        assert_eq!(visible_window(10, 4, 5), 0..5);
        assert_eq!(visible_window(10, 5, 5), 1..6);
        assert_eq!(visible_window(10, 9, 5), 5..10);
        assert_eq!(visible_window(10, 40, 5), 5..10);
    }

    #[test]
    fn test_too_small_draws_only_message() {
        let dir = TempDir::new().unwrap();
        let nav = navigator(&dir, &["Low"], 0, 0);
        let lines = screen(&render(&nav, 30, 8));

        let text = lines.join("\n");
        assert!(text.contains("Terminal too small"));
        assert!(!text.contains("Recently Played"));
        assert!(!text.contains("Now Playing"));
    }

    #[tokio::test]
    async fn test_idle_screen_has_all_panels() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir, &["Low", "Ride"], 0, 0);
        nav.refresh_now_playing().await;

        let lines = screen(&render(&nav, 80, 12));
        assert!(lines[0].contains("tunedeck"));
        assert!(lines[1].contains("Search:"));
        assert!(lines[2].contains("Recently Played"));
        assert!(lines[3].contains("Low"));
        assert!(lines[4].contains("Ride"));
        assert!(lines[10].contains("Player (offline)"));
        assert!(lines[11].contains("Now Playing: Nothing playing"));
        // Nothing is focused, so nothing is highlighted
        assert!(!lines.iter().any(|l| l.contains("> ")));
    }

    #[tokio::test]
    async fn test_recent_highlight_follows_cursor() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir, &["Low", "Ride", "Lush"], 0, 0);
        for action in [Action::OpenRecent, Action::Down] {
            nav.handle(action).await.unwrap();
        }

        let buffer = render(&nav, 80, 12);
        let lines = screen(&buffer);
        assert!(lines[3].contains("Low") && !lines[3].contains("> "));
        assert!(lines[4].contains("> Ride"));
        assert!(lines[5].contains("Lush") && !lines[5].contains("> "));
        assert!(is_reversed(&buffer, 1, 4));
        assert!(!is_reversed(&buffer, 1, 3));
    }

    #[tokio::test]
    async fn test_search_text_is_echoed() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir, &[], 0, 0);
        nav.handle(Action::OpenSearch).await.unwrap();
        for c in "mbv".chars() {
            nav.handle(Action::Input(c)).await.unwrap();
        }

        let lines = screen(&render(&nav, 80, 12));
        assert!(lines[1].contains("Search: mbv"));
    }

    #[test]
    fn test_fit_tail_counts_display_columns() {
        assert_eq!(fit_tail("Search: abc", 40), ("Search: abc", 11));
        assert_eq!(fit_tail("Search: abcdef", 3), ("def", 3));
        // Wide glyphs take two columns and are never split
        assert_eq!(fit_tail("Search: 東京", 4), ("東京", 4));
        assert_eq!(fit_tail("Search: 東京", 3), ("京", 2));
        assert_eq!(fit_tail("abc", 0), ("", 0));
    }

    #[tokio::test]
    async fn test_long_query_scrolls_and_cursor_follows_text() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir, &[], 0, 0);
        nav.handle(Action::OpenSearch).await.unwrap();
        let query = format!("{}END", "a".repeat(60));
        for c in query.chars() {
            nav.handle(Action::Input(c)).await.unwrap();
        }

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|f| draw(f, &nav)).unwrap();
        let row = row_text(terminal.backend().buffer(), 1);

        // 38 inner columns: 37 of text, one for the cursor
        assert!(!row.contains("Search:"));
        assert!(row.contains("aaaEND "));
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (38, 1));
    }

    #[tokio::test]
    async fn test_results_highlight_crosses_into_albums() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir, &[], 2, 2);
        for action in [Action::OpenSearch, Action::Input('x'), Action::Select, Action::Down, Action::Down] {
            nav.handle(action).await.unwrap();
        }

        let lines = screen(&render(&nav, 80, 14));
        let body: Vec<&str> = lines.iter().map(|l| l.as_str()).collect();

        let highlighted: Vec<&&str> = body.iter().filter(|l| l.contains("> ")).collect();
        assert_eq!(highlighted.len(), 1);
        assert!(highlighted[0].contains("> 1. A0 by Art"));

        let tracks_row = body.iter().position(|l| l.contains("Tracks:")).unwrap();
        let albums_row = body.iter().position(|l| l.contains("Albums:")).unwrap();
        assert!(tracks_row < albums_row);
        assert!(body[albums_row + 1].contains("> 1. A0"));
    }

    #[tokio::test]
    async fn test_long_results_scroll_to_keep_cursor_visible() {
        let dir = TempDir::new().unwrap();
        // 10 + 10 results in a panel with 6 inner rows
        let mut nav = navigator(&dir, &[], 10, 10);
        for action in [Action::OpenSearch, Action::Input('x'), Action::Select] {
            nav.handle(action).await.unwrap();
        }
        for _ in 0..19 {
            nav.handle(Action::Down).await.unwrap();
        }

        let lines = screen(&render(&nav, 40, 12));
        assert!(lines.iter().any(|l| l.contains("> 10. A9 by Art")));
        assert!(!lines.iter().any(|l| l.contains("Tracks:")));
    }

    #[tokio::test]
    async fn test_empty_results_message() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir, &[], 0, 0);
        for action in [Action::OpenSearch, Action::Input('z'), Action::Select] {
            nav.handle(action).await.unwrap();
        }

        let lines = screen(&render(&nav, 80, 12));
        assert!(lines.iter().any(|l| l.contains("No results for 'z'")));
    }
}
