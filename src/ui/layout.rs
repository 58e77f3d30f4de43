// Panel geometry - four fixed rectangles carved out of the terminal
//
//   +--------------------------------------+
//   | search bar (2 rows)                  |
//   +---------+----------------------------+
//   | recent  | main / results             |
//   | 25%     | 75%                        |
//   +---------+----------------------------+
//   | now playing (2 rows)                 |
//   +--------------------------------------+

use ratatui::layout::Rect;
use std::fmt;

pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;
pub const SEARCH_BAR_HEIGHT: u16 = 2;
pub const NOW_PLAYING_HEIGHT: u16 = 2;
const RECENT_WIDTH_PERCENT: u16 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub search_bar: Rect,
    pub recent: Rect,
    pub main: Rect,
    pub now_playing: Rect,
}

/// The terminal is below the minimum size; nothing but a message should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooSmall {
    pub width: u16,
    pub height: u16,
}

impl fmt::Display for TooSmall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Terminal too small. Requires at least {MIN_WIDTH}x{MIN_HEIGHT}.")
    }
}

pub fn compute(area: Rect) -> Result<PanelLayout, TooSmall> {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        return Err(TooSmall {
            width: area.width,
            height: area.height,
        });
    }

    let middle_height = area.height - SEARCH_BAR_HEIGHT - NOW_PLAYING_HEIGHT;
    let middle_y = area.y + SEARCH_BAR_HEIGHT;
    // u32 so width * percent can't overflow on very wide terminals
    let recent_width = (u32::from(area.width) * u32::from(RECENT_WIDTH_PERCENT) / 100) as u16;

    Ok(PanelLayout {
        search_bar: Rect::new(area.x, area.y, area.width, SEARCH_BAR_HEIGHT),
        recent: Rect::new(area.x, middle_y, recent_width, middle_height),
        main: Rect::new(area.x + recent_width, middle_y, area.width - recent_width, middle_height),
        now_playing: Rect::new(
            area.x,
            area.y + area.height - NOW_PLAYING_HEIGHT,
            area.width,
            NOW_PLAYING_HEIGHT,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_small_produces_no_panels() {
        let result = compute(Rect::new(0, 0, 30, 8));
        assert_eq!(result, Err(TooSmall { width: 30, height: 8 }));

        assert!(compute(Rect::new(0, 0, 39, 40)).is_err());
        assert!(compute(Rect::new(0, 0, 120, 9)).is_err());
        assert_eq!(
            compute(Rect::new(0, 0, 10, 5)).unwrap_err().to_string(),
            "Terminal too small. Requires at least 40x10."
        );
    }

    #[test]
    fn test_minimum_size_layout() {
        let layout = compute(Rect::new(0, 0, 40, 10)).unwrap();
        assert_eq!(layout.search_bar, Rect::new(0, 0, 40, 2));
        assert_eq!(layout.recent, Rect::new(0, 2, 10, 6));
        assert_eq!(layout.main, Rect::new(10, 2, 30, 6));
        assert_eq!(layout.now_playing, Rect::new(0, 8, 40, 2));
    }

    #[test]
    fn test_panels_tile_without_overlap() {
        for (w, h) in [(40, 10), (81, 24), (203, 61), (250, 200)] {
            let area = Rect::new(0, 0, w, h);
            let layout = compute(area).unwrap();
            let panels = [layout.search_bar, layout.recent, layout.main, layout.now_playing];

            let covered: u32 = panels.iter().map(|r| u32::from(r.area())).sum();
            assert_eq!(covered, u32::from(w) * u32::from(h));

            for (i, a) in panels.iter().enumerate() {
                assert_eq!(a.union(area), area, "panel {i} leaves the screen");
                for b in panels.iter().skip(i + 1) {
                    assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
                }
            }
            assert_eq!(layout.recent.width, w * 25 / 100);
        }
    }
}
