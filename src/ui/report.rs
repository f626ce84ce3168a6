use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use super::draw_str;
use crate::text::dimensions;

/// The end-of-test summary, drawn as a block centered on the screen.
pub struct ReportView<'a> {
    pub text: &'a str,
    pub style: Style,
}

impl Widget for &ReportView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.style);

        let dims = dimensions(self.text);
        let x = i32::from(area.x) + (i32::from(area.width) - dims.cols as i32) / 2;
        let y = i32::from(area.y) + (i32::from(area.height) - dims.rows as i32) / 2;
        draw_str(buf, area, x, y, self.text, self.style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(text: &str) -> ReportView<'_> {
        ReportView {
            text,
            style: Style::default(),
        }
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn report_is_centered() {
        let area = Rect::new(0, 0, 12, 5);
        let mut buf = Buffer::empty(area);
        (&view("WPM: 1\nCPM: 5")).render(area, &mut buf);

        assert_eq!(row(&buf, 1), "   WPM: 1   ");
        assert_eq!(row(&buf, 2), "   CPM: 5   ");
    }

    #[test]
    fn oversized_report_is_clipped() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        (&view("a very long line\nand another")).render(area, &mut buf);
        assert_eq!(buf.area, area);
    }
}
