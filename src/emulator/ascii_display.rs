use super::{
    basics::{SCREEN_HEIGHT, SCREEN_WIDTH},
    display::Display,
};

/// Renders the framebuffer as text, `@` for lit pixels, one line per row.
pub fn render(display: &Display) -> String {
    let mut out = String::with_capacity((SCREEN_WIDTH as usize + 1) * SCREEN_HEIGHT as usize);
    for y in 0..SCREEN_HEIGHT {
        if y > 0 {
            out.push('\n');
        }
        for x in 0..SCREEN_WIDTH {
            out.push(if display.get(x, y) { '@' } else { ' ' });
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render() {
        let mut display = Display::new();
        display.draw(1, 1, &[0xC0]);
        let text = render(&display);
        let rows: Vec<&str> = text.split('\n').collect();
        assert_eq!(rows.len(), SCREEN_HEIGHT as usize);
        assert!(rows.iter().all(|r| r.len() == SCREEN_WIDTH as usize));
        assert_eq!(rows[0].trim_end(), "");
        assert_eq!(rows[1].trim_end(), " @@");
    }
}
