use crate::{MapError, MapStore, Rectangle};
use std::path::{Path, PathBuf};

/// Parse the plain-text map format described by the crate's map file
/// contract:
///
/// ```text
/// height <H>
/// width <W>
/// X Y Length Width
/// <x> <y> <l> <w>
/// ...
/// ```
///
/// Header lines are literal and must appear in that order. Each
/// obstacle line has four whitespace-separated non-negative integers.
/// Parsing stops at the first malformed obstacle line rather than
/// erroring the whole file.
pub fn load_map(path: impl AsRef<Path>, robot_length: u32, robot_width: u32) -> Result<MapStore, MapError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map(&text, path.to_path_buf(), robot_length, robot_width)
}

fn parse_map(
    text: &str,
    path: PathBuf,
    robot_length: u32,
    robot_width: u32,
) -> Result<MapStore, MapError> {
    let mut lines = text.lines().enumerate();

    let (_, height_line) = lines.next().ok_or_else(|| MapError::MissingHeader {
        path: path.clone(),
    })?;
    let height = parse_header(height_line, "height").ok_or_else(|| MapError::BadHeightHeader {
        path: path.clone(),
        line: 1,
        found: height_line.to_string(),
    })?;

    let (_, width_line) = lines.next().ok_or_else(|| MapError::MissingHeader {
        path: path.clone(),
    })?;
    let width = parse_header(width_line, "width").ok_or_else(|| MapError::BadWidthHeader {
        path: path.clone(),
        line: 2,
        found: width_line.to_string(),
    })?;

    let (_, column_line) = lines.next().ok_or_else(|| MapError::MissingHeader {
        path: path.clone(),
    })?;
    if column_line.trim() != "X Y Length Width" {
        return Err(MapError::BadColumnHeader {
            path,
            line: 3,
            found: column_line.to_string(),
        });
    }

    let mut obstacles = Vec::new();
    for (_, line) in lines {
        match parse_obstacle_line(line) {
            Some(rect) => obstacles.push(rect),
            None => break,
        }
    }

    Ok(MapStore::new(height, width, robot_length, robot_width, obstacles))
}

fn parse_header(line: &str, key: &str) -> Option<u32> {
    let (found_key, value) = line.trim().split_once(' ')?;
    if found_key != key {
        return None;
    }
    value.trim().parse().ok()
}

fn parse_obstacle_line(line: &str) -> Option<Rectangle> {
    let mut fields = line.split_whitespace();
    let x: i32 = fields.next()?.parse().ok()?;
    let y: i32 = fields.next()?.parse().ok()?;
    let l: i32 = fields.next()?.parse().ok()?;
    let w: i32 = fields.next()?.parse().ok()?;
    if fields.next().is_some() || x < 0 || y < 0 || l < 0 || w < 0 {
        return None;
    }
    Some(Rectangle::new(x, y, l, w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_map() {
        let text = "height 10\nwidth 20\nX Y Length Width\n1 2 3 4\n5 6 7 8\n";
        let map = parse_map(text, PathBuf::from("test.map"), 2, 2).unwrap();
        assert_eq!(map.height(), 10);
        assert_eq!(map.width(), 20);
        assert_eq!(map.obstacles().len(), 2);
        assert_eq!(map.obstacles()[0].anchor(), bevy_math::IVec2::new(1, 2));
    }

    #[test]
    fn stops_at_first_malformed_obstacle_line() {
        let text = "height 10\nwidth 20\nX Y Length Width\n1 2 3 4\nnot a line\n5 6 7 8\n";
        let map = parse_map(text, PathBuf::from("test.map"), 2, 2).unwrap();
        assert_eq!(map.obstacles().len(), 1);
    }

    #[test]
    fn rejects_out_of_order_header() {
        let text = "width 20\nheight 10\nX Y Length Width\n";
        let err = parse_map(text, PathBuf::from("test.map"), 2, 2).unwrap_err();
        assert!(matches!(err, MapError::BadHeightHeader { .. }));
    }

    #[test]
    fn rejects_missing_column_header() {
        let text = "height 10\nwidth 20\nsomething else\n";
        let err = parse_map(text, PathBuf::from("test.map"), 2, 2).unwrap_err();
        assert!(matches!(err, MapError::BadColumnHeader { .. }));
    }

    #[test]
    fn empty_obstacle_list_is_valid() {
        let text = "height 3\nwidth 3\nX Y Length Width\n";
        let map = parse_map(text, PathBuf::from("test.map"), 2, 2).unwrap();
        assert!(map.obstacles().is_empty());
    }
}
