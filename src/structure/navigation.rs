//! Grid navigation over the current page
//!
//! Selection moves across scene boundaries as if the page were one long grid.
//! Collapsed scenes are invisible to Up/Down. Moving down off the bottom of the
//! page grows the last reachable scene by one row so Enter always lands somewhere.

use serde::Serialize;

use crate::models::{CellAddress, ColumnKey, Direction, Page, Row};

/// Where the selection landed, and whether a row was created to get there
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavOutcome {
    pub address: CellAddress,
    pub grew: bool,
}

impl NavOutcome {
    fn moved(address: CellAddress) -> Self {
        Self {
            address,
            grew: false,
        }
    }
}

/// Select a cell, appending one empty row when `row_index` is past the end
///
/// Returns `None` when the scene does not exist.
pub fn select(
    page: &mut Page,
    scene_index: usize,
    row_index: usize,
    column: ColumnKey,
) -> Option<NavOutcome> {
    let scene = page.scenes.get_mut(scene_index)?;
    if row_index < scene.rows.len() {
        return Some(NavOutcome::moved(CellAddress::new(
            scene_index,
            row_index,
            column,
        )));
    }

    scene.rows.push(Row::new());
    let row = scene.rows.len() - 1;
    log::debug!("auto-grew scene {} to {} rows", scene_index, scene.rows.len());
    Some(NavOutcome {
        address: CellAddress::new(scene_index, row, column),
        grew: true,
    })
}

/// Move one step from `from`; `None` is a no-op (edge of grid or stale address)
pub fn navigate(page: &mut Page, from: CellAddress, direction: Direction) -> Option<NavOutcome> {
    if !from.resolves_in(page) {
        log::debug!("navigate from stale address {:?} ignored", from);
        return None;
    }
    let CellAddress {
        scene_index,
        row_index,
        column_key,
    } = from;

    match direction {
        Direction::Up => {
            if row_index > 0 {
                return Some(NavOutcome::moved(CellAddress::new(
                    scene_index,
                    row_index - 1,
                    column_key,
                )));
            }
            page.scenes[..scene_index]
                .iter()
                .enumerate()
                .rev()
                .find(|(_, scene)| scene.is_navigable())
                .map(|(i, scene)| {
                    NavOutcome::moved(CellAddress::new(i, scene.rows.len() - 1, column_key))
                })
        }
        Direction::Down => {
            let row_count = page.scenes[scene_index].rows.len();
            if row_index + 1 < row_count {
                return Some(NavOutcome::moved(CellAddress::new(
                    scene_index,
                    row_index + 1,
                    column_key,
                )));
            }
            let following = page
                .scenes
                .iter()
                .enumerate()
                .skip(scene_index + 1)
                .find(|(_, scene)| scene.is_navigable())
                .map(|(i, _)| i);
            match following {
                Some(i) => Some(NavOutcome::moved(CellAddress::new(i, 0, column_key))),
                // only the last scene of the page grows
                None if scene_index + 1 == page.scenes.len() => {
                    select(page, scene_index, row_count, column_key)
                }
                None => None,
            }
        }
        Direction::Left => column_key
            .prev()
            .map(|col| NavOutcome::moved(from.with_column(col))),
        Direction::Right => column_key
            .next()
            .map(|col| NavOutcome::moved(from.with_column(col))),
    }
}

/// Tab / Shift+Tab: one column sideways, wrapping through Down/Up at the edges
pub fn tab(page: &mut Page, from: CellAddress, backward: bool) -> Option<NavOutcome> {
    if !from.resolves_in(page) {
        return None;
    }
    if backward {
        match from.column_key.prev() {
            Some(col) => Some(NavOutcome::moved(from.with_column(col))),
            None => navigate(page, from.with_column(ColumnKey::last()), Direction::Up),
        }
    } else {
        match from.column_key.next() {
            Some(col) => Some(NavOutcome::moved(from.with_column(col))),
            None => navigate(page, from.with_column(ColumnKey::first()), Direction::Down),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scene;

    /// Page with scenes of the given row counts, numbered 1..
    fn page_with(rows: &[usize]) -> Page {
        let mut page = Page::new("P");
        page.scenes = rows
            .iter()
            .enumerate()
            .map(|(i, n)| Scene {
                scene: i as u32 + 1,
                collapsed: false,
                rows: vec![Row::new(); *n],
            })
            .collect();
        page
    }

    fn addr(scene: usize, row: usize, col: ColumnKey) -> CellAddress {
        CellAddress::new(scene, row, col)
    }

    #[test]
    fn test_select_existing_row() {
        let mut page = page_with(&[2]);
        let out = select(&mut page, 0, 1, ColumnKey::Action).unwrap();
        assert_eq!(out.address, addr(0, 1, ColumnKey::Action));
        assert!(!out.grew);
        assert_eq!(page.scenes[0].rows.len(), 2);
    }

    #[test]
    fn test_select_past_end_grows_one_row() {
        let mut page = page_with(&[2]);
        let out = select(&mut page, 0, 2, ColumnKey::Heading).unwrap();
        assert!(out.grew);
        assert_eq!(out.address.row_index, 2);
        assert_eq!(page.scenes[0].rows.len(), 3);
        assert!(page.scenes[0].rows[2].is_empty());
    }

    #[test]
    fn test_select_missing_scene_is_noop() {
        let mut page = page_with(&[1]);
        assert!(select(&mut page, 3, 0, ColumnKey::Heading).is_none());
    }

    #[test]
    fn test_up_down_within_scene() {
        let mut page = page_with(&[3]);
        let down = navigate(&mut page, addr(0, 0, ColumnKey::Notes), Direction::Down).unwrap();
        assert_eq!(down.address, addr(0, 1, ColumnKey::Notes));
        let up = navigate(&mut page, addr(0, 2, ColumnKey::Notes), Direction::Up).unwrap();
        assert_eq!(up.address, addr(0, 1, ColumnKey::Notes));
    }

    #[test]
    fn test_cross_scene_lands_on_first_and_last_rows() {
        let mut page = page_with(&[2, 3]);
        let down = navigate(&mut page, addr(0, 1, ColumnKey::Dialogue), Direction::Down).unwrap();
        assert_eq!(down.address, addr(1, 0, ColumnKey::Dialogue));
        let up = navigate(&mut page, addr(1, 0, ColumnKey::Dialogue), Direction::Up).unwrap();
        assert_eq!(up.address, addr(0, 1, ColumnKey::Dialogue));
    }

    #[test]
    fn test_collapsed_scenes_are_skipped() {
        let mut page = page_with(&[1, 4, 2]);
        page.scenes[1].collapsed = true;
        let down = navigate(&mut page, addr(0, 0, ColumnKey::Heading), Direction::Down).unwrap();
        assert_eq!(down.address, addr(2, 0, ColumnKey::Heading));
        let up = navigate(&mut page, addr(2, 0, ColumnKey::Heading), Direction::Up).unwrap();
        assert_eq!(up.address, addr(0, 0, ColumnKey::Heading));
    }

    #[test]
    fn test_up_at_top_is_noop() {
        let mut page = page_with(&[2]);
        assert!(navigate(&mut page, addr(0, 0, ColumnKey::Heading), Direction::Up).is_none());
    }

    #[test]
    fn test_down_at_bottom_grows_last_scene() {
        let mut page = page_with(&[1, 1]);
        let out = navigate(&mut page, addr(1, 0, ColumnKey::Action), Direction::Down).unwrap();
        assert!(out.grew);
        assert_eq!(out.address, addr(1, 1, ColumnKey::Action));
        assert_eq!(page.scenes[1].rows.len(), 2);
    }

    #[test]
    fn test_down_before_only_collapsed_scenes_is_noop() {
        let mut page = page_with(&[1, 2]);
        page.scenes[1].collapsed = true;
        assert!(navigate(&mut page, addr(0, 0, ColumnKey::Action), Direction::Down).is_none());
        assert_eq!(page.scenes[0].rows.len(), 1);
        assert_eq!(page.scenes[1].rows.len(), 2);

        // the last scene of the page still grows
        page.scenes[0].collapsed = true;
        page.scenes[1].collapsed = false;
        let out = navigate(&mut page, addr(1, 1, ColumnKey::Action), Direction::Down).unwrap();
        assert!(out.grew);
        assert_eq!(page.scenes[1].rows.len(), 3);
    }

    #[test]
    fn test_left_right_do_not_wrap() {
        let mut page = page_with(&[1]);
        assert!(navigate(&mut page, addr(0, 0, ColumnKey::Heading), Direction::Left).is_none());
        assert!(navigate(&mut page, addr(0, 0, ColumnKey::Notes), Direction::Right).is_none());
        let right = navigate(&mut page, addr(0, 0, ColumnKey::Heading), Direction::Right).unwrap();
        assert_eq!(right.address.column_key, ColumnKey::Character);
    }

    #[test]
    fn test_stale_address_is_noop() {
        let mut page = page_with(&[1]);
        assert!(navigate(&mut page, addr(0, 5, ColumnKey::Heading), Direction::Down).is_none());
        assert!(navigate(&mut page, addr(9, 0, ColumnKey::Heading), Direction::Up).is_none());
        assert!(tab(&mut page, addr(9, 0, ColumnKey::Heading), false).is_none());
        assert_eq!(page.scenes[0].rows.len(), 1);
    }

    #[test]
    fn test_tab_wraps_to_next_row_first_column() {
        let mut page = page_with(&[2]);
        let out = tab(&mut page, addr(0, 0, ColumnKey::Notes), false).unwrap();
        assert_eq!(out.address, addr(0, 1, ColumnKey::Heading));

        // at the very end Tab creates the next row
        let out = tab(&mut page, addr(0, 1, ColumnKey::Notes), false).unwrap();
        assert!(out.grew);
        assert_eq!(out.address, addr(0, 2, ColumnKey::Heading));
    }

    #[test]
    fn test_shift_tab_wraps_to_previous_row_last_column() {
        let mut page = page_with(&[1, 1]);
        let out = tab(&mut page, addr(1, 0, ColumnKey::Heading), true).unwrap();
        assert_eq!(out.address, addr(0, 0, ColumnKey::Notes));
        assert!(tab(&mut page, addr(0, 0, ColumnKey::Heading), true).is_none());
        let out = tab(&mut page, addr(0, 0, ColumnKey::Dialogue), true).unwrap();
        assert_eq!(out.address, addr(0, 0, ColumnKey::Character));
    }
}
